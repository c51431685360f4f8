use juiceville_core::identity::Permission;
use juiceville_order::customer_reports::{self, AnalyticsOverview, CustomerActivity, CustomerRanking};
use juiceville_order::reports::{
    self, DailyReport, MonthlyReport, SalesSheet, TodaysOrders, TransactionsOverview,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Clone, serde::Serialize)]
pub struct CustomerAnalytics {
    pub overview: AnalyticsOverview,
    pub customers: Vec<CustomerActivity>,
}

async fn require(state: &AppState, staff_id: Uuid, permission: Option<Permission>) -> AppResult<()> {
    let staff = state.staff_member(staff_id).await?;
    if let Some(permission) = permission {
        staff.require(permission)?;
    }
    Ok(())
}

/// Any staff member; `date` is `YYYY-MM-DD`, default today.
pub async fn daily_report(state: &AppState, staff_id: Uuid, date: Option<&str>) -> AppResult<DailyReport> {
    require(state, staff_id, None).await?;
    let date = reports::parse_report_date(date, state.clock.local_now().date());
    let orders = state.orders.list_orders().await?;
    Ok(reports::daily_report(
        &orders,
        &state.catalog_snapshot().await?,
        &state.customer_names().await?,
        date,
    ))
}

/// Any staff member; `month` is `YYYY-MM`, default the current month.
pub async fn monthly_report(state: &AppState, staff_id: Uuid, month: Option<&str>) -> AppResult<MonthlyReport> {
    require(state, staff_id, None).await?;
    let today = state.clock.local_now().date();
    let month = reports::parse_report_month(month, today);
    let orders = state.orders.list_orders().await?;
    Ok(reports::monthly_report(&orders, &state.customer_names().await?, month, today))
}

pub async fn todays_orders(state: &AppState, staff_id: Uuid) -> AppResult<TodaysOrders> {
    require(state, staff_id, Some(Permission::TodaysOrders)).await?;
    let orders = state.orders.list_orders().await?;
    Ok(reports::todays_orders(
        &orders,
        &state.customer_names().await?,
        state.clock.local_now().date(),
    ))
}

pub async fn all_transactions(state: &AppState, staff_id: Uuid, page: Option<&str>) -> AppResult<TransactionsOverview> {
    require(state, staff_id, None).await?;
    let orders = state.orders.list_orders().await?;
    Ok(reports::all_transactions(&orders, &state.customer_names().await?, page))
}

pub async fn sales_sheet(state: &AppState, staff_id: Uuid) -> AppResult<SalesSheet> {
    require(state, staff_id, Some(Permission::SalesSheet)).await?;
    let orders = state.orders.list_orders().await?;
    let items = state.catalog.list_items().await?;
    Ok(reports::sales_sheet(&orders, &items, state.clock.local_now().date()))
}

pub async fn customer_ranking(state: &AppState, staff_id: Uuid) -> AppResult<Vec<CustomerRanking>> {
    require(state, staff_id, Some(Permission::ManageCustomers)).await?;
    let customers = state.customers.list_customers().await?;
    let orders = state.orders.list_orders().await?;
    Ok(customer_reports::customer_ranking(
        &customers,
        &orders,
        state.clock.local_now().date(),
    ))
}

pub async fn customer_analytics(state: &AppState, staff_id: Uuid) -> AppResult<CustomerAnalytics> {
    require(state, staff_id, Some(Permission::ManageCustomers)).await?;
    let customers = state.customers.list_customers().await?;
    let orders = state.orders.list_orders().await?;
    let today = state.clock.local_now().date();
    Ok(CustomerAnalytics {
        overview: customer_reports::analytics_overview(&customers, &orders, today),
        customers: customer_reports::customer_activity(&customers, &orders, today),
    })
}
