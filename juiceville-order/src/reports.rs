use std::collections::HashMap;

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveTime};
use juiceville_catalog::{Category, Item};
use juiceville_shared::money::{self, average};
use juiceville_shared::{Kobo, Page};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{LineTarget, Order, OrderStatus};
use crate::reconciler::CatalogSnapshot;

pub const ALL_TRANSACTIONS_PER_PAGE: usize = 50;
pub const TOP_LINES: usize = 10;
/// How far back the month picker goes, including the current month.
pub const MONTH_CHOICES: u32 = 24;
/// Earliest year a monthly report may ask for.
pub const FIRST_REPORT_YEAR: i32 = 2020;

/// Customer id → display name, for labelling report rows.
pub type CustomerNames = HashMap<Uuid, String>;

fn customer_name(names: &CustomerNames, id: Uuid) -> String {
    names.get(&id).cloned().unwrap_or_else(|| "Unknown customer".to_string())
}

fn placed_sort_key(order: &Order) -> (NaiveDate, Option<NaiveTime>) {
    (order.placed_on(), order.time_placed)
}

fn revenue<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Kobo {
    money::total(orders.into_iter().map(|o| o.grand_total_kobo))
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderRow {
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub time_placed: Option<NaiveTime>,
    pub grand_total_kobo: Kobo,
    pub status: OrderStatus,
    pub payment_reference: Option<String>,
}

impl OrderRow {
    fn new(order: &Order, names: &CustomerNames) -> Self {
        Self {
            order_id: order.id,
            customer_id: order.customer_id,
            customer_name: customer_name(names, order.customer_id),
            time_placed: order.time_placed,
            grand_total_kobo: order.grand_total_kobo,
            status: order.status,
            payment_reference: order.payment_reference.clone(),
        }
    }
}

// ============================================================================
// Daily report
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct LineSales {
    pub label: String,
    pub quantity: u32,
    pub revenue_kobo: Kobo,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub orders: Vec<OrderRow>,
    pub total_orders: usize,
    pub total_revenue_kobo: Kobo,
    pub delivered_orders: usize,
    pub average_order_value_kobo: Kobo,
    pub top_lines: Vec<LineSales>,
    pub previous_date: NaiveDate,
    pub next_date: NaiveDate,
}

/// `YYYY-MM-DD`, falling back to `today` when missing or malformed.
pub fn parse_report_date(param: Option<&str>, today: NaiveDate) -> NaiveDate {
    param
        .and_then(|p| NaiveDate::parse_from_str(p.trim(), "%Y-%m-%d").ok())
        .unwrap_or(today)
}

pub fn daily_report(
    orders: &[Order],
    catalog: &CatalogSnapshot,
    names: &CustomerNames,
    date: NaiveDate,
) -> DailyReport {
    let mut day: Vec<&Order> = orders
        .iter()
        .filter(|o| o.is_finalized() && o.date_placed == Some(date))
        .collect();
    day.sort_by_key(|o| o.time_placed);

    let total_revenue_kobo = revenue(day.iter().copied());
    let mut by_label: HashMap<String, LineSales> = HashMap::new();
    for line in day.iter().flat_map(|o| o.lines.iter()) {
        let Some(label) = catalog.label(line.target) else {
            continue;
        };
        let entry = by_label.entry(label.clone()).or_insert(LineSales {
            label,
            quantity: 0,
            revenue_kobo: 0,
        });
        entry.quantity = entry.quantity.saturating_add(line.quantity);
        entry.revenue_kobo = entry.revenue_kobo.saturating_add(line.price());
    }
    let mut top_lines: Vec<LineSales> = by_label.into_values().collect();
    top_lines.sort_by(|a, b| b.revenue_kobo.cmp(&a.revenue_kobo).then_with(|| a.label.cmp(&b.label)));
    top_lines.truncate(TOP_LINES);

    DailyReport {
        date,
        total_orders: day.len(),
        total_revenue_kobo,
        delivered_orders: day.iter().filter(|o| o.is_delivered()).count(),
        average_order_value_kobo: average(total_revenue_kobo, day.len()),
        orders: day.into_iter().map(|o| OrderRow::new(o, names)).collect(),
        top_lines,
        previous_date: date - Duration::days(1),
        next_date: date + Duration::days(1),
    }
}

// ============================================================================
// Monthly report
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportMonth {
    pub year: i32,
    pub month: u32,
}

impl ReportMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first_day()
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// `YYYY-MM`
    pub fn value(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }

    pub fn label(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

/// Parse `YYYY-MM`. Anything unparsable means the current month; an
/// out-of-range month or year is replaced by the current one on its own.
pub fn parse_report_month(param: Option<&str>, today: NaiveDate) -> ReportMonth {
    let current = ReportMonth::of(today);

    let parsed = param.and_then(|p| {
        let (year, month) = p.trim().split_once('-')?;
        Some((year.parse::<i32>().ok()?, month.parse::<u32>().ok()?))
    });
    let Some((year, month)) = parsed else {
        return current;
    };

    ReportMonth {
        year: if (FIRST_REPORT_YEAR..=current.year + 1).contains(&year) {
            year
        } else {
            current.year
        },
        month: if (1..=12).contains(&month) { month } else { current.month },
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthChoice {
    pub value: String,
    pub label: String,
}

/// The current month and the ones before it, newest first.
pub fn month_choices(today: NaiveDate) -> Vec<MonthChoice> {
    let first = ReportMonth::of(today).first_day();
    (0..MONTH_CHOICES)
        .filter_map(|back| first.checked_sub_months(Months::new(back)))
        .map(|date| {
            let month = ReportMonth::of(date);
            MonthChoice {
                value: month.value(),
                label: month.label(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventStatus {
    #[serde(rename = "Pending Payment")]
    PendingPayment,
    Processing,
    Delivered,
}

impl EventStatus {
    pub fn of(order: &Order) -> Self {
        match order.status {
            OrderStatus::Open => Self::PendingPayment,
            OrderStatus::Finalized => Self::Processing,
            OrderStatus::Delivered => Self::Delivered,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::PendingPayment => "Pending Payment",
            Self::Processing => "Processing",
            Self::Delivered => "Delivered",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderEvent {
    pub order: OrderRow,
    pub status: EventStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayBreakdown {
    pub date: NaiveDate,
    pub orders_count: usize,
    pub finalized_orders: usize,
    pub delivered_orders: usize,
    pub revenue_kobo: Kobo,
    pub pending_revenue_kobo: Kobo,
    pub events: Vec<OrderEvent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReport {
    pub month: ReportMonth,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: Vec<DayBreakdown>,
    pub total_orders: usize,
    pub finalized_orders: usize,
    pub delivered_orders: usize,
    pub total_revenue_kobo: Kobo,
    pub pending_revenue_kobo: Kobo,
    pub business_days: usize,
    pub average_daily_revenue_kobo: Kobo,
    pub average_order_value_kobo: Kobo,
    pub delivery_rate_percent: f64,
    pub month_choices: Vec<MonthChoice>,
}

/// Audit view of a month: every order, paid or not.
pub fn monthly_report(orders: &[Order], names: &CustomerNames, month: ReportMonth, today: NaiveDate) -> MonthlyReport {
    let mut in_month: Vec<&Order> = orders.iter().filter(|o| month.contains(o.placed_on())).collect();
    in_month.sort_by_key(|o| placed_sort_key(o));

    let mut days: Vec<DayBreakdown> = Vec::new();
    for order in &in_month {
        let date = order.placed_on();
        if days.last().map(|d| d.date) != Some(date) {
            days.push(DayBreakdown {
                date,
                orders_count: 0,
                finalized_orders: 0,
                delivered_orders: 0,
                revenue_kobo: 0,
                pending_revenue_kobo: 0,
                events: Vec::new(),
            });
        }
        let Some(day) = days.last_mut() else { continue };

        day.orders_count += 1;
        if order.is_finalized() {
            day.finalized_orders += 1;
            day.revenue_kobo = day.revenue_kobo.saturating_add(order.grand_total_kobo);
            if order.is_delivered() {
                day.delivered_orders += 1;
            }
        } else {
            day.pending_revenue_kobo = day.pending_revenue_kobo.saturating_add(order.grand_total_kobo);
        }
        day.events.push(OrderEvent {
            order: OrderRow::new(order, names),
            status: EventStatus::of(order),
        });
    }

    let finalized: Vec<&Order> = in_month.iter().copied().filter(|o| o.is_finalized()).collect();
    let delivered_orders = finalized.iter().filter(|o| o.is_delivered()).count();
    let total_revenue_kobo = revenue(finalized.iter().copied());
    let pending_revenue_kobo = revenue(in_month.iter().copied().filter(|o| !o.is_finalized()));
    let delivery_rate_percent = if finalized.is_empty() {
        0.0
    } else {
        delivered_orders as f64 / finalized.len() as f64 * 100.0
    };

    MonthlyReport {
        month,
        start_date: month.first_day(),
        end_date: month.last_day(),
        total_orders: in_month.len(),
        finalized_orders: finalized.len(),
        delivered_orders,
        total_revenue_kobo,
        pending_revenue_kobo,
        business_days: days.len(),
        average_daily_revenue_kobo: average(total_revenue_kobo, days.len()),
        average_order_value_kobo: average(total_revenue_kobo, finalized.len()),
        delivery_rate_percent,
        days,
        month_choices: month_choices(today),
    }
}

// ============================================================================
// Operational views
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct TodaysOrders {
    pub date: NaiveDate,
    pub orders: Vec<OrderRow>,
    pub pending_count: usize,
    pub delivered_count: usize,
    pub total_count: usize,
    pub total_revenue_kobo: Kobo,
}

/// Paid orders placed on `today`, latest first.
pub fn todays_orders(orders: &[Order], names: &CustomerNames, today: NaiveDate) -> TodaysOrders {
    let mut paid: Vec<&Order> = orders
        .iter()
        .filter(|o| o.is_finalized() && o.date_placed == Some(today))
        .collect();
    paid.sort_by(|a, b| b.time_placed.cmp(&a.time_placed));

    let delivered_count = paid.iter().filter(|o| o.is_delivered()).count();
    TodaysOrders {
        date: today,
        pending_count: paid.len() - delivered_count,
        delivered_count,
        total_count: paid.len(),
        total_revenue_kobo: revenue(paid.iter().copied()),
        orders: paid.into_iter().map(|o| OrderRow::new(o, names)).collect(),
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PendingDashboard {
    pub orders: Vec<OrderRow>,
    pub count: usize,
    pub pending_revenue_kobo: Kobo,
}

/// Paid orders still waiting for delivery, oldest first.
pub fn pending_dashboard(orders: &[Order], names: &CustomerNames) -> PendingDashboard {
    let mut pending: Vec<&Order> = orders.iter().filter(|o| o.status == OrderStatus::Finalized).collect();
    pending.sort_by_key(|o| placed_sort_key(o));

    PendingDashboard {
        count: pending.len(),
        pending_revenue_kobo: revenue(pending.iter().copied()),
        orders: pending.into_iter().map(|o| OrderRow::new(o, names)).collect(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionsOverview {
    pub page: Page<OrderRow>,
    pub total_orders: usize,
    pub total_revenue_kobo: Kobo,
    pub delivered_orders: usize,
    pub pending_orders: usize,
}

pub fn all_transactions(orders: &[Order], names: &CustomerNames, page: Option<&str>) -> TransactionsOverview {
    let mut paid: Vec<&Order> = orders.iter().filter(|o| o.is_finalized()).collect();
    paid.sort_by(|a, b| placed_sort_key(b).cmp(&placed_sort_key(a)));

    let delivered_orders = paid.iter().filter(|o| o.is_delivered()).count();
    TransactionsOverview {
        total_orders: paid.len(),
        total_revenue_kobo: revenue(paid.iter().copied()),
        delivered_orders,
        pending_orders: paid.len() - delivered_orders,
        page: Page::from_request(
            paid.into_iter().map(|o| OrderRow::new(o, names)).collect(),
            page,
            ALL_TRANSACTIONS_PER_PAGE,
        ),
    }
}

// ============================================================================
// Sales sheet
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SalesRow {
    pub category: Category,
    pub item_id: Uuid,
    pub name: String,
    pub quantity: u32,
    pub sales_kobo: Kobo,
}

#[derive(Debug, Clone, Serialize)]
pub struct SalesSheet {
    pub date: NaiveDate,
    pub rows: Vec<SalesRow>,
    pub net_sales_kobo: Kobo,
}

/// One row per catalog item, in menu order, with what it sold on `date`.
/// Combo lines are not attributed to their component items.
pub fn sales_sheet(orders: &[Order], items: &[Item], date: NaiveDate) -> SalesSheet {
    let mut sold: HashMap<Uuid, (u32, Kobo)> = HashMap::new();
    for line in orders
        .iter()
        .filter(|o| o.is_finalized() && o.date_placed == Some(date))
        .flat_map(|o| o.lines.iter())
    {
        if let LineTarget::Item(item_id) = line.target {
            let entry = sold.entry(item_id).or_default();
            entry.0 = entry.0.saturating_add(line.quantity);
            entry.1 = entry.1.saturating_add(line.price());
        }
    }

    let mut sorted: Vec<&Item> = items.iter().collect();
    sorted.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));

    let rows: Vec<SalesRow> = sorted
        .into_iter()
        .map(|item| {
            let (quantity, sales_kobo) = sold.get(&item.id).copied().unwrap_or_default();
            SalesRow {
                category: item.category,
                item_id: item.id,
                name: item.name.clone(),
                quantity,
                sales_kobo,
            }
        })
        .collect();

    SalesSheet {
        date,
        net_sales_kobo: money::total(rows.iter().map(|r| r.sales_kobo)),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LineItem;
    use chrono::Utc;
    use juiceville_catalog::ItemDraft;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn item(name: &str, category: Category, rate_kobo: Kobo) -> Item {
        Item::from_draft(ItemDraft {
            name: name.to_string(),
            category,
            description: String::new(),
            rate_kobo,
            is_non_veg: false,
            stock: None,
            rating: None,
        })
        .unwrap()
    }

    fn placed(date: NaiveDate, hour: u32, status: OrderStatus, lines: Vec<LineItem>) -> Order {
        let mut order = Order::new(Uuid::new_v4(), 0, Utc::now());
        order.grand_total_kobo = lines.iter().map(|l| l.price()).sum();
        order.subtotal_kobo = order.grand_total_kobo;
        order.lines = lines;
        order.status = status;
        if status != OrderStatus::Open {
            order.date_placed = Some(date);
            order.time_placed = NaiveTime::from_hms_opt(hour, 0, 0);
        }
        order
    }

    fn priced(target: LineTarget, quantity: u32, price_kobo: Kobo) -> LineItem {
        let mut line = LineItem::new(target, quantity);
        line.price_kobo = Some(price_kobo);
        line
    }

    #[test]
    fn test_parse_report_month() {
        let today = d(2025, 6, 15);
        assert_eq!(parse_report_month(Some("2024-02"), today), ReportMonth { year: 2024, month: 2 });
        assert_eq!(parse_report_month(Some("garbage"), today), ReportMonth::of(today));
        assert_eq!(parse_report_month(None, today), ReportMonth::of(today));
        assert_eq!(parse_report_month(Some("2024-13"), today), ReportMonth { year: 2024, month: 6 });
        assert_eq!(parse_report_month(Some("2019-03"), today), ReportMonth { year: 2025, month: 3 });
        assert_eq!(parse_report_month(Some("2026-01"), today), ReportMonth { year: 2026, month: 1 });
    }

    #[test]
    fn test_month_bounds_and_choices() {
        let feb = ReportMonth { year: 2024, month: 2 };
        assert_eq!(feb.last_day(), d(2024, 2, 29));
        assert_eq!(feb.label(), "February 2024");

        let choices = month_choices(d(2025, 3, 31));
        assert_eq!(choices.len(), 24);
        assert_eq!(choices[0].value, "2025-03");
        assert_eq!(choices[3].value, "2024-12");
        assert_eq!(choices[23].value, "2023-04");
    }

    #[test]
    fn test_daily_report() {
        let rice = item("Jollof Rice", Category::Ml, 100_000);
        let zobo = item("Zobo", Category::Dr, 30_000);
        let catalog = CatalogSnapshot::from_parts(vec![rice.clone(), zobo.clone()], vec![]);
        let day = d(2025, 5, 1);

        let orders = vec![
            placed(day, 14, OrderStatus::Delivered, vec![priced(LineTarget::Item(rice.id), 2, 200_000)]),
            placed(
                day,
                10,
                OrderStatus::Finalized,
                vec![
                    priced(LineTarget::Item(rice.id), 1, 100_000),
                    priced(LineTarget::Item(zobo.id), 1, 30_000),
                ],
            ),
            placed(day, 9, OrderStatus::Open, vec![priced(LineTarget::Item(zobo.id), 5, 150_000)]),
            placed(d(2025, 5, 2), 9, OrderStatus::Finalized, vec![priced(LineTarget::Item(zobo.id), 1, 30_000)]),
        ];

        let report = daily_report(&orders, &catalog, &CustomerNames::new(), day);
        assert_eq!(report.total_orders, 2);
        assert_eq!(report.total_revenue_kobo, 330_000);
        assert_eq!(report.delivered_orders, 1);
        assert_eq!(report.average_order_value_kobo, 165_000);
        assert_eq!(report.orders[0].time_placed, NaiveTime::from_hms_opt(10, 0, 0));
        assert_eq!(report.top_lines[0].label, "Jollof Rice");
        assert_eq!(report.top_lines[0].quantity, 3);
        assert_eq!(report.previous_date, d(2025, 4, 30));
    }

    #[test]
    fn test_monthly_report_counts_pending_separately() {
        let day = d(2025, 5, 3);
        let mut open = placed(day, 0, OrderStatus::Open, vec![]);
        open.grand_total_kobo = 40_000;
        open.created_at = day.and_hms_opt(12, 0, 0).unwrap().and_utc();

        let orders = vec![
            placed(day, 9, OrderStatus::Finalized, vec![priced(LineTarget::Item(Uuid::new_v4()), 1, 100_000)]),
            placed(day, 11, OrderStatus::Delivered, vec![priced(LineTarget::Item(Uuid::new_v4()), 1, 300_000)]),
            placed(d(2025, 5, 20), 11, OrderStatus::Delivered, vec![priced(LineTarget::Item(Uuid::new_v4()), 1, 200_000)]),
            placed(d(2025, 4, 30), 11, OrderStatus::Delivered, vec![priced(LineTarget::Item(Uuid::new_v4()), 1, 900_000)]),
            open,
        ];

        let report = monthly_report(
            &orders,
            &CustomerNames::new(),
            ReportMonth { year: 2025, month: 5 },
            d(2025, 6, 1),
        );
        assert_eq!(report.total_orders, 4);
        assert_eq!(report.finalized_orders, 3);
        assert_eq!(report.delivered_orders, 2);
        assert_eq!(report.total_revenue_kobo, 600_000);
        assert_eq!(report.pending_revenue_kobo, 40_000);
        assert_eq!(report.business_days, 2);
        assert_eq!(report.average_daily_revenue_kobo, 300_000);
        assert_eq!(report.average_order_value_kobo, 200_000);
        assert!((report.delivery_rate_percent - 66.666).abs() < 0.01);

        let first_day = &report.days[0];
        assert_eq!(first_day.orders_count, 3);
        assert_eq!(first_day.pending_revenue_kobo, 40_000);
        assert!(first_day
            .events
            .iter()
            .any(|e| e.status == EventStatus::PendingPayment));
    }

    #[test]
    fn test_todays_orders_and_dashboard() {
        let today = d(2025, 5, 1);
        let orders = vec![
            placed(today, 8, OrderStatus::Finalized, vec![priced(LineTarget::Item(Uuid::new_v4()), 1, 100_000)]),
            placed(today, 12, OrderStatus::Delivered, vec![priced(LineTarget::Item(Uuid::new_v4()), 1, 50_000)]),
            placed(d(2025, 4, 30), 20, OrderStatus::Finalized, vec![priced(LineTarget::Item(Uuid::new_v4()), 1, 70_000)]),
        ];
        let names = CustomerNames::new();

        let todays = todays_orders(&orders, &names, today);
        assert_eq!(todays.total_count, 2);
        assert_eq!(todays.pending_count, 1);
        assert_eq!(todays.total_revenue_kobo, 150_000);
        assert_eq!(todays.orders[0].time_placed, NaiveTime::from_hms_opt(12, 0, 0));

        let dashboard = pending_dashboard(&orders, &names);
        assert_eq!(dashboard.count, 2);
        assert_eq!(dashboard.pending_revenue_kobo, 170_000);
        assert_eq!(dashboard.orders[0].order_id, orders[2].id);
    }

    #[test]
    fn test_all_transactions_newest_first() {
        let orders: Vec<Order> = (1..=3)
            .map(|day| placed(d(2025, 5, day), 9, OrderStatus::Finalized, vec![]))
            .collect();
        let overview = all_transactions(&orders, &CustomerNames::new(), None);

        assert_eq!(overview.total_orders, 3);
        assert_eq!(overview.page.items[0].order_id, orders[2].id);
        assert!(!overview.page.is_paginated());
    }

    #[test]
    fn test_sales_sheet_in_menu_order() {
        let drink = item("Zobo", Category::Dr, 30_000);
        let cake = item("Cheesecake", Category::Ck, 200_000);
        let today = d(2025, 5, 1);
        let orders = vec![placed(
            today,
            9,
            OrderStatus::Finalized,
            vec![
                priced(LineTarget::Item(drink.id), 3, 90_000),
                priced(LineTarget::Combo(Uuid::new_v4()), 1, 500_000),
            ],
        )];

        let sheet = sales_sheet(&orders, &[drink.clone(), cake.clone()], today);
        assert_eq!(sheet.rows[0].item_id, cake.id);
        assert_eq!(sheet.rows[0].quantity, 0);
        assert_eq!(sheet.rows[1].quantity, 3);
        assert_eq!(sheet.net_sales_kobo, 90_000);
    }
}
