use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use juiceville_core::identity::Customer;
use juiceville_shared::money::{average, naira};
use juiceville_shared::{Kobo, Page};
use serde::Serialize;
use uuid::Uuid;

use crate::models::Order;

pub const HISTORY_PER_PAGE: usize = 10;
pub const TOP_SPENDERS: usize = 10;

/// Name to show for a customer; the e-mail stands in until a name is set.
pub fn display_name(customer: &Customer) -> String {
    if customer.name.trim().is_empty() {
        customer.email.expose().clone()
    } else {
        customer.name.clone()
    }
}

/// Finalized-order totals for one customer.
#[derive(Debug, Clone, Copy, Default)]
struct Spend {
    orders: usize,
    total_kobo: Kobo,
    first: Option<NaiveDate>,
    last: Option<NaiveDate>,
}

fn spend_by_customer(orders: &[Order]) -> HashMap<Uuid, Spend> {
    let mut spend: HashMap<Uuid, Spend> = HashMap::new();
    for order in orders.iter().filter(|o| o.is_finalized()) {
        let entry = spend.entry(order.customer_id).or_default();
        let placed = order.placed_on();
        entry.orders += 1;
        entry.total_kobo = entry.total_kobo.saturating_add(order.grand_total_kobo);
        entry.first = Some(entry.first.map_or(placed, |d| d.min(placed)));
        entry.last = Some(entry.last.map_or(placed, |d| d.max(placed)));
    }
    spend
}

// ============================================================================
// Customer's own history
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CustomerHistory {
    pub page: Page<Order>,
    pub total_orders: usize,
    pub current_points: u32,
    pub points_used: u32,
}

/// Paid orders the customer has not hidden, newest first, with loyalty stats
/// over all their paid orders.
pub fn customer_history(
    customer: &Customer,
    orders: Vec<Order>,
    page: Option<&str>,
    redeem_cost: u32,
) -> CustomerHistory {
    let paid: Vec<Order> = orders
        .into_iter()
        .filter(|o| o.customer_id == customer.id && o.is_finalized())
        .collect();

    let redeemed = paid.iter().filter(|o| o.used_loyalty_points).count();
    let total_orders = paid.len();

    let mut visible: Vec<Order> = paid.into_iter().filter(|o| !o.hidden_from_customer).collect();
    visible.sort_by(|a, b| (b.placed_on(), b.time_placed).cmp(&(a.placed_on(), a.time_placed)));

    CustomerHistory {
        page: Page::from_request(visible, page, HISTORY_PER_PAGE),
        total_orders,
        current_points: customer.loyalty_points,
        points_used: u32::try_from(redeemed).unwrap_or(u32::MAX).saturating_mul(redeem_cost),
    }
}

// ============================================================================
// Ranking
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CustomerTier {
    #[serde(rename = "New Customer")]
    NewCustomer,
    Standard,
    Bronze,
    Silver,
    Gold,
    #[serde(rename = "VIP")]
    Vip,
}

impl CustomerTier {
    pub fn for_spend(total_orders: usize, total_spent_kobo: Kobo) -> Self {
        match total_spent_kobo {
            _ if total_orders == 0 => Self::NewCustomer,
            s if s > naira(50_000) => Self::Vip,
            s if s > naira(20_000) => Self::Gold,
            s if s > naira(10_000) => Self::Silver,
            s if s > naira(5_000) => Self::Bronze,
            _ => Self::Standard,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerRanking {
    pub rank: usize,
    pub customer_id: Uuid,
    pub name: String,
    pub joined_on: NaiveDate,
    pub total_orders: usize,
    pub total_spent_kobo: Kobo,
    pub average_order_kobo: Kobo,
    pub tier: CustomerTier,
    pub last_order_date: Option<NaiveDate>,
    pub days_since_last_order: Option<i64>,
    pub delivery_zone_id: Option<Uuid>,
}

/// Every customer ranked by finalized spend, highest first. Ties go to the
/// customer whose last order is oldest, with never-ordered customers ahead.
pub fn customer_ranking(customers: &[Customer], orders: &[Order], today: NaiveDate) -> Vec<CustomerRanking> {
    let spend = spend_by_customer(orders);

    let mut rows: Vec<CustomerRanking> = customers
        .iter()
        .map(|customer| {
            let s = spend.get(&customer.id).copied().unwrap_or_default();
            CustomerRanking {
                rank: 0,
                customer_id: customer.id,
                name: display_name(customer),
                joined_on: customer.joined_at.date_naive(),
                total_orders: s.orders,
                total_spent_kobo: s.total_kobo,
                average_order_kobo: average(s.total_kobo, s.orders),
                tier: CustomerTier::for_spend(s.orders, s.total_kobo),
                last_order_date: s.last,
                days_since_last_order: s.last.map(|d| (today - d).num_days()),
                delivery_zone_id: customer.delivery_zone_id,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total_spent_kobo
            .cmp(&a.total_spent_kobo)
            .then_with(|| a.last_order_date.cmp(&b.last_order_date))
            .then_with(|| a.name.cmp(&b.name))
    });
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i + 1;
    }
    rows
}

// ============================================================================
// Analytics
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActivityStatus {
    Inactive,
    New,
    Frequent,
    Regular,
    Occasional,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerActivity {
    pub customer_id: Uuid,
    pub name: String,
    pub joined_on: NaiveDate,
    pub age_days: i64,
    pub total_orders: usize,
    pub total_spent_kobo: Kobo,
    pub average_order_kobo: Kobo,
    /// Average days between orders; zero with fewer than two orders
    pub order_frequency_days: f64,
    pub loyalty_points: u32,
    pub status: ActivityStatus,
}

pub fn customer_activity(customers: &[Customer], orders: &[Order], today: NaiveDate) -> Vec<CustomerActivity> {
    let spend = spend_by_customer(orders);

    let mut rows: Vec<CustomerActivity> = customers
        .iter()
        .map(|customer| {
            let s = spend.get(&customer.id).copied().unwrap_or_default();
            let joined_on = customer.joined_at.date_naive();
            let age_days = (today - joined_on).num_days();

            let order_frequency_days = match (s.first, s.last) {
                (Some(first), Some(last)) if s.orders > 1 => (last - first).num_days() as f64 / s.orders as f64,
                _ => 0.0,
            };

            let status = if s.orders == 0 {
                ActivityStatus::Inactive
            } else if age_days < 30 {
                ActivityStatus::New
            } else if order_frequency_days < 7.0 {
                ActivityStatus::Frequent
            } else if order_frequency_days < 30.0 {
                ActivityStatus::Regular
            } else {
                ActivityStatus::Occasional
            };

            CustomerActivity {
                customer_id: customer.id,
                name: display_name(customer),
                joined_on,
                age_days,
                total_orders: s.orders,
                total_spent_kobo: s.total_kobo,
                average_order_kobo: average(s.total_kobo, s.orders),
                order_frequency_days,
                loyalty_points: customer.loyalty_points,
                status,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.total_spent_kobo.cmp(&a.total_spent_kobo));
    rows
}

#[derive(Debug, Clone, Serialize)]
pub struct TopSpender {
    pub customer_id: Uuid,
    pub name: String,
    pub order_count: usize,
    pub total_spent_kobo: Kobo,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsOverview {
    pub total_customers: usize,
    pub customers_with_phone: usize,
    pub phone_percentage: f64,
    pub new_this_month: usize,
    pub top_spenders: Vec<TopSpender>,
}

pub fn analytics_overview(customers: &[Customer], orders: &[Order], today: NaiveDate) -> AnalyticsOverview {
    let total_customers = customers.len();
    let customers_with_phone = customers.iter().filter(|c| c.has_phone()).count();
    let new_this_month = customers
        .iter()
        .filter(|c| {
            let joined = c.joined_at.date_naive();
            joined.year() == today.year() && joined.month() == today.month()
        })
        .count();

    let top_spenders = customer_ranking(customers, orders, today)
        .into_iter()
        .take(TOP_SPENDERS)
        .map(|row| TopSpender {
            customer_id: row.customer_id,
            name: row.name,
            order_count: row.total_orders,
            total_spent_kobo: row.total_spent_kobo,
        })
        .collect();

    AnalyticsOverview {
        total_customers,
        customers_with_phone,
        phone_percentage: if total_customers == 0 {
            0.0
        } else {
            customers_with_phone as f64 / total_customers as f64 * 100.0
        },
        new_this_month,
        top_spenders,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderStatus;
    use chrono::{Duration, NaiveTime, Utc};
    use juiceville_shared::Masked;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn customer(name: &str, joined: NaiveDate) -> Customer {
        let mut c = Customer::new(&format!("{}@example.com", name.to_lowercase()));
        c.name = name.to_string();
        c.joined_at = joined.and_hms_opt(10, 0, 0).unwrap().and_utc();
        c
    }

    fn paid(customer: &Customer, date: NaiveDate, total_kobo: Kobo) -> Order {
        let mut order = Order::new(customer.id, 0, Utc::now());
        order.status = OrderStatus::Finalized;
        order.grand_total_kobo = total_kobo;
        order.date_placed = Some(date);
        order.time_placed = NaiveTime::from_hms_opt(12, 0, 0);
        order
    }

    #[test]
    fn test_tiers() {
        assert_eq!(CustomerTier::for_spend(0, 0), CustomerTier::NewCustomer);
        assert_eq!(CustomerTier::for_spend(1, naira(5_000)), CustomerTier::Standard);
        assert_eq!(CustomerTier::for_spend(1, naira(5_000) + 1), CustomerTier::Bronze);
        assert_eq!(CustomerTier::for_spend(3, naira(20_001)), CustomerTier::Gold);
        assert_eq!(CustomerTier::for_spend(9, naira(60_000)), CustomerTier::Vip);
    }

    #[test]
    fn test_ranking_by_spend() {
        let today = d(2025, 6, 1);
        let ada = customer("Ada", d(2025, 1, 1));
        let bola = customer("Bola", d(2025, 1, 1));
        let chi = customer("Chi", d(2025, 5, 20));

        let mut open = paid(&chi, today, naira(99_000));
        open.status = OrderStatus::Open;
        let orders = vec![
            paid(&ada, d(2025, 5, 1), naira(8_000)),
            paid(&bola, d(2025, 5, 25), naira(15_000)),
            paid(&bola, d(2025, 5, 28), naira(10_000)),
            open,
        ];

        let ranking = customer_ranking(&[ada.clone(), bola.clone(), chi.clone()], &orders, today);
        assert_eq!(ranking[0].customer_id, bola.id);
        assert_eq!(ranking[0].rank, 1);
        assert_eq!(ranking[0].tier, CustomerTier::Gold);
        assert_eq!(ranking[0].average_order_kobo, naira(12_500));
        assert_eq!(ranking[0].days_since_last_order, Some(4));
        assert_eq!(ranking[1].tier, CustomerTier::Bronze);
        assert_eq!(ranking[2].customer_id, chi.id);
        assert_eq!(ranking[2].tier, CustomerTier::NewCustomer);
        assert_eq!(ranking[2].last_order_date, None);
    }

    #[test]
    fn test_ranking_ties_favour_longest_absence() {
        let today = d(2025, 6, 1);
        let recent = customer("Recent", d(2025, 1, 1));
        let lapsed = customer("Lapsed", d(2025, 1, 1));
        let never = customer("Never", d(2025, 1, 1));
        let orders = vec![
            paid(&recent, d(2025, 5, 30), naira(0)),
            paid(&lapsed, d(2025, 2, 1), naira(0)),
        ];

        let ranking = customer_ranking(&[recent.clone(), lapsed.clone(), never.clone()], &orders, today);
        let ids: Vec<Uuid> = ranking.iter().map(|r| r.customer_id).collect();
        assert_eq!(ids, vec![never.id, lapsed.id, recent.id]);
    }

    #[test]
    fn test_activity_status() {
        let today = d(2025, 6, 1);
        let regular = customer("Regular", d(2024, 1, 1));
        let fresh = customer("Fresh", today - Duration::days(10));
        let idle = customer("Idle", d(2024, 1, 1));

        let orders = vec![
            paid(&regular, d(2025, 1, 1), 1),
            paid(&regular, d(2025, 2, 15), 1),
            paid(&fresh, today, 1),
        ];
        let rows = customer_activity(&[regular.clone(), fresh.clone(), idle.clone()], &orders, today);
        let status_of = |id: Uuid| rows.iter().find(|r| r.customer_id == id).unwrap().status;

        // 45 days across 2 orders
        assert_eq!(status_of(regular.id), ActivityStatus::Regular);
        assert_eq!(status_of(fresh.id), ActivityStatus::New);
        assert_eq!(status_of(idle.id), ActivityStatus::Inactive);
    }

    #[test]
    fn test_overview() {
        let today = d(2025, 6, 10);
        let mut with_phone = customer("Ada", d(2025, 6, 2));
        with_phone.phone = Masked::from("08031234567");
        let without = customer("Bola", d(2025, 1, 2));

        let overview = analytics_overview(&[with_phone, without], &[], today);
        assert_eq!(overview.total_customers, 2);
        assert_eq!(overview.customers_with_phone, 1);
        assert_eq!(overview.phone_percentage, 50.0);
        assert_eq!(overview.new_this_month, 1);
        assert_eq!(overview.top_spenders.len(), 2);
    }

    #[test]
    fn test_history_hides_and_counts_redemptions() {
        let mut ada = customer("Ada", d(2025, 1, 1));
        ada.loyalty_points = 12;

        let mut redeemed = paid(&ada, d(2025, 3, 1), 100);
        redeemed.used_loyalty_points = true;
        let mut hidden = paid(&ada, d(2025, 3, 2), 100);
        hidden.hidden_from_customer = true;
        let latest = paid(&ada, d(2025, 3, 3), 100);
        let latest_id = latest.id;
        let cart = Order::new(ada.id, 0, Utc::now());

        let history = customer_history(&ada, vec![redeemed, hidden, latest, cart], None, 50);
        assert_eq!(history.total_orders, 3);
        assert_eq!(history.points_used, 50);
        assert_eq!(history.current_points, 12);
        assert_eq!(history.page.total, 2);
        assert_eq!(history.page.items[0].id, latest_id);
    }
}
