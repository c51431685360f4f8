use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use juiceville_catalog::{CatalogRepository, Combo, Item, StockOutcome};
use juiceville_core::identity::Customer;
use juiceville_core::CoreError;
use juiceville_shared::events::StockShortfallEvent;
use juiceville_shared::{money, Kobo};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{LineTarget, Order, OrderStatus};
use crate::OrderError;

/// Loyalty programme constants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LoyaltyRules {
    /// Flat discount granted by one redemption
    pub discount_kobo: Kobo,
    /// Points spent per redemption
    pub redeem_cost: u32,
    /// One point is earned per this much subtotal
    pub earn_unit_kobo: Kobo,
}

impl Default for LoyaltyRules {
    fn default() -> Self {
        Self {
            discount_kobo: 250_000,
            redeem_cost: 50,
            earn_unit_kobo: 100_000,
        }
    }
}

impl LoyaltyRules {
    pub fn can_redeem(&self, points: u32) -> bool {
        points >= self.redeem_cost
    }

    pub fn points_for(&self, subtotal_kobo: Kobo) -> u32 {
        if self.earn_unit_kobo <= 0 || subtotal_kobo <= 0 {
            return 0;
        }
        u32::try_from(subtotal_kobo / self.earn_unit_kobo).unwrap_or(u32::MAX)
    }
}

/// Unit rates and combo composition, read once per reconciliation.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    items: HashMap<Uuid, Item>,
    combos: HashMap<Uuid, Combo>,
}

impl CatalogSnapshot {
    pub fn from_parts(items: Vec<Item>, combos: Vec<Combo>) -> Self {
        Self {
            items: items.into_iter().map(|item| (item.id, item)).collect(),
            combos: combos.into_iter().map(|combo| (combo.id, combo)).collect(),
        }
    }

    pub async fn load(catalog: &dyn CatalogRepository) -> Result<Self, CoreError> {
        Ok(Self::from_parts(catalog.list_items().await?, catalog.list_combos().await?))
    }

    pub fn item(&self, id: &Uuid) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn combo(&self, id: &Uuid) -> Option<&Combo> {
        self.combos.get(id)
    }

    pub fn contains(&self, target: LineTarget) -> bool {
        self.unit_rate(target).is_some()
    }

    pub fn unit_rate(&self, target: LineTarget) -> Option<Kobo> {
        match target {
            LineTarget::Item(id) => self.items.get(&id).map(|item| item.rate_kobo),
            LineTarget::Combo(id) => self.combos.get(&id).map(|combo| combo.rate_kobo),
        }
    }

    /// Display name; combos are prefixed so reports can tell them apart.
    pub fn label(&self, target: LineTarget) -> Option<String> {
        match target {
            LineTarget::Item(id) => self.items.get(&id).map(|item| item.name.clone()),
            LineTarget::Combo(id) => self.combos.get(&id).map(|combo| format!("Combo: {}", combo.name)),
        }
    }
}

/// Amounts a customer would pay for an order right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub subtotal_kobo: Kobo,
    pub delivery_fee_kobo: Kobo,
    pub discount_kobo: Kobo,
    pub grand_total_kobo: Kobo,
}

/// One planned stock decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockDeduction {
    pub item_id: Uuid,
    pub quantity: u32,
    pub line_id: Uuid,
    pub via_combo: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "points", rename_all = "lowercase")]
pub enum LoyaltyOutcome {
    Earned(u32),
    Redeemed(u32),
}

/// What finalization actually did.
#[derive(Debug, Clone, Serialize)]
pub struct FinalizeReport {
    pub order_id: Uuid,
    pub grand_total_kobo: Kobo,
    pub loyalty: LoyaltyOutcome,
    pub deductions_applied: usize,
    pub shortfalls: Vec<StockShortfallEvent>,
}

/// Order total & stock reconciler.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler {
    pub loyalty: LoyaltyRules,
    pub delivery_eta_minutes: i64,
}

impl Reconciler {
    pub fn new(loyalty: LoyaltyRules, delivery_eta_minutes: i64) -> Self {
        Self {
            loyalty,
            delivery_eta_minutes,
        }
    }

    /// Price unpriced lines, then rebuild subtotal and grand total. Lines
    /// whose catalog entry has gone are priced at zero. Safe to call any
    /// number of times.
    pub fn recompute_totals(&self, order: &mut Order, catalog: &CatalogSnapshot) {
        for line in order.lines.iter_mut().filter(|line| line.price_kobo.is_none()) {
            let unit = catalog.unit_rate(line.target).unwrap_or(0);
            line.price_kobo = Some(unit.saturating_mul(i64::from(line.quantity)));
        }

        order.subtotal_kobo = money::total(order.lines.iter().map(|line| line.price()));
        let discount = if order.used_loyalty_points {
            self.loyalty.discount_kobo
        } else {
            0
        };
        order.grand_total_kobo = grand_total(order.subtotal_kobo, order.delivery_fee_kobo, discount);
    }

    /// The payable total given the customer's current balance: the
    /// discount only counts if they can still afford the redemption.
    pub fn quote(&self, order: &Order, points_available: u32) -> Quote {
        let discount_kobo = if order.used_loyalty_points && self.loyalty.can_redeem(points_available) {
            self.loyalty.discount_kobo
        } else {
            0
        };
        Quote {
            subtotal_kobo: order.subtotal_kobo,
            delivery_fee_kobo: order.delivery_fee_kobo,
            discount_kobo,
            grand_total_kobo: grand_total(order.subtotal_kobo, order.delivery_fee_kobo, discount_kobo),
        }
    }

    /// Every decrement finalization will attempt, in line order. Combo lines
    /// expand to one decrement per filled slot; unknown combos contribute
    /// nothing.
    pub fn plan_stock(&self, order: &Order, catalog: &CatalogSnapshot) -> Vec<StockDeduction> {
        let mut plan = Vec::new();
        for line in &order.lines {
            match line.target {
                LineTarget::Item(item_id) => plan.push(StockDeduction {
                    item_id,
                    quantity: line.quantity,
                    line_id: line.id,
                    via_combo: None,
                }),
                LineTarget::Combo(combo_id) => {
                    let Some(combo) = catalog.combo(&combo_id) else {
                        continue;
                    };
                    plan.extend(combo.components().map(|item_id| StockDeduction {
                        item_id,
                        quantity: line.quantity,
                        line_id: line.id,
                        via_combo: Some(combo_id),
                    }));
                }
            }
        }
        plan
    }

    /// Commit a paid order: settle loyalty, freeze totals, take stock and
    /// mark it finalized.
    ///
    /// Stock is decremented one row at a time. A shortfall on one item is
    /// recorded and skipped; a storage failure stops the loop and leaves
    /// earlier decrements in place.
    pub async fn finalize(
        &self,
        order: &mut Order,
        customer: &mut Customer,
        catalog: &dyn CatalogRepository,
        now: DateTime<Utc>,
        local_now: NaiveDateTime,
    ) -> Result<FinalizeReport, OrderError> {
        if order.status != OrderStatus::Open {
            return Err(OrderError::InvalidTransition {
                from: order.status,
                to: OrderStatus::Finalized,
            });
        }
        if order.is_empty() {
            return Err(OrderError::EmptyOrder(order.id));
        }
        if order.payment_reference.is_none() {
            return Err(OrderError::PaymentRequired(order.id));
        }

        let snapshot = CatalogSnapshot::load(catalog).await?;

        let redeem = order.used_loyalty_points && self.loyalty.can_redeem(customer.loyalty_points);
        order.used_loyalty_points = redeem;
        self.recompute_totals(order, &snapshot);

        let loyalty = if redeem {
            customer.loyalty_points -= self.loyalty.redeem_cost;
            LoyaltyOutcome::Redeemed(self.loyalty.redeem_cost)
        } else {
            let earned = self.loyalty.points_for(order.subtotal_kobo);
            customer.loyalty_points = customer.loyalty_points.saturating_add(earned);
            LoyaltyOutcome::Earned(earned)
        };
        customer.updated_at = now;

        let mut shortfalls = Vec::new();
        let mut applied = 0;
        for deduction in self.plan_stock(order, &snapshot) {
            match catalog.deduct_item_stock(deduction.item_id, deduction.quantity).await {
                Ok(StockOutcome::Deducted { .. }) => applied += 1,
                Ok(StockOutcome::Insufficient { requested, available }) => {
                    warn!(
                        order_id = %order.id,
                        item_id = %deduction.item_id,
                        requested,
                        available,
                        "Insufficient stock, skipping deduction"
                    );
                    shortfalls.push(StockShortfallEvent {
                        order_id: order.id,
                        item_id: deduction.item_id,
                        requested,
                        available,
                        via_combo: deduction.via_combo,
                    });
                }
                Err(CoreError::NotFound(_)) => {
                    warn!(order_id = %order.id, item_id = %deduction.item_id, "Item no longer in catalog, skipping deduction");
                    shortfalls.push(StockShortfallEvent {
                        order_id: order.id,
                        item_id: deduction.item_id,
                        requested: deduction.quantity,
                        available: 0,
                        via_combo: deduction.via_combo,
                    });
                }
                Err(e) => return Err(e.into()),
            }
        }

        order.date_placed = Some(local_now.date());
        order.time_placed = Some(local_now.time());
        order.expected_delivery_at = Some(now + Duration::minutes(self.delivery_eta_minutes));
        order.update_status(OrderStatus::Finalized, now);

        info!(
            order_id = %order.id,
            grand_total = order.grand_total_kobo,
            ?loyalty,
            shortfalls = shortfalls.len(),
            "Order finalized"
        );

        Ok(FinalizeReport {
            order_id: order.id,
            grand_total_kobo: order.grand_total_kobo,
            loyalty,
            deductions_applied: applied,
            shortfalls,
        })
    }
}

fn grand_total(subtotal: Kobo, delivery_fee: Kobo, discount: Kobo) -> Kobo {
    subtotal.saturating_add(delivery_fee).saturating_sub(discount).max(0)
}
