use juiceville_shared::money::{self, apply_discount_percent};
use juiceville_shared::Kobo;
use serde::{Deserialize, Serialize};

/// How combo rates are derived from their components
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboPricing {
    /// Percentage taken off the summed component rates
    pub discount_percent: u8,
}

impl Default for ComboPricing {
    fn default() -> Self {
        Self { discount_percent: 5 }
    }
}

impl ComboPricing {
    pub fn new(discount_percent: u8) -> Self {
        Self {
            discount_percent: discount_percent.min(100),
        }
    }

    /// Sum of component rates less the combo discount, rounded half-up to the
    /// kobo and never negative.
    pub fn combo_rate<I>(&self, component_rates: I) -> Kobo
    where
        I: IntoIterator<Item = Kobo>,
    {
        let total = money::total(component_rates);
        apply_discount_percent(total, self.discount_percent)
    }
}
