use chrono::{NaiveDate, NaiveTime};
use juiceville_catalog::ComboPricing;
use juiceville_order::{DeliveryZone, LoyaltyRules, OperatingHours, Reconciler};
use juiceville_shared::{Kobo, Masked};
use serde::Deserialize;
use std::env;
use uuid::Uuid;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub payment: PaymentConfig,
    #[serde(default)]
    pub business_rules: BusinessRules,
    /// Seed rows for an empty store
    #[serde(default)]
    pub delivery_zones: Vec<ZoneSeed>,
    #[serde(default)]
    pub operating_hours: Vec<HoursSeed>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub public_base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PaymentConfig {
    pub secret_key: Masked<String>,
    /// Base the payment callback URL is built on; defaults to the public URL.
    pub callback_base_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BusinessRules {
    pub loyalty_discount_kobo: Kobo,
    pub loyalty_redeem_cost: u32,
    pub loyalty_earn_unit_kobo: Kobo,
    pub combo_discount_percent: u8,
    pub delivery_eta_minutes: i64,
    pub low_stock_threshold: i32,
    /// Shop-local offset for opening hours and report dates
    pub utc_offset_minutes: i32,
}

impl Default for BusinessRules {
    fn default() -> Self {
        let loyalty = LoyaltyRules::default();
        Self {
            loyalty_discount_kobo: loyalty.discount_kobo,
            loyalty_redeem_cost: loyalty.redeem_cost,
            loyalty_earn_unit_kobo: loyalty.earn_unit_kobo,
            combo_discount_percent: ComboPricing::default().discount_percent,
            delivery_eta_minutes: 45,
            low_stock_threshold: 10,
            utc_offset_minutes: 60,
        }
    }
}

impl BusinessRules {
    pub fn loyalty(&self) -> LoyaltyRules {
        LoyaltyRules {
            discount_kobo: self.loyalty_discount_kobo,
            redeem_cost: self.loyalty_redeem_cost,
            earn_unit_kobo: self.loyalty_earn_unit_kobo,
        }
    }

    pub fn combo_pricing(&self) -> ComboPricing {
        ComboPricing::new(self.combo_discount_percent)
    }

    pub fn reconciler(&self) -> Reconciler {
        Reconciler::new(self.loyalty(), self.delivery_eta_minutes)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ZoneSeed {
    pub name: String,
    pub fee_kobo: Kobo,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl ZoneSeed {
    pub fn to_zone(&self) -> DeliveryZone {
        DeliveryZone {
            id: Uuid::new_v4(),
            name: self.name.clone(),
            fee_kobo: self.fee_kobo,
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HoursSeed {
    pub weekday: Option<u8>,
    pub date: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub is_open: bool,
    pub opening_time: Option<NaiveTime>,
    pub closing_time: Option<NaiveTime>,
}

impl HoursSeed {
    pub fn to_hours(&self) -> OperatingHours {
        OperatingHours {
            id: Uuid::new_v4(),
            weekday: self.weekday,
            date: self.date,
            is_open: self.is_open,
            opening_time: self.opening_time,
            closing_time: self.closing_time,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Machine-local overrides, never checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `JUICEVILLE__PAYMENT__SECRET_KEY=sk_live_...`
            .add_source(config::Environment::with_prefix("JUICEVILLE").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    /// Build from a TOML document alone, without files or environment.
    pub fn from_toml(source: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    pub fn callback_base_url(&self) -> &str {
        self.payment
            .callback_base_url
            .as_deref()
            .unwrap_or(&self.server.public_base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [server]
        port = 8000
        public_base_url = "https://juiceville.ng"

        [payment]
        secret_key = "sk_test_123"
    "#;

    #[test]
    fn test_defaults_fill_business_rules() {
        let config = Config::from_toml(MINIMAL).unwrap();

        assert_eq!(config.business_rules.loyalty_discount_kobo, 250_000);
        assert_eq!(config.business_rules.loyalty_redeem_cost, 50);
        assert_eq!(config.business_rules.delivery_eta_minutes, 45);
        assert_eq!(config.callback_base_url(), "https://juiceville.ng");
        assert!(config.delivery_zones.is_empty());
        assert_eq!(format!("{:?}", config.payment.secret_key), "********");
    }

    #[test]
    fn test_seeds_and_overrides() {
        let source = format!(
            r#"{MINIMAL}
            [business_rules]
            combo_discount_percent = 10

            [[delivery_zones]]
            name = "Campus"
            fee_kobo = 50000

            [[delivery_zones]]
            name = "Tipper Garage"
            fee_kobo = 100000
            is_active = false

            [[operating_hours]]
            weekday = 0
            opening_time = "09:00:00"
            closing_time = "21:00:00"

            [[operating_hours]]
            date = "2025-12-25"
            is_open = false
            "#
        );
        let config = Config::from_toml(&source).unwrap();

        assert_eq!(config.business_rules.combo_pricing().discount_percent, 10);
        assert_eq!(config.business_rules.loyalty_earn_unit_kobo, 100_000);
        assert!(!config.delivery_zones[1].to_zone().is_active);
        let christmas = config.operating_hours[1].to_hours();
        assert!(!christmas.is_open);
        assert_eq!(christmas.weekday, None);
        assert_eq!(config.operating_hours[0].to_hours().opening_time, NaiveTime::from_hms_opt(9, 0, 0));
    }
}
