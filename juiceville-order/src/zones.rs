use juiceville_core::{CoreError, CoreResult};
use juiceville_shared::Kobo;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A delivery region with a flat fee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryZone {
    pub id: Uuid,
    pub name: String,
    pub fee_kobo: Kobo,
    pub is_active: bool,
}

impl DeliveryZone {
    pub fn new(name: &str, fee_kobo: Kobo) -> CoreResult<Self> {
        let name = name.trim();
        if name.is_empty() || name.chars().count() > 100 {
            return Err(CoreError::ValidationError(
                "zone name must be 1 to 100 characters".to_string(),
            ));
        }
        if fee_kobo < 0 {
            return Err(CoreError::ValidationError("delivery fee cannot be negative".to_string()));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            fee_kobo,
            is_active: true,
        })
    }
}

/// Zones a customer may pick from, by name.
pub fn selectable(zones: Vec<DeliveryZone>) -> Vec<DeliveryZone> {
    let mut active: Vec<_> = zones.into_iter().filter(|z| z.is_active).collect();
    active.sort_by(|a, b| a.name.cmp(&b.name));
    active
}
