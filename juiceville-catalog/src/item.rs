use juiceville_shared::money::{format_naira, MAX_RATE_KOBO};
use juiceville_shared::Kobo;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::inventory::StockOutcome;
use crate::CatalogError;

pub const DEFAULT_STOCK: i32 = 10;
pub const DEFAULT_RATING: f32 = 5.0;

/// Menu sections, in the order the menu renders them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Ck,
    Ps,
    Js,
    Ds,
    Dr,
    Fd,
    Pr,
    Ss,
    Ml,
    Dt,
    Pc,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Category::Ck,
        Category::Ps,
        Category::Js,
        Category::Ds,
        Category::Dr,
        Category::Fd,
        Category::Pr,
        Category::Ss,
        Category::Ml,
        Category::Dt,
        Category::Pc,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Category::Ck => "CK",
            Category::Ps => "PS",
            Category::Js => "JS",
            Category::Ds => "DS",
            Category::Dr => "DR",
            Category::Fd => "FD",
            Category::Pr => "PR",
            Category::Ss => "SS",
            Category::Ml => "ML",
            Category::Dt => "DT",
            Category::Pc => "PC",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(code.trim()))
    }
}

/// A single dish or drink on the menu
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub category: Category,
    pub description: String,
    pub rate_kobo: Kobo,
    pub is_non_veg: bool,
    pub stock: i32,
    pub rating: f32,
}

/// Fields an operator supplies when creating or editing an item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    pub rate_kobo: Kobo,
    #[serde(default)]
    pub is_non_veg: bool,
    pub stock: Option<i32>,
    pub rating: Option<f32>,
}

impl ItemDraft {
    fn validate(&self) -> Result<(), CatalogError> {
        let name_len = self.name.trim().chars().count();
        if name_len == 0 || name_len > 50 {
            return Err(CatalogError::invalid("name", "must be 1 to 50 characters"));
        }
        if self.description.chars().count() > 500 {
            return Err(CatalogError::invalid("description", "must be at most 500 characters"));
        }
        if self.rate_kobo < 0 {
            return Err(CatalogError::invalid("rate", "cannot be negative"));
        }
        if self.rate_kobo > MAX_RATE_KOBO {
            return Err(CatalogError::invalid(
                "rate",
                format!("cannot exceed {}", format_naira(MAX_RATE_KOBO)),
            ));
        }
        if matches!(self.stock, Some(s) if s < 0) {
            return Err(CatalogError::invalid("stock", "cannot be negative"));
        }
        if matches!(self.rating, Some(r) if !(0.0..=5.0).contains(&r)) {
            return Err(CatalogError::invalid("rating", "must be between 0 and 5"));
        }
        Ok(())
    }
}

impl Item {
    pub fn from_draft(draft: ItemDraft) -> Result<Self, CatalogError> {
        draft.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            name: draft.name.trim().to_string(),
            category: draft.category,
            description: draft.description,
            rate_kobo: draft.rate_kobo,
            is_non_veg: draft.is_non_veg,
            stock: draft.stock.unwrap_or(DEFAULT_STOCK),
            rating: draft.rating.unwrap_or(DEFAULT_RATING),
        })
    }

    /// Overwrite editable fields; stock and rating are kept when omitted.
    pub fn apply(&mut self, draft: ItemDraft) -> Result<(), CatalogError> {
        draft.validate()?;
        self.name = draft.name.trim().to_string();
        self.category = draft.category;
        self.description = draft.description;
        self.rate_kobo = draft.rate_kobo;
        self.is_non_veg = draft.is_non_veg;
        if let Some(stock) = draft.stock {
            self.stock = stock;
        }
        if let Some(rating) = draft.rating {
            self.rating = rating;
        }
        Ok(())
    }

    pub fn in_stock(&self) -> bool {
        self.stock >= 1
    }

    /// Take `quantity` units out of stock, or leave stock untouched if there
    /// are not enough.
    pub fn deduct_stock(&mut self, quantity: u32) -> StockOutcome {
        let requested = i32::try_from(quantity).unwrap_or(i32::MAX);
        if self.stock >= requested {
            self.stock -= requested;
            StockOutcome::Deducted { remaining: self.stock }
        } else {
            StockOutcome::Insufficient {
                requested: quantity,
                available: self.stock,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, rate_kobo: Kobo) -> ItemDraft {
        ItemDraft {
            name: name.to_string(),
            category: Category::Js,
            description: String::new(),
            rate_kobo,
            is_non_veg: false,
            stock: None,
            rating: None,
        }
    }

    #[test]
    fn test_defaults_applied() {
        let item = Item::from_draft(draft("Zobo", 50_000)).unwrap();
        assert_eq!(item.stock, DEFAULT_STOCK);
        assert_eq!(item.rating, DEFAULT_RATING);
    }

    #[test]
    fn test_validation() {
        assert!(Item::from_draft(draft("", 100)).is_err());
        assert!(Item::from_draft(draft(&"x".repeat(51), 100)).is_err());
        assert!(Item::from_draft(draft("Chapman", -1)).is_err());
        assert!(Item::from_draft(draft("Chapman", MAX_RATE_KOBO)).is_ok());
        assert!(Item::from_draft(draft("Chapman", MAX_RATE_KOBO + 1)).is_err());

        let mut d = draft("Chapman", 100);
        d.stock = Some(-3);
        assert!(Item::from_draft(d).is_err());
    }

    #[test]
    fn test_deduct_never_goes_negative() {
        let mut item = Item::from_draft(draft("Smoothie", 120_000)).unwrap();
        item.stock = 3;

        assert_eq!(item.deduct_stock(2), StockOutcome::Deducted { remaining: 1 });
        assert_eq!(
            item.deduct_stock(2),
            StockOutcome::Insufficient { requested: 2, available: 1 }
        );
        assert_eq!(item.stock, 1);
    }

    #[test]
    fn test_category_codes() {
        assert_eq!(Category::from_code("ml"), Some(Category::Ml));
        assert_eq!(Category::from_code("XX"), None);
        assert_eq!(serde_json::to_string(&Category::Dt).unwrap(), "\"DT\"");
    }
}
