use serde::Serialize;

use crate::combo::Combo;
use crate::inventory::InventoryManager;
use crate::item::{Category, Item};

#[derive(Debug, Clone, Serialize)]
pub struct MenuSection {
    pub category: Category,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComboListing {
    pub combo: Combo,
    pub effective_stock: i32,
}

/// What a customer can order right now.
#[derive(Debug, Clone, Serialize)]
pub struct Menu {
    pub sections: Vec<MenuSection>,
    pub combos: Vec<ComboListing>,
}

impl Menu {
    /// Items with at least one unit left, grouped by category in menu
    /// order (every category gets a section, possibly empty), followed by
    /// combos that can still be sold at least once.
    pub fn build(items: Vec<Item>, combos: Vec<Combo>) -> Self {
        let inventory = InventoryManager::from_items(&items);

        let mut sections: Vec<MenuSection> = Category::ALL
            .into_iter()
            .map(|category| MenuSection {
                category,
                items: Vec::new(),
            })
            .collect();

        for item in items.into_iter().filter(Item::in_stock) {
            if let Some(section) = sections.iter_mut().find(|s| s.category == item.category) {
                section.items.push(item);
            }
        }
        for section in sections.iter_mut() {
            section.items.sort_by(|a, b| a.name.cmp(&b.name));
        }

        let combos = combos
            .into_iter()
            .map(|combo| ComboListing {
                effective_stock: inventory.effective_stock(&combo),
                combo,
            })
            .filter(|listing| listing.effective_stock > 0)
            .collect();

        Self { sections, combos }
    }

    pub fn section(&self, category: Category) -> Option<&MenuSection> {
        self.sections.iter().find(|s| s.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combo::ComboDraft;
    use crate::item::ItemDraft;

    fn item(name: &str, category: Category, stock: i32) -> Item {
        Item::from_draft(ItemDraft {
            name: name.to_string(),
            category,
            description: String::new(),
            rate_kobo: 100_000,
            is_non_veg: false,
            stock: Some(stock),
            rating: None,
        })
        .unwrap()
    }

    #[test]
    fn test_menu_hides_sold_out() {
        let jollof = item("Jollof Rice", Category::Ml, 4);
        let moimoi = item("Moi Moi", Category::Ml, 0);
        let zobo = item("Zobo", Category::Dr, 2);

        let sold_out_combo = Combo::from_draft(ComboDraft {
            name: "Rice & Moi Moi".to_string(),
            description: String::new(),
            components: vec![jollof.id, moimoi.id],
        })
        .unwrap();
        let live_combo = Combo::from_draft(ComboDraft {
            name: "Rice & Zobo".to_string(),
            description: String::new(),
            components: vec![jollof.id, zobo.id],
        })
        .unwrap();

        let menu = Menu::build(vec![jollof, moimoi, zobo], vec![sold_out_combo, live_combo]);

        assert_eq!(menu.sections.len(), Category::ALL.len());
        let meals = menu.section(Category::Ml).unwrap();
        assert_eq!(meals.items.len(), 1);
        assert_eq!(meals.items[0].name, "Jollof Rice");

        assert_eq!(menu.combos.len(), 1);
        assert_eq!(menu.combos[0].combo.name, "Rice & Zobo");
        assert_eq!(menu.combos[0].effective_stock, 2);
    }
}
