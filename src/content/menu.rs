//! Menu editing helpers.
//!
//! Items are addressed by their stable [`ItemId`]; positional access is kept
//! for display order. Every helper works on a caller-owned copy, which is
//! then handed back to the store as a complete replacement.

use super::types::{ItemId, MenuCategory, MenuItem};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MenuError {
    #[error("no menu category at position {0}")]
    NoSuchCategory(usize),

    #[error("no menu item with id {0}")]
    NoSuchItem(ItemId),
}

/// Field of a [`MenuItem`] the dashboard edits in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuField {
    Name,
    Description,
    Price,
    Note,
}

impl MenuCategory {
    pub fn item_at(&self, index: usize) -> Option<&MenuItem> {
        self.items.get(index)
    }

    pub fn position_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn find(&self, id: ItemId) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Append an item, returning its id.
    pub fn push_item(&mut self, item: MenuItem) -> ItemId {
        let id = item.id;
        self.items.push(item);
        id
    }

    /// Remove by id. Later items keep their ids; only their positions shift.
    pub fn remove_item(&mut self, id: ItemId) -> Result<MenuItem, MenuError> {
        let index = self.position_of(id).ok_or(MenuError::NoSuchItem(id))?;
        Ok(self.items.remove(index))
    }

    pub fn set_field(
        &mut self,
        id: ItemId,
        field: MenuField,
        value: impl Into<String>,
    ) -> Result<(), MenuError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(MenuError::NoSuchItem(id))?;
        let value = value.into();
        match field {
            MenuField::Name => item.name = value,
            MenuField::Description => item.description = value,
            MenuField::Price => item.price = value,
            MenuField::Note => item.note = (!value.is_empty()).then_some(value),
        }
        Ok(())
    }
}

/// Operations over an ordered list of categories (food menu, cocktails).
pub trait MenuEditor {
    fn category_mut(&mut self, index: usize) -> Result<&mut MenuCategory, MenuError>;

    /// Add the dashboard's placeholder item to a category.
    fn add_placeholder(&mut self, category: usize) -> Result<ItemId, MenuError> {
        Ok(self.category_mut(category)?.push_item(MenuItem::placeholder()))
    }

    fn delete_item(&mut self, category: usize, id: ItemId) -> Result<MenuItem, MenuError> {
        self.category_mut(category)?.remove_item(id)
    }

    fn edit_item(
        &mut self,
        category: usize,
        id: ItemId,
        field: MenuField,
        value: impl Into<String>,
    ) -> Result<(), MenuError> {
        self.category_mut(category)?.set_field(id, field, value)
    }
}

impl MenuEditor for Vec<MenuCategory> {
    fn category_mut(&mut self, index: usize) -> Result<&mut MenuCategory, MenuError> {
        self.get_mut(index).ok_or(MenuError::NoSuchCategory(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu() -> Vec<MenuCategory> {
        vec![MenuCategory {
            category: "Snacks".into(),
            description: None,
            items: vec![
                MenuItem::new("Fries", "Salted", "5"),
                MenuItem::new("Nachos", "Cheesy", "7"),
                MenuItem::new("Wings", "Hot", "8"),
            ],
        }]
    }

    #[test]
    fn delete_keeps_ids_of_later_items() {
        let mut menu = menu();
        let nachos = menu[0].items[1].id;
        let wings = menu[0].items[2].id;

        let removed = menu.delete_item(0, nachos).unwrap();
        assert_eq!(removed.name, "Nachos");

        // Position shifted, identity did not.
        assert_eq!(menu[0].position_of(wings), Some(1));
        assert_eq!(menu[0].item_at(1).unwrap().name, "Wings");
        assert_eq!(menu.delete_item(0, nachos), Err(MenuError::NoSuchItem(nachos)));
    }

    #[test]
    fn add_and_edit_by_id() {
        let mut menu = menu();
        let id = menu.add_placeholder(0).unwrap();
        assert_eq!(menu[0].items.len(), 4);
        assert_eq!(menu[0].items[3].name, "New Item");

        menu.edit_item(0, id, MenuField::Price, "12").unwrap();
        menu.edit_item(0, id, MenuField::Note, "Vegan").unwrap();
        let item = menu[0].find(id).unwrap();
        assert_eq!(item.price, "12");
        assert_eq!(item.note.as_deref(), Some("Vegan"));

        menu.edit_item(0, id, MenuField::Note, "").unwrap();
        assert_eq!(menu[0].find(id).unwrap().note, None);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let mut menu = menu();
        assert_eq!(menu.add_placeholder(3), Err(MenuError::NoSuchCategory(3)));
    }
}
