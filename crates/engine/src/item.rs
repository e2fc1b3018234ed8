//! Catalog item form: raw field text, keystroke rules, and validation into
//! request bodies.

use api_types::item::{ItemNew, ItemStatus, ItemUpdate, ItemView};

use crate::{
    form::{FieldErrors, char_len, non_blank},
    numeric::{leading_number, sanitize_decimal},
};

pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 100;
pub const TYPE_MAX: usize = 50;
pub const DESCRIPTION_MAX: usize = 500;
pub const SIZE_MAX: usize = 50;
pub const UNIT_MAX: usize = 20;
pub const PRICE_MAX: f64 = 9_999_999.99;
pub const TAX_MAX: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Name,
    Type,
    Description,
    Price,
    Tax,
    Size,
    Unit,
    Status,
}

impl ItemField {
    pub const ALL: [ItemField; 8] = [
        Self::Name,
        Self::Type,
        Self::Description,
        Self::Price,
        Self::Tax,
        Self::Size,
        Self::Unit,
        Self::Status,
    ];

    /// Wire name of the field, also the key of its validation errors.
    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "item_name",
            Self::Type => "item_type",
            Self::Description => "item_description",
            Self::Price => "item_price",
            Self::Tax => "item_tax",
            Self::Size => "item_size",
            Self::Unit => "item_unit",
            Self::Status => "item_status",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Type => "Type",
            Self::Description => "Description",
            Self::Price => "Price",
            Self::Tax => "Tax %",
            Self::Size => "Size",
            Self::Unit => "Unit",
            Self::Status => "Status",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

/// A validated item, ready to become a request body.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidItem {
    pub name: String,
    pub item_type: Option<String>,
    pub description: Option<String>,
    pub price: f64,
    pub tax: f64,
    pub size: Option<String>,
    pub unit: Option<String>,
    pub status: ItemStatus,
}

impl ValidItem {
    pub fn into_new(self) -> ItemNew {
        ItemNew {
            item_name: self.name,
            item_type: self.item_type,
            item_description: self.description,
            item_price: self.price,
            item_tax: self.tax,
            item_size: self.size,
            item_unit: self.unit,
        }
    }

    pub fn into_update(self) -> ItemUpdate {
        ItemUpdate {
            item_name: self.name,
            item_type: self.item_type,
            item_description: self.description,
            item_price: self.price,
            item_tax: self.tax,
            item_size: self.size,
            item_unit: self.unit,
            item_status: self.status,
        }
    }
}

/// Text state of the item create/edit form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemDraft {
    pub name: String,
    pub item_type: String,
    pub description: String,
    pub price: String,
    pub tax: String,
    pub size: String,
    pub unit: String,
    pub status: String,
}

impl ItemDraft {
    /// Empty form for a new item. New items start active.
    pub fn new() -> Self {
        Self {
            status: ItemStatus::Active.as_str().to_string(),
            ..Self::default()
        }
    }

    /// Form pre-filled from a stored item.
    pub fn from_view(item: &ItemView) -> Self {
        Self {
            name: item.item_name.clone(),
            item_type: item.item_type.clone().unwrap_or_default(),
            description: item.item_description.clone().unwrap_or_default(),
            price: format_decimal(item.item_price),
            tax: format_decimal(item.item_tax),
            size: item.item_size.clone().unwrap_or_default(),
            unit: item.item_unit.clone().unwrap_or_default(),
            status: item.item_status.as_str().to_string(),
        }
    }

    pub fn field(&self, field: ItemField) -> &str {
        match field {
            ItemField::Name => &self.name,
            ItemField::Type => &self.item_type,
            ItemField::Description => &self.description,
            ItemField::Price => &self.price,
            ItemField::Tax => &self.tax,
            ItemField::Size => &self.size,
            ItemField::Unit => &self.unit,
            ItemField::Status => &self.status,
        }
    }

    /// Applies a keystroke-level edit. Price and tax only ever hold sanitized
    /// decimal text.
    pub fn set_field(&mut self, field: ItemField, value: &str) {
        let slot = match field {
            ItemField::Name => &mut self.name,
            ItemField::Type => &mut self.item_type,
            ItemField::Description => &mut self.description,
            ItemField::Price => &mut self.price,
            ItemField::Tax => &mut self.tax,
            ItemField::Size => &mut self.size,
            ItemField::Unit => &mut self.unit,
            ItemField::Status => &mut self.status,
        };
        *slot = match field {
            ItemField::Price | ItemField::Tax => sanitize_decimal(value),
            _ => value.to_string(),
        };
    }

    /// Flips the status field between active and inactive.
    pub fn toggle_status(&mut self) {
        let next = ItemStatus::parse(&self.status)
            .unwrap_or_default()
            .toggled();
        self.status = next.as_str().to_string();
    }

    /// Message for a single field, as shown while the user types.
    pub fn check_field(&self, field: ItemField) -> Option<&'static str> {
        match field {
            ItemField::Name => check_name(&self.name),
            ItemField::Type => check_max(
                &self.item_type,
                TYPE_MAX,
                "Item type must be less than 50 characters",
            ),
            ItemField::Description => check_max(
                &self.description,
                DESCRIPTION_MAX,
                "Description must be less than 500 characters",
            ),
            ItemField::Price => check_price(&self.price),
            ItemField::Tax => check_tax(&self.tax),
            ItemField::Size => {
                check_max(&self.size, SIZE_MAX, "Size must be less than 50 characters")
            }
            ItemField::Unit => {
                check_max(&self.unit, UNIT_MAX, "Unit must be less than 20 characters")
            }
            ItemField::Status => check_status(&self.status),
        }
    }

    /// Re-checks one field inside an existing error map.
    pub fn revalidate_field(&self, field: ItemField, errors: &mut FieldErrors) {
        match self.check_field(field) {
            Some(message) => errors.insert(field.key(), message),
            None => errors.remove(field.key()),
        }
    }

    /// Validates every field. Errors are keyed by wire field name, in form
    /// order.
    pub fn validate(&self) -> Result<ValidItem, FieldErrors> {
        let mut errors = FieldErrors::new();
        for field in ItemField::ALL {
            if let Some(message) = self.check_field(field) {
                errors.insert(field.key(), message);
            }
        }
        errors.into_result(|| ValidItem {
            name: self.name.trim().to_string(),
            item_type: non_blank(&self.item_type),
            description: non_blank(&self.description),
            price: leading_number(&self.price).unwrap_or_default(),
            tax: leading_number(&self.tax).unwrap_or_default(),
            size: non_blank(&self.size),
            unit: non_blank(&self.unit),
            status: ItemStatus::parse(&self.status).unwrap_or_default(),
        })
    }

    /// Whether the form differs from the item it was loaded from.
    pub fn is_dirty(&self, original: &ItemDraft) -> bool {
        self != original
    }
}

fn check_name(value: &str) -> Option<&'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Some("Item name is required")
    } else if char_len(trimmed) < NAME_MIN {
        Some("Item name must be at least 2 characters")
    } else if char_len(trimmed) > NAME_MAX {
        Some("Item name must be less than 100 characters")
    } else {
        None
    }
}

fn check_max(value: &str, max: usize, message: &'static str) -> Option<&'static str> {
    (char_len(value.trim()) > max).then_some(message)
}

fn check_price(value: &str) -> Option<&'static str> {
    if value.trim().is_empty() {
        return Some("Price is required");
    }
    match leading_number(value) {
        None => Some("Price must be a valid number"),
        Some(price) if price < 0.0 => Some("Price cannot be negative"),
        Some(price) if price > PRICE_MAX => Some("Price must be less than 10,000,000"),
        Some(_) => None,
    }
}

fn check_tax(value: &str) -> Option<&'static str> {
    if value.trim().is_empty() {
        return Some("Tax is required");
    }
    match leading_number(value) {
        None => Some("Tax must be a valid number"),
        Some(tax) if tax < 0.0 => Some("Tax cannot be negative"),
        Some(tax) if tax > TAX_MAX => Some("Tax cannot exceed 100%"),
        Some(_) => None,
    }
}

fn check_status(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        Some("Status is required")
    } else if ItemStatus::parse(value).is_none() {
        Some("Status must be either Active or Inactive")
    } else {
        None
    }
}

/// Renders a stored decimal without trailing zeros beyond cents.
fn format_decimal(value: f64) -> String {
    let fixed = format!("{value:.2}");
    fixed
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> ItemDraft {
        ItemDraft {
            name: "Copper wire".to_string(),
            price: "120.50".to_string(),
            tax: "18".to_string(),
            ..ItemDraft::new()
        }
    }

    #[test]
    fn valid_draft_builds_payload() {
        let mut draft = valid_draft();
        draft.unit = " m ".to_string();
        let item = draft.validate().unwrap();
        assert_eq!(item.price, 120.5);
        assert_eq!(item.unit.as_deref(), Some("m"));
        assert_eq!(item.item_type, None);

        let body = item.into_new();
        assert_eq!(body.item_name, "Copper wire");
        assert_eq!(body.item_tax, 18.0);
    }

    #[test]
    fn name_length_bounds() {
        let mut draft = valid_draft();
        draft.name = "A".to_string();
        let errors = draft.validate().unwrap_err();
        assert_eq!(
            errors.get("item_name"),
            Some("Item name must be at least 2 characters")
        );

        draft.name = "x".repeat(101);
        let errors = draft.validate().unwrap_err();
        assert_eq!(
            errors.get("item_name"),
            Some("Item name must be less than 100 characters")
        );

        draft.name = "x".repeat(100);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn price_and_tax_ranges() {
        let mut draft = valid_draft();
        draft.price = "-1".to_string();
        draft.tax = "150".to_string();
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.get("item_price"), Some("Price cannot be negative"));
        assert_eq!(errors.get("item_tax"), Some("Tax cannot exceed 100%"));

        draft.price = "10000000".to_string();
        draft.tax = "100".to_string();
        let errors = draft.validate().unwrap_err();
        assert_eq!(
            errors.get("item_price"),
            Some("Price must be less than 10,000,000")
        );
        assert_eq!(errors.get("item_tax"), None);

        draft.price = "9999999.99".to_string();
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn required_fields_are_reported_in_form_order() {
        let errors = ItemDraft::new().validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["item_name", "item_price", "item_tax"]);
        assert_eq!(errors.first().unwrap().message, "Item name is required");
    }

    #[test]
    fn optional_text_limits() {
        let mut draft = valid_draft();
        draft.item_type = "t".repeat(51);
        draft.description = "d".repeat(501);
        draft.size = "s".repeat(51);
        draft.unit = "u".repeat(21);
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn price_keystrokes_are_sanitized() {
        let mut draft = ItemDraft::new();
        draft.set_field(ItemField::Price, "12.345");
        assert_eq!(draft.price, "12.34");
        draft.set_field(ItemField::Tax, "12..3");
        assert_eq!(draft.tax, "12.3");
        draft.set_field(ItemField::Name, "12.345");
        assert_eq!(draft.name, "12.345");
    }

    #[test]
    fn status_must_be_known() {
        let mut draft = valid_draft();
        draft.status = "Archived".to_string();
        let errors = draft.validate().unwrap_err();
        assert_eq!(
            errors.get("item_status"),
            Some("Status must be either Active or Inactive")
        );
        draft.toggle_status();
        assert_eq!(draft.status, "Inactive");
    }

    #[test]
    fn loads_from_view_and_tracks_dirty() {
        let view = ItemView {
            id: 3,
            item_name: "Bolt".to_string(),
            item_type: None,
            item_description: Some("M8".to_string()),
            item_price: 2.5,
            item_tax: 18.0,
            item_size: Some("8".to_string()),
            item_unit: None,
            item_status: ItemStatus::Inactive,
        };
        let original = ItemDraft::from_view(&view);
        assert_eq!(original.price, "2.5");
        assert_eq!(original.tax, "18");
        assert_eq!(original.status, "Inactive");

        let mut edited = original.clone();
        assert!(!edited.is_dirty(&original));
        edited.set_field(ItemField::Unit, "pcs");
        assert!(edited.is_dirty(&original));
    }

    #[test]
    fn revalidate_clears_fixed_field() {
        let mut draft = ItemDraft::new();
        let mut errors = draft.validate().unwrap_err();
        draft.set_field(ItemField::Name, "Nut");
        draft.revalidate_field(ItemField::Name, &mut errors);
        assert_eq!(errors.get("item_name"), None);
        assert_eq!(ItemField::from_key("item_tax"), Some(ItemField::Tax));
    }
}
