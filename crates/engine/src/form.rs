//! Field-keyed validation results shared by every form.

use std::collections::BTreeMap;

/// One message attached to a form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Errors of a form, keyed by field, in the order the fields were checked.
///
/// Client-side rules and server-side validation responses fill the same map,
/// so a screen renders both the same way. The first entry is the field to
/// focus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` for `field`, replacing an earlier message for the
    /// same field but keeping its position.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        let message = message.into();
        match self.entries.iter_mut().find(|entry| entry.field == field) {
            Some(entry) => entry.message = message,
            None => self.entries.push(FieldError { field, message }),
        }
    }

    pub fn remove(&mut self, field: &str) {
        self.entries.retain(|entry| entry.field != field);
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.field == field)
            .map(|entry| entry.message.as_str())
    }

    /// The first invalid field, i.e. the one to focus.
    pub fn first(&self) -> Option<&FieldError> {
        self.entries.first()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.entries.iter()
    }

    /// Replaces the current errors with a server validation response.
    ///
    /// The server sends every message per field; the first one is shown.
    pub fn replace_with_server(&mut self, errors: &BTreeMap<String, Vec<String>>) {
        self.entries.clear();
        for (field, messages) in errors {
            if let Some(message) = messages.first() {
                self.insert(field.as_str(), message.as_str());
            }
        }
    }

    /// Finishes a validation pass: no errors means the value is valid.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.entries.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

/// Length of a text field as the user sees it.
pub(crate) fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Trimmed text, or `None` when only whitespace remains.
pub(crate) fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_first_position() {
        let mut errors = FieldErrors::new();
        errors.insert("item_name", "Item name is required");
        errors.insert("item_price", "Price is required");
        errors.insert("item_name", "Item name must be at least 2 characters");

        assert_eq!(errors.len(), 2);
        let first = errors.first().unwrap();
        assert_eq!(first.field, "item_name");
        assert_eq!(first.message, "Item name must be at least 2 characters");
    }

    #[test]
    fn server_errors_replace_local_ones() {
        let mut errors = FieldErrors::new();
        errors.insert("item_tax", "Tax is required");

        let mut server = BTreeMap::new();
        server.insert(
            "item_name".to_string(),
            vec!["The item name has already been taken.".to_string()],
        );
        server.insert("item_unit".to_string(), vec![]);
        errors.replace_with_server(&server);

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get("item_name"),
            Some("The item name has already been taken.")
        );
        assert_eq!(errors.get("item_tax"), None);
    }

    #[test]
    fn into_result_reports_errors() {
        let ok = FieldErrors::new().into_result(|| 5);
        assert_eq!(ok, Ok(5));

        let mut errors = FieldErrors::new();
        errors.insert("email", "Email is required");
        assert!(errors.into_result(|| ()).is_err());
    }

    #[test]
    fn non_blank_trims() {
        assert_eq!(non_blank("  "), None);
        assert_eq!(non_blank(" kg "), Some("kg".to_string()));
    }
}
