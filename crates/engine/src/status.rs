//! In-flight tracking for the per-row item status toggle.

use std::collections::HashSet;

use api_types::item::ItemStatus;

/// Role marker of read-only callers. A missing marker is read-only too.
pub const READ_ONLY_ROLE: &str = "4";

/// Role of the signed-in user, as the backend labels it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Role(String);

impl Role {
    pub fn new(marker: impl Into<String>) -> Self {
        Self(marker.into())
    }

    pub fn is_read_only(&self) -> bool {
        let marker = self.0.trim();
        marker.is_empty() || marker == READ_ONLY_ROLE
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Rows whose status update is in flight.
///
/// The flag only disables the control; it is not a lock.
#[derive(Debug, Clone, Default)]
pub struct StatusToggles {
    updating: HashSet<u64>,
}

impl StatusToggles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a toggle of row `id`. Returns the status to send, or `None` when
    /// the role may not toggle or the row is already updating.
    pub fn begin(&mut self, id: u64, current: ItemStatus, role: &Role) -> Option<ItemStatus> {
        if role.is_read_only() || !self.updating.insert(id) {
            return None;
        }
        Some(current.toggled())
    }

    pub fn finish(&mut self, id: u64) {
        self.updating.remove(&id);
    }

    pub fn is_updating(&self, id: u64) -> bool {
        self.updating.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_between_active_and_inactive() {
        let role = Role::new("1");
        let mut toggles = StatusToggles::new();
        assert_eq!(toggles.begin(1, ItemStatus::Active, &role), Some(ItemStatus::Inactive));
        assert_eq!(toggles.begin(2, ItemStatus::Inactive, &role), Some(ItemStatus::Active));
        assert!(toggles.is_updating(1));
        assert!(toggles.is_updating(2));
    }

    #[test]
    fn read_only_role_cannot_toggle() {
        let mut toggles = StatusToggles::new();
        assert_eq!(toggles.begin(1, ItemStatus::Active, &Role::new("4")), None);
        assert!(!toggles.is_updating(1));
    }

    #[test]
    fn missing_role_cannot_toggle() {
        let mut toggles = StatusToggles::new();
        assert!(Role::default().is_read_only());
        assert!(Role::new("  ").is_read_only());
        assert_eq!(toggles.begin(1, ItemStatus::Active, &Role::default()), None);
        assert_eq!(toggles.begin(1, ItemStatus::Active, &Role::new(" ")), None);
        assert!(!toggles.is_updating(1));
    }

    #[test]
    fn row_is_disabled_until_finished() {
        let role = Role::new("1");
        let mut toggles = StatusToggles::new();
        toggles.begin(7, ItemStatus::Active, &role);
        assert_eq!(toggles.begin(7, ItemStatus::Active, &role), None);
        toggles.finish(7);
        assert!(!toggles.is_updating(7));
        assert!(toggles.begin(7, ItemStatus::Active, &role).is_some());
    }
}
