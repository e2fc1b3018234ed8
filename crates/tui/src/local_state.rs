use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Small UI state that outlives a screen: the page a list returns to after a
/// drill-down, keyed by list name.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct LocalState {
    #[serde(default)]
    pub return_pages: BTreeMap<String, u32>,
}

impl LocalState {
    pub fn load(path: &str) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let parent = Path::new(path).parent();
        if let Some(parent) = parent {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        fs::write(path, payload)?;
        Ok(())
    }

    /// Remembers the 1-based page `list` should reopen on.
    pub fn stash_page(&mut self, list: &str, page: u32) {
        self.return_pages.insert(list.to_string(), page);
    }

    /// Takes the stashed page for `list`; a second call returns `None`.
    pub fn take_page(&mut self, list: &str) -> Option<u32> {
        self.return_pages.remove(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("quotedesk_{name}_{}", std::process::id()))
            .join("state.json")
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn stash_is_consumed_once() {
        let mut state = LocalState::default();
        state.stash_page("items", 3);
        assert_eq!(state.take_page("quotations"), None);
        assert_eq!(state.take_page("items"), Some(3));
        assert_eq!(state.take_page("items"), None);
    }

    #[test]
    fn missing_file_loads_empty_state() {
        let state = LocalState::load(&temp_path("missing")).unwrap();
        assert_eq!(state, LocalState::default());
    }

    #[test]
    fn saved_state_round_trips_through_disk() {
        let path = temp_path("saved");
        let mut state = LocalState::default();
        state.stash_page("items", 4);
        state.save(&path).unwrap();

        let mut loaded = LocalState::load(&path).unwrap();
        assert_eq!(loaded.take_page("items"), Some(4));
        let _ = fs::remove_file(&path);
    }
}
