//! Canonical view state and its mutations
//!
//! [`ViewStateStore`] is the only place the view state changes. Every
//! mutation returns whether the state actually changed so callers can skip
//! needless recomputation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Consultation mode filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConsultationMode {
    /// No filtering by consultation mode
    #[default]
    None,
    Video,
    InClinic,
}

impl ConsultationMode {
    /// Value used for the `consultationType` query key, `None` for the default
    pub fn as_query_value(self) -> Option<&'static str> {
        match self {
            ConsultationMode::None => None,
            ConsultationMode::Video => Some("video"),
            ConsultationMode::InClinic => Some("inClinic"),
        }
    }

    pub fn from_query_value(value: &str) -> Option<Self> {
        match value {
            "video" => Some(ConsultationMode::Video),
            "inClinic" => Some(ConsultationMode::InClinic),
            _ => None,
        }
    }
}

/// Sort order applied to the visible list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Keep catalog order
    #[default]
    None,
    /// Ascending by fee
    Fee,
    /// Descending by years of experience
    Experience,
}

impl SortKey {
    /// Value used for the `sort` query key, `None` for the default
    pub fn as_query_value(self) -> Option<&'static str> {
        match self {
            SortKey::None => None,
            SortKey::Fee => Some("fees"),
            SortKey::Experience => Some("experience"),
        }
    }

    pub fn from_query_value(value: &str) -> Option<Self> {
        match value {
            "fees" => Some(SortKey::Fee),
            "experience" => Some(SortKey::Experience),
            _ => None,
        }
    }
}

/// Complete set of user-chosen filter and sort selections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub search_term: String,
    pub consultation_mode: ConsultationMode,
    /// Ordered so that display and query-string order are stable
    pub specialties: BTreeSet<String>,
    pub sort_key: SortKey,
}

impl ViewState {
    pub fn is_default(&self) -> bool {
        *self == ViewState::default()
    }
}

/// Owner of the canonical [`ViewState`]
#[derive(Debug, Clone, Default)]
pub struct ViewStateStore {
    state: ViewState,
}

impl ViewStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: ViewState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Replace the search term unconditionally
    pub fn set_search_term(&mut self, term: impl Into<String>) -> bool {
        let term = term.into();
        if self.state.search_term == term {
            return false;
        }
        self.state.search_term = term;
        true
    }

    /// Select `mode`, or clear it when it is already the active mode
    pub fn toggle_consultation_mode(&mut self, mode: ConsultationMode) -> bool {
        let next = if self.state.consultation_mode == mode {
            ConsultationMode::None
        } else {
            mode
        };
        let changed = next != self.state.consultation_mode;
        self.state.consultation_mode = next;
        changed
    }

    /// Checkbox semantics: include or exclude `name` from the specialty set
    ///
    /// Empty names are ignored since they cannot be carried by the query string.
    pub fn toggle_specialty(&mut self, name: &str, included: bool) -> bool {
        if name.is_empty() {
            return false;
        }
        if included {
            self.state.specialties.insert(name.to_string())
        } else {
            self.state.specialties.remove(name)
        }
    }

    /// Select `key`, or clear it when it is already the active sort
    pub fn toggle_sort_key(&mut self, key: SortKey) -> bool {
        let next = if self.state.sort_key == key {
            SortKey::None
        } else {
            key
        };
        let changed = next != self.state.sort_key;
        self.state.sort_key = next;
        changed
    }

    /// Hydrate from an external source, bypassing toggle rules
    pub fn replace_all(&mut self, state: ViewState) -> bool {
        if self.state == state {
            return false;
        }
        self.state = state;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let store = ViewStateStore::new();
        assert!(store.state().is_default());
        assert_eq!(store.state().search_term, "");
        assert_eq!(store.state().consultation_mode, ConsultationMode::None);
        assert!(store.state().specialties.is_empty());
        assert_eq!(store.state().sort_key, SortKey::None);
    }

    #[test]
    fn test_set_search_term_replaces() {
        let mut store = ViewStateStore::new();

        assert!(store.set_search_term("ali"));
        assert!(store.set_search_term("bob"));
        assert!(!store.set_search_term("bob"));
        assert_eq!(store.state().search_term, "bob");

        assert!(store.set_search_term(""));
        assert!(store.state().is_default());
    }

    #[test]
    fn test_toggle_consultation_mode_twice_clears() {
        let mut store = ViewStateStore::new();

        store.toggle_consultation_mode(ConsultationMode::Video);
        assert_eq!(store.state().consultation_mode, ConsultationMode::Video);

        store.toggle_consultation_mode(ConsultationMode::Video);
        assert_eq!(store.state().consultation_mode, ConsultationMode::None);
    }

    #[test]
    fn test_toggle_consultation_mode_switches() {
        let mut store = ViewStateStore::new();

        store.toggle_consultation_mode(ConsultationMode::Video);
        store.toggle_consultation_mode(ConsultationMode::InClinic);
        assert_eq!(store.state().consultation_mode, ConsultationMode::InClinic);
    }

    #[test]
    fn test_toggle_consultation_mode_none_is_noop_from_default() {
        let mut store = ViewStateStore::new();
        assert!(!store.toggle_consultation_mode(ConsultationMode::None));
        assert_eq!(store.state().consultation_mode, ConsultationMode::None);
    }

    #[test]
    fn test_toggle_sort_key_twice_clears() {
        let mut store = ViewStateStore::new();

        assert!(store.toggle_sort_key(SortKey::Fee));
        assert_eq!(store.state().sort_key, SortKey::Fee);

        assert!(store.toggle_sort_key(SortKey::Fee));
        assert_eq!(store.state().sort_key, SortKey::None);

        store.toggle_sort_key(SortKey::Fee);
        store.toggle_sort_key(SortKey::Experience);
        assert_eq!(store.state().sort_key, SortKey::Experience);
    }

    #[test]
    fn test_toggle_specialty_checkbox_semantics() {
        let mut store = ViewStateStore::new();

        assert!(store.toggle_specialty("Cardiologist", true));
        assert!(!store.toggle_specialty("Cardiologist", true));
        assert!(store.toggle_specialty("Dentist", true));
        assert_eq!(store.state().specialties.len(), 2);

        assert!(store.toggle_specialty("Cardiologist", false));
        assert!(!store.toggle_specialty("Cardiologist", false));
        assert_eq!(
            store.state().specialties.iter().collect::<Vec<_>>(),
            vec!["Dentist"]
        );
    }

    #[test]
    fn test_toggle_specialty_ignores_empty_name() {
        let mut store = ViewStateStore::new();
        assert!(!store.toggle_specialty("", true));
        assert!(store.state().specialties.is_empty());
    }

    #[test]
    fn test_replace_all_bypasses_toggles() {
        let mut store = ViewStateStore::new();
        store.toggle_sort_key(SortKey::Fee);

        let hydrated = ViewState {
            search_term: "ali".to_string(),
            sort_key: SortKey::Fee,
            ..ViewState::default()
        };

        assert!(store.replace_all(hydrated.clone()));
        assert_eq!(store.state(), &hydrated);
        assert!(!store.replace_all(hydrated));
    }

    #[test]
    fn test_query_values_round_trip() {
        for mode in [ConsultationMode::Video, ConsultationMode::InClinic] {
            let value = mode.as_query_value().unwrap();
            assert_eq!(ConsultationMode::from_query_value(value), Some(mode));
        }
        for key in [SortKey::Fee, SortKey::Experience] {
            let value = key.as_query_value().unwrap();
            assert_eq!(SortKey::from_query_value(value), Some(key));
        }
        assert_eq!(ConsultationMode::None.as_query_value(), None);
        assert_eq!(SortKey::from_query_value("price"), None);
        assert_eq!(ConsultationMode::from_query_value("Video"), None);
    }
}
