//! Visible list derivation
//!
//! Pure functions computing what the presentation layer shows from the raw
//! catalog and the current [`ViewState`]. Nothing here mutates its input or
//! panics on malformed record fields.

use std::collections::BTreeSet;

use crate::provider::ProviderRecord;
use crate::state::{ConsultationMode, SortKey, ViewState};

/// Number of names offered while typing in the search box
pub const DEFAULT_SUGGESTION_LIMIT: usize = 3;

/// Compute the visible list for `state`
///
/// Filters by name search, consultation mode and specialty (any-of), then
/// sorts. Sorting is stable, so equal fees or equal experience keep catalog
/// order and `SortKey::None` returns the filtered records untouched.
pub fn apply(data: &[ProviderRecord], state: &ViewState) -> Vec<ProviderRecord> {
    let needle = state.search_term.to_lowercase();

    let mut visible: Vec<ProviderRecord> = data
        .iter()
        .filter(|record| matches_search(record, &needle))
        .filter(|record| matches_mode(record, state.consultation_mode))
        .filter(|record| matches_specialties(record, &state.specialties))
        .cloned()
        .collect();

    match state.sort_key {
        SortKey::None => {}
        SortKey::Fee => visible.sort_by_key(ProviderRecord::fee_amount),
        SortKey::Experience => {
            visible.sort_by_key(|record| std::cmp::Reverse(record.experience_years()))
        }
    }

    visible
}

fn matches_search(record: &ProviderRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    record
        .name
        .as_deref()
        .is_some_and(|name| name.to_lowercase().contains(needle))
}

fn matches_mode(record: &ProviderRecord, mode: ConsultationMode) -> bool {
    match mode {
        ConsultationMode::None => true,
        ConsultationMode::Video => record.video_consult,
        ConsultationMode::InClinic => record.in_clinic,
    }
}

fn matches_specialties(record: &ProviderRecord, wanted: &BTreeSet<String>) -> bool {
    wanted.is_empty() || record.has_any_specialty(wanted)
}

/// Distinct specialty names in the catalog, sorted lexicographically
pub fn available_specialties(data: &[ProviderRecord]) -> Vec<String> {
    data.iter()
        .flat_map(ProviderRecord::specialty_names)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Names to offer as the user types, in catalog order
///
/// Returns at most `limit` names whose lowercase form contains the lowercase
/// `term`. An empty term offers nothing.
pub fn suggestions(data: &[ProviderRecord], term: &str, limit: usize) -> Vec<String> {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    data.iter()
        .filter_map(|record| record.name.as_deref())
        .filter(|name| name.to_lowercase().contains(&needle))
        .take(limit)
        .map(str::to_string)
        .collect()
}
