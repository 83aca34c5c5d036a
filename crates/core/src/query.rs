//! View state <-> URL query string
//!
//! Pure functions mapping a [`ViewState`] to the query string persisted in the
//! page URL and back. Both directions are total: encoding never fails and
//! decoding ignores anything it does not understand.

use crate::state::{ConsultationMode, SortKey, ViewState};

pub const SEARCH_KEY: &str = "search";
pub const CONSULTATION_KEY: &str = "consultationType";
pub const SPECIALTY_KEY: &str = "specialty";
pub const SORT_KEY: &str = "sort";

/// Encode a view state as a query string (without the leading `?`)
///
/// Only non-default fields are emitted, in lexicographic key order, with one
/// `specialty` pair per selected specialty. The default state encodes to "".
pub fn encode(state: &ViewState) -> String {
    let mut pairs: Vec<(&str, &str)> = Vec::new();

    if let Some(mode) = state.consultation_mode.as_query_value() {
        pairs.push((CONSULTATION_KEY, mode));
    }
    if !state.search_term.is_empty() {
        pairs.push((SEARCH_KEY, &state.search_term));
    }
    if let Some(sort) = state.sort_key.as_query_value() {
        pairs.push((SORT_KEY, sort));
    }
    for specialty in &state.specialties {
        pairs.push((SPECIALTY_KEY, specialty));
    }

    pairs
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Decode a query string (with or without the leading `?`) into a view state
///
/// Unknown keys, unknown enum values, empty values and undecodable
/// percent-escapes are ignored. For single-valued keys the last usable
/// occurrence wins.
pub fn decode(query: &str) -> ViewState {
    let mut state = ViewState::default();
    let query = query.strip_prefix('?').unwrap_or(query);

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
        let (Some(key), Some(value)) = (decode_component(raw_key), decode_component(raw_value))
        else {
            continue;
        };
        if value.is_empty() {
            continue;
        }

        match key.as_str() {
            SEARCH_KEY => state.search_term = value,
            CONSULTATION_KEY => {
                if let Some(mode) = ConsultationMode::from_query_value(&value) {
                    state.consultation_mode = mode;
                }
            }
            SPECIALTY_KEY => {
                state.specialties.insert(value);
            }
            SORT_KEY => {
                if let Some(sort) = SortKey::from_query_value(&value) {
                    state.sort_key = sort;
                }
            }
            _ => {}
        }
    }

    state
}

/// Form-style decoding: `+` is a space, then percent-escapes are resolved
fn decode_component(raw: &str) -> Option<String> {
    urlencoding::decode(&raw.replace('+', " "))
        .ok()
        .map(|decoded| decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_specialties(names: &[&str]) -> ViewState {
        ViewState {
            specialties: names.iter().map(|n| n.to_string()).collect(),
            ..ViewState::default()
        }
    }

    #[test]
    fn test_encode_default_is_empty() {
        assert_eq!(encode(&ViewState::default()), "");
    }

    #[test]
    fn test_encode_omits_default_fields() {
        let state = ViewState {
            search_term: "ali".to_string(),
            ..ViewState::default()
        };
        assert_eq!(encode(&state), "search=ali");
    }

    #[test]
    fn test_encode_full_state_key_order() {
        let state = ViewState {
            search_term: "ali".to_string(),
            consultation_mode: ConsultationMode::InClinic,
            specialties: ["Dentist".to_string(), "Cardiologist".to_string()].into(),
            sort_key: SortKey::Experience,
        };

        assert_eq!(
            encode(&state),
            "consultationType=inClinic&search=ali&sort=experience&specialty=Cardiologist&specialty=Dentist"
        );
    }

    #[test]
    fn test_encode_escapes_values() {
        let state = ViewState {
            search_term: "dr a&b+c".to_string(),
            specialties: ["General Physician".to_string()].into(),
            ..ViewState::default()
        };

        assert_eq!(
            encode(&state),
            "search=dr%20a%26b%2Bc&specialty=General%20Physician"
        );
    }

    #[test]
    fn test_decode_search_and_sort() {
        let state = decode("?search=ali&sort=experience");

        assert_eq!(state.search_term, "ali");
        assert_eq!(state.sort_key, SortKey::Experience);
        assert_eq!(state.consultation_mode, ConsultationMode::None);
        assert!(state.specialties.is_empty());
    }

    #[test]
    fn test_decode_without_question_mark() {
        assert_eq!(decode("sort=fees").sort_key, SortKey::Fee);
    }

    #[test]
    fn test_decode_single_and_multiple_specialties() {
        assert_eq!(
            decode("specialty=Dentist"),
            state_with_specialties(&["Dentist"])
        );
        assert_eq!(
            decode("specialty=Dentist&specialty=ENT&specialty=Dentist"),
            state_with_specialties(&["Dentist", "ENT"])
        );
    }

    #[test]
    fn test_decode_plus_and_percent() {
        let state = decode("search=dr+a%26b%2Bc&specialty=General%20Physician");

        assert_eq!(state.search_term, "dr a&b+c");
        assert!(state.specialties.contains("General Physician"));
    }

    #[test]
    fn test_decode_ignores_malformed() {
        let state = decode("?consultationType=phone&sort=price&foo=bar&search=&specialty=&=x&&search");
        assert!(state.is_default());
    }

    #[test]
    fn test_decode_ignores_invalid_utf8_escape() {
        let state = decode("search=%FF&sort=fees");
        assert_eq!(state.search_term, "");
        assert_eq!(state.sort_key, SortKey::Fee);
    }

    #[test]
    fn test_decode_last_valid_value_wins() {
        let state = decode("sort=fees&sort=experience&sort=bogus&consultationType=video&consultationType=inClinic");
        assert_eq!(state.sort_key, SortKey::Experience);
        assert_eq!(state.consultation_mode, ConsultationMode::InClinic);
    }

    #[test]
    fn test_round_trip_reachable_states() {
        let states = vec![
            ViewState::default(),
            ViewState {
                search_term: "Dr. Müller & Söhne".to_string(),
                ..ViewState::default()
            },
            ViewState {
                consultation_mode: ConsultationMode::Video,
                sort_key: SortKey::Fee,
                ..ViewState::default()
            },
            ViewState {
                search_term: " spaced  out ".to_string(),
                consultation_mode: ConsultationMode::InClinic,
                specialties: ["Ear-Nose-Throat (ENT) Specialist".to_string(), "a=b".to_string()]
                    .into(),
                sort_key: SortKey::Experience,
            },
        ];

        for state in states {
            assert_eq!(decode(&encode(&state)), state, "round trip of {state:?}");
        }
    }

    #[test]
    fn test_encode_is_stable_after_decode() {
        let query = "consultationType=video&search=ali&sort=fees&specialty=Dentist";
        assert_eq!(encode(&decode(query)), query);
    }
}
