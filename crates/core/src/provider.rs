use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::sync::OnceLock;

use crate::error::FetchError;

/// Numeric value used for fee/experience strings that carry no usable number.
///
/// Malformed fees therefore sort first when ordering by fee, and malformed
/// experience sorts last when ordering by experience.
pub const MALFORMED_NUMBER_FALLBACK: u64 = 0;

/// Specialty entry attached to a provider
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Specialty {
    pub name: String,
}

/// Provider record from the catalog
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ProviderRecord {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub video_consult: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub in_clinic: bool,
    #[serde(
        default,
        rename = "specialities",
        deserialize_with = "null_as_default"
    )]
    pub specialties: Vec<Specialty>,
    #[serde(default)]
    pub fees: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
}

impl ProviderRecord {
    /// Fee amount used for ordering, falling back to [`MALFORMED_NUMBER_FALLBACK`]
    pub fn fee_amount(&self) -> u64 {
        self.fees
            .as_deref()
            .and_then(parse_fee)
            .unwrap_or(MALFORMED_NUMBER_FALLBACK)
    }

    /// Years of experience used for ordering, falling back to [`MALFORMED_NUMBER_FALLBACK`]
    pub fn experience_years(&self) -> u64 {
        self.experience
            .as_deref()
            .and_then(parse_experience)
            .unwrap_or(MALFORMED_NUMBER_FALLBACK)
    }

    pub fn specialty_names(&self) -> impl Iterator<Item = &str> {
        self.specialties.iter().map(|s| s.name.as_str())
    }

    /// True when at least one of this provider's specialties is in `wanted`
    pub fn has_any_specialty(&self, wanted: &BTreeSet<String>) -> bool {
        self.specialty_names().any(|name| wanted.contains(name))
    }
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn fee_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[0-9][0-9,]*").unwrap())
}

fn experience_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*([0-9]+)").unwrap())
}

/// Extract the first integer amount from a fee string
///
/// Currency symbols and surrounding text are ignored, thousands separators are
/// accepted: "₹ 500" -> 500, "₹ 1,200" -> 1200. Returns `None` when the string
/// has no digits or the amount does not fit in a `u64`.
pub fn parse_fee(fee: &str) -> Option<u64> {
    let digits: String = fee_pattern()
        .find(fee)?
        .as_str()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Extract the leading integer from an experience string
///
/// "13 Years of experience" -> 13. Anything not starting with a number
/// (after whitespace) yields `None`.
pub fn parse_experience(experience: &str) -> Option<u64> {
    experience_pattern()
        .captures(experience)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

/// Parse the catalog JSON payload into provider records
pub fn parse_catalog(body: &str) -> Result<Vec<ProviderRecord>, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))
}
