//! The country → state → city location hierarchy.
//!
//! Fetched once per session from the remote location source and treated as
//! immutable afterwards; the cache layer replaces it wholesale on refresh.
//! All read accessors are total: an absent key yields an empty sequence, so
//! form binding never has to special-case missing data.

use std::collections::BTreeMap;

use serde::de::{Deserialize, Deserializer};

/// Wire shape of one country entry: `{ "states": { <name>: { "cities": [...] } } }`.
#[derive(Debug, serde::Deserialize)]
struct CountryEntry {
    #[serde(default)]
    states: BTreeMap<String, StateEntry>,
}

#[derive(Debug, serde::Deserialize)]
struct StateEntry {
    #[serde(default)]
    cities: Vec<String>,
}

/// Immutable nested mapping of country → state → ordered city list.
///
/// Country and state lookup is order-insignificant (`BTreeMap`, iterated in
/// sorted order for stable display); city display order is the order the
/// source provided.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationHierarchy {
    countries: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl<'de> Deserialize<'de> for LocationHierarchy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: BTreeMap<String, CountryEntry> = BTreeMap::deserialize(deserializer)?;
        let countries = raw
            .into_iter()
            .map(|(country, entry)| {
                let states = entry
                    .states
                    .into_iter()
                    .map(|(state, s)| (state, s.cities))
                    .collect();
                (country, states)
            })
            .collect();
        Ok(Self { countries })
    }
}

const NO_CITIES: &[String] = &[];

impl LocationHierarchy {
    /// All country names, in sorted order.
    #[must_use]
    pub fn countries(&self) -> Vec<&str> {
        self.countries.keys().map(String::as_str).collect()
    }

    /// State names under `country`, in sorted order; empty if the country is
    /// not in the hierarchy.
    #[must_use]
    pub fn states_of(&self, country: &str) -> Vec<&str> {
        self.countries
            .get(country)
            .map(|states| states.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Cities under `(country, state)` in source order; empty if either key
    /// is absent.
    #[must_use]
    pub fn cities_of(&self, country: &str, state: &str) -> &[String] {
        self.countries
            .get(country)
            .and_then(|states| states.get(state))
            .map_or(NO_CITIES, Vec::as_slice)
    }

    #[must_use]
    pub fn contains_country(&self, country: &str) -> bool {
        self.countries.contains_key(country)
    }

    #[must_use]
    pub fn contains_state(&self, country: &str, state: &str) -> bool {
        self.countries
            .get(country)
            .is_some_and(|states| states.contains_key(state))
    }

    #[must_use]
    pub fn contains_city(&self, country: &str, state: &str, city: &str) -> bool {
        self.cities_of(country, state).iter().any(|c| c == city)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LocationHierarchy {
        serde_json::from_value(serde_json::json!({
            "Nigeria": {
                "states": {
                    "Lagos": { "cities": ["Ikeja", "Lekki"] },
                    "Oyo": { "cities": ["Ibadan"] }
                }
            },
            "Kenya": {
                "states": {
                    "Nairobi County": { "cities": ["Nairobi"] }
                }
            }
        }))
        .expect("sample hierarchy should deserialize")
    }

    #[test]
    fn countries_sorted() {
        let h = sample();
        assert_eq!(h.countries(), vec!["Kenya", "Nigeria"]);
    }

    #[test]
    fn states_of_known_country() {
        let h = sample();
        assert_eq!(h.states_of("Nigeria"), vec!["Lagos", "Oyo"]);
    }

    #[test]
    fn states_of_unknown_country_is_empty() {
        let h = sample();
        assert!(h.states_of("Ghana").is_empty());
    }

    #[test]
    fn cities_keep_source_order() {
        let h = sample();
        assert_eq!(h.cities_of("Nigeria", "Lagos"), ["Ikeja", "Lekki"]);
    }

    #[test]
    fn cities_of_unknown_state_is_empty() {
        let h = sample();
        assert!(h.cities_of("Nigeria", "Abia").is_empty());
        assert!(h.cities_of("Ghana", "Lagos").is_empty());
    }

    #[test]
    fn contains_city_checks_full_path() {
        let h = sample();
        assert!(h.contains_city("Nigeria", "Lagos", "Lekki"));
        assert!(!h.contains_city("Nigeria", "Oyo", "Lekki"));
    }

    #[test]
    fn country_without_states_key_deserializes_empty() {
        let h: LocationHierarchy =
            serde_json::from_value(serde_json::json!({ "Ghana": {} })).expect("deserialize");
        assert!(h.contains_country("Ghana"));
        assert!(h.states_of("Ghana").is_empty());
    }

    #[test]
    fn empty_object_is_empty_hierarchy() {
        let h: LocationHierarchy = serde_json::from_value(serde_json::json!({})).expect("ok");
        assert!(h.is_empty());
        assert!(h.countries().is_empty());
    }
}
