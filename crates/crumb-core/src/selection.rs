//! Cascading country → state → city selection.
//!
//! Every form that captures a delivery or vendor location goes through this
//! state machine. The invariant it defends: a set `state` always belongs to
//! the set `country`, and a set `city` always belongs to the set `(country,
//! state)` pair, as far as the hierarchy knows them. Violations are corrected
//! by clearing the offending downstream fields in the same committed write,
//! never by keeping an inconsistent triple.
//!
//! A value is accepted at the level being set even when the hierarchy does
//! not list it (the fetched data set can lag the backend); only the fields
//! *below* a change are re-validated. That is the most defensive of the
//! reset variants the original forms disagreed on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hierarchy::LocationHierarchy;

/// One level of the cascading selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Country,
    State,
    City,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Country => write!(f, "country"),
            Level::State => write!(f, "state"),
            Level::City => write!(f, "city"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// A dependent level was set before its prerequisite.
    #[error("cannot set {attempted} before {missing} is selected")]
    InvalidTransition { attempted: Level, missing: Level },
}

/// Which downstream fields a transition cleared.
///
/// Returned so the form layer knows which controls to re-render; the clears
/// themselves have already been committed when the caller sees this.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cascade {
    pub cleared_state: bool,
    pub cleared_city: bool,
}

impl Cascade {
    #[must_use]
    pub fn is_noop(self) -> bool {
        !self.cleared_state && !self.cleared_city
    }
}

/// The committed `(country, state, city)` triple.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
}

impl Selection {
    /// Select a country. Always legal.
    ///
    /// A surviving `state` is one the hierarchy lists under the new country;
    /// otherwise `state` and `city` are cleared together. When `state`
    /// survives, `city` is still re-checked against `(country, state)` and
    /// cleared on its own if stale.
    pub fn set_country(
        &mut self,
        hierarchy: &LocationHierarchy,
        country: impl Into<String>,
    ) -> Cascade {
        let country = country.into();
        let mut cascade = Cascade::default();

        if let Some(state) = &self.state {
            if hierarchy.contains_state(&country, state) {
                if let Some(city) = &self.city {
                    if !hierarchy.contains_city(&country, state, city) {
                        self.city = None;
                        cascade.cleared_city = true;
                    }
                }
            } else {
                self.state = None;
                self.city = None;
                cascade.cleared_state = true;
                cascade.cleared_city = true;
            }
        } else if self.city.is_some() {
            // City without state is already a violation; repair it here.
            self.city = None;
            cascade.cleared_city = true;
        }

        self.country = Some(country);
        cascade
    }

    /// Select a state. Requires a country.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::InvalidTransition`] when no country is set;
    /// the selection is left untouched.
    pub fn set_state(
        &mut self,
        hierarchy: &LocationHierarchy,
        state: impl Into<String>,
    ) -> Result<Cascade, SelectionError> {
        let Some(country) = &self.country else {
            return Err(SelectionError::InvalidTransition {
                attempted: Level::State,
                missing: Level::Country,
            });
        };

        let state = state.into();
        let mut cascade = Cascade::default();
        if let Some(city) = &self.city {
            if !hierarchy.contains_city(country, &state, city) {
                self.city = None;
                cascade.cleared_city = true;
            }
        }
        self.state = Some(state);
        Ok(cascade)
    }

    /// Select a city. Requires a state.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::InvalidTransition`] when no state is set;
    /// the selection is left untouched.
    pub fn set_city(&mut self, city: impl Into<String>) -> Result<(), SelectionError> {
        if self.state.is_none() {
            return Err(SelectionError::InvalidTransition {
                attempted: Level::City,
                missing: Level::State,
            });
        }
        self.city = Some(city.into());
        Ok(())
    }

    /// Clear all three fields. Always legal, idempotent.
    pub fn reset(&mut self) {
        self.country = None;
        self.state = None;
        self.city = None;
    }

    /// Repair a selection that was not built through the transitions — one
    /// rehydrated from storage, possibly against a newer hierarchy.
    ///
    /// Stricter than the transitions: stored data has nothing vouching for
    /// it, so a state the hierarchy does not list under the stored country is
    /// cleared (along with the city), and likewise for an unlisted city.
    /// Call this only once the hierarchy is available.
    pub fn normalize(&mut self, hierarchy: &LocationHierarchy) -> Cascade {
        let mut cascade = Cascade::default();

        let state_ok = match (&self.country, &self.state) {
            (Some(country), Some(state)) => hierarchy.contains_state(country, state),
            (None, Some(_)) => false,
            _ => true,
        };
        if !state_ok {
            cascade.cleared_state = self.state.take().is_some();
            cascade.cleared_city = self.city.take().is_some();
            return cascade;
        }

        let city_ok = match (&self.country, &self.state, &self.city) {
            (Some(country), Some(state), Some(city)) => {
                hierarchy.contains_city(country, state, city)
            }
            (_, None, Some(_)) => false,
            _ => true,
        };
        if !city_ok {
            self.city = None;
            cascade.cleared_city = true;
        }

        cascade
    }

    /// Structural dependency check: a state requires a country, a city
    /// requires a state.
    ///
    /// Membership against the hierarchy is enforced by the transitions when
    /// an upstream field changes, and by [`Selection::normalize`] for
    /// rehydrated data; this accessor only detects orphaned fields.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        !(self.country.is_none() && self.state.is_some())
            && !(self.state.is_none() && self.city.is_some())
    }

    /// State option list for the committed country; empty when none is set.
    #[must_use]
    pub fn state_options<'h>(&self, hierarchy: &'h LocationHierarchy) -> Vec<&'h str> {
        self.country
            .as_deref()
            .map(|c| hierarchy.states_of(c))
            .unwrap_or_default()
    }

    /// City option list for the committed `(country, state)`; empty unless
    /// both are set.
    #[must_use]
    pub fn city_options<'h>(&self, hierarchy: &'h LocationHierarchy) -> &'h [String] {
        match (self.country.as_deref(), self.state.as_deref()) {
            (Some(country), Some(state)) => hierarchy.cities_of(country, state),
            _ => &[],
        }
    }

    /// True when all three levels are selected.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.country.is_some() && self.state.is_some() && self.city.is_some()
    }
}

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;
