//! Profile search and filtering
//!
//! The filter itself is a pure function over an in-memory profile list; the
//! store only contributes the visible-profile snapshot. Text matching is a
//! case-insensitive substring test over name, both skill lists and location.
//! Availability filtering is OR within the selected slots; the two filters
//! compose with AND.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{Availability, PublicProfile, SearchQuery, UserProfile};
use crate::store::Store;

/// Search service over public profiles
pub struct SearchService {
    store: Arc<dyn Store>,
}

impl SearchService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Run a search on behalf of `acting_user` (whose own profile is never
    /// in the results).
    pub async fn search(
        &self,
        acting_user: Option<Uuid>,
        query: SearchQuery,
    ) -> ApiResult<Vec<PublicProfile>> {
        let term = query.q.unwrap_or_default();
        let slots = parse_availability_filter(query.availability.as_deref())?;

        let profiles = self.store.list_public_profiles(acting_user).await?;
        Ok(filter_profiles(profiles, &term, &slots)
            .into_iter()
            .map(PublicProfile::from)
            .collect())
    }
}

/// Parse the comma-separated `availability` query parameter. Unknown slot
/// labels are rejected rather than silently ignored.
fn parse_availability_filter(raw: Option<&str>) -> ApiResult<Vec<Availability>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    let mut slots = Vec::new();
    for label in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let slot = Availability::parse(label).ok_or_else(|| {
            ApiError::InvalidRequest(format!("Unknown availability option: '{}'", label))
        })?;
        if !slots.contains(&slot) {
            slots.push(slot);
        }
    }
    Ok(slots)
}

/// Apply the text and availability filters to a profile list.
///
/// An empty term matches everything; an empty slot list matches everything.
/// Both filters together are a conjunction.
fn filter_profiles(
    profiles: Vec<UserProfile>,
    term: &str,
    slots: &[Availability],
) -> Vec<UserProfile> {
    let term = term.trim().to_lowercase();
    profiles
        .into_iter()
        .filter(|p| matches_term(p, &term) && matches_availability(p, slots))
        .collect()
}

fn matches_term(profile: &UserProfile, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let contains = |s: &str| s.to_lowercase().contains(term);
    contains(&profile.name)
        || profile.skills_offered.iter().any(|s| contains(s))
        || profile.skills_wanted.iter().any(|s| contains(s))
        || profile.location.as_deref().map(contains).unwrap_or(false)
}

fn matches_availability(profile: &UserProfile, slots: &[Availability]) -> bool {
    slots.is_empty() || slots.iter().any(|s| profile.availability.contains(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str, offered: &[&str], availability: &[Availability]) -> UserProfile {
        let mut p = UserProfile::seed(Uuid::new_v4(), name.to_string(), None, None);
        p.skills_offered = offered.iter().map(|s| s.to_string()).collect();
        p.availability = availability.to_vec();
        p
    }

    fn fixture() -> Vec<UserProfile> {
        vec![
            profile("Ann", &["Guitar"], &[Availability::Weekends]),
            profile("Ben", &["Cooking"], &[Availability::Evenings]),
        ]
    }

    #[test]
    fn term_matches_skills_case_insensitively() {
        let hits = filter_profiles(fixture(), "guitar", &[]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Ann");
    }

    #[test]
    fn availability_filter_is_disjunctive() {
        let hits = filter_profiles(
            fixture(),
            "",
            &[Availability::Weekends, Availability::Evenings],
        );
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn term_and_availability_compose_with_and() {
        let hits = filter_profiles(fixture(), "guitar", &[Availability::Evenings]);
        assert!(hits.is_empty());

        let hits = filter_profiles(fixture(), "guitar", &[Availability::Weekends]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Ann");
    }

    #[test]
    fn empty_filters_match_everyone() {
        assert_eq!(filter_profiles(fixture(), "  ", &[]).len(), 2);
    }

    #[test]
    fn term_matches_location() {
        let mut profiles = fixture();
        profiles[1].location = Some("Lisbon".to_string());
        let hits = filter_profiles(profiles, "lisbon", &[]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Ben");
    }

    #[test]
    fn unknown_availability_label_is_rejected() {
        assert!(parse_availability_filter(Some("Weekends,Holidays")).is_err());
        let slots = parse_availability_filter(Some("Weekends, Evenings")).unwrap();
        assert_eq!(slots, vec![Availability::Weekends, Availability::Evenings]);
    }
}
