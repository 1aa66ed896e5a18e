//! Request body for `POST /search-export`.
//!
//! Every search carries the same fixed block (email required, English
//! creators in the USA, a USA audience share above 30 %, follower-count sort,
//! acceptable audience credibility). User filters can only add the optional
//! fields listed on [`SearchParameters`]; they cannot replace the fixed block.

use serde::Serialize;

use scout_core::{BioClause, BioFilter, FilterSpec, Hashtag, LookalikeKind, Platform};

const USA_LOCATION_ID: &str = "cb8c4bd2-7661-4761-971a-c27322e2f209";
const MIN_USA_AUDIENCE_PERCENT: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactRequirement {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub preference: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Language {
    pub code: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudienceLocation {
    pub location_id: &'static str,
    pub percentage_value: u32,
    pub operator: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortBy {
    pub field: &'static str,
    pub order: &'static str,
}

/// Non-negotiable parameters sent with every search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixedParameters {
    specific_contact_details: Vec<ContactRequirement>,
    creator_language: Language,
    creator_locations: Vec<&'static str>,
    audience_locations: Vec<AudienceLocation>,
    sort_by: SortBy,
    audience_credibility_category: Vec<&'static str>,
}

impl FixedParameters {
    fn standard() -> Self {
        Self {
            specific_contact_details: vec![ContactRequirement {
                kind: "EMAIL",
                preference: "MUST_HAVE",
            }],
            creator_language: Language { code: "en" },
            creator_locations: vec![USA_LOCATION_ID],
            audience_locations: vec![AudienceLocation {
                location_id: USA_LOCATION_ID,
                percentage_value: MIN_USA_AUDIENCE_PERCENT,
                operator: "GT",
            }],
            sort_by: SortBy {
                field: "FOLLOWER_COUNT",
                order: "DESCENDING",
            },
            audience_credibility_category: vec!["EXCELLENT", "HIGH", "NORMAL"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountRange {
    pub min: u64,
    pub max: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchParameters {
    #[serde(flatten)]
    fixed: FixedParameters,
    pub work_platform_id: &'static str,
    pub max_results: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follower_count: Option<CountRange>,
    /// YouTube names its audience metric "subscribers".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscriber_count: Option<CountRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_lookalikes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience_lookalikes: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub creator_interests: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub audience_interests: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hashtags: Vec<Hashtag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio_phrase: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bio_phrase_advanced: Vec<BioClause>,
}

impl SearchParameters {
    /// Overlays `filters` on the fixed parameter block.
    ///
    /// Assumes `filters` already passed [`FilterSpec::validate`]; a half-set
    /// lookalike is simply not sent.
    #[must_use]
    pub fn from_filters(filters: &FilterSpec) -> Self {
        let (min, max) = filters.follower_bounds();
        let range = CountRange { min, max };
        let (follower_count, subscriber_count) = match filters.platform {
            Platform::Youtube => (None, Some(range)),
            _ => (Some(range), None),
        };

        let (creator_lookalikes, audience_lookalikes) = match filters.lookalike() {
            Some((LookalikeKind::Creator, handle)) => (Some(handle.to_string()), None),
            Some((LookalikeKind::Audience, handle)) => (None, Some(handle.to_string())),
            None => (None, None),
        };

        let (bio_phrase, bio_phrase_advanced) = match filters.bio_filter() {
            Some(BioFilter::Advanced(clauses)) => (None, clauses),
            Some(BioFilter::Phrase(phrase)) => (Some(phrase), Vec::new()),
            None => (None, Vec::new()),
        };

        Self {
            fixed: FixedParameters::standard(),
            work_platform_id: filters.platform.work_platform_id(),
            max_results: filters.effective_max_results(),
            follower_count,
            subscriber_count,
            creator_lookalikes,
            audience_lookalikes,
            creator_interests: filters.creator_interests.clone(),
            audience_interests: filters.audience_interests.clone(),
            hashtags: filters.hashtags.clone(),
            bio_phrase,
            bio_phrase_advanced,
        }
    }
}
