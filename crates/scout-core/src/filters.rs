//! User-supplied discovery filters and their validation rules.
//!
//! A [`FilterSpec`] is deserialized straight from the request body (HTTP or
//! CLI JSON). It carries only the user-configurable fields; the vendor's fixed
//! parameter block is added later by the search client and never comes from
//! here.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MAX_RESULTS: u32 = 500;
pub const MAX_RESULTS_CAP: u32 = 4000;
pub const DEFAULT_FOLLOWER_MIN: u64 = 20_000;
pub const DEFAULT_FOLLOWER_MAX: u64 = 900_000;
pub const MAX_BIO_CLAUSES: usize = 14;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Instagram,
    Youtube,
    Tiktok,
    Facebook,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Instagram,
        Platform::Youtube,
        Platform::Tiktok,
        Platform::Facebook,
    ];

    /// Vendor identifier for the platform's work-platform record.
    #[must_use]
    pub fn work_platform_id(self) -> &'static str {
        match self {
            Platform::Instagram => "9bb8913b-ddd9-430b-a66a-d74d846e6c66",
            Platform::Youtube => "14d9ddf5-51c6-415e-bde6-f8ed36ad7054",
            Platform::Tiktok => "de55aeec-0dc8-4119-bf90-16b3d1f0c987",
            Platform::Facebook => "ad2fec62-2987-40a0-89fb-23485972598c",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Youtube => "youtube",
            Platform::Tiktok => "tiktok",
            Platform::Facebook => "facebook",
        }
    }

    /// Human-readable name used in notifications.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::Youtube => "YouTube",
            Platform::Tiktok => "TikTok",
            Platform::Facebook => "Facebook",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FilterError::UnsupportedPlatform(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookalikeKind {
    Creator,
    Audience,
}

impl std::fmt::Display for LookalikeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookalikeKind::Creator => write!(f, "creator"),
            LookalikeKind::Audience => write!(f, "audience"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BioAction {
    And,
    Or,
    Not,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BioClause {
    pub bio_phrase: String,
    pub action: BioAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hashtag {
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowerRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u64>,
}

/// Bio constraint actually sent to the vendor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BioFilter {
    Advanced(Vec<BioClause>),
    Phrase(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    pub platform: Platform,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follower_count: Option<FollowerRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookalike_type: Option<LookalikeKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookalike_username: Option<String>,
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

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("max_results must be between 1 and 4000")]
    ZeroMaxResults,

    #[error("follower_count min ({min}) is greater than max ({max})")]
    InvertedFollowerRange { min: u64, max: u64 },

    #[error("lookalike_username required when lookalike_type is set to '{0}'")]
    MissingLookalikeHandle(LookalikeKind),

    #[error("lookalike_type required when lookalike_username is set")]
    MissingLookalikeType,
}

impl FilterSpec {
    #[must_use]
    pub fn for_platform(platform: Platform) -> Self {
        Self {
            platform,
            ..Self::default()
        }
    }

    /// Checks the cross-field rules that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns the first [`FilterError`] found.
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.max_results == Some(0) {
            return Err(FilterError::ZeroMaxResults);
        }

        let (min, max) = self.follower_bounds();
        if min > max {
            return Err(FilterError::InvertedFollowerRange { min, max });
        }

        match (self.lookalike_type, self.lookalike_handle()) {
            (Some(kind), None) => Err(FilterError::MissingLookalikeHandle(kind)),
            (None, Some(_)) => Err(FilterError::MissingLookalikeType),
            _ => Ok(()),
        }
    }

    /// Requested result cap, defaulted and clamped to the vendor maximum.
    #[must_use]
    pub fn effective_max_results(&self) -> u32 {
        self.max_results
            .unwrap_or(DEFAULT_MAX_RESULTS)
            .min(MAX_RESULTS_CAP)
    }

    #[must_use]
    pub fn follower_bounds(&self) -> (u64, u64) {
        let range = self.follower_count.unwrap_or_default();
        (
            range.min.unwrap_or(DEFAULT_FOLLOWER_MIN),
            range.max.unwrap_or(DEFAULT_FOLLOWER_MAX),
        )
    }

    /// Trimmed lookalike handle; whitespace-only counts as absent.
    #[must_use]
    pub fn lookalike_handle(&self) -> Option<&str> {
        self.lookalike_username
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
    }

    /// Lookalike mode and handle, present only when both halves are set.
    #[must_use]
    pub fn lookalike(&self) -> Option<(LookalikeKind, &str)> {
        Some((self.lookalike_type?, self.lookalike_handle()?))
    }

    /// Resolves the bio constraint. Advanced clauses win over the plain phrase
    /// when at least one non-blank clause survives; the list is capped at
    /// [`MAX_BIO_CLAUSES`].
    #[must_use]
    pub fn bio_filter(&self) -> Option<BioFilter> {
        let clauses: Vec<BioClause> = self
            .bio_phrase_advanced
            .iter()
            .filter_map(|c| {
                let phrase = c.bio_phrase.trim();
                (!phrase.is_empty()).then(|| BioClause {
                    bio_phrase: phrase.to_string(),
                    action: c.action,
                })
            })
            .take(MAX_BIO_CLAUSES)
            .collect();

        if !clauses.is_empty() {
            return Some(BioFilter::Advanced(clauses));
        }

        self.bio_phrase
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| BioFilter::Phrase(p.to_string()))
    }
}
