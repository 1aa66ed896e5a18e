//! InsightIQ search-export wire types.

use serde::Deserialize;

/// One vendor profile record, kept untyped until standardization so a single
/// malformed record cannot fail a whole page.
pub type RawProfile = serde_json::Value;

/// Body returned when an export job is accepted: `{ "id": "..." }`.
#[derive(Debug, Deserialize)]
pub struct ExportAccepted {
    #[serde(default)]
    pub id: Option<String>,
}

/// One page from `GET /search-export/{id}`.
///
/// While the job runs the vendor answers `{"status": "IN_PROGRESS"}`; a
/// finished job answers with `data` and `metadata.total_results`.
#[derive(Debug, Default, Deserialize)]
pub struct ExportPage {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub data: Option<Vec<RawProfile>>,
    #[serde(default)]
    pub metadata: Option<ExportMetadata>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportMetadata {
    #[serde(default)]
    pub total_results: usize,
}

/// Interpretation of an [`ExportPage`] for the poll loop.
#[derive(Debug)]
pub enum PageState {
    InProgress,
    Failed(String),
    Ready {
        profiles: Vec<RawProfile>,
        total_results: usize,
    },
}

impl ExportPage {
    #[must_use]
    pub fn into_state(self) -> PageState {
        match self.status.as_deref() {
            Some("IN_PROGRESS") => PageState::InProgress,
            Some("FAILED") => PageState::Failed(
                self.error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| "Unknown error".to_string()),
            ),
            _ => PageState::Ready {
                profiles: self.data.unwrap_or_default(),
                total_results: self.metadata.map_or(0, |m| m.total_results),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Vendor profile record
// ---------------------------------------------------------------------------

/// Typed view of a [`RawProfile`]. Every field is optional; a field that is
/// present with the wrong JSON type makes the record malformed.
#[derive(Debug, Deserialize)]
pub(crate) struct VendorProfile {
    pub url: Option<String>,
    pub platform_username: Option<String>,
    pub full_name: Option<String>,
    pub follower_count: Option<u64>,
    pub subscriber_count: Option<u64>,
    pub engagement_rate: Option<f64>,
    pub bio: Option<String>,
    pub introduction: Option<String>,
    pub contact_details: Option<Vec<VendorContact>>,
    pub creator_location: Option<VendorLocation>,
    pub location: Option<VendorLocation>,
    pub audience_credibility_category: Option<String>,
    pub last_post_timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VendorContact {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct VendorLocation {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}
