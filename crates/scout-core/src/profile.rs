use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::filters::Platform;

/// Tag stamped on every profile (and CRM contact) produced by discovery.
pub const DISCOVERY_SOURCE: &str = "insightiq_discovery";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// Platform-agnostic creator record produced by the result standardizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalProfile {
    pub platform: Platform,
    pub profile_url: String,
    pub handle: String,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    pub follower_count: u64,
    pub engagement_rate: f64,
    pub bio: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Non-email/phone contact values keyed by lowercase network name
    /// (`twitter`, `linkedin`, `youtube`, ...).
    pub contact_urls: BTreeMap<String, String>,
    pub location: Location,
    pub audience_credibility: Option<String>,
    pub last_post_at: Option<String>,
    pub discovery_source: String,
}
