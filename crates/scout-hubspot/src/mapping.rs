//! Canonical profile → HubSpot contact property mapping.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use scout_core::CanonicalProfile;
use serde_json::Value;

/// HubSpot rejects longer values for multi-line text properties.
pub const MAX_BIO_CHARS: usize = 5000;

/// Builds the property map for one contact.
///
/// Optional profile fields that are absent are left out of the map; HubSpot
/// treats an explicit `null` as a validation error.
#[must_use]
pub fn contact_properties(
    profile: &CanonicalProfile,
    job_id: &str,
    discovered_at: DateTime<Utc>,
) -> BTreeMap<String, Value> {
    let mut props = BTreeMap::new();
    let mut put = |key: &str, value: Value| {
        props.insert(key.to_string(), value);
    };

    put("platform", Value::from(profile.platform.as_str()));
    put("profile_url", Value::from(profile.profile_url.as_str()));
    put("social_handle", Value::from(profile.handle.as_str()));
    put("firstname", Value::from(profile.first_name.as_str()));
    put("lastname", Value::from(profile.last_name.as_str()));
    put("followers", Value::from(profile.follower_count));
    put("engagement_rate", Value::from(profile.engagement_rate));
    put("bio", Value::from(truncate_chars(&profile.bio, MAX_BIO_CHARS)));
    put("discovery_source", Value::from(profile.discovery_source.as_str()));
    put("discovery_job_id", Value::from(job_id));
    put(
        "discovery_date",
        Value::from(discovered_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
    );
    put("enrichment_status", Value::from("pending"));
    put("lifecycle_stage", Value::from("lead"));

    let optional = [
        ("email", profile.email.as_deref()),
        ("phone", profile.phone.as_deref()),
        ("city", profile.location.city.as_deref()),
        ("state", profile.location.state.as_deref()),
        ("country", profile.location.country.as_deref()),
        ("audience_credibility", profile.audience_credibility.as_deref()),
        ("last_post_date", profile.last_post_at.as_deref()),
    ];
    for (key, value) in optional {
        if let Some(v) = value {
            put(key, Value::from(v));
        }
    }

    for (network, url) in &profile.contact_urls {
        put(&format!("{network}_url"), Value::from(url.as_str()));
    }

    props
}

/// Truncates to at most `max` characters without splitting a code point.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
