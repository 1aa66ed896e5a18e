//! Conversion of raw InsightIQ profile records into [`CanonicalProfile`]s.

use std::collections::BTreeMap;

use scout_core::{CanonicalProfile, Location, Platform, DISCOVERY_SOURCE};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::StandardizeError;
use crate::types::{RawProfile, VendorContact, VendorProfile};

/// Standardizes a batch of vendor records for `platform`.
///
/// Records are processed independently: one that is not a JSON object, or
/// that carries a field of the wrong type, is logged and skipped. Output
/// order follows input order.
#[must_use]
pub fn standardize(raw: &[RawProfile], platform: Platform) -> Vec<CanonicalProfile> {
    let mut profiles = Vec::with_capacity(raw.len());
    for (index, record) in raw.iter().enumerate() {
        match standardize_record(record, platform) {
            Ok(profile) => profiles.push(profile),
            Err(e) => {
                warn!(record = index + 1, error = %e, "skipping unprocessable profile");
            }
        }
    }
    info!(
        platform = %platform,
        input = raw.len(),
        standardized = profiles.len(),
        "standardized search results"
    );
    profiles
}

fn standardize_record(
    record: &RawProfile,
    platform: Platform,
) -> Result<CanonicalProfile, StandardizeError> {
    if !record.is_object() {
        return Err(StandardizeError::NotAnObject);
    }
    let vendor = VendorProfile::deserialize(record)?;

    let display_name = vendor.full_name.unwrap_or_default();
    let (first_name, last_name) = split_name(&display_name);
    let contacts = first_contact_per_type(vendor.contact_details.as_deref().unwrap_or_default());

    let mut email = None;
    let mut phone = None;
    let mut contact_urls = BTreeMap::new();
    for (kind, value) in contacts {
        match kind.as_str() {
            "email" => email = Some(value),
            "phone" => phone = Some(value),
            _ => {
                contact_urls.insert(kind, value);
            }
        }
    }

    let location = vendor
        .creator_location
        .or(vendor.location)
        .map(|l| Location {
            city: l.city,
            state: l.state,
            country: l.country,
        })
        .unwrap_or_default();

    let bio = vendor
        .bio
        .filter(|b| !b.is_empty())
        .or(vendor.introduction)
        .unwrap_or_default();

    Ok(CanonicalProfile {
        platform,
        profile_url: vendor.url.unwrap_or_default(),
        handle: vendor.platform_username.unwrap_or_default(),
        display_name,
        first_name,
        last_name,
        follower_count: vendor
            .follower_count
            .filter(|&n| n > 0)
            .or(vendor.subscriber_count)
            .unwrap_or(0),
        engagement_rate: vendor.engagement_rate.unwrap_or(0.0),
        bio,
        email,
        phone,
        contact_urls,
        location,
        audience_credibility: vendor.audience_credibility_category,
        last_post_at: vendor.last_post_timestamp,
        discovery_source: DISCOVERY_SOURCE.to_string(),
    })
}

/// Keeps the first non-empty value seen for each lowercase contact type.
fn first_contact_per_type(details: &[VendorContact]) -> BTreeMap<String, String> {
    let mut contacts = BTreeMap::new();
    for detail in details {
        let kind = detail.kind.as_deref().map(str::trim).unwrap_or_default();
        let value = detail.value.as_deref().map(str::trim).unwrap_or_default();
        if kind.is_empty() || value.is_empty() {
            continue;
        }
        contacts
            .entry(kind.to_lowercase())
            .or_insert_with(|| value.to_string());
    }
    contacts
}

/// Splits a display name into `(first, last)` with every token capitalized.
///
/// The first whitespace token is the first name; the rest, space-joined, is
/// the last name. An empty name yields two empty strings.
#[must_use]
pub fn split_name(full_name: &str) -> (String, String) {
    let mut tokens = full_name.split_whitespace().map(capitalize);
    let first = tokens.next().unwrap_or_default();
    let last = tokens.collect::<Vec<_>>().join(" ");
    (first, last)
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(head) => head.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
