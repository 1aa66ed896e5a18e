//! HubSpot CRM import: maps canonical creator profiles to contact properties
//! and creates them through the batch-create endpoint.

pub mod client;
pub mod error;
pub mod importer;
pub mod mapping;

pub use client::{BatchOutcome, ContactInput, HubspotClient};
pub use error::HubspotError;
pub use importer::{BatchImporter, BATCH_SIZE};
pub use mapping::contact_properties;
