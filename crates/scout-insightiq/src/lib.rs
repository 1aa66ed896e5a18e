//! InsightIQ creator-search client: request building, asynchronous export
//! polling, and standardization of vendor profiles.

pub mod client;
pub mod error;
pub mod normalize;
pub mod params;
pub mod poll;
pub mod types;

pub use client::InsightIqClient;
pub use error::{InsightIqError, StandardizeError};
pub use normalize::{split_name, standardize};
pub use params::SearchParameters;
pub use poll::PollPolicy;
pub use types::RawProfile;
