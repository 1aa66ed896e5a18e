pub mod app_config;
pub mod clock;
pub mod config;
pub mod filters;
pub mod job;
pub mod profile;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
#[cfg(any(test, feature = "test-util"))]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use config::{load_app_config, load_app_config_from_env};
pub use filters::{
    BioAction, BioClause, BioFilter, FilterError, FilterSpec, FollowerRange, Hashtag,
    LookalikeKind, Platform,
};
pub use job::{BatchResult, DiscoverySummary, JobRecord, JobStatus, JobUpdate};
pub use profile::{CanonicalProfile, Location, DISCOVERY_SOURCE};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
