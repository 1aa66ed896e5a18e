//! Discovery job orchestration: search → standardize → import, with job
//! status tracking, a worker queue, and best-effort notifications.

pub mod error;
pub mod notify;
pub mod orchestrator;
pub mod ports;
pub mod queue;

pub use error::DiscoveryError;
pub use notify::{FailureReport, JobReport, NoopNotifier, Notifier, NotifyError, SlackNotifier};
pub use orchestrator::{DiscoveryOrchestrator, Stage, MAX_ERROR_CHARS};
pub use ports::{ContactImporter, ProfileSearch};
pub use queue::{JobQueue, QUEUE_CAPACITY};
