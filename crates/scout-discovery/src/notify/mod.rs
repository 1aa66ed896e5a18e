mod backend;
mod noop;
mod slack;

pub use backend::{FailureReport, JobReport, Notifier, NotifyError};
pub use noop::NoopNotifier;
pub use slack::SlackNotifier;
