//! Error reporting for failures that are recovered locally.

use crate::error::MeetDirError;

/// Receives errors that don't interrupt the session, such as a failed
/// catalog fetch.
pub trait ErrorReporter {
    fn capture(&self, error: &MeetDirError);
}

/// Reports errors as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn capture(&self, error: &MeetDirError) {
        tracing::error!(error = %error, "captured error");
    }
}
