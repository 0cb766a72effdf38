use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Failure taxonomy for the toolkit.
///
/// Detection ambiguity (unknown distro, unclassifiable storage) is
/// deliberately absent: those paths fall back to conservative defaults
/// instead of erroring.
#[derive(Debug, Error)]
pub enum SetupError {
    /// An external command exited non-zero. The surrounding branch aborts;
    /// nothing is rolled back or retried.
    #[error("`{command}` exited with {status}")]
    ExternalTool { command: String, status: ExitStatus },

    /// A probe exceeded its bound and was killed.
    #[error("`{command}` did not finish within {timeout:?}")]
    ToolTimeout { command: String, timeout: Duration },

    /// The operator declined to continue. Maps to exit code 1 without an
    /// extra error line; the decliner already printed why.
    #[error("cancelled")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
