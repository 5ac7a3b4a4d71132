//! Size parsing error types.

use thiserror::Error;

/// Errors that can occur while parsing a human readable size.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizeError {
    /// The input is not `<digits><unit>`.
    #[error("invalid syntax")]
    Syntax,
}
