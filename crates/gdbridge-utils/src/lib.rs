pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod paths;
pub mod types;

pub use error::{BridgeError, ErrorCategory, UserFriendlyError};
pub use exit_codes::ExitCode;
