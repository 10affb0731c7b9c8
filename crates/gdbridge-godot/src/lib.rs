//! Godot integration for gdbridge
//!
//! Locates and validates the engine executable, translates request
//! parameters into the operations script's naming convention, and builds
//! and runs headless operation commands.

pub mod detect;
pub mod executor;
pub mod operation;
pub mod params;
pub mod project;
pub mod version;

pub use detect::{PathResolver, Platform, ResolverOptions};
pub use executor::{OperationExecutor, OperationOutput};
pub use operation::OperationCommand;
pub use params::ParameterCodec;
pub use version::GodotVersion;
