//! Generic handlers shipped with the crate.
//!
//! Real deployments supply their own [`GenericHandler`]; the echo handler
//! backs the binary and the integration tests.
//!
//! [`GenericHandler`]: crate::adapter::GenericHandler

pub mod echo;

pub use echo::{EchoFactory, EchoHandler, FAIL_PATH};
