//! Response types for HTTP handlers.

mod authentication;
mod errors;

pub use authentication::*;
pub use errors::*;
