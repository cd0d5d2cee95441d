//! Request types for HTTP handlers.

mod authentications;
mod paths;

pub use authentications::*;
pub use paths::*;
