//! Database models for all tables.

mod user;

pub use user::{NewUser, User};
