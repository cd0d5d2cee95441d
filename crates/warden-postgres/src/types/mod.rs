//! Shared database types.

mod constraint;

pub use self::constraint::UserConstraints;
