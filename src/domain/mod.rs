//! Domain layer - Pure business abstractions
//!
//! Trait definitions, lending vocabulary and domain error types.
//! No HTTP types live here.

pub mod errors;
pub mod lending;
pub mod repositories;

pub use errors::{Conflict, DomainError, Missing};
pub use lending::*;
pub use repositories::*;
