//! # timed-contracts
//!
//! Policy contracts for the tracking engine. Each mutating operation on a
//! report is gated by a contract that receives the acting user explicitly;
//! there is no ambient request context. Contracts run before any write and
//! classify every denial as either a validation failure (malformed payload,
//! 400) or a forbidden one (actor lacks standing, 403).

pub mod actor;
pub mod base;
pub mod reports;

pub use actor::{ActorContext, CurrentActor};
pub use base::{PolicyError, PolicyResult};
