//! Caller identity
//!
//! Extraction of the pre-authenticated actor id from request headers.

pub mod actor;

pub use actor::actor_middleware;
