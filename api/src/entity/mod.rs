//! SeaORM table models
//!
//! Database row types, kept separate from the pure domain entities in
//! `domain::entities`. Conversions live in the postgres adapters.

pub mod contents;
