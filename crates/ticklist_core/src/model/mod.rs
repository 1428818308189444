//! Domain model for todo items.
//!
//! # Responsibility
//! - Define the single persisted entity (`Item`) and its identifier.
//! - Provide the built-in seed list and id issuance.
//!
//! # Invariants
//! - Item ids are unique within one list.
//! - New items start with `completed = false`.

pub mod id;
pub mod item;
