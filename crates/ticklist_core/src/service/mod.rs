//! Use-case services driving the item list.
//!
//! # Responsibility
//! - Keep the list view's authoritative in-memory list in step with storage.
//! - Reconcile single-item edits with the persisted list.
//! - Carry the shared appearance setting and navigation requests.
//!
//! # Invariants
//! - Services reach storage only through `ItemRepository`.

pub mod app;
pub mod item_editor;
pub mod list_sync;
pub mod navigation;
pub mod theme;
