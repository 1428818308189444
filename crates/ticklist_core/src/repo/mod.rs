//! Repository layer over the durable item snapshot.
//!
//! # Responsibility
//! - Own the single store key holding the full item list.
//! - Turn whole-snapshot read-modify-write cycles into queued, atomic
//!   item-level operations for both synchronizers.
//!
//! # Invariants
//! - Every write path runs behind one FIFO write lock per repository.
//! - Reads never mask corrupt snapshots; they return `RepoError::Codec`.

pub mod item_repo;
