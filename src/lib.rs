//! Purpose: Library crate behind the `deco-export` CLI.
//! Exports: `api` (stable surface), `core` (decode, remap, encode), `catalog`, `notice`.
//! Role: Decode decoration inventories from decrypted saves and project them into planner schemas.
//! Invariants: Core operations are pure over in-memory buffers; I/O stays at the edges.
//! Invariants: Per-slot failures are values, never process exits.
pub mod api;
pub mod catalog;
pub mod core;
pub mod notice;
