//! # overlap-engine
//!
//! Cross-timezone availability intersection for collaborative scheduling.
//!
//! Several participants, each in their own timezone, mark the times they are
//! available; the engine computes the time ranges common to all of them and
//! projects the result back into each participant's local clock. The engine is
//! pure and synchronous — the surrounding UI, realtime transport, and auth are
//! external collaborators that feed intervals in and read results back out.
//!
//! ## Modules
//!
//! - [`interval`] — interval value types and pairwise predicates
//! - [`algebra`] — list intersection, N-way intersection, coalescing
//! - [`timezone`] — wall-clock ↔ UTC normalization via `chrono-tz`
//! - [`store`] — per-participant availability, the single source of truth
//! - [`aggregator`] — cross-participant intersection and local projection
//! - [`sync`] — snapshot persistence through an opaque document mapping
//! - [`error`] — error types

pub mod aggregator;
pub mod algebra;
pub mod error;
pub mod interval;
pub mod store;
pub mod sync;
pub mod timezone;

pub use aggregator::{compute_intersection, project_for_participant};
pub use algebra::{intersect_all, intersect_lists, merge_overlapping};
pub use error::EngineError;
pub use interval::{Category, Interval, LocalInterval, UtcInterval};
pub use store::{AvailabilityStore, IntervalId, ParticipantId, StoreChange};
pub use timezone::{from_canonical, resolve, to_canonical, DstPolicy};
