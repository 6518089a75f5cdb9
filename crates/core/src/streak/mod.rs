//! Attendance streak computation
//!
//! Replays a user's chronological history of past appointments they were
//! eligible for, classifies each as attend/skip/break, and derives the
//! cached per-user streak aggregate. Recalculation always replays the full
//! history; nothing is incrementally patched.

pub mod classifier;
pub mod ports;
mod service;

pub use service::StreakService;
