//! RSVP and check-in recording
//!
//! The write path for attendance responses: one row per (appointment,
//! user) pair, created on first RSVP or first check-in and updated in
//! place afterwards.

pub mod ports;
mod service;

pub use service::{AttendanceService, RosterEntry};
