//! RSVP reminder policy
//!
//! A once-daily batch that nudges target attendees who have not responded
//! to an upcoming appointment, throttled per (appointment, user) pair by
//! the configured cool-down. The scheduling itself lives in infra; this
//! module owns the policy.

pub mod ports;
mod service;

pub use service::ReminderService;
