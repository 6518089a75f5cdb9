//! Appointment audience resolution
//!
//! Decides which users an appointment is meant for, and separately which
//! users may see it at all. The two questions stay distinct: administrators
//! can see every appointment but are not target attendees of appointments
//! whose audience does not include them.

pub mod ports;
mod service;

pub use service::VisibilityService;
