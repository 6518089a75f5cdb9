//! Attendance outcome classification
//!
//! Pure decision table for one (user, appointment) pair. An RSVP of `no`
//! is an excused absence: it never breaks a streak and never extends one.
//! A `yes` is trusted as attendance unless check-ins were performed for
//! the appointment at all, in which case the user's own check-in result is
//! authoritative. A `maybe` is never auto-credited. No response at all
//! breaks the streak.

use rollcall_domain::{AttendanceOutcome, Rsvp};

/// Classify one eligible past appointment for a user.
///
/// `checkin_performed` is an appointment-level flag: whether the organizer
/// recorded a check-in for anyone at all. `checkin` is this user's own
/// check-in state. Rows whose stored RSVP did not decode arrive here as
/// `None` and fall through to a break.
pub fn classify(
    rsvp: Option<Rsvp>,
    checkin_performed: bool,
    checkin: Option<Rsvp>,
) -> AttendanceOutcome {
    match rsvp {
        None => AttendanceOutcome::Break,
        Some(Rsvp::No) => AttendanceOutcome::Skip,
        Some(Rsvp::Yes) if !checkin_performed => AttendanceOutcome::Attend,
        Some(Rsvp::Yes | Rsvp::Maybe) => {
            if checkin == Some(Rsvp::Yes) {
                AttendanceOutcome::Attend
            } else {
                AttendanceOutcome::Break
            }
        }
    }
}
