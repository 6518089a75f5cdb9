//! Mock port implementations for testing
//!
//! Provides in-memory mocks for all core ports, enabling deterministic
//! behaviour tests without database dependencies.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rollcall_core::attendance::ports::ResponseWriter;
use rollcall_core::reminder::ports::{NotificationSink, ReminderLogStore};
use rollcall_core::streak::ports::{AppointmentReader, ResponseReader, StreakStore};
use rollcall_core::visibility::ports::DirectoryPort;
use rollcall_domain::{
    Appointment, AttendanceResponse, ReminderLog, Result as DomainResult, RollcallError, Streak,
    User,
};

/// In-memory mock for [`DirectoryPort`].
///
/// Groups and teams are stored as membership lists; per-user membership
/// sets are derived by scanning, which is plenty for test-sized data.
/// Unknown user ids yield empty sets, matching the degradation contract.
#[derive(Default)]
pub struct MockDirectory {
    users: Vec<User>,
    groups: HashMap<String, Vec<String>>,
    teams: HashMap<String, Vec<String>>,
    admins: HashSet<String>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, id: &str, display_name: &str) -> Self {
        self.users.push(User::new(id, display_name));
        self
    }

    pub fn with_group(mut self, group_id: &str, members: &[&str]) -> Self {
        self.groups
            .insert(group_id.to_string(), members.iter().map(ToString::to_string).collect());
        self
    }

    pub fn with_team(mut self, team_id: &str, members: &[&str]) -> Self {
        self.teams
            .insert(team_id.to_string(), members.iter().map(ToString::to_string).collect());
        self
    }

    pub fn with_admin(mut self, user_id: &str) -> Self {
        self.admins.insert(user_id.to_string());
        self
    }
}

#[async_trait]
impl DirectoryPort for MockDirectory {
    async fn get_user(&self, user_id: &str) -> DomainResult<Option<User>> {
        Ok(self.users.iter().find(|user| user.id == user_id).cloned())
    }

    async fn list_all_users(&self, search: Option<&str>) -> DomainResult<Vec<User>> {
        Ok(self
            .users
            .iter()
            .filter(|user| search.map_or(true, |term| user.display_name.contains(term)))
            .cloned()
            .collect())
    }

    async fn group_ids_of(&self, user_id: &str) -> DomainResult<BTreeSet<String>> {
        Ok(self
            .groups
            .iter()
            .filter(|(_, members)| members.iter().any(|member| member == user_id))
            .map(|(group_id, _)| group_id.clone())
            .collect())
    }

    async fn team_ids_of(&self, user_id: &str) -> DomainResult<BTreeSet<String>> {
        Ok(self
            .teams
            .iter()
            .filter(|(_, members)| members.iter().any(|member| member == user_id))
            .map(|(team_id, _)| team_id.clone())
            .collect())
    }

    async fn group_members(&self, group_id: &str) -> DomainResult<Vec<String>> {
        Ok(self.groups.get(group_id).cloned().unwrap_or_default())
    }

    async fn team_members(&self, team_id: &str) -> DomainResult<Vec<String>> {
        Ok(self.teams.get(team_id).cloned().unwrap_or_default())
    }

    async fn has_manage_permission(&self, user_id: &str) -> DomainResult<bool> {
        Ok(self.admins.contains(user_id))
    }
}

/// In-memory mock for [`AppointmentReader`].
#[derive(Default)]
pub struct MockAppointmentRepository {
    appointments: Vec<Appointment>,
}

impl MockAppointmentRepository {
    pub fn new(appointments: Vec<Appointment>) -> Self {
        Self { appointments }
    }
}

#[async_trait]
impl AppointmentReader for MockAppointmentRepository {
    async fn find(&self, appointment_id: i64) -> DomainResult<Option<Appointment>> {
        Ok(self
            .appointments
            .iter()
            .find(|appointment| appointment.id == appointment_id && appointment.active)
            .cloned())
    }

    async fn find_past(&self, now: DateTime<Utc>) -> DomainResult<Vec<Appointment>> {
        // Reversed so callers cannot lean on storage order
        let mut past: Vec<Appointment> = self
            .appointments
            .iter()
            .filter(|appointment| appointment.active && appointment.is_past(now))
            .cloned()
            .collect();
        past.reverse();
        Ok(past)
    }

    async fn find_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> DomainResult<Vec<Appointment>> {
        Ok(self
            .appointments
            .iter()
            .filter(|appointment| {
                appointment.active && appointment.start >= from && appointment.start <= until
            })
            .cloned()
            .collect())
    }
}

/// In-memory mock for [`ResponseReader`] and [`ResponseWriter`].
#[derive(Default)]
pub struct MockResponseStore {
    rows: Mutex<Vec<AttendanceResponse>>,
    fail_for_user: Option<String>,
}

impl MockResponseStore {
    pub fn new(rows: Vec<AttendanceResponse>) -> Self {
        Self { rows: Mutex::new(rows), fail_for_user: None }
    }

    /// Make `find_by_user` fail for one user, for batch-isolation tests.
    pub fn failing_for(mut self, user_id: &str) -> Self {
        self.fail_for_user = Some(user_id.to_string());
        self
    }

    pub fn rows(&self) -> Vec<AttendanceResponse> {
        self.rows.lock().expect("response store lock poisoned").clone()
    }
}

#[async_trait]
impl ResponseReader for MockResponseStore {
    async fn find_by_user(&self, user_id: &str) -> DomainResult<Vec<AttendanceResponse>> {
        if self.fail_for_user.as_deref() == Some(user_id) {
            return Err(RollcallError::Database(format!("simulated failure for {user_id}")));
        }
        Ok(self
            .rows
            .lock()
            .expect("response store lock poisoned")
            .iter()
            .filter(|row| row.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_appointment(
        &self,
        appointment_id: i64,
    ) -> DomainResult<Vec<AttendanceResponse>> {
        Ok(self
            .rows
            .lock()
            .expect("response store lock poisoned")
            .iter()
            .filter(|row| row.appointment_id == appointment_id)
            .cloned()
            .collect())
    }

    async fn appointments_with_checkins(
        &self,
        appointment_ids: &[i64],
    ) -> DomainResult<HashSet<i64>> {
        let wanted: HashSet<i64> = appointment_ids.iter().copied().collect();
        Ok(self
            .rows
            .lock()
            .expect("response store lock poisoned")
            .iter()
            .filter(|row| row.has_checkin() && wanted.contains(&row.appointment_id))
            .map(|row| row.appointment_id)
            .collect())
    }
}

#[async_trait]
impl ResponseWriter for MockResponseStore {
    async fn find(
        &self,
        appointment_id: i64,
        user_id: &str,
    ) -> DomainResult<Option<AttendanceResponse>> {
        Ok(self
            .rows
            .lock()
            .expect("response store lock poisoned")
            .iter()
            .find(|row| row.appointment_id == appointment_id && row.user_id == user_id)
            .cloned())
    }

    async fn insert(&self, response: &AttendanceResponse) -> DomainResult<()> {
        let mut rows = self.rows.lock().expect("response store lock poisoned");
        if rows
            .iter()
            .any(|row| row.appointment_id == response.appointment_id && row.user_id == response.user_id)
        {
            return Err(RollcallError::Database(
                "duplicate (appointment, user) response row".to_string(),
            ));
        }
        rows.push(response.clone());
        Ok(())
    }

    async fn update(&self, response: &AttendanceResponse) -> DomainResult<()> {
        let mut rows = self.rows.lock().expect("response store lock poisoned");
        let Some(row) = rows.iter_mut().find(|row| {
            row.appointment_id == response.appointment_id && row.user_id == response.user_id
        }) else {
            return Err(RollcallError::NotFound("response row".to_string()));
        };
        *row = response.clone();
        Ok(())
    }
}

/// In-memory mock for [`StreakStore`]. Insertion order stands in for
/// storage order, so leaderboard ties stay first-written-first.
#[derive(Default)]
pub struct MockStreakStore {
    rows: Mutex<Vec<Streak>>,
}

impl MockStreakStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row(self, streak: Streak) -> Self {
        self.rows.lock().expect("streak store lock poisoned").push(streak);
        self
    }
}

#[async_trait]
impl StreakStore for MockStreakStore {
    async fn find(&self, user_id: &str) -> DomainResult<Option<Streak>> {
        Ok(self
            .rows
            .lock()
            .expect("streak store lock poisoned")
            .iter()
            .find(|row| row.user_id == user_id)
            .cloned())
    }

    async fn upsert(&self, streak: &Streak) -> DomainResult<()> {
        let mut rows = self.rows.lock().expect("streak store lock poisoned");
        match rows.iter_mut().find(|row| row.user_id == streak.user_id) {
            Some(row) => *row = streak.clone(),
            None => rows.push(streak.clone()),
        }
        Ok(())
    }

    async fn top(&self, limit: usize) -> DomainResult<Vec<Streak>> {
        let mut rows = self.rows.lock().expect("streak store lock poisoned").clone();
        rows.sort_by(|a, b| b.current.cmp(&a.current));
        rows.truncate(limit);
        Ok(rows)
    }
}

/// In-memory mock for [`ReminderLogStore`].
#[derive(Default)]
pub struct MockReminderLogStore {
    rows: Mutex<Vec<ReminderLog>>,
}

impl MockReminderLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(self, log: ReminderLog) -> Self {
        self.rows.lock().expect("reminder log lock poisoned").push(log);
        self
    }

    pub fn entries(&self) -> Vec<ReminderLog> {
        self.rows.lock().expect("reminder log lock poisoned").clone()
    }
}

#[async_trait]
impl ReminderLogStore for MockReminderLogStore {
    async fn find_for_appointment(&self, appointment_id: i64) -> DomainResult<Vec<ReminderLog>> {
        Ok(self
            .rows
            .lock()
            .expect("reminder log lock poisoned")
            .iter()
            .filter(|log| log.appointment_id == appointment_id)
            .cloned()
            .collect())
    }

    async fn append(&self, log: &ReminderLog) -> DomainResult<()> {
        self.rows.lock().expect("reminder log lock poisoned").push(log.clone());
        Ok(())
    }
}

/// Recording mock for [`NotificationSink`], with optional per-user
/// failures.
#[derive(Default)]
pub struct MockNotificationSink {
    sent: Mutex<Vec<(String, i64)>>,
    failing_users: HashSet<String>,
}

impl MockNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make delivery fail for one user.
    pub fn failing_for(mut self, user_id: &str) -> Self {
        self.failing_users.insert(user_id.to_string());
        self
    }

    /// Every (user, appointment) delivery recorded so far.
    pub fn deliveries(&self) -> Vec<(String, i64)> {
        self.sent.lock().expect("sink lock poisoned").clone()
    }
}

#[async_trait]
impl NotificationSink for MockNotificationSink {
    async fn send_reminder(
        &self,
        user_id: &str,
        appointment_id: i64,
        _appointment_name: &str,
        _starts_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        if self.failing_users.contains(user_id) {
            return Err(RollcallError::Notification(format!("delivery refused for {user_id}")));
        }
        self.sent.lock().expect("sink lock poisoned").push((user_id.to_string(), appointment_id));
        Ok(())
    }
}
