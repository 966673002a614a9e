use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::database::models::Session;

pub fn create(sessions: &mut Vec<Session>, employee_id: Uuid, ttl: Duration) -> Session {
    let now = Utc::now();
    let session = Session {
        id: Uuid::new_v4(),
        employee_id,
        created_at: now,
        expires_at: now + ttl,
    };
    sessions.push(session.clone());
    session
}

pub fn find_active(sessions: &[Session], id: Uuid, now: DateTime<Utc>) -> Option<&Session> {
    sessions.iter().find(|s| s.id == id && s.expires_at > now)
}

/// Returns whether a session was removed.
pub fn delete(sessions: &mut Vec<Session>, id: Uuid) -> bool {
    let before = sessions.len();
    sessions.retain(|s| s.id != id);
    sessions.len() != before
}

/// Drops every expired session.
pub fn purge_expired(sessions: &mut Vec<Session>, now: DateTime<Utc>) {
    sessions.retain(|s| s.expires_at > now);
}
