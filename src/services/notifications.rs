//! Notification fan-out: synchronous, in-transaction prepends to the
//! notification list. No delivery, no dedup, no pruning.

use chrono::Utc;
use uuid::Uuid;

use crate::database::Tables;
use crate::database::models::{Notification, UnreadCount};
use crate::database::repositories::{self, Record};
use crate::error::AppError;
use crate::services::user_context::UserContext;

pub fn notify(
    tx: &mut Tables,
    recipient_id: Uuid,
    actor_id: Option<Uuid>,
    message: impl Into<String>,
) -> Notification {
    let notification = Notification {
        id: Uuid::new_v4(),
        recipient_id,
        actor_id,
        message: message.into(),
        is_read: false,
        created_at: Utc::now(),
    };
    log::debug!(
        "Notifying {} (actor {:?}): {}",
        recipient_id,
        actor_id,
        notification.message
    );
    tx.notifications.push_front(notification.clone());
    notification
}

/// Notify each distinct recipient once, skipping the actor.
pub fn notify_all(
    tx: &mut Tables,
    recipients: &[Uuid],
    actor_id: Option<Uuid>,
    message: &str,
) {
    let mut seen = Vec::with_capacity(recipients.len());
    for &recipient in recipients {
        if Some(recipient) == actor_id || seen.contains(&recipient) {
            continue;
        }
        seen.push(recipient);
        notify(tx, recipient, actor_id, message);
    }
}

/// Newest first.
pub fn list_for(tables: &Tables, recipient_id: Uuid, unread_only: bool) -> Vec<Notification> {
    repositories::owned_by(&tables.notifications, recipient_id)
        .filter(|n| !unread_only || !n.is_read)
        .cloned()
        .collect()
}

pub fn unread_count(tables: &Tables, recipient_id: Uuid) -> UnreadCount {
    UnreadCount {
        unread: repositories::owned_by(&tables.notifications, recipient_id)
            .filter(|n| !n.is_read)
            .count(),
    }
}

pub fn mark_read(
    tx: &mut Tables,
    ctx: &UserContext,
    notification_id: Uuid,
) -> Result<Notification, AppError> {
    let notification = repositories::find_mut(&mut tx.notifications, notification_id)?;
    if notification.owner_id() != ctx.user_id() {
        // Someone else's notification is indistinguishable from a missing one.
        return Err(AppError::NotFound(format!(
            "Notification {} not found",
            notification_id
        )));
    }
    notification.is_read = true;
    Ok(notification.clone())
}

/// Returns how many notifications flipped to read.
pub fn mark_all_read(tx: &mut Tables, ctx: &UserContext) -> usize {
    let mut changed = 0;
    for notification in tx
        .notifications
        .iter_mut()
        .filter(|n| n.recipient_id == ctx.user_id() && !n.is_read)
    {
        notification.is_read = true;
        changed += 1;
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{context, employee};

    #[test]
    fn notifications_are_prepended_unread() {
        let mut tables = Tables::default();
        let recipient = Uuid::new_v4();

        notify(&mut tables, recipient, None, "first");
        notify(&mut tables, recipient, None, "second");

        let list = list_for(&tables, recipient, false);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].message, "second");
        assert!(list.iter().all(|n| !n.is_read));
        assert_eq!(unread_count(&tables, recipient).unread, 2);
    }

    #[test]
    fn notify_all_skips_actor_and_duplicates() {
        let mut tables = Tables::default();
        let actor = Uuid::new_v4();
        let other = Uuid::new_v4();

        notify_all(&mut tables, &[actor, other, other], Some(actor), "hi");

        assert_eq!(tables.notifications.len(), 1);
        assert_eq!(tables.notifications[0].recipient_id, other);
    }

    #[test]
    fn only_recipient_can_mark_read() {
        let owner = employee("Olive", None);
        let intruder = employee("Ivan", None);
        let mut tables = Tables::default();
        let n = notify(&mut tables, owner.id, None, "hello");

        assert!(matches!(
            mark_read(&mut tables, &context(&intruder), n.id),
            Err(AppError::NotFound(_))
        ));
        let read = mark_read(&mut tables, &context(&owner), n.id).unwrap();
        assert!(read.is_read);
        assert_eq!(unread_count(&tables, owner.id).unread, 0);
    }

    #[test]
    fn mark_all_read_touches_only_own_unread() {
        let owner = employee("Olive", None);
        let other = Uuid::new_v4();
        let mut tables = Tables::default();
        notify(&mut tables, owner.id, None, "a");
        notify(&mut tables, owner.id, None, "b");
        notify(&mut tables, other, None, "c");

        assert_eq!(mark_all_read(&mut tables, &context(&owner)), 2);
        assert_eq!(unread_count(&tables, other).unread, 1);
    }
}
