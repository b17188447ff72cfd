//! Notification inbox
//!
//! Storage trait, an in-memory implementation for tests, and the inbox
//! service enforcing visibility: super admins see every notification, other
//! users only their own, and mark-all-read never reaches past the acting
//! user's inbox.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tb_core::pagination::Pagination;
use tb_core::traits::{Id, UserContext};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::notification::Notification;

/// Inbox errors
#[derive(Debug, Error)]
pub enum InboxError {
    #[error("Notification not found: {0}")]
    NotFound(Id),
    #[error("Not allowed: {0}")]
    Forbidden(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

pub type InboxResult<T> = Result<T, InboxError>;

/// Notification storage trait
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Create a notification, assigning its id
    async fn create(&self, notification: &mut Notification) -> InboxResult<Id>;

    /// Get a notification by id
    async fn get(&self, id: Id) -> InboxResult<Option<Notification>>;

    /// Notifications for one user, newest first
    async fn list_for_user(
        &self,
        user_id: Id,
        unread_only: bool,
        pagination: Pagination,
    ) -> InboxResult<Vec<Notification>>;

    /// All notifications, newest first (super admin view)
    async fn list_all(
        &self,
        unread_only: bool,
        pagination: Pagination,
    ) -> InboxResult<Vec<Notification>>;

    /// Mark one notification read. Returns whether the state changed;
    /// already-read notifications are left untouched.
    async fn mark_read(&self, id: Id) -> InboxResult<bool>;

    /// Mark all of one user's notifications read; returns how many changed.
    async fn mark_all_read(&self, user_id: Id) -> InboxResult<usize>;

    /// Unread count for one user
    async fn unread_count(&self, user_id: Id) -> InboxResult<usize>;
}

/// In-memory notification store for development and tests
pub struct MemoryNotificationStore {
    notifications: RwLock<Vec<Notification>>,
    next_id: AtomicI64,
}

impl Default for MemoryNotificationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryNotificationStore {
    pub fn new() -> Self {
        Self {
            notifications: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

fn newest_first(notifications: &mut [Notification]) {
    notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

fn paginate(notifications: Vec<Notification>, pagination: Pagination) -> Vec<Notification> {
    notifications
        .into_iter()
        .skip(pagination.offset.max(0) as usize)
        .take(pagination.limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn create(&self, notification: &mut Notification) -> InboxResult<Id> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        notification.id = Some(id);

        let mut notifications = self.notifications.write().await;
        notifications.push(notification.clone());

        Ok(id)
    }

    async fn get(&self, id: Id) -> InboxResult<Option<Notification>> {
        let notifications = self.notifications.read().await;
        Ok(notifications.iter().find(|n| n.id == Some(id)).cloned())
    }

    async fn list_for_user(
        &self,
        user_id: Id,
        unread_only: bool,
        pagination: Pagination,
    ) -> InboxResult<Vec<Notification>> {
        let notifications = self.notifications.read().await;
        let mut matching: Vec<Notification> = notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .filter(|n| !unread_only || n.is_unread())
            .cloned()
            .collect();
        newest_first(&mut matching);
        Ok(paginate(matching, pagination))
    }

    async fn list_all(
        &self,
        unread_only: bool,
        pagination: Pagination,
    ) -> InboxResult<Vec<Notification>> {
        let notifications = self.notifications.read().await;
        let mut matching: Vec<Notification> = notifications
            .iter()
            .filter(|n| !unread_only || n.is_unread())
            .cloned()
            .collect();
        newest_first(&mut matching);
        Ok(paginate(matching, pagination))
    }

    async fn mark_read(&self, id: Id) -> InboxResult<bool> {
        let mut notifications = self.notifications.write().await;
        let notification = notifications
            .iter_mut()
            .find(|n| n.id == Some(id))
            .ok_or(InboxError::NotFound(id))?;
        Ok(notification.mark_read())
    }

    async fn mark_all_read(&self, user_id: Id) -> InboxResult<usize> {
        let mut notifications = self.notifications.write().await;
        let mut count = 0;

        for notification in notifications.iter_mut() {
            if notification.user_id == user_id && notification.mark_read() {
                count += 1;
            }
        }

        Ok(count)
    }

    async fn unread_count(&self, user_id: Id) -> InboxResult<usize> {
        let notifications = self.notifications.read().await;
        Ok(notifications
            .iter()
            .filter(|n| n.user_id == user_id && n.is_unread())
            .count())
    }
}

/// Inbox service
pub struct InboxService<S: NotificationStore> {
    store: S,
}

impl<S: NotificationStore> InboxService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Deliver a notification to a user's inbox.
    pub async fn deliver(&self, mut notification: Notification) -> InboxResult<Id> {
        let id = self.store.create(&mut notification).await?;
        tracing::debug!(
            notification_id = id,
            user_id = notification.user_id,
            "Delivered notification"
        );
        Ok(id)
    }

    /// List the acting user's inbox. Super admins see every notification,
    /// everyone else only their own.
    pub async fn list(
        &self,
        user: &dyn UserContext,
        unread_only: bool,
        pagination: Pagination,
    ) -> InboxResult<Vec<Notification>> {
        if user.is_super_admin() {
            self.store.list_all(unread_only, pagination).await
        } else {
            self.store
                .list_for_user(user.user_id(), unread_only, pagination)
                .await
        }
    }

    /// Mark one notification read. Idempotent; a second call is a no-op.
    /// Only the recipient or a super admin may mark a notification.
    pub async fn mark_read(&self, user: &dyn UserContext, id: Id) -> InboxResult<()> {
        let notification = self
            .store
            .get(id)
            .await?
            .ok_or(InboxError::NotFound(id))?;

        if notification.user_id != user.user_id() && !user.is_super_admin() {
            return Err(InboxError::Forbidden(
                "Cannot mark another user's notification".into(),
            ));
        }

        self.store.mark_read(id).await?;
        Ok(())
    }

    /// Mark all of the acting user's own notifications read — never another
    /// user's, super admin or not.
    pub async fn mark_all_read(&self, user: &dyn UserContext) -> InboxResult<usize> {
        self.store.mark_all_read(user.user_id()).await
    }

    /// Unread count for the acting user (navigation badge)
    pub async fn unread_count(&self, user: &dyn UserContext) -> InboxResult<usize> {
        self.store.unread_count(user.user_id()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestUser {
        id: Id,
        super_admin: bool,
    }

    impl UserContext for TestUser {
        fn user_id(&self) -> Id {
            self.id
        }

        fn is_super_admin(&self) -> bool {
            self.super_admin
        }

        fn has_capability(&self, _capability: &str) -> bool {
            true
        }

        fn member_of(&self, _project_id: Id) -> bool {
            true
        }
    }

    fn regular(id: Id) -> TestUser {
        TestUser {
            id,
            super_admin: false,
        }
    }

    fn admin(id: Id) -> TestUser {
        TestUser {
            id,
            super_admin: true,
        }
    }

    fn service() -> InboxService<MemoryNotificationStore> {
        InboxService::new(MemoryNotificationStore::new())
    }

    #[tokio::test]
    async fn test_regular_user_sees_only_own() {
        let service = service();
        service.deliver(Notification::new(1, "for one")).await.unwrap();
        service.deliver(Notification::new(2, "for two")).await.unwrap();

        let listed = service
            .list(&regular(1), false, Pagination::default())
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].message, "for one");
    }

    #[tokio::test]
    async fn test_super_admin_sees_all() {
        let service = service();
        service.deliver(Notification::new(1, "for one")).await.unwrap();
        service.deliver(Notification::new(2, "for two")).await.unwrap();

        let listed = service
            .list(&admin(99), false, Pagination::default())
            .await
            .unwrap();
        assert_eq!(listed.len(), 2);
    }

    #[tokio::test]
    async fn test_mark_read_is_idempotent() {
        let service = service();
        let id = service.deliver(Notification::new(1, "hello")).await.unwrap();

        service.mark_read(&regular(1), id).await.unwrap();
        // Second mark is a no-op, not an error.
        service.mark_read(&regular(1), id).await.unwrap();

        assert_eq!(service.unread_count(&regular(1)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_cannot_mark_anothers_notification() {
        let service = service();
        let id = service.deliver(Notification::new(1, "hello")).await.unwrap();

        let err = service.mark_read(&regular(2), id).await.unwrap_err();
        assert!(matches!(err, InboxError::Forbidden(_)));
        assert_eq!(service.unread_count(&regular(1)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_mark_all_read_scoped_to_acting_user() {
        let service = service();
        service.deliver(Notification::new(1, "a")).await.unwrap();
        service.deliver(Notification::new(1, "b")).await.unwrap();
        service.deliver(Notification::new(2, "c")).await.unwrap();

        let marked = service.mark_all_read(&regular(1)).await.unwrap();
        assert_eq!(marked, 2);

        assert_eq!(service.unread_count(&regular(1)).await.unwrap(), 0);
        // The other user's inbox is untouched.
        assert_eq!(service.unread_count(&regular(2)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_mark_all_read_as_admin_stays_own() {
        let service = service();
        service.deliver(Notification::new(1, "a")).await.unwrap();
        service.deliver(Notification::new(99, "own")).await.unwrap();

        let marked = service.mark_all_read(&admin(99)).await.unwrap();
        assert_eq!(marked, 1);
        assert_eq!(service.unread_count(&regular(1)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unread_only_filter() {
        let service = service();
        let first = service.deliver(Notification::new(1, "a")).await.unwrap();
        service.deliver(Notification::new(1, "b")).await.unwrap();

        service.mark_read(&regular(1), first).await.unwrap();

        let unread = service
            .list(&regular(1), true, Pagination::default())
            .await
            .unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].message, "b");
    }

    #[tokio::test]
    async fn test_missing_notification_is_not_found() {
        let service = service();
        let err = service.mark_read(&regular(1), 404).await.unwrap_err();
        assert!(matches!(err, InboxError::NotFound(404)));
    }
}
