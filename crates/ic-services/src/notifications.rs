//! Reading and acknowledging notifications.
//!
//! Notifications are written by the other services as part of their own
//! transitions; this service only lists them and flips them to read.

use chrono::Utc;
use ic_core::{
    AppError, Notification, NotificationRepo, Page, PageRequest, Result, NOTIFICATIONS_PER_PAGE,
};
use std::sync::Arc;
use uuid::Uuid;

pub struct NotificationService {
    notifications: Arc<dyn NotificationRepo>,
}

impl NotificationService {
    pub fn new(notifications: Arc<dyn NotificationRepo>) -> Self {
        Self { notifications }
    }

    pub async fn list(&self, user: Uuid, page: Option<&str>) -> Result<Page<Notification>> {
        let total = self.notifications.count_notifications(user).await?;
        let request = PageRequest::resolve(page, NOTIFICATIONS_PER_PAGE, total);
        let rows = self
            .notifications
            .list_notifications(user, request.limit(), request.offset())
            .await?;
        Ok(Page::new(rows, request, total))
    }

    pub async fn unread_count(&self, user: Uuid) -> Result<u64> {
        self.notifications.unread_count(user).await
    }

    /// Idempotent: a notification that is already read keeps its `read_at`.
    pub async fn mark_read(&self, actor: Uuid, id: Uuid) -> Result<Notification> {
        let mut notification = self
            .notifications
            .get_notification(id)
            .await?
            .ok_or_else(|| AppError::not_found("Notification", id))?;
        if notification.user_id != actor {
            return Err(AppError::unauthorized("Invalid notification."));
        }
        if notification.read {
            return Ok(notification);
        }

        let now = Utc::now();
        if self.notifications.mark_read(id, now).await? {
            notification.read = true;
            notification.read_at = Some(now);
            tracing::debug!(notification_id = %id, "notification read");
        } else if let Some(current) = self.notifications.get_notification(id).await? {
            // Someone else got there first; report what the store holds.
            notification = current;
        }
        Ok(notification)
    }
}
