//! System notifications via freedesktop D-Bus.

use std::collections::HashMap;

use async_trait::async_trait;
use zbus::{Connection, proxy};

const APP_NAME: &str = "ezshot";

/// D-Bus interface for freedesktop Notifications.
#[proxy(
    interface = "org.freedesktop.Notifications",
    default_service = "org.freedesktop.Notifications",
    default_path = "/org/freedesktop/Notifications"
)]
trait Notifications {
    /// Send a notification.
    ///
    /// # Arguments
    /// * `app_name` - Application name
    /// * `replaces_id` - ID of notification to replace (0 for new)
    /// * `app_icon` - Icon name or path
    /// * `summary` - Notification title
    /// * `body` - Notification body text
    /// * `actions` - List of action identifiers and labels
    /// * `hints` - Additional metadata
    /// * `expire_timeout` - Timeout in milliseconds (-1 for default)
    ///
    /// # Returns
    /// Notification ID
    fn notify(
        &self,
        app_name: &str,
        replaces_id: u32,
        app_icon: &str,
        summary: &str,
        body: &str,
        actions: Vec<&str>,
        hints: HashMap<&str, zbus::zvariant::Value<'_>>,
        expire_timeout: i32,
    ) -> zbus::Result<u32>;
}

/// How loudly a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Normal,
    Critical,
}

impl Urgency {
    fn icon(self) -> &'static str {
        match self {
            Urgency::Normal => "camera-photo",
            Urgency::Critical => "dialog-error",
        }
    }

    /// Freedesktop urgency byte.
    fn level(self) -> u8 {
        match self {
            Urgency::Normal => 1,
            Urgency::Critical => 2,
        }
    }

    /// Error notifications stay until dismissed.
    fn expire_timeout(self) -> i32 {
        match self {
            Urgency::Normal => 3000,
            Urgency::Critical => 0,
        }
    }
}

/// Abstraction over desktop notifications so the pipeline can be tested headless.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, summary: &str, body: &str, urgency: Urgency) -> Result<(), String>;
}

/// Notifier backed by the session bus.
pub struct DesktopNotifier;

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(&self, summary: &str, body: &str, urgency: Urgency) -> Result<(), String> {
        send_notification(summary, body, urgency).await
    }
}

/// Send a system notification.
pub async fn send_notification(summary: &str, body: &str, urgency: Urgency) -> Result<(), String> {
    let connection = Connection::session()
        .await
        .map_err(|e| format!("Failed to connect to session bus: {}", e))?;

    let proxy = NotificationsProxy::new(&connection)
        .await
        .map_err(|e| format!("Failed to create notifications proxy: {}", e))?;

    let mut hints = HashMap::new();
    hints.insert("urgency", zbus::zvariant::Value::U8(urgency.level()));

    proxy
        .notify(
            APP_NAME,
            0,
            urgency.icon(),
            summary,
            body,
            vec![],
            hints,
            urgency.expire_timeout(),
        )
        .await
        .map_err(|e| format!("Failed to send notification: {}", e))?;

    Ok(())
}

/// Send a notification, logging instead of failing.
pub async fn notify_best_effort(notifier: &dyn Notifier, summary: &str, body: &str, urgency: Urgency) {
    if let Err(e) = notifier.notify(summary, body, urgency).await {
        log::warn!("Failed to send notification: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn notify(&self, _: &str, _: &str, _: Urgency) -> Result<(), String> {
            Err("no bus".to_string())
        }
    }

    #[tokio::test]
    async fn best_effort_swallows_failures() {
        notify_best_effort(&FailingNotifier, "summary", "body", Urgency::Critical).await;
    }

    #[test]
    fn critical_notifications_persist() {
        assert_eq!(Urgency::Critical.expire_timeout(), 0);
        assert_eq!(Urgency::Critical.icon(), "dialog-error");
        assert!(Urgency::Normal.level() < Urgency::Critical.level());
    }
}
