//! 桌面通知 - 通过系统通知服务显示通知

use async_trait::async_trait;
use tracing::debug;

use super::{NativeNotice, NativeNotifier, Permission};
use crate::error::NotifyError;

/// `NativeNotifier` backed by `notify-rust`.
///
/// Desktop notification daemons have no permission prompt, so permission is
/// always granted; failures surface when showing.
pub struct DesktopNotifier {
    app_name: String,
}

impl DesktopNotifier {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new("toastline")
    }
}

#[async_trait]
impl NativeNotifier for DesktopNotifier {
    fn name(&self) -> &str {
        "desktop"
    }

    fn permission(&self) -> Permission {
        Permission::Granted
    }

    async fn request_permission(&self) -> Permission {
        Permission::Granted
    }

    async fn show(&self, notice: &NativeNotice) -> Result<(), NotifyError> {
        let notice = notice.clone();
        let app_name = self.app_name.clone();

        // 后端会阻塞在 session bus 上
        let shown = tokio::task::spawn_blocking(move || {
            let mut notification = notify_rust::Notification::new();
            notification.appname(&app_name).summary(&notice.title);
            if let Some(body) = &notice.body {
                notification.body(body);
            }
            if let Some(icon) = &notice.icon {
                notification.icon(icon);
            }
            notification.show().map(|_| ()).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| NotifyError::Backend(e.to_string()))?;

        shown.map_err(NotifyError::Backend)?;
        debug!(notifier = "desktop", app = %self.app_name, "Native notification shown");
        Ok(())
    }
}
