//! 原生通知模块 - 系统级通知
//!
//! Promise toast 可以把结果同步为应用窗口之外的系统通知。
//! 通知能力由 `NativeNotifier` 抽象；用户是否正在看应用由 `ActivityProbe` 判断。

pub mod desktop;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::NotifyError;

pub use desktop::DesktopNotifier;

/// Content of a native notification.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NativeNotice {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Icon name or path understood by the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl NativeNotice {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// 通知权限状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// 尚未询问
    Default,
    Granted,
    Denied,
}

/// 显示原生通知的宿主能力
#[async_trait]
pub trait NativeNotifier: Send + Sync {
    /// 后端名称（用于日志）
    fn name(&self) -> &str;

    /// Current permission, without prompting.
    fn permission(&self) -> Permission;

    /// 向用户请求权限
    async fn request_permission(&self) -> Permission;

    /// Show the notification; permission is already granted when this is called.
    async fn show(&self, notice: &NativeNotice) -> Result<(), NotifyError>;
}

/// 显示原生通知，必要时先请求权限
///
/// 所有失败都以 error 级别记录日志，且只返回给本函数的调用方。
pub async fn create_native_notification(
    notifier: Option<&dyn NativeNotifier>,
    notice: &NativeNotice,
) -> Result<(), NotifyError> {
    let Some(notifier) = notifier else {
        error!("This environment does not support native notifications");
        return Err(NotifyError::Unsupported);
    };

    if notifier.permission() != Permission::Granted {
        let permission = notifier.request_permission().await;
        if permission != Permission::Granted {
            error!(notifier = notifier.name(), "User denied notification permission");
            return Err(NotifyError::PermissionDenied);
        }
    }

    notifier.show(notice).await.inspect_err(|e| {
        error!(notifier = notifier.name(), error = %e, "Failed to show native notification");
    })
}

/// Whether the application is currently in front of the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
    /// No focus information (headless process, no window system).
    Unknown,
}

/// Answers "is the user looking at the application right now".
pub trait ActivityProbe: Send + Sync {
    fn visibility(&self) -> Visibility;
}

impl<F> ActivityProbe for F
where
    F: Fn() -> Visibility + Send + Sync,
{
    fn visibility(&self) -> Visibility {
        self()
    }
}

/// Probe for hosts without focus information.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoActivityProbe;

impl ActivityProbe for NoActivityProbe {
    fn visibility(&self) -> Visibility {
        Visibility::Unknown
    }
}

/// 判断是否发送原生通知
///
/// 设置 `only_when_inactive` 时，仅在确定应用可见时不发送；`Unknown` 视为不可见。
pub fn should_notify(only_when_inactive: bool, visibility: Visibility) -> bool {
    if !only_when_inactive {
        return true;
    }
    match visibility {
        Visibility::Visible => false,
        Visibility::Hidden => true,
        Visibility::Unknown => {
            debug!("Visibility unknown, treating user as inactive");
            true
        }
    }
}
