//! 错误类型

use thiserror::Error;

/// Failure to show a native notification.
///
/// Returned only by the notification helper; never folded into the result of
/// a promise toast.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    #[error("native notifications are not supported in this environment")]
    Unsupported,
    #[error("notification permission denied by user")]
    PermissionDenied,
    #[error("notification backend failed: {0}")]
    Backend(String),
}

/// Rejected toaster configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("progress must be within 0.0..=1.0, got {0}")]
    InvalidProgress(f32),
    #[error("container limit must be at least 1")]
    ZeroLimit,
}
