//! Toast 类型、主题和位置枚举
//!
//! 类型决定渲染端使用的图标和颜色，以及 promise toast 的哪个分支产生了内容：
//! - default / info: 普通消息
//! - success: 操作完成
//! - warning / error: 需要用户关注

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type tag of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastType {
    #[default]
    Default,
    Success,
    Info,
    Warning,
    Error,
}

impl ToastType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastType::Default => "default",
            ToastType::Success => "success",
            ToastType::Info => "info",
            ToastType::Warning => "warning",
            ToastType::Error => "error",
        }
    }
}

impl fmt::Display for ToastType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ToastType {
    type Err = String;

    /// Case-insensitive; `warn` is accepted as an alias of `warning`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "default" => Ok(ToastType::Default),
            "success" => Ok(ToastType::Success),
            "info" => Ok(ToastType::Info),
            "warning" | "warn" => Ok(ToastType::Warning),
            "error" => Ok(ToastType::Error),
            other => Err(format!("unknown toast type: {}", other)),
        }
    }
}

/// Colour theme of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    Colored,
}

/// Screen position of a toast container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    TopLeft,
    TopCenter,
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}
