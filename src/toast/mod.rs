//! Toast 数据模型 - 标识符、类型、选项和内容

pub mod content;
pub mod id;
pub mod kind;
pub mod options;
pub mod props;

pub use content::{Renderer, ToastContent};
pub use id::{ContainerId, Selector, ToastId};
pub use kind::{Position, Theme, ToastType};
pub use options::{AutoClose, ToastOptions, UpdateOptions};
pub use props::ToastProps;
