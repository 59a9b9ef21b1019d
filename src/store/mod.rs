//! Toast Store 模块 - toast 状态的存储抽象
//!
//! Toaster 本身不持有 toast 状态：它把最终记录推送到 `ToastStore`，
//! 并按 ID 查询；渲染端读取同一个 store。`MemoryStore` 是参考实现。

pub mod memory;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::toast::{ContainerId, Selector, ToastContent, ToastId, ToastProps, ToastType};

pub use memory::{ContainerProps, MemoryStore, ToastSnapshot};

/// 变更事件的生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    Added,
    Updated,
    Removed,
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeStatus::Added => "added",
            ChangeStatus::Updated => "updated",
            ChangeStatus::Removed => "removed",
        };
        f.write_str(s)
    }
}

/// 传给 `on_change` 监听器的事件
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub status: ChangeStatus,
    pub id: ToastId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_id: Option<ContainerId>,
    #[serde(rename = "type")]
    pub toast_type: ToastType,
    pub is_loading: bool,
    /// 事件发生时渲染出的文本
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    pub ts: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new(status: ChangeStatus, content: &ToastContent, props: &ToastProps) -> Self {
        Self {
            status,
            id: props.toast_id.clone(),
            container_id: props.container_id().cloned(),
            toast_type: props.toast_type,
            is_loading: props.is_loading(),
            content: content.render(props),
            data: props.options.data.clone(),
            ts: Utc::now(),
        }
    }
}

/// 通过 `on_change` 注册的回调
pub type Listener = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

/// Handle returned by `on_change`, used to detach the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// A toast as held by the store.
#[derive(Debug, Clone)]
pub struct StoredToast {
    pub props: ToastProps,
    pub content: ToastContent,
}

/// Toast 存储 trait
///
/// 实现方自行保证修改的串行化，所有方法都接收 `&self`。
pub trait ToastStore: Send + Sync {
    /// 显示或排队一个 toast，推送已存在的 ID 会替换原 toast
    fn push_toast(&self, content: ToastContent, props: ToastProps);

    /// 移除所有匹配的 toast
    fn remove_toast(&self, selector: &Selector);

    /// 在指定容器中按 ID 查找 toast（`None` 为默认容器）
    fn get_toast(&self, id: &ToastId, container_id: Option<&ContainerId>) -> Option<StoredToast>;

    /// 恢复（`true`）或暂停（`false`）选中 toast 的计时
    fn toggle_toast(&self, playing: bool, selector: &Selector);

    /// Whether the toast is currently displayed (optionally in one container).
    fn is_toast_active(&self, id: &ToastId, container_id: Option<&ContainerId>) -> bool;

    /// 注册变更监听器
    fn on_change(&self, listener: Listener) -> ListenerId;

    /// 移除监听器，未知 ID 忽略
    fn off_change(&self, id: ListenerId);

    /// Drop toasts waiting for a display slot (all containers when `None`).
    fn clear_waiting_queue(&self, container_id: Option<&ContainerId>);

    /// 生成新的唯一 toast ID
    fn gen_toast_id(&self) -> ToastId;
}

/// Detaches an `on_change` listener when `unsubscribe` is called.
pub struct Subscription {
    store: Arc<dyn ToastStore>,
    id: ListenerId,
}

impl Subscription {
    pub(crate) fn new(store: Arc<dyn ToastStore>, id: ListenerId) -> Self {
        Self { store, id }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn unsubscribe(self) {
        self.store.off_change(self.id);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toast::ToastOptions;

    #[test]
    fn test_change_event_from_props() {
        let props = ToastProps::new(
            ToastId::from("job"),
            ToastType::Info,
            ToastOptions::new().with_loading(true).with_container_id("side"),
        );
        let event = ChangeEvent::new(ChangeStatus::Added, &ToastContent::from("working"), &props);

        assert_eq!(event.status, ChangeStatus::Added);
        assert_eq!(event.id, ToastId::from("job"));
        assert_eq!(event.container_id, Some(ContainerId::from("side")));
        assert!(event.is_loading);
        assert_eq!(event.content, "working");
    }

    #[test]
    fn test_change_event_serialization() {
        let props = ToastProps::new(ToastId::from(1), ToastType::Success, ToastOptions::new());
        let event = ChangeEvent::new(ChangeStatus::Removed, &ToastContent::from("bye"), &props);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["status"], "removed");
        assert_eq!(json["type"], "success");
        assert_eq!(json["id"], 1);
        assert_eq!(json["isLoading"], false);
        assert!(json.get("containerId").is_none());
    }

    #[test]
    fn test_change_status_display() {
        assert_eq!(format!("{}", ChangeStatus::Updated), "updated");
    }
}
