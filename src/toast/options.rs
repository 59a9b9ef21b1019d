//! Toast 选项
//!
//! 一个结构体包含全部显示/行为选项。`None` 表示继承下层的值
//! （先是 toaster 默认值，再是容器默认值），因此合并两组选项就是
//! 逐字段覆盖，上层的 `Some` 优先。

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::content::ToastContent;
use super::id::{ContainerId, ToastId};
use super::kind::{Position, Theme, ToastType};

/// Auto-close behaviour of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AutoCloseRepr", into = "AutoCloseRepr")]
pub enum AutoClose {
    /// Stays until dismissed.
    Disabled,
    /// Closes after the given time on screen.
    After(Duration),
}

/// JSON form: `false` or a number of milliseconds.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum AutoCloseRepr {
    Flag(bool),
    Millis(u64),
}

impl TryFrom<AutoCloseRepr> for AutoClose {
    type Error = String;

    fn try_from(repr: AutoCloseRepr) -> Result<Self, Self::Error> {
        match repr {
            AutoCloseRepr::Flag(false) => Ok(AutoClose::Disabled),
            AutoCloseRepr::Flag(true) => {
                Err("autoClose must be false or a number of milliseconds".to_string())
            }
            AutoCloseRepr::Millis(ms) => Ok(AutoClose::After(Duration::from_millis(ms))),
        }
    }
}

impl From<AutoClose> for AutoCloseRepr {
    fn from(value: AutoClose) -> Self {
        match value {
            AutoClose::Disabled => AutoCloseRepr::Flag(false),
            AutoClose::After(d) => AutoCloseRepr::Millis(d.as_millis() as u64),
        }
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_u64(d.as_millis() as u64),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_millis))
    }
}

/// Display and behaviour flags of a toast.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToastOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toast_id: Option<ToastId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_id: Option<ContainerId>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub toast_type: Option<ToastType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_loading: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_close: Option<AutoClose>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_on_click: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_button: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draggable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause_on_hover: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause_on_focus_loss: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_progress_bar: Option<bool>,
    /// Controlled progress in `0.0..=1.0`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Delay before the toast appears.
    #[serde(with = "duration_ms", skip_serializing_if = "Option::is_none")]
    pub delay: Option<Duration>,
    /// ARIA role, `alert` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Arbitrary payload, e.g. the settled value of a promise toast.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ToastOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_toast_id(mut self, id: impl Into<ToastId>) -> Self {
        self.toast_id = Some(id.into());
        self
    }

    pub fn with_container_id(mut self, id: impl Into<ContainerId>) -> Self {
        self.container_id = Some(id.into());
        self
    }

    pub fn with_type(mut self, toast_type: ToastType) -> Self {
        self.toast_type = Some(toast_type);
        self
    }

    pub fn with_loading(mut self, is_loading: bool) -> Self {
        self.is_loading = Some(is_loading);
        self
    }

    pub fn with_auto_close(mut self, auto_close: AutoClose) -> Self {
        self.auto_close = Some(auto_close);
        self
    }

    pub fn with_close_on_click(mut self, close_on_click: bool) -> Self {
        self.close_on_click = Some(close_on_click);
        self
    }

    pub fn with_close_button(mut self, close_button: bool) -> Self {
        self.close_button = Some(close_button);
        self
    }

    pub fn with_draggable(mut self, draggable: bool) -> Self {
        self.draggable = Some(draggable);
        self
    }

    pub fn with_pause_on_hover(mut self, pause: bool) -> Self {
        self.pause_on_hover = Some(pause);
        self
    }

    pub fn with_pause_on_focus_loss(mut self, pause: bool) -> Self {
        self.pause_on_focus_loss = Some(pause);
        self
    }

    pub fn with_hide_progress_bar(mut self, hide: bool) -> Self {
        self.hide_progress_bar = Some(hide);
        self
    }

    /// Set controlled progress, clamped to `0.0..=1.0` (NaN becomes 0).
    pub fn with_progress(mut self, progress: f32) -> Self {
        let progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
        self.progress = Some(progress);
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Layer `top` over `self`: every field set in `top` wins.
    pub fn overlay(self, top: ToastOptions) -> ToastOptions {
        ToastOptions {
            toast_id: top.toast_id.or(self.toast_id),
            container_id: top.container_id.or(self.container_id),
            toast_type: top.toast_type.or(self.toast_type),
            is_loading: top.is_loading.or(self.is_loading),
            auto_close: top.auto_close.or(self.auto_close),
            close_on_click: top.close_on_click.or(self.close_on_click),
            close_button: top.close_button.or(self.close_button),
            draggable: top.draggable.or(self.draggable),
            pause_on_hover: top.pause_on_hover.or(self.pause_on_hover),
            pause_on_focus_loss: top.pause_on_focus_loss.or(self.pause_on_focus_loss),
            hide_progress_bar: top.hide_progress_bar.or(self.hide_progress_bar),
            progress: top.progress.or(self.progress),
            theme: top.theme.or(self.theme),
            position: top.position.or(self.position),
            delay: top.delay.or(self.delay),
            role: top.role.or(self.role),
            data: top.data.or(self.data),
        }
    }

    /// Flags a loading toast sets, in their loading state.
    pub fn loading_state() -> ToastOptions {
        ToastOptions {
            is_loading: Some(true),
            auto_close: Some(AutoClose::Disabled),
            close_on_click: Some(false),
            close_button: Some(false),
            draggable: Some(false),
            ..Default::default()
        }
    }

    /// Reset the loading flags back to "inherit from the container".
    pub fn clear_loading_state(&mut self) {
        self.is_loading = None;
        self.auto_close = None;
        self.close_on_click = None;
        self.close_button = None;
        self.draggable = None;
    }

    /// Whether `progress`, when set, is a finite value in `0.0..=1.0`.
    pub fn has_valid_progress(&self) -> bool {
        self.progress
            .map(|p| p.is_finite() && (0.0..=1.0).contains(&p))
            .unwrap_or(true)
    }
}

/// Patch applied by an update: new content and/or new options.
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    /// Replacement content; the previous content is kept when `None`.
    pub render: Option<ToastContent>,
    pub options: ToastOptions,
}

impl UpdateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_render(mut self, render: impl Into<ToastContent>) -> Self {
        self.render = Some(render.into());
        self
    }

    pub fn with_options(mut self, options: ToastOptions) -> Self {
        self.options = options;
        self
    }
}

impl From<ToastOptions> for UpdateOptions {
    fn from(options: ToastOptions) -> Self {
        Self { render: None, options }
    }
}
