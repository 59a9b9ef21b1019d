//! Toast 内容 - 纯文本或渲染闭包

use super::props::ToastProps;
use std::fmt;
use std::sync::Arc;

/// Closure that produces the toast text from its current props.
pub type Renderer = Arc<dyn Fn(&ToastProps) -> String + Send + Sync>;

/// What a toast displays.
#[derive(Clone)]
pub enum ToastContent {
    Text(String),
    /// Rendered on demand; sees `data`, type and id of the toast.
    Render(Renderer),
}

impl ToastContent {
    /// Build a renderer-backed content.
    ///
    /// `MemoryStore` calls renderers outside its lock, so a renderer may query
    /// the store. Other stores must give the same guarantee or document that
    /// they do not.
    pub fn render_with<F>(f: F) -> Self
    where
        F: Fn(&ToastProps) -> String + Send + Sync + 'static,
    {
        ToastContent::Render(Arc::new(f))
    }

    /// Produce the text to display for the given props.
    pub fn render(&self, props: &ToastProps) -> String {
        match self {
            ToastContent::Text(text) => text.clone(),
            ToastContent::Render(f) => f(props),
        }
    }

    /// The literal text, if this is not a renderer.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ToastContent::Text(text) => Some(text),
            ToastContent::Render(_) => None,
        }
    }
}

impl fmt::Debug for ToastContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToastContent::Text(text) => f.debug_tuple("Text").field(text).finish(),
            ToastContent::Render(_) => f.write_str("Render(..)"),
        }
    }
}

impl From<&str> for ToastContent {
    fn from(s: &str) -> Self {
        ToastContent::Text(s.to_string())
    }
}

impl From<String> for ToastContent {
    fn from(s: String) -> Self {
        ToastContent::Text(s)
    }
}
