//! toastline - Toast 通知 API
//!
//! 发送、更新、暂停/恢复和关闭由 [`ToastStore`] 持有的临时 toast；
//! 用 promise toast 跟踪异步操作，并可把结果同步到系统原生通知。
//!
//! ```ignore
//! use std::sync::Arc;
//! use toastline::{MemoryStore, PromiseParams, ToastOptions, Toaster};
//!
//! let toaster = Toaster::new(Arc::new(MemoryStore::with_default_container()));
//! let id = toaster.success("Saved", ToastOptions::new());
//! toaster.dismiss(id);
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod native;
pub mod promise;
pub mod store;
pub mod toast;
pub mod toaster;

pub use builder::ToasterBuilder;
pub use config::ToasterConfig;
pub use error::{ConfigError, NotifyError};
pub use native::{
    create_native_notification, should_notify, ActivityProbe, DesktopNotifier, NativeNotice, NativeNotifier,
    NoActivityProbe, Permission, Visibility,
};
pub use promise::{Descriptor, NativeNotification, PromiseInput, PromiseParams, ToastPromise};
pub use store::{
    ChangeEvent, ChangeStatus, ContainerProps, Listener, ListenerId, MemoryStore, StoredToast, Subscription,
    ToastSnapshot, ToastStore,
};
pub use toast::{
    AutoClose, ContainerId, Position, Renderer, Selector, Theme, ToastContent, ToastId, ToastOptions, ToastProps,
    ToastType, UpdateOptions,
};
pub use toaster::Toaster;
