//! Toaster 构建器 - 组装 store、配置和通知协作者

use std::sync::Arc;
use tracing::info;

use crate::config::ToasterConfig;
use crate::error::ConfigError;
use crate::native::{ActivityProbe, DesktopNotifier, NativeNotifier, NoActivityProbe};
use crate::store::{MemoryStore, ToastStore};
use crate::toaster::Toaster;

/// [`Toaster`] 构建器
///
/// 未指定 store 时创建 `MemoryStore` 并挂载配置中的容器；
/// 未指定通知器且开启 `desktop_notifications` 时注册桌面通知。
pub struct ToasterBuilder {
    config: ToasterConfig,
    store: Option<Arc<dyn ToastStore>>,
    notifier: Option<Arc<dyn NativeNotifier>>,
    probe: Option<Arc<dyn ActivityProbe>>,
}

impl ToasterBuilder {
    pub fn new() -> Self {
        Self {
            config: ToasterConfig::default(),
            store: None,
            notifier: None,
            probe: None,
        }
    }

    pub fn config(mut self, config: ToasterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(mut self, store: Arc<dyn ToastStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn NativeNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn activity_probe(mut self, probe: Arc<dyn ActivityProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// 是否启用桌面通知
    pub fn desktop_notifications(mut self, enable: bool) -> Self {
        self.config.desktop_notifications = enable;
        self
    }

    pub fn build(self) -> Result<Toaster, ConfigError> {
        self.config.validate()?;

        let store = match self.store {
            Some(store) => store,
            None => {
                let store = MemoryStore::new();
                store.mount_container(self.config.container.clone());
                Arc::new(store)
            }
        };

        let notifier = match self.notifier {
            Some(notifier) => Some(notifier),
            None if self.config.desktop_notifications => {
                let desktop: Arc<dyn NativeNotifier> = Arc::new(DesktopNotifier::new(self.config.app_name.clone()));
                Some(desktop)
            }
            None => None,
        };
        if let Some(notifier) = &notifier {
            info!(notifier = notifier.name(), "Native notifications enabled");
        }

        Ok(Toaster {
            store,
            config: Arc::new(self.config),
            notifier,
            probe: self.probe.unwrap_or_else(|| Arc::new(NoActivityProbe)),
        })
    }
}

impl Default for ToasterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
