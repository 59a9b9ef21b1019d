//! Toaster 模块 - 合并选项、解析 ID 并把 toast 推送到 store

use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::builder::ToasterBuilder;
use crate::config::ToasterConfig;
use crate::native::{ActivityProbe, NativeNotifier, NoActivityProbe};
use crate::store::{ChangeEvent, StoredToast, Subscription, ToastStore};
use crate::toast::{
    ContainerId, Selector, Theme, ToastContent, ToastId, ToastOptions, ToastProps, ToastType,
    UpdateOptions,
};

/// Toast API 入口
///
/// 克隆开销很小，克隆体共享 store、配置和通知协作者。
#[derive(Clone)]
pub struct Toaster {
    pub(crate) store: Arc<dyn ToastStore>,
    pub(crate) config: Arc<ToasterConfig>,
    pub(crate) notifier: Option<Arc<dyn NativeNotifier>>,
    pub(crate) probe: Arc<dyn ActivityProbe>,
}

impl Toaster {
    /// 使用默认配置、不带原生通知的 Toaster
    pub fn new(store: Arc<dyn ToastStore>) -> Self {
        Self {
            store,
            config: Arc::new(ToasterConfig::default()),
            notifier: None,
            probe: Arc::new(NoActivityProbe),
        }
    }

    pub fn builder() -> ToasterBuilder {
        ToasterBuilder::new()
    }

    pub fn store(&self) -> &Arc<dyn ToastStore> {
        &self.store
    }

    pub fn config(&self) -> &ToasterConfig {
        &self.config
    }

    pub fn has_native_notifier(&self) -> bool {
        self.notifier.is_some()
    }

    /// 生成最终选项：toaster 默认值垫底，解析 ID 和类型
    ///
    /// 调用方指定的类型优先于 `toast_type`；有 ID 则使用调用方的 ID，否则生成新 ID。
    pub(crate) fn merge_options(&self, toast_type: ToastType, options: ToastOptions) -> ToastProps {
        let options = self.config.defaults.clone().overlay(options);
        let toast_id = options
            .toast_id
            .clone()
            .unwrap_or_else(|| self.store.gen_toast_id());
        let toast_type = options.toast_type.unwrap_or(toast_type);
        ToastProps::new(toast_id, toast_type, options)
    }

    pub(crate) fn dispatch(&self, content: ToastContent, props: ToastProps) -> ToastId {
        debug!(
            toast_id = %props.toast_id,
            toast_type = %props.toast_type,
            update = props.update_id.is_some(),
            "Dispatching toast"
        );
        let toast_id = props.toast_id.clone();
        self.store.push_toast(content, props);
        toast_id
    }

    fn create(&self, toast_type: ToastType, content: impl Into<ToastContent>, options: ToastOptions) -> ToastId {
        self.dispatch(content.into(), self.merge_options(toast_type, options))
    }

    /// 显示 `default` 类型的 toast
    pub fn show(&self, content: impl Into<ToastContent>, options: ToastOptions) -> ToastId {
        self.create(ToastType::Default, content, options)
    }

    pub fn success(&self, content: impl Into<ToastContent>, options: ToastOptions) -> ToastId {
        self.create(ToastType::Success, content, options)
    }

    pub fn info(&self, content: impl Into<ToastContent>, options: ToastOptions) -> ToastId {
        self.create(ToastType::Info, content, options)
    }

    pub fn warning(&self, content: impl Into<ToastContent>, options: ToastOptions) -> ToastId {
        self.create(ToastType::Warning, content, options)
    }

    /// [`Toaster::warning`] 的别名
    pub fn warn(&self, content: impl Into<ToastContent>, options: ToastOptions) -> ToastId {
        self.warning(content, options)
    }

    pub fn error(&self, content: impl Into<ToastContent>, options: ToastOptions) -> ToastId {
        self.create(ToastType::Error, content, options)
    }

    /// 暗色主题的 toast（调用方可指定其他主题）
    pub fn dark(&self, content: impl Into<ToastContent>, options: ToastOptions) -> ToastId {
        let options = ToastOptions::new().with_theme(Theme::Dark).overlay(options);
        self.create(ToastType::Default, content, options)
    }

    /// 加载中 toast：显示加载状态、不自动关闭、用户不能点击关闭或拖走。
    /// 每个选项都可以被 `options` 覆盖。
    pub fn loading(&self, content: impl Into<ToastContent>, options: ToastOptions) -> ToastId {
        let options = ToastOptions::loading_state().overlay(options);
        self.create(ToastType::Default, content, options)
    }

    /// 更新已有 toast。未知 ID 直接忽略，返回是否找到该 toast。
    ///
    /// `update.options.container_id` scopes the lookup.
    pub fn update(&self, id: &ToastId, update: UpdateOptions) -> bool {
        let UpdateOptions { render, options } = update;
        let container_id = options.container_id.clone();
        self.update_with(id, container_id.as_ref(), move |current| {
            *current = std::mem::take(current).overlay(options);
            render
        })
    }

    /// 公共更新路径
    ///
    /// `patch` 修改合并后的选项（原选项，已填入更新延迟），并返回替换内容（如有）。
    pub(crate) fn update_with<F>(&self, id: &ToastId, container_id: Option<&ContainerId>, patch: F) -> bool
    where
        F: FnOnce(&mut ToastOptions) -> Option<ToastContent>,
    {
        let Some(StoredToast { props: old, content: old_content }) = self.store.get_toast(id, container_id) else {
            trace!(toast_id = %id, "Update for unknown toast ignored");
            return false;
        };

        let mut next = old.to_options();
        if next.delay.is_none() {
            next.delay = Some(self.config.update_delay());
        }
        let render = patch(&mut next);

        let toast_id = next.toast_id.clone().unwrap_or_else(|| id.clone());
        let toast_type = next.toast_type.unwrap_or(old.toast_type);
        let mut props = ToastProps::new(toast_id, toast_type, next);
        props.update_id = Some(self.store.gen_toast_id());
        if &props.toast_id != id {
            props.stale_id = Some(id.clone());
        }

        self.dispatch(render.unwrap_or(old_content), props);
        true
    }

    /// 把受控进度条置为完成
    pub fn done(&self, id: &ToastId) -> bool {
        self.update(id, ToastOptions::new().with_progress(1.0).into())
    }

    /// 移除 toast：`Selector::All` 移除全部，否则移除匹配项
    pub fn dismiss(&self, selector: impl Into<Selector>) {
        self.store.remove_toast(&selector.into());
    }

    /// 恢复选中 toast 的计时
    pub fn play(&self, selector: impl Into<Selector>) {
        self.store.toggle_toast(true, &selector.into());
    }

    /// 暂停选中 toast 的计时
    pub fn pause(&self, selector: impl Into<Selector>) {
        self.store.toggle_toast(false, &selector.into());
    }

    pub fn is_active(&self, id: &ToastId, container_id: Option<&ContainerId>) -> bool {
        self.store.is_toast_active(id, container_id)
    }

    /// 监听所有 toast 的 added/updated/removed 事件
    pub fn on_change<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        let id = self.store.on_change(Arc::new(callback));
        Subscription::new(self.store.clone(), id)
    }

    /// 清空等待显示的 toast
    pub fn clear_waiting_queue(&self, container_id: Option<&ContainerId>) {
        self.store.clear_waiting_queue(container_id);
    }
}

impl fmt::Debug for Toaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toaster")
            .field("config", &self.config)
            .field("native", &self.notifier.as_ref().map(|n| n.name().to_string()))
            .finish()
    }
}
