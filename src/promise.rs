//! Promise toast 模块 - 跟踪异步操作从 pending 到 success/error
//!
//! ```ignore
//! let toaster = Toaster::new(Arc::new(MemoryStore::with_default_container()));
//!
//! let saved = toaster
//!     .promise(
//!         save_document(doc),
//!         PromiseParams::new()
//!             .pending("Saving...")
//!             .success("Saved")
//!             .error("Could not save"),
//!         ToastOptions::new(),
//!     )
//!     .await?;
//! ```

use serde::Serialize;
use std::fmt::{self, Display};
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, warn};

use crate::native::{create_native_notification, should_notify, NativeNotice};
use crate::toast::{ToastContent, ToastId, ToastOptions, ToastType, UpdateOptions};
use crate::toaster::Toaster;

/// Content template for one phase of a promise toast.
#[derive(Debug, Clone)]
pub enum Descriptor {
    /// Rendered as the toast text.
    Text(String),
    /// Full update: content and options.
    Options(UpdateOptions),
}

impl Descriptor {
    fn into_parts(self) -> (Option<ToastContent>, ToastOptions) {
        match self {
            Descriptor::Text(text) => (Some(ToastContent::Text(text)), ToastOptions::default()),
            Descriptor::Options(update) => (update.render, update.options),
        }
    }
}

impl From<&str> for Descriptor {
    fn from(s: &str) -> Self {
        Descriptor::Text(s.to_string())
    }
}

impl From<String> for Descriptor {
    fn from(s: String) -> Self {
        Descriptor::Text(s)
    }
}

impl From<UpdateOptions> for Descriptor {
    fn from(update: UpdateOptions) -> Self {
        Descriptor::Options(update)
    }
}

/// Native notifications sent when the operation settles.
#[derive(Debug, Clone, Default)]
pub struct NativeNotification {
    pub success: Option<NativeNotice>,
    pub error: Option<NativeNotice>,
    /// Only notify when the user is not looking at the application.
    pub only_when_inactive: bool,
}

impl NativeNotification {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_success(mut self, notice: NativeNotice) -> Self {
        self.success = Some(notice);
        self
    }

    pub fn on_error(mut self, notice: NativeNotice) -> Self {
        self.error = Some(notice);
        self
    }

    pub fn only_when_inactive(mut self, only: bool) -> Self {
        self.only_when_inactive = only;
        self
    }

    fn notice_for(&self, toast_type: ToastType) -> Option<&NativeNotice> {
        match toast_type {
            ToastType::Success => self.success.as_ref(),
            _ => self.error.as_ref(),
        }
    }
}

/// Descriptors of a promise toast.
///
/// A missing `success`/`error` descriptor means "dismiss the pending toast"
/// for that outcome. Without `pending` there is no loading toast and the
/// outcome creates a new toast.
#[derive(Debug, Clone, Default)]
pub struct PromiseParams {
    pub pending: Option<Descriptor>,
    pub success: Option<Descriptor>,
    pub error: Option<Descriptor>,
    pub native: Option<NativeNotification>,
}

impl PromiseParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(mut self, descriptor: impl Into<Descriptor>) -> Self {
        self.pending = Some(descriptor.into());
        self
    }

    pub fn success(mut self, descriptor: impl Into<Descriptor>) -> Self {
        self.success = Some(descriptor.into());
        self
    }

    pub fn error(mut self, descriptor: impl Into<Descriptor>) -> Self {
        self.error = Some(descriptor.into());
        self
    }

    pub fn native(mut self, native: NativeNotification) -> Self {
        self.native = Some(native);
        self
    }
}

/// The operation a promise toast follows: a future, or a producer that
/// builds it when orchestration starts.
pub enum PromiseInput<F> {
    Eager(F),
    Deferred(Box<dyn FnOnce() -> F + Send>),
}

impl<F> PromiseInput<F> {
    pub fn deferred<P>(producer: P) -> Self
    where
        P: FnOnce() -> F + Send + 'static,
    {
        PromiseInput::Deferred(Box::new(producer))
    }

    /// Resolve to the future; a deferred producer runs here, once.
    pub fn into_future(self) -> F {
        match self {
            PromiseInput::Eager(future) => future,
            PromiseInput::Deferred(producer) => producer(),
        }
    }
}

impl<F> From<F> for PromiseInput<F> {
    fn from(future: F) -> Self {
        PromiseInput::Eager(future)
    }
}

impl<F> fmt::Debug for PromiseInput<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromiseInput::Eager(_) => f.write_str("Eager(..)"),
            PromiseInput::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// Settlement of a promise toast, exactly as the wrapped operation produced it.
///
/// Awaiting it does not wait for the native notification; use
/// [`ToastPromise::notified`] for that.
pub struct ToastPromise<T, E> {
    handle: JoinHandle<Settled<T, E>>,
    pending_id: Option<ToastId>,
    _marker: PhantomData<fn() -> (T, E)>,
}

impl<T, E> ToastPromise<T, E> {
    /// Id of the loading toast, when a pending descriptor was given.
    pub fn pending_id(&self) -> Option<&ToastId> {
        self.pending_id.as_ref()
    }

    /// Wait for the outcome and for the native notification it triggered,
    /// if any, to be handed to the notifier.
    pub async fn notified(self) -> Result<T, E> {
        let Settled { result, notification } = joined(self.handle.await);
        if let Some(notification) = notification {
            if let Err(e) = notification.await {
                warn!(error = %e, "Native notification task did not complete");
            }
        }
        result
    }
}

/// Output of the settlement task.
struct Settled<T, E> {
    result: Result<T, E>,
    notification: Option<JoinHandle<()>>,
}

fn joined<R>(outcome: Result<R, JoinError>) -> R {
    match outcome {
        Ok(value) => value,
        Err(join_error) => match join_error.try_into_panic() {
            Ok(payload) => std::panic::resume_unwind(payload),
            Err(join_error) => panic!("promise toast task cancelled: {}", join_error),
        },
    }
}

impl<T, E> Future for ToastPromise<T, E> {
    type Output = Result<T, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.handle).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(outcome) => Poll::Ready(joined(outcome).result),
        }
    }
}

impl Toaster {
    /// Show a loading toast while `future` runs, then turn it into a success
    /// or error toast (or dismiss it) depending on the outcome.
    ///
    /// Orchestration starts immediately, whether or not the returned future
    /// is awaited, and cannot be cancelled. Awaiting the returned future
    /// yields the operation's own `Result`, unchanged.
    ///
    /// The success value becomes the toast `data` (JSON); an error becomes
    /// its `Display` string.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime.
    pub fn promise<T, E, F>(&self, future: F, params: PromiseParams, options: ToastOptions) -> ToastPromise<T, E>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Serialize + Send + 'static,
        E: Display + Send + 'static,
    {
        self.promise_input(PromiseInput::Eager(future), params, options)
    }

    /// Like [`Toaster::promise`], but the operation is only built by
    /// `producer` once the loading toast is up.
    pub fn promise_deferred<T, E, F, P>(
        &self,
        producer: P,
        params: PromiseParams,
        options: ToastOptions,
    ) -> ToastPromise<T, E>
    where
        P: FnOnce() -> F + Send + 'static,
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Serialize + Send + 'static,
        E: Display + Send + 'static,
    {
        self.promise_input(PromiseInput::deferred(producer), params, options)
    }

    /// Core of [`Toaster::promise`] and [`Toaster::promise_deferred`].
    pub fn promise_input<T, E, F>(
        &self,
        input: PromiseInput<F>,
        params: PromiseParams,
        options: ToastOptions,
    ) -> ToastPromise<T, E>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Serialize + Send + 'static,
        E: Display + Send + 'static,
    {
        let PromiseParams {
            pending,
            success,
            error,
            native,
        } = params;

        let pending_id = pending.map(|descriptor| {
            let (render, pending_options) = descriptor.into_parts();
            let content = render.unwrap_or_else(|| ToastContent::Text(String::new()));
            self.loading(content, options.clone().overlay(pending_options))
        });

        let future = input.into_future();
        let toaster = self.clone();
        let settle_id = pending_id.clone();

        let handle = tokio::spawn(async move {
            let result = future.await;
            let settlement = match &result {
                Ok(value) => {
                    let data = serde_json::to_value(value).unwrap_or_else(|e| {
                        warn!(error = %e, "Promise value is not serializable, toast data left empty");
                        serde_json::Value::Null
                    });
                    Settlement {
                        toast_type: ToastType::Success,
                        descriptor: success,
                        data,
                    }
                }
                Err(err) => Settlement {
                    toast_type: ToastType::Error,
                    descriptor: error,
                    data: serde_json::Value::String(err.to_string()),
                },
            };
            let notification = toaster.settle(settlement, settle_id, options, native.as_ref());
            Settled { result, notification }
        });

        ToastPromise {
            handle,
            pending_id,
            _marker: PhantomData,
        }
    }

    fn settle(
        &self,
        settlement: Settlement,
        pending_id: Option<ToastId>,
        options: ToastOptions,
        native: Option<&NativeNotification>,
    ) -> Option<JoinHandle<()>> {
        let Settlement {
            toast_type,
            descriptor,
            data,
        } = settlement;

        let Some(descriptor) = descriptor else {
            if let Some(id) = pending_id {
                debug!(toast_id = %id, outcome = %toast_type, "No descriptor for outcome, dismissing pending toast");
                self.dismiss(id);
            }
            return None;
        };

        let (render, branch_options) = descriptor.into_parts();
        let layered = ToastOptions::new()
            .with_type(toast_type)
            .overlay(options)
            .overlay(ToastOptions::new().with_data(data))
            .overlay(branch_options);

        match pending_id {
            Some(id) => {
                let container_id = layered.container_id.clone();
                self.update_with(&id, container_id.as_ref(), move |current| {
                    current.clear_loading_state();
                    *current = std::mem::take(current).overlay(layered);
                    render
                });
            }
            None => {
                let content = render.unwrap_or_else(|| ToastContent::Text(String::new()));
                let props = self.merge_options(toast_type, layered);
                self.dispatch(content, props);
            }
        }

        native.and_then(|native| self.fire_native(native, toast_type))
    }

    fn fire_native(&self, native: &NativeNotification, toast_type: ToastType) -> Option<JoinHandle<()>> {
        let notice = native.notice_for(toast_type).cloned()?;
        if !should_notify(native.only_when_inactive, self.probe.visibility()) {
            debug!(outcome = %toast_type, "User is in the application, native notification skipped");
            return None;
        }

        let notifier = self.notifier.clone();
        // 失败由辅助函数记录日志，不影响 toast 的结果
        Some(tokio::spawn(async move {
            let _ = create_native_notification(notifier.as_deref(), &notice).await;
        }))
    }
}

struct Settlement {
    toast_type: ToastType,
    descriptor: Option<Descriptor>,
    data: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, ToastStore};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn setup() -> (Arc<MemoryStore>, Toaster) {
        let store = Arc::new(MemoryStore::with_default_container());
        let toaster = Toaster::new(store.clone());
        (store, toaster)
    }

    #[test]
    fn test_descriptor_from_text() {
        let (render, options) = Descriptor::from("done").into_parts();
        assert_eq!(render.unwrap().as_text(), Some("done"));
        assert_eq!(options, ToastOptions::default());
    }

    #[test]
    fn test_deferred_input_runs_producer_once() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let input = PromiseInput::deferred(move || {
            flag.store(true, Ordering::SeqCst);
            42
        });
        assert!(!ran.load(Ordering::SeqCst));
        assert_eq!(input.into_future(), 42);
        assert!(ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_pending_toast_is_loading_until_settled() {
        let (store, toaster) = setup();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let promise = toaster.promise(
            async move {
                let _ = rx.await;
                Ok::<_, String>(1)
            },
            PromiseParams::new().pending("working").success("ok"),
            ToastOptions::new(),
        );

        let id = promise.pending_id().cloned().unwrap();
        let snapshot = store.snapshot(None);
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot[0].is_loading);
        assert_eq!(snapshot[0].content, "working");

        tx.send(()).unwrap();
        assert_eq!(promise.await, Ok(1));

        let snapshot = store.snapshot(None);
        assert_eq!(snapshot[0].id, id);
        assert!(!snapshot[0].is_loading);
        assert_eq!(snapshot[0].toast_type, ToastType::Success);
        assert_eq!(snapshot[0].content, "ok");
    }

    #[tokio::test]
    async fn test_structured_descriptor_renders_data() {
        let (store, toaster) = setup();

        #[derive(Serialize)]
        struct User {
            name: String,
        }

        let success = UpdateOptions::new()
            .with_render(ToastContent::render_with(|props| {
                let name = props
                    .options
                    .data
                    .as_ref()
                    .and_then(|d| d["name"].as_str())
                    .unwrap_or_default()
                    .to_string();
                format!("Hello {}", name)
            }))
            .with_options(ToastOptions::new().with_role("status"));

        let user = toaster
            .promise(
                async {
                    Ok::<_, String>(User {
                        name: "ada".to_string(),
                    })
                },
                PromiseParams::new().pending("loading").success(success),
                ToastOptions::new(),
            )
            .await
            .unwrap();
        assert_eq!(user.name, "ada");

        let stored = store.get_toast(&"1".into(), None).unwrap();
        assert_eq!(stored.props.options.role.as_deref(), Some("status"));
        assert_eq!(store.snapshot(None)[0].content, "Hello ada");
    }

    #[tokio::test]
    async fn test_error_data_is_display_string() {
        let (store, toaster) = setup();

        let result = toaster
            .promise(
                async { Err::<(), _>("disk full".to_string()) },
                PromiseParams::new().pending("saving").error(Descriptor::Options(
                    UpdateOptions::new().with_render(ToastContent::render_with(|props| {
                        format!("Failed: {}", props.options.data.as_ref().and_then(|d| d.as_str()).unwrap_or(""))
                    })),
                )),
                ToastOptions::new(),
            )
            .await;

        assert_eq!(result, Err("disk full".to_string()));
        let snapshot = store.snapshot(None);
        assert_eq!(snapshot[0].toast_type, ToastType::Error);
        assert_eq!(snapshot[0].content, "Failed: disk full");
    }

    #[tokio::test]
    async fn test_caller_options_carry_into_outcome() {
        let (store, toaster) = setup();

        toaster
            .promise(
                async { Ok::<_, String>(()) },
                PromiseParams::new().pending("p").success("s"),
                ToastOptions::new().with_role("log"),
            )
            .await
            .unwrap();

        let stored = store.get_toast(&"1".into(), None).unwrap();
        assert_eq!(stored.props.options.role.as_deref(), Some("log"));
        assert!(stored.props.options.auto_close.is_none());
        assert!(stored.props.options.close_button.is_none());
    }

    #[tokio::test]
    async fn test_missing_outcome_without_pending_touches_nothing() {
        let (store, toaster) = setup();
        let other = toaster.show("keep me", ToastOptions::new());

        let result = toaster
            .promise(async { Err::<(), _>("x".to_string()) }, PromiseParams::new(), ToastOptions::new())
            .await;

        assert!(result.is_err());
        assert!(store.is_toast_active(&other, None));
        assert_eq!(store.visible_count(None), 1);
    }
}
