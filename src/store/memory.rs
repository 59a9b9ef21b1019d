//! 内存 toast store
//!
//! Toast 存放在已挂载的容器中。容器最多显示 `limit` 个 toast，其余进入
//! FIFO 等待队列，在可见 toast 移除后依次补位。任何容器挂载前推送的
//! toast 保存在渲染队列中，首次挂载时统一处理。

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, trace};

use super::{ChangeEvent, ChangeStatus, Listener, ListenerId, StoredToast, ToastStore};
use crate::toast::{ContainerId, Selector, ToastContent, ToastId, ToastOptions, ToastProps, ToastType};

/// Settings of one container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerProps {
    /// `None` for the default container.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ContainerId>,
    /// Maximum number of toasts displayed at once; unlimited when `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Lowest option layer of every toast shown in this container.
    pub defaults: ToastOptions,
}

impl ContainerProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<ContainerId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_defaults(mut self, defaults: ToastOptions) -> Self {
        self.defaults = defaults;
        self
    }
}

/// Read-only view of a toast, for hosts and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct ToastSnapshot {
    pub id: ToastId,
    pub toast_type: ToastType,
    pub content: String,
    pub is_loading: bool,
    pub playing: bool,
    pub update_id: Option<ToastId>,
}

struct Entry {
    props: ToastProps,
    content: ToastContent,
    playing: bool,
}

/// 锁内记录的变更。内容在释放锁、发出事件时才渲染，渲染闭包可以查询 store。
struct Change {
    status: ChangeStatus,
    toast: StoredToast,
}

impl Change {
    fn into_event(self) -> ChangeEvent {
        ChangeEvent::new(self.status, &self.toast.content, &self.toast.props)
    }
}

fn snapshot_of(toast: StoredToast, playing: bool) -> ToastSnapshot {
    let StoredToast { props, content } = toast;
    ToastSnapshot {
        content: content.render(&props),
        is_loading: props.is_loading(),
        id: props.toast_id,
        toast_type: props.toast_type,
        playing,
        update_id: props.update_id,
    }
}

impl Entry {
    fn event(&self, status: ChangeStatus) -> Change {
        Change {
            status,
            toast: self.stored(),
        }
    }

    fn stored(&self) -> StoredToast {
        StoredToast {
            props: self.props.clone(),
            content: self.content.clone(),
        }
    }
}

/// Same toast: equal id, or the incoming props renamed this one.
fn same_toast(entry: &Entry, props: &ToastProps) -> bool {
    entry.props.toast_id == props.toast_id || props.stale_id.as_ref() == Some(&entry.props.toast_id)
}

struct Container {
    props: ContainerProps,
    visible: Vec<Entry>,
    queue: VecDeque<Entry>,
}

impl Container {
    fn new(props: ContainerProps) -> Self {
        Self {
            props,
            visible: Vec::new(),
            queue: VecDeque::new(),
        }
    }

    fn id(&self) -> Option<&ContainerId> {
        self.props.id.as_ref()
    }

    fn accepts(&self, props: &ToastProps) -> bool {
        self.id() == props.container_id()
    }

    fn has_room(&self) -> bool {
        self.props.limit.map(|limit| self.visible.len() < limit).unwrap_or(true)
    }

    fn build(&mut self, content: ToastContent, mut props: ToastProps, events: &mut Vec<Change>) {
        props.options = self.props.defaults.clone().overlay(props.options);

        // 重命名为已存在的 ID：移除旧 toast，更新持有新 ID 的 toast
        let stale = props
            .stale_id
            .clone()
            .filter(|stale| stale != &props.toast_id && self.holds(&props.toast_id));
        match stale {
            Some(stale) => {
                self.discard(&stale, events);
                self.upsert(content, props, events);
                self.promote(events);
            }
            None => self.upsert(content, props, events),
        }
    }

    fn upsert(&mut self, content: ToastContent, props: ToastProps, events: &mut Vec<Change>) {
        if let Some(pos) = self.visible.iter().position(|e| same_toast(e, &props)) {
            let entry = &mut self.visible[pos];
            entry.props = props;
            entry.content = content;
            events.push(entry.event(ChangeStatus::Updated));
            return;
        }

        // 仍在等待队列中：直接替换，之前未发出过事件
        if let Some(pos) = self.queue.iter().position(|e| same_toast(e, &props)) {
            let entry = &mut self.queue[pos];
            entry.props = props;
            entry.content = content;
            return;
        }

        let entry = Entry {
            props,
            content,
            playing: true,
        };
        if self.has_room() {
            events.push(entry.event(ChangeStatus::Added));
            self.visible.push(entry);
        } else {
            trace!(toast_id = %entry.props.toast_id, "Container full, toast queued");
            self.queue.push_back(entry);
        }
    }

    fn holds(&self, id: &ToastId) -> bool {
        self.find(id).is_some()
    }

    fn discard(&mut self, id: &ToastId, events: &mut Vec<Change>) {
        if let Some(pos) = self.visible.iter().position(|e| &e.props.toast_id == id) {
            let entry = self.visible.remove(pos);
            events.push(entry.event(ChangeStatus::Removed));
        }
        self.queue.retain(|e| &e.props.toast_id != id);
    }

    fn remove(&mut self, selector: &Selector, events: &mut Vec<Change>) {
        let cid = self.props.id.clone();
        let (removed, kept): (Vec<Entry>, Vec<Entry>) = std::mem::take(&mut self.visible)
            .into_iter()
            .partition(|e| selector.matches(&e.props.toast_id, cid.as_ref()));
        self.visible = kept;
        self.queue
            .retain(|e| !selector.matches(&e.props.toast_id, cid.as_ref()));

        events.extend(removed.iter().map(|e| e.event(ChangeStatus::Removed)));
        self.promote(events);
    }

    fn promote(&mut self, events: &mut Vec<Change>) {
        while self.has_room() {
            match self.queue.pop_front() {
                Some(entry) => {
                    events.push(entry.event(ChangeStatus::Added));
                    self.visible.push(entry);
                }
                None => break,
            }
        }
    }

    fn find(&self, id: &ToastId) -> Option<&Entry> {
        self.visible
            .iter()
            .chain(self.queue.iter())
            .find(|e| &e.props.toast_id == id)
    }
}

#[derive(Default)]
struct Inner {
    containers: Vec<Container>,
    render_queue: Vec<(ToastContent, ToastProps)>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl Inner {
    fn push(&mut self, content: ToastContent, props: ToastProps, events: &mut Vec<Change>) {
        if self.containers.is_empty() {
            trace!(toast_id = %props.toast_id, "No container mounted, toast held for render");
            self.render_queue.push((content, props));
            return;
        }

        let mut routed = false;
        for container in self.containers.iter_mut().filter(|c| c.accepts(&props)) {
            routed = true;
            container.build(content.clone(), props.clone(), events);
        }

        if !routed {
            debug!(
                toast_id = %props.toast_id,
                container_id = ?props.container_id(),
                "No mounted container accepts toast, dropping"
            );
        }
    }

    fn container(&self, id: Option<&ContainerId>) -> Option<&Container> {
        self.containers.iter().find(|c| c.id() == id)
    }
}

/// Reference `ToastStore` kept entirely in memory.
pub struct MemoryStore {
    inner: Mutex<Inner>,
    next_toast_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            next_toast_id: AtomicU64::new(1),
        }
    }

    /// A store with the default (unnamed, unlimited) container already mounted.
    pub fn with_default_container() -> Self {
        let store = Self::new();
        store.mount_container(ContainerProps::default());
        store
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Call listeners outside the lock so they may query the store.
    fn emit(&self, changes: Vec<Change>) {
        if changes.is_empty() {
            return;
        }
        let listeners: Vec<Listener> = self.lock().listeners.iter().map(|(_, l)| l.clone()).collect();
        for event in changes.into_iter().map(Change::into_event) {
            for listener in &listeners {
                listener(&event);
            }
        }
    }

    /// Mount a container. Mounting an id that is already mounted replaces its settings.
    pub fn mount_container(&self, props: ContainerProps) {
        let mut events = Vec::new();
        {
            let mut inner = self.lock();
            info!(container_id = ?props.id, limit = ?props.limit, "Mounting toast container");

            match inner.containers.iter().position(|c| c.id() == props.id.as_ref()) {
                Some(pos) => {
                    let existing = &mut inner.containers[pos];
                    existing.props = props;
                    existing.promote(&mut events);
                }
                None => {
                    inner.containers.push(Container::new(props));
                    let pending = std::mem::take(&mut inner.render_queue);
                    for (content, props) in pending {
                        inner.push(content, props, &mut events);
                    }
                }
            }
        }
        self.emit(events);
    }

    /// Unmount a container, discarding its toasts without events.
    pub fn unmount_container(&self, id: Option<&ContainerId>) {
        let mut inner = self.lock();
        let before = inner.containers.len();
        inner.containers.retain(|c| c.id() != id);
        if inner.containers.len() < before {
            info!(container_id = ?id, "Unmounted toast container");
        }
    }

    /// Visible toasts of one container, oldest first.
    pub fn snapshot(&self, container_id: Option<&ContainerId>) -> Vec<ToastSnapshot> {
        let held: Vec<(StoredToast, bool)> = self
            .lock()
            .container(container_id)
            .map(|c| c.visible.iter().map(|e| (e.stored(), e.playing)).collect())
            .unwrap_or_default();
        held.into_iter().map(|(toast, playing)| snapshot_of(toast, playing)).collect()
    }

    pub fn visible_count(&self, container_id: Option<&ContainerId>) -> usize {
        self.lock().container(container_id).map(|c| c.visible.len()).unwrap_or(0)
    }

    pub fn queued_count(&self, container_id: Option<&ContainerId>) -> usize {
        self.lock().container(container_id).map(|c| c.queue.len()).unwrap_or(0)
    }

    /// Toasts pushed while no container was mounted.
    pub fn pending_render_count(&self) -> usize {
        self.lock().render_queue.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastStore for MemoryStore {
    fn push_toast(&self, content: ToastContent, props: ToastProps) {
        let mut events = Vec::new();
        self.lock().push(content, props, &mut events);
        self.emit(events);
    }

    fn remove_toast(&self, selector: &Selector) {
        let mut events = Vec::new();
        {
            let mut inner = self.lock();
            inner
                .render_queue
                .retain(|(_, p)| !selector.matches(&p.toast_id, p.container_id()));
            for container in inner.containers.iter_mut() {
                container.remove(selector, &mut events);
            }
        }
        self.emit(events);
    }

    fn get_toast(&self, id: &ToastId, container_id: Option<&ContainerId>) -> Option<StoredToast> {
        let inner = self.lock();
        if let Some(entry) = inner.container(container_id).and_then(|c| c.find(id)) {
            return Some(entry.stored());
        }
        inner
            .render_queue
            .iter()
            .rev()
            .find(|(_, p)| &p.toast_id == id && p.container_id() == container_id)
            .map(|(content, props)| StoredToast {
                props: props.clone(),
                content: content.clone(),
            })
    }

    fn toggle_toast(&self, playing: bool, selector: &Selector) {
        let mut inner = self.lock();
        for container in inner.containers.iter_mut() {
            let cid = container.props.id.clone();
            for entry in container
                .visible
                .iter_mut()
                .filter(|e| selector.matches(&e.props.toast_id, cid.as_ref()))
            {
                entry.playing = playing;
            }
        }
    }

    fn is_toast_active(&self, id: &ToastId, container_id: Option<&ContainerId>) -> bool {
        let inner = self.lock();
        match container_id {
            Some(cid) => inner
                .container(Some(cid))
                .map(|c| c.visible.iter().any(|e| &e.props.toast_id == id))
                .unwrap_or(false),
            None => inner
                .containers
                .iter()
                .any(|c| c.visible.iter().any(|e| &e.props.toast_id == id)),
        }
    }

    fn on_change(&self, listener: Listener) -> ListenerId {
        let mut inner = self.lock();
        inner.next_listener += 1;
        let id = ListenerId(inner.next_listener);
        inner.listeners.push((id, listener));
        id
    }

    fn off_change(&self, id: ListenerId) {
        self.lock().listeners.retain(|(lid, _)| *lid != id);
    }

    fn clear_waiting_queue(&self, container_id: Option<&ContainerId>) {
        let mut inner = self.lock();
        for container in inner
            .containers
            .iter_mut()
            .filter(|c| c.props.limit.is_some())
            .filter(|c| container_id.is_none() || c.id() == container_id)
        {
            container.queue.clear();
        }
    }

    fn gen_toast_id(&self) -> ToastId {
        ToastId::Str(self.next_toast_id.fetch_add(1, Ordering::Relaxed).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn props(id: &str) -> ToastProps {
        ToastProps::new(ToastId::from(id), ToastType::Default, ToastOptions::new())
    }

    fn push(store: &MemoryStore, id: &str) {
        store.push_toast(ToastContent::from(id), props(id));
    }

    fn recorder(store: &MemoryStore) -> Arc<Mutex<Vec<(ChangeStatus, ToastId)>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        store.on_change(Arc::new(move |e: &ChangeEvent| {
            sink.lock().unwrap().push((e.status, e.id.clone()));
        }));
        seen
    }

    #[test]
    fn test_gen_toast_id_is_unique() {
        let store = MemoryStore::new();
        let a = store.gen_toast_id();
        let b = store.gen_toast_id();
        assert_ne!(a, b);
        assert_eq!(a, ToastId::from("1"));
    }

    #[test]
    fn test_push_before_mount_is_held_then_flushed() {
        let store = MemoryStore::new();
        push(&store, "early");
        assert_eq!(store.pending_render_count(), 1);
        assert!(!store.is_toast_active(&"early".into(), None));

        store.mount_container(ContainerProps::default());
        assert_eq!(store.pending_render_count(), 0);
        assert!(store.is_toast_active(&"early".into(), None));
    }

    #[test]
    fn test_limit_queues_and_promotes() {
        let store = MemoryStore::new();
        store.mount_container(ContainerProps::new().with_limit(2));
        let seen = recorder(&store);

        push(&store, "a");
        push(&store, "b");
        push(&store, "c");
        assert_eq!(store.visible_count(None), 2);
        assert_eq!(store.queued_count(None), 1);

        store.remove_toast(&Selector::from("a"));
        assert_eq!(store.visible_count(None), 2);
        assert_eq!(store.queued_count(None), 0);

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                (ChangeStatus::Added, ToastId::from("a")),
                (ChangeStatus::Added, ToastId::from("b")),
                (ChangeStatus::Removed, ToastId::from("a")),
                (ChangeStatus::Added, ToastId::from("c")),
            ]
        );
    }

    #[test]
    fn test_push_existing_id_updates_in_place() {
        let store = MemoryStore::with_default_container();
        let seen = recorder(&store);

        push(&store, "a");
        store.push_toast(ToastContent::from("changed"), props("a"));

        let snapshot = store.snapshot(None);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].content, "changed");
        assert_eq!(seen.lock().unwrap()[1].0, ChangeStatus::Updated);
    }

    #[test]
    fn test_stale_id_renames_in_place() {
        let store = MemoryStore::with_default_container();
        push(&store, "old");

        let mut renamed = props("new");
        renamed.stale_id = Some(ToastId::from("old"));
        store.push_toast(ToastContent::from("renamed"), renamed);

        assert!(!store.is_toast_active(&"old".into(), None));
        assert!(store.is_toast_active(&"new".into(), None));
        assert_eq!(store.visible_count(None), 1);
    }

    #[test]
    fn test_renderer_may_query_store() {
        let store = Arc::new(MemoryStore::with_default_container());
        let seen = recorder(&store);
        let observer = store.clone();
        let content = ToastContent::render_with(move |props| {
            format!("{} of {}", props.toast_id, observer.visible_count(None))
        });

        store.push_toast(content, props("a"));

        assert_eq!(seen.lock().unwrap().len(), 1);
        assert_eq!(store.snapshot(None)[0].content, "a of 1");
    }

    #[test]
    fn test_rename_onto_held_id_drops_stale_toast() {
        let store = MemoryStore::with_default_container();
        push(&store, "b");
        push(&store, "a");
        let seen = recorder(&store);

        let mut renamed = props("b");
        renamed.stale_id = Some(ToastId::from("a"));
        store.push_toast(ToastContent::from("A2"), renamed);

        let snapshot = store.snapshot(None);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, ToastId::from("b"));
        assert_eq!(snapshot[0].content, "A2");
        assert!(!store.is_toast_active(&"a".into(), None));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (ChangeStatus::Removed, ToastId::from("a")),
                (ChangeStatus::Updated, ToastId::from("b")),
            ]
        );
    }

    #[test]
    fn test_rename_onto_held_id_promotes_waiting_toast() {
        let store = MemoryStore::new();
        store.mount_container(ContainerProps::new().with_limit(2));
        push(&store, "b");
        push(&store, "a");
        push(&store, "c");
        assert_eq!(store.queued_count(None), 1);

        let mut renamed = props("b");
        renamed.stale_id = Some(ToastId::from("a"));
        store.push_toast(ToastContent::from("A2"), renamed);

        assert!(store.is_toast_active(&"c".into(), None));
        assert_eq!(store.queued_count(None), 0);
        assert_eq!(store.visible_count(None), 2);
    }

    #[test]
    fn test_routing_by_container_id() {
        let store = MemoryStore::with_default_container();
        store.mount_container(ContainerProps::new().with_id("side"));

        let side = ToastProps::new(
            ToastId::from("s"),
            ToastType::Info,
            ToastOptions::new().with_container_id("side"),
        );
        store.push_toast(ToastContent::from("side"), side);
        push(&store, "main");

        let side_id = ContainerId::from("side");
        assert!(store.is_toast_active(&"s".into(), Some(&side_id)));
        assert!(!store.is_toast_active(&"main".into(), Some(&side_id)));
        assert!(store.is_toast_active(&"s".into(), None));
        assert_eq!(store.visible_count(None), 1);
        assert!(store.get_toast(&"s".into(), None).is_none());
        assert!(store.get_toast(&"s".into(), Some(&side_id)).is_some());
    }

    #[test]
    fn test_container_defaults_fill_unset_options() {
        let store = MemoryStore::new();
        store.mount_container(ContainerProps::new().with_defaults(ToastOptions::new().with_draggable(true)));
        push(&store, "a");

        let stored = store.get_toast(&"a".into(), None).unwrap();
        assert_eq!(stored.props.options.draggable, Some(true));
    }

    #[test]
    fn test_toggle_sets_playing() {
        let store = MemoryStore::with_default_container();
        push(&store, "a");
        push(&store, "b");

        store.toggle_toast(false, &Selector::All);
        assert!(store.snapshot(None).iter().all(|t| !t.playing));

        store.toggle_toast(true, &Selector::from("b"));
        let snapshot = store.snapshot(None);
        assert!(!snapshot[0].playing);
        assert!(snapshot[1].playing);
    }

    #[test]
    fn test_clear_waiting_queue_only_limited_containers() {
        let store = MemoryStore::new();
        store.mount_container(ContainerProps::new().with_limit(1));
        push(&store, "a");
        push(&store, "b");
        assert_eq!(store.queued_count(None), 1);

        store.clear_waiting_queue(None);
        assert_eq!(store.queued_count(None), 0);
        assert_eq!(store.visible_count(None), 1);
    }

    #[test]
    fn test_off_change_detaches_listener() {
        let store = MemoryStore::with_default_container();
        let seen = Arc::new(Mutex::new(0usize));
        let sink = seen.clone();
        let id = store.on_change(Arc::new(move |_e: &ChangeEvent| {
            *sink.lock().unwrap() += 1;
        }));

        push(&store, "a");
        store.off_change(id);
        push(&store, "b");
        assert_eq!(*seen.lock().unwrap(), 1);
    }

    #[test]
    fn test_listener_can_query_store() {
        let store = Arc::new(MemoryStore::with_default_container());
        let observed = Arc::new(Mutex::new(None));
        let (store_ref, sink) = (Arc::downgrade(&store), observed.clone());
        store.on_change(Arc::new(move |e: &ChangeEvent| {
            if let Some(store) = store_ref.upgrade() {
                *sink.lock().unwrap() = Some(store.is_toast_active(&e.id, None));
            }
        }));

        push(&store, "a");
        assert_eq!(*observed.lock().unwrap(), Some(true));
    }

    #[test]
    fn test_unmount_discards_toasts() {
        let store = MemoryStore::with_default_container();
        push(&store, "a");
        store.unmount_container(None);
        assert!(!store.is_toast_active(&"a".into(), None));
        assert!(store.snapshot(None).is_empty());
    }
}
