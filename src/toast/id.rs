//! Toast 和容器标识符

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a single toast, caller-supplied or generated by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToastId {
    Num(i64),
    Str(String),
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToastId::Num(n) => write!(f, "{}", n),
            ToastId::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ToastId {
    fn from(n: i64) -> Self {
        ToastId::Num(n)
    }
}

impl From<&str> for ToastId {
    fn from(s: &str) -> Self {
        ToastId::Str(s.to_string())
    }
}

impl From<String> for ToastId {
    fn from(s: String) -> Self {
        ToastId::Str(s)
    }
}

/// Identifier of a container (a rendering/query scope for toasts).
///
/// `None` wherever an `Option<ContainerId>` appears means the default container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContainerId {
    Num(i64),
    Str(String),
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerId::Num(n) => write!(f, "{}", n),
            ContainerId::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ContainerId {
    fn from(n: i64) -> Self {
        ContainerId::Num(n)
    }
}

impl From<&str> for ContainerId {
    fn from(s: &str) -> Self {
        ContainerId::Str(s.to_string())
    }
}

impl From<String> for ContainerId {
    fn from(s: String) -> Self {
        ContainerId::Str(s)
    }
}

/// Selects which toasts a dismiss/play/pause call applies to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selector {
    /// Every toast in every container.
    #[default]
    All,
    /// The toast with this id, whatever container holds it.
    Id(ToastId),
    /// Every toast of one container.
    Container(ContainerId),
    /// The toast with this id inside one container.
    Scoped { id: ToastId, container_id: ContainerId },
}

impl Selector {
    /// Whether a toast with the given id and container falls under this selector.
    pub fn matches(&self, id: &ToastId, container_id: Option<&ContainerId>) -> bool {
        match self {
            Selector::All => true,
            Selector::Id(wanted) => wanted == id,
            Selector::Container(cid) => container_id == Some(cid),
            Selector::Scoped { id: wanted, container_id: cid } => {
                wanted == id && container_id == Some(cid)
            }
        }
    }
}

impl From<ToastId> for Selector {
    fn from(id: ToastId) -> Self {
        Selector::Id(id)
    }
}

impl From<&ToastId> for Selector {
    fn from(id: &ToastId) -> Self {
        Selector::Id(id.clone())
    }
}

impl From<&str> for Selector {
    fn from(id: &str) -> Self {
        Selector::Id(id.into())
    }
}

impl From<i64> for Selector {
    fn from(id: i64) -> Self {
        Selector::Id(id.into())
    }
}

impl From<Option<ToastId>> for Selector {
    fn from(id: Option<ToastId>) -> Self {
        id.map(Selector::Id).unwrap_or_default()
    }
}
