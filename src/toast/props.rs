//! 交给 store 的最终 toast 记录

use super::id::{ContainerId, ToastId};
use super::kind::ToastType;
use super::options::ToastOptions;

/// Options after dispatch: id and type are always resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ToastProps {
    pub toast_id: ToastId,
    pub toast_type: ToastType,
    /// Fresh marker generated for every update of the toast.
    pub update_id: Option<ToastId>,
    /// Previous id when an update renamed the toast.
    pub stale_id: Option<ToastId>,
    /// Remaining flags; `toast_id` and `toast_type` are never set here.
    pub options: ToastOptions,
}

impl ToastProps {
    pub fn new(toast_id: ToastId, toast_type: ToastType, mut options: ToastOptions) -> Self {
        options.toast_id = None;
        options.toast_type = None;
        Self {
            toast_id,
            toast_type,
            update_id: None,
            stale_id: None,
            options,
        }
    }

    pub fn container_id(&self) -> Option<&ContainerId> {
        self.options.container_id.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.options.is_loading.unwrap_or(false)
    }

    /// Back to a plain option set with id and type filled in.
    pub fn to_options(&self) -> ToastOptions {
        ToastOptions {
            toast_id: Some(self.toast_id.clone()),
            toast_type: Some(self.toast_type),
            ..self.options.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_moves_id_and_type_out_of_options() {
        let options = ToastOptions::new()
            .with_toast_id("x")
            .with_type(ToastType::Info)
            .with_container_id("side");
        let props = ToastProps::new(ToastId::from("y"), ToastType::Error, options);

        assert_eq!(props.toast_id, ToastId::from("y"));
        assert_eq!(props.toast_type, ToastType::Error);
        assert!(props.options.toast_id.is_none());
        assert!(props.options.toast_type.is_none());
        assert_eq!(props.container_id(), Some(&ContainerId::from("side")));
        assert!(!props.is_loading());
    }

    #[test]
    fn test_to_options_round_trips_id_and_type() {
        let props = ToastProps::new(ToastId::from(3), ToastType::Success, ToastOptions::new().with_loading(true));
        let options = props.to_options();
        assert_eq!(options.toast_id, Some(ToastId::Num(3)));
        assert_eq!(options.toast_type, Some(ToastType::Success));
        assert_eq!(options.is_loading, Some(true));
    }
}
