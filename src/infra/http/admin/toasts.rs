use std::sync::Mutex;

use uuid::Uuid;

use crate::application::admin::post_list::Notifier;
use crate::presentation::admin::views::AdminToastItem;
use crate::util::lock::mutex_lock;

const SOURCE: &str = "infra::http::admin::toasts";

/// Collects notices raised while handling one request so the rendered panel
/// or editor can show them as toasts. Manager alerts land as error toasts.
#[derive(Default)]
pub(crate) struct ToastNotifier {
    items: Mutex<Vec<AdminToastItem>>,
}

impl ToastNotifier {
    pub(crate) fn push_error(&self, text: impl Into<String>) {
        self.push("error", text.into());
    }

    pub(crate) fn push_success(&self, text: impl Into<String>) {
        self.push("success", text.into());
    }

    fn push(&self, kind: &'static str, text: String) {
        mutex_lock(&self.items, SOURCE, "push").push(AdminToastItem {
            id: format!("toast-{}", Uuid::new_v4()),
            kind,
            text,
        });
    }

    pub(crate) fn into_toasts(self) -> Vec<AdminToastItem> {
        self.items
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Notifier for ToastNotifier {
    fn alert(&self, message: &str) {
        self.push_error(message);
    }
}
