use crate::core::{Notice, Notifier};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

/// A notification waiting to be shown by the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toast {
    pub notice: Notice,
    pub message: &'static str,
    pub raised_at: DateTime<Utc>,
}

/// Collects toasts raised by cart operations until the UI drains them.
#[derive(Debug, Clone, Default)]
pub struct ToastQueue {
    toasts: Arc<Mutex<Vec<Toast>>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Toast>> {
        // 通知只是附加資料，鎖中毒時沿用內部資料
        self.toasts.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.lock())
    }

    pub fn snapshot(&self) -> Vec<Toast> {
        self.lock().clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.lock().iter().map(|toast| toast.notice).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, notice: Notice) {
        tracing::debug!("Raising toast: {}", notice.message());
        self.lock().push(Toast {
            notice,
            message: notice.message(),
            raised_at: Utc::now(),
        });
    }
}
