use crate::error::ErrorKind;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag shared between a request handler and the
/// engine. Scoring calls finish in microseconds and only check it on
/// entry; the trend scan also checks it between chunks.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub fn err_if_cancelled(&self) -> Result<(), ErrorKind> {
        if self.is_cancelled() {
            Err(ErrorKind::Cancelled)
        } else {
            Ok(())
        }
    }
}
