//! Failure isolation for per-module work.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use thiserror::Error;

use crate::diagnostics::Diagnostics;

/// A panic caught while running isolated work.
#[derive(Debug, Error)]
#[error("panicked: {0}")]
pub struct Panicked(pub String);

impl Panicked {
    fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Self(message)
    }
}

/// Run one unit of per-module work without letting it abort the pass.
///
/// Returns `Some` on success. An `Err` or a panic is forwarded to
/// `diagnostics` under `context` and yields `None`; callers fall back to an
/// empty result for the unit.
pub fn isolate<T, E, F>(context: &str, diagnostics: &dyn Diagnostics, work: F) -> Option<T>
where
    E: std::error::Error + 'static,
    F: FnOnce() -> Result<T, E>,
{
    match catch_unwind(AssertUnwindSafe(work)) {
        Ok(Ok(value)) => Some(value),
        Ok(Err(err)) => {
            tracing::warn!("[{}] {}", context, err);
            diagnostics.record(context, &err);
            None
        }
        Err(payload) => {
            let err = Panicked::from_payload(payload);
            tracing::warn!("[{}] {}", context, err);
            diagnostics.record(context, &err);
            None
        }
    }
}
