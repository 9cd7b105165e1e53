//! Task-local trace id for HTTP requests.
//!
//! `RequestTrace` opens the scope; error responses read it back so the body
//! and the `x-trace-id` header agree. Coordinator code does not use this.

use std::cell::RefCell;
use std::future::Future;

use tokio::task_local;

task_local! {
    static TRACE_ID: RefCell<Option<String>>;
}

/// Trace id of the current task, or `"unknown"` outside a request scope.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(|cell| cell.borrow().clone())
        .ok()
        .flatten()
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: Future<Output = R>,
{
    TRACE_ID.scope(RefCell::new(Some(trace_id)), future).await
}
