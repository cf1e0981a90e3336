//! Call Recorder Module
//!
//! Wraps any [`Operation`] with invocation counting and input/output history
//! persisted in a [`Store`], and replays the recorded history as a trace.
//!
//! Wrappers nest, so an operation may carry neither, either or both behaviors:
//!
//! ```ignore
//! let op = StoreValue::new(backend.clone())
//!     .call_history(backend.clone())
//!     .count_calls(backend.clone());
//! ```

mod counted;
mod history;
mod replay;

use std::sync::Arc;

use async_trait::async_trait;

use crate::backend::Store;
use crate::error::Result;

pub use counted::CountCalls;
pub use history::CallHistory;
pub use replay::{load_trace, replay, CallRecord, Trace};

// == Operation Trait ==
/// An invocable unit of work with a stable, developer-assigned identity.
///
/// The identity (`"<TypeName>.<method>"`) prefixes every backend key the
/// recorder writes, so it must not change between process restarts.
#[async_trait]
pub trait Operation: Send + Sync {
    /// Full argument tuple of one invocation.
    type Input: Send + 'static;
    /// Value handed back to the caller.
    type Output: Send + 'static;

    /// Stable operation identity.
    fn name(&self) -> &str;

    /// Runs the operation.
    async fn call(&self, input: Self::Input) -> Result<Self::Output>;
}

// == Operation Extension ==
/// Combinators attaching recorder behavior to an operation.
pub trait OperationExt: Operation + Sized {
    /// Counts every invocation under `"<name>_calls"`.
    fn count_calls(self, backend: Arc<dyn Store>) -> CountCalls<Self> {
        CountCalls::new(self, backend)
    }

    /// Logs inputs and outputs under `"<name>:inputs"` / `"<name>:outputs"`.
    fn call_history(self, backend: Arc<dyn Store>) -> CallHistory<Self> {
        CallHistory::new(self, backend)
    }
}

impl<T: Operation> OperationExt for T {}

// == Key Layout ==
/// Backend key of the invocation counter for `operation`.
pub fn calls_key(operation: &str) -> String {
    format!("{}_calls", operation)
}

/// Backend key of the input log for `operation`.
pub fn inputs_key(operation: &str) -> String {
    format!("{}:inputs", operation)
}

/// Backend key of the output log for `operation`.
pub fn outputs_key(operation: &str) -> String {
    format!("{}:outputs", operation)
}
