//! Invocation Counting
//!
//! Counts every call of the wrapped operation in the backend.

use std::sync::Arc;

use async_trait::async_trait;

use super::{calls_key, Operation};
use crate::backend::Store;
use crate::error::Result;

// == Count Calls ==
/// Wrapper that increments `"<name>_calls"` before each delegated call.
///
/// The increment happens first, so calls that fail are counted too.
pub struct CountCalls<Op> {
    inner: Op,
    backend: Arc<dyn Store>,
    key: String,
}

impl<Op: Operation> CountCalls<Op> {
    /// Wraps `inner`, counting into `backend`.
    pub fn new(inner: Op, backend: Arc<dyn Store>) -> Self {
        let key = calls_key(inner.name());
        Self {
            inner,
            backend,
            key,
        }
    }
}

#[async_trait]
impl<Op: Operation> Operation for CountCalls<Op> {
    type Input = Op::Input;
    type Output = Op::Output;

    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn call(&self, input: Self::Input) -> Result<Self::Output> {
        self.backend.incr(&self.key).await?;
        self.inner.call(input).await
    }
}
