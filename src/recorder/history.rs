//! Input/Output History
//!
//! Appends the serialized arguments and result of each call to two backend lists.

use std::fmt::Display;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use super::{inputs_key, outputs_key, Operation};
use crate::backend::Store;
use crate::error::Result;

// == Call History ==
/// Wrapper logging each call to `"<name>:inputs"` and `"<name>:outputs"`.
///
/// Inputs are stored as the JSON array of the argument tuple, outputs as the
/// result's `Display` text. A call whose inner operation fails leaves its input
/// without a matching output; replay pairs the logs positionally and stops at
/// the shorter one.
pub struct CallHistory<Op> {
    inner: Op,
    backend: Arc<dyn Store>,
    inputs: String,
    outputs: String,
}

impl<Op: Operation> CallHistory<Op> {
    /// Wraps `inner`, logging into `backend`.
    pub fn new(inner: Op, backend: Arc<dyn Store>) -> Self {
        let inputs = inputs_key(inner.name());
        let outputs = outputs_key(inner.name());
        Self {
            inner,
            backend,
            inputs,
            outputs,
        }
    }
}

#[async_trait]
impl<Op> Operation for CallHistory<Op>
where
    Op: Operation,
    Op::Input: Serialize,
    Op::Output: Display,
{
    type Input = Op::Input;
    type Output = Op::Output;

    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn call(&self, input: Self::Input) -> Result<Self::Output> {
        let args = serde_json::to_string(&input)?;
        self.backend.rpush(&self.inputs, args.into_bytes()).await?;

        let output = self.inner.call(input).await?;

        self.backend
            .rpush(&self.outputs, output.to_string().into_bytes())
            .await?;
        Ok(output)
    }
}
