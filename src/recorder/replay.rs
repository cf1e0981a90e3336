//! Replay
//!
//! Rebuilds the call trace of an operation from its recorded history.

use std::fmt;
use std::io::Write;

use serde::Serialize;
use tracing::debug;

use super::{inputs_key, outputs_key};
use crate::backend::Store;
use crate::error::Result;

// == Call Record ==
/// One recorded invocation: its arguments and the text of its result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallRecord {
    /// Arguments in positional order
    pub args: Vec<serde_json::Value>,
    /// Result as it was logged
    pub output: String,
}

impl CallRecord {
    /// Parses a logged input entry.
    ///
    /// Entries are JSON arrays of the argument tuple. Anything else is kept
    /// verbatim as a single argument so foreign writers still replay.
    fn from_logged(input: &[u8], output: &[u8]) -> Self {
        let text = String::from_utf8_lossy(input);
        let args = match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(serde_json::Value::Array(items)) => items,
            Ok(single) => vec![single],
            Err(err) => {
                debug!("Unparsable input entry {:?}: {}", text, err);
                vec![serde_json::Value::String(text.into_owned())]
            }
        };

        Self {
            args,
            output: String::from_utf8_lossy(output).into_owned(),
        }
    }

    /// Renders the record as `<operation>(<args>) -> <output>`.
    pub fn render(&self, operation: &str) -> String {
        let args: Vec<String> = self.args.iter().map(|arg| arg.to_string()).collect();
        format!("{}({}) -> {}", operation, args.join(", "), self.output)
    }
}

// == Trace ==
/// The recorded history of one operation.
#[derive(Debug, Clone, Serialize)]
pub struct Trace {
    /// Operation identity
    pub operation: String,
    /// Number of logged inputs, i.e. how many times the operation was called
    pub calls: usize,
    /// Inputs paired with outputs by position, truncated at the shorter log
    pub records: Vec<CallRecord>,
}

impl Trace {
    /// Header line announcing the call count.
    pub fn header(&self) -> String {
        format!("{} was called {} times:", self.operation, self.calls)
    }

    /// One rendered line per paired call, in call order.
    pub fn lines(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|record| record.render(&self.operation))
            .collect()
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header())?;
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

// == Load Trace ==
/// Reads the full input and output logs of `operation` from `backend`.
pub async fn load_trace(backend: &dyn Store, operation: &str) -> Result<Trace> {
    let inputs = backend.lrange(&inputs_key(operation), 0, -1).await?;
    let outputs = backend.lrange(&outputs_key(operation), 0, -1).await?;

    if inputs.len() != outputs.len() {
        debug!(
            "History of {} is unbalanced: {} inputs, {} outputs",
            operation,
            inputs.len(),
            outputs.len()
        );
    }

    let records = inputs
        .iter()
        .zip(outputs.iter())
        .map(|(input, output)| CallRecord::from_logged(input, output))
        .collect();

    Ok(Trace {
        operation: operation.to_string(),
        calls: inputs.len(),
        records,
    })
}

// == Replay ==
/// Writes the call trace of `operation` to `sink`.
///
/// The first line states how many times the operation was called, followed by
/// one `<operation>(<args>) -> <output>` line per recorded call.
pub async fn replay<W: Write>(backend: &dyn Store, operation: &str, sink: &mut W) -> Result<()> {
    let trace = load_trace(backend, operation).await?;
    write!(sink, "{}", trace)?;
    Ok(())
}
