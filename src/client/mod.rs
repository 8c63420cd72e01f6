/*!
Client side of the CycleGraph HTTP boundary.

  dispatcher.rs   Dispatcher: intent -> envelope -> one POST /execute;
                  plus the un-encoded pass-through endpoints
  http.rs         HttpClient: reqwest-backed RequestClient
  target.rs       base URL parsing

The dispatcher never retries and never looks inside a response body: a
2xx body comes back as-is, anything else is surfaced as
`DispatchError::Interpreter` with the body untouched.
*/

pub mod dispatcher;
pub mod http;
pub mod target;

use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::protocol::{CommandTokens, EncodeError};

pub use dispatcher::Dispatcher;
pub use http::{ClientConfig, HttpClient};
pub use target::{TargetError, TargetKind, parse_target};

/// Endpoint paths, as URL segments below the target base.
pub mod endpoint {
    pub const EXECUTE: &[&str] = &["execute"];
    pub const GRAPH_QUERY: &[&str] = &["graph", "query"];
    pub const GRAPH_NODE: &[&str] = &["graph", "node"];
    pub const GRAPH_STATS: &[&str] = &["graph", "stats"];
    pub const BIBFS: &[&str] = &["bibfs", "query"];
    pub const MEMBIBFS: &[&str] = &["membibfs", "query"];
    pub const HEALTH: &[&str] = &["health"];
}

/// Failure of a dispatched call.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// The intent could not be encoded; nothing was sent.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Target(#[from] TargetError),

    /// The request never produced a response (connect, timeout, IO).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The interpreter answered with a non-success status.
    #[error("interpreter returned HTTP {status}: {body}")]
    Interpreter { status: u16, body: Value },
}

/// Transport unit for every intent-bearing call: `{ "command": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub command: CommandTokens,
}

impl CommandEnvelope {
    pub fn new(command: CommandTokens) -> Self {
        Self { command }
    }
}

/// The outbound HTTP collaborator.
///
/// `path` is a list of URL segments relative to the target base; each
/// segment is percent-encoded by the implementation.
pub trait RequestClient {
    fn get(&self, path: &[&str]) -> impl Future<Output = Result<Value, DispatchError>> + Send;

    fn post<B>(
        &self,
        path: &[&str],
        body: &B,
    ) -> impl Future<Output = Result<Value, DispatchError>> + Send
    where
        B: Serialize + Sync;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Intent, VertexDelete};

    #[test]
    fn envelope_wire_shape() {
        let tokens = Intent::from(VertexDelete::new("5")).encode().unwrap();
        let json = serde_json::to_value(CommandEnvelope::new(tokens)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"command": ["delete", "vertex", "--vid", "5"]})
        );
    }

    #[test]
    fn interpreter_error_display_keeps_body() {
        let err = DispatchError::Interpreter {
            status: 401,
            body: serde_json::json!({"status":"error","message":"Invalid or expired token."}),
        };
        let s = err.to_string();
        assert!(s.contains("401"));
        assert!(s.contains("expired token"));
    }
}
