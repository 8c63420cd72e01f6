//! Command dispatcher.
//!
//! Every intent-bearing call is exactly one `POST /execute` carrying a
//! [`CommandEnvelope`]. Encoding happens first, so an incomplete intent
//! fails before anything reaches the transport.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{CommandEnvelope, DispatchError, RequestClient, endpoint};
use crate::protocol::{
    CommandTokens, Credentials, CycleQuery, EdgeDelete, EdgeInsert, EdgeQuery, Intent,
    VertexDelete, VertexInsert, VertexQuery,
};

#[derive(Debug, Clone)]
pub struct Dispatcher<C> {
    client: C,
}

impl<C: RequestClient> Dispatcher<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Send an already-encoded token sequence.
    pub async fn execute(&self, tokens: CommandTokens) -> Result<Value, DispatchError> {
        // Arguments can carry credentials; only the verb is logged.
        debug!(
            verb = tokens.head().unwrap_or(""),
            tokens = tokens.len(),
            "dispatching command"
        );
        self.client
            .post(endpoint::EXECUTE, &CommandEnvelope::new(tokens))
            .await
    }

    /// Encode then send.
    pub async fn send(&self, intent: &Intent) -> Result<Value, DispatchError> {
        let tokens = intent.encode()?;
        self.execute(tokens).await
    }

    /* ---- Queries ---- */

    pub async fn query_vertices(&self, query: VertexQuery) -> Result<Value, DispatchError> {
        self.send(&Intent::VertexQuery(query)).await
    }

    pub async fn query_edges(&self, query: EdgeQuery) -> Result<Value, DispatchError> {
        self.send(&Intent::EdgeQuery(query)).await
    }

    pub async fn query_cycles(&self, query: CycleQuery) -> Result<Value, DispatchError> {
        self.send(&Intent::CycleQuery(query)).await
    }

    /* ---- Mutations ---- */

    pub async fn insert_vertex(&self, vertex: VertexInsert) -> Result<Value, DispatchError> {
        self.send(&Intent::VertexInsert(vertex)).await
    }

    pub async fn insert_edge(&self, edge: EdgeInsert) -> Result<Value, DispatchError> {
        self.send(&Intent::EdgeInsert(edge)).await
    }

    pub async fn delete_vertex(&self, vid: impl Into<String>) -> Result<Value, DispatchError> {
        self.send(&Intent::VertexDelete(VertexDelete::new(vid)))
            .await
    }

    pub async fn delete_edge(&self, eid: impl Into<String>) -> Result<Value, DispatchError> {
        self.send(&Intent::EdgeDelete(EdgeDelete::new(eid))).await
    }

    /* ---- Auth ---- */

    pub async fn register(&self, user: &str, pass: &str) -> Result<Value, DispatchError> {
        self.send(&Intent::Register(Credentials::new(user, pass)))
            .await
    }

    pub async fn login(&self, user: &str, pass: &str) -> Result<Value, DispatchError> {
        self.send(&Intent::Login(Credentials::new(user, pass)))
            .await
    }

    pub async fn logout(&self) -> Result<Value, DispatchError> {
        self.send(&Intent::Logout).await
    }

    pub async fn whoami(&self) -> Result<Value, DispatchError> {
        self.send(&Intent::Whoami).await
    }

    /* ---- Pass-through (no token encoding) ---- */

    pub async fn query_graph<B>(&self, params: &B) -> Result<Value, DispatchError>
    where
        B: Serialize + Sync,
    {
        self.client.post(endpoint::GRAPH_QUERY, params).await
    }

    pub async fn get_node(&self, node_id: &str) -> Result<Value, DispatchError> {
        let mut path = endpoint::GRAPH_NODE.to_vec();
        path.push(node_id);
        self.client.get(&path).await
    }

    pub async fn graph_stats(&self) -> Result<Value, DispatchError> {
        self.client.get(endpoint::GRAPH_STATS).await
    }

    pub async fn health(&self) -> Result<Value, DispatchError> {
        self.client.get(endpoint::HEALTH).await
    }

    pub async fn execute_bibfs<B>(&self, params: &B) -> Result<Value, DispatchError>
    where
        B: Serialize + Sync,
    {
        self.client.post(endpoint::BIBFS, params).await
    }

    pub async fn execute_membibfs<B>(&self, params: &B) -> Result<Value, DispatchError>
    where
        B: Serialize + Sync,
    {
        self.client.post(endpoint::MEMBIBFS, params).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::protocol::EncodeError;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) struct Call {
        pub method: &'static str,
        pub path: String,
        pub body: Option<Value>,
    }

    /// In-memory RequestClient recording every call.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingClient {
        pub calls: Mutex<Vec<Call>>,
        pub failure: Option<DispatchError>,
    }

    impl RecordingClient {
        pub fn failing(err: DispatchError) -> Self {
            Self {
                failure: Some(err),
                ..Self::default()
            }
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, method: &'static str, path: &[&str], body: Option<Value>) -> Result<Value, DispatchError> {
            self.calls.lock().unwrap().push(Call {
                method,
                path: format!("/{}", path.join("/")),
                body,
            });
            match &self.failure {
                Some(err) => Err(err.clone()),
                None => Ok(json!({"status": "success"})),
            }
        }
    }

    impl RequestClient for RecordingClient {
        async fn get(&self, path: &[&str]) -> Result<Value, DispatchError> {
            self.record("GET", path, None)
        }

        async fn post<B>(&self, path: &[&str], body: &B) -> Result<Value, DispatchError>
        where
            B: Serialize + Sync,
        {
            let body = serde_json::to_value(body).unwrap();
            self.record("POST", path, Some(body))
        }
    }

    fn posted(path: &str, command: Value) -> Call {
        Call {
            method: "POST",
            path: path.into(),
            body: Some(json!({ "command": command })),
        }
    }

    #[tokio::test]
    async fn cycle_query_posts_single_envelope() {
        let d = Dispatcher::new(RecordingClient::default());
        let reply = d.query_cycles(CycleQuery::new("A", 3)).await.unwrap();
        assert_eq!(reply, json!({"status": "success"}));
        assert_eq!(
            d.client().calls(),
            vec![posted(
                "/execute",
                json!(["query", "cycle", "--start", "A", "--depth", "3"])
            )]
        );
    }

    #[tokio::test]
    async fn missing_field_never_reaches_transport() {
        let d = Dispatcher::new(RecordingClient::default());
        let q = CycleQuery {
            start: Some("A".into()),
            ..CycleQuery::default()
        };
        let err = d.query_cycles(q).await.unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Encode(EncodeError::MissingRequiredField("depth"))
        ));
        assert!(d.client().calls().is_empty());
    }

    #[tokio::test]
    async fn auth_helpers() {
        let d = Dispatcher::new(RecordingClient::default());
        d.register("alice", "pw").await.unwrap();
        d.login("alice", "pw").await.unwrap();
        d.whoami().await.unwrap();
        d.logout().await.unwrap();
        assert_eq!(
            d.client().calls(),
            vec![
                posted("/execute", json!(["register", "-u", "alice", "-p", "pw"])),
                posted("/execute", json!(["login", "-u", "alice", "-p", "pw"])),
                posted("/execute", json!(["whoami"])),
                posted("/execute", json!(["logout"])),
            ]
        );
    }

    #[tokio::test]
    async fn mutation_helpers() {
        let d = Dispatcher::new(RecordingClient::default());
        d.insert_edge(EdgeInsert::new("a", "b")).await.unwrap();
        d.delete_vertex("7").await.unwrap();
        d.delete_edge("8").await.unwrap();
        let bodies: Vec<Value> = d
            .client()
            .calls()
            .into_iter()
            .filter_map(|c| c.body)
            .collect();
        assert_eq!(
            bodies,
            vec![
                json!({"command": ["insert", "edge", "--src", "a", "--dst", "b"]}),
                json!({"command": ["delete", "vertex", "--vid", "7"]}),
                json!({"command": ["delete", "edge", "--eid", "8"]}),
            ]
        );
    }

    #[tokio::test]
    async fn pass_through_endpoints() {
        let d = Dispatcher::new(RecordingClient::default());
        let params = json!({"startId": "1", "endId": "2", "maxDepth": 4});
        d.query_graph(&params).await.unwrap();
        d.get_node("42").await.unwrap();
        d.graph_stats().await.unwrap();
        d.execute_bibfs(&params).await.unwrap();
        d.execute_membibfs(&params).await.unwrap();
        d.health().await.unwrap();

        let calls = d.client().calls();
        let routes: Vec<(&str, &str)> = calls
            .iter()
            .map(|c| (c.method, c.path.as_str()))
            .collect();
        assert_eq!(
            routes,
            vec![
                ("POST", "/graph/query"),
                ("GET", "/graph/node/42"),
                ("GET", "/graph/stats"),
                ("POST", "/bibfs/query"),
                ("POST", "/membibfs/query"),
                ("GET", "/health"),
            ]
        );
        assert_eq!(calls[0].body.as_ref(), Some(&params));
    }

    #[tokio::test]
    async fn failures_pass_through_unchanged() {
        let failure = DispatchError::Interpreter {
            status: 401,
            body: json!({"status": "error", "message": "Invalid or expired token."}),
        };
        let d = Dispatcher::new(RecordingClient::failing(failure));
        let err = d.whoami().await.unwrap_err();
        match err {
            DispatchError::Interpreter { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body["message"], "Invalid or expired token.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(d.client().calls().len(), 1);
    }
}
