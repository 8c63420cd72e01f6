//! `cgql graph ...` - graph endpoints that take opaque JSON instead of a
//! token command.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::Value;

use super::shared::{GlobalOpts, block_on, build_body, finish_reply, print_dry_run};
use cgql::guard::{self, GuardError, Navigation};

#[derive(Args, Debug)]
pub struct GraphArgs {
    #[command(subcommand)]
    pub op: GraphOp,
}

/// Request body for the POST endpoints.
#[derive(Args, Debug, Default, Clone)]
pub struct BodyArgs {
    /// Body field (KEY=VALUE, repeatable); overrides --body-file
    #[arg(long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,

    /// Base body (JSON or YAML object)
    #[arg(long = "body-file", value_name = "PATH")]
    pub body_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum GraphOp {
    /// GET /graph/node/{id}
    Node {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// GET /graph/stats
    Stats,
    /// POST /graph/query
    Query(BodyArgs),
    /// POST /bibfs/query
    Bibfs(BodyArgs),
    /// POST /membibfs/query
    Membibfs(BodyArgs),
}

impl GraphOp {
    /// HTTP method and display path.
    pub fn route(&self) -> (&'static str, String) {
        match self {
            GraphOp::Node { id } => ("GET", format!("/graph/node/{id}")),
            GraphOp::Stats => ("GET", "/graph/stats".into()),
            GraphOp::Query(_) => ("POST", "/graph/query".into()),
            GraphOp::Bibfs(_) => ("POST", "/bibfs/query".into()),
            GraphOp::Membibfs(_) => ("POST", "/membibfs/query".into()),
        }
    }

    fn body(&self) -> Result<Option<Value>> {
        match self {
            GraphOp::Query(b) | GraphOp::Bibfs(b) | GraphOp::Membibfs(b) => {
                build_body(b.body_file.as_deref(), &b.params).map(Some)
            }
            GraphOp::Node { .. } | GraphOp::Stats => Ok(None),
        }
    }
}

pub fn execute_graph(opts: &GlobalOpts, args: GraphArgs) -> Result<()> {
    let session = opts.load_session()?;
    // These endpoints back the graph query page and share its login rule.
    if let Navigation::Redirect { .. } = guard::navigate("/query", &session) {
        return Err(GuardError::NotAuthenticated.into());
    }

    let op = args.op;
    let body = op.body()?;
    if opts.dry_run {
        let (method, path) = op.route();
        print_dry_run(method, &path, body.as_ref(), opts.json);
        return Ok(());
    }

    let dispatcher = opts.connect(&session)?;
    let empty = Value::Object(Default::default());
    let payload = body.as_ref().unwrap_or(&empty);
    let reply = block_on(async {
        match &op {
            GraphOp::Node { id } => dispatcher.get_node(id).await,
            GraphOp::Stats => dispatcher.graph_stats().await,
            GraphOp::Query(_) => dispatcher.query_graph(payload).await,
            GraphOp::Bibfs(_) => dispatcher.execute_bibfs(payload).await,
            GraphOp::Membibfs(_) => dispatcher.execute_membibfs(payload).await,
        }
    })?;
    finish_reply(opts, reply)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;
    use tempfile::TempDir;

    #[derive(Parser, Debug)]
    struct Harness {
        #[command(subcommand)]
        op: GraphOp,
    }

    fn parse(argv: &[&str]) -> GraphOp {
        Harness::try_parse_from(argv).unwrap().op
    }

    #[test]
    fn routes() {
        assert_eq!(parse(&["g", "node", "42"]).route(), ("GET", "/graph/node/42".to_string()));
        assert_eq!(parse(&["g", "stats"]).route().1, "/graph/stats");
        assert_eq!(parse(&["g", "membibfs"]).route(), ("POST", "/membibfs/query".to_string()));
    }

    #[test]
    fn params_become_body() {
        let op = parse(&["g", "bibfs", "--param", "startId=1", "--param", "maxDepth=6"]);
        assert_eq!(op.body().unwrap(), Some(json!({"startId": 1, "maxDepth": 6})));
        assert_eq!(parse(&["g", "stats"]).body().unwrap(), None);
    }

    #[test]
    fn requires_login() {
        let dir = TempDir::new().unwrap();
        let opts = GlobalOpts {
            session: Some(dir.path().join("s.json")),
            dry_run: true,
            ..GlobalOpts::default()
        };
        let err = execute_graph(&opts, GraphArgs { op: GraphOp::Stats }).unwrap_err();
        assert!(err.downcast_ref::<GuardError>().is_some());
    }
}
