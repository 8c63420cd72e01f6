//! `cgql query vertex|edge|cycle` - flag spelling matches the wire vocabulary
//! (short canonical forms, long forms as aliases).

use anyhow::Result;
use clap::{Args, Subcommand};

use super::shared::{GlobalOpts, run_command};
use cgql::protocol::{CycleQuery, EdgeQuery, Intent, VertexQuery};

#[derive(Args, Debug)]
pub struct QueryArgs {
    #[command(subcommand)]
    pub subject: QuerySubject,
}

#[derive(Subcommand, Debug)]
pub enum QuerySubject {
    /// Filter vertices
    #[command(visible_alias = "v")]
    Vertex(VertexQueryArgs),
    /// Filter edges
    #[command(visible_alias = "e")]
    Edge(EdgeQueryArgs),
    /// Search cycles through a start vertex
    #[command(visible_alias = "c")]
    Cycle(CycleQueryArgs),
}

#[derive(Args, Debug, Default)]
pub struct VertexQueryArgs {
    #[arg(long)]
    pub vid: Option<String>,
    /// Vertex types (one or more)
    #[arg(long = "vt", visible_alias = "v-type", num_args = 1.., value_name = "TYPE")]
    pub v_type: Vec<String>,
    #[arg(long = "min-time", allow_hyphen_values = true)]
    pub min_time: Option<i64>,
    #[arg(long = "max-time", allow_hyphen_values = true)]
    pub max_time: Option<i64>,
    #[arg(long = "min-bal", visible_alias = "min-balance", allow_hyphen_values = true)]
    pub min_balance: Option<i64>,
    #[arg(long = "max-bal", visible_alias = "max-balance", allow_hyphen_values = true)]
    pub max_balance: Option<i64>,
}

#[derive(Args, Debug, Default)]
pub struct EdgeQueryArgs {
    #[arg(long)]
    pub eid: Option<String>,
    #[arg(long, visible_alias = "src-vid")]
    pub src: Option<String>,
    #[arg(long, visible_alias = "dst-vid")]
    pub dst: Option<String>,
    /// Edge types (one or more)
    #[arg(long = "et", visible_alias = "e-type", num_args = 1.., value_name = "TYPE")]
    pub e_type: Vec<String>,
    #[arg(long = "min-amt", visible_alias = "min-amount", allow_hyphen_values = true)]
    pub min_amount: Option<i64>,
    #[arg(long = "max-amt", visible_alias = "max-amount", allow_hyphen_values = true)]
    pub max_amount: Option<i64>,
    #[arg(long = "min-time", allow_hyphen_values = true)]
    pub min_time: Option<i64>,
    #[arg(long = "max-time", allow_hyphen_values = true)]
    pub max_time: Option<i64>,
}

#[derive(Args, Debug, Default)]
pub struct CycleQueryArgs {
    #[arg(long, visible_alias = "start-vid")]
    pub start: String,
    #[arg(long, visible_alias = "max-depth")]
    pub depth: u32,
    /// Traversal direction (e.g. forward, any)
    #[arg(long = "dir", visible_alias = "direction")]
    pub direction: Option<String>,
    #[arg(long = "vt", visible_alias = "v-type", num_args = 1.., value_name = "TYPE")]
    pub v_type: Vec<String>,
    #[arg(long = "min-bal", visible_alias = "min-balance", allow_hyphen_values = true)]
    pub min_balance: Option<i64>,
    #[arg(long = "et", visible_alias = "e-type", num_args = 1.., value_name = "TYPE")]
    pub e_type: Vec<String>,
    #[arg(long = "min-amt", visible_alias = "min-amount", allow_hyphen_values = true)]
    pub min_amount: Option<i64>,
    #[arg(long = "max-amt", visible_alias = "max-amount", allow_hyphen_values = true)]
    pub max_amount: Option<i64>,
    #[arg(long)]
    pub limit: Option<u32>,
    #[arg(long = "allow-dup-v", visible_alias = "allow-duplicate-vertices")]
    pub allow_dup_v: bool,
    #[arg(long = "allow-dup-e", visible_alias = "allow-duplicate-edges")]
    pub allow_dup_e: bool,
}

fn non_empty(v: Vec<String>) -> Option<Vec<String>> {
    (!v.is_empty()).then_some(v)
}

impl From<VertexQueryArgs> for VertexQuery {
    fn from(a: VertexQueryArgs) -> Self {
        VertexQuery {
            vid: a.vid,
            v_type: non_empty(a.v_type),
            min_time: a.min_time,
            max_time: a.max_time,
            min_balance: a.min_balance,
            max_balance: a.max_balance,
        }
    }
}

impl From<EdgeQueryArgs> for EdgeQuery {
    fn from(a: EdgeQueryArgs) -> Self {
        EdgeQuery {
            eid: a.eid,
            src: a.src,
            dst: a.dst,
            e_type: non_empty(a.e_type),
            min_amount: a.min_amount,
            max_amount: a.max_amount,
            min_time: a.min_time,
            max_time: a.max_time,
        }
    }
}

impl From<CycleQueryArgs> for CycleQuery {
    fn from(a: CycleQueryArgs) -> Self {
        CycleQuery {
            start: Some(a.start),
            depth: Some(a.depth),
            direction: a.direction,
            v_type: non_empty(a.v_type),
            min_balance: a.min_balance,
            e_type: non_empty(a.e_type),
            min_amount: a.min_amount,
            max_amount: a.max_amount,
            limit: a.limit,
            allow_dup_v: a.allow_dup_v,
            allow_dup_e: a.allow_dup_e,
        }
    }
}

impl QuerySubject {
    pub fn into_intent(self) -> Intent {
        match self {
            QuerySubject::Vertex(a) => Intent::VertexQuery(a.into()),
            QuerySubject::Edge(a) => Intent::EdgeQuery(a.into()),
            QuerySubject::Cycle(a) => Intent::CycleQuery(a.into()),
        }
    }
}

pub fn execute_query(opts: &GlobalOpts, args: QueryArgs) -> Result<()> {
    let session = opts.load_session()?;
    let tokens = args.subject.into_intent().encode()?;
    run_command(opts, &session, tokens)?;
    Ok(())
}
