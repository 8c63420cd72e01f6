//! `cgql insert ...` / `cgql delete ...`

use anyhow::Result;
use clap::{Args, Subcommand};

use super::shared::{GlobalOpts, run_command};
use cgql::protocol::{EdgeDelete, EdgeInsert, Intent, VertexDelete, VertexInsert};

#[derive(Args, Debug)]
pub struct InsertArgs {
    #[command(subcommand)]
    pub subject: InsertSubject,
}

#[derive(Subcommand, Debug)]
pub enum InsertSubject {
    /// Create (or upsert by --vid) a vertex
    #[command(visible_alias = "v")]
    Vertex(VertexInsertArgs),
    /// Create an edge between two vertices
    #[command(visible_alias = "e")]
    Edge(EdgeInsertArgs),
}

#[derive(Args, Debug)]
pub struct VertexInsertArgs {
    #[arg(long = "vt", visible_alias = "v-type", value_name = "TYPE")]
    pub v_type: String,
    #[arg(long)]
    pub vid: Option<String>,
    #[arg(long, visible_alias = "create-time")]
    pub time: Option<i64>,
    #[arg(long = "bal", visible_alias = "balance", allow_hyphen_values = true)]
    pub balance: Option<i64>,
}

#[derive(Args, Debug)]
pub struct EdgeInsertArgs {
    #[arg(long, visible_alias = "src-vid")]
    pub src: String,
    #[arg(long, visible_alias = "dst-vid")]
    pub dst: String,
    #[arg(long)]
    pub eid: Option<String>,
    #[arg(long = "amt", visible_alias = "amount", allow_hyphen_values = true)]
    pub amount: Option<i64>,
    #[arg(long, visible_alias = "occur-time")]
    pub time: Option<i64>,
    #[arg(long = "et", visible_alias = "e-type", value_name = "TYPE")]
    pub e_type: Option<String>,
    /// Create missing endpoint vertices
    #[arg(long = "create-v", visible_alias = "create-vertices")]
    pub create_v: bool,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    #[command(subcommand)]
    pub subject: DeleteSubject,
}

#[derive(Subcommand, Debug)]
pub enum DeleteSubject {
    #[command(visible_alias = "v")]
    Vertex {
        #[arg(long)]
        vid: String,
    },
    #[command(visible_alias = "e")]
    Edge {
        #[arg(long)]
        eid: String,
    },
}

impl InsertSubject {
    pub fn into_intent(self) -> Intent {
        match self {
            InsertSubject::Vertex(a) => Intent::VertexInsert(VertexInsert {
                v_type: Some(a.v_type),
                vid: a.vid,
                time: a.time,
                balance: a.balance,
            }),
            InsertSubject::Edge(a) => Intent::EdgeInsert(EdgeInsert {
                src: Some(a.src),
                dst: Some(a.dst),
                eid: a.eid,
                amount: a.amount,
                time: a.time,
                e_type: a.e_type,
                create_v: a.create_v,
            }),
        }
    }
}

impl DeleteSubject {
    pub fn into_intent(self) -> Intent {
        match self {
            DeleteSubject::Vertex { vid } => VertexDelete::new(vid).into(),
            DeleteSubject::Edge { eid } => EdgeDelete::new(eid).into(),
        }
    }
}

pub fn execute_insert(opts: &GlobalOpts, args: InsertArgs) -> Result<()> {
    let session = opts.load_session()?;
    let tokens = args.subject.into_intent().encode()?;
    run_command(opts, &session, tokens)?;
    Ok(())
}

pub fn execute_delete(opts: &GlobalOpts, args: DeleteArgs) -> Result<()> {
    let session = opts.load_session()?;
    let tokens = args.subject.into_intent().encode()?;
    run_command(opts, &session, tokens)?;
    Ok(())
}
