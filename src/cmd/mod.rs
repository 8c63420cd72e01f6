/*!
Subcommands of the `cgql` binary.

Layout:
  src/cmd/
    mod.rs      (this file: module declarations + re-exports)
    shared.rs   GlobalOpts, session / target / dispatcher plumbing, params
    format.rs   human output (boxed header, tables)
    auth.rs     connect / register / login / logout / whoami
    query.rs    query vertex | edge | cycle
    mutate.rs   insert vertex | edge, delete vertex | edge
    exec.rs     raw command line or intent file
    graph.rs    pass-through graph endpoints

Conventions:
  - Each subcommand module exposes `execute_*` returning `anyhow::Result<()>`.
  - Argument structs derive `clap::Args`; typed intents are built from them
    and go through `shared::run_command` (guard, dry-run, one request).
*/

pub mod auth;
pub mod exec;
pub mod format;
pub mod graph;
pub mod mutate;
pub mod query;
pub mod shared;

pub use auth::{
    ConnectArgs, CredentialArgs, WhoamiArgs, execute_connect, execute_login, execute_logout,
    execute_register, execute_whoami,
};
pub use exec::{ExecArgs, execute_exec};
pub use graph::{GraphArgs, execute_graph};
pub use mutate::{DeleteArgs, InsertArgs, execute_delete, execute_insert};
pub use query::{QueryArgs, execute_query};
pub use shared::{GlobalOpts, TARGET_ENV};
