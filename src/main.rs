use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod utils;

use cmd::{
    ConnectArgs, CredentialArgs, DeleteArgs, ExecArgs, GlobalOpts, GraphArgs, InsertArgs,
    QueryArgs, WhoamiArgs,
};

/// cgql - command client for the CycleGraph interpreter
///
/// Command layout:
///   cgql connect <HOST>
///   cgql register|login -u USER -p PASS
///   cgql logout | whoami
///   cgql query  vertex|edge|cycle [flags]
///   cgql insert vertex|edge [flags]
///   cgql delete vertex --vid ID | edge --eid ID
///   cgql exec "<command line>" | exec --file intent.yaml
///   cgql graph node <ID> | stats | query|bibfs|membibfs [--param K=V] [--body-file F]
///
/// Global flags / env:
///   -v / -vv        Increase verbosity (RUST_LOG overrides)
///   -q / --quiet    Errors only
///   -t / --target   Interpreter URL (or CGQL_TARGET env, else the connected host)
///   --json          Machine-readable output
///   --dry-run       Print the request instead of sending it
///
/// Examples:
///   cgql connect http://127.0.0.1:8000
///   cgql login -u alice -p secret
///   cgql query cycle --start 1 --depth 4 --dir any --limit 5
///   cgql --dry-run exec "i e --src 1 --dst 2 --amt 100 --create-v"
///
/// Everything after `exec` belongs to the command, so global flags go first.
#[derive(Parser, Debug)]
#[command(
    name = "cgql",
    version,
    about = "cgql - typed command client for the CycleGraph interpreter",
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all non-error logging
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Interpreter base URL
    #[arg(short = 't', long = "target", global = true, value_name = "URL")]
    target: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    /// Session file (default ~/.cgql_config.json)
    #[arg(long, global = true, value_name = "PATH")]
    session: Option<PathBuf>,

    /// Output JSON
    #[arg(long, global = true)]
    json: bool,

    /// Print the request without sending it
    #[arg(long = "dry-run", global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Save the interpreter address in the session
    Connect(ConnectArgs),

    /// Create an account
    Register(CredentialArgs),

    /// Log in and store the session token
    Login(CredentialArgs),

    /// Log out and clear the session
    Logout,

    /// Show the current user
    Whoami(WhoamiArgs),

    /// Query vertices, edges or cycles
    #[command(visible_alias = "q")]
    Query(QueryArgs),

    /// Insert a vertex or edge
    #[command(visible_alias = "i")]
    Insert(InsertArgs),

    /// Delete a vertex or edge
    #[command(visible_alias = "d")]
    Delete(DeleteArgs),

    /// Send a raw command line or a serialized intent
    Exec(ExecArgs),

    /// Graph endpoints with JSON bodies
    Graph(GraphArgs),
}

impl Cli {
    /// Shared options; `--target` falls back to CGQL_TARGET.
    fn global_opts(&self) -> GlobalOpts {
        let target = self.target.clone().or_else(|| {
            std::env::var(cmd::TARGET_ENV)
                .ok()
                .filter(|s| !s.trim().is_empty())
        });
        GlobalOpts {
            target,
            timeout: self.timeout,
            session: self.session.clone(),
            json: self.json,
            dry_run: self.dry_run,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = utils::derive_level(cli.verbose, cli.quiet);
    utils::init_logging(level);

    let opts = cli.global_opts();

    // Validate early so every subcommand reports a bad target the same way.
    if let Some(t) = &opts.target
        && let Err(e) = cgql::client::parse_target(t)
    {
        eprintln!("Invalid target '{t}': {e}");
        std::process::exit(2);
    }

    match cli.command {
        Commands::Connect(args) => cmd::execute_connect(&opts, args),
        Commands::Register(args) => cmd::execute_register(&opts, args),
        Commands::Login(args) => cmd::execute_login(&opts, args),
        Commands::Logout => cmd::execute_logout(&opts),
        Commands::Whoami(args) => cmd::execute_whoami(&opts, args),
        Commands::Query(args) => cmd::execute_query(&opts, args),
        Commands::Insert(args) => cmd::execute_insert(&opts, args),
        Commands::Delete(args) => cmd::execute_delete(&opts, args),
        Commands::Exec(args) => cmd::execute_exec(&opts, args),
        Commands::Graph(args) => cmd::execute_graph(&opts, args),
    }
}
