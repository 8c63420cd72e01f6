/*!
exec.rs - send a raw command line or a serialized intent.

  cgql exec "q c --start A --depth 3"          one shell-quoted line
  cgql exec query cycle --start A --depth 3    pre-split words
  cgql exec --file intent.yaml                 {"intent": "cycle_query", ...}

Input is always decoded into a typed intent and re-encoded, so aliases are
normalized and malformed commands never leave the machine. A decoded
`login` stores its token exactly like `cgql login`.
*/

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use tracing::debug;

use super::auth::store_login;
use super::shared::{GlobalOpts, load_structured, run_command};
use cgql::protocol::{Intent, decode, decode_line};

#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Command words, or a single quoted command line. Everything after
    /// `exec` is taken as part of the command.
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        required_unless_present = "file",
        conflicts_with = "file"
    )]
    pub words: Vec<String>,

    /// Load a serialized intent (JSON or YAML)
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

impl ExecArgs {
    pub fn intent(&self) -> Result<Intent> {
        if let Some(path) = &self.file {
            return load_structured(path)
                .with_context(|| format!("invalid intent file: {}", path.display()));
        }
        let intent = match self.words.as_slice() {
            [] => bail!("no command given"),
            [line] => decode_line(line)?,
            words => decode(words)?,
        };
        Ok(intent)
    }
}

pub fn execute_exec(opts: &GlobalOpts, args: ExecArgs) -> Result<()> {
    let intent = args.intent()?;
    debug!(kind = ?intent.kind(), "decoded intent");

    let mut session = opts.load_session()?;
    let tokens = intent.encode()?;
    let reply = run_command(opts, &session, tokens)?;

    if let (Intent::Login(credentials), Some(reply)) = (&intent, reply) {
        store_login(&mut session, &reply, credentials.user.as_deref().unwrap_or_default())?;
    }
    Ok(())
}
