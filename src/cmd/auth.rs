/*!
auth.rs - connection and account commands.

  cgql connect <HOST> [--check]   store the interpreter address
  cgql register -u U -p P
  cgql login    -u U -p P         store the returned token (7-day TTL)
  cgql logout                     tell the interpreter, then wipe the session
  cgql whoami [--local]
*/

use anyhow::{Context, Result, bail};
use clap::Args;
use serde_json::Value;
use tracing::{debug, warn};

use super::shared::{self, GlobalOpts, block_on, emit_status, run_command};
use cgql::client::parse_target;
use cgql::protocol::{Credentials, Intent};
use cgql::session::{FileSession, SessionStore, unix_now};

/* ---- Args ---- */

#[derive(Args, Debug)]
pub struct ConnectArgs {
    /// Interpreter address (e.g. http://127.0.0.1:8000)
    #[arg(value_name = "HOST")]
    pub host: String,

    /// Probe GET /health before saving
    #[arg(long)]
    pub check: bool,
}

#[derive(Args, Debug)]
pub struct CredentialArgs {
    #[arg(short = 'u', long = "username", value_name = "USER")]
    pub username: String,

    #[arg(short = 'p', long = "password", value_name = "PASS")]
    pub password: String,
}

impl CredentialArgs {
    fn credentials(&self) -> Credentials {
        Credentials::new(self.username.trim(), self.password.as_str())
    }
}

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Answer from the session file without contacting the interpreter
    #[arg(long)]
    pub local: bool,
}

/* ---- connect ---- */

pub fn execute_connect(opts: &GlobalOpts, args: ConnectArgs) -> Result<()> {
    let url = parse_target(&args.host)
        .with_context(|| format!("Failed to parse target: '{}'", args.host))?;
    let mut session = opts.load_session()?;
    session.set_host(url.as_str());

    if args.check {
        let probe = GlobalOpts {
            target: Some(url.to_string()),
            ..opts.clone()
        };
        if opts.dry_run {
            shared::print_dry_run("GET", "/health", None, opts.json);
        } else {
            let dispatcher = probe.connect(&session)?;
            let reply = block_on(dispatcher.health())?;
            reply.with_context(|| format!("{url} did not answer the health check"))?;
        }
    }

    if opts.dry_run {
        debug!("dry run: session left untouched");
    } else {
        session.save()?;
    }
    emit_status(
        opts.json,
        true,
        &format!("Connected to {url}. Session configuration saved."),
    );
    Ok(())
}

/* ---- register / login ---- */

pub fn execute_register(opts: &GlobalOpts, args: CredentialArgs) -> Result<()> {
    let session = opts.load_session()?;
    let tokens = Intent::Register(args.credentials()).encode()?;
    run_command(opts, &session, tokens)?;
    Ok(())
}

pub fn execute_login(opts: &GlobalOpts, args: CredentialArgs) -> Result<()> {
    let mut session = opts.load_session()?;
    let credentials = args.credentials();
    let tokens = Intent::Login(credentials.clone()).encode()?;
    let Some(reply) = run_command(opts, &session, tokens)? else {
        return Ok(());
    };
    store_login(&mut session, &reply, credentials.user.as_deref().unwrap_or_default())
}

/// Persist the token from a successful login reply.
pub(super) fn store_login(session: &mut FileSession, reply: &Value, fallback_user: &str) -> Result<()> {
    let token = reply
        .get("token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty());
    let Some(token) = token else {
        bail!("login succeeded but the interpreter returned no token");
    };
    let user = reply
        .get("username")
        .and_then(Value::as_str)
        .unwrap_or(fallback_user);
    session.set_token(token, user, unix_now());
    session.save()?;
    debug!(user, "session token stored");
    Ok(())
}

/* ---- logout ---- */

pub fn execute_logout(opts: &GlobalOpts) -> Result<()> {
    let mut session = opts.load_session()?;

    if session.has_token() {
        let tokens = Intent::Logout.encode()?;
        if opts.dry_run {
            return run_command(opts, &session, tokens).map(drop);
        }
        // The local session is cleared even if the interpreter is unreachable.
        match opts.connect(&session) {
            Ok(dispatcher) => {
                if let Err(e) = block_on(dispatcher.execute(tokens))? {
                    warn!(error = %e, "interpreter logout failed");
                }
            }
            Err(e) => warn!(error = %e, "skipping interpreter logout"),
        }
    }

    session.clear();
    session.save()?;
    emit_status(opts.json, true, "Logged out and session cleared.");
    Ok(())
}

/* ---- whoami ---- */

pub fn execute_whoami(opts: &GlobalOpts, args: WhoamiArgs) -> Result<()> {
    let session = opts.load_session()?;
    if args.local {
        return match session.username().filter(|_| session.has_token()) {
            Some(user) => {
                shared::emit(
                    &serde_json::json!({"status": "success", "found": true, "current_user": user}),
                    opts.json,
                );
                Ok(())
            }
            None => {
                emit_status(opts.json, false, "Not logged in");
                bail!("not logged in")
            }
        };
    }
    let tokens = Intent::Whoami.encode()?;
    run_command(opts, &session, tokens)?;
    Ok(())
}
