/*!
shared.rs - plumbing every subcommand goes through.

Flow for a network command:

  GlobalOpts ──load_session──> FileSession
             ──connect──────> Dispatcher<HttpClient>   (target + token cookie)
  tokens ──guard::check_command──> dry-run print | one blocking request
  reply  ──emit──> stdout (pretty JSON with --json, boxed table otherwise)

Also home to the KEY=VALUE param parsing / coercion and the JSON-or-YAML
file loader used by `exec --file` and `graph ... --body-file`.
*/

use std::borrow::Cow;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::{debug, info};
use url::Url;

use super::format::{self, Role, StyleOptions};
use cgql::client::{
    ClientConfig, CommandEnvelope, DispatchError, Dispatcher, HttpClient, parse_target,
};
use cgql::guard;
use cgql::protocol::CommandTokens;
use cgql::session::{FileSession, SessionStore};

/// Environment fallback for `--target`.
pub const TARGET_ENV: &str = "CGQL_TARGET";

/* ---- Global options ---- */

/// Flags shared by every subcommand (filled from the top-level CLI).
#[derive(Debug, Clone, Default)]
pub struct GlobalOpts {
    /// `--target` or `CGQL_TARGET`.
    pub target: Option<String>,
    pub timeout: Option<u64>,
    pub session: Option<PathBuf>,
    pub json: bool,
    pub dry_run: bool,
}

impl GlobalOpts {
    pub fn load_session(&self) -> Result<FileSession> {
        let path = match &self.session {
            Some(p) => p.clone(),
            None => FileSession::default_path()?,
        };
        debug!(path = %path.display(), "loading session");
        Ok(FileSession::load(path))
    }

    /// Effective interpreter URL: flag/env first, then the connected host.
    pub fn resolve_target(&self, session: &FileSession) -> Result<Url> {
        let raw = self
            .target
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| session.host())
            .ok_or_else(|| {
                anyhow!("no target specified (use --target, {TARGET_ENV}, or `cgql connect <HOST>`)")
            })?;
        parse_target(raw).with_context(|| format!("Failed to parse target: '{raw}'"))
    }

    pub fn connect(&self, session: &FileSession) -> Result<Dispatcher<HttpClient>> {
        let target = self.resolve_target(session)?;
        let mut config = ClientConfig::new(target).with_token(session.token().map(str::to_owned));
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        let client = HttpClient::new(config)?;
        Ok(Dispatcher::new(client))
    }
}

/* ---- Runtime ---- */

/// Run one future on a fresh runtime.
pub fn block_on<F: Future>(fut: F) -> Result<F::Output> {
    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    Ok(rt.block_on(fut))
}

/* ---- Command dispatch ---- */

/// Guard, then send `tokens` to `/execute`.
///
/// Returns `None` under `--dry-run` (the envelope is printed instead).
pub fn run_command(
    opts: &GlobalOpts,
    session: &FileSession,
    tokens: CommandTokens,
) -> Result<Option<Value>> {
    guard::check_command(&tokens, session)?;

    if opts.dry_run {
        let mut envelope = serde_json::to_value(CommandEnvelope::new(tokens))?;
        redact_password(&mut envelope);
        print_dry_run("POST", "/execute", Some(&envelope), opts.json);
        return Ok(None);
    }

    let dispatcher = opts.connect(session)?;
    info!(url = %dispatcher.client().base(), "sending command");
    let reply = block_on(dispatcher.execute(tokens))?;
    finish_reply(opts, reply).map(Some)
}

/// Print a dispatch outcome; interpreter failures are printed then raised.
pub fn finish_reply(opts: &GlobalOpts, reply: Result<Value, DispatchError>) -> Result<Value> {
    match reply {
        Ok(value) => {
            emit(&value, opts.json);
            if is_error_reply(&value) {
                bail!("{}", reply_message(&value).unwrap_or("interpreter reported an error"));
            }
            Ok(value)
        }
        Err(DispatchError::Interpreter { status, body }) => {
            emit(&body, opts.json);
            let msg = reply_message(&body).unwrap_or("request rejected");
            bail!("interpreter returned HTTP {status}: {msg}")
        }
        Err(other) => Err(other.into()),
    }
}

pub fn is_error_reply(value: &Value) -> bool {
    value.get("status").and_then(Value::as_str) == Some("error")
}

pub fn reply_message(value: &Value) -> Option<&str> {
    value.get("message").and_then(Value::as_str)
}

/* ---- Output ---- */

/// Print a reply. A top-level `token` is masked; it only ever goes to the session file.
pub fn emit(value: &Value, json: bool) {
    let value = redact_token(value);
    if json {
        println!("{}", format::pretty(&value));
    } else {
        println!("{}", format::render_reply(&value, &StyleOptions::detect()));
    }
}

fn redact_token(value: &Value) -> Cow<'_, Value> {
    match value.get("token") {
        Some(Value::String(t)) if !t.is_empty() => {
            let mut masked = value.clone();
            masked["token"] = Value::String("***".into());
            Cow::Owned(masked)
        }
        _ => Cow::Borrowed(value),
    }
}

/// Mask the value following `-p` / `--password` in a command envelope.
fn redact_password(envelope: &mut Value) {
    let Some(Value::Array(tokens)) = envelope.get_mut("command") else {
        return;
    };
    let mut mask_next = false;
    for token in tokens.iter_mut() {
        if mask_next {
            *token = Value::String("***".into());
            mask_next = false;
        } else {
            mask_next = matches!(token.as_str(), Some("-p" | "--password"));
        }
    }
}

/// Local (no-network) status line, e.g. for `connect` or `logout`.
pub fn emit_status(json: bool, ok: bool, message: &str) {
    let status = if ok { "success" } else { "error" };
    emit(&json!({"status": status, "message": message}), json);
}

pub fn print_dry_run(method: &str, path: &str, body: Option<&Value>, json: bool) {
    if json {
        let v = json!({"dryRun": true, "method": method, "path": path, "body": body});
        println!("{}", format::pretty(&v));
        return;
    }
    let style = StyleOptions::detect();
    println!(
        "{}",
        format::box_header("dry run", Some(format!("{method} {path}").as_str()), Role::Title, &style)
    );
    if let Some(b) = body {
        println!("{}", format::pretty(b));
    }
}

/* ---- Params & files ---- */

/// Parse repeated `KEY=VALUE` params into a JSON object, coercing values.
pub fn parse_params(params: &[String]) -> Result<Map<String, Value>> {
    let mut out = Map::new();
    for kv in params {
        let (k, v) = kv
            .split_once('=')
            .ok_or_else(|| anyhow!("invalid --param (expected KEY=VALUE): {kv}"))?;
        let key = k.trim();
        if key.is_empty() {
            bail!("invalid --param (empty key): {kv}");
        }
        out.insert(key.to_string(), coerce_value(v.trim()));
    }
    Ok(out)
}

/// Best-effort typing of a raw CLI value: integer, float, boolean, null,
/// comma list, else string. `"007"` stays a string.
pub fn coerce_value(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::String(String::new());
    }
    let leading_zero = raw.len() > 1 && raw.starts_with('0') && !raw.starts_with("0.");
    if !leading_zero {
        if let Ok(n) = raw.parse::<i64>() {
            return Value::Number(n.into());
        }
        if let Some(n) = raw.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
            return Value::Number(n);
        }
    }
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" => return Value::Bool(true),
        "false" | "no" => return Value::Bool(false),
        "null" => return Value::Null,
        _ => {}
    }
    if raw.contains(',') {
        return Value::Array(raw.split(',').map(|s| coerce_value(s.trim())).collect());
    }
    Value::String(raw.to_string())
}

/// Read a JSON or YAML file (by extension; `.yaml` / `.yml` are YAML).
pub fn load_structured<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read file: {}", path.display()))?;
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
    if is_yaml {
        serde_yaml::from_str(&raw).with_context(|| format!("failed to parse YAML: {}", path.display()))
    } else {
        serde_json::from_str(&raw).with_context(|| format!("failed to parse JSON: {}", path.display()))
    }
}

/// Body-file object with `--param` entries merged over it.
pub fn build_body(body_file: Option<&Path>, params: &[String]) -> Result<Value> {
    let mut body = match body_file {
        Some(path) => match load_structured::<Value>(path)? {
            Value::Object(map) => map,
            _ => bail!("body file root must be an object: {}", path.display()),
        },
        None => Map::new(),
    };
    body.extend(parse_params(params)?);
    Ok(Value::Object(body))
}
