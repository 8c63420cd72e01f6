/*!
format.rs - human output for `cgql`.

Interpreter replies share one loose shape:

  { "status": "success" | "error", "message"?: str, "count"?: n,
    "data"?: [ {...}, ... ], "meta"?: {...} }

`render_reply` turns that into a boxed status header followed by a table
of the `data` rows (columns = union of row keys, first-seen order).
Anything else falls back to pretty JSON. JSON output paths never go
through here.

Style:
  - ANSI color on a terminal unless NO_COLOR is set
  - width from COLUMNS (clamped 40..=220), else 100
*/

use std::borrow::Cow;
use std::io::IsTerminal;

use serde_json::{Map, Value};

/* ---- Style ---- */

#[derive(Debug, Clone)]
pub struct StyleOptions {
    pub use_color: bool,
    pub term_width: usize,
}

impl StyleOptions {
    pub fn detect() -> Self {
        let width = std::env::var("COLUMNS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .map(|w| w.clamp(40, 220))
            .unwrap_or(100);
        if std::env::var_os("NO_COLOR").is_some() || !std::io::stdout().is_terminal() {
            return Self::plain(width);
        }
        Self {
            use_color: true,
            term_width: width,
        }
    }

    pub fn plain(term_width: usize) -> Self {
        Self {
            use_color: false,
            term_width,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Role {
    Title,
    Muted,
    Header,
    Success,
    Error,
}

pub fn color(role: Role, text: impl AsRef<str>, style: &StyleOptions) -> String {
    if !style.use_color {
        return text.as_ref().to_string();
    }
    let code = match role {
        Role::Title => "1;38;5;45",
        Role::Muted => "2",
        Role::Header => "38;5;213",
        Role::Success => "38;5;82",
        Role::Error => "38;5;196",
    };
    format!("\x1b[{code}m{}\x1b[0m", text.as_ref())
}

/* ---- Box header ---- */

/// Single-line boxed header. Over-long content is truncated, never wrapped.
pub fn box_header(
    title: &str,
    subtitle: Option<&str>,
    role: Role,
    style: &StyleOptions,
) -> String {
    let max_inner = style.term_width.saturating_sub(4).max(10);
    let raw = match subtitle {
        Some(s) if !s.is_empty() => format!("{title}  {s}"),
        _ => title.to_string(),
    };
    let raw = truncate_ellipsis(&raw, max_inner);
    let width = display_width(&raw);

    // Color only the title part so width math stays on the raw text.
    let styled = match raw.strip_prefix(title) {
        Some(rest) => format!(
            "{}{}",
            color(role, title, style),
            color(Role::Muted, rest, style)
        ),
        None => color(role, &raw, style),
    };

    let bar = "─".repeat(width + 2);
    format!("┌{bar}┐\n│ {styled} │\n└{bar}┘")
}

/* ---- Table ---- */

pub fn table(headers: &[String], rows: &[Vec<String>], style: &StyleOptions) -> String {
    if headers.is_empty() {
        return String::new();
    }
    let cols = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(cols) {
            widths[i] = widths[i].max(display_width(cell));
        }
    }

    // Shrink the widest columns until the row fits.
    let gaps = (cols - 1) * 2;
    let mut total: usize = widths.iter().sum::<usize>() + gaps;
    while total > style.term_width {
        let Some((idx, &w)) = widths.iter().enumerate().max_by_key(|(_, w)| **w) else {
            break;
        };
        if w <= 4 {
            break;
        }
        let cut = (w - 4).min(total - style.term_width);
        widths[idx] -= cut;
        total -= cut;
    }

    let mut out = Vec::with_capacity(rows.len() + 2);
    let head = render_line(headers.iter().map(String::as_str), &widths);
    out.push(color(Role::Header, head, style));
    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push(color(Role::Muted, sep.join("  "), style));
    for row in rows {
        let cells = (0..cols).map(|i| row.get(i).map(String::as_str).unwrap_or(""));
        out.push(render_line(cells, &widths).trim_end().to_string());
    }
    out.join("\n")
}

fn render_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(c, w)| pad(&truncate_ellipsis(c, *w), *w))
        .collect::<Vec<_>>()
        .join("  ")
}

/* ---- Reply rendering ---- */

/// Column names and string cells for an array of objects.
pub fn rows_of(data: &[Value]) -> Option<(Vec<String>, Vec<Vec<String>>)> {
    let objects: Vec<&Map<String, Value>> = data.iter().map(Value::as_object).collect::<Option<_>>()?;
    if objects.is_empty() {
        return None;
    }
    let mut headers: Vec<String> = Vec::new();
    for obj in &objects {
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }
    let rows = objects
        .iter()
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(cell).unwrap_or_default())
                .collect()
        })
        .collect();
    Some((headers, rows))
}

fn cell(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn render_reply(reply: &Value, style: &StyleOptions) -> String {
    let Some(obj) = reply.as_object() else {
        return pretty(reply);
    };
    let status = obj.get("status").and_then(Value::as_str);
    let message = obj.get("message").and_then(Value::as_str);
    let count = obj.get("count").and_then(Value::as_u64);

    let (title, role) = match status {
        Some("success") => ("✔ success", Role::Success),
        Some("error") => ("✖ error", Role::Error),
        Some(other) => (other, Role::Title),
        None => return pretty(reply),
    };
    let mut subtitle: Vec<String> = Vec::new();
    if let Some(m) = message {
        subtitle.push(m.to_string());
    }
    if let Some(n) = count {
        subtitle.push(format!("{n} row(s)"));
    }
    let subtitle = subtitle.join(" • ");
    let header = box_header(title, Some(subtitle.as_str()), role, style);

    let body = match obj.get("data") {
        Some(Value::Array(data)) => match rows_of(data) {
            Some((headers, rows)) => table(&headers, &rows, style),
            None if data.is_empty() => String::new(),
            None => pretty(&Value::Array(data.clone())),
        },
        Some(other) => pretty(other),
        None => String::new(),
    };

    if body.is_empty() {
        header
    } else {
        format!("{header}\n{body}")
    }
}

pub fn pretty(v: &Value) -> String {
    serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
}

/* ---- Text helpers ---- */

pub fn truncate_ellipsis(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars <= 1 {
        return "…".chars().take(max_chars).collect();
    }
    let mut out: String = s.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

fn pad(s: &str, width: usize) -> String {
    let len = display_width(s);
    if len >= width {
        s.to_string()
    } else {
        format!("{s}{}", " ".repeat(width - len))
    }
}

fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !s.contains('\x1b') {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for t in chars.by_ref() {
                if t.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        out.push(c);
    }
    Cow::Owned(out)
}

fn display_width(s: &str) -> usize {
    strip_ansi(s).chars().count()
}
