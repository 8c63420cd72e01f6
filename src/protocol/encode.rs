//! Intent -> token sequence.
//!
//! Pure and deterministic: the grammar table fixes the flag order, so equal
//! intents always produce identical token sequences.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::EncodeError;
use super::fields::{Fields, Slot};
use super::intent::Intent;
use super::vocab::{self, Grammar};

/// Ordered command tokens, verbs first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandTokens(Vec<String>);

impl CommandTokens {
    fn with_verbs(verbs: &[&str]) -> Self {
        Self(verbs.iter().map(|v| v.to_string()).collect())
    }

    fn push(&mut self, token: impl Into<String>) {
        self.0.push(token.into());
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Leading verb (`query`, `login`, ...).
    pub fn head(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for CommandTokens {
    fn from(tokens: Vec<String>) -> Self {
        Self(tokens)
    }
}

impl AsRef<[String]> for CommandTokens {
    fn as_ref(&self) -> &[String] {
        &self.0
    }
}

impl<const N: usize> PartialEq<[&str; N]> for CommandTokens {
    fn eq(&self, other: &[&str; N]) -> bool {
        self.0.len() == N && self.0.iter().zip(other).all(|(a, b)| a == b)
    }
}

/// Shell-quoted rendering, e.g. `query vertex --vt 'a b'`.
impl fmt::Display for CommandTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&shell_words::join(&self.0))
    }
}

impl TryFrom<&Intent> for CommandTokens {
    type Error = EncodeError;

    fn try_from(intent: &Intent) -> Result<Self, Self::Error> {
        encode(intent)
    }
}

impl Intent {
    /// Render this intent into its token sequence.
    pub fn encode(&self) -> Result<CommandTokens, EncodeError> {
        encode(self)
    }
}

/// Render an intent into its token sequence.
pub fn encode(intent: &Intent) -> Result<CommandTokens, EncodeError> {
    let grammar = vocab::grammar(intent.kind());
    match intent {
        Intent::VertexQuery(q) => render(grammar, q),
        Intent::EdgeQuery(q) => render(grammar, q),
        Intent::CycleQuery(q) => render(grammar, q),
        Intent::VertexInsert(m) => render(grammar, m),
        Intent::EdgeInsert(m) => render(grammar, m),
        Intent::VertexDelete(m) => render(grammar, m),
        Intent::EdgeDelete(m) => render(grammar, m),
        Intent::Register(c) | Intent::Login(c) => render(grammar, c),
        Intent::Logout | Intent::Whoami => render(grammar, &()),
    }
}

fn render<F: Fields>(grammar: &Grammar, fields: &F) -> Result<CommandTokens, EncodeError> {
    let mut tokens = CommandTokens::with_verbs(grammar.verbs);
    for spec in grammar.flags {
        match fields.slot(spec.field) {
            Slot::One(value) => {
                if spec.required && value.trim().is_empty() {
                    return Err(EncodeError::MissingRequiredField(spec.field));
                }
                tokens.push(spec.flag);
                tokens.push(value.into_owned());
            }
            Slot::Many(values) => {
                tokens.push(spec.flag);
                for v in values {
                    tokens.push(v.as_str());
                }
            }
            Slot::Switch(true) => tokens.push(spec.flag),
            Slot::Absent | Slot::Switch(false) => {
                if spec.required {
                    return Err(EncodeError::MissingRequiredField(spec.field));
                }
            }
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::intent::*;

    fn tokens(intent: impl Into<Intent>) -> CommandTokens {
        intent.into().encode().unwrap()
    }

    #[test]
    fn cycle_minimal() {
        assert_eq!(
            tokens(CycleQuery::new("A", 3)),
            ["query", "cycle", "--start", "A", "--depth", "3"]
        );
    }

    #[test]
    fn cycle_direction_and_switch() {
        let q = CycleQuery {
            direction: Some("out".into()),
            allow_dup_v: true,
            ..CycleQuery::new("A", 2)
        };
        assert_eq!(
            tokens(q),
            [
                "query",
                "cycle",
                "--start",
                "A",
                "--depth",
                "2",
                "--dir",
                "out",
                "--allow-dup-v"
            ]
        );
    }

    #[test]
    fn cycle_full_order() {
        let q = CycleQuery {
            direction: Some("any".into()),
            v_type: Some(vec!["acct".into(), "card".into()]),
            min_balance: Some(0),
            e_type: Some(vec!["+".into()]),
            min_amount: Some(5),
            max_amount: Some(500),
            limit: Some(10),
            allow_dup_v: true,
            allow_dup_e: true,
            ..CycleQuery::new("7", 4)
        };
        assert_eq!(
            tokens(q),
            [
                "query",
                "cycle",
                "--start",
                "7",
                "--depth",
                "4",
                "--dir",
                "any",
                "--vt",
                "acct",
                "card",
                "--min-bal",
                "0",
                "--et",
                "+",
                "--min-amt",
                "5",
                "--max-amt",
                "500",
                "--limit",
                "10",
                "--allow-dup-v",
                "--allow-dup-e"
            ]
        );
    }

    #[test]
    fn cycle_missing_depth() {
        let q = CycleQuery {
            start: Some("A".into()),
            ..CycleQuery::default()
        };
        assert_eq!(
            Intent::from(q).encode(),
            Err(EncodeError::MissingRequiredField("depth"))
        );
    }

    #[test]
    fn cycle_missing_start_reported_first() {
        assert_eq!(
            Intent::from(CycleQuery::default()).encode(),
            Err(EncodeError::MissingRequiredField("start"))
        );
    }

    #[test]
    fn empty_queries_yield_bare_prefix() {
        assert_eq!(tokens(VertexQuery::default()), ["query", "vertex"]);
        assert_eq!(tokens(EdgeQuery::default()), ["query", "edge"]);
    }

    #[test]
    fn vertex_query_order_and_zero_values() {
        let q = VertexQuery {
            vid: Some("v1".into()),
            v_type: Some(vec!["a".into(), "b".into()]),
            min_time: Some(0),
            max_time: Some(100),
            min_balance: Some(0),
            max_balance: Some(-5),
        };
        assert_eq!(
            tokens(q),
            [
                "query",
                "vertex",
                "--vid",
                "v1",
                "--vt",
                "a",
                "b",
                "--min-time",
                "0",
                "--max-time",
                "100",
                "--min-bal",
                "0",
                "--max-bal",
                "-5"
            ]
        );
    }

    #[test]
    fn empty_type_list_is_absent() {
        let q = VertexQuery {
            v_type: Some(vec![]),
            ..VertexQuery::default()
        };
        assert_eq!(tokens(q), ["query", "vertex"]);
    }

    #[test]
    fn edge_query_order() {
        let q = EdgeQuery {
            eid: Some("e1".into()),
            src: Some("a".into()),
            dst: Some("b".into()),
            e_type: Some(vec!["+".into(), "-".into()]),
            min_amount: Some(1),
            max_amount: Some(2),
            min_time: Some(3),
            max_time: Some(4),
        };
        assert_eq!(
            tokens(q),
            [
                "query",
                "edge",
                "--eid",
                "e1",
                "--src",
                "a",
                "--dst",
                "b",
                "--et",
                "+",
                "-",
                "--min-amt",
                "1",
                "--max-amt",
                "2",
                "--min-time",
                "3",
                "--max-time",
                "4"
            ]
        );
    }

    #[test]
    fn insert_vertex_with_zero_balance() {
        let m = VertexInsert {
            vid: Some("v1".into()),
            balance: Some(0),
            ..VertexInsert::new("account")
        };
        assert_eq!(
            tokens(m),
            ["insert", "vertex", "--vt", "account", "--vid", "v1", "--bal", "0"]
        );
    }

    #[test]
    fn insert_vertex_requires_type() {
        assert_eq!(
            Intent::from(VertexInsert::default()).encode(),
            Err(EncodeError::MissingRequiredField("vType"))
        );
        assert_eq!(
            Intent::from(VertexInsert::new("  ")).encode(),
            Err(EncodeError::MissingRequiredField("vType"))
        );
    }

    #[test]
    fn insert_edge_minimal_and_full() {
        assert_eq!(
            tokens(EdgeInsert::new("a", "b")),
            ["insert", "edge", "--src", "a", "--dst", "b"]
        );

        let m = EdgeInsert {
            eid: Some("e9".into()),
            amount: Some(0),
            time: Some(1700000000),
            e_type: Some("+".into()),
            create_v: true,
            ..EdgeInsert::new("a", "b")
        };
        assert_eq!(
            tokens(m),
            [
                "insert",
                "edge",
                "--src",
                "a",
                "--dst",
                "b",
                "--eid",
                "e9",
                "--amt",
                "0",
                "--time",
                "1700000000",
                "--et",
                "+",
                "--create-v"
            ]
        );
    }

    #[test]
    fn insert_edge_requires_endpoints() {
        let m = EdgeInsert {
            src: Some("a".into()),
            ..EdgeInsert::default()
        };
        assert_eq!(
            Intent::from(m).encode(),
            Err(EncodeError::MissingRequiredField("dst"))
        );
    }

    #[test]
    fn deletes() {
        assert_eq!(
            tokens(VertexDelete::new("5")),
            ["delete", "vertex", "--vid", "5"]
        );
        assert_eq!(tokens(EdgeDelete::new("9")), ["delete", "edge", "--eid", "9"]);
        assert_eq!(
            Intent::from(EdgeDelete::default()).encode(),
            Err(EncodeError::MissingRequiredField("eid"))
        );
    }

    #[test]
    fn auth_actions() {
        assert_eq!(
            Intent::Register(Credentials::new("alice", "pw"))
                .encode()
                .unwrap(),
            ["register", "-u", "alice", "-p", "pw"]
        );
        assert_eq!(
            Intent::Login(Credentials::new("alice", "pw"))
                .encode()
                .unwrap(),
            ["login", "-u", "alice", "-p", "pw"]
        );
        assert_eq!(Intent::Logout.encode().unwrap(), ["logout"]);
        assert_eq!(Intent::Whoami.encode().unwrap(), ["whoami"]);
    }

    #[test]
    fn encoding_is_deterministic() {
        let q = Intent::from(CycleQuery {
            v_type: Some(vec!["x".into(), "y".into()]),
            limit: Some(3),
            ..CycleQuery::new("s", 5)
        });
        assert_eq!(q.encode(), q.clone().encode());
    }

    #[test]
    fn display_is_shell_quoted() {
        let t = tokens(VertexQuery {
            v_type: Some(vec!["savings account".into()]),
            ..VertexQuery::default()
        });
        assert_eq!(t.to_string(), "query vertex --vt 'savings account'");
    }
}
