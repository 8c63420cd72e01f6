//! Token sequence -> intent.
//!
//! The inverse of [`encode`](super::encode::encode) over the same grammar
//! table. Canonical flags and the interpreter's long-form aliases are both
//! accepted. Required fields that are missing decode to `None`; re-encoding
//! the result is what reports them.
//!
//! A single-value flag takes the next token verbatim, even one spelled like a
//! flag. A list flag runs until the next token that names a flag of the same
//! command, so list elements spelled like a flag do not survive a round trip.

use super::error::DecodeError;
use super::fields::{Fields, Raw, Slots};
use super::intent::{
    CycleQuery, EdgeDelete, EdgeInsert, EdgeQuery, Intent, VertexDelete, VertexInsert, VertexQuery,
};
use super::vocab::{self, Arity, Grammar, IntentKind};

/// Reconstruct the intent a token sequence describes.
pub fn decode<S: AsRef<str>>(tokens: &[S]) -> Result<Intent, DecodeError> {
    let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
    let (grammar, rest) = resolve(&tokens)?;
    let mut slots = parse_flags(grammar, rest)?;
    build(grammar.kind, &mut slots)
}

/// Split a shell-style command line and decode it.
pub fn decode_line(line: &str) -> Result<Intent, DecodeError> {
    let tokens =
        shell_words::split(line).map_err(|e| DecodeError::Malformed(e.to_string()))?;
    decode(tokens.as_slice())
}

fn resolve<'t>(tokens: &'t [&'t str]) -> Result<(&'static Grammar, &'t [&'t str]), DecodeError> {
    let first = tokens.first().ok_or(DecodeError::Empty)?;
    let head = vocab::canonical_verb(first);
    let second = tokens.get(1).copied().map(vocab::canonical_verb);

    for grammar in vocab::GRAMMARS {
        match grammar.verbs {
            [verb] if *verb == head => return Ok((grammar, &tokens[1..])),
            [verb, object] if *verb == head && second == Some(*object) => {
                return Ok((grammar, &tokens[2..]));
            }
            _ => {}
        }
    }

    let shown: Vec<&str> = tokens.iter().take(2).copied().collect();
    Err(DecodeError::UnknownCommand(shown.join(" ")))
}

fn parse_flags(grammar: &'static Grammar, rest: &[&str]) -> Result<Slots, DecodeError> {
    let mut slots = Slots::default();
    let mut i = 0;
    while i < rest.len() {
        let token = rest[i];
        let spec = grammar.flag(token).ok_or_else(|| DecodeError::UnknownFlag {
            command: grammar.name(),
            flag: token.to_string(),
        })?;
        i += 1;

        let raw = match spec.arity {
            Arity::Switch => Raw::Switch,
            Arity::One => {
                let value = rest.get(i).ok_or(DecodeError::MissingValue(spec.flag))?;
                i += 1;
                Raw::One(value.to_string())
            }
            Arity::Many => {
                let start = i;
                while i < rest.len() && grammar.flag(rest[i]).is_none() {
                    i += 1;
                }
                if i == start {
                    return Err(DecodeError::MissingValue(spec.flag));
                }
                Raw::Many(rest[start..i].iter().map(|v| v.to_string()).collect())
            }
        };
        slots.insert(spec, raw)?;
    }
    Ok(slots)
}

fn build(kind: IntentKind, slots: &mut Slots) -> Result<Intent, DecodeError> {
    Ok(match kind {
        IntentKind::VertexQuery => Intent::VertexQuery(VertexQuery::from_slots(slots)?),
        IntentKind::EdgeQuery => Intent::EdgeQuery(EdgeQuery::from_slots(slots)?),
        IntentKind::CycleQuery => Intent::CycleQuery(CycleQuery::from_slots(slots)?),
        IntentKind::VertexInsert => Intent::VertexInsert(VertexInsert::from_slots(slots)?),
        IntentKind::EdgeInsert => Intent::EdgeInsert(EdgeInsert::from_slots(slots)?),
        IntentKind::VertexDelete => Intent::VertexDelete(VertexDelete::from_slots(slots)?),
        IntentKind::EdgeDelete => Intent::EdgeDelete(EdgeDelete::from_slots(slots)?),
        IntentKind::Register => Intent::Register(Fields::from_slots(slots)?),
        IntentKind::Login => Intent::Login(Fields::from_slots(slots)?),
        IntentKind::Logout => Intent::Logout,
        IntentKind::Whoami => Intent::Whoami,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::intent::Credentials;
    use proptest::prelude::*;

    #[test]
    fn decode_cycle_with_switches() {
        let intent = decode(&[
            "query",
            "cycle",
            "--start",
            "A",
            "--depth",
            "2",
            "--dir",
            "out",
            "--allow-dup-v",
        ])
        .unwrap();
        assert_eq!(
            intent,
            Intent::CycleQuery(CycleQuery {
                direction: Some("out".into()),
                allow_dup_v: true,
                ..CycleQuery::new("A", 2)
            })
        );
    }

    #[test]
    fn decode_accepts_aliases() {
        let intent = decode_line("q v --v-type a b --min-balance 0").unwrap();
        assert_eq!(
            intent,
            Intent::VertexQuery(VertexQuery {
                v_type: Some(vec!["a".into(), "b".into()]),
                min_balance: Some(0),
                ..VertexQuery::default()
            })
        );

        let intent = decode_line("login --username alice --password pw").unwrap();
        assert_eq!(intent, Intent::Login(Credentials::new("alice", "pw")));
    }

    #[test]
    fn multi_value_stops_at_next_flag() {
        let intent = decode_line("query edge --et + - --min-amt -3").unwrap();
        let Intent::EdgeQuery(q) = intent else {
            panic!("expected edge query");
        };
        assert_eq!(q.e_type, Some(vec!["+".to_string(), "-".to_string()]));
        assert_eq!(q.min_amount, Some(-3));
    }

    #[test]
    fn missing_required_survives_decode() {
        let intent = decode(&["query", "cycle", "--start", "A"]).unwrap();
        assert_eq!(
            intent.encode(),
            Err(crate::protocol::EncodeError::MissingRequiredField("depth"))
        );
    }

    #[test]
    fn errors() {
        let none: [&str; 0] = [];
        assert_eq!(decode(&none), Err(DecodeError::Empty));
        assert!(matches!(
            decode(&["query", "path"]),
            Err(DecodeError::UnknownCommand(_))
        ));
        assert!(matches!(
            decode(&["query", "vertex", "--eid", "1"]),
            Err(DecodeError::UnknownFlag { .. })
        ));
        assert_eq!(
            decode(&["query", "vertex", "--vid"]),
            Err(DecodeError::MissingValue("--vid"))
        );
        assert_eq!(
            decode(&["query", "vertex", "--vt", "--vid", "1"]),
            Err(DecodeError::MissingValue("--vt"))
        );
        assert_eq!(
            decode(&["delete", "edge", "--eid", "1", "--eid", "2"]),
            Err(DecodeError::DuplicateFlag("--eid"))
        );
        assert!(matches!(
            decode(&["query", "cycle", "--start", "A", "--depth", "deep"]),
            Err(DecodeError::InvalidValue { flag: "--depth", .. })
        ));
    }

    #[test]
    fn single_value_taken_verbatim() {
        let intent = Intent::VertexQuery(VertexQuery {
            vid: Some("--vt".into()),
            ..VertexQuery::default()
        });
        let tokens = intent.encode().unwrap();
        assert_eq!(tokens.as_slice(), ["query", "vertex", "--vid", "--vt"]);
        assert_eq!(decode(tokens.as_slice()), Ok(intent));

        let intent = decode(&["query", "cycle", "--start", "--depth", "--depth", "2"]).unwrap();
        assert_eq!(intent, Intent::CycleQuery(CycleQuery::new("--depth", 2)));
    }

    #[test]
    fn list_stops_at_flag_spelled_element() {
        assert_eq!(
            decode(&["query", "cycle", "--vt", "acct", "--limit"]),
            Err(DecodeError::MissingValue("--limit"))
        );
    }

    #[test]
    fn flagless_commands() {
        assert_eq!(decode(&["logout"]), Ok(Intent::Logout));
        assert_eq!(decode(&["whoami"]), Ok(Intent::Whoami));
        assert!(matches!(
            decode(&["whoami", "--vid", "1"]),
            Err(DecodeError::UnknownFlag { .. })
        ));
    }

    fn word() -> impl Strategy<Value = String> {
        prop_oneof![
            "-{0,2}[a-z0-9_-]{0,8}",
            proptest::sample::select(vec!["--vid", "--vt", "--min-bal", "-", "+"])
                .prop_map(String::from),
        ]
    }

    fn list_word() -> impl Strategy<Value = String> {
        word().prop_filter("list elements spelled like a flag are ambiguous", |w| {
            vocab::grammar(IntentKind::VertexQuery).flag(w).is_none()
        })
    }

    prop_compose! {
        fn vertex_query()(
            vid in proptest::option::of(word()),
            v_type in proptest::option::of(proptest::collection::vec(list_word(), 1..4)),
            min_time in proptest::option::of(any::<i64>()),
            max_time in proptest::option::of(any::<i64>()),
            min_balance in proptest::option::of(any::<i64>()),
            max_balance in proptest::option::of(any::<i64>()),
        ) -> VertexQuery {
            VertexQuery { vid, v_type, min_time, max_time, min_balance, max_balance }
        }
    }

    proptest! {
        #[test]
        fn vertex_query_round_trip(q in vertex_query()) {
            let intent = Intent::VertexQuery(q);
            let tokens = intent.encode().unwrap();
            prop_assert_eq!(decode(tokens.as_slice()).unwrap(), intent);
        }
    }
}
