/*!
intent.rs - typed intents accepted by the command interpreter.

Every optional field is an `Option`: presence alone decides whether a flag
is emitted, so `0` balances and amounts travel like any other value.
Fields the interpreter requires are `Option` too; absence is reported by
the encoder as `MissingRequiredField` instead of being unrepresentable,
which lets intents be loaded from partial JSON / YAML documents.

Serialized shape (camelCase members, snake_case `intent` tag):

  { "intent": "cycle_query", "start": "A", "depth": 3, "allowDupV": true }
*/

use serde::{Deserialize, Serialize};

use super::fields::impl_fields;
use super::vocab::IntentKind;

/// Filter over vertices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VertexQuery {
    pub vid: Option<String>,
    pub v_type: Option<Vec<String>>,
    pub min_time: Option<i64>,
    pub max_time: Option<i64>,
    pub min_balance: Option<i64>,
    pub max_balance: Option<i64>,
}

/// Filter over edges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EdgeQuery {
    pub eid: Option<String>,
    pub src: Option<String>,
    pub dst: Option<String>,
    pub e_type: Option<Vec<String>>,
    pub min_amount: Option<i64>,
    pub max_amount: Option<i64>,
    pub min_time: Option<i64>,
    pub max_time: Option<i64>,
}

/// Cycle search rooted at `start`, bounded by `depth`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CycleQuery {
    pub start: Option<String>,
    pub depth: Option<u32>,
    pub direction: Option<String>,
    pub v_type: Option<Vec<String>>,
    pub min_balance: Option<i64>,
    pub e_type: Option<Vec<String>>,
    pub min_amount: Option<i64>,
    pub max_amount: Option<i64>,
    pub limit: Option<u32>,
    pub allow_dup_v: bool,
    pub allow_dup_e: bool,
}

impl CycleQuery {
    pub fn new(start: impl Into<String>, depth: u32) -> Self {
        Self {
            start: Some(start.into()),
            depth: Some(depth),
            ..Self::default()
        }
    }
}

/// New vertex (or an upsert when `vid` names an existing one).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VertexInsert {
    pub v_type: Option<String>,
    pub vid: Option<String>,
    pub time: Option<i64>,
    pub balance: Option<i64>,
}

impl VertexInsert {
    pub fn new(v_type: impl Into<String>) -> Self {
        Self {
            v_type: Some(v_type.into()),
            ..Self::default()
        }
    }
}

/// New edge between `src` and `dst`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EdgeInsert {
    pub src: Option<String>,
    pub dst: Option<String>,
    pub eid: Option<String>,
    pub amount: Option<i64>,
    pub time: Option<i64>,
    pub e_type: Option<String>,
    /// Create missing endpoint vertices.
    pub create_v: bool,
}

impl EdgeInsert {
    pub fn new(src: impl Into<String>, dst: impl Into<String>) -> Self {
        Self {
            src: Some(src.into()),
            dst: Some(dst.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VertexDelete {
    pub vid: Option<String>,
}

impl VertexDelete {
    pub fn new(vid: impl Into<String>) -> Self {
        Self {
            vid: Some(vid.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeDelete {
    pub eid: Option<String>,
}

impl EdgeDelete {
    pub fn new(eid: impl Into<String>) -> Self {
        Self {
            eid: Some(eid.into()),
        }
    }
}

/// Username / password pair for `register` and `login`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    #[serde(alias = "username")]
    pub user: Option<String>,
    #[serde(alias = "password")]
    pub pass: Option<String>,
}

impl Credentials {
    pub fn new(user: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            pass: Some(pass.into()),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("pass", &self.pass.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl_fields!(VertexQuery {
    vid => "vid",
    v_type => "vType",
    min_time => "minTime",
    max_time => "maxTime",
    min_balance => "minBalance",
    max_balance => "maxBalance",
});

impl_fields!(EdgeQuery {
    eid => "eid",
    src => "src",
    dst => "dst",
    e_type => "eType",
    min_amount => "minAmount",
    max_amount => "maxAmount",
    min_time => "minTime",
    max_time => "maxTime",
});

impl_fields!(CycleQuery {
    start => "start",
    depth => "depth",
    direction => "direction",
    v_type => "vType",
    min_balance => "minBalance",
    e_type => "eType",
    min_amount => "minAmount",
    max_amount => "maxAmount",
    limit => "limit",
    allow_dup_v => "allowDupV",
    allow_dup_e => "allowDupE",
});

impl_fields!(VertexInsert {
    v_type => "vType",
    vid => "vid",
    time => "time",
    balance => "balance",
});

impl_fields!(EdgeInsert {
    src => "src",
    dst => "dst",
    eid => "eid",
    amount => "amount",
    time => "time",
    e_type => "eType",
    create_v => "createV",
});

impl_fields!(VertexDelete { vid => "vid" });
impl_fields!(EdgeDelete { eid => "eid" });
impl_fields!(Credentials { user => "user", pass => "pass" });

/// One query or mutation the caller wants performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    VertexQuery(VertexQuery),
    EdgeQuery(EdgeQuery),
    CycleQuery(CycleQuery),
    VertexInsert(VertexInsert),
    EdgeInsert(EdgeInsert),
    VertexDelete(VertexDelete),
    EdgeDelete(EdgeDelete),
    Register(Credentials),
    Login(Credentials),
    Logout,
    Whoami,
}

impl Intent {
    pub fn kind(&self) -> IntentKind {
        match self {
            Intent::VertexQuery(_) => IntentKind::VertexQuery,
            Intent::EdgeQuery(_) => IntentKind::EdgeQuery,
            Intent::CycleQuery(_) => IntentKind::CycleQuery,
            Intent::VertexInsert(_) => IntentKind::VertexInsert,
            Intent::EdgeInsert(_) => IntentKind::EdgeInsert,
            Intent::VertexDelete(_) => IntentKind::VertexDelete,
            Intent::EdgeDelete(_) => IntentKind::EdgeDelete,
            Intent::Register(_) => IntentKind::Register,
            Intent::Login(_) => IntentKind::Login,
            Intent::Logout => IntentKind::Logout,
            Intent::Whoami => IntentKind::Whoami,
        }
    }

    /// Whether the interpreter executes this intent without a session.
    pub fn is_public(&self) -> bool {
        matches!(self, Intent::Register(_) | Intent::Login(_))
    }
}

macro_rules! intent_from {
    ($($ty:ident),*) => {$(
        impl From<$ty> for Intent {
            fn from(value: $ty) -> Self {
                Intent::$ty(value)
            }
        }
    )*};
}

intent_from!(
    VertexQuery,
    EdgeQuery,
    CycleQuery,
    VertexInsert,
    EdgeInsert,
    VertexDelete,
    EdgeDelete
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_camel_case_intent() {
        let raw = r#"{"intent":"cycle_query","start":"A","depth":3,"vType":["acct"],"allowDupV":true}"#;
        let intent: Intent = serde_json::from_str(raw).unwrap();
        let Intent::CycleQuery(q) = intent else {
            panic!("expected cycle query");
        };
        assert_eq!(q.start.as_deref(), Some("A"));
        assert_eq!(q.depth, Some(3));
        assert_eq!(q.v_type, Some(vec!["acct".to_string()]));
        assert!(q.allow_dup_v);
        assert!(!q.allow_dup_e);
    }

    #[test]
    fn deserialize_unit_and_credentials() {
        let intent: Intent = serde_json::from_str(r#"{"intent":"whoami"}"#).unwrap();
        assert_eq!(intent, Intent::Whoami);

        let intent: Intent =
            serde_yaml::from_str("intent: login\nusername: alice\npassword: pw\n").unwrap();
        assert_eq!(intent, Intent::Login(Credentials::new("alice", "pw")));
    }

    #[test]
    fn credentials_debug_hides_password() {
        let dbg = format!("{:?}", Credentials::new("alice", "hunter2"));
        assert!(dbg.contains("alice"));
        assert!(!dbg.contains("hunter2"));
    }

    #[test]
    fn public_intents() {
        assert!(Intent::Register(Credentials::new("a", "b")).is_public());
        assert!(!Intent::Logout.is_public());
        assert!(!Intent::from(VertexQuery::default()).is_public());
    }
}
