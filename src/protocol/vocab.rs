/*!
vocab.rs - the command vocabulary of the CycleGraph interpreter.

Every intent kind owns one [`Grammar`]: its verb tokens plus the ordered
flag table. The table order IS the emission order of the encoder, and the
decoder resolves flags (canonical spelling or any long-form alias the
interpreter also accepts) against the same table.

Layout:
  verbs    query | insert | delete  x  vertex | edge | cycle
           register | login | logout | whoami
  flags    --flag VALUE            (Arity::One)
           --flag V1 V2 .. Vn      (Arity::Many)
           --flag                  (Arity::Switch)
*/

/// Verb tokens.
pub mod verb {
    pub const QUERY: &str = "query";
    pub const INSERT: &str = "insert";
    pub const DELETE: &str = "delete";
    pub const VERTEX: &str = "vertex";
    pub const EDGE: &str = "edge";
    pub const CYCLE: &str = "cycle";
    pub const REGISTER: &str = "register";
    pub const LOGIN: &str = "login";
    pub const LOGOUT: &str = "logout";
    pub const WHOAMI: &str = "whoami";
}

/// Commands the interpreter accepts without a session token.
pub const PUBLIC_VERBS: &[&str] = &[verb::REGISTER, verb::LOGIN];

/// Map short verb aliases (`q v`, `i e`, `d v`, ...) onto their canonical token.
pub fn canonical_verb(token: &str) -> &str {
    match token {
        "q" => verb::QUERY,
        "i" => verb::INSERT,
        "d" => verb::DELETE,
        "v" => verb::VERTEX,
        "e" => verb::EDGE,
        "c" => verb::CYCLE,
        other => other,
    }
}

/// Every intent the protocol can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentKind {
    VertexQuery,
    EdgeQuery,
    CycleQuery,
    VertexInsert,
    EdgeInsert,
    VertexDelete,
    EdgeDelete,
    Register,
    Login,
    Logout,
    Whoami,
}

/// How many value tokens follow a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly one value.
    One,
    /// One flag keyword followed by every value positionally.
    Many,
    /// Bare flag, present only when set.
    Switch,
}

/// One row of a grammar's flag table.
#[derive(Debug, Clone, Copy)]
pub struct FlagSpec {
    /// Intent field name, as reported by `MissingRequiredField`.
    pub field: &'static str,
    /// Canonical spelling emitted by the encoder.
    pub flag: &'static str,
    /// Long-form spellings accepted when decoding.
    pub aliases: &'static [&'static str],
    pub arity: Arity,
    pub required: bool,
}

impl FlagSpec {
    const fn new(field: &'static str, flag: &'static str, arity: Arity) -> Self {
        Self {
            field,
            flag,
            aliases: &[],
            arity,
            required: false,
        }
    }

    const fn alias(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Whether `token` spells this flag (canonically or via alias).
    pub fn matches(&self, token: &str) -> bool {
        self.flag == token || self.aliases.contains(&token)
    }
}

const fn one(field: &'static str, flag: &'static str) -> FlagSpec {
    FlagSpec::new(field, flag, Arity::One)
}

const fn many(field: &'static str, flag: &'static str) -> FlagSpec {
    FlagSpec::new(field, flag, Arity::Many)
}

const fn switch(field: &'static str, flag: &'static str) -> FlagSpec {
    FlagSpec::new(field, flag, Arity::Switch)
}

/// Verb tokens plus ordered flag table for one intent kind.
#[derive(Debug)]
pub struct Grammar {
    pub kind: IntentKind,
    pub verbs: &'static [&'static str],
    pub flags: &'static [FlagSpec],
}

impl Grammar {
    /// Resolve a token to one of this grammar's flags.
    pub fn flag(&self, token: &str) -> Option<&'static FlagSpec> {
        self.flags.iter().find(|f| f.matches(token))
    }

    /// Look up a flag row by intent field name.
    pub fn field(&self, field: &str) -> Option<&'static FlagSpec> {
        self.flags.iter().find(|f| f.field == field)
    }

    /// Verbs joined with a space (`"query cycle"`), for diagnostics.
    pub fn name(&self) -> String {
        self.verbs.join(" ")
    }
}

/* ---- Shared rows ---- */

const VID: FlagSpec = one("vid", "--vid");
const EID: FlagSpec = one("eid", "--eid");
const V_TYPES: FlagSpec = many("vType", "--vt").alias(&["--v-type"]);
const E_TYPES: FlagSpec = many("eType", "--et").alias(&["--e-type"]);
const MIN_TIME: FlagSpec = one("minTime", "--min-time");
const MAX_TIME: FlagSpec = one("maxTime", "--max-time");
const MIN_BAL: FlagSpec = one("minBalance", "--min-bal").alias(&["--min-balance"]);
const MAX_BAL: FlagSpec = one("maxBalance", "--max-bal").alias(&["--max-balance"]);
const MIN_AMT: FlagSpec = one("minAmount", "--min-amt").alias(&["--min-amount"]);
const MAX_AMT: FlagSpec = one("maxAmount", "--max-amt").alias(&["--max-amount"]);
const SRC: FlagSpec = one("src", "--src").alias(&["--src-vid"]);
const DST: FlagSpec = one("dst", "--dst").alias(&["--dst-vid"]);
const USER: FlagSpec = one("user", "-u").alias(&["--username"]).required();
const PASS: FlagSpec = one("pass", "-p").alias(&["--password"]).required();

/* ---- Grammars ---- */

pub static VERTEX_QUERY: Grammar = Grammar {
    kind: IntentKind::VertexQuery,
    verbs: &[verb::QUERY, verb::VERTEX],
    flags: &[VID, V_TYPES, MIN_TIME, MAX_TIME, MIN_BAL, MAX_BAL],
};

pub static EDGE_QUERY: Grammar = Grammar {
    kind: IntentKind::EdgeQuery,
    verbs: &[verb::QUERY, verb::EDGE],
    flags: &[EID, SRC, DST, E_TYPES, MIN_AMT, MAX_AMT, MIN_TIME, MAX_TIME],
};

pub static CYCLE_QUERY: Grammar = Grammar {
    kind: IntentKind::CycleQuery,
    verbs: &[verb::QUERY, verb::CYCLE],
    flags: &[
        one("start", "--start").alias(&["--start-vid"]).required(),
        one("depth", "--depth").alias(&["--max-depth"]).required(),
        one("direction", "--dir").alias(&["--direction"]),
        V_TYPES,
        MIN_BAL,
        E_TYPES,
        MIN_AMT,
        MAX_AMT,
        one("limit", "--limit"),
        switch("allowDupV", "--allow-dup-v").alias(&["--allow-duplicate-vertices"]),
        switch("allowDupE", "--allow-dup-e").alias(&["--allow-duplicate-edges"]),
    ],
};

pub static VERTEX_INSERT: Grammar = Grammar {
    kind: IntentKind::VertexInsert,
    verbs: &[verb::INSERT, verb::VERTEX],
    flags: &[
        one("vType", "--vt").alias(&["--v-type"]).required(),
        VID,
        one("time", "--time").alias(&["--create-time"]),
        one("balance", "--bal").alias(&["--balance"]),
    ],
};

pub static EDGE_INSERT: Grammar = Grammar {
    kind: IntentKind::EdgeInsert,
    verbs: &[verb::INSERT, verb::EDGE],
    flags: &[
        SRC.required(),
        DST.required(),
        EID,
        one("amount", "--amt").alias(&["--amount"]),
        one("time", "--time").alias(&["--occur-time"]),
        one("eType", "--et").alias(&["--e-type"]),
        switch("createV", "--create-v").alias(&["--create-vertices"]),
    ],
};

pub static VERTEX_DELETE: Grammar = Grammar {
    kind: IntentKind::VertexDelete,
    verbs: &[verb::DELETE, verb::VERTEX],
    flags: &[VID.required()],
};

pub static EDGE_DELETE: Grammar = Grammar {
    kind: IntentKind::EdgeDelete,
    verbs: &[verb::DELETE, verb::EDGE],
    flags: &[EID.required()],
};

pub static REGISTER: Grammar = Grammar {
    kind: IntentKind::Register,
    verbs: &[verb::REGISTER],
    flags: &[USER, PASS],
};

pub static LOGIN: Grammar = Grammar {
    kind: IntentKind::Login,
    verbs: &[verb::LOGIN],
    flags: &[USER, PASS],
};

pub static LOGOUT: Grammar = Grammar {
    kind: IntentKind::Logout,
    verbs: &[verb::LOGOUT],
    flags: &[],
};

pub static WHOAMI: Grammar = Grammar {
    kind: IntentKind::Whoami,
    verbs: &[verb::WHOAMI],
    flags: &[],
};

/// All grammars, in the order the decoder tries them.
pub static GRAMMARS: &[&Grammar] = &[
    &VERTEX_QUERY,
    &EDGE_QUERY,
    &CYCLE_QUERY,
    &VERTEX_INSERT,
    &EDGE_INSERT,
    &VERTEX_DELETE,
    &EDGE_DELETE,
    &REGISTER,
    &LOGIN,
    &LOGOUT,
    &WHOAMI,
];

/// Grammar for an intent kind.
pub fn grammar(kind: IntentKind) -> &'static Grammar {
    match kind {
        IntentKind::VertexQuery => &VERTEX_QUERY,
        IntentKind::EdgeQuery => &EDGE_QUERY,
        IntentKind::CycleQuery => &CYCLE_QUERY,
        IntentKind::VertexInsert => &VERTEX_INSERT,
        IntentKind::EdgeInsert => &EDGE_INSERT,
        IntentKind::VertexDelete => &VERTEX_DELETE,
        IntentKind::EdgeDelete => &EDGE_DELETE,
        IntentKind::Register => &REGISTER,
        IntentKind::Login => &LOGIN,
        IntentKind::Logout => &LOGOUT,
        IntentKind::Whoami => &WHOAMI,
    }
}
