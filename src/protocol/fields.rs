//! Field plumbing shared by the encoder and decoder.
//!
//! Intent structs expose their members by grammar field name through
//! [`Fields`]; each member type knows how to render itself into a [`Slot`]
//! and how to rebuild itself from a decoded [`Raw`] value.

use std::borrow::Cow;
use std::collections::HashMap;

use super::error::DecodeError;
use super::vocab::FlagSpec;

/// Encoder view of one intent field.
#[derive(Debug)]
pub(crate) enum Slot<'a> {
    Absent,
    One(Cow<'a, str>),
    Many(&'a [String]),
    Switch(bool),
}

/// Decoder view of one flag occurrence.
#[derive(Debug)]
pub(crate) enum Raw {
    One(String),
    Many(Vec<String>),
    Switch,
}

impl Raw {
    fn rendered(&self) -> String {
        match self {
            Raw::One(v) => v.clone(),
            Raw::Many(vs) => vs.join(" "),
            Raw::Switch => String::new(),
        }
    }
}

/// Decoded flags keyed by field name.
#[derive(Debug, Default)]
pub(crate) struct Slots {
    values: HashMap<&'static str, (&'static FlagSpec, Raw)>,
}

impl Slots {
    pub(crate) fn insert(&mut self, spec: &'static FlagSpec, raw: Raw) -> Result<(), DecodeError> {
        if self.values.contains_key(spec.field) {
            return Err(DecodeError::DuplicateFlag(spec.flag));
        }
        self.values.insert(spec.field, (spec, raw));
        Ok(())
    }

    pub(crate) fn take<T: FieldSlot>(&mut self, field: &'static str) -> Result<T, DecodeError> {
        match self.values.remove(field) {
            Some((spec, raw)) => T::from_raw(spec.flag, raw),
            None => Ok(T::absent()),
        }
    }
}

/// A member type that can travel as a flag value.
pub(crate) trait FieldSlot: Sized {
    fn slot(&self) -> Slot<'_>;
    fn absent() -> Self;
    fn from_raw(flag: &'static str, raw: Raw) -> Result<Self, DecodeError>;
}

fn invalid<T>(flag: &'static str, raw: &Raw) -> Result<T, DecodeError> {
    Err(DecodeError::InvalidValue {
        flag,
        value: raw.rendered(),
    })
}

impl FieldSlot for Option<String> {
    fn slot(&self) -> Slot<'_> {
        match self {
            Some(v) => Slot::One(Cow::Borrowed(v)),
            None => Slot::Absent,
        }
    }

    fn absent() -> Self {
        None
    }

    fn from_raw(flag: &'static str, raw: Raw) -> Result<Self, DecodeError> {
        match raw {
            Raw::One(v) => Ok(Some(v)),
            other => invalid(flag, &other),
        }
    }
}

macro_rules! numeric_slot {
    ($($num:ty),*) => {$(
        impl FieldSlot for Option<$num> {
            fn slot(&self) -> Slot<'_> {
                match self {
                    Some(n) => Slot::One(Cow::Owned(n.to_string())),
                    None => Slot::Absent,
                }
            }

            fn absent() -> Self {
                None
            }

            fn from_raw(flag: &'static str, raw: Raw) -> Result<Self, DecodeError> {
                match &raw {
                    Raw::One(v) => match v.trim().parse::<$num>() {
                        Ok(n) => Ok(Some(n)),
                        Err(_) => invalid(flag, &raw),
                    },
                    other => invalid(flag, other),
                }
            }
        }
    )*};
}

numeric_slot!(i64, u32);

impl FieldSlot for Option<Vec<String>> {
    fn slot(&self) -> Slot<'_> {
        match self {
            // An empty list carries no values; the interpreter needs at least one.
            Some(vs) if !vs.is_empty() => Slot::Many(vs),
            _ => Slot::Absent,
        }
    }

    fn absent() -> Self {
        None
    }

    fn from_raw(flag: &'static str, raw: Raw) -> Result<Self, DecodeError> {
        match raw {
            Raw::Many(vs) => Ok(Some(vs)),
            Raw::One(v) => Ok(Some(vec![v])),
            other => invalid(flag, &other),
        }
    }
}

impl FieldSlot for bool {
    fn slot(&self) -> Slot<'_> {
        Slot::Switch(*self)
    }

    fn absent() -> Self {
        false
    }

    fn from_raw(flag: &'static str, raw: Raw) -> Result<Self, DecodeError> {
        match raw {
            Raw::Switch => Ok(true),
            other => invalid(flag, &other),
        }
    }
}

/// Field access by grammar field name.
pub(crate) trait Fields: Sized {
    fn slot(&self, field: &str) -> Slot<'_>;
    fn from_slots(slots: &mut Slots) -> Result<Self, DecodeError>;
}

/// Flagless commands (`logout`, `whoami`).
impl Fields for () {
    fn slot(&self, _field: &str) -> Slot<'_> {
        Slot::Absent
    }

    fn from_slots(_slots: &mut Slots) -> Result<Self, DecodeError> {
        Ok(())
    }
}

/// Implement [`Fields`] for an intent struct from a `member => "field"` list.
macro_rules! impl_fields {
    ($ty:ty { $($member:ident => $field:literal),* $(,)? }) => {
        impl $crate::protocol::fields::Fields for $ty {
            fn slot(&self, field: &str) -> $crate::protocol::fields::Slot<'_> {
                use $crate::protocol::fields::FieldSlot;
                match field {
                    $($field => self.$member.slot(),)*
                    _ => $crate::protocol::fields::Slot::Absent,
                }
            }

            fn from_slots(
                slots: &mut $crate::protocol::fields::Slots,
            ) -> Result<Self, $crate::protocol::error::DecodeError> {
                Ok(Self {
                    $($member: slots.take($field)?,)*
                })
            }
        }
    };
}

pub(crate) use impl_fields;
