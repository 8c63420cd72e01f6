//! Command protocol: typed intents, the wire vocabulary, and the encoder /
//! decoder pair between them.
//!
//!   Intent --encode--> CommandTokens --decode--> Intent
//!
//! Both directions are driven by the grammar table in [`vocab`].

pub mod decode;
pub mod encode;
pub mod error;
mod fields;
pub mod intent;
pub mod vocab;

pub use decode::{decode, decode_line};
pub use encode::{CommandTokens, encode};
pub use error::{DecodeError, EncodeError};
pub use intent::{
    Credentials, CycleQuery, EdgeDelete, EdgeInsert, EdgeQuery, Intent, VertexDelete,
    VertexInsert, VertexQuery,
};
pub use vocab::IntentKind;
