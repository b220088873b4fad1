//! Attribute options subsystem
//!
//! Decodes the raw options bag of an attribute into an explicit record.
//! Raw options arrive either already decoded or in the versioned binary
//! form produced by [`OptionsCodec::encode`].

mod codec;
mod errors;
mod types;

pub use codec::{OptionsCodec, FORMAT_VERSION, MAGIC, MAX_DEPTH};
pub use errors::{CodecError, CodecResult};
pub use types::{AttrOptions, RawOptions, DEFAULT_KEY, EXAMPLES_KEY, REQUIRED_KEY, VALUES_KEY};
