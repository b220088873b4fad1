//! Options codec
//!
//! Serialized options format (version 1), all integers little-endian:
//! - Magic (4 bytes): `SAOP`
//! - Format version (u8)
//! - Entry count (u32)
//! - Entries: key (u32 length + UTF-8), tagged value
//! - Checksum (u32): CRC32 over everything before it
//!
//! Tagged values:
//! - 0 null
//! - 1 bool (u8)
//! - 2 integer (i64)
//! - 3 float (f64 bits)
//! - 4 string, 5 atom (u32 length + UTF-8)
//! - 6 list (u32 count + values)
//! - 7 map (u32 count + key/value pairs)
//! - 8 struct (name, u32 count + field/value pairs)

use crc32fast::Hasher;
use std::collections::BTreeMap;

use super::errors::{CodecError, CodecResult};
use super::types::{AttrOptions, RawOptions};
use crate::types::{StructInstance, Value};

/// Leading bytes of every serialized options payload
pub const MAGIC: [u8; 4] = *b"SAOP";

/// Current serialized format version
pub const FORMAT_VERSION: u8 = 1;

/// Deepest value nesting accepted when decoding
pub const MAX_DEPTH: usize = 64;

const TAG_NULL: u8 = 0;
const TAG_BOOL: u8 = 1;
const TAG_INTEGER: u8 = 2;
const TAG_FLOAT: u8 = 3;
const TAG_STRING: u8 = 4;
const TAG_ATOM: u8 = 5;
const TAG_LIST: u8 = 6;
const TAG_MAP: u8 = 7;
const TAG_STRUCT: u8 = 8;

// magic + version + count + checksum
const MIN_LEN: usize = 4 + 1 + 4 + 4;

/// Decodes raw options into [`AttrOptions`] and encodes them back.
///
/// Decoding is deterministic and idempotent: decoding an already decoded
/// record returns it unchanged.
pub struct OptionsCodec;

impl OptionsCodec {
    /// Decode raw options
    pub fn decode(raw: &RawOptions) -> CodecResult<AttrOptions> {
        match raw {
            RawOptions::Decoded(options) => Ok(options.clone()),
            RawOptions::Encoded(bytes) => Self::decode_bytes(bytes),
        }
    }

    /// Decode the serialized form
    pub fn decode_bytes(data: &[u8]) -> CodecResult<AttrOptions> {
        if data.len() < MIN_LEN {
            return Err(CodecError::Truncated);
        }

        let (body, trailer) = data.split_at(data.len() - 4);
        let stored = u32::from_le_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);

        if body[..4] != MAGIC {
            return Err(CodecError::BadMagic);
        }
        if body[4] != FORMAT_VERSION {
            return Err(CodecError::UnsupportedVersion(body[4]));
        }

        let computed = compute_checksum(body);
        if computed != stored {
            return Err(CodecError::ChecksumMismatch { stored, computed });
        }

        let mut reader = Reader::new(&body[5..]);
        let count = reader.read_u32()?;

        let mut options = AttrOptions::default();
        for _ in 0..count {
            let key = reader.read_string()?;
            let value = reader.read_value(0)?;

            if options.contains_key(&key) {
                return Err(CodecError::DuplicateKey(key));
            }
            options
                .set(&key, value)
                .map_err(|v| CodecError::RequiredNotBoolean(v.type_name()))?;
        }

        if reader.remaining() > 0 {
            return Err(CodecError::TrailingBytes(reader.remaining()));
        }

        Ok(options)
    }

    /// Encode options into the serialized form
    pub fn encode(options: &AttrOptions) -> Vec<u8> {
        let entries = options.entries();

        let mut buf = Vec::with_capacity(64);
        buf.extend_from_slice(&MAGIC);
        buf.push(FORMAT_VERSION);
        buf.extend_from_slice(&(entries.len() as u32).to_le_bytes());

        for (key, value) in &entries {
            write_str(&mut buf, key);
            write_value(&mut buf, value);
        }

        let checksum = compute_checksum(&buf);
        buf.extend_from_slice(&checksum.to_le_bytes());
        buf
    }
}

/// CRC32 (IEEE) over the given bytes
fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

fn write_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u32).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}

fn write_value(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Null => buf.push(TAG_NULL),
        Value::Bool(b) => {
            buf.push(TAG_BOOL);
            buf.push(u8::from(*b));
        }
        Value::Integer(i) => {
            buf.push(TAG_INTEGER);
            buf.extend_from_slice(&i.to_le_bytes());
        }
        Value::Float(f) => {
            buf.push(TAG_FLOAT);
            buf.extend_from_slice(&f.to_bits().to_le_bytes());
        }
        Value::String(s) => {
            buf.push(TAG_STRING);
            write_str(buf, s);
        }
        Value::Atom(name) => {
            buf.push(TAG_ATOM);
            write_str(buf, name);
        }
        Value::List(items) => {
            buf.push(TAG_LIST);
            buf.extend_from_slice(&(items.len() as u32).to_le_bytes());
            for item in items {
                write_value(buf, item);
            }
        }
        Value::Map(map) => {
            buf.push(TAG_MAP);
            write_pairs(buf, map);
        }
        Value::Struct(inst) => {
            buf.push(TAG_STRUCT);
            write_str(buf, &inst.name);
            write_pairs(buf, &inst.fields);
        }
    }
}

fn write_pairs(buf: &mut Vec<u8>, pairs: &BTreeMap<String, Value>) {
    buf.extend_from_slice(&(pairs.len() as u32).to_le_bytes());
    for (k, v) in pairs {
        write_str(buf, k);
        write_value(buf, v);
    }
}

/// Bounds-checked cursor over the payload body
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize) -> CodecResult<&'a [u8]> {
        if self.remaining() < n {
            return Err(CodecError::Truncated);
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> CodecResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn read_u8(&mut self) -> CodecResult<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_u32(&mut self) -> CodecResult<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    fn read_string(&mut self) -> CodecResult<String> {
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|e| CodecError::InvalidUtf8(e.to_string()))
    }

    fn read_value(&mut self, depth: usize) -> CodecResult<Value> {
        if depth > MAX_DEPTH {
            return Err(CodecError::TooDeep(MAX_DEPTH));
        }

        let value = match self.read_u8()? {
            TAG_NULL => Value::Null,
            TAG_BOOL => Value::Bool(self.read_u8()? != 0),
            TAG_INTEGER => Value::Integer(i64::from_le_bytes(self.read_array()?)),
            TAG_FLOAT => Value::Float(f64::from_bits(u64::from_le_bytes(self.read_array()?))),
            TAG_STRING => Value::String(self.read_string()?),
            TAG_ATOM => Value::Atom(self.read_string()?),
            TAG_LIST => {
                let count = self.read_u32()?;
                // Every element takes at least one byte; truncation ends runaway counts
                let mut items = Vec::new();
                for _ in 0..count {
                    items.push(self.read_value(depth + 1)?);
                }
                Value::List(items)
            }
            TAG_MAP => Value::Map(self.read_pairs(depth)?),
            TAG_STRUCT => {
                let name = self.read_string()?;
                let fields = self.read_pairs(depth)?;
                Value::Struct(StructInstance::new(name, fields))
            }
            other => return Err(CodecError::UnknownTag(other)),
        };

        Ok(value)
    }

    fn read_pairs(&mut self, depth: usize) -> CodecResult<BTreeMap<String, Value>> {
        let count = self.read_u32()?;
        let mut pairs = BTreeMap::new();
        for _ in 0..count {
            let key = self.read_string()?;
            let value = self.read_value(depth + 1)?;
            if pairs.contains_key(&key) {
                return Err(CodecError::DuplicateKey(key));
            }
            pairs.insert(key, value);
        }
        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AttrOptions {
        let mut fields = BTreeMap::new();
        fields.insert("href".to_string(), Value::string("/"));

        let mut opts = AttrOptions::new()
            .with_default(Value::Struct(StructInstance::new("Link", fields)))
            .with_examples(vec![Value::atom("primary"), Value::Float(-0.25)]);
        opts.set("doc", Value::string("Link target")).unwrap();
        opts
    }

    /// Builds a payload with a correct checksum from a raw body.
    fn with_checksum(mut body: Vec<u8>) -> Vec<u8> {
        let checksum = compute_checksum(&body);
        body.extend_from_slice(&checksum.to_le_bytes());
        body
    }

    fn header(count: u32) -> Vec<u8> {
        let mut buf = MAGIC.to_vec();
        buf.push(FORMAT_VERSION);
        buf.extend_from_slice(&count.to_le_bytes());
        buf
    }

    #[test]
    fn test_encode_decode() {
        let opts = sample();
        let decoded = OptionsCodec::decode_bytes(&OptionsCodec::encode(&opts)).unwrap();
        assert_eq!(decoded, opts);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        assert_eq!(OptionsCodec::encode(&sample()), OptionsCodec::encode(&sample()));
    }

    #[test]
    fn test_decode_is_idempotent() {
        let raw = RawOptions::Encoded(OptionsCodec::encode(&sample()));
        let once = OptionsCodec::decode(&raw).unwrap();
        let twice = OptionsCodec::decode(&RawOptions::Decoded(once.clone())).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_options() {
        let bytes = OptionsCodec::encode(&AttrOptions::default());
        assert_eq!(bytes.len(), MIN_LEN);
        assert!(OptionsCodec::decode_bytes(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_truncated() {
        let bytes = OptionsCodec::encode(&sample());
        assert_eq!(
            OptionsCodec::decode_bytes(&bytes[..3]),
            Err(CodecError::Truncated)
        );
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = OptionsCodec::encode(&sample());
        bytes[0] = b'X';
        assert_eq!(OptionsCodec::decode_bytes(&bytes), Err(CodecError::BadMagic));
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes = OptionsCodec::encode(&sample());
        bytes[4] = 2;
        assert_eq!(
            OptionsCodec::decode_bytes(&bytes),
            Err(CodecError::UnsupportedVersion(2))
        );
    }

    #[test]
    fn test_corruption_detected() {
        let mut bytes = OptionsCodec::encode(&sample());
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0xff;
        assert!(matches!(
            OptionsCodec::decode_bytes(&bytes),
            Err(CodecError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_unknown_tag() {
        let mut body = header(1);
        write_str(&mut body, "default");
        body.push(42);
        assert_eq!(
            OptionsCodec::decode_bytes(&with_checksum(body)),
            Err(CodecError::UnknownTag(42))
        );
    }

    #[test]
    fn test_duplicate_key() {
        let mut body = header(2);
        for _ in 0..2 {
            write_str(&mut body, "default");
            write_value(&mut body, &Value::Integer(1));
        }
        assert_eq!(
            OptionsCodec::decode_bytes(&with_checksum(body)),
            Err(CodecError::DuplicateKey("default".into()))
        );
    }

    #[test]
    fn test_required_must_be_boolean() {
        let mut body = header(1);
        write_str(&mut body, "required");
        write_value(&mut body, &Value::string("yes"));
        assert_eq!(
            OptionsCodec::decode_bytes(&with_checksum(body)),
            Err(CodecError::RequiredNotBoolean("string"))
        );
    }

    #[test]
    fn test_trailing_bytes() {
        let mut body = header(0);
        body.extend_from_slice(&[0, 0]);
        assert_eq!(
            OptionsCodec::decode_bytes(&with_checksum(body)),
            Err(CodecError::TrailingBytes(2))
        );
    }

    #[test]
    fn test_oversized_length_is_truncation() {
        let mut body = header(1);
        body.extend_from_slice(&u32::MAX.to_le_bytes());
        assert_eq!(
            OptionsCodec::decode_bytes(&with_checksum(body)),
            Err(CodecError::Truncated)
        );
    }

    #[test]
    fn test_nesting_limit() {
        let mut value = Value::Null;
        for _ in 0..(MAX_DEPTH + 2) {
            value = Value::List(vec![value]);
        }
        let bytes = OptionsCodec::encode(&AttrOptions::new().with_default(value));
        assert_eq!(
            OptionsCodec::decode_bytes(&bytes),
            Err(CodecError::TooDeep(MAX_DEPTH))
        );
    }
}
