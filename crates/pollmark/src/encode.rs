//!
//! Canonical CBOR encoding of the normalized tree, RFC 8949 §4.2.1 style:
//! definite lengths only, shortest-form integers, and map entries ordered by
//! the byte length of the already-encoded key with byte-wise comparison as
//! the tie-break. The ordering is an explicit sort over encoded key buffers
//! immediately before emission — never a host map's iteration order.
//!
//! `decode` is the inverse used by round-trip checks and chain indexers. It
//! accepts any definite-length CBOR within the supported value set; whether
//! the input was canonical is established by re-encoding (see
//! [`crate::hash::digest_verified`]).
//!

use crate::{ThisError, node::Node};
use minicbor::{Decoder, Encoder, data::Type};
use std::convert::Infallible;

///
/// EncodeError
///

#[derive(Debug, ThisError)]
pub enum EncodeError {
    #[error("unsupported value: {0}")]
    UnsupportedValue(String),

    #[error("duplicate map key: 0x{0}")]
    DuplicateKey(String),

    #[error("cbor write error: {0}")]
    Write(String),

    #[error("cbor decode error: {0}")]
    Decode(String),
}

impl From<minicbor::encode::Error<Infallible>> for EncodeError {
    fn from(err: minicbor::encode::Error<Infallible>) -> Self {
        Self::Write(err.to_string())
    }
}

impl From<minicbor::decode::Error> for EncodeError {
    fn from(err: minicbor::decode::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

///
/// Encode a normalized tree into canonical CBOR bytes.
///
/// Deterministic and side-effect-free: the same logical tree yields the same
/// byte sequence regardless of platform or of the order map entries were
/// produced in.
///
pub fn encode(node: &Node) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    write_node(&mut buf, node)?;

    Ok(buf)
}

#[allow(clippy::cast_possible_truncation)]
fn write_node(buf: &mut Vec<u8>, node: &Node) -> Result<(), EncodeError> {
    match node {
        Node::Map(entries) => {
            // Encode every entry up front so keys can be ordered by their
            // encoded form.
            let mut encoded: Vec<(Vec<u8>, Vec<u8>)> = Vec::with_capacity(entries.len());
            for (key, value) in entries {
                let mut kb = Vec::new();
                write_node(&mut kb, key)?;
                let mut vb = Vec::new();
                write_node(&mut vb, value)?;
                encoded.push((kb, vb));
            }

            // Shorter encoded key first; byte-wise comparison breaks ties.
            encoded.sort_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));

            for pair in encoded.windows(2) {
                if pair[0].0 == pair[1].0 {
                    return Err(EncodeError::DuplicateKey(hex::encode(&pair[0].0)));
                }
            }

            Encoder::new(&mut *buf).map(entries.len() as u64)?;
            for (kb, vb) in &encoded {
                buf.extend_from_slice(kb);
                buf.extend_from_slice(vb);
            }
        }
        Node::Array(items) => {
            Encoder::new(&mut *buf).array(items.len() as u64)?;
            for item in items {
                write_node(buf, item)?;
            }
        }
        Node::Text(s) => {
            Encoder::new(&mut *buf).str(s)?;
        }
        Node::Uint(n) => {
            Encoder::new(&mut *buf).u64(*n)?;
        }
        Node::Int(n) => {
            Encoder::new(&mut *buf).i64(*n)?;
        }
        Node::Bool(b) => {
            Encoder::new(&mut *buf).bool(*b)?;
        }
    }

    Ok(())
}

///
/// Decode definite-length CBOR bytes back into a tree.
///
/// Rejects indefinite-length items, floats, tags, and trailing bytes. Accepts
/// non-shortest integer forms (the canonicality verdict is a re-encode
/// comparison, not a decode failure).
///
pub fn decode(bytes: &[u8]) -> Result<Node, EncodeError> {
    let mut d = Decoder::new(bytes);
    let node = read_node(&mut d)?;

    if d.position() != bytes.len() {
        return Err(EncodeError::Decode(format!(
            "{} trailing bytes after value",
            bytes.len() - d.position()
        )));
    }

    Ok(node)
}

fn read_node(d: &mut Decoder) -> Result<Node, EncodeError> {
    match d.datatype()? {
        Type::Bool => Ok(Node::Bool(d.bool()?)),
        Type::U8 | Type::U16 | Type::U32 | Type::U64 => Ok(Node::Uint(d.u64()?)),
        Type::I8 | Type::I16 | Type::I32 | Type::I64 => Ok(Node::int(d.i64()?)),
        Type::String => Ok(Node::Text(d.str()?.to_owned())),
        Type::Array => {
            let len = d
                .array()?
                .ok_or_else(|| EncodeError::Decode("indefinite-length array".into()))?;
            let mut items = Vec::with_capacity(len.min(1024) as usize);
            for _ in 0..len {
                items.push(read_node(d)?);
            }
            Ok(Node::Array(items))
        }
        Type::Map => {
            let len = d
                .map()?
                .ok_or_else(|| EncodeError::Decode("indefinite-length map".into()))?;
            let mut entries = Vec::with_capacity(len.min(1024) as usize);
            for _ in 0..len {
                let key = read_node(d)?;
                let value = read_node(d)?;
                entries.push((key, value));
            }
            Ok(Node::Map(entries))
        }
        other => Err(EncodeError::Decode(format!("unsupported item: {other:?}"))),
    }
}

///
/// TESTS
///
