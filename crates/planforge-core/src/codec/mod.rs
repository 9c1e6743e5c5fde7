//! Module: codec
//! Responsibility: memcomparable datum encoding used by row handles and
//! index-value tuples.
//! Does not own: partition evaluation or handle-to-partition routing.
//! Boundary: consumed by the partition resolver through `DatumDecoder`.

mod datum;
mod error;
mod handle;
#[cfg(test)]
mod tests;

pub use datum::Datum;
pub use error::DecodeError;
pub use handle::{CommonHandle, Handle};

const NULL_TAG: u8 = 0x00;
const BYTES_TAG: u8 = 0x01;
const TEXT_TAG: u8 = 0x02;
const INT_TAG: u8 = 0x03;
const UINT_TAG: u8 = 0x04;
const FLOAT_TAG: u8 = 0x05;
const BOOL_TAG: u8 = 0x06;

const FIXED_WIDTH: usize = 8;
const ESCAPE: u8 = 0x00;
const ESCAPED_ZERO: u8 = 0xFF;
const TERMINATOR: u8 = 0x00;

///
/// DatumDecoder
///
/// Session-provided routine that turns one encoded handle column back into a
/// datum. The default is the memcomparable codec in this module.
///

pub trait DatumDecoder: Send + Sync {
    fn decode_column(&self, encoded: &[u8]) -> Result<Datum, DecodeError>;
}

///
/// MemcomparableDecoder
///

#[derive(Clone, Copy, Debug, Default)]
pub struct MemcomparableDecoder;

impl DatumDecoder for MemcomparableDecoder {
    fn decode_column(&self, encoded: &[u8]) -> Result<Datum, DecodeError> {
        let (datum, _) = decode_one(encoded)?;

        Ok(datum)
    }
}

/// Encode one datum so lexicographic byte order matches value order within
/// one datum kind.
pub fn encode_datum(out: &mut Vec<u8>, datum: &Datum) {
    match datum {
        Datum::Null => out.push(NULL_TAG),
        Datum::Bool(v) => {
            out.push(BOOL_TAG);
            out.push(u8::from(*v));
        }
        Datum::Int(v) => {
            out.push(INT_TAG);
            out.extend_from_slice(&ordered_i64_bytes(*v));
        }
        Datum::Uint(v) => {
            out.push(UINT_TAG);
            out.extend_from_slice(&v.to_be_bytes());
        }
        Datum::Float(v) => {
            out.push(FLOAT_TAG);
            out.extend_from_slice(&ordered_f64_bytes(*v));
        }
        Datum::Text(v) => {
            out.push(TEXT_TAG);
            push_terminated_bytes(out, v.as_bytes());
        }
        Datum::Bytes(v) => {
            out.push(BYTES_TAG);
            push_terminated_bytes(out, v);
        }
    }
}

/// Encode a datum tuple back to back.
#[must_use]
pub fn encode_datums(datums: &[Datum]) -> Vec<u8> {
    let mut out = Vec::new();
    for datum in datums {
        encode_datum(&mut out, datum);
    }

    out
}

/// Split the first encoded datum off `bytes` without decoding its payload.
pub fn cut_one(bytes: &[u8]) -> Result<(&[u8], &[u8]), DecodeError> {
    let (&tag, payload) = bytes.split_first().ok_or(DecodeError::Empty)?;
    let payload_len = match tag {
        NULL_TAG => 0,
        BOOL_TAG => 1,
        INT_TAG | UINT_TAG | FLOAT_TAG => FIXED_WIDTH,
        TEXT_TAG | BYTES_TAG => terminated_len(payload)?,
        _ => return Err(DecodeError::InvalidTag { tag }),
    };
    if payload.len() < payload_len {
        return Err(DecodeError::Truncated {
            needed: payload_len,
            remaining: payload.len(),
        });
    }

    Ok(bytes.split_at(1 + payload_len))
}

/// Decode the first datum of `bytes`, returning it with the unread remainder.
pub fn decode_one(bytes: &[u8]) -> Result<(Datum, &[u8]), DecodeError> {
    let (column, rest) = cut_one(bytes)?;
    let (&tag, payload) = column.split_first().ok_or(DecodeError::Empty)?;

    let datum = match tag {
        NULL_TAG => Datum::Null,
        BOOL_TAG => match payload {
            [0] => Datum::Bool(false),
            [1] => Datum::Bool(true),
            _ => return Err(DecodeError::InvalidPayload { kind: "bool" }),
        },
        INT_TAG => Datum::Int(i64_from_ordered(fixed(payload)?)),
        UINT_TAG => Datum::Uint(u64::from_be_bytes(fixed(payload)?)),
        FLOAT_TAG => Datum::Float(f64_from_ordered(u64::from_be_bytes(fixed(payload)?))),
        TEXT_TAG => {
            let raw = unescape_terminated(payload)?;
            let text =
                String::from_utf8(raw).map_err(|_| DecodeError::InvalidPayload { kind: "text" })?;
            Datum::Text(text)
        }
        BYTES_TAG => Datum::Bytes(unescape_terminated(payload)?),
        _ => return Err(DecodeError::InvalidTag { tag }),
    };

    Ok((datum, rest))
}

const fn ordered_i64_bytes(value: i64) -> [u8; 8] {
    let biased = value.cast_unsigned() ^ (1u64 << 63);
    biased.to_be_bytes()
}

// Undo the sign-bit flip applied by `ordered_i64_bytes`.
const fn i64_from_ordered(bytes: [u8; 8]) -> i64 {
    (u64::from_be_bytes(bytes) ^ (1u64 << 63)).cast_signed()
}

const fn ordered_f64_bytes(value: f64) -> [u8; 8] {
    let bits = value.to_bits();
    let ordered = if bits & 0x8000_0000_0000_0000 == 0 {
        bits ^ 0x8000_0000_0000_0000
    } else {
        !bits
    };

    ordered.to_be_bytes()
}

const fn f64_from_ordered(ordered: u64) -> f64 {
    let bits = if ordered & 0x8000_0000_0000_0000 == 0 {
        !ordered
    } else {
        ordered ^ 0x8000_0000_0000_0000
    };

    f64::from_bits(bits)
}

fn fixed(payload: &[u8]) -> Result<[u8; FIXED_WIDTH], DecodeError> {
    payload.try_into().map_err(|_| DecodeError::Truncated {
        needed: FIXED_WIDTH,
        remaining: payload.len(),
    })
}

// Byte strings are escaped so tuple boundaries remain unambiguous.
fn push_terminated_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    for &byte in bytes {
        if byte == ESCAPE {
            out.extend_from_slice(&[ESCAPE, ESCAPED_ZERO]);
        } else {
            out.push(byte);
        }
    }

    out.extend_from_slice(&[ESCAPE, TERMINATOR]);
}

// Length of one terminated segment including its two-byte terminator.
fn terminated_len(payload: &[u8]) -> Result<usize, DecodeError> {
    let mut pos = 0;
    while pos < payload.len() {
        if payload[pos] != ESCAPE {
            pos += 1;
            continue;
        }

        match payload.get(pos + 1) {
            Some(&TERMINATOR) => return Ok(pos + 2),
            Some(&ESCAPED_ZERO) => pos += 2,
            Some(&byte) => return Err(DecodeError::InvalidEscape { byte }),
            None => break,
        }
    }

    Err(DecodeError::Truncated {
        needed: payload.len() + 2,
        remaining: payload.len(),
    })
}

fn unescape_terminated(payload: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let body = payload
        .strip_suffix(&[ESCAPE, TERMINATOR])
        .ok_or(DecodeError::Truncated {
            needed: 2,
            remaining: payload.len(),
        })?;

    let mut out = Vec::with_capacity(body.len());
    let mut bytes = body.iter();
    while let Some(&byte) = bytes.next() {
        if byte == ESCAPE {
            match bytes.next() {
                Some(&ESCAPED_ZERO) => out.push(0),
                Some(&other) => return Err(DecodeError::InvalidEscape { byte: other }),
                None => return Err(DecodeError::InvalidPayload { kind: "escape" }),
            }
        } else {
            out.push(byte);
        }
    }

    Ok(out)
}
