use thiserror::Error as ThisError;

///
/// DecodeError
///
/// Low-level datum decode failure.
/// Always distinct from a decoded `Datum::Null`, which is a legitimately
/// absent value rather than a codec fault.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum DecodeError {
    #[error("encoded datum is empty")]
    Empty,

    #[error("invalid datum tag: {tag:#04x}")]
    InvalidTag { tag: u8 },

    #[error("truncated datum: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    #[error("invalid escape byte {byte:#04x} in terminated segment")]
    InvalidEscape { byte: u8 },

    #[error("invalid {kind} payload")]
    InvalidPayload { kind: &'static str },

    #[error("handle column {pos} out of range (handle has {len} columns)")]
    ColumnOutOfRange { pos: usize, len: usize },
}
