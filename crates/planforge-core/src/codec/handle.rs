use crate::codec::{Datum, DecodeError, cut_one, encode_datums};

///
/// Handle
///
/// Row identifier used by point lookups: either a plain integer row id or an
/// encoded composite (clustered primary key) handle.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Handle {
    Int(i64),
    Common(CommonHandle),
}

impl Handle {
    #[must_use]
    pub const fn is_int(&self) -> bool {
        matches!(self, Self::Int(_))
    }

    #[must_use]
    pub const fn int_value(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Common(_) => None,
        }
    }

    /// Borrow the encoded bytes of one handle column.
    /// Integer handles have no encoded columns.
    pub fn encoded_col(&self, pos: usize) -> Result<&[u8], DecodeError> {
        match self {
            Self::Int(_) => Err(DecodeError::ColumnOutOfRange { pos, len: 0 }),
            Self::Common(handle) => handle.encoded_col(pos),
        }
    }
}

///
/// CommonHandle
///
/// Encoded composite handle plus the end offset of each column inside it.
/// Column framing is validated at construction; column payloads are only
/// validated when decoded.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommonHandle {
    encoded: Vec<u8>,
    col_ends: Vec<usize>,
}

impl CommonHandle {
    /// Frame an encoded composite handle into its columns.
    pub fn new(encoded: Vec<u8>) -> Result<Self, DecodeError> {
        let mut col_ends = Vec::new();
        let mut rest = encoded.as_slice();
        while !rest.is_empty() {
            let (_, tail) = cut_one(rest)?;
            col_ends.push(encoded.len() - tail.len());
            rest = tail;
        }
        if col_ends.is_empty() {
            return Err(DecodeError::Empty);
        }

        Ok(Self { encoded, col_ends })
    }

    /// Encode a datum tuple into a composite handle.
    #[must_use]
    pub fn from_datums(datums: &[Datum]) -> Self {
        let encoded = encode_datums(datums);
        let mut col_ends = Vec::with_capacity(datums.len());
        let mut end = 0;
        for datum in datums {
            end += encode_datums(std::slice::from_ref(datum)).len();
            col_ends.push(end);
        }

        Self { encoded, col_ends }
    }

    #[must_use]
    pub const fn num_cols(&self) -> usize {
        self.col_ends.len()
    }

    #[must_use]
    pub const fn encoded(&self) -> &[u8] {
        self.encoded.as_slice()
    }

    pub fn encoded_col(&self, pos: usize) -> Result<&[u8], DecodeError> {
        let end = *self
            .col_ends
            .get(pos)
            .ok_or(DecodeError::ColumnOutOfRange {
                pos,
                len: self.col_ends.len(),
            })?;
        let start = if pos == 0 { 0 } else { self.col_ends[pos - 1] };

        Ok(&self.encoded[start..end])
    }
}
