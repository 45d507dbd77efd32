//! Bounds-checked forward cursor over a registration message.

use crate::error::{DecodeError, Field};

/// Reads fields in order from a byte slice.
///
/// Every read either returns exactly the requested bytes and advances, or
/// fails with [`DecodeError::Truncated`] and leaves the cursor where it was.
#[derive(Debug, Clone)]
pub(crate) struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    pub(crate) const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    #[cfg(test)]
    pub(crate) const fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes not yet consumed.
    pub(crate) fn remaining(&self) -> &'a [u8] {
        self.bytes.get(self.offset..).unwrap_or_default()
    }

    pub(crate) fn read_u8(&mut self, field: Field) -> Result<u8, DecodeError> {
        let [byte] = self.read_array::<1>(field)?;
        Ok(byte)
    }

    pub(crate) fn read_array<const N: usize>(
        &mut self,
        field: Field,
    ) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read(field, N)?);
        Ok(out)
    }

    pub(crate) fn read(&mut self, field: Field, len: usize) -> Result<&'a [u8], DecodeError> {
        let slice = self
            .offset
            .checked_add(len)
            .and_then(|end| self.bytes.get(self.offset..end))
            .ok_or_else(|| self.truncated(field, len))?;
        self.offset += len;
        Ok(slice)
    }

    /// Advance past `len` bytes that were consumed by someone else.
    pub(crate) fn skip(&mut self, field: Field, len: usize) -> Result<(), DecodeError> {
        self.read(field, len).map(|_| ())
    }

    /// Consume everything that is left.
    pub(crate) fn read_rest(&mut self) -> &'a [u8] {
        let rest = self.remaining();
        self.offset = self.bytes.len();
        rest
    }

    pub(crate) fn truncated(&self, field: Field, needed: usize) -> DecodeError {
        DecodeError::Truncated {
            field,
            offset: self.offset,
            needed,
            available: self.remaining().len(),
        }
    }
}
