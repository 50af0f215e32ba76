//! Bounded big-endian byte reader

use byteorder::{BigEndian, ByteOrder};
use psd_core::{PsdError, PsdResult, Version};

/// A cursor over an in-memory byte buffer.
///
/// Every read is bounds-checked and fails with
/// [`PsdError::UnexpectedEndOfData`] instead of panicking. Offsets in errors are
/// absolute file offsets, including for readers created with
/// [`ByteReader::sub_reader`].
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
    base: u64,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            base: 0,
        }
    }

    /// A reader over a slice that starts at absolute file offset `base`
    pub fn with_offset(data: &'a [u8], base: u64) -> Self {
        Self { data, pos: 0, base }
    }

    /// Position relative to the start of this reader
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Absolute offset in the file
    pub fn offset(&self) -> u64 {
        self.base + self.pos as u64
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn at_end(&self) -> bool {
        self.remaining() == 0
    }

    fn eod(&self, needed: usize) -> PsdError {
        PsdError::UnexpectedEndOfData {
            offset: self.offset(),
            needed: needed as u64,
            available: self.remaining() as u64,
        }
    }

    /// Read the next `n` bytes and advance
    pub fn read(&mut self, n: usize) -> PsdResult<&'a [u8]> {
        let bytes = self.peek(n)?;
        self.pos += n;
        Ok(bytes)
    }

    /// Look at the next `n` bytes without advancing
    pub fn peek(&self, n: usize) -> PsdResult<&'a [u8]> {
        if n > self.remaining() {
            return Err(self.eod(n));
        }
        Ok(&self.data[self.pos..self.pos + n])
    }

    /// Move to a position relative to the start of this reader
    pub fn seek(&mut self, pos: usize) -> PsdResult<()> {
        if pos > self.data.len() {
            return Err(PsdError::UnexpectedEndOfData {
                offset: self.base + pos as u64,
                needed: 0,
                available: 0,
            });
        }
        self.pos = pos;
        Ok(())
    }

    pub fn skip(&mut self, n: usize) -> PsdResult<()> {
        self.read(n).map(|_| ())
    }

    /// Skip to the next multiple of `alignment` relative to the reader start
    pub fn align_to(&mut self, alignment: usize) -> PsdResult<()> {
        let rem = self.pos % alignment;
        if rem != 0 {
            self.skip(alignment - rem)?;
        }
        Ok(())
    }

    /// Split off a child reader over the next `n` bytes and advance past them
    pub fn sub_reader(&mut self, n: usize) -> PsdResult<ByteReader<'a>> {
        let base = self.offset();
        let data = self.read(n)?;
        Ok(ByteReader { data, pos: 0, base })
    }

    pub fn read_array<const N: usize>(&mut self) -> PsdResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read(N)?);
        Ok(out)
    }

    /// Read a four character code such as `8BIM`
    pub fn read_signature(&mut self) -> PsdResult<[u8; 4]> {
        self.read_array::<4>()
    }

    pub fn read_u8(&mut self) -> PsdResult<u8> {
        Ok(self.read(1)?[0])
    }

    pub fn read_i8(&mut self) -> PsdResult<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> PsdResult<u16> {
        Ok(BigEndian::read_u16(self.read(2)?))
    }

    pub fn read_i16(&mut self) -> PsdResult<i16> {
        Ok(BigEndian::read_i16(self.read(2)?))
    }

    pub fn read_u32(&mut self) -> PsdResult<u32> {
        Ok(BigEndian::read_u32(self.read(4)?))
    }

    pub fn read_i32(&mut self) -> PsdResult<i32> {
        Ok(BigEndian::read_i32(self.read(4)?))
    }

    pub fn read_u64(&mut self) -> PsdResult<u64> {
        Ok(BigEndian::read_u64(self.read(8)?))
    }

    pub fn read_f32(&mut self) -> PsdResult<f32> {
        Ok(BigEndian::read_f32(self.read(4)?))
    }

    pub fn read_f64(&mut self) -> PsdResult<f64> {
        Ok(BigEndian::read_f64(self.read(8)?))
    }

    /// Read a section or channel length: 4 bytes in PSD, 8 bytes in PSB
    pub fn read_length(&mut self, version: Version) -> PsdResult<u64> {
        match version {
            Version::Psd => self.read_u32().map(u64::from),
            Version::Psb => self.read_u64(),
        }
    }

    /// Read a length and check that it fits in the remaining data
    pub fn read_bounded_length(&mut self, version: Version) -> PsdResult<usize> {
        let length = self.read_length(version)?;
        if length > self.remaining() as u64 {
            return Err(PsdError::UnexpectedEndOfData {
                offset: self.offset(),
                needed: length,
                available: self.remaining() as u64,
            });
        }
        Ok(length as usize)
    }

    /// Read a Pascal string whose total size, length byte included, is
    /// padded to a multiple of `padding`
    pub fn read_pascal_string(&mut self, padding: usize) -> PsdResult<String> {
        let len = self.read_u8()? as usize;
        let bytes = self.read(len)?;
        let total = len + 1;
        let padded = total.div_ceil(padding) * padding;
        self.skip(padded - total)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Read a UTF-16BE string prefixed by its length in code units
    pub fn read_unicode_string(&mut self) -> PsdResult<String> {
        let count = self.read_u32()? as usize;
        let byte_len = count.checked_mul(2).ok_or_else(|| self.eod(usize::MAX))?;
        let bytes = self.read(byte_len)?;
        let units: Vec<u16> = bytes.chunks_exact(2).map(BigEndian::read_u16).collect();
        let text = String::from_utf16_lossy(&units);
        Ok(text.trim_end_matches('\0').to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_big_endian_reads() {
        let data = [0x12, 0x34, 0xFF, 0xFE, 0x00, 0x00, 0x01, 0x00];
        let mut reader = ByteReader::new(&data);

        assert_eq!(reader.read_u16().unwrap(), 0x1234);
        assert_eq!(reader.read_i16().unwrap(), -2);
        assert_eq!(reader.read_u32().unwrap(), 256);
        assert!(reader.at_end());
    }

    #[test]
    fn test_read_past_end_fails() {
        let data = [1, 2, 3];
        let mut reader = ByteReader::new(&data);
        reader.skip(2).unwrap();

        match reader.read_u32() {
            Err(PsdError::UnexpectedEndOfData {
                offset,
                needed,
                available,
            }) => {
                assert_eq!(offset, 2);
                assert_eq!(needed, 4);
                assert_eq!(available, 1);
            }
            other => panic!("expected end of data, got {:?}", other),
        }
        // A failed read leaves the cursor alone
        assert_eq!(reader.position(), 2);
    }

    #[test]
    fn test_peek_and_seek() {
        let data = *b"8BIMnorm";
        let mut reader = ByteReader::new(&data);

        assert_eq!(reader.peek(4).unwrap(), b"8BIM");
        assert_eq!(reader.position(), 0);
        reader.seek(4).unwrap();
        assert_eq!(&reader.read_signature().unwrap(), b"norm");
        reader.seek(0).unwrap();
        assert_eq!(reader.read_u8().unwrap(), b'8');
        assert!(reader.seek(9).is_err());
    }

    #[test]
    fn test_sub_reader_reports_absolute_offsets() {
        let data = [0u8; 10];
        let mut reader = ByteReader::new(&data);
        reader.skip(4).unwrap();

        let mut child = reader.sub_reader(3).unwrap();
        assert_eq!(reader.position(), 7);
        assert_eq!(child.len(), 3);
        child.skip(3).unwrap();
        match child.read_u8() {
            Err(PsdError::UnexpectedEndOfData { offset, .. }) => assert_eq!(offset, 7),
            other => panic!("expected end of data, got {:?}", other),
        }
    }

    #[test]
    fn test_version_lengths() {
        let data = [0, 0, 0, 5, 0, 0, 0, 0, 0, 0, 0, 9];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_length(Version::Psd).unwrap(), 5);
        reader.seek(4).unwrap();
        assert_eq!(reader.read_length(Version::Psb).unwrap(), 9);
    }

    #[test]
    fn test_bounded_length_rejects_overflow() {
        let data = [0, 0, 0, 100, 1, 2];
        let mut reader = ByteReader::new(&data);
        assert!(matches!(
            reader.read_bounded_length(Version::Psd),
            Err(PsdError::UnexpectedEndOfData { needed: 100, .. })
        ));
    }

    #[test]
    fn test_pascal_string_padding() {
        // "abc" + length byte = 4 bytes, already a multiple of 4
        let data = [3, b'a', b'b', b'c', 0xAA];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_pascal_string(4).unwrap(), "abc");
        assert_eq!(reader.position(), 4);

        // Empty name padded to 2
        let data = [0, 0, 0xAA];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_pascal_string(2).unwrap(), "");
        assert_eq!(reader.position(), 2);
    }

    #[test]
    fn test_unicode_string() {
        let data = [0, 0, 0, 3, 0, b'H', 0, b'i', 0, 0];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_unicode_string().unwrap(), "Hi");
        assert!(reader.at_end());
    }

    #[test]
    fn test_align() {
        let data = [0u8; 8];
        let mut reader = ByteReader::new(&data);
        reader.skip(1).unwrap();
        reader.align_to(4).unwrap();
        assert_eq!(reader.position(), 4);
        reader.align_to(4).unwrap();
        assert_eq!(reader.position(), 4);
    }
}
