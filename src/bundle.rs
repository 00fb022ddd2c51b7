use std::io::Read;

use nom::{bytes::complete::tag, number::complete::le_u32, IResult};

use crate::error::{BundleError, BundleResult, IoResultExt};

/// Magic bytes at the start of every bundle; the format version byte is
/// embedded in the signature.
pub const MAGIC: [u8; 8] = *b"ABNDL\x01\x00\x00";

/// Size of the fixed header fields in bytes. `header_size` may declare a
/// larger header; the bytes in between are format-specific and skipped.
pub const FIXED_HEADER_LEN: usize = 16;

/// Header flag bit: the data section is zlib-compressed as a whole.
pub const FLAG_COMPRESSED: u32 = 1;

/// The fixed, validated bundle header.
///
/// A value of this type only exists for inputs whose signature matched,
/// so holding one implies the magic bytes were valid.
#[derive(Debug, Clone)]
pub struct BundleHeader {
    header_size: u32,
    flags: u32,
}

impl BundleHeader {
    /// Read and validate the fixed header from the start of a bundle.
    pub fn read_from<R: Read>(reader: &mut R) -> BundleResult<BundleHeader> {
        let mut raw = [0u8; FIXED_HEADER_LEN];
        reader
            .read_exact(&mut raw)
            .or_truncated("reading the bundle header")?;

        // The input is always exactly FIXED_HEADER_LEN bytes here, so the
        // only way the parser can fail is a signature mismatch.
        let (_, header) = parse_header(&raw).map_err(|_| BundleError::InvalidSignature)?;
        Ok(header)
    }

    /// Byte offset where the data section begins.
    pub fn header_size(&self) -> u64 {
        self.header_size as u64
    }

    /// Whether the data section is zlib-compressed as a whole.
    pub fn is_compressed(&self) -> bool {
        self.flags & FLAG_COMPRESSED != 0
    }
}

// Parser for the fixed header fields
fn parse_header(input: &[u8]) -> IResult<&[u8], BundleHeader> {
    let (input, _) = tag(MAGIC.as_slice())(input)?;
    let (input, header_size) = le_u32(input)?;
    let (input, flags) = le_u32(input)?;
    Ok((input, BundleHeader { header_size, flags }))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::{BundleHeader, FLAG_COMPRESSED, MAGIC};
    use crate::error::BundleError;

    fn header_bytes(header_size: u32, flags: u32) -> Vec<u8> {
        let mut raw = MAGIC.to_vec();
        raw.extend_from_slice(&header_size.to_le_bytes());
        raw.extend_from_slice(&flags.to_le_bytes());
        raw
    }

    #[test]
    fn parses_valid_header() {
        let raw = header_bytes(16, 0);
        let header = BundleHeader::read_from(&mut Cursor::new(raw)).unwrap();
        assert_eq!(header.header_size(), 16);
        assert!(!header.is_compressed());
    }

    #[test]
    fn compressed_flag_is_bit_zero() {
        let raw = header_bytes(64, FLAG_COMPRESSED);
        let header = BundleHeader::read_from(&mut Cursor::new(raw)).unwrap();
        assert_eq!(header.header_size(), 64);
        assert!(header.is_compressed());

        // Other flag bits don't count as compression
        let raw = header_bytes(64, 2);
        let header = BundleHeader::read_from(&mut Cursor::new(raw)).unwrap();
        assert!(!header.is_compressed());
    }

    #[test]
    fn rejects_bad_magic() {
        let mut raw = header_bytes(16, 0);
        raw[0] = b'X';
        let err = BundleHeader::read_from(&mut Cursor::new(raw)).unwrap_err();
        assert!(matches!(err, BundleError::InvalidSignature));
    }

    #[test]
    fn short_header_is_truncated() {
        let raw = header_bytes(16, 0);
        let err = BundleHeader::read_from(&mut Cursor::new(&raw[..10])).unwrap_err();
        assert!(matches!(err, BundleError::TruncatedData { .. }));
    }
}
