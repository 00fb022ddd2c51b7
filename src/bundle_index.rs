use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};
use serde::Serialize;

use crate::error::{BundleResult, IoResultExt};

/// One named entry in the bundle index.
///
/// `offset` addresses the decompressed data section: position 0 is the first
/// byte after the header, i.e. the entry count field. Offsets and sizes are
/// not bounds-checked against the file; a descriptor pointing past the end
/// only fails once a read actually reaches the missing bytes.
#[derive(Debug, Clone, Serialize)]
pub struct EntryDescriptor {
    pub name: String,
    pub offset: u64,
    pub size: u64,
}

/// Read the entry index from the start of the data section, returning the
/// descriptors sorted by ascending offset.
///
/// Descriptors may be stored in any order, but entries can only be streamed
/// in the order their payloads appear in the file, so the index is sorted
/// before use. The sort is stable: descriptors with equal offsets keep their
/// stored order.
pub fn read_entry_index<R: Read>(source: &mut R) -> BundleResult<Vec<EntryDescriptor>> {
    let count = source
        .read_u32::<LittleEndian>()
        .or_truncated("reading the entry count")?;

    let mut entries = Vec::new();
    for _ in 0..count {
        entries.push(read_descriptor(source)?);
    }

    entries.sort_by_key(|e| e.offset);
    Ok(entries)
}

// Parser for a single descriptor: length-prefixed name, offset, size
fn read_descriptor<R: Read>(source: &mut R) -> BundleResult<EntryDescriptor> {
    let name_len = source
        .read_u32::<LittleEndian>()
        .or_truncated("reading an entry descriptor")?;

    let mut name = vec![0u8; name_len as usize];
    source
        .read_exact(&mut name)
        .or_truncated("reading an entry name")?;
    let name = String::from_utf8_lossy(&name).to_string();

    let offset = source
        .read_u64::<LittleEndian>()
        .or_truncated("reading an entry descriptor")?;
    let size = source
        .read_u64::<LittleEndian>()
        .or_truncated("reading an entry descriptor")?;

    Ok(EntryDescriptor { name, offset, size })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::read_entry_index;
    use crate::error::BundleError;

    fn index_bytes(descriptors: &[(&[u8], u64, u64)]) -> Vec<u8> {
        let mut raw = (descriptors.len() as u32).to_le_bytes().to_vec();
        for (name, offset, size) in descriptors {
            raw.extend_from_slice(&(name.len() as u32).to_le_bytes());
            raw.extend_from_slice(name);
            raw.extend_from_slice(&offset.to_le_bytes());
            raw.extend_from_slice(&size.to_le_bytes());
        }
        raw
    }

    #[test]
    fn sorts_descriptors_by_offset() {
        let raw = index_bytes(&[(b"third", 80, 8), (b"first", 0, 40), (b"second", 40, 40)]);
        let entries = read_entry_index(&mut Cursor::new(raw)).unwrap();

        let names = entries.iter().map(|e| e.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["first", "second", "third"]);
        assert!(entries.windows(2).all(|w| w[0].offset <= w[1].offset));
    }

    #[test]
    fn equal_offsets_keep_stored_order() {
        let raw = index_bytes(&[(b"b", 4, 0), (b"a", 4, 0), (b"c", 0, 4)]);
        let entries = read_entry_index(&mut Cursor::new(raw)).unwrap();

        let names = entries.iter().map(|e| e.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["c", "b", "a"]);
    }

    #[test]
    fn empty_index() {
        let raw = index_bytes(&[]);
        let entries = read_entry_index(&mut Cursor::new(raw)).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn non_utf8_names_decode_lossily() {
        let raw = index_bytes(&[(b"it\xffm", 0, 1)]);
        let entries = read_entry_index(&mut Cursor::new(raw)).unwrap();
        assert_eq!(entries[0].name, "it\u{fffd}m");
    }

    #[test]
    fn short_count_is_truncated() {
        let err = read_entry_index(&mut Cursor::new(vec![1, 0])).unwrap_err();
        assert!(matches!(err, BundleError::TruncatedData { .. }));
    }

    #[test]
    fn descriptor_cut_mid_name_is_truncated() {
        let mut raw = index_bytes(&[(b"payload.bin", 0, 4)]);
        raw.truncate(10);
        let err = read_entry_index(&mut Cursor::new(raw)).unwrap_err();
        assert!(matches!(err, BundleError::TruncatedData { .. }));
    }

    #[test]
    fn count_larger_than_stored_descriptors_is_truncated() {
        let mut raw = index_bytes(&[(b"only", 0, 4)]);
        raw[0] = 2;
        let err = read_entry_index(&mut Cursor::new(raw)).unwrap_err();
        assert!(matches!(err, BundleError::TruncatedData { .. }));
    }
}
