use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};

use bytes::Bytes;

use crate::{
    bundle::BundleHeader,
    bundle_index::{read_entry_index, EntryDescriptor},
    bundle_source::DataSource,
    error::{BundleError, BundleResult, IoResultExt},
};

/// Streaming reader for a bundle file.
///
/// Opening a reader validates the header and loads the entry index; entry
/// payloads are only touched when streamed. All access goes through a single
/// shared cursor over the (possibly compressed) data section, so entries are
/// handed out in offset order and only one entry stream is live at a time.
/// Jumping backward, e.g. re-streaming or random access to an earlier entry,
/// transparently rebuilds the data source from the start.
#[derive(Debug)]
pub struct BundleReader {
    header: BundleHeader,
    entries: Vec<EntryDescriptor>,
    source: Option<DataSource>,
    source_opens: u64,
}

impl BundleReader {
    /// Open a bundle file, validate its header and load the entry index.
    pub fn open(path: impl AsRef<Path>) -> BundleResult<BundleReader> {
        let mut file = File::open(path)?;
        let header = BundleHeader::read_from(&mut file)?;

        let mut source = DataSource::open(file, &header)?;
        let entries = read_entry_index(&mut source)?;

        Ok(BundleReader {
            header,
            entries,
            source: Some(source),
            source_opens: 1,
        })
    }

    pub fn header(&self) -> &BundleHeader {
        &self.header
    }

    /// Entry descriptors in offset order.
    pub fn entries(&self) -> &[EntryDescriptor] {
        &self.entries
    }

    /// Number of times the data source has been opened. Stays at 1 for a
    /// single offset-ordered pass; each backward jump adds one.
    pub fn source_opens(&self) -> u64 {
        self.source_opens
    }

    /// Stream the entries in offset order.
    pub fn stream(&mut self) -> Entries<'_> {
        Entries {
            reader: self,
            cursor: 0,
        }
    }

    /// Read a single entry's payload into memory, looked up by name.
    ///
    /// Names are matched against the first descriptor in offset order. This
    /// moves the shared cursor, rebuilding the data source if the entry sits
    /// behind it.
    pub fn read_entry(&mut self, name: &str) -> BundleResult<Bytes> {
        let Some(i) = self.entries.iter().position(|e| e.name == name) else {
            return Err(BundleError::EntryNotFound {
                name: name.to_string(),
            });
        };
        let (offset, size) = (self.entries[i].offset, self.entries[i].size);

        self.advance_to(offset)?;
        let Some(source) = self.source.as_mut() else {
            return Err(BundleError::Closed);
        };

        let mut buf = vec![0; size as usize];
        source
            .read_exact(&mut buf)
            .or_truncated("reading an entry payload")?;
        Ok(buf.into())
    }

    /// Release the underlying file. Streaming after this fails with
    /// [`BundleError::Closed`]; the header and index stay readable. Closing
    /// twice is harmless.
    pub fn close(&mut self) {
        self.source = None;
    }

    /// Move the shared cursor to `offset`, rebuilding the data source first
    /// if the cursor has already passed it.
    fn advance_to(&mut self, offset: u64) -> BundleResult<()> {
        let behind = match self.source.as_ref() {
            Some(source) => source.position() > offset,
            None => return Err(BundleError::Closed),
        };
        if behind {
            self.reopen_source()?;
        }

        match self.source.as_mut() {
            Some(source) => source.skip_to(offset),
            None => Err(BundleError::Closed),
        }
    }

    fn reopen_source(&mut self) -> BundleResult<()> {
        let Some(source) = self.source.take() else {
            return Err(BundleError::Closed);
        };

        let file = source.into_file();
        self.source = Some(DataSource::open(file, &self.header)?);
        self.source_opens += 1;
        Ok(())
    }
}

/// Offset-ordered pass over a bundle's entries.
///
/// Each [`Entries::next_entry`] call skips whatever the previous entry left
/// unread and yields the next one. The borrow rules keep at most one
/// [`Entry`] alive: the previous entry must be dropped before asking for the
/// next.
pub struct Entries<'a> {
    reader: &'a mut BundleReader,
    cursor: usize,
}

impl Entries<'_> {
    /// Advance to the next entry, or `Ok(None)` once all entries are done.
    pub fn next_entry(&mut self) -> BundleResult<Option<Entry<'_>>> {
        let i = self.cursor;
        let Some(descriptor) = self.reader.entries.get(i) else {
            return Ok(None);
        };
        let (offset, size) = (descriptor.offset, descriptor.size);

        self.reader.advance_to(offset)?;
        self.cursor += 1;

        let BundleReader {
            entries, source, ..
        } = &mut *self.reader;
        let Some(source) = source.as_mut() else {
            return Err(BundleError::Closed);
        };

        Ok(Some(Entry {
            descriptor: &entries[i],
            payload: source.take(size),
        }))
    }
}

/// A single entry: its descriptor plus a byte stream over exactly the
/// payload bytes. Reading past the declared size yields EOF.
pub struct Entry<'a> {
    descriptor: &'a EntryDescriptor,
    payload: io::Take<&'a mut DataSource>,
}

impl Entry<'_> {
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn offset(&self) -> u64 {
        self.descriptor.offset
    }

    /// Declared payload size in bytes.
    pub fn size(&self) -> u64 {
        self.descriptor.size
    }
}

impl Read for Entry<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.payload.read(buf)
    }
}
