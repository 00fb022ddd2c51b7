use std::{
    fs::File,
    io::{self, BufReader, Read, Seek, SeekFrom},
};

use flate2::bufread::ZlibDecoder;

use crate::{
    bundle::BundleHeader,
    error::{BundleError, BundleResult},
};

/// A live view of the (logically decompressed) data section.
///
/// Every [`DataSource::open`] call produces an independent source positioned
/// at the start of the data section, with no state shared between calls.
/// Compressed sources are forward-only: moving the cursor backward means
/// recovering the raw handle with [`DataSource::into_file`] and opening a
/// fresh source from it, then skipping forward again.
#[derive(Debug)]
pub struct DataSource {
    inner: Inner,
    pos: u64,
}

#[derive(Debug)]
enum Inner {
    /// Uncompressed bundle: a buffered, seekable view of the raw file.
    Raw { file: BufReader<File>, start: u64 },
    /// Compressed bundle: a zlib filter over the buffered raw file.
    Compressed(ZlibDecoder<BufReader<File>>),
}

impl DataSource {
    /// Open a fresh data source over `file`, positioned at the start of the
    /// data section described by `header`.
    pub fn open(mut file: File, header: &BundleHeader) -> BundleResult<DataSource> {
        file.seek(SeekFrom::Start(header.header_size()))?;
        let file = BufReader::new(file);

        let inner = if header.is_compressed() {
            Inner::Compressed(ZlibDecoder::new(file))
        } else {
            Inner::Raw {
                file,
                start: header.header_size(),
            }
        };

        Ok(DataSource { inner, pos: 0 })
    }

    /// Current logical offset within the data section, i.e. bytes consumed
    /// since this source was opened.
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Move the cursor forward to `target`.
    ///
    /// Raw sources seek directly; compressed sources read and discard the
    /// intervening bytes, failing with `TruncatedData` if the stream ends
    /// first. Backward targets are an error: callers must recreate the
    /// source instead.
    pub fn skip_to(&mut self, target: u64) -> BundleResult<()> {
        if target < self.pos {
            return Err(BundleError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot skip backward from {} to {}", self.pos, target),
            )));
        }
        if target == self.pos {
            return Ok(());
        }

        match &mut self.inner {
            Inner::Raw { file, start } => {
                file.seek(SeekFrom::Start(start.saturating_add(target)))?;
                self.pos = target;
            }
            Inner::Compressed(decoder) => {
                let want = target - self.pos;
                let skipped = io::copy(&mut decoder.take(want), &mut io::sink())?;
                self.pos += skipped;
                if skipped < want {
                    return Err(BundleError::TruncatedData {
                        action: "skipping to an entry payload",
                    });
                }
            }
        }

        Ok(())
    }

    /// Tear the source down and recover the raw file handle, discarding any
    /// decompression state.
    pub fn into_file(self) -> File {
        match self.inner {
            Inner::Raw { file, .. } => file.into_inner(),
            Inner::Compressed(decoder) => decoder.into_inner().into_inner(),
        }
    }
}

impl Read for DataSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = match &mut self.inner {
            Inner::Raw { file, .. } => file.read(buf)?,
            Inner::Compressed(decoder) => decoder.read(buf)?,
        };
        self.pos += n as u64;
        Ok(n)
    }
}
