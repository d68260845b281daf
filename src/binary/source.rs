//! Random-access byte sources backing a phone data file.
//!
//! All reads are positioned, so a source can be shared between threads
//! as long as the implementation itself is `Sync`. Memory maps and
//! in-memory buffers need no locking; [`FileSource`] serializes access
//! to the file cursor with a mutex.

use memmap2::Mmap;
use parking_lot::Mutex;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

/// Chunk size for buffered terminator scans.
const READ_CHUNK: usize = 64;

/// Read-only, randomly addressable bytes.
pub trait ByteSource {
    /// Total length in bytes.
    fn len(&self) -> u64;

    /// Whether the source holds no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fill `buf` with the bytes starting at `offset`.
    ///
    /// Fails with `UnexpectedEof` if the source ends first.
    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<()>;

    /// Read from `offset` up to, not including, the first `terminator`.
    ///
    /// Fails with `UnexpectedEof` if the source ends before a terminator.
    fn read_until(&self, offset: u64, terminator: u8) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut chunk = [0u8; READ_CHUNK];
        let mut pos = offset;

        loop {
            let remaining = self.len().saturating_sub(pos);
            if remaining == 0 {
                return Err(unexpected_eof());
            }
            let n = remaining.min(READ_CHUNK as u64) as usize;
            self.read_exact_at(pos, &mut chunk[..n])?;

            if let Some(end) = chunk[..n].iter().position(|&b| b == terminator) {
                out.extend_from_slice(&chunk[..end]);
                return Ok(out);
            }
            out.extend_from_slice(&chunk[..n]);
            pos += n as u64;
        }
    }
}

fn unexpected_eof() -> io::Error {
    io::Error::from(io::ErrorKind::UnexpectedEof)
}

fn slice_read_exact_at(data: &[u8], offset: u64, buf: &mut [u8]) -> io::Result<()> {
    let start = usize::try_from(offset).map_err(|_| unexpected_eof())?;
    let end = start
        .checked_add(buf.len())
        .filter(|&end| end <= data.len())
        .ok_or_else(unexpected_eof)?;
    buf.copy_from_slice(&data[start..end]);
    Ok(())
}

fn slice_read_until(data: &[u8], offset: u64, terminator: u8) -> io::Result<Vec<u8>> {
    let start = usize::try_from(offset)
        .ok()
        .filter(|&start| start <= data.len())
        .ok_or_else(unexpected_eof)?;
    let tail = &data[start..];
    match tail.iter().position(|&b| b == terminator) {
        Some(end) => Ok(tail[..end].to_vec()),
        None => Err(unexpected_eof()),
    }
}

impl ByteSource for [u8] {
    fn len(&self) -> u64 {
        <[u8]>::len(self) as u64
    }

    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        slice_read_exact_at(self, offset, buf)
    }

    fn read_until(&self, offset: u64, terminator: u8) -> io::Result<Vec<u8>> {
        slice_read_until(self, offset, terminator)
    }
}

impl ByteSource for Vec<u8> {
    fn len(&self) -> u64 {
        <[u8]>::len(self) as u64
    }

    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        slice_read_exact_at(self, offset, buf)
    }

    fn read_until(&self, offset: u64, terminator: u8) -> io::Result<Vec<u8>> {
        slice_read_until(self, offset, terminator)
    }
}

impl ByteSource for Mmap {
    fn len(&self) -> u64 {
        <[u8]>::len(self) as u64
    }

    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        slice_read_exact_at(self, offset, buf)
    }

    fn read_until(&self, offset: u64, terminator: u8) -> io::Result<Vec<u8>> {
        slice_read_until(self, offset, terminator)
    }
}

impl<T: ByteSource + ?Sized> ByteSource for &T {
    fn len(&self) -> u64 {
        (**self).len()
    }

    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        (**self).read_exact_at(offset, buf)
    }

    fn read_until(&self, offset: u64, terminator: u8) -> io::Result<Vec<u8>> {
        (**self).read_until(offset, terminator)
    }
}

/// A plain file read through a shared, mutex-guarded cursor.
///
/// The length is captured at open time; the file is expected not to
/// change while the source is alive.
#[derive(Debug)]
pub struct FileSource {
    file: Mutex<File>,
    len: u64,
}

impl FileSource {
    /// Open a file for positioned reads.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        Ok(Self {
            file: Mutex::new(file),
            len,
        })
    }
}

impl ByteSource for FileSource {
    fn len(&self) -> u64 {
        self.len
    }

    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(buf)
    }
}
