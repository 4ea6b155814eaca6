//! Growable output buffer that encoders stream compressed bytes into.

use std::io;

use crate::channel::ErrorChannel;
use crate::error::CodecError;

/// Smallest first allocation.
pub const MIN_CAPACITY: usize = 16 * 1024;

/// Append-only byte store with amortized growth.
///
/// Capacity never shrinks while the buffer holds storage; [`clear`] keeps it
/// and [`take`] hands it to the caller. Growth at least doubles capacity, or
/// satisfies the request if that is larger.
///
/// [`clear`]: Self::clear
/// [`take`]: Self::take
#[derive(Debug, Default)]
pub struct GrowableByteBuffer {
    bytes: Vec<u8>,
    /// Hard cap on the logical length, if any.
    max_len: Option<usize>,
}

impl GrowableByteBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    /// Refuse to grow past `max_len` bytes of content.
    pub fn set_max_len(&mut self, max_len: Option<usize>) {
        self.max_len = max_len;
    }

    /// Make room for `additional` more bytes.
    pub fn reserve(&mut self, additional: usize) -> Result<(), CodecError> {
        let len = self.bytes.len();
        let required = len
            .checked_add(additional)
            .ok_or(CodecError::AllocationFailure { bytes: usize::MAX })?;
        if let Some(max) = self.max_len {
            if required > max {
                return Err(CodecError::LimitExceeded(format!(
                    "encoded output {required} bytes exceeds limit {max}"
                )));
            }
        }

        let capacity = self.bytes.capacity();
        let target = if capacity == 0 {
            additional.max(MIN_CAPACITY)
        } else if required > capacity {
            capacity.saturating_mul(2).max(required)
        } else {
            return Ok(());
        };

        log::trace!("output buffer grows {capacity} -> {target} bytes");
        self.bytes
            .try_reserve_exact(target - len)
            .map_err(|_| CodecError::AllocationFailure { bytes: target })
    }

    /// Append `data`, growing as needed.
    pub fn write(&mut self, data: &[u8]) -> Result<(), CodecError> {
        self.reserve(data.len())?;
        self.bytes.extend_from_slice(data);
        Ok(())
    }

    /// Drop the content but keep the storage.
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Move the content out together with its storage.
    ///
    /// The buffer is left with no storage, so the next reserve starts over
    /// from [`MIN_CAPACITY`].
    pub fn take(&mut self) -> Vec<u8> {
        core::mem::take(&mut self.bytes)
    }
}

/// `io::Write` adapter that bitstream encoders stream into.
///
/// A failed append is raised on the operation's [`ErrorChannel`] before the
/// library sees a plain I/O error, so the caller gets the real cause.
pub(crate) struct BufferSink<'a> {
    buffer: &'a mut GrowableByteBuffer,
    channel: &'a ErrorChannel,
}

impl<'a> BufferSink<'a> {
    pub(crate) fn new(buffer: &'a mut GrowableByteBuffer, channel: &'a ErrorChannel) -> Self {
        Self { buffer, channel }
    }
}

impl io::Write for BufferSink<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.buffer.write(buf) {
            Ok(()) => Ok(buf.len()),
            Err(err) => {
                self.channel.raise(err);
                Err(io::Error::new(
                    io::ErrorKind::OutOfMemory,
                    "output buffer refused append",
                ))
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
