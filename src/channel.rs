//! Failure signal raised from inside bitstream library callbacks.
//!
//! Library callbacks (the encoder's output sink, row producers) cannot return
//! our error type through the library. Instead they [`raise`] on the channel
//! owned by the running [`Decoder`](crate::Decoder) or
//! [`Encoder`](crate::Encoder), hand the library a generic failure, and return
//! normally. Every library call is followed by a [`check`] that prefers the
//! raised fault over whatever the library reported, and the public operation
//! [`settle`]s its result once on the way out. Library contexts live on the
//! operation's stack, so they are dropped on every path.
//!
//! [`raise`]: ErrorChannel::raise
//! [`check`]: ErrorChannel::check
//! [`settle`]: ErrorChannel::settle

use core::cell::Cell;

use crate::error::CodecError;

/// Conversion from a library's own error type.
pub(crate) trait LibraryError {
    fn into_codec_error(self) -> CodecError;
}

/// One pending fault, scoped to a single public operation.
#[derive(Default)]
pub(crate) struct ErrorChannel {
    fault: Cell<Option<CodecError>>,
}

impl core::fmt::Debug for ErrorChannel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ErrorChannel")
            .field("raised", &self.is_raised())
            .finish()
    }
}

/// Library failures are worth a warning; caller mistakes and limit hits are not.
fn abort_level(err: &CodecError) -> log::Level {
    match err {
        CodecError::Library { .. } => log::Level::Warn,
        _ => log::Level::Debug,
    }
}

impl ErrorChannel {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Start an operation with no pending fault.
    pub(crate) fn arm(&self) {
        self.fault.set(None);
    }

    /// Record a fatal error from inside a library callback. The first fault
    /// of an operation wins.
    pub(crate) fn raise(&self, err: CodecError) {
        let pending = self.fault.take();
        self.fault.set(Some(pending.unwrap_or(err)));
    }

    pub(crate) fn is_raised(&self) -> bool {
        let pending = self.fault.take();
        let raised = pending.is_some();
        self.fault.set(pending);
        raised
    }

    /// Checkpoint after a library call.
    pub(crate) fn check<T, E: LibraryError>(&self, result: Result<T, E>) -> Result<T, CodecError> {
        match (result, self.fault.take()) {
            (_, Some(fault)) => Err(fault),
            (Ok(value), None) => Ok(value),
            (Err(err), None) => Err(err.into_codec_error()),
        }
    }

    /// Close the operation: a fault still pending turns success into failure.
    pub(crate) fn settle<T>(&self, result: Result<T, CodecError>) -> Result<T, CodecError> {
        let result = match (result, self.fault.take()) {
            (_, Some(fault)) => Err(fault),
            (result, None) => result,
        };
        if let Err(err) = &result {
            log::log!(abort_level(err), "operation aborted: {err}");
        }
        result
    }
}
