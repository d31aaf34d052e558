//! One reusable [`Decoder`] per thread.
//!
//! Lazy nodes never own a decoder. When one needs bytes interpreted it checks
//! out the calling thread's decoder, resets it onto its own span, and the
//! guard puts it back when dropped. The decoder is created on the first
//! checkout and its scratch allocation is reused for the life of the thread.
//!
//! A decode must not start another decode on the same thread: the outer
//! cursor would be clobbered. A second checkout while the decoder is out
//! fails with [`Error::DecoderBusy`] instead. Callers that genuinely need
//! nested decoding can create their own [`Decoder`].

use core::{
    cell::RefCell,
    mem,
    ops::{Deref, DerefMut},
};

use crate::{
    Decoder, Span,
    error::{DecodeError, Error},
};

enum Slot {
    /// No decoder has been created on this thread yet.
    Vacant,
    Idle(Decoder),
    /// Checked out by a live [`PooledDecoder`].
    Busy,
}

thread_local! {
    static SLOT: RefCell<Slot> = const { RefCell::new(Slot::Vacant) };
}

#[cfg(test)]
thread_local! {
    static CHECKOUTS: core::cell::Cell<usize> = const { core::cell::Cell::new(0) };
}

/// Number of successful checkouts on this thread.
#[cfg(test)]
pub(crate) fn checkouts() -> usize {
    CHECKOUTS.with(core::cell::Cell::get)
}

/// The calling thread's decoder, returned to the pool on drop.
#[derive(Debug)]
pub struct PooledDecoder {
    decoder: Decoder,
    pooled: bool,
}

impl Deref for PooledDecoder {
    type Target = Decoder;

    fn deref(&self) -> &Decoder {
        &self.decoder
    }
}

impl DerefMut for PooledDecoder {
    fn deref_mut(&mut self) -> &mut Decoder {
        &mut self.decoder
    }
}

impl Drop for PooledDecoder {
    fn drop(&mut self) {
        if !self.pooled {
            return;
        }
        let mut decoder = mem::take(&mut self.decoder);
        decoder.release();
        // The slot is gone if the thread is already tearing down its locals.
        let _ = SLOT.try_with(move |slot| {
            if let Ok(mut slot) = slot.try_borrow_mut() {
                *slot = Slot::Idle(decoder);
            }
        });
    }
}

/// Checks out the calling thread's decoder.
///
/// # Errors
///
/// [`Error::DecoderBusy`] if this thread's decoder is already checked out.
pub fn checkout() -> Result<PooledDecoder, Error> {
    let taken = SLOT.try_with(|slot| {
        let mut slot = slot.borrow_mut();
        match mem::replace(&mut *slot, Slot::Busy) {
            Slot::Vacant => {
                log::trace!("allocating decoder for {:?}", std::thread::current().id());
                Ok(Decoder::new())
            }
            Slot::Idle(decoder) => Ok(decoder),
            Slot::Busy => {
                log::debug!("rejected reentrant decoder checkout");
                Err(Error::DecoderBusy)
            }
        }
    });

    let guard = match taken {
        Ok(Ok(decoder)) => PooledDecoder {
            decoder,
            pooled: true,
        },
        Ok(Err(err)) => return Err(err),
        // Thread-local storage is being destroyed; fall back to a one-off.
        Err(_) => PooledDecoder {
            decoder: Decoder::new(),
            pooled: false,
        },
    };

    #[cfg(test)]
    CHECKOUTS.with(|count| count.set(count.get() + 1));

    Ok(guard)
}

/// Checks out the thread's decoder, resets it onto `span` and runs `f`.
///
/// # Errors
///
/// [`Error::DecoderBusy`] on reentrant use, or [`Error::Decode`] with
/// whatever `f` reports.
pub fn with_decoder<T>(
    span: &Span,
    f: impl FnOnce(&mut Decoder) -> Result<T, DecodeError>,
) -> Result<T, Error> {
    let mut decoder = checkout()?;
    decoder.reset(span);
    f(&mut decoder).map_err(|err| {
        log::debug!("decode of {}..{} failed: {err}", span.start(), span.end());
        Error::Decode(err)
    })
}
