//! The filter chain contract: `fill` / `flush` / `close` / `describe`.
//!
//! The original pipeline this crate's design is grounded in dispatches
//! on a function pointer keyed by a control code. Per this crate's own
//! design note on that point, the cleaner reformulation is a small
//! trait: filters form a strict chain (no cyclic upstream/downstream
//! linking is needed), each one pulling from or pushing to the next.
//! [`crate::armor::Reader`] and [`crate::armor::Writer`] carry the
//! actual state machines; the adapters here just give them (and a
//! pass-through [`Identity`] filter for bypass mode) a uniform shape so
//! a caller can hold a `Box<dyn Filter>` chain without naming the
//! concrete filter in the middle.

use std::io::{Read, Write};

use crate::armor;
use crate::Result;

/// A pull-or-push stage in a filter chain.
///
/// Read-path filters implement [`Filter::fill`]; write-path filters
/// implement [`Filter::flush`] and [`Filter::close`]. A filter that
/// doesn't support a direction returns `Ok(0)` / `Ok(())` for the
/// unsupported calls rather than erroring, matching the teacher
/// crate's tolerant `Read`/`Write` adapters (e.g. `armor::Writer`
/// ignores reads; nothing in this crate's chain calls the wrong
/// direction in practice, since the dispatcher picks a filter for the
/// direction it needs).
pub trait Filter {
    /// Pulls more decoded bytes into `buf`, returning the number
    /// written (0 at EOF).
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Pushes `buf` through the encoder toward the sink.
    fn flush(&mut self, buf: &[u8]) -> Result<()>;

    /// Finalizes the filter: flushes any pending partial group and
    /// writes a trailer, if this filter has one. Idempotent.
    fn close(&mut self) -> Result<()>;

    /// A short, human-readable name for diagnostics.
    fn describe(&self) -> &'static str;
}

/// A no-op filter used for bypass mode: input that was detected as
/// already binary (not armored) passes through byte-for-byte.
pub struct Identity<T> {
    inner: T,
}

impl<T> Identity<T> {
    pub fn new(inner: T) -> Self {
        Identity { inner }
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}
assert_send_and_sync!(Identity<T> where T: Send);

impl<R: Read> Filter for Identity<R> {
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        Ok(self.inner.read(buf).map_err(crate::Error::from)?)
    }

    fn flush(&mut self, _buf: &[u8]) -> Result<()> {
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    fn describe(&self) -> &'static str {
        "identity (bypass)"
    }
}

/// Read-path armor filter: decodes an ASCII-armored (or
/// already-bypassed) stream into binary packet bytes.
pub struct ArmorReader {
    reader: armor::Reader,
}
assert_send_and_sync!(ArmorReader);

impl ArmorReader {
    pub fn new<R: Read>(inner: R, opts: armor::ReaderOptions) -> Result<Self> {
        Ok(ArmorReader {
            reader: armor::Reader::new(inner, opts)?,
        })
    }

    /// The armor kind detected, or `None` if the stream bypassed
    /// armor entirely.
    pub fn kind(&self) -> Option<armor::Kind> {
        self.reader.kind()
    }
}

impl Filter for ArmorReader {
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        Ok(self.reader.read(buf).map_err(crate::Error::from)?)
    }

    fn flush(&mut self, _buf: &[u8]) -> Result<()> {
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    fn describe(&self) -> &'static str {
        "armor decoder"
    }
}

/// Write-path armor filter: encodes binary packet bytes pushed to it
/// into an ASCII-armored stream.
pub struct ArmorWriter<W: Write> {
    writer: Option<armor::Writer<W>>,
}
assert_send_and_sync!(ArmorWriter<W> where W: Write);

impl<W: Write> ArmorWriter<W> {
    pub fn new(inner: W, kind: armor::Kind) -> Result<Self> {
        Ok(ArmorWriter {
            writer: Some(armor::Writer::new(inner, kind)?),
        })
    }

    /// Closes the filter and returns the underlying sink.
    pub fn into_inner(mut self) -> Result<W> {
        self.writer
            .take()
            .ok_or_else(|| anyhow::anyhow!("ArmorWriter used after close"))?
            .finalize()
    }
}

impl<W: Write> Filter for ArmorWriter<W> {
    fn fill(&mut self, _buf: &mut [u8]) -> Result<usize> {
        Ok(0)
    }

    fn flush(&mut self, buf: &[u8]) -> Result<()> {
        let w = self
            .writer
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("ArmorWriter used after close"))?;
        w.write_all(buf).map_err(crate::Error::from)?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        // `finalize` is consuming; since `close` only has `&mut self`,
        // swap the writer out, finalize it, and drop the result (the
        // sink itself isn't reachable from here -- `into_inner` is the
        // path that needs it back).
        if let Some(w) = self.writer.take() {
            let _ = w.finalize()?;
        }
        Ok(())
    }

    fn describe(&self) -> &'static str {
        "armor encoder"
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn identity_passes_through() {
        let mut f = Identity::new(&b"hello"[..]);
        let mut buf = [0u8; 5];
        let n = f.fill(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"hello");
        assert_eq!(f.describe(), "identity (bypass)");
    }

    #[test]
    fn armor_writer_then_reader_round_trip() {
        let mut w = ArmorWriter::new(Vec::new(), armor::Kind::Message).unwrap();
        w.flush(b"payload").unwrap();
        let armored = w.into_inner().unwrap();

        let mut r = ArmorReader::new(&armored[..], armor::ReaderOptions::default()).unwrap();
        let mut out = Vec::new();
        let mut buf = [0u8; 16];
        loop {
            let n = r.fill(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        assert_eq!(out, b"payload");
        assert_eq!(r.kind(), Some(armor::Kind::Message));
    }
}
