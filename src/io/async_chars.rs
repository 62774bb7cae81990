//! Cooperative-async character sources and sinks.
//!
//! These mirror the blocking [`CharSource`](super::CharSource) and
//! [`CharSink`](super::CharSink) seams over tokio streams. Every call
//! checks the supplied [`CancellationToken`] before touching the
//! underlying stream, so a cancelled token surfaces as
//! [`CsvError::Cancelled`] at the next refill or flush.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

use super::chars::Utf8Frame;
use crate::error::{CsvError, CsvResult};
use crate::pool::{self, PooledBytes};

/// A cooperative stream of characters.
pub trait AsyncCharSource {
    /// Fills `out` with decoded characters, returning how many were
    /// produced. Returns 0 only at end of stream.
    fn read(
        &mut self,
        out: &mut [char],
        cancel: &CancellationToken,
    ) -> impl std::future::Future<Output = CsvResult<usize>>;
}

/// A cooperative sink for characters.
pub trait AsyncCharSink {
    /// Accepts a run of characters. The sink may buffer.
    fn write(
        &mut self,
        chars: &str,
        cancel: &CancellationToken,
    ) -> impl std::future::Future<Output = CsvResult<()>>;

    /// Drains any buffered characters to the underlying stream.
    fn flush(
        &mut self,
        cancel: &CancellationToken,
    ) -> impl std::future::Future<Output = CsvResult<()>>;
}

/// [`AsyncCharSource`] decoding UTF-8 from any [`AsyncRead`].
pub struct AsyncReadCharSource<R> {
    inner: R,
    frame: Utf8Frame,
}

impl<R: AsyncRead + Unpin> AsyncReadCharSource<R> {
    /// Wraps `inner`, renting a byte buffer of `byte_buffer_size` from the
    /// pool.
    pub fn new(inner: R, byte_buffer_size: usize) -> Self {
        Self {
            inner,
            frame: Utf8Frame::new(byte_buffer_size),
        }
    }
}

impl<R: AsyncRead + Unpin> AsyncCharSource for AsyncReadCharSource<R> {
    async fn read(&mut self, out: &mut [char], cancel: &CancellationToken) -> CsvResult<usize> {
        if out.is_empty() {
            return Ok(0);
        }
        loop {
            if self.frame.is_drained() {
                if self.frame.at_eof() {
                    return Ok(0);
                }
                if cancel.is_cancelled() {
                    return Err(CsvError::Cancelled);
                }
                let window = self.frame.refill_window();
                let n = self.inner.read(window).await?;
                self.frame.complete_refill(n);
                if self.frame.at_eof() {
                    return Ok(0);
                }
            }
            let produced = self.frame.decode_into(out)?;
            if produced > 0 {
                return Ok(produced);
            }
        }
    }
}

/// [`AsyncCharSink`] encoding UTF-8 to any [`AsyncWrite`], buffering up to
/// the configured byte size between flushes.
pub struct AsyncWriteCharSink<W> {
    inner: W,
    buf: PooledBytes,
    capacity: usize,
}

impl<W: AsyncWrite + Unpin> AsyncWriteCharSink<W> {
    /// Wraps `inner`, renting a byte buffer of `byte_buffer_size` from the
    /// pool.
    pub fn new(inner: W, byte_buffer_size: usize) -> Self {
        Self {
            inner,
            buf: pool::rent_bytes(byte_buffer_size),
            capacity: byte_buffer_size,
        }
    }

    /// Consumes the sink, flushing and returning the underlying writer.
    pub async fn into_inner(mut self, cancel: &CancellationToken) -> CsvResult<W> {
        AsyncCharSink::flush(&mut self, cancel).await?;
        Ok(self.inner)
    }

    /// A shared reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }
}

impl<W: AsyncWrite + Unpin> AsyncCharSink for AsyncWriteCharSink<W> {
    async fn write(&mut self, chars: &str, cancel: &CancellationToken) -> CsvResult<()> {
        let bytes = chars.as_bytes();
        if self.buf.len() + bytes.len() > self.capacity {
            if cancel.is_cancelled() {
                return Err(CsvError::Cancelled);
            }
            self.inner.write_all(&self.buf).await?;
            self.buf.clear();
        }
        if bytes.len() >= self.capacity {
            if cancel.is_cancelled() {
                return Err(CsvError::Cancelled);
            }
            self.inner.write_all(bytes).await?;
        } else {
            self.buf.extend_from_slice(bytes);
        }
        Ok(())
    }

    async fn flush(&mut self, cancel: &CancellationToken) -> CsvResult<()> {
        if cancel.is_cancelled() {
            return Err(CsvError::Cancelled);
        }
        if !self.buf.is_empty() {
            self.inner.write_all(&self.buf).await?;
            self.buf.clear();
        }
        self.inner.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn decodes_from_async_reader() {
        let mut source = AsyncReadCharSource::new("a,b\n".as_bytes(), 16);
        let cancel = CancellationToken::new();
        let mut out = [char::default(); 8];
        let n = source.read(&mut out, &cancel).await.unwrap();
        assert_eq!(out[..n].iter().collect::<String>(), "a,b\n");
        assert_eq!(source.read(&mut out, &cancel).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn cancelled_token_stops_refill() {
        let mut source = AsyncReadCharSource::new("a,b\n".as_bytes(), 16);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut out = [char::default(); 8];
        assert!(matches!(
            source.read(&mut out, &cancel).await,
            Err(CsvError::Cancelled)
        ));
    }

    #[tokio::test]
    async fn sink_flushes_on_demand() {
        let cancel = CancellationToken::new();
        let mut sink = AsyncWriteCharSink::new(Vec::new(), 64);
        sink.write("x,y", &cancel).await.unwrap();
        sink.flush(&cancel).await.unwrap();
        assert_eq!(sink.get_ref(), b"x,y");
    }
}
