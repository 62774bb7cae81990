use std::io::{self, Read, Write};

use super::{CharSink, CharSource};
use crate::error::CsvResult;
use crate::pool::{self, PooledBytes};

/// Shared UTF-8 refill window used by the blocking and async sources.
///
/// Holds a pooled byte buffer plus up to three bytes of a multi-byte
/// sequence split across the previous refill.
pub(super) struct Utf8Frame {
    buf: PooledBytes,
    start: usize,
    end: usize,
    carry: [u8; 4],
    carry_len: usize,
    eof: bool,
}

impl Utf8Frame {
    pub(super) fn new(byte_buffer_size: usize) -> Self {
        let mut buf = pool::rent_bytes(byte_buffer_size);
        buf.resize(byte_buffer_size, 0);
        Self {
            buf,
            start: 0,
            end: 0,
            carry: [0; 4],
            carry_len: 0,
            eof: false,
        }
    }

    /// True when every buffered byte has been decoded and a refill is due.
    pub(super) fn is_drained(&self) -> bool {
        self.start == self.end
    }

    /// Prepares the refill window: restores carried bytes to the front and
    /// returns the writable remainder for the underlying read.
    pub(super) fn refill_window(&mut self) -> &mut [u8] {
        self.buf[..self.carry_len].copy_from_slice(&self.carry[..self.carry_len]);
        self.start = 0;
        self.end = self.carry_len;
        &mut self.buf[self.carry_len..]
    }

    /// Records the outcome of the underlying read into the window returned
    /// by [`Utf8Frame::refill_window`]. Carried bytes left dangling at end
    /// of stream surface as invalid input from the next decode.
    pub(super) fn complete_refill(&mut self, n: usize) {
        self.end += n;
        self.carry_len = 0;
        self.eof = n == 0;
    }

    pub(super) fn at_eof(&self) -> bool {
        self.eof && self.is_drained()
    }

    /// Decodes buffered bytes into `out`, returning how many characters
    /// were produced. An incomplete trailing sequence is moved to the carry
    /// slot for the next refill; at end of stream it is invalid input.
    pub(super) fn decode_into(&mut self, out: &mut [char]) -> io::Result<usize> {
        let mut produced = 0;
        while produced < out.len() && self.start < self.end {
            let chunk = &self.buf[self.start..self.end];
            let (valid, incomplete) = match std::str::from_utf8(chunk) {
                Ok(s) => (s, false),
                Err(e) => {
                    let valid = &chunk[..e.valid_up_to()];
                    match e.error_len() {
                        Some(_) => return Err(invalid_utf8()),
                        // The prefix up to valid_up_to() is well-formed.
                        None => (std::str::from_utf8(valid).unwrap(), true),
                    }
                }
            };
            if valid.is_empty() {
                if incomplete {
                    let rest = self.end - self.start;
                    if self.eof {
                        return Err(invalid_utf8());
                    }
                    self.carry[..rest].copy_from_slice(&self.buf[self.start..self.end]);
                    self.carry_len = rest;
                    self.start = self.end;
                }
                break;
            }
            for c in valid.chars() {
                if produced == out.len() {
                    return Ok(produced);
                }
                out[produced] = c;
                produced += 1;
                self.start += c.len_utf8();
            }
        }
        Ok(produced)
    }
}

fn invalid_utf8() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, "stream is not valid UTF-8")
}

/// Blocking [`CharSource`] decoding UTF-8 from any [`Read`].
pub struct ReadCharSource<R> {
    inner: R,
    frame: Utf8Frame,
}

impl<R: Read> ReadCharSource<R> {
    /// Wraps `inner`, renting a byte buffer of `byte_buffer_size` from the
    /// pool.
    pub fn new(inner: R, byte_buffer_size: usize) -> Self {
        Self {
            inner,
            frame: Utf8Frame::new(byte_buffer_size),
        }
    }
}

impl<R: Read> CharSource for ReadCharSource<R> {
    fn read(&mut self, out: &mut [char]) -> CsvResult<usize> {
        if out.is_empty() {
            return Ok(0);
        }
        loop {
            if self.frame.is_drained() {
                if self.frame.at_eof() {
                    return Ok(0);
                }
                let window = self.frame.refill_window();
                let n = self.inner.read(window)?;
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

/// Blocking [`CharSink`] encoding UTF-8 to any [`Write`], buffering up to
/// the configured byte size between flushes.
pub struct WriteCharSink<W> {
    inner: W,
    buf: PooledBytes,
    capacity: usize,
}

impl<W: Write> WriteCharSink<W> {
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
    pub fn into_inner(mut self) -> CsvResult<W> {
        self.flush()?;
        Ok(self.inner)
    }

    /// A shared reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }
}

impl<W: Write> CharSink for WriteCharSink<W> {
    fn write(&mut self, chars: &str) -> CsvResult<()> {
        let bytes = chars.as_bytes();
        if self.buf.len() + bytes.len() > self.capacity {
            self.inner.write_all(&self.buf)?;
            self.buf.clear();
        }
        if bytes.len() >= self.capacity {
            self.inner.write_all(bytes)?;
        } else {
            self.buf.extend_from_slice(bytes);
        }
        Ok(())
    }

    fn flush(&mut self) -> CsvResult<()> {
        if !self.buf.is_empty() {
            self.inner.write_all(&self.buf)?;
            self.buf.clear();
        }
        self.inner.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(source: &mut impl CharSource) -> String {
        let mut out = [char::default(); 8];
        let mut text = String::new();
        loop {
            let n = source.read(&mut out).unwrap();
            if n == 0 {
                break;
            }
            text.extend(&out[..n]);
        }
        text
    }

    #[test]
    fn decodes_ascii() {
        let mut source = ReadCharSource::new("a,b,c\n1,2,3".as_bytes(), 16);
        assert_eq!(read_all(&mut source), "a,b,c\n1,2,3");
    }

    #[test]
    fn multibyte_sequence_split_across_refills() {
        // "é" is two bytes; a 17-byte payload with a 16-byte buffer splits it.
        let text = "aaaaaaaaaaaaaaaé";
        let mut source = ReadCharSource::new(text.as_bytes(), 16);
        assert_eq!(read_all(&mut source), text);
    }

    #[test]
    fn invalid_utf8_is_an_io_error() {
        let bytes: &[u8] = &[b'a', 0xff, b'b'];
        let mut source = ReadCharSource::new(bytes, 16);
        let mut out = [char::default(); 4];
        let mut saw_error = false;
        for _ in 0..3 {
            match source.read(&mut out) {
                Err(crate::CsvError::Io(e)) => {
                    assert_eq!(e.kind(), io::ErrorKind::InvalidData);
                    saw_error = true;
                    break;
                }
                Err(other) => panic!("unexpected error: {other}"),
                Ok(0) => break,
                Ok(_) => continue,
            }
        }
        assert!(saw_error);
    }

    #[test]
    fn truncated_sequence_at_eof_is_an_error() {
        let bytes: &[u8] = "é".as_bytes();
        let mut source = ReadCharSource::new(&bytes[..1], 16);
        let mut out = [char::default(); 4];
        assert!(source.read(&mut out).is_err());
    }

    #[test]
    fn sink_buffers_until_flush() {
        let mut sink = WriteCharSink::new(Vec::new(), 64);
        sink.write("a,b").unwrap();
        sink.write("\n").unwrap();
        assert!(sink.inner.is_empty());
        sink.flush().unwrap();
        assert_eq!(sink.inner, b"a,b\n");
    }

    #[test]
    fn oversized_write_bypasses_buffer() {
        let mut sink = WriteCharSink::new(Vec::new(), 16);
        let long = "x".repeat(40);
        sink.write(&long).unwrap();
        assert_eq!(sink.inner.len(), 40);
    }
}
