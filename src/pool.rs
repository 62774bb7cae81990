//! Process-wide buffer pool.
//!
//! Readers, writers and parsers rent their scratch buffers here at
//! construction and return them on drop, keeping steady-state allocations
//! bounded regardless of row count. Between rows a rented buffer is only
//! reset (length cleared, capacity kept); it goes back to the free list
//! exactly once, when its guard is dropped.

use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, OnceLock};

use crate::parser::FieldToken;

/// Buffers below this capacity are not worth pooling.
pub(crate) const MIN_BUFFER_SIZE: usize = 16;

const MAX_POOLED_PER_LIST: usize = 32;

struct BufferPool {
    chars: Mutex<Vec<String>>,
    bytes: Mutex<Vec<Vec<u8>>>,
    tokens: Mutex<Vec<Vec<FieldToken>>>,
}

static POOL: OnceLock<BufferPool> = OnceLock::new();

fn pool() -> &'static BufferPool {
    POOL.get_or_init(|| BufferPool {
        chars: Mutex::new(Vec::new()),
        bytes: Mutex::new(Vec::new()),
        tokens: Mutex::new(Vec::new()),
    })
}

/// Rents a character buffer with at least `capacity` bytes reserved.
pub(crate) fn rent_chars(capacity: usize) -> PooledChars {
    let mut buf = match pool().chars.lock() {
        Ok(mut list) => list.pop().unwrap_or_default(),
        Err(_) => String::new(),
    };
    if buf.capacity() < capacity {
        // The buffer is empty here, so this reserves `capacity` total.
        buf.reserve(capacity);
    }
    PooledChars { buf: Some(buf) }
}

/// Rents a byte buffer with at least `capacity` bytes reserved.
pub(crate) fn rent_bytes(capacity: usize) -> PooledBytes {
    let mut buf = match pool().bytes.lock() {
        Ok(mut list) => list.pop().unwrap_or_default(),
        Err(_) => Vec::new(),
    };
    if buf.capacity() < capacity {
        buf.reserve(capacity);
    }
    PooledBytes { buf: Some(buf) }
}

/// Rents a field-token list.
pub(crate) fn rent_tokens() -> PooledTokens {
    let buf = match pool().tokens.lock() {
        Ok(mut list) => list.pop().unwrap_or_default(),
        Err(_) => Vec::new(),
    };
    PooledTokens { buf: Some(buf) }
}

/// RAII guard over a pooled `String`; returns it to the pool on drop.
pub(crate) struct PooledChars {
    buf: Option<String>,
}

impl Deref for PooledChars {
    type Target = String;

    fn deref(&self) -> &String {
        self.buf.as_ref().expect("pooled buffer taken")
    }
}

impl DerefMut for PooledChars {
    fn deref_mut(&mut self) -> &mut String {
        self.buf.as_mut().expect("pooled buffer taken")
    }
}

impl Drop for PooledChars {
    fn drop(&mut self) {
        if let Some(mut buf) = self.buf.take() {
            buf.clear();
            if let Ok(mut list) = pool().chars.lock() {
                if list.len() < MAX_POOLED_PER_LIST {
                    list.push(buf);
                }
            }
        }
    }
}

/// RAII guard over a pooled `Vec<u8>`.
pub(crate) struct PooledBytes {
    buf: Option<Vec<u8>>,
}

impl Deref for PooledBytes {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        self.buf.as_ref().expect("pooled buffer taken")
    }
}

impl DerefMut for PooledBytes {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        self.buf.as_mut().expect("pooled buffer taken")
    }
}

impl Drop for PooledBytes {
    fn drop(&mut self) {
        if let Some(mut buf) = self.buf.take() {
            buf.clear();
            if let Ok(mut list) = pool().bytes.lock() {
                if list.len() < MAX_POOLED_PER_LIST {
                    list.push(buf);
                }
            }
        }
    }
}

/// RAII guard over a pooled token list.
pub(crate) struct PooledTokens {
    buf: Option<Vec<FieldToken>>,
}

impl Deref for PooledTokens {
    type Target = Vec<FieldToken>;

    fn deref(&self) -> &Vec<FieldToken> {
        self.buf.as_ref().expect("pooled buffer taken")
    }
}

impl DerefMut for PooledTokens {
    fn deref_mut(&mut self) -> &mut Vec<FieldToken> {
        self.buf.as_mut().expect("pooled buffer taken")
    }
}

impl Drop for PooledTokens {
    fn drop(&mut self) {
        if let Some(mut buf) = self.buf.take() {
            buf.clear();
            if let Ok(mut list) = pool().tokens.lock() {
                if list.len() < MAX_POOLED_PER_LIST {
                    list.push(buf);
                }
            }
        }
    }
}
