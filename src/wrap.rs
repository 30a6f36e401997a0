//! Greedy word wrapping to the display width without allocation.
//!
//! Words are separated by any whitespace and joined with single spaces in the output.
//! A word longer than the line is broken, first filling whatever room is left on the
//! current line. Breaks always land on `char` boundaries.

use core::fmt::Display;

use crate::state::LINE_WIDTH;

/// One wrapped line of at most 16 bytes.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Chunk {
    buf: [u8; LINE_WIDTH],
    len: u8,
}

impl Chunk {
    const fn new() -> Self {
        Chunk {
            buf: [b' '; LINE_WIDTH],
            len: 0,
        }
    }

    pub fn as_str(&self) -> &str {
        // only ever filled from whole `char`s of a `&str`
        core::str::from_utf8(&self.buf[..self.len as usize]).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn room(&self) -> usize {
        LINE_WIDTH - self.len as usize
    }

    fn push(&mut self, text: &str) {
        let start = self.len as usize;
        self.buf[start..start + text.len()].copy_from_slice(text.as_bytes());
        self.len += text.len() as u8;
    }
}

impl AsRef<str> for Chunk {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Display for Chunk {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lazy iterator over the wrapped lines of a text. Cloning it restarts from the same
/// position, and `wrap` can be called again on the same text at any time.
#[derive(Debug, Clone)]
pub struct Wrap<'a> {
    rest: &'a str,
}

/// Wrap `text` into chunks that fit on one display line.
pub fn wrap(text: &str) -> Wrap<'_> {
    Wrap { rest: text }
}

impl<'a> Wrap<'a> {
    /// The next whitespace-delimited word, without consuming it.
    fn peek_word(&self) -> &'a str {
        let rest = self.rest.trim_start();
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        &rest[..end]
    }

    fn skip_whitespace(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn consume(&mut self, count: usize) {
        self.rest = &self.rest[count..];
    }
}

impl Iterator for Wrap<'_> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        let mut chunk = Chunk::new();
        loop {
            self.skip_whitespace();
            let word = self.peek_word();
            if word.is_empty() {
                break;
            }
            let separator = usize::from(!chunk.is_empty());
            if separator + word.len() <= chunk.room() {
                if separator == 1 {
                    chunk.push(" ");
                }
                chunk.push(word);
                self.consume(word.len());
                continue;
            }
            if word.len() > LINE_WIDTH {
                // break the long word into the space that is left
                let room = chunk.room().saturating_sub(separator);
                let split = floor_char_boundary(word, room);
                if split > 0 {
                    if separator == 1 {
                        chunk.push(" ");
                    }
                    chunk.push(&word[..split]);
                    self.consume(split);
                }
            }
            break;
        }
        if chunk.is_empty() {
            None
        } else {
            Some(chunk)
        }
    }
}

fn floor_char_boundary(text: &str, index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    (0..=index)
        .rev()
        .find(|&idx| text.is_char_boundary(idx))
        .unwrap_or(0)
}
