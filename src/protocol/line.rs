//! Assembling serial bytes into command lines.

use heapless::Vec;

/// Fixed-capacity line assembler.
///
/// Lines end at `\n`; `\r` is dropped wherever it appears. A line longer than
/// `N` bytes is discarded in full, up to and including its newline.
#[derive(Debug, Default)]
pub struct LineBuffer<const N: usize> {
    buf: Vec<u8, N>,
    /// Current line ran past capacity
    overflowed: bool,
    /// `buf` holds a finished line
    complete: bool,
}

impl<const N: usize> LineBuffer<N> {
    /// Create an empty buffer.
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            overflowed: false,
            complete: false,
        }
    }

    /// Feed one byte.
    ///
    /// Returns `true` when this byte finished a usable line, which is then
    /// available from [`line`](Self::line) until the next call.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.complete {
            self.buf.clear();
            self.complete = false;
        }

        match byte {
            b'\r' => false,
            b'\n' => {
                if self.overflowed {
                    self.overflowed = false;
                    self.buf.clear();
                    return false;
                }
                self.complete = core::str::from_utf8(&self.buf).is_ok();
                if !self.complete {
                    warn!("dropping non-UTF-8 line");
                    self.buf.clear();
                }
                self.complete
            }
            _ => {
                if !self.overflowed && self.buf.push(byte).is_err() {
                    warn!("line longer than {} bytes dropped", N);
                    self.overflowed = true;
                    self.buf.clear();
                }
                false
            }
        }
    }

    /// The line finished by the last `push`, if any.
    pub fn line(&self) -> Option<&str> {
        if !self.complete {
            return None;
        }
        core::str::from_utf8(&self.buf).ok()
    }

    /// Bytes of the line being assembled.
    #[inline]
    pub fn pending(&self) -> usize {
        if self.complete {
            0
        } else {
            self.buf.len()
        }
    }

    /// Drop any partial line.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.overflowed = false;
        self.complete = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed<const N: usize>(lines: &mut LineBuffer<N>, text: &str) -> Option<std::string::String> {
        let mut last = None;
        for &byte in text.as_bytes() {
            if lines.push(byte) {
                last = lines.line().map(|l| l.to_string());
            }
        }
        last
    }

    #[test]
    fn test_assembles_crlf_lines() {
        let mut lines = LineBuffer::<32>::new();
        assert_eq!(feed(&mut lines, "SET_"), None);
        assert_eq!(lines.pending(), 4);
        assert_eq!(feed(&mut lines, "SPEED 400\r\n").as_deref(), Some("SET_SPEED 400"));
        assert_eq!(feed(&mut lines, "START\n").as_deref(), Some("START"));
        assert_eq!(lines.pending(), 0);
    }

    #[test]
    fn test_empty_line() {
        let mut lines = LineBuffer::<8>::new();
        assert!(lines.push(b'\n'));
        assert_eq!(lines.line(), Some(""));
        lines.push(b'A');
        assert_eq!(lines.line(), None);
    }

    #[test]
    fn test_overlong_line_discarded() {
        let mut lines = LineBuffer::<8>::new();
        assert_eq!(feed(&mut lines, "JOG_FORWARD\n"), None);
        assert_eq!(feed(&mut lines, "HOME\n").as_deref(), Some("HOME"));
    }

    #[test]
    fn test_invalid_utf8_dropped() {
        let mut lines = LineBuffer::<8>::new();
        lines.push(0xFF);
        assert!(!lines.push(b'\n'));
        assert_eq!(lines.line(), None);
        assert_eq!(feed(&mut lines, "STOP\n").as_deref(), Some("STOP"));
    }
}
