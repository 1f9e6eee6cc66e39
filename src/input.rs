//! Line-oriented command input.
//!
//! [`LineAssembler`] turns a raw byte stream (a UART, stdin) into bounded
//! command lines. [`CommandInput`] is the seam the scheduler reads from.

/// Longest accepted command line. `timing100000,100000,100000` fits.
pub const MAX_LINE_LEN: usize = 64;

/// One complete command line without its terminator.
pub type CommandLine = heapless::String<MAX_LINE_LEN>;

/// Source of complete command lines.
///
/// Must not block: return `None` when no full line is available yet.
pub trait CommandInput {
    /// Next complete line, if one is ready.
    fn poll_line(&mut self) -> Option<CommandLine>;
}

/// Accumulates bytes into lines.
///
/// `\r`, `\n`, and `\r\n` all terminate a line. A line longer than
/// [`MAX_LINE_LEN`] is dropped whole, up to and including its terminator,
/// so a truncated command is never dispatched.
///
/// # Example
///
/// ```rust
/// use stepper_signal::input::LineAssembler;
///
/// let mut assembler = LineAssembler::new();
/// let mut lines = Vec::new();
/// for b in b"f100\r\ntraffic\n" {
///     if let Some(line) = assembler.push_byte(*b) {
///         lines.push(line);
///     }
/// }
/// assert_eq!(lines, ["f100", "traffic"]);
/// ```
#[derive(Debug, Default)]
pub struct LineAssembler {
    buf: CommandLine,
    overflowed: bool,
    after_cr: bool,
}

impl LineAssembler {
    /// Empty assembler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte; returns a line when `byte` completes one.
    pub fn push_byte(&mut self, byte: u8) -> Option<CommandLine> {
        let after_cr = core::mem::replace(&mut self.after_cr, byte == b'\r');

        match byte {
            b'\n' if after_cr => None,
            b'\r' | b'\n' => self.finish(),
            _ if self.overflowed => None,
            _ => {
                // non-ASCII bytes can never form a command
                let ch = if byte.is_ascii() { byte as char } else { '?' };
                if self.buf.push(ch).is_err() {
                    log::warn!("input line longer than {} bytes dropped", MAX_LINE_LEN);
                    self.overflowed = true;
                    self.buf.clear();
                }
                None
            }
        }
    }

    fn finish(&mut self) -> Option<CommandLine> {
        if core::mem::take(&mut self.overflowed) {
            return None;
        }
        let line = core::mem::take(&mut self.buf);
        Some(line)
    }

    /// Bytes buffered for the line in progress.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn feed(assembler: &mut LineAssembler, bytes: &[u8]) -> Vec<CommandLine> {
        bytes.iter().filter_map(|b| assembler.push_byte(*b)).collect()
    }

    #[test]
    fn splits_on_any_terminator() {
        let mut a = LineAssembler::new();
        let lines = feed(&mut a, b"red\rgreen\nyellow\r\nstop\n");
        assert_eq!(lines, ["red", "green", "yellow", "stop"]);
    }

    #[test]
    fn crlf_does_not_yield_empty_line() {
        let mut a = LineAssembler::new();
        assert_eq!(feed(&mut a, b"f1\r\n\r\n").len(), 2);
    }

    #[test]
    fn bare_newline_yields_empty_line() {
        let mut a = LineAssembler::new();
        let lines = feed(&mut a, b"\n");
        assert_eq!(lines, [""]);
    }

    #[test]
    fn partial_line_is_buffered() {
        let mut a = LineAssembler::new();
        assert!(feed(&mut a, b"tim").is_empty());
        assert_eq!(a.pending(), 3);
        assert_eq!(feed(&mut a, b"ing\n"), ["timing"]);
        assert_eq!(a.pending(), 0);
    }

    #[test]
    fn overlong_line_is_dropped_whole() {
        let mut a = LineAssembler::new();
        let mut bytes = Vec::new();
        bytes.extend(core::iter::repeat(b'x').take(MAX_LINE_LEN + 10));
        bytes.extend_from_slice(b"\nflash\n");

        assert_eq!(feed(&mut a, &bytes), ["flash"]);
    }

    #[test]
    fn line_of_exactly_max_len_is_kept() {
        let mut a = LineAssembler::new();
        let mut bytes = Vec::new();
        bytes.extend(core::iter::repeat(b'a').take(MAX_LINE_LEN));
        bytes.push(b'\n');

        let lines = feed(&mut a, &bytes);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len(), MAX_LINE_LEN);
    }
}
