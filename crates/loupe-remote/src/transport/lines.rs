//! Incremental newline framing for client streams.

/// Upper bound on a single unterminated line.
pub(crate) const MAX_LINE_BYTES: usize = 64 * 1024;

/// Accumulates bytes and yields complete lines.
///
/// Lines are split on `\n`; a trailing `\r` is removed as well. Bytes after
/// the last newline stay buffered until more data arrives.
#[derive(Debug, Default)]
pub(crate) struct LineBuffer {
    pending: Vec<u8>,
}

/// The buffered partial line grew past [`MAX_LINE_BYTES`].
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct LineTooLong;

impl LineBuffer {
    /// Appends `bytes` and moves every complete, non-empty line into `lines`.
    pub(crate) fn extend(&mut self, bytes: &[u8], lines: &mut Vec<String>) -> Result<(), LineTooLong> {
        self.pending.extend_from_slice(bytes);
        while let Some(position) = self.pending.iter().position(|byte| *byte == b'\n') {
            let mut line: Vec<u8> = self.pending.drain(..=position).collect();
            line.pop();
            push_line(line, lines);
        }
        if self.pending.len() > MAX_LINE_BYTES {
            self.pending.clear();
            return Err(LineTooLong);
        }
        Ok(())
    }

    /// Flushes an unterminated final line once the stream has ended.
    pub(crate) fn finish(&mut self, lines: &mut Vec<String>) {
        push_line(std::mem::take(&mut self.pending), lines);
    }

    /// Number of buffered bytes not yet terminated by a newline.
    pub(crate) fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

fn push_line(mut line: Vec<u8>, lines: &mut Vec<String>) {
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    if !line.is_empty() {
        lines.push(String::from_utf8_lossy(&line).into_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(buffer: &mut LineBuffer, bytes: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        buffer.extend(bytes, &mut lines).expect("within limit");
        lines
    }

    #[test]
    fn splits_lines_and_skips_empty_ones() {
        let mut buffer = LineBuffer::default();
        let lines = feed(&mut buffer, b"\n-n\r\n\nfile:/tmp/a b.jpg\n");
        assert_eq!(lines, ["-n", "file:/tmp/a b.jpg"]);
        assert_eq!(buffer.pending_len(), 0);
    }

    #[test]
    fn keeps_partial_line_until_terminated() {
        let mut buffer = LineBuffer::default();
        assert!(feed(&mut buffer, b"--ne").is_empty());
        assert_eq!(buffer.pending_len(), 4);
        assert_eq!(feed(&mut buffer, b"xt\n-b"), ["--next"]);
        assert_eq!(feed(&mut buffer, b"\n"), ["-b"]);
    }

    #[test]
    fn finish_flushes_trailing_fragment() {
        let mut buffer = LineBuffer::default();
        assert_eq!(feed(&mut buffer, b"-n\n--quit\r"), ["-n"]);

        let mut lines = Vec::new();
        buffer.finish(&mut lines);
        assert_eq!(lines, ["--quit"]);
        assert_eq!(buffer.pending_len(), 0);

        buffer.finish(&mut lines);
        assert_eq!(lines, ["--quit"]);
    }

    #[test]
    fn rejects_oversized_partial_line() {
        let mut buffer = LineBuffer::default();
        let mut lines = Vec::new();
        let oversized = vec![b'x'; MAX_LINE_BYTES + 1];
        assert_eq!(buffer.extend(&oversized, &mut lines), Err(LineTooLong));
        assert_eq!(buffer.pending_len(), 0);
    }
}
