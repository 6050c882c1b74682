/// Outer interpreter (C5): tokenizer, number parser, mode dispatch.
///
/// Tokens never span lines (spec section 6): the tokenizer reads one line
/// at a time from the active input source and slices whitespace-delimited
/// tokens out of it, refilling from the reader stack (`ForthRuntime::reader`)
/// whenever the buffered line runs out. A `\` outside a token discards the
/// rest of the current line, matching the line-comment rule in spec
/// section 4.5.
use crate::runtime::{ForthRuntime, Mode};

fn is_forth_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// parse_number accepts decimal (with an optional leading `-`) or, with a
/// `0x`/`0X` prefix, hexadecimal. Any other content fails the parse and the
/// caller falls through to a dictionary lookup.
pub fn parse_number(token: &[u8]) -> Option<i64> {
    let s = std::str::from_utf8(token).ok()?;
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return i64::from_str_radix(hex, 16).ok();
    }
    s.parse::<i64>().ok()
}

impl ForthRuntime {
    /// refill_line pulls the next line from the top of the reader stack,
    /// falling through to the source beneath it on EOF. Returns false only
    /// when every source (down to the host's own stdin) is exhausted.
    fn refill_line(&mut self) -> bool {
        while let Some(source) = self.reader.last_mut() {
            match source.get_line() {
                Some(line) => {
                    self.line = line;
                    self.line_pos = 0;
                    return true;
                }
                None => {
                    self.reader.pop();
                }
            }
        }
        false
    }

    /// next_token reads one whitespace-delimited token, skipping line
    /// comments. None signals end of input across every source.
    pub fn next_token(&mut self) -> Option<Vec<u8>> {
        loop {
            let bytes = self.line.as_bytes();
            while self.line_pos < bytes.len() && is_forth_whitespace(bytes[self.line_pos]) {
                self.line_pos += 1;
            }
            if self.line_pos >= bytes.len() {
                if !self.refill_line() {
                    return None;
                }
                continue;
            }
            if bytes[self.line_pos] == b'\\' {
                self.line_pos = bytes.len();
                continue;
            }
            let start = self.line_pos;
            while self.line_pos < bytes.len() && !is_forth_whitespace(bytes[self.line_pos]) {
                self.line_pos += 1;
            }
            return Some(self.line.as_bytes()[start..self.line_pos].to_vec());
        }
    }

    /// process_token is one outer-interpreter step over an already-read
    /// token: number-parse first (spec section 4.5 point 3), else dictionary
    /// lookup and either execute (immediate word, or IMMEDIATE mode) or
    /// compile the invocation cell.
    fn process_token(&mut self, token: &[u8]) {
        let looks_numeric = matches!(token.first(), Some(b'0'..=b'9') | Some(b'-'));
        if looks_numeric {
            if let Some(n) = parse_number(token) {
                self.handle_number(n);
                return;
            }
        }
        match self.find(token) {
            Some(header) => self.handle_word(header),
            None => {
                let text = format!("Word not found: {}", String::from_utf8_lossy(token));
                self.msg.error("interpret", &text, None::<()>);
            }
        }
    }

    fn handle_number(&mut self, n: i64) {
        match self.mode {
            Mode::Immediate => self.kernel.push(n, &self.msg),
            Mode::Compile => {
                let lit = self.lit_cfa as i64;
                self.align_here();
                self.compile_cell(lit);
                self.compile_cell(n);
            }
        }
    }

    fn handle_word(&mut self, header: usize) {
        let cfa = self.code_field_of(header);
        if self.mode == Mode::Immediate || self.is_immediate(header) {
            self.execute_word(cfa);
        } else {
            self.align_here();
            self.compile_cell(cfa as i64);
        }
    }

    /// interpret_line runs the outer interpreter over one line of text
    /// already sitting in `self.line`/`self.line_pos` plus any continuation
    /// from the reader stack (matching spec section 4.5's per-token loop).
    /// Returns -1 on EOF, 0 otherwise.
    pub fn outer_step(&mut self) -> i32 {
        match self.next_token() {
            None => -1,
            Some(token) => {
                self.process_token(&token);
                0
            }
        }
    }

    /// run is the top-level REPL loop: read and interpret tokens until EOF.
    pub fn run(&mut self) {
        while !self.exit_flag {
            if self.outer_step() < 0 {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(rt: &mut ForthRuntime, text: &str) {
        rt.line = text.to_string();
        rt.line_pos = 0;
    }

    #[test]
    fn test_parse_decimal_and_hex() {
        assert_eq!(parse_number(b"42"), Some(42));
        assert_eq!(parse_number(b"-7"), Some(-7));
        assert_eq!(parse_number(b"0xFF"), Some(255));
        assert_eq!(parse_number(b"0xg"), None);
        assert_eq!(parse_number(b"-"), None);
    }

    #[test]
    fn test_tokenizer_splits_whitespace() {
        let mut rt = ForthRuntime::new();
        feed(&mut rt, "  2   3 +  \n");
        assert_eq!(rt.next_token(), Some(b"2".to_vec()));
        assert_eq!(rt.next_token(), Some(b"3".to_vec()));
        assert_eq!(rt.next_token(), Some(b"+".to_vec()));
    }

    #[test]
    fn test_comment_discards_rest_of_line() {
        let mut rt = ForthRuntime::new();
        feed(&mut rt, "1 \\ 2 3\n");
        assert_eq!(rt.next_token(), Some(b"1".to_vec()));
        assert_eq!(rt.next_token(), None);
    }

    #[test]
    fn test_number_pushes_in_immediate_mode() {
        let mut rt = ForthRuntime::new();
        rt.cold_start();
        feed(&mut rt, "2 3 +\n");
        rt.outer_step();
        rt.outer_step();
        rt.outer_step();
        assert_eq!(rt.kernel.top(&rt.msg), 5);
    }

    #[test]
    fn test_unknown_word_reports_and_continues() {
        let mut rt = ForthRuntime::new();
        rt.cold_start();
        feed(&mut rt, "bogus-word 1\n");
        rt.outer_step();
        rt.outer_step();
        assert_eq!(rt.kernel.top(&rt.msg), 1);
    }
}
