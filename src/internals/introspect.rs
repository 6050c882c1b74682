/// Introspection (C7): `WORDS`, `SEE`, `FIND`.
///
/// `SEE`'s decompiler resolves each body cell (a CFA, per the uniform
/// representation in internals::inner) back to a name by scanning the
/// dictionary for a header whose code field matches; an XT with no
/// matching header renders as a decimal integer, as spec section 4.7
/// requires.
use crate::internals::inner::DOCOL;
use crate::kernel::CELL;
use crate::runtime::ForthRuntime;

impl ForthRuntime {
    fn resolve_cfa_to_header(&self, cfa: usize) -> Option<usize> {
        self.headers().find(|&h| self.code_field_of(h) == cfa)
    }

    /// words ( -- ) lists every visible word, most recently defined first.
    pub fn f_words(&mut self) {
        let names: Vec<String> = self.words_visible().map(|h| self.header_name(h)).collect();
        println!("{}", names.join(" "));
    }

    /// find ( -- header | 0 ) reads a token and pushes its header offset,
    /// or 0 if it is not in the dictionary (hidden words do not count).
    pub fn f_find_word(&mut self) {
        match self.next_token() {
            Some(tok) => match self.find(&tok) {
                Some(header) => self.kernel.push(header as i64, &self.msg),
                None => self.kernel.push(0, &self.msg),
            },
            None => self.kernel.push(0, &self.msg),
        }
    }

    /// see <name> ( -- ) decompiles a word: `: name [immediate] body ;`
    /// for a colon word, `: name [primitive]` for a primitive.
    pub fn f_see(&mut self) {
        let Some(token) = self.next_token() else {
            self.msg.error("see", "Word not found: (end of input)", None::<()>);
            return;
        };
        let Some(header) = self.find_any(&token) else {
            let text = format!("Word not found: {}", String::from_utf8_lossy(&token));
            self.msg.error("see", &text, None::<()>);
            return;
        };
        println!("{}", self.see_text(header));
    }

    /// see_text builds SEE's decompiled line for `header`, pulled out of
    /// `f_see` so the round-trip property is directly testable. `LIT`'s
    /// operand prints bare (never the hidden name `lit` itself) and `EXIT`
    /// is never emitted as a body word -- it is exactly what the trailing
    /// `;` already means -- matching the teacher decompiler's handling of
    /// `LITERAL`/`EXIT` in its own `f_see`.
    fn see_text(&self, header: usize) -> String {
        let name = self.header_name(header);
        let immediate = if self.is_immediate(header) { " [immediate]" } else { "" };
        let cfa = self.code_field_of(header);
        let first = self.kernel.get_cell(cfa);

        if first != DOCOL {
            return format!(": {name}{immediate} [primitive]");
        }

        let mut words = Vec::new();
        let mut ip = cfa + CELL;
        loop {
            let cell = self.kernel.get_cell(ip) as usize;
            if cell == self.exit_cfa {
                break;
            }
            if cell == self.lit_cfa {
                ip += CELL;
                words.push(self.kernel.get_cell(ip).to_string());
                ip += CELL;
                continue;
            }
            match self.resolve_cfa_to_header(cell) {
                Some(h) => words.push(self.header_name(h)),
                None => words.push(cell.to_string()),
            }
            let is_branch = cell == self.branch_cfa || cell == self.zbranch_cfa;
            ip += CELL;
            if is_branch {
                words.push(self.kernel.get_cell(ip).to_string());
                ip += CELL;
            }
        }
        format!(": {name}{immediate} {} ;", words.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_visible_and_missing() {
        let mut rt = ForthRuntime::new();
        rt.cold_start();
        rt.line = "dup bogus\n".to_string();
        rt.line_pos = 0;
        rt.f_find_word();
        assert_ne!(rt.kernel.top(&rt.msg), 0);
        rt.f_find_word();
        assert_eq!(rt.kernel.top(&rt.msg), 0);
    }

    #[test]
    fn test_see_primitive() {
        let mut rt = ForthRuntime::new();
        rt.cold_start();
        let dup = rt.find(b"dup").unwrap();
        assert_eq!(rt.see_text(dup), ": dup [primitive]");
    }

    #[test]
    fn test_see_colon_word_omits_lit_name_and_trailing_exit() {
        let mut rt = ForthRuntime::new();
        rt.cold_start();
        // : sq dup * ;
        rt.line = "sq dup * ;\n".to_string();
        rt.line_pos = 0;
        rt.f_colon();
        rt.outer_step(); // dup
        rt.outer_step(); // *
        rt.outer_step(); // ;
        let sq = rt.find(b"sq").unwrap();
        assert_eq!(rt.see_text(sq), ": sq dup * ;");
    }

    #[test]
    fn test_see_colon_word_with_literal() {
        let mut rt = ForthRuntime::new();
        rt.cold_start();
        // : ten 10 ;
        rt.line = "ten 10 ;\n".to_string();
        rt.line_pos = 0;
        rt.f_colon();
        rt.outer_step(); // 10
        rt.outer_step(); // ;
        let ten = rt.find(b"ten").unwrap();
        assert_eq!(rt.see_text(ten), ": ten 10 ;");
    }

    #[test]
    fn test_words_includes_seeded_primitive() {
        let mut rt = ForthRuntime::new();
        rt.cold_start();
        assert!(rt.words_visible().any(|h| rt.header_name(h) == "dup"));
    }
}
