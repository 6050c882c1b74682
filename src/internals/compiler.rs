/// Compiler surface (C6): `WORD`, `CREATE`, `,`, `:`, `;`, `'`, `[`/`]`,
/// `IMMEDIATE`, `HIDDEN`, and the threaded-model accessors `2CFA`/`2DFA`.
///
/// `WORD` embeds its token's bytes across one or more data-stack cells
/// (padded to a CELL boundary) with the length on top, per spec section
/// 4.6; `CREATE` is the inverse, reassembling those cells back into a byte
/// slice before handing it to the dictionary.
use crate::internals::inner::DOCOL;
use crate::kernel::CELL;
use crate::runtime::{ForthRuntime, Mode};

impl ForthRuntime {
    /// word ( -- buf... len ) reads one token and pushes it as packed
    /// CELL-sized chunks followed by its byte length.
    pub fn f_word(&mut self) {
        let token = self.next_token().unwrap_or_default();
        let len = token.len();
        let ncells = len.div_ceil(CELL);
        for i in 0..ncells {
            let start = i * CELL;
            let end = (start + CELL).min(len);
            let mut chunk = [0u8; CELL];
            chunk[..end - start].copy_from_slice(&token[start..end]);
            self.kernel.push(i64::from_le_bytes(chunk), &self.msg);
        }
        self.kernel.push(len as i64, &self.msg);
    }

    /// create <name> ( -- ) pops WORD's packed buffer and installs a header.
    pub fn f_create(&mut self) {
        let len = self.kernel.pop(&self.msg) as usize;
        let ncells = len.div_ceil(CELL);
        let mut chunks = Vec::with_capacity(ncells);
        for _ in 0..ncells {
            chunks.push(self.kernel.pop(&self.msg));
        }
        chunks.reverse();
        let mut name = Vec::with_capacity(ncells * CELL);
        for chunk in chunks {
            name.extend_from_slice(&chunk.to_le_bytes());
        }
        name.truncate(len);
        self.create(&name);
    }

    /// , ( n -- ) compiles n at HERE.
    pub fn f_comma(&mut self) {
        let v = self.kernel.pop(&self.msg);
        self.align_here();
        self.compile_cell(v);
    }

    /// : <name> ( -- ) starts a colon definition: WORD, CREATE, hide it,
    /// compile DOCOL, enter compile mode.
    pub fn f_colon(&mut self) {
        self.f_word();
        self.f_create();
        let header = self.latest as usize;
        self.toggle_hidden(header);
        self.align_here();
        self.compile_cell(DOCOL);
        self.mode = Mode::Compile;
    }

    /// ; ( -- ) immediate: compiles EXIT, unhides LATEST, returns to
    /// immediate mode.
    pub fn f_semicolon(&mut self) {
        self.align_here();
        self.compile_cell(self.exit_cfa as i64);
        let header = self.latest as usize;
        self.toggle_hidden(header);
        self.mode = Mode::Immediate;
    }

    /// ' <name> ( -- xt ) reads the next token and resolves it to an XT.
    /// Observably equivalent to spec section 4.6's inline-reader
    /// description: in compile mode it compiles a `LIT` pair so that
    /// executing the surrounding body pushes the XT; in immediate mode it
    /// pushes the XT directly.
    pub fn f_tick(&mut self) {
        let Some(token) = self.next_token() else {
            self.msg.error("'", "Word not found: (end of input)", None::<()>);
            return;
        };
        let Some(header) = self.find(&token) else {
            let text = format!("Word not found: {}", String::from_utf8_lossy(&token));
            self.msg.error("'", &text, None::<()>);
            return;
        };
        let cfa = self.code_field_of(header) as i64;
        match self.mode {
            Mode::Immediate => self.kernel.push(cfa, &self.msg),
            Mode::Compile => {
                let lit = self.lit_cfa as i64;
                self.align_here();
                self.compile_cell(lit);
                self.compile_cell(cfa);
            }
        }
    }

    /// [ ( -- ) immediate: enter immediate mode.
    pub fn f_lbracket(&mut self) {
        self.mode = Mode::Immediate;
    }

    /// ] ( -- ) enter compile mode.
    pub fn f_rbracket(&mut self) {
        self.mode = Mode::Compile;
    }

    /// immediate ( -- ) immediate: toggle LATEST's immediate bit.
    pub fn f_immediate(&mut self) {
        let header = self.latest as usize;
        self.toggle_immediate(header);
    }

    /// hidden ( header -- ) toggle a header's hidden bit.
    pub fn f_hidden(&mut self) {
        let header = self.kernel.pop(&self.msg) as usize;
        self.toggle_hidden(header);
    }

    /// latest_f ( -- header ) push LATEST.
    pub fn f_latest_f(&mut self) {
        self.kernel.push(self.latest, &self.msg);
    }

    /// here ( -- addr ) push HERE.
    pub fn f_here(&mut self) {
        self.kernel.push(self.here as i64, &self.msg);
    }

    /// 2cfa ( header -- cfa ) header to code field address.
    pub fn f_2cfa(&mut self) {
        let header = self.kernel.pop(&self.msg) as usize;
        let cfa = self.code_field_of(header);
        self.kernel.push(cfa as i64, &self.msg);
    }

    /// 2dfa ( header -- xt ) header to the XT compiled when this word is
    /// referenced. In this implementation every invocation cell holds a
    /// CFA uniformly (see internals::inner), so 2DFA and 2CFA coincide.
    pub fn f_2dfa(&mut self) {
        self.f_2cfa();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_create_roundtrip() {
        let mut rt = ForthRuntime::new();
        rt.cold_start();
        rt.line = "myvar\n".to_string();
        rt.line_pos = 0;
        rt.f_word();
        rt.f_create();
        assert_eq!(rt.header_name(rt.latest as usize), "myvar");
        assert_eq!(rt.kernel.sp(), 0);
    }

    #[test]
    fn test_colon_semicolon_defines_word() {
        let mut rt = ForthRuntime::new();
        rt.cold_start();
        rt.line = "sq dup * ;\n".to_string();
        rt.line_pos = 0;
        rt.f_colon();
        assert_eq!(rt.mode, Mode::Compile);
        assert!(rt.find(b"sq").is_none()); // hidden during definition

        // compile 'dup' then '*' as ordinary words via the outer loop
        rt.outer_step(); // dup
        rt.outer_step(); // *
        rt.outer_step(); // ;

        assert_eq!(rt.mode, Mode::Immediate);
        let header = rt.find(b"sq").expect("sq visible after ;");
        rt.kernel.push(6, &rt.msg);
        let cfa = rt.code_field_of(header);
        rt.execute_word(cfa);
        assert_eq!(rt.kernel.top(&rt.msg), 36);
    }

    #[test]
    fn test_tick_pushes_xt_immediate() {
        let mut rt = ForthRuntime::new();
        rt.cold_start();
        rt.line = "dup\n".to_string();
        rt.line_pos = 0;
        rt.f_tick();
        let expected = rt.code_field_of(rt.find(b"dup").unwrap()) as i64;
        assert_eq!(rt.kernel.top(&rt.msg), expected);
    }
}
