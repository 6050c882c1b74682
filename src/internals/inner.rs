/// Inner interpreter (C4): threaded execution over execution tokens.
///
/// Every compiled invocation cell -- whether it names a primitive or a
/// colon word -- holds the callee's code-field address (CFA), never a
/// tagged union. Dispatch is uniform: read the cell at that CFA. If it
/// equals `DOCOL`, the callee is a colon word and execution descends into
/// its body (`CFA + CELL`), pushing the caller's IP on the return stack.
/// Otherwise the cell is a primitive's index into the kernel's builtin
/// table, and that routine runs to completion before the loop advances.
///
/// This mirrors the original C implementation's `vm_inner_interpreter`
/// (`do_docol`/`do_exit` in its builtin table), adapted from a tagged
/// 31-bit union to a uniform CFA-plus-sentinel scheme, per the spec's own
/// design note on avoiding computed-goto/tagged pointers.
use crate::kernel::CELL;
use crate::runtime::ForthRuntime;

/// Sentinel marking a colon word's code field. Never a valid builtin index
/// (those are >= 0) and never a valid arena offset read as a tag, since it
/// is only ever compared against, never used to index the builtin table.
pub const DOCOL: i64 = -1;

impl ForthRuntime {
    /// execute_word enters the inner interpreter at `cfa`, the code field of
    /// some dictionary word, and runs to completion: either the primitive
    /// there returns immediately, or a colon word's body runs until its
    /// matching `EXIT` pops back past the caller's own saved IP.
    pub fn execute_word(&mut self, cfa: usize) {
        let first = self.kernel.get_cell(cfa);
        self.w = cfa;
        if first == DOCOL {
            self.ip = Some(cfa + CELL);
            self.run();
        } else {
            self.invoke_primitive(first, cfa);
        }
    }

    /// run drives the threaded-code loop until IP returns to NIL (None),
    /// i.e. until the outermost `EXIT` has no enclosing return address left.
    fn run(&mut self) {
        while let Some(ip) = self.ip {
            let body_cell = self.kernel.get_cell(ip);
            self.ip = Some(ip + CELL);
            self.dispatch(body_cell as usize);
        }
    }

    /// dispatch resolves one body cell (a callee CFA) and either descends
    /// into a nested colon word or invokes a primitive.
    fn dispatch(&mut self, cfa: usize) {
        let first = self.kernel.get_cell(cfa);
        if first == DOCOL {
            let saved_ip = self.ip.map_or(-1, |v| v as i64);
            self.kernel.rpush(saved_ip, &self.msg);
            self.w = cfa;
            self.ip = Some(cfa + CELL);
        } else {
            self.w = cfa;
            self.invoke_primitive(first, cfa);
        }
    }

    fn invoke_primitive(&mut self, tag: i64, cfa: usize) {
        if tag < 0 || tag as usize >= self.kernel.builtin_count() {
            self.msg.error(
                "execute",
                "Corrupt code field (not DOCOL, not a builtin index)",
                Some((cfa, tag)),
            );
            self.ip = None;
            return;
        }
        let code = self.kernel.get_builtin(tag as usize).code;
        code(self);
    }

    // --- control-flow primitives, each an ordinary entry in the builtin
    // table but special in that they read/write IP and the return stack
    // directly. ---

    /// (docol): never invoked through `invoke_primitive` in practice -- the
    /// DOCOL value is compared against directly by `dispatch`/`execute_word`
    /// -- but it still needs a dictionary entry so `SEE`/`WORDS` can name it
    /// and so a colon word's code field has something to point SEE at.
    pub fn f_docol(&mut self) {}

    /// exit ( -- ) pops the return stack back into IP. Underflow terminates
    /// the current execution (IP := NIL), matching top-level EXIT semantics.
    pub fn f_exit(&mut self) {
        match self.kernel.rpop(&self.msg) {
            Some(v) if v >= 0 => self.ip = Some(v as usize),
            _ => self.ip = None,
        }
    }

    /// (lit) pushes the inline cell following it and skips past it.
    pub fn f_lit(&mut self) {
        let ip = self.ip.expect("lit runs only inside a body");
        let value = self.kernel.get_cell(ip);
        self.kernel.push(value, &self.msg);
        self.ip = Some(ip + CELL);
    }

    /// (branch) reads the inline byte offset and jumps: target is relative
    /// to the offset cell's own address.
    pub fn f_branch(&mut self) {
        let ip = self.ip.expect("branch runs only inside a body");
        let offset = self.kernel.get_cell(ip);
        self.ip = Some((ip as i64 + offset) as usize);
    }

    /// (0branch) pops a flag; zero takes the jump, non-zero falls through
    /// past the offset cell.
    pub fn f_0branch(&mut self) {
        let ip = self.ip.expect("0branch runs only inside a body");
        let flag = self.kernel.pop(&self.msg);
        if flag == 0 {
            let offset = self.kernel.get_cell(ip);
            self.ip = Some((ip as i64 + offset) as usize);
        } else {
            self.ip = Some(ip + CELL);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_runs_and_returns() {
        let mut rt = ForthRuntime::new();
        rt.cold_start();
        rt.kernel.push(3, &rt.msg);
        let dup = rt.find(b"dup").unwrap();
        let cfa = rt.code_field_of(dup);
        rt.execute_word(cfa);
        assert_eq!(rt.kernel.sp(), 2);
    }

    #[test]
    fn test_colon_word_runs_to_exit() {
        let mut rt = ForthRuntime::new();
        rt.cold_start();
        // : two 1 1 + ;
        rt.create(b"two");
        rt.align_here();
        rt.compile_cell(DOCOL);
        let lit = rt.lit_cfa as i64;
        let plus = rt.code_field_of(rt.find(b"+").unwrap()) as i64;
        let exit = rt.exit_cfa as i64;
        rt.compile_cell(lit);
        rt.compile_cell(1);
        rt.compile_cell(lit);
        rt.compile_cell(1);
        rt.compile_cell(plus);
        rt.compile_cell(exit);

        let two = rt.find(b"two").unwrap();
        let cfa = rt.code_field_of(two);
        rt.execute_word(cfa);
        assert_eq!(rt.kernel.sp(), 1);
        assert_eq!(rt.kernel.top(&rt.msg), 2);
    }

    /// Hand-compiles the recursive factorial from spec.md's end-to-end
    /// scenario (`5 fact .` -> `120`) using explicit BRANCH/0BRANCH, the
    /// way `: fact dup 1 = 0branch <patched> drop 1 exit ... ;` compiles:
    ///
    ///   dup 1 =  0branch L1  drop 1 exit
    ///   L1: dup 1 - fact *  exit
    #[test]
    fn test_compiled_branch_and_0branch_factorial() {
        let mut rt = ForthRuntime::new();
        rt.cold_start();

        let header = rt.create(b"fact");
        rt.align_here();
        let cfa = rt.code_field_of(header);
        let body_start = cfa + CELL;

        let dup = rt.code_field_of(rt.find(b"dup").unwrap()) as i64;
        let eq = rt.code_field_of(rt.find(b"=").unwrap()) as i64;
        let drop = rt.code_field_of(rt.find(b"drop").unwrap()) as i64;
        let minus = rt.code_field_of(rt.find(b"-").unwrap()) as i64;
        let times = rt.code_field_of(rt.find(b"*").unwrap()) as i64;
        let lit = rt.lit_cfa as i64;
        let exit = rt.exit_cfa as i64;
        let zbranch = rt.zbranch_cfa as i64;
        let fact = cfa as i64;

        rt.compile_cell(DOCOL);
        // b0..b5: dup 1 = 0branch <offset>
        rt.compile_cell(dup);
        rt.compile_cell(lit);
        rt.compile_cell(1);
        rt.compile_cell(eq);
        rt.compile_cell(zbranch);
        let offset_cell_addr = body_start + 5 * CELL;
        let l1_addr = body_start + 10 * CELL;
        rt.compile_cell((l1_addr as i64) - (offset_cell_addr as i64));
        // b6..b9: drop 1 exit
        rt.compile_cell(drop);
        rt.compile_cell(lit);
        rt.compile_cell(1);
        rt.compile_cell(exit);
        // L1, b10..b16: dup 1 - fact * exit
        assert_eq!(rt.here, l1_addr);
        rt.compile_cell(dup);
        rt.compile_cell(lit);
        rt.compile_cell(1);
        rt.compile_cell(minus);
        rt.compile_cell(fact);
        rt.compile_cell(times);
        rt.compile_cell(exit);

        rt.kernel.push(5, &rt.msg);
        rt.execute_word(cfa);
        assert_eq!(rt.kernel.sp(), 1);
        assert_eq!(rt.kernel.top(&rt.msg), 120);
    }
}
