//////////////////////////////////////////////////////////////////
/// runtime.rs
///
/// Forth Runtime Engine
///
/// `ForthRuntime` holds everything a running interpreter needs beyond the
/// raw kernel: dictionary cursor state (HERE/LATEST), the machine registers
/// used by the inner interpreter (IP/W), interpreter mode, the diagnostic
/// sink, and the stack of input sources the outer interpreter reads from.
/// `cold_start` brings a freshly-constructed runtime up to a state where the
/// outer interpreter loop can run: the primitive dictionary seeded, mode set
/// to immediate, registers cleared.
///
use crate::internals::files::FileHandle;
use crate::internals::messages::Msg;
use crate::kernel::Kernel;

/// Interpreter mode: IMMEDIATE executes words as they are parsed, COMPILE
/// appends their invocation cell to the definition under construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Immediate,
    Compile,
}

pub struct ForthRuntime {
    pub kernel: Kernel,
    pub here: usize,
    pub latest: i64,
    pub mode: Mode,
    /// IP: next XT to dispatch in the body currently executing. None means
    /// no execution pending (the NIL register value from spec section 3).
    pub ip: Option<usize>,
    /// W: the CFA currently being dispatched.
    pub w: usize,
    pub msg: Msg,
    /// Stack of input sources: the host's stdin is always at the bottom;
    /// an optional preloaded `-f` file sits above it while it still has
    /// lines left, so that end-of-file on the nested source falls back to
    /// the next one down rather than ending the session.
    pub reader: Vec<FileHandle>,
    pub line: String,
    pub line_pos: usize,
    pub in_comment: bool,
    pub exit_flag: bool,

    // Cached CFAs of the control-flow primitives the compiler and inner
    // interpreter need to reference directly (to compile LIT/BRANCH
    // sequences, and to recognize EXIT/DOCOL during SEE).
    pub lit_cfa: usize,
    pub exit_cfa: usize,
    pub branch_cfa: usize,
    pub zbranch_cfa: usize,
}

impl ForthRuntime {
    pub fn new() -> ForthRuntime {
        ForthRuntime {
            kernel: Kernel::new(),
            here: 0,
            latest: -1,
            mode: Mode::Immediate,
            ip: None,
            w: 0,
            msg: Msg::new(),
            reader: vec![FileHandle::stdin()],
            line: String::new(),
            line_pos: 0,
            in_comment: false,
            exit_flag: false,
            lit_cfa: 0,
            exit_cfa: 0,
            branch_cfa: 0,
            zbranch_cfa: 0,
        }
    }

    /// cold_start seeds the primitive dictionary and leaves the runtime
    /// ready for the outer interpreter loop.
    pub fn cold_start(&mut self) {
        self.compile_builtins();
        self.mode = Mode::Immediate;

        self.lit_cfa = self.code_field_of(self.find_any(b"lit").expect("lit must be seeded"));
        self.exit_cfa = self.code_field_of(self.find_any(b"exit").expect("exit must be seeded"));
        self.branch_cfa =
            self.code_field_of(self.find_any(b"branch").expect("branch must be seeded"));
        self.zbranch_cfa =
            self.code_field_of(self.find_any(b"0branch").expect("0branch must be seeded"));
    }

    /// push a file onto the reader stack, so its lines are consumed ahead
    /// of whatever source sits below it (used for the `-f` preload).
    pub fn push_source(&mut self, handle: FileHandle) {
        self.reader.push(handle);
    }

    /// align_here advances HERE to the next CELL-aligned offset.
    pub fn align_here(&mut self) {
        self.here = crate::internals::dictionary::align_up(self.here);
    }

    /// compile_cell writes `v` at HERE and advances HERE by CELL. Caller
    /// guarantees HERE is aligned first.
    pub fn compile_cell(&mut self, v: i64) {
        if !self.kernel.arena_bounds_check(self.here, crate::kernel::CELL) {
            self.msg.error("compile_cell", "Dictionary full", Some(self.here));
            return;
        }
        self.kernel.set_cell(self.here, v);
        self.here += crate::kernel::CELL;
    }
}

impl Default for ForthRuntime {
    fn default() -> Self {
        ForthRuntime::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cold_start_seeds_dictionary() {
        let mut rt = ForthRuntime::new();
        rt.cold_start();
        assert!(rt.find(b"dup").is_some());
        assert!(rt.find(b"docol").is_some());
        assert_eq!(rt.mode, Mode::Immediate);
    }

    #[test]
    fn test_here_monotonic_across_compiles() {
        let mut rt = ForthRuntime::new();
        rt.cold_start();
        let before = rt.here;
        rt.align_here();
        rt.compile_cell(42);
        rt.compile_cell(43);
        assert!(rt.here >= before);
        assert_eq!(rt.here % crate::kernel::CELL, 0);
    }

    #[test]
    fn test_control_primitives_hidden_and_visible() {
        let mut rt = ForthRuntime::new();
        rt.cold_start();
        assert!(rt.find(b"exit").is_some());
        // lit and docol are hidden: not user-callable by name
        assert!(rt.find(b"lit").is_none());
        assert!(rt.find(b"docol").is_none());
    }
}
