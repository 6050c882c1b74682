/// Primitive registry (C3): a static table of (name, routine, flags) records
/// seeded once at cold start.
///
/// Each entry gets a dictionary header (via `ForthRuntime::create`) whose code
/// field holds a single CELL: the primitive's index into `Kernel`'s builtin
/// table, tagged so the inner interpreter can tell a primitive XT from a
/// colon CFA without reading through it.
use crate::runtime::ForthRuntime;

/// The internal format for builtins: a name, function pointer, and a doc
/// string used by `SEE`.
pub struct BuiltInFn {
    pub name: String,
    pub code: fn(&mut ForthRuntime),
    pub doc: String,
}

impl BuiltInFn {
    pub fn new(name: &str, code: fn(&mut ForthRuntime), doc: &str) -> BuiltInFn {
        BuiltInFn {
            name: name.to_owned(),
            code,
            doc: doc.to_owned(),
        }
    }
}

impl ForthRuntime {
    /// add_builtin registers `code` in the kernel's builtin table and
    /// creates a dictionary header pointing at it. Returns the header offset.
    fn add_builtin(&mut self, name: &str, code: fn(&mut ForthRuntime), doc: &str) -> usize {
        let index = self.kernel.add_builtin(BuiltInFn::new(name, code, doc));
        let header = self.create(name.as_bytes());
        self.compile_cell(Self::tag_primitive(index));
        header
    }

    fn add_builtin_flagged(
        &mut self,
        name: &str,
        code: fn(&mut ForthRuntime),
        doc: &str,
        immediate: bool,
        hidden: bool,
    ) {
        let header = self.add_builtin(name, code, doc);
        if immediate {
            self.toggle_immediate(header);
        }
        if hidden {
            self.toggle_hidden(header);
        }
    }

    /// compile_builtins seeds the full primitive word set required by
    /// spec section 4.3, in table order (later entries sit nearer LATEST
    /// and shadow earlier ones with the same name on lookup).
    pub fn compile_builtins(&mut self) {
        // Stack
        self.add_builtin_flagged("drop", Self::f_drop, "drop ( n -- ) remove top of stack", false, false);
        self.add_builtin_flagged("dup", Self::f_dup, "dup ( n -- n n ) duplicate top of stack", false, false);
        self.add_builtin_flagged("swap", Self::f_swap, "swap ( m n -- n m ) exchange top two", false, false);
        self.add_builtin_flagged("rot", Self::f_rot, "rot ( i j k -- j k i ) rotate third to top", false, false);
        self.add_builtin_flagged("over", Self::f_over, "over ( m n -- m n m ) copy second to top", false, false);
        self.add_builtin_flagged(".s", Self::f_dot_s, ".s ( -- ) print the data stack", false, false);
        self.add_builtin_flagged(".", Self::f_dot, ". ( n -- ) pop and print top of stack", false, false);

        // Arithmetic
        self.add_builtin_flagged("+", Self::f_plus, "+ ( j k -- j+k )", false, false);
        self.add_builtin_flagged("-", Self::f_minus, "- ( j k -- j-k )", false, false);
        self.add_builtin_flagged("*", Self::f_times, "* ( j k -- j*k )", false, false);
        self.add_builtin_flagged("/", Self::f_divide, "/ ( j k -- j/k )", false, false);
        self.add_builtin_flagged("mod", Self::f_mod, "mod ( j k -- j mod k )", false, false);
        self.add_builtin_flagged("1+", Self::f_1plus, "1+ ( n -- n+1 )", false, false);
        self.add_builtin_flagged("1-", Self::f_1minus, "1- ( n -- n-1 )", false, false);

        // Comparison
        self.add_builtin_flagged("=", Self::f_equal, "= ( j k -- b )", false, false);
        self.add_builtin_flagged("<", Self::f_less, "< ( j k -- b )", false, false);
        self.add_builtin_flagged(">", Self::f_greater, "> ( j k -- b )", false, false);
        self.add_builtin_flagged("0=", Self::f_0equal, "0= ( n -- b )", false, false);

        // Memory
        self.add_builtin_flagged("@", Self::f_fetch, "@ ( a -- v ) fetch a cell", false, false);
        self.add_builtin_flagged("!", Self::f_store, "! ( v a -- ) store a cell", false, false);
        self.add_builtin_flagged("c@", Self::f_c_fetch, "c@ ( a -- c ) fetch a byte", false, false);
        self.add_builtin_flagged("c!", Self::f_c_store, "c! ( c a -- ) store a byte", false, false);

        // Compile/meta
        self.add_builtin_flagged("create", Self::f_create, "create <name> ( -- ) start a header", false, false);
        self.add_builtin_flagged(",", Self::f_comma, ", ( n -- ) compile n at HERE", false, false);
        self.add_builtin_flagged(":", Self::f_colon, ": <name> ( -- ) start a colon definition", false, false);
        self.add_builtin_flagged(";", Self::f_semicolon, "; ( -- ) end a colon definition", true, false);
        self.add_builtin_flagged("'", Self::f_tick, "' <name> ( -- xt ) push a word's XT", false, false);
        self.add_builtin_flagged("immediate", Self::f_immediate, "immediate ( -- ) flag LATEST immediate", true, false);
        self.add_builtin_flagged("hidden", Self::f_hidden, "hidden ( header -- ) toggle a header's hidden bit", false, false);
        self.add_builtin_flagged("[", Self::f_lbracket, "[ ( -- ) enter immediate mode", true, false);
        self.add_builtin_flagged("]", Self::f_rbracket, "] ( -- ) enter compile mode", false, false);
        self.add_builtin_flagged("latest_f", Self::f_latest_f, "latest_f ( -- header ) push LATEST", false, false);
        self.add_builtin_flagged("here", Self::f_here, "here ( -- addr ) push HERE", false, false);

        // Control-flow code cells (not meant to be typed directly, but
        // visible for SEE to resolve against; DOCOL and LIT are hidden
        // because they are never user-callable by name)
        self.add_builtin_flagged("lit", Self::f_lit, "(lit) inline literal marker", false, true);
        self.add_builtin_flagged("exit", Self::f_exit, "exit ( -- ) return from the current word", false, false);
        self.add_builtin_flagged("branch", Self::f_branch, "(branch) unconditional jump marker", false, false);
        self.add_builtin_flagged("0branch", Self::f_0branch, "(0branch) conditional jump marker", false, false);
        self.add_builtin_flagged("docol", Self::f_docol, "(docol) colon-word entry marker", false, true);

        // Threaded-model accessors
        self.add_builtin_flagged("2cfa", Self::f_2cfa, "2cfa ( header -- cfa ) header to code field", false, false);
        self.add_builtin_flagged("2dfa", Self::f_2dfa, "2dfa ( header -- xt ) header to XT for compilation", false, false);

        // I/O
        self.add_builtin_flagged("word", Self::f_word, "word ( -- buf len ) read one token", false, false);
        self.add_builtin_flagged("key", Self::f_key, "key ( -- c ) read one byte, or 0 at EOF", false, false);
        self.add_builtin_flagged("emit", Self::f_emit, "emit ( c -- ) write one byte", false, false);

        // Introspection
        self.add_builtin_flagged("see", Self::f_see, "see <name> ( -- ) decompile a word", false, false);
        self.add_builtin_flagged("words", Self::f_words, "words ( -- ) list visible words", false, false);
        self.add_builtin_flagged("find", Self::f_find_word, "find <name> ( -- header | 0 )", false, false);

        // Ambient diagnostics, not a spec.md primitive: observability only.
        self.add_builtin_flagged("dbg", Self::f_dbg, "dbg ( level -- ) set the diagnostic verbosity", false, false);
    }

    /// tag_primitive folds a builtin-table index into the CELL value
    /// compiled as a primitive's code field. `DOCOL` is reserved as the
    /// sentinel that marks colon words instead, so primitive indices are
    /// shifted away from it; see `internals::inner::DOCOL`.
    fn tag_primitive(index: usize) -> i64 {
        index as i64
    }
}
