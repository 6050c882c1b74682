/// Diagnostic sink for the core.
///
/// Every error kind in the core (spec section 7: LookupError, ParseError,
/// StackError, ArithError, MemoryError, IOError) is surfaced through here as
/// printed text rather than a propagated Result -- the outer interpreter
/// recovers from everything except IOError and resumes at the prompt. Kept
/// deliberately small, in the style the teacher uses for its own message
/// module: a verbosity level plus a couple of formatting entry points,
/// nothing heavier.
///
/// All levels print to stdout, not stderr: the failure text (`"Stack
/// underflow"`, `"Word not found: <token>"`, ...) is part of the session
/// transcript a REPL user reads, and the testable end-to-end scenarios
/// (spec section 8) assert these lines appear on stdout with no stderr
/// output at all.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Error,
    Warning,
    Info,
    Debug,
}

pub struct Msg {
    level: std::cell::Cell<DebugLevel>,
}

impl Msg {
    pub fn new() -> Msg {
        Msg {
            level: std::cell::Cell::new(DebugLevel::Error),
        }
    }

    pub fn set_level(&self, level: DebugLevel) {
        self.level.set(level);
    }

    pub fn get_level(&self) -> DebugLevel {
        self.level.get()
    }

    /// error prints unconditionally: errors are observable behavior, not debug chatter.
    pub fn error<T: std::fmt::Debug>(&self, _caller: &str, text: &str, detail: Option<T>) {
        match detail {
            Some(d) => println!("{text}: {d:?}"),
            None => println!("{text}"),
        }
    }

    /// warning prints unconditionally, like error: spec.md section 4.8
    /// classifies out-of-arena @/!/C@/C! as Warning-level failures that
    /// still must be visible on a freshly started interpreter (default
    /// level Error), not only after the user raises verbosity with DBG.
    pub fn warning<T: std::fmt::Debug>(&self, _caller: &str, text: &str, detail: Option<T>) {
        match detail {
            Some(d) => println!("{text}: {d:?}"),
            None => println!("{text}"),
        }
    }

    pub fn info<T: std::fmt::Debug>(&self, caller: &str, text: &str, detail: Option<T>) {
        if self.level.get() < DebugLevel::Info {
            return;
        }
        match detail {
            Some(d) => println!("{caller}: {text}: {d:?}"),
            None => println!("{caller}: {text}"),
        }
    }

    pub fn debug<T: std::fmt::Debug>(&self, caller: &str, text: &str, detail: Option<T>) {
        if self.level.get() < DebugLevel::Debug {
            return;
        }
        match detail {
            Some(d) => println!("{caller}: {text}: {d:?}"),
            None => println!("{caller}: {text}"),
        }
    }
}

impl Default for Msg {
    fn default() -> Self {
        Msg::new()
    }
}
