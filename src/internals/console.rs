/// Host-facing I/O primitives: `KEY` reads one raw byte, `EMIT` writes one.
/// Ambient `DBG` sets the diagnostic sink's verbosity -- not a spec.md
/// primitive, but observability infrastructure carried the way the teacher
/// carries its own `dbg`/`debuglevel` words.
use std::io::{self, Write};

use crate::internals::messages::DebugLevel;
use crate::runtime::ForthRuntime;

impl ForthRuntime {
    /// key ( -- c ) reads one byte from the active input source, or 0 at EOF.
    pub fn f_key(&mut self) {
        let byte = self
            .reader
            .last_mut()
            .and_then(|h| h.read_char())
            .unwrap_or(0);
        self.kernel.push(byte as i64, &self.msg);
    }

    /// emit ( c -- ) writes one byte to stdout.
    pub fn f_emit(&mut self) {
        let c = self.kernel.pop(&self.msg) as u8;
        let mut stdout = io::stdout();
        let _ = stdout.write_all(&[c]);
        let _ = stdout.flush();
    }

    /// dbg ( level -- ) sets the diagnostic verbosity: 0 error, 1 warning,
    /// 2 info, 3+ debug.
    pub fn f_dbg(&mut self) {
        let level = self.kernel.pop(&self.msg);
        let level = match level {
            0 => DebugLevel::Error,
            1 => DebugLevel::Warning,
            2 => DebugLevel::Info,
            _ => DebugLevel::Debug,
        };
        self.msg.set_level(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dbg_sets_level() {
        let mut rt = ForthRuntime::new();
        rt.cold_start();
        rt.kernel.push(2, &rt.msg);
        rt.f_dbg();
        assert_eq!(rt.msg.get_level(), DebugLevel::Info);
    }
}
