//! CLI surface for the reference REPL binary.
//!
//! Not a spec primitive: the core is embeddable and never parses argv
//! itself (spec section 1, "host-facing, not a standalone binary"). This
//! struct only configures the small `main.rs` driver that demonstrates it.

use argh::FromArgs;

use crate::internals::messages::DebugLevel;

pub const VERSION: &str = "0.1.0";

#[derive(FromArgs)]
/// A simple Forth interpreter
pub struct Config {
    /// diagnostic verbosity: error, warning, info, or debug
    #[argh(option, default = "\"error\".to_string()")]
    pub debuglevel: String,

    /// source file to run before dropping into the interactive prompt
    #[argh(option, short = 'f')]
    pub file: Option<String>,
}

impl Config {
    pub fn from_env() -> Config {
        argh::from_env()
    }

    pub fn debug_level(&self) -> DebugLevel {
        match self.debuglevel.as_str() {
            "debug" => DebugLevel::Debug,
            "info" => DebugLevel::Info,
            "warning" => DebugLevel::Warning,
            _ => DebugLevel::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_level_defaults_to_error() {
        let cfg = Config {
            debuglevel: "error".to_string(),
            file: None,
        };
        assert_eq!(cfg.debug_level(), DebugLevel::Error);
    }

    #[test]
    fn test_debug_level_parses_each_name() {
        for (name, level) in [
            ("warning", DebugLevel::Warning),
            ("info", DebugLevel::Info),
            ("debug", DebugLevel::Debug),
        ] {
            let cfg = Config {
                debuglevel: name.to_string(),
                file: None,
            };
            assert_eq!(cfg.debug_level(), level);
        }
    }
}
