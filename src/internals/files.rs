/// Line source abstraction for the outer interpreter: stdin, or a preloaded
/// `-f` source file, read one line at a time and tokenized from a cached
/// remainder.
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;

use crate::internals::messages::Msg;

#[derive(Debug, PartialEq)]
pub enum FileMode {
    RO,
}

pub enum FType {
    Stdin,
    BReader(BufReader<File>),
}

pub struct FileHandle {
    source: FType,
    file_mode: FileMode,
    msg: Msg,
}

impl FileHandle {
    pub fn stdin() -> FileHandle {
        FileHandle {
            source: FType::Stdin,
            file_mode: FileMode::RO,
            msg: Msg::new(),
        }
    }

    pub fn open(path: &Path) -> io::Result<FileHandle> {
        let file = File::open(path)?;
        Ok(FileHandle {
            source: FType::BReader(BufReader::new(file)),
            file_mode: FileMode::RO,
            msg: Msg::new(),
        })
    }

    /// get_line reads one line of text, blocking on stdin. None on EOF or a
    /// read error (reported through the diagnostic sink first).
    pub fn get_line(&mut self) -> Option<String> {
        let mut new_line = String::new();
        let result = match &mut self.source {
            FType::Stdin => {
                io::stdout().flush().ok();
                io::stdin().read_line(&mut new_line)
            }
            FType::BReader(br) => br.read_line(&mut new_line),
        };
        match result {
            Ok(0) => None,
            Ok(_) => Some(new_line),
            Err(e) => {
                self.msg.error("get_line", "read_line error", Some(e.to_string()));
                None
            }
        }
    }

    /// read_char reads a single raw byte from this source, bypassing the
    /// line cache. Used by the `KEY` primitive.
    pub fn read_char(&mut self) -> Option<u8> {
        let mut buf = [0u8; 1];
        let result = match &mut self.source {
            FType::Stdin => io::stdin().lock().read(&mut buf),
            FType::BReader(br) => br.read(&mut buf),
        };
        match result {
            Ok(1) => Some(buf[0]),
            _ => None,
        }
    }

    pub fn file_mode(&self) -> &FileMode {
        &self.file_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_file_errors() {
        assert!(FileHandle::open(Path::new("/nonexistent/path/to/nothing.fs")).is_err());
    }

    #[test]
    fn test_stdin_file_mode_is_ro() {
        let handle = FileHandle::stdin();
        assert_eq!(handle.file_mode(), &FileMode::RO);
    }
}
