// Edkey Input Collaborators
// Device-byte and terminal-driver contracts consumed by the engine

use std::collections::VecDeque;
use std::io;

/// Blocking source of literal input bytes — the live device contract.
///
/// The engine is single-threaded and synchronous: a read suspends the
/// whole process until a byte is available.
pub trait ByteSource {
    fn next_byte(&mut self) -> io::Result<u8>;
}

/// Terminal-driver queries for the session's control characters.
///
/// Queried at load time (`.stty_erase` / `.stty_kill` directives) and
/// again at field entry, so behavior follows the user's current stty
/// settings rather than a compile-time default.
pub trait TerminalModes {
    fn erase_byte(&self) -> u8;
    fn kill_byte(&self) -> u8;
}

/// In-memory byte source for scripted input.
#[derive(Debug, Default)]
pub struct MemorySource {
    bytes: VecDeque<u8>,
}

impl MemorySource {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.iter().copied().collect(),
        }
    }

    /// Append more scripted bytes.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.bytes.extend(bytes.iter().copied());
    }

    pub fn is_drained(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl ByteSource for MemorySource {
    fn next_byte(&mut self) -> io::Result<u8> {
        self.bytes
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "scripted input drained"))
    }
}

/// Fixed erase/kill control bytes, for embedders without a live driver.
#[derive(Debug, Clone, Copy)]
pub struct StaticModes {
    pub erase: u8,
    pub kill: u8,
}

impl Default for StaticModes {
    fn default() -> Self {
        // BS and ^U, the usual stty defaults.
        Self {
            erase: 0x08,
            kill: 0x15,
        }
    }
}

impl TerminalModes for StaticModes {
    fn erase_byte(&self) -> u8 {
        self.erase
    }

    fn kill_byte(&self) -> u8 {
        self.kill
    }
}
