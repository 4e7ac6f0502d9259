// Edkey Key Types
// Literal bytes and extended command codes produced by the resolver

use std::fmt;

use strum_macros::{Display, EnumIter};

/// Extended command code bound to a key sequence.
///
/// One variant per configuration keyword. The resolver hands these to the
/// editor's dispatch layer; `MacroDefine` and `Literal` are consumed by
/// the resolver itself and only reach the caller for reserved placeholder
/// entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    InsertEnter,
    InsertExit,
    DeleteLeft,
    DeleteRight,
    Block,
    Cut,
    Paste,
    Undo,
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    PageUp,
    PageDown,
    WordLeft,
    WordRight,
    LineLeft,
    LineRight,
    FileTop,
    FileBottom,
    Help,
    HelpOff,
    HelpText,
    Macro,
    MacroDefine,
    Quit,
    QuitAsk,
    FileRead,
    FileWrite,
    SttyErase,
    SttyKill,
    Itself,
    Redraw,
    ShowVersion,
    Literal,
}

/// A resolved key event.
///
/// Either a plain literal byte passed through unmodified, or an extended
/// command resolved from a bound sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Key {
    /// Plain literal byte.
    Char(u8),
    /// Extended command code.
    Code(Command),
}

impl Key {
    /// True for plain literal bytes.
    pub fn is_char(self) -> bool {
        matches!(self, Key::Char(_))
    }

    /// The literal byte, if this is one.
    pub fn as_char(self) -> Option<u8> {
        match self {
            Key::Char(byte) => Some(byte),
            Key::Code(_) => None,
        }
    }
}

impl From<Command> for Key {
    fn from(code: Command) -> Self {
        Key::Code(code)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(byte) if byte.is_ascii_graphic() || *byte == b' ' => {
                write!(f, "'{}'", *byte as char)
            }
            Key::Char(byte) => write!(f, "0x{byte:02x}"),
            Key::Code(code) => write!(f, "<{code}>"),
        }
    }
}
