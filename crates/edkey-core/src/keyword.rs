// Edkey Keyword Table
// Static directive descriptors for the configuration loader

use crate::key::Command;

/// Handler capability selected by a configuration keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    /// One token: encode it as the binding's match sequence.
    Default,
    /// Zero, one, or two tokens: placeholder, bare trigger, or macro.
    Define,
    /// Clear the binding, keeping its code reserved.
    Token,
    /// Bind the first character of the directive line itself.
    Itself,
    /// Bind the terminal driver's current erase control byte.
    Erase,
    /// Bind the terminal driver's current kill control byte.
    Kill,
    /// Capture verbatim lines up to ".end" as help content.
    HelpText,
}

/// Static descriptor tying a directive name to its command code and
/// handler capability. Read-only, process-lifetime.
#[derive(Debug, Clone, Copy)]
pub struct Keyword {
    pub code: Command,
    pub name: &'static str,
    pub handler: Handler,
}

/// The directive table, one entry per recognized keyword.
pub static KEYWORDS: &[Keyword] = &[
    Keyword { code: Command::InsertEnter, name: ".insert_enter", handler: Handler::Default },
    Keyword { code: Command::InsertExit, name: ".insert_exit", handler: Handler::Default },
    Keyword { code: Command::DeleteLeft, name: ".delete_left", handler: Handler::Default },
    Keyword { code: Command::DeleteRight, name: ".delete_right", handler: Handler::Default },
    Keyword { code: Command::Block, name: ".block", handler: Handler::Default },
    Keyword { code: Command::Cut, name: ".cut", handler: Handler::Default },
    Keyword { code: Command::Paste, name: ".paste", handler: Handler::Default },
    Keyword { code: Command::Undo, name: ".undo", handler: Handler::Default },
    Keyword { code: Command::CursorUp, name: ".cursor_up", handler: Handler::Default },
    Keyword { code: Command::CursorDown, name: ".cursor_down", handler: Handler::Default },
    Keyword { code: Command::CursorLeft, name: ".cursor_left", handler: Handler::Default },
    Keyword { code: Command::CursorRight, name: ".cursor_right", handler: Handler::Default },
    Keyword { code: Command::PageUp, name: ".page_up", handler: Handler::Default },
    Keyword { code: Command::PageDown, name: ".page_down", handler: Handler::Default },
    Keyword { code: Command::WordLeft, name: ".word_left", handler: Handler::Default },
    Keyword { code: Command::WordRight, name: ".word_right", handler: Handler::Default },
    Keyword { code: Command::LineLeft, name: ".line_left", handler: Handler::Default },
    Keyword { code: Command::LineRight, name: ".line_right", handler: Handler::Default },
    Keyword { code: Command::FileTop, name: ".file_top", handler: Handler::Default },
    Keyword { code: Command::FileBottom, name: ".file_bottom", handler: Handler::Default },
    Keyword { code: Command::Help, name: ".help", handler: Handler::Default },
    Keyword { code: Command::HelpOff, name: ".help_off", handler: Handler::Token },
    Keyword { code: Command::HelpText, name: ".help_text", handler: Handler::HelpText },
    Keyword { code: Command::Macro, name: ".macro", handler: Handler::Default },
    Keyword { code: Command::MacroDefine, name: ".macro_define", handler: Handler::Define },
    Keyword { code: Command::Quit, name: ".quit", handler: Handler::Default },
    Keyword { code: Command::QuitAsk, name: ".quit_ask", handler: Handler::Default },
    Keyword { code: Command::FileRead, name: ".file_read", handler: Handler::Default },
    Keyword { code: Command::FileWrite, name: ".file_write", handler: Handler::Default },
    Keyword { code: Command::SttyErase, name: ".stty_erase", handler: Handler::Erase },
    Keyword { code: Command::SttyKill, name: ".stty_kill", handler: Handler::Kill },
    Keyword { code: Command::Itself, name: ".itself", handler: Handler::Itself },
    Keyword { code: Command::Redraw, name: ".redraw", handler: Handler::Default },
    Keyword { code: Command::ShowVersion, name: ".show_version", handler: Handler::Default },
    Keyword { code: Command::Literal, name: ".literal", handler: Handler::Default },
];

impl Keyword {
    /// Look up a descriptor by directive name.
    ///
    /// The token must already be case-normalized to lowercase.
    pub fn find(token: &str) -> Option<&'static Keyword> {
        KEYWORDS.iter().find(|kw| kw.name == token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_lookup_known_directive() {
        let kw = Keyword::find(".cursor_up").unwrap();
        assert_eq!(kw.code, Command::CursorUp);
        assert_eq!(kw.handler, Handler::Default);
    }

    #[test]
    fn test_lookup_unknown_directive() {
        assert!(Keyword::find(".no_such_thing").is_none());
        assert!(Keyword::find("cursor_up").is_none());
        assert!(Keyword::find(".").is_none());
    }

    #[test]
    fn test_lookup_expects_normalized_case() {
        assert!(Keyword::find(".CURSOR_UP").is_none());
    }

    #[test]
    fn test_every_command_has_exactly_one_keyword() {
        for code in Command::iter() {
            let count = KEYWORDS.iter().filter(|kw| kw.code == code).count();
            assert_eq!(count, 1, "{code} should appear once in KEYWORDS");
        }
    }

    #[test]
    fn test_directive_names_are_unique_and_marked() {
        for (i, kw) in KEYWORDS.iter().enumerate() {
            assert!(kw.name.starts_with('.'), "{} lacks the marker", kw.name);
            assert_eq!(kw.name, kw.name.to_ascii_lowercase());
            assert!(
                KEYWORDS[i + 1..].iter().all(|other| other.name != kw.name),
                "duplicate directive {}",
                kw.name
            );
        }
    }

    #[test]
    fn test_directive_name_matches_command_stem() {
        for kw in KEYWORDS {
            assert_eq!(&kw.name[1..], kw.code.to_string());
        }
    }
}
