// Edkey Binding Table
// Ordered key bindings compiled from configuration directives

use crate::key::{Command, Key};

/// One compiled binding: a key code plus the raw byte sequences that
/// select it.
///
/// `lhs` is the match sequence; when absent the entry is a disabled
/// placeholder that reserves its code but never matches. `rhs` is present
/// only for macro bindings and holds the replay body.
#[derive(Debug, Clone)]
pub struct Binding {
    code: Key,
    lhs: Option<Vec<u8>>,
    rhs: Option<Vec<u8>>,
}

impl Binding {
    pub fn new(code: Key, lhs: Option<Vec<u8>>, rhs: Option<Vec<u8>>) -> Self {
        Self { code, lhs, rhs }
    }

    /// Disabled placeholder: the code stays reserved, nothing matches.
    pub fn reserved(code: Key) -> Self {
        Self::new(code, None, None)
    }

    pub fn code(&self) -> Key {
        self.code
    }

    pub fn lhs(&self) -> Option<&[u8]> {
        self.lhs.as_deref()
    }

    pub fn rhs(&self) -> Option<&[u8]> {
        self.rhs.as_deref()
    }

    /// True when the entry can never match input.
    pub fn is_disabled(&self) -> bool {
        self.lhs.is_none()
    }

    /// True for macro bindings whose match replays `rhs`.
    pub fn is_macro(&self) -> bool {
        self.code == Key::Code(Command::MacroDefine)
    }
}

/// The ordered binding table built by the configuration loader.
///
/// Table order is match priority: the first full match in load order
/// wins, so directive order in the configuration file is significant.
/// Immutable once loading completes.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    entries: Vec<Binding>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, binding: Binding) {
        self.entries.push(binding);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Binding> {
        self.entries.iter()
    }

    /// Find the first binding whose match sequence equals `seq`.
    ///
    /// Disabled entries never match. Table order breaks ties.
    pub fn find_seq(&self, seq: &[u8]) -> Option<&Binding> {
        self.entries.iter().find(|b| b.lhs() == Some(seq))
    }

    /// Inline help content from the first help-text entry, if any.
    pub fn help_text(&self) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|b| b.code() == Key::Code(Command::HelpText))
            .and_then(Binding::lhs)
    }
}

impl<'a> IntoIterator for &'a BindingTable {
    type Item = &'a Binding;
    type IntoIter = std::slice::Iter<'a, Binding>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
