// Edkey Key Resolver
// Incremental byte-sequence matching with transparent macro replay

use std::collections::VecDeque;
use std::io;

use smallvec::SmallVec;
use thiserror::Error;

use crate::binding::BindingTable;
use crate::input::ByteSource;
use crate::key::{Command, Key};
use crate::replay::ReplayStack;

/// Upper bound on the bytes accumulated while matching one sequence.
pub const MAX_SEQUENCE_BYTES: usize = 64;

/// Errors surfaced while resolving input.
#[derive(Debug, Error)]
pub enum InputError {
    /// The accumulated bytes exceeded [`MAX_SEQUENCE_BYTES`].
    ///
    /// Recoverable: accumulation has already been reset, so the caller
    /// may ignore this and keep reading.
    #[error("key sequence exceeded the maximum length")]
    SequenceOverflow,

    /// The field editor was given a length bound with no editable room.
    #[error("field too narrow for input")]
    FieldTooNarrow,

    #[error("input device error: {0}")]
    Io(#[from] io::Error),
}

/// Outcome of one table scan, recorded so the borrow on the table ends
/// before the engine mutates itself.
enum MatchAction {
    /// Literal-quote: the next literal byte bypasses matching.
    Quote,
    /// Macro trigger: replay this body, consume the trigger silently.
    Expand(Option<Vec<u8>>),
    /// An exact match on an ordinary binding.
    Emit(Key),
}

/// The incremental key resolver.
///
/// Owns the binding table (read-only once built), the macro replay
/// stack, the bounded match record buffer, and the queue of leftover
/// bytes from abandoned accumulations. One engine per input session;
/// every operation runs on the single control thread.
#[derive(Debug)]
pub struct KeyEngine {
    table: BindingTable,
    replay: ReplayStack,
    record: SmallVec<[u8; MAX_SEQUENCE_BYTES]>,
    pending: VecDeque<u8>,
}

impl KeyEngine {
    pub fn new(table: BindingTable) -> Self {
        Self {
            table,
            replay: ReplayStack::new(),
            record: SmallVec::new(),
            pending: VecDeque::new(),
        }
    }

    pub fn table(&self) -> &BindingTable {
        &self.table
    }

    /// True while input is replaying from a macro rather than arriving
    /// from the live device.
    pub fn is_replaying(&self) -> bool {
        self.replay.is_active()
    }

    /// Drop all replay frames, pending bytes, and accumulated state
    /// (abort/reset path).
    pub fn flush_input(&mut self) {
        self.replay.flush();
        self.pending.clear();
        self.record.clear();
    }

    /// One literal byte: replay stack first, device otherwise.
    ///
    /// This is the byte source the field editor shares; it never
    /// consults the binding table.
    pub fn read_literal(&mut self, dev: &mut dyn ByteSource) -> Result<u8, InputError> {
        match self.replay.pop() {
            Some(byte) => Ok(byte),
            None => Ok(dev.next_byte()?),
        }
    }

    /// Resolve the next key event.
    ///
    /// Accumulates literal bytes until they select exactly one binding,
    /// remain a prefix of none, or overflow the sequence bound. Macro
    /// triggers are consumed silently and their bodies replayed; bytes
    /// that match nothing degrade to ordinary input, returned one per
    /// call in arrival order.
    pub fn next_key(&mut self, dev: &mut dyn ByteSource) -> Result<Key, InputError> {
        // Leftovers from a previous unresolved accumulation drain first,
        // one byte per call, before anything new is read.
        if let Some(byte) = self.pending.pop_front() {
            return Ok(Key::Char(byte));
        }
        self.record.clear();
        loop {
            if self.record.len() >= MAX_SEQUENCE_BYTES {
                log::warn!("key sequence exceeded {MAX_SEQUENCE_BYTES} bytes, resetting");
                self.record.clear();
                return Err(InputError::SequenceOverflow);
            }
            let byte = self.read_literal(dev)?;
            self.record.push(byte);

            let mut ambiguous = false;
            let mut action = None;
            for binding in self.table.iter() {
                let Some(lhs) = binding.lhs() else { continue };
                // Help text is content, not a match sequence.
                if binding.code() == Key::Code(Command::HelpText) {
                    continue;
                }
                if lhs == self.record.as_slice() {
                    action = Some(match binding.code() {
                        Key::Code(Command::Literal) => MatchAction::Quote,
                        Key::Code(Command::MacroDefine) => {
                            MatchAction::Expand(binding.rhs().map(<[u8]>::to_vec))
                        }
                        code => MatchAction::Emit(code),
                    });
                    // First full match in table order wins.
                    break;
                }
                if lhs.len() > self.record.len() && lhs.starts_with(&self.record) {
                    ambiguous = true;
                }
            }

            match action {
                Some(MatchAction::Quote) => {
                    // The quoted byte is consumed raw exactly once; it
                    // never re-enters matching.
                    self.record.clear();
                    let raw = self.read_literal(dev)?;
                    return Ok(Key::Char(raw));
                }
                Some(MatchAction::Expand(rhs)) => {
                    log::trace!("macro trigger matched, replaying {:?} bytes",
                        rhs.as_ref().map(Vec::len));
                    if let Some(body) = rhs {
                        self.replay.push(&body);
                    }
                    self.record.clear();
                }
                Some(MatchAction::Emit(code)) => {
                    self.record.clear();
                    return Ok(code);
                }
                None => {
                    if ambiguous {
                        continue;
                    }
                    // No live binding matches: the first recorded byte
                    // becomes ordinary input and the rest queue up for
                    // the leftover drain above.
                    let first = self.record[0];
                    self.pending.extend(self.record[1..].iter().copied());
                    self.record.clear();
                    return Ok(Key::Char(first));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::Binding;
    use crate::input::MemorySource;

    fn entry(code: Command, lhs: &[u8]) -> Binding {
        Binding::new(Key::Code(code), Some(lhs.to_vec()), None)
    }

    fn macro_entry(lhs: &[u8], rhs: &[u8]) -> Binding {
        Binding::new(
            Key::Code(Command::MacroDefine),
            Some(lhs.to_vec()),
            Some(rhs.to_vec()),
        )
    }

    fn engine(entries: Vec<Binding>) -> KeyEngine {
        let mut table = BindingTable::new();
        for binding in entries {
            table.push(binding);
        }
        KeyEngine::new(table)
    }

    #[test]
    fn test_unbound_byte_passes_through() {
        let mut eng = engine(vec![entry(Command::CursorUp, &[0x05])]);
        let mut dev = MemorySource::new(b"x");
        assert_eq!(eng.next_key(&mut dev).unwrap(), Key::Char(b'x'));
    }

    #[test]
    fn test_single_byte_binding_resolves() {
        let mut eng = engine(vec![entry(Command::CursorUp, &[0x05])]);
        let mut dev = MemorySource::new(&[0x05]);
        assert_eq!(
            eng.next_key(&mut dev).unwrap(),
            Key::Code(Command::CursorUp)
        );
    }

    #[test]
    fn test_multi_byte_sequence_resolves() {
        let mut eng = engine(vec![entry(Command::CursorUp, b"\x1b[A")]);
        let mut dev = MemorySource::new(b"\x1b[A");
        assert_eq!(
            eng.next_key(&mut dev).unwrap(),
            Key::Code(Command::CursorUp)
        );
    }

    #[test]
    fn test_abandoned_prefix_drains_one_byte_per_call() {
        let mut eng = engine(vec![entry(Command::CursorUp, b"\x1b[A")]);
        // ESC [ then an unrelated byte: nothing matches, nothing is lost.
        let mut dev = MemorySource::new(b"\x1b[Q");
        assert_eq!(eng.next_key(&mut dev).unwrap(), Key::Char(0x1b));
        assert_eq!(eng.next_key(&mut dev).unwrap(), Key::Char(b'['));
        assert_eq!(eng.next_key(&mut dev).unwrap(), Key::Char(b'Q'));
        assert!(eng.next_key(&mut dev).is_err());
    }

    #[test]
    fn test_leftovers_drain_before_new_reads() {
        let mut eng = engine(vec![entry(Command::CursorUp, b"ab")]);
        let mut dev = MemorySource::new(b"ax");
        assert_eq!(eng.next_key(&mut dev).unwrap(), Key::Char(b'a'));
        // 'x' is already pending; this call must not touch the device.
        let mut empty = MemorySource::new(b"");
        assert_eq!(eng.next_key(&mut empty).unwrap(), Key::Char(b'x'));
    }

    #[test]
    fn test_first_full_match_in_table_order_wins() {
        let mut eng = engine(vec![
            entry(Command::CursorUp, &[0x05]),
            entry(Command::CursorDown, &[0x05]),
        ]);
        let mut dev = MemorySource::new(&[0x05, 0x05]);
        assert_eq!(
            eng.next_key(&mut dev).unwrap(),
            Key::Code(Command::CursorUp)
        );
        assert_eq!(
            eng.next_key(&mut dev).unwrap(),
            Key::Code(Command::CursorUp)
        );
    }

    #[test]
    fn test_full_match_beats_longer_prefix_candidate() {
        // "ab" is also a prefix of a later binding, but the exact match
        // wins immediately; ambiguity never delays it.
        let mut eng = engine(vec![
            entry(Command::Cut, b"ab"),
            entry(Command::Paste, b"abc"),
        ]);
        let mut dev = MemorySource::new(b"ab");
        assert_eq!(eng.next_key(&mut dev).unwrap(), Key::Code(Command::Cut));
    }

    #[test]
    fn test_disabled_and_help_entries_never_match() {
        let mut eng = engine(vec![
            Binding::reserved(Key::Code(Command::HelpOff)),
            Binding::new(
                Key::Code(Command::HelpText),
                Some(b"h".to_vec()),
                None,
            ),
        ]);
        let mut dev = MemorySource::new(b"h");
        assert_eq!(eng.next_key(&mut dev).unwrap(), Key::Char(b'h'));
    }

    #[test]
    fn test_macro_expansion_is_silent_and_replays() {
        let mut eng = engine(vec![macro_entry(&[0x14], b"hello")]);
        let mut dev = MemorySource::new(&[0x14]);
        for &expected in b"hello" {
            assert_eq!(eng.next_key(&mut dev).unwrap(), Key::Char(expected));
            // Replay is exhausted the moment the final byte is read.
            assert_eq!(eng.is_replaying(), expected != b'o');
        }
        assert!(eng.next_key(&mut dev).is_err());
    }

    #[test]
    fn test_macro_body_is_rematched() {
        // The macro body contains a bound sequence; replayed bytes go
        // through matching like any other literal bytes.
        let mut eng = engine(vec![
            entry(Command::CursorUp, &[0x05]),
            macro_entry(&[0x14], &[b'a', 0x05, b'b']),
        ]);
        let mut dev = MemorySource::new(&[0x14]);
        assert_eq!(eng.next_key(&mut dev).unwrap(), Key::Char(b'a'));
        assert_eq!(
            eng.next_key(&mut dev).unwrap(),
            Key::Code(Command::CursorUp)
        );
        assert_eq!(eng.next_key(&mut dev).unwrap(), Key::Char(b'b'));
    }

    #[test]
    fn test_nested_macros_drain_lifo() {
        // A's body triggers B mid-way; B's bytes come out before A's
        // tail, and depth never grows past the live expansions.
        let mut eng = engine(vec![
            macro_entry(&[0x01], b"x\x02y"),
            macro_entry(&[0x02], b"mn"),
        ]);
        let mut dev = MemorySource::new(&[0x01]);
        let mut out = Vec::new();
        for _ in 0..4 {
            match eng.next_key(&mut dev).unwrap() {
                Key::Char(byte) => out.push(byte),
                key => panic!("unexpected {key}"),
            }
        }
        assert_eq!(out, b"xmny");
        assert!(!eng.is_replaying());
    }

    #[test]
    fn test_macro_without_body_is_consumed_silently() {
        let mut eng = engine(vec![Binding::new(
            Key::Code(Command::MacroDefine),
            Some(vec![0x14]),
            None,
        )]);
        let mut dev = MemorySource::new(&[0x14, b'z']);
        // The trigger produces no event; the next real byte does.
        assert_eq!(eng.next_key(&mut dev).unwrap(), Key::Char(b'z'));
    }

    #[test]
    fn test_literal_quote_returns_next_byte_raw() {
        let mut eng = engine(vec![
            entry(Command::Literal, &[0x16]),
            entry(Command::CursorUp, &[0x05]),
        ]);
        // Quote a byte that is itself bound: it must come through raw,
        // and the binding must fire normally afterwards.
        let mut dev = MemorySource::new(&[0x16, 0x05, 0x05]);
        assert_eq!(eng.next_key(&mut dev).unwrap(), Key::Char(0x05));
        assert_eq!(
            eng.next_key(&mut dev).unwrap(),
            Key::Code(Command::CursorUp)
        );
    }

    #[test]
    fn test_sequence_overflow_resets_and_recovers() {
        // A binding long enough that input can stay ambiguous past the
        // bound: every byte is a strict prefix of the next.
        let long = vec![b'a'; MAX_SEQUENCE_BYTES + 8];
        let mut eng = engine(vec![entry(Command::Help, &long)]);
        let mut dev = MemorySource::new(&vec![b'a'; MAX_SEQUENCE_BYTES + 1]);
        assert!(matches!(
            eng.next_key(&mut dev),
            Err(InputError::SequenceOverflow)
        ));
        // Recoverable: the engine keeps working afterwards. One 'a' is
        // still unread; it falls back to ordinary input once 'z' breaks
        // the ambiguity.
        dev.feed(b"z");
        assert_eq!(eng.next_key(&mut dev).unwrap(), Key::Char(b'a'));
        assert_eq!(eng.next_key(&mut dev).unwrap(), Key::Char(b'z'));
    }

    #[test]
    fn test_flush_input_discards_replay_and_pending() {
        let mut eng = engine(vec![
            entry(Command::CursorUp, b"ab"),
            macro_entry(&[0x14], b"hello"),
        ]);
        let mut dev = MemorySource::new(&[0x14]);
        assert_eq!(eng.next_key(&mut dev).unwrap(), Key::Char(b'h'));
        assert!(eng.is_replaying());
        eng.flush_input();
        assert!(!eng.is_replaying());
        let mut dev = MemorySource::new(b"q");
        assert_eq!(eng.next_key(&mut dev).unwrap(), Key::Char(b'q'));
    }

    #[test]
    fn test_read_literal_prefers_replay() {
        let mut eng = engine(vec![macro_entry(&[0x14], b"ab")]);
        let mut dev = MemorySource::new(&[0x14, b'z']);
        // Resolve the trigger; 'a' comes back, 'b' stays queued.
        assert_eq!(eng.next_key(&mut dev).unwrap(), Key::Char(b'a'));
        assert_eq!(eng.read_literal(&mut dev).unwrap(), b'b');
        assert_eq!(eng.read_literal(&mut dev).unwrap(), b'z');
    }
}
