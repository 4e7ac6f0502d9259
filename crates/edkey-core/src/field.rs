// Edkey Field Editor
// Bounded single-line input over the engine's literal-byte source

use crate::input::{ByteSource, TerminalModes};
use crate::resolver::{InputError, KeyEngine};

/// Screen-primitive contract consumed by the field editor.
///
/// Coordinates are `(row, col)`, zero-based. Writing a byte advances the
/// cursor one cell, wrapping at the right edge.
pub trait FieldDisplay {
    fn cursor(&mut self) -> (u16, u16);
    /// Screen dimensions as `(rows, cols)`.
    fn size(&self) -> (u16, u16);
    fn move_to(&mut self, row: u16, col: u16);
    fn put_byte(&mut self, byte: u8);
    fn put_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.put_byte(byte);
        }
    }
    fn refresh(&mut self);
}

/// Editing action selected for one input byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldAction {
    Erase,
    Kill,
    Done,
    Insert,
}

/// Transient state for one field-editing session.
struct FieldSession<'a> {
    screen: &'a mut dyn FieldDisplay,
    buf: &'a mut Vec<u8>,
    /// Bytes currently live in the field.
    index: usize,
    /// Capacity, terminator slot already reserved.
    length: usize,
    echo: bool,
    /// Screen position of the field's first cell.
    anchor: (u16, u16),
}

/// Edit a single line in place, reading literal bytes through the
/// engine (replay stack first, device otherwise — never through table
/// matching).
///
/// `buf` may arrive pre-filled; its content is painted at the current
/// cursor position, which becomes the field anchor. `limit` bounds the
/// stored bytes with one slot reserved for the terminator; when absent,
/// the screen width is used. The erase and kill control bytes are
/// captured from the terminal driver at entry.
///
/// A printable first keystroke replaces the pre-filled content instead
/// of appending to it; any edit command leaves it in place.
pub fn read_field(
    engine: &mut KeyEngine,
    dev: &mut dyn ByteSource,
    screen: &mut dyn FieldDisplay,
    modes: &dyn TerminalModes,
    buf: &mut Vec<u8>,
    limit: Option<usize>,
    echo: bool,
) -> Result<(), InputError> {
    let length = limit.unwrap_or(screen.size().1 as usize);
    if length < 2 {
        return Err(InputError::FieldTooNarrow);
    }
    let erase = modes.erase_byte();
    let kill = modes.kill_byte();

    let index = buf.len();
    let anchor = screen.cursor();
    log::debug!("field entry at {anchor:?}: {index} bytes prefilled, capacity {}", length - 1);
    let mut field = FieldSession {
        screen,
        buf,
        index,
        length: length - 1,
        echo,
        anchor,
    };
    field.screen.put_bytes(field.buf);
    field.screen.move_to(anchor.0, anchor.1);

    let mut first = true;
    loop {
        field.screen.refresh();
        let byte = engine.read_literal(dev)?;
        let action = classify(byte, erase, kill);
        if first && action == FieldAction::Insert {
            // Typing over a pre-filled field replaces it.
            field.kill_all();
        }
        first = false;
        match action {
            FieldAction::Erase => field.erase_one(),
            FieldAction::Kill => field.kill_all(),
            FieldAction::Done => break,
            FieldAction::Insert => field.insert(byte),
        }
    }
    let end = field.index;
    field.buf.truncate(end);
    Ok(())
}

fn classify(byte: u8, erase: u8, kill: u8) -> FieldAction {
    if byte == erase || byte == 0x08 {
        FieldAction::Erase
    } else if byte == kill {
        FieldAction::Kill
    } else if byte == b'\r' || byte == b'\n' {
        FieldAction::Done
    } else {
        FieldAction::Insert
    }
}

impl FieldSession<'_> {
    /// Move the cursor back one visual position, wrapping to the last
    /// column of the previous row at column zero.
    fn cursor_left(&mut self) {
        let (mut row, mut col) = self.screen.cursor();
        let (_, cols) = self.screen.size();
        if col > 0 {
            col -= 1;
        } else if row > 0 {
            // Reverse line wrap.
            row -= 1;
            col = cols - 1;
        }
        self.screen.move_to(row, col);
    }

    /// Drop the last byte, blanking its screen cell.
    fn erase_one(&mut self) {
        if self.index == 0 {
            return;
        }
        self.index -= 1;
        self.cursor_left();
        let (row, col) = self.screen.cursor();
        self.screen.put_byte(b' ');
        self.screen.move_to(row, col);
    }

    /// Empty the field, blanking every occupied cell and restoring the
    /// cursor to the anchor.
    fn kill_all(&mut self) {
        self.screen.move_to(self.anchor.0, self.anchor.1);
        for _ in 0..self.index {
            self.screen.put_byte(b' ');
        }
        self.screen.move_to(self.anchor.0, self.anchor.1);
        self.index = 0;
    }

    /// Store one byte, if room remains. At capacity this is a no-op and
    /// editing continues.
    fn insert(&mut self, byte: u8) {
        if self.index >= self.length {
            return;
        }
        if self.index < self.buf.len() {
            self.buf[self.index] = byte;
        } else {
            self.buf.push(byte);
        }
        self.index += 1;
        if self.echo {
            self.screen.put_byte(byte);
        }
    }
}
