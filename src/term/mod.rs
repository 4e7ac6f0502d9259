// Edkey Terminal Backend
// Crossterm and termios implementations of the engine's collaborator traits

use std::io::{self, Read, Write};

use crossterm::{cursor, execute, terminal};

use edkey_core::{ByteSource, FieldDisplay, TerminalModes};

/// Blocking single-byte reads from standard input.
pub struct TtyInput {
    stdin: io::Stdin,
}

impl TtyInput {
    pub fn new() -> Self {
        Self { stdin: io::stdin() }
    }
}

impl Default for TtyInput {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteSource for TtyInput {
    fn next_byte(&mut self) -> io::Result<u8> {
        let mut byte = [0u8; 1];
        loop {
            match self.stdin.read(&mut byte) {
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "terminal closed",
                    ))
                }
                Ok(_) => return Ok(byte[0]),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
    }
}

/// Live erase/kill control bytes from the terminal driver.
#[derive(Debug, Clone, Copy)]
pub struct TtyModes {
    erase: u8,
    kill: u8,
}

impl TtyModes {
    /// Snapshot the driver's current control characters, so bindings
    /// and fields follow the user's stty settings.
    pub fn capture() -> io::Result<Self> {
        let mut tio = std::mem::MaybeUninit::<libc::termios>::uninit();
        // SAFETY: tcgetattr fully initializes the struct on success.
        let tio = unsafe {
            if libc::tcgetattr(libc::STDIN_FILENO, tio.as_mut_ptr()) != 0 {
                return Err(io::Error::last_os_error());
            }
            tio.assume_init()
        };
        Ok(Self {
            erase: tio.c_cc[libc::VERASE],
            kill: tio.c_cc[libc::VKILL],
        })
    }
}

impl TerminalModes for TtyModes {
    fn erase_byte(&self) -> u8 {
        self.erase
    }

    fn kill_byte(&self) -> u8 {
        self.kill
    }
}

/// Raw-mode guard; restores the terminal on drop.
pub struct RawMode;

impl RawMode {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(err) = terminal::disable_raw_mode() {
            log::warn!("could not restore terminal mode: {err}");
        }
    }
}

/// Field display over crossterm cursor and screen operations.
pub struct TtyScreen {
    out: io::Stdout,
}

impl TtyScreen {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for TtyScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldDisplay for TtyScreen {
    fn cursor(&mut self) -> (u16, u16) {
        match cursor::position() {
            Ok((col, row)) => (row, col),
            Err(err) => {
                log::warn!("cursor query failed: {err}");
                (0, 0)
            }
        }
    }

    fn size(&self) -> (u16, u16) {
        match terminal::size() {
            Ok((cols, rows)) => (rows, cols),
            Err(_) => (24, 80),
        }
    }

    fn move_to(&mut self, row: u16, col: u16) {
        if let Err(err) = execute!(self.out, cursor::MoveTo(col, row)) {
            log::warn!("cursor move failed: {err}");
        }
    }

    fn put_byte(&mut self, byte: u8) {
        let _ = self.out.write_all(&[byte]);
    }

    fn refresh(&mut self) {
        let _ = self.out.flush();
    }
}
