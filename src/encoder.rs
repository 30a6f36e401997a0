use embedded_io::Write;

use crate::{
    protocol::{
        self, CursorMode, Note, NoteLength, Octave, LCD_CMD_BACKLIGHT_OFF, LCD_CMD_BACKLIGHT_ON,
        LCD_CMD_CLEARSCREEN, LCD_CMD_CURSOR_LEFT, LCD_CMD_CURSOR_RIGHT, LCD_CMD_DISPLAY_OFF,
        LCD_CMD_NEXTLINE,
    },
    SerialLcdError,
};

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
/// Every single-byte command the display understands.
pub enum Command {
    ClearScreen,
    NextLine,
    BacklightOn,
    BacklightOff,
    DisplayOff,
    CursorLeft,
    CursorRight,
    /// Display on with the given cursor setting
    DisplayMode(CursorMode),
    /// Move the cursor. Callers validate the position first.
    CursorPosition { row: u8, col: u8 },
    Note(Note),
    NoteLength(NoteLength),
    Octave(Octave),
}

impl Command {
    /// The command byte, or `None` for a cursor position that is off the display.
    pub const fn byte(&self) -> Option<u8> {
        let byte = match self {
            Command::ClearScreen => LCD_CMD_CLEARSCREEN,
            Command::NextLine => LCD_CMD_NEXTLINE,
            Command::BacklightOn => LCD_CMD_BACKLIGHT_ON,
            Command::BacklightOff => LCD_CMD_BACKLIGHT_OFF,
            Command::DisplayOff => LCD_CMD_DISPLAY_OFF,
            Command::CursorLeft => LCD_CMD_CURSOR_LEFT,
            Command::CursorRight => LCD_CMD_CURSOR_RIGHT,
            Command::DisplayMode(mode) => mode.byte(),
            Command::CursorPosition { row, col } => return protocol::cursor_position(*row, *col),
            Command::Note(note) => note.byte(),
            Command::NoteLength(length) => length.byte(),
            Command::Octave(octave) => octave.byte(),
        };
        Some(byte)
    }
}

/// Owns the serial transport. All bytes the driver sends pass through here, one call
/// per device-visible effect.
pub struct CommandEncoder<SERIAL>
where
    SERIAL: Write,
{
    serial: SERIAL,
}

impl<SERIAL> CommandEncoder<SERIAL>
where
    SERIAL: Write,
{
    pub fn new(serial: SERIAL) -> Self {
        Self { serial }
    }

    pub fn send(&mut self, command: Command) -> Result<(), SerialLcdError<SERIAL>> {
        let byte = command.byte().ok_or(SerialLcdError::OutOfRange)?;
        self.write_bytes(&[byte])
    }

    /// Send a run of characters in a single write. The device prints them from the
    /// current cursor and moves to the next line after column 15.
    pub fn send_text(&mut self, text: &[u8]) -> Result<(), SerialLcdError<SERIAL>> {
        if text.is_empty() {
            return Ok(());
        }
        self.write_bytes(text)
    }

    /// returns the serial object. mostly used for testing
    pub fn serial(&mut self) -> &mut SERIAL {
        &mut self.serial
    }

    pub fn release(self) -> SERIAL {
        self.serial
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<(), SerialLcdError<SERIAL>> {
        self.serial
            .write_all(data)
            .map_err(SerialLcdError::IoError)
    }
}
