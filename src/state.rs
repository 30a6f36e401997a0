//! Shadow copy of what the display is showing. The device cannot be read back, so the
//! driver trusts this model as the only record of the screen contents.

use core::fmt::Display;

use crate::protocol::{CursorMode, COLS, ROWS};

/// Width of one display line in characters.
pub const LINE_WIDTH: usize = COLS as usize;

const BLANK_LINE: [u8; LINE_WIDTH] = [b' '; LINE_WIDTH];

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
/// Errors raised by the display model before anything is sent to the device
pub enum StateError {
    /// Text does not fit in a 16 character line, or is not printable ASCII
    InvalidInput,
    /// Row or column is outside the display
    OutOfRange,
}

impl From<&StateError> for &'static str {
    fn from(err: &StateError) -> Self {
        match err {
            StateError::InvalidInput => "Text too long or not printable",
            StateError::OutOfRange => "Cursor position out of range",
        }
    }
}

impl Display for StateError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg: &'static str = From::from(self);
        write!(f, "{}", msg)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StateError {
    fn format(&self, fmt: defmt::Formatter) {
        let msg: &'static str = From::from(self);
        defmt::write!(fmt, "{}", msg);
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DisplayState {
    lines: [[u8; LINE_WIDTH]; 2],
    cursor: (u8, u8),
    mode: CursorMode,
    backlight_on: bool,
    display_on: bool,
}

impl Default for DisplayState {
    fn default() -> Self {
        DisplayState {
            lines: [BLANK_LINE; 2],
            cursor: (0, 0),
            mode: CursorMode::default(),
            backlight_on: false,
            display_on: true,
        }
    }
}

impl DisplayState {
    /// Replace the given lines, padding each with spaces to the full width. Lines passed
    /// as `None` are left alone. Nothing changes if either line is too long.
    pub fn update(&mut self, line0: Option<&str>, line1: Option<&str>) -> Result<(), StateError> {
        let line0 = line0.map(pad_line).transpose()?;
        let line1 = line1.map(pad_line).transpose()?;
        if let Some(line) = line0 {
            self.lines[0] = line;
        }
        if let Some(line) = line1 {
            self.lines[1] = line;
        }
        Ok(())
    }

    /// Blank both lines and home the cursor.
    pub fn clear(&mut self) {
        self.lines = [BLANK_LINE; 2];
        self.cursor = (0, 0);
    }

    pub fn move_cursor(&mut self, row: u8, col: u8) -> Result<(), StateError> {
        if row >= ROWS || col >= COLS {
            return Err(StateError::OutOfRange);
        }
        self.cursor = (row, col);
        Ok(())
    }

    /// Store a character at the cursor and advance it. The device continues on the
    /// other line after the last column, so the 32 cells form a ring.
    pub fn put(&mut self, byte: u8) -> Result<(), StateError> {
        if !is_printable(byte) {
            return Err(StateError::InvalidInput);
        }
        let (row, col) = self.cursor;
        self.lines[row as usize][col as usize] = byte;
        self.cursor_right();
        Ok(())
    }

    /// Replace both lines with bytes taken from another state.
    pub(crate) fn set_lines(&mut self, lines: [[u8; LINE_WIDTH]; 2]) {
        self.lines = lines;
    }

    pub fn next_line(&mut self) {
        self.cursor = match self.cursor.0 {
            0 => (1, 0),
            _ => (0, 0),
        };
    }

    pub fn cursor_left(&mut self) {
        let cell = (self.cell() + Self::CELLS - 1) % Self::CELLS;
        self.cursor = Self::from_cell(cell);
    }

    pub fn cursor_right(&mut self) {
        let cell = (self.cell() + 1) % Self::CELLS;
        self.cursor = Self::from_cell(cell);
    }

    pub fn set_backlight(&mut self, on: bool) {
        self.backlight_on = on;
    }

    /// Selecting a mode always turns the display on.
    pub fn set_mode(&mut self, mode: CursorMode) {
        self.mode = mode;
        self.display_on = true;
    }

    pub fn set_display_off(&mut self) {
        self.display_on = false;
    }

    /// The text of a line, always 16 characters including padding.
    pub fn line(&self, row: usize) -> &str {
        self.lines
            .get(row)
            .and_then(|line| core::str::from_utf8(line).ok())
            .unwrap_or("")
    }

    /// The bytes of a line as sent to the device.
    pub fn line_bytes(&self, row: usize) -> &[u8; LINE_WIDTH] {
        &self.lines[row.min(1)]
    }

    pub fn is_blank(&self, row: usize) -> bool {
        self.lines.get(row).is_some_and(|line| *line == BLANK_LINE)
    }

    /// Cursor as `(row, col)`.
    pub fn cursor(&self) -> (u8, u8) {
        self.cursor
    }

    pub fn mode(&self) -> CursorMode {
        self.mode
    }

    pub fn backlight_on(&self) -> bool {
        self.backlight_on
    }

    pub fn display_on(&self) -> bool {
        self.display_on
    }

    const CELLS: usize = LINE_WIDTH * 2;

    fn cell(&self) -> usize {
        self.cursor.0 as usize * LINE_WIDTH + self.cursor.1 as usize
    }

    fn from_cell(cell: usize) -> (u8, u8) {
        ((cell / LINE_WIDTH) as u8, (cell % LINE_WIDTH) as u8)
    }
}

/// Bytes the display shows as characters. Everything else is a command.
pub const fn is_printable(byte: u8) -> bool {
    matches!(byte, 0x20..=0x7E)
}

/// Right pad `text` with spaces to a full line. Never truncates.
fn pad_line(text: &str) -> Result<[u8; LINE_WIDTH], StateError> {
    let bytes = text.as_bytes();
    if bytes.len() > LINE_WIDTH || !bytes.iter().copied().all(is_printable) {
        return Err(StateError::InvalidInput);
    }
    let mut line = BLANK_LINE;
    line[..bytes.len()].copy_from_slice(bytes);
    Ok(line)
}

#[cfg(test)]
mod state_tests {
    use super::*;

    #[test]
    fn test_update_pads_and_keeps_other_line() {
        let mut state = DisplayState::default();
        state.update(None, Some("second")).unwrap();
        for text in ["", "a", "Hello, world!", "exactly16chars!!"] {
            state.update(Some(text), None).unwrap();
            assert_eq!(state.line(0).len(), 16);
            assert!(state.line(0).starts_with(text));
            assert!(state.line(0)[text.len()..].bytes().all(|b| b == b' '));
            assert_eq!(state.line(1), "second          ");
        }
    }

    #[test]
    fn test_update_rejects_long_line_without_changes() {
        let mut state = DisplayState::default();
        state.update(Some("keep"), Some("me")).unwrap();
        let before = state.clone();
        assert_eq!(
            state.update(Some("ok"), Some("this line is too long")),
            Err(StateError::InvalidInput)
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_update_rejects_command_bytes() {
        let mut state = DisplayState::default();
        state.update(Some("keep"), Some("me")).unwrap();
        let before = state.clone();
        // "\u{e0}" is sent as 0xC3 0xA0, and 160 moves the cursor
        for text in ["\u{e0}", "a\nb", "\x0c", "tab\there", "del\x7f"] {
            assert_eq!(
                state.update(Some(text), None),
                Err(StateError::InvalidInput)
            );
            assert_eq!(state.update(None, Some(text)), Err(StateError::InvalidInput));
        }
        assert_eq!(state, before);
        assert!(state.update(Some(" !~ 0123 ABC xyz"), None).is_ok());
    }

    #[test]
    fn test_put_rejects_command_bytes() {
        let mut state = DisplayState::default();
        state.move_cursor(0, 3).unwrap();
        for byte in [0u8, 10, 12, 31, 127, 128, 160, 255] {
            assert_eq!(state.put(byte), Err(StateError::InvalidInput));
        }
        assert!(state.is_blank(0));
        assert_eq!(state.cursor(), (0, 3));
    }

    #[test]
    fn test_clear_resets_lines_and_cursor() {
        let mut state = DisplayState::default();
        state.update(Some("abc"), Some("def")).unwrap();
        state.move_cursor(1, 7).unwrap();
        state.clear();
        assert!(state.is_blank(0));
        assert!(state.is_blank(1));
        assert_eq!(state.cursor(), (0, 0));
        let once = state.clone();
        state.clear();
        assert_eq!(state, once);
    }

    #[test]
    fn test_move_cursor_bounds() {
        let mut state = DisplayState::default();
        for row in 0..2 {
            for col in 0..16 {
                assert!(state.move_cursor(row, col).is_ok());
                assert_eq!(state.cursor(), (row, col));
            }
        }
        state.move_cursor(1, 3).unwrap();
        assert_eq!(state.move_cursor(2, 0), Err(StateError::OutOfRange));
        assert_eq!(state.move_cursor(0, 16), Err(StateError::OutOfRange));
        assert_eq!(state.move_cursor(255, 255), Err(StateError::OutOfRange));
        assert_eq!(state.cursor(), (1, 3));
    }

    #[test]
    fn test_put_wraps_across_lines() {
        let mut state = DisplayState::default();
        state.move_cursor(0, 15).unwrap();
        state.put(b'x').unwrap();
        assert_eq!(state.cursor(), (1, 0));
        state.move_cursor(1, 15).unwrap();
        state.put(b'y').unwrap();
        assert_eq!(state.cursor(), (0, 0));
        assert_eq!(state.line(0), "               x");
        assert_eq!(state.line(1), "               y");
    }

    #[test]
    fn test_cursor_motion() {
        let mut state = DisplayState::default();
        state.cursor_left();
        assert_eq!(state.cursor(), (1, 15));
        state.cursor_right();
        assert_eq!(state.cursor(), (0, 0));
        state.move_cursor(0, 9).unwrap();
        state.next_line();
        assert_eq!(state.cursor(), (1, 0));
        state.next_line();
        assert_eq!(state.cursor(), (0, 0));
    }

    #[test]
    fn test_mode_turns_display_on() {
        let mut state = DisplayState::default();
        assert_eq!(state.mode(), CursorMode::CursorNoBlink);
        state.set_display_off();
        assert!(!state.display_on());
        state.set_mode(CursorMode::NoCursorBlink);
        assert!(state.display_on());
        assert_eq!(state.mode(), CursorMode::NoCursorBlink);
    }
}
