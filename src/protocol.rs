//! Command table for the Parallax 27977 serial LCD. All values are fixed by the device
//! firmware; there is no negotiation and nothing here is ever mutated.

use core::fmt::Display;
use core::str::FromStr;

// commands
pub const LCD_CMD_CURSOR_LEFT: u8 = 8; //  Move cursor one position left
pub const LCD_CMD_CURSOR_RIGHT: u8 = 9; //  Move cursor one position right
pub const LCD_CMD_CLEARSCREEN: u8 = 12; //  Clear display, cursor to (0, 0). Needs 5 ms before the next byte
pub const LCD_CMD_NEXTLINE: u8 = 13; //  Carriage return, cursor to start of the other line
pub const LCD_CMD_BACKLIGHT_ON: u8 = 17; //  Turn the backlight on
pub const LCD_CMD_BACKLIGHT_OFF: u8 = 18; //  Turn the backlight off
pub const LCD_CMD_DISPLAY_OFF: u8 = 21; //  Turn the display off

// display on, with cursor and blink settings
pub const LCD_CMD_MODE_NOCURSOR_NOBLINK: u8 = 22;
pub const LCD_CMD_MODE_NOCURSOR_BLINK: u8 = 23;
pub const LCD_CMD_MODE_CURSOR_NOBLINK: u8 = 24;
pub const LCD_CMD_MODE_CURSOR_BLINK: u8 = 25;

// cursor positioning, one code per cell
pub const LCD_CMD_ROW0_POSITION: u8 = 128; //  row 0 is 128..=143
pub const LCD_CMD_ROW1_POSITION: u8 = 148; //  row 1 is 148..=163

// speaker
pub const LCD_CMD_NOTE_LENGTH_BASE: u8 = 209; //  1/32 .. whole note is 209..=214
pub const LCD_CMD_OCTAVE_BASE: u8 = 215; //  3rd .. 7th octave is 215..=219
pub const LCD_CMD_NOTE_BASE: u8 = 220; //  A .. G# is 220..=231

/// Number of character rows on the display.
pub const ROWS: u8 = 2;
/// Number of character columns on the display.
pub const COLS: u8 = 16;

/// Returns the cursor position command for the cell at `row`, `col`, or `None` if the
/// cell is not on the display.
pub const fn cursor_position(row: u8, col: u8) -> Option<u8> {
    if col >= COLS {
        return None;
    }
    match row {
        0 => Some(LCD_CMD_ROW0_POSITION + col),
        1 => Some(LCD_CMD_ROW1_POSITION + col),
        _ => None,
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
/// A name that is not in one of the protocol tables.
pub struct ParseError;

impl Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Unrecognized name")
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ParseError {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "Unrecognized name");
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
/// Cursor and character blink setting. Selecting a mode also turns the display on.
pub enum CursorMode {
    /// Cursor shown, character blinks
    CursorBlink,
    /// Cursor shown, no blink
    #[default]
    CursorNoBlink,
    /// Cursor hidden, no blink
    NoCursorNoBlink,
    /// Cursor hidden, character blinks
    NoCursorBlink,
}

impl CursorMode {
    /// The display-on command byte for this mode
    pub const fn byte(&self) -> u8 {
        match self {
            CursorMode::CursorBlink => LCD_CMD_MODE_CURSOR_BLINK,
            CursorMode::CursorNoBlink => LCD_CMD_MODE_CURSOR_NOBLINK,
            CursorMode::NoCursorNoBlink => LCD_CMD_MODE_NOCURSOR_NOBLINK,
            CursorMode::NoCursorBlink => LCD_CMD_MODE_NOCURSOR_BLINK,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CursorMode {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            CursorMode::CursorBlink => defmt::write!(fmt, "CursorBlink"),
            CursorMode::CursorNoBlink => defmt::write!(fmt, "CursorNoBlink"),
            CursorMode::NoCursorNoBlink => defmt::write!(fmt, "NoCursorNoBlink"),
            CursorMode::NoCursorBlink => defmt::write!(fmt, "NoCursorBlink"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
/// The twelve pitch classes the speaker can play, in device order.
pub enum Note {
    A,
    ASharp,
    B,
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
}

impl Note {
    /// All notes in chromatic order starting at A.
    pub const ALL: [Note; 12] = [
        Note::A,
        Note::ASharp,
        Note::B,
        Note::C,
        Note::CSharp,
        Note::D,
        Note::DSharp,
        Note::E,
        Note::F,
        Note::FSharp,
        Note::G,
        Note::GSharp,
    ];

    /// The command byte that plays this note.
    pub const fn byte(&self) -> u8 {
        LCD_CMD_NOTE_BASE + *self as u8
    }

    /// The note name as used in song tokens, e.g. `"C#"`.
    pub const fn name(&self) -> &'static str {
        match self {
            Note::A => "A",
            Note::ASharp => "A#",
            Note::B => "B",
            Note::C => "C",
            Note::CSharp => "C#",
            Note::D => "D",
            Note::DSharp => "D#",
            Note::E => "E",
            Note::F => "F",
            Note::FSharp => "F#",
            Note::G => "G",
            Note::GSharp => "G#",
        }
    }
}

impl FromStr for Note {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Note::ALL
            .iter()
            .find(|note| note.name() == s)
            .copied()
            .ok_or(ParseError)
    }
}

impl Display for Note {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Note {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.name());
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
/// Note durations. Each selects the length of subsequently played notes and has a
/// fixed playback time.
pub enum NoteLength {
    ThirtySecond,
    Sixteenth,
    Eighth,
    Quarter,
    Half,
    Whole,
}

impl NoteLength {
    /// Every length, shortest first.
    pub const ALL: [NoteLength; 6] = [
        NoteLength::ThirtySecond,
        NoteLength::Sixteenth,
        NoteLength::Eighth,
        NoteLength::Quarter,
        NoteLength::Half,
        NoteLength::Whole,
    ];

    /// Command byte selecting this length.
    pub const fn byte(&self) -> u8 {
        LCD_CMD_NOTE_LENGTH_BASE + *self as u8
    }

    /// Playback time in microseconds. 1/32 is 62.5 ms, so milliseconds are too coarse.
    pub const fn micros(&self) -> u32 {
        match self {
            NoteLength::ThirtySecond => 62_500,
            NoteLength::Sixteenth => 125_000,
            NoteLength::Eighth => 250_000,
            NoteLength::Quarter => 500_000,
            NoteLength::Half => 1_000_000,
            NoteLength::Whole => 2_000_000,
        }
    }

    /// Playback time in seconds.
    pub fn seconds(&self) -> f32 {
        self.micros() as f32 / 1_000_000.0
    }

    /// Song notation for the length, as a fraction of a whole note.
    pub const fn name(&self) -> &'static str {
        match self {
            NoteLength::ThirtySecond => "1/32",
            NoteLength::Sixteenth => "1/16",
            NoteLength::Eighth => "1/8",
            NoteLength::Quarter => "1/4",
            NoteLength::Half => "1/2",
            NoteLength::Whole => "1",
        }
    }
}

impl FromStr for NoteLength {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NoteLength::ALL
            .iter()
            .find(|length| length.name() == s)
            .copied()
            .ok_or(ParseError)
    }
}

impl Display for NoteLength {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for NoteLength {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.name());
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
/// Speaker octave. The A of each band is 220, 440, 880, 1760 and 3520 Hz.
pub enum Octave {
    Third,
    Fourth,
    Fifth,
    Sixth,
    Seventh,
}

impl Octave {
    /// Every octave, lowest first.
    pub const ALL: [Octave; 5] = [
        Octave::Third,
        Octave::Fourth,
        Octave::Fifth,
        Octave::Sixth,
        Octave::Seventh,
    ];

    /// Command byte selecting this octave.
    pub const fn byte(&self) -> u8 {
        LCD_CMD_OCTAVE_BASE + *self as u8
    }

    /// Ordinal name, `"3rd"` to `"7th"`.
    pub const fn name(&self) -> &'static str {
        match self {
            Octave::Third => "3rd",
            Octave::Fourth => "4th",
            Octave::Fifth => "5th",
            Octave::Sixth => "6th",
            Octave::Seventh => "7th",
        }
    }
}

impl FromStr for Octave {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Octave::ALL
            .iter()
            .find(|octave| octave.name() == s)
            .copied()
            .ok_or(ParseError)
    }
}

impl Display for Octave {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Octave {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.name());
    }
}
