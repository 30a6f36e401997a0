//! This Rust `embedded-hal`-based library controls a 2x16 serial character LCD with a built in piezo speaker, such as
//! the [Parallax 27977](https://www.parallax.com/product/parallax-2-x-16-serial-lcd-with-piezo-speaker-backlit/), in an
//! embedded, `no_std` environment. The display is driven entirely by single byte commands written to a UART. It has no
//! way to report back what it is showing, so this library keeps a shadow copy of the screen, cursor, backlight and mode,
//! and every operation updates that copy as it sends the matching bytes.
//!
//! Key features include:
//! - Convenient high-level API for writing, flashing and scrolling text on the two lines
//! - Automatic wrapping of long text across both lines
//! - Backlight, cursor and blink control
//! - Playing notes and simple songs on the speaker
//! - `core::fmt::Write` implementation for easy use with the `write!` macro
//! - Works with any `embedded_io::Write` serial transport and any `embedded_hal::delay::DelayNs` delay
//! - Optional support for the `defmt` and `ufmt` logging frameworks
//!
//! ## Usage
//! Add this to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! serial-lcd-speaker = { version = "0.1", features = ["defmt"] }
//! ```
//! The `features = ["defmt"]` line is optional and enables the `defmt` feature, which adds debug logging and allows the
//! library's errors to be used with the `defmt` logging framework. Another optional feature is `features = ["ufmt"]`,
//! which enables the `uwriteln!` and `uwrite!` macros.
//!
//! Create the display from a serial transport configured for the display's baud rate (see [`SerialConfig`]):
//! ```rust
//! use serial_lcd_speaker::{SerialLcd, CursorMode};
//!
//! let uart = ...; // embedded_io::Write implementation at 9600 baud
//! let delay = ...; // DelayNs implementation
//!
//! let mut lcd = SerialLcd::new(uart, delay)?;
//! lcd.set_mode(CursorMode::NoCursorNoBlink)?.set_backlight(true)?;
//! lcd.write_text(Some("Hello,"), Some("world!"))?;
//! ```
//! Text longer than one line is wrapped onto the second line when the second line is empty:
//! ```rust
//! lcd.clear()?.write_text(Some("This wraps onto the next line"), None)?;
//! ```
//! Timed effects block for their whole duration:
//! ```rust
//! lcd.flash_text("Alert!", "Door open", 2_000, true, Some(250))?;
//! lcd.scroll_text("A long message that scrolls one line at a time", 1_250)?;
//! lcd.play_song(&["1/8", "C", "E", "G", "1/2", "C"])?;
//! ```
//!
#![no_std]
use core::fmt::Display;

use embedded_hal::delay::DelayNs;
use embedded_io::{ErrorType, Write};

mod audio;
pub mod encoder;
pub mod protocol;
pub mod state;
mod text;
pub mod wrap;

#[cfg(test)]
mod test_support;

pub use audio::SongToken;
pub use protocol::{CursorMode, Note, NoteLength, Octave, ParseError};
pub use state::{DisplayState, StateError};
pub use text::FLASH_DEFAULT_DURATION_MS;

use encoder::{Command, CommandEncoder};

/// Serial device the display is usually attached to on a Raspberry Pi.
pub const DEFAULT_SERIAL_PORT: &str = "/dev/ttyAMA0";
/// Factory baud rate of the display. The DIP switches also allow 2400 and 19200.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
/// How to open the serial transport for the display. The driver itself never opens the
/// port; this is for the code that builds the `embedded_io::Write` implementation.
pub struct SerialConfig {
    pub port: &'static str,
    pub baud_rate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        SerialConfig {
            port: DEFAULT_SERIAL_PORT,
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }
}

#[derive(Debug, PartialEq, Copy, Clone)]
/// Errors that can occur when using the display
pub enum SerialLcdError<SERIAL>
where
    SERIAL: ErrorType,
{
    /// Error returned from the underlying serial implementation. Nothing is retried.
    IoError(SERIAL::Error),
    /// Text is longer than a line and was not wrapped, or is not printable ASCII
    InvalidInput,
    /// An explicit second line is longer than a line
    LineTooLong,
    /// Row or column is out of range
    OutOfRange,
    /// Song token at this index is neither a note nor a note length
    UnknownToken(usize),
    /// Formatting error
    FormattingError(core::fmt::Error),
}

impl<SERIAL> From<StateError> for SerialLcdError<SERIAL>
where
    SERIAL: ErrorType,
{
    fn from(err: StateError) -> Self {
        match err {
            StateError::InvalidInput => SerialLcdError::InvalidInput,
            StateError::OutOfRange => SerialLcdError::OutOfRange,
        }
    }
}

impl<SERIAL> From<core::fmt::Error> for SerialLcdError<SERIAL>
where
    SERIAL: ErrorType,
{
    fn from(err: core::fmt::Error) -> Self {
        SerialLcdError::FormattingError(err)
    }
}

impl<SERIAL> From<&SerialLcdError<SERIAL>> for &'static str
where
    SERIAL: ErrorType,
{
    fn from(err: &SerialLcdError<SERIAL>) -> Self {
        match err {
            SerialLcdError::IoError(_) => "Serial I/O error",
            SerialLcdError::InvalidInput => "Text too long or not printable",
            SerialLcdError::LineTooLong => "Line too long",
            SerialLcdError::OutOfRange => "Cursor position out of range",
            SerialLcdError::UnknownToken(_) => "Unknown song token",
            SerialLcdError::FormattingError(_) => "Formatting error",
        }
    }
}

#[cfg(feature = "defmt")]
impl<SERIAL> defmt::Format for SerialLcdError<SERIAL>
where
    SERIAL: ErrorType,
{
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            SerialLcdError::UnknownToken(index) => {
                defmt::write!(fmt, "Unknown song token at {}", index)
            }
            _ => {
                let msg: &'static str = From::from(self);
                defmt::write!(fmt, "{}", msg);
            }
        }
    }
}

#[cfg(feature = "ufmt")]
impl<SERIAL> ufmt::uDisplay for SerialLcdError<SERIAL>
where
    SERIAL: ErrorType,
{
    fn fmt<W>(&self, w: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        let msg: &'static str = From::from(self);
        ufmt::uwrite!(w, "{}", msg)
    }
}

impl<SERIAL> Display for SerialLcdError<SERIAL>
where
    SERIAL: ErrorType,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SerialLcdError::UnknownToken(index) => write!(f, "Unknown song token at {}", index),
            _ => {
                let msg: &'static str = From::from(self);
                write!(f, "{}", msg)
            }
        }
    }
}

/// Driver for the serial LCD. Owns the transport and the delay, and keeps the shadow
/// [`DisplayState`] in step with every byte sent.
pub struct SerialLcd<SERIAL, DELAY>
where
    SERIAL: Write,
    DELAY: DelayNs,
{
    encoder: CommandEncoder<SERIAL>,
    delay: DELAY,
    state: DisplayState,
}

impl<SERIAL, DELAY> SerialLcd<SERIAL, DELAY>
where
    SERIAL: Write,
    DELAY: DelayNs,
{
    /// Create the driver and clear the display, so the shadow state starts out matching
    /// the screen.
    pub fn new(serial: SERIAL, delay: DELAY) -> Result<Self, SerialLcdError<SERIAL>> {
        let mut lcd = Self {
            encoder: CommandEncoder::new(serial),
            delay,
            state: DisplayState::default(),
        };
        lcd.clear()?;
        Ok(lcd)
    }

    /// The shadow copy of what the display is showing
    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    /// Give back the serial transport and delay.
    pub fn release(self) -> (SERIAL, DELAY) {
        (self.encoder.release(), self.delay)
    }

    /// returns a reference to the serial transport. mostly needed for testing
    #[cfg(test)]
    fn serial(&mut self) -> &mut SERIAL {
        self.encoder.serial()
    }

    //--------------------------------------------------------------------------------------------------
    // cursor and display control
    //--------------------------------------------------------------------------------------------------

    /// Set the cursor position at specified row and column. Both are zero-indexed.
    pub fn move_cursor(&mut self, row: u8, col: u8) -> Result<&mut Self, SerialLcdError<SERIAL>> {
        // an off-screen position has no byte, so nothing is written for it
        self.encoder.send(Command::CursorPosition { row, col })?;
        self.state.move_cursor(row, col)?;
        Ok(self)
    }

    /// Move the cursor to the start of the other line.
    pub fn next_line(&mut self) -> Result<&mut Self, SerialLcdError<SERIAL>> {
        self.encoder.send(Command::NextLine)?;
        self.state.next_line();
        Ok(self)
    }

    /// Move the cursor back one cell, onto the previous line from column 0.
    pub fn cursor_left(&mut self) -> Result<&mut Self, SerialLcdError<SERIAL>> {
        self.encoder.send(Command::CursorLeft)?;
        self.state.cursor_left();
        Ok(self)
    }

    /// Move the cursor forward one cell, onto the next line after column 15.
    pub fn cursor_right(&mut self) -> Result<&mut Self, SerialLcdError<SERIAL>> {
        self.encoder.send(Command::CursorRight)?;
        self.state.cursor_right();
        Ok(self)
    }

    /// Turn the backlight on or off
    pub fn set_backlight(&mut self, on: bool) -> Result<&mut Self, SerialLcdError<SERIAL>> {
        let command = if on {
            Command::BacklightOn
        } else {
            Command::BacklightOff
        };
        self.encoder.send(command)?;
        self.state.set_backlight(on);
        Ok(self)
    }

    /// Select the cursor and blink setting. This also turns the display on.
    pub fn set_mode(&mut self, mode: CursorMode) -> Result<&mut Self, SerialLcdError<SERIAL>> {
        self.encoder.send(Command::DisplayMode(mode))?;
        self.state.set_mode(mode);
        Ok(self)
    }

    /// Turn the display back on with the current cursor setting.
    pub fn display_on(&mut self) -> Result<&mut Self, SerialLcdError<SERIAL>> {
        let mode = self.state.mode();
        self.set_mode(mode)
    }

    /// Turn the display off. Text and cursor are kept by the device.
    pub fn display_off(&mut self) -> Result<&mut Self, SerialLcdError<SERIAL>> {
        self.encoder.send(Command::DisplayOff)?;
        self.state.set_display_off();
        Ok(self)
    }
}

/// Implement the `core::fmt::Write` trait for the display, allowing it to be used with the `write!` macro.
/// Text is printed at the current cursor and the shadow state follows along.
impl<SERIAL, DELAY> core::fmt::Write for SerialLcd<SERIAL, DELAY>
where
    SERIAL: Write,
    DELAY: DelayNs,
{
    fn write_str(&mut self, s: &str) -> Result<(), core::fmt::Error> {
        if let Err(_e) = self.print(s) {
            return Err(core::fmt::Error);
        }
        Ok(())
    }
}

#[cfg(feature = "ufmt")]
/// Implement the `ufmt::uWrite` trait for the display, allowing it to be used with the `uwriteln!` and `uwrite!` macros.
impl<SERIAL, DELAY> ufmt::uWrite for SerialLcd<SERIAL, DELAY>
where
    SERIAL: Write,
    DELAY: DelayNs,
{
    fn write_str(&mut self, s: &str) -> Result<(), SerialLcdError<SERIAL>> {
        self.print(s)?;
        Ok(())
    }

    type Error = SerialLcdError<SERIAL>;
}
