use embedded_hal::delay::DelayNs;
use embedded_io::Write;

use crate::{
    encoder::Command,
    state::{is_printable, DisplayState, StateError, LINE_WIDTH},
    wrap::{wrap, Chunk},
    SerialLcd, SerialLcdError,
};

/// How long `flash_text` holds its text when the caller has no preference.
pub const FLASH_DEFAULT_DURATION_MS: u32 = 2_000;

/// The display drops bytes that arrive within 5 ms of a clear.
const CLEAR_SETTLE_MS: u32 = 5;

impl<SERIAL, DELAY> SerialLcd<SERIAL, DELAY>
where
    SERIAL: Write,
    DELAY: DelayNs,
{
    /// Clear the display and home the cursor. Blocks for the settle delay.
    pub fn clear(&mut self) -> Result<&mut Self, SerialLcdError<SERIAL>> {
        self.encoder.send(Command::ClearScreen)?;
        // wait for command to complete
        self.delay.delay_ms(CLEAR_SETTLE_MS);
        self.state.clear();
        Ok(self)
    }

    /// Write text to both lines, starting from the top left. Lines passed as `None` keep
    /// what is currently shown.
    ///
    /// If `line1` is `None` while the bottom line is blank, a `line0` longer than 16
    /// characters is word wrapped over both lines. Anything that does not fit in two
    /// lines is dropped. An explicit `line1` longer than 16 characters fails with
    /// `LineTooLong`. An over-long `line0` that is not wrapped, or text that is not
    /// printable ASCII, fails with `InvalidInput`. Nothing is sent and nothing changes
    /// when a check fails.
    pub fn write_text(
        &mut self,
        line0: Option<&str>,
        line1: Option<&str>,
    ) -> Result<&mut Self, SerialLcdError<SERIAL>> {
        let next = compose::<SERIAL>(&self.state, line0, line1)?;
        self.show(next)?;
        Ok(self)
    }

    /// Show text for `duration_ms` milliseconds, then clear the screen.
    ///
    /// With `revert`, the text that was showing beforehand is written back afterwards.
    /// The backlight and cursor mode are left as the flash leaves them.
    /// With a non-zero `blink_interval_ms` the backlight is toggled off and on while the
    /// text is shown. A blink cycle is never cut short, so the hold can run up to one
    /// cycle past `duration_ms`, and the backlight is always on at the end.
    ///
    /// An empty `line1` lets a long `line0` wrap over both lines.
    pub fn flash_text(
        &mut self,
        line0: &str,
        line1: &str,
        duration_ms: u32,
        revert: bool,
        blink_interval_ms: Option<u32>,
    ) -> Result<&mut Self, SerialLcdError<SERIAL>> {
        let line1 = (!line1.is_empty()).then_some(line1);
        let mut blank = self.state.clone();
        blank.clear();
        let next = compose::<SERIAL>(&blank, Some(line0), line1)?;
        let original = revert.then(|| [*self.state.line_bytes(0), *self.state.line_bytes(1)]);

        #[cfg(feature = "defmt")]
        defmt::debug!("Flashing {} for {} ms", line0, duration_ms);
        self.clear()?;
        self.show(next)?;
        self.hold(duration_ms, blink_interval_ms)?;
        self.clear()?;

        if let Some(lines) = original {
            let mut restored = self.state.clone();
            restored.set_lines(lines);
            restored.move_cursor(0, 0)?;
            self.show(restored)?;
        }
        Ok(self)
    }

    /// Word wrap `text` and scroll it up the display one line per frame.
    pub fn scroll_text(
        &mut self,
        text: &str,
        ms_per_frame: u32,
    ) -> Result<&mut Self, SerialLcdError<SERIAL>> {
        self.scroll_chunks(wrap(text), ms_per_frame)
    }

    /// Scroll lines that are already split to fit the display. Each line is flashed on
    /// the top row with its successor below it, and the last line is flashed alone.
    pub fn scroll_chunks<I, S>(
        &mut self,
        chunks: I,
        ms_per_frame: u32,
    ) -> Result<&mut Self, SerialLcdError<SERIAL>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut chunks = chunks.into_iter().peekable();
        while let Some(chunk) = chunks.next() {
            match chunks.peek() {
                Some(next) => {
                    self.flash_text(chunk.as_ref(), next.as_ref(), ms_per_frame, false, None)?;
                }
                None => {
                    self.flash_text(chunk.as_ref(), "", ms_per_frame, false, None)?;
                }
            }
        }
        Ok(self)
    }

    /// Prints a string at the current cursor position. The device moves to the other
    /// line after the last column, and the shadow state does the same.
    ///
    /// Only printable ASCII is accepted. Any other byte is a command to the display, so
    /// such text fails with `InvalidInput` and nothing is sent.
    pub fn print(&mut self, text: &str) -> Result<&mut Self, SerialLcdError<SERIAL>> {
        if !text.bytes().all(is_printable) {
            return Err(StateError::InvalidInput.into());
        }
        #[cfg(feature = "defmt")]
        defmt::debug!("Printing: {}", text);
        self.encoder.send_text(text.as_bytes())?;
        for byte in text.bytes() {
            self.state.put(byte)?;
        }
        Ok(self)
    }

    /// Send a fully composed screen: home the cursor and write both lines in one run.
    fn show(&mut self, next: DisplayState) -> Result<(), SerialLcdError<SERIAL>> {
        let mut frame = [b' '; LINE_WIDTH * 2];
        frame[..LINE_WIDTH].copy_from_slice(next.line_bytes(0));
        frame[LINE_WIDTH..].copy_from_slice(next.line_bytes(1));
        self.encoder.send(Command::CursorPosition { row: 0, col: 0 })?;
        self.encoder.send_text(&frame)?;
        self.state = next;
        Ok(())
    }

    fn hold(
        &mut self,
        duration_ms: u32,
        blink_interval_ms: Option<u32>,
    ) -> Result<(), SerialLcdError<SERIAL>> {
        match blink_interval_ms.filter(|interval| *interval > 0) {
            Some(interval) => {
                let mut elapsed: u32 = 0;
                while elapsed < duration_ms {
                    self.set_backlight(false)?;
                    self.delay.delay_ms(interval);
                    self.set_backlight(true)?;
                    self.delay.delay_ms(interval);
                    elapsed = elapsed.saturating_add(interval.saturating_mul(2));
                }
            }
            None => self.delay.delay_ms(duration_ms),
        }
        Ok(())
    }
}

/// Work out the screen `write_text` would produce from `current`, with the cursor at
/// the top left, without touching the device.
fn compose<SERIAL>(
    current: &DisplayState,
    line0: Option<&str>,
    line1: Option<&str>,
) -> Result<DisplayState, SerialLcdError<SERIAL>>
where
    SERIAL: embedded_io::ErrorType,
{
    if line1.is_some_and(|line| line.len() > LINE_WIDTH) {
        return Err(SerialLcdError::LineTooLong);
    }
    let mut next = current.clone();
    match line0 {
        Some(text) if line1.is_none() && current.is_blank(1) && text.len() > LINE_WIDTH => {
            let mut chunks = wrap(text);
            let first = chunks.next();
            let second = chunks.next();
            if chunks.next().is_some() {
                #[cfg(feature = "defmt")]
                defmt::warn!("Text does not fit on two lines, dropping the rest");
            }
            next.update(
                Some(first.as_ref().map_or("", Chunk::as_str)),
                Some(second.as_ref().map_or("", Chunk::as_str)),
            )?;
        }
        _ => next.update(line0, line1)?,
    }
    next.move_cursor(0, 0)?;
    Ok(next)
}
