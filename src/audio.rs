use core::str::FromStr;

use embedded_hal::delay::DelayNs;
use embedded_io::Write;

use crate::{
    encoder::Command,
    protocol::{Note, NoteLength, Octave, ParseError},
    SerialLcd, SerialLcdError,
};

/// Gap after each note in a song until a note length is given.
const LEGATO_US: u32 = 150_000;

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
/// One element of a song: a note to play, or a note length for the notes that follow.
pub enum SongToken {
    Note(Note),
    Length(NoteLength),
}

impl FromStr for SongToken {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(note) = s.parse::<Note>() {
            return Ok(SongToken::Note(note));
        }
        s.parse::<NoteLength>().map(SongToken::Length)
    }
}

impl From<Note> for SongToken {
    fn from(note: Note) -> Self {
        SongToken::Note(note)
    }
}

impl From<NoteLength> for SongToken {
    fn from(length: NoteLength) -> Self {
        SongToken::Length(length)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SongToken {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            SongToken::Note(note) => defmt::write!(fmt, "{}", note),
            SongToken::Length(length) => defmt::write!(fmt, "{}", length),
        }
    }
}

/// Wait after notes once `length` has been selected. The extra half gives each note
/// some room before the next one.
const fn song_gap_us(length: NoteLength) -> u32 {
    length.micros() / 2 * 3
}

impl<SERIAL, DELAY> SerialLcd<SERIAL, DELAY>
where
    SERIAL: Write,
    DELAY: DelayNs,
{
    /// Select the length of the notes played after this.
    pub fn set_note_length(
        &mut self,
        length: NoteLength,
    ) -> Result<&mut Self, SerialLcdError<SERIAL>> {
        self.encoder.send(Command::NoteLength(length))?;
        Ok(self)
    }

    /// Select the octave of the notes played after this.
    pub fn set_octave(&mut self, octave: Octave) -> Result<&mut Self, SerialLcdError<SERIAL>> {
        self.encoder.send(Command::Octave(octave))?;
        Ok(self)
    }

    /// Play a note, optionally selecting its length first. Does not wait for the note to
    /// finish.
    pub fn play_note(
        &mut self,
        note: Note,
        length: Option<NoteLength>,
    ) -> Result<&mut Self, SerialLcdError<SERIAL>> {
        if let Some(length) = length {
            self.set_note_length(length)?;
        }
        self.encoder.send(Command::Note(note))?;
        Ok(self)
    }

    /// Play a song written as note names (`"A"` .. `"G#"`) and note lengths (`"1/32"` ..
    /// `"1"`).
    ///
    /// Each note is followed by a 150 ms gap until a length appears, after which the gap
    /// is one and a half times that length. Playback stops at the first token that is
    /// neither, with `UnknownToken` carrying its index. Tokens before it have already
    /// been played.
    pub fn play_song<T>(&mut self, tokens: &[T]) -> Result<&mut Self, SerialLcdError<SERIAL>>
    where
        T: AsRef<str>,
    {
        #[cfg(feature = "defmt")]
        defmt::debug!("Playing song of {} tokens", tokens.len());
        let mut gap_us = LEGATO_US;
        for (index, token) in tokens.iter().enumerate() {
            let token = match token.as_ref().parse::<SongToken>() {
                Ok(token) => token,
                Err(_) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Unknown song token at {}", index);
                    return Err(SerialLcdError::UnknownToken(index));
                }
            };
            self.play_token(token, &mut gap_us)?;
        }
        Ok(self)
    }

    /// Play a song that has already been parsed. Timing is the same as `play_song`.
    pub fn play_tokens<I>(&mut self, tokens: I) -> Result<&mut Self, SerialLcdError<SERIAL>>
    where
        I: IntoIterator<Item = SongToken>,
    {
        let mut gap_us = LEGATO_US;
        for token in tokens {
            self.play_token(token, &mut gap_us)?;
        }
        Ok(self)
    }

    fn play_token(
        &mut self,
        token: SongToken,
        gap_us: &mut u32,
    ) -> Result<(), SerialLcdError<SERIAL>> {
        match token {
            SongToken::Note(note) => {
                self.play_note(note, None)?;
                self.delay.delay_us(*gap_us);
            }
            SongToken::Length(length) => {
                self.set_note_length(length)?;
                *gap_us = song_gap_us(length);
            }
        }
        Ok(())
    }
}
