//! Status presenter for the 4x20 character display

use heapless::String;
use crate::hal::CharDisplay;
use crate::types::{LinkQuality, DISPLAY_COLS, TEXT_PREVIEW};

/// One full display row
pub type DisplayLine = String<DISPLAY_COLS>;

/// Display rows and what they show
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Row {
    /// Static title
    Title,
    /// Last sent or received plain text
    Text,
    /// Morse stream of that text
    Stream,
    /// Link quality or station status
    Link,
}

impl Row {
    pub const ALL: [Row; 4] = [Row::Title, Row::Text, Row::Stream, Row::Link];

    /// Row for a display line number 0..=3
    pub const fn from_index(index: u8) -> Option<Row> {
        match index {
            0 => Some(Row::Title),
            1 => Some(Row::Text),
            2 => Some(Row::Stream),
            3 => Some(Row::Link),
            _ => None,
        }
    }

    pub const fn index(&self) -> u8 {
        match self {
            Row::Title => 0,
            Row::Text => 1,
            Row::Stream => 2,
            Row::Link => 3,
        }
    }
}

/// Printable stand-in for a display cell
fn cell(ch: char) -> char {
    if ch == ' ' || ch.is_ascii_graphic() {
        ch
    } else {
        '?'
    }
}

/// Pad or truncate characters to exactly one display row
pub fn fit_line<I>(chars: I) -> DisplayLine
where
    I: IntoIterator<Item = char>,
{
    let mut line = DisplayLine::new();
    for ch in chars.into_iter().take(DISPLAY_COLS) {
        let _ = line.push(cell(ch));
    }
    while line.len() < DISPLAY_COLS {
        let _ = line.push(' ');
    }
    line
}

/// Stateless renderer for the station status screen
pub struct StatusPresenter;

impl StatusPresenter {
    /// Write one full row. The row is blanked first so shorter text never
    /// leaves stale characters behind.
    pub fn render<D: CharDisplay>(display: &mut D, row: Row, text: &str) -> Result<(), D::Error> {
        Self::render_line(display, row, &fit_line(text.chars()))
    }

    /// Write one full row from raw bytes, e.g. a received Morse stream
    pub fn render_bytes<D: CharDisplay>(display: &mut D, row: Row, bytes: &[u8]) -> Result<(), D::Error> {
        Self::render_line(display, row, &fit_line(bytes.iter().map(|&b| b as char)))
    }

    /// Blank a row
    pub fn blank<D: CharDisplay>(display: &mut D, row: Row) -> Result<(), D::Error> {
        display.set_cursor(0, row.index())?;
        display.write_str(fit_line(core::iter::empty()).as_str())
    }

    /// Render a row by line number; out-of-range lines are ignored
    pub fn render_at<D: CharDisplay>(display: &mut D, index: u8, text: &str) -> Result<(), D::Error> {
        match Row::from_index(index) {
            Some(row) => Self::render(display, row, text),
            None => Ok(()),
        }
    }

    /// Plain text row with a direction tag, e.g. `"TX: HELLO"`
    pub fn render_text<D: CharDisplay>(display: &mut D, tag: &str, text: &str) -> Result<(), D::Error> {
        let chars = tag.chars().chain(": ".chars()).chain(text.chars().take(TEXT_PREVIEW));
        Self::render_line(display, Row::Text, &fit_line(chars))
    }

    /// Signal strength and noise ratio row
    pub fn render_quality<D: CharDisplay>(display: &mut D, quality: LinkQuality) -> Result<(), D::Error> {
        let mut line = DisplayLine::new();
        // Worst case "RSSI:-32768 SNR:..." is cut at the row width
        let _ = core::fmt::write(&mut TruncatingWriter(&mut line), format_args!("{}", quality));
        Self::render(display, Row::Link, line.as_str())
    }

    /// Title, empty text rows and a status line
    pub fn render_splash<D: CharDisplay>(display: &mut D, title: &str, status: &str) -> Result<(), D::Error> {
        Self::render(display, Row::Title, title)?;
        Self::blank(display, Row::Text)?;
        Self::blank(display, Row::Stream)?;
        Self::render(display, Row::Link, status)
    }

    fn render_line<D: CharDisplay>(display: &mut D, row: Row, line: &DisplayLine) -> Result<(), D::Error> {
        Self::blank(display, row)?;
        display.set_cursor(0, row.index())?;
        display.write_str(line.as_str())
    }
}

/// `fmt::Write` that keeps what fits and silently drops the rest
struct TruncatingWriter<'a>(&'a mut DisplayLine);

impl core::fmt::Write for TruncatingWriter<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for ch in s.chars() {
            if self.0.push(ch).is_err() {
                break;
            }
        }
        Ok(())
    }
}
