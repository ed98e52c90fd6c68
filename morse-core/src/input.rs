//! Input accumulator: assembles typed characters into complete messages

use heapless::String;

/// Outcome of feeding one byte to the accumulator
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Feed<const C: usize> {
    /// Character stored; pass it through to the console
    Echo(char),
    /// Character stored and the buffer reached capacity, so it was flushed
    Overflow(char, String<C>),
    /// Line break completed a message
    Line(String<C>),
    /// Line break on an empty buffer
    Nothing,
}

/// Bounded line buffer with forced flush at capacity
#[derive(Clone, Debug, Default)]
pub struct InputAccumulator<const C: usize> {
    buffer: String<C>,
}

impl<const C: usize> InputAccumulator<C> {
    pub const fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    /// Feed a raw input byte. `\n` and `\r` end the message.
    pub fn feed(&mut self, byte: u8) -> Feed<C> {
        match byte {
            b'\n' | b'\r' => match self.on_line_break() {
                Some(message) => Feed::Line(message),
                None => Feed::Nothing,
            },
            _ => self.push(byte as char),
        }
    }

    /// Append a character. Filling the buffer flushes it as a message.
    ///
    /// Non-ASCII characters are stored as `?` so the buffer holds one byte
    /// per character; the encoder skips the placeholder.
    pub fn push(&mut self, ch: char) -> Feed<C> {
        let ch = if ch.is_ascii() { ch } else { '?' };
        if self.buffer.len() < C {
            let _ = self.buffer.push(ch);
        }
        if self.buffer.len() >= C {
            return Feed::Overflow(ch, self.take());
        }
        Feed::Echo(ch)
    }

    /// Complete the pending message, if any
    pub fn on_line_break(&mut self) -> Option<String<C>> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(self.take())
        }
    }

    /// Characters waiting for a line break
    pub fn pending(&self) -> &str {
        self.buffer.as_str()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        C
    }

    fn take(&mut self) -> String<C> {
        core::mem::take(&mut self.buffer)
    }
}
