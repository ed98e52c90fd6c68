//! Morse table and text <-> Morse stream codec
//!
//! A Morse stream is ASCII: one symbol per letter made of `.` and `-`,
//! every token followed by a single space, and the token `/` standing
//! for a word boundary. `"HI YOU"` becomes `".... .. / -.-- --- ..- "`.

use heapless::String;

/// Symbol strings for A..Z, indexed by letter offset
pub const MORSE_TABLE: [&str; 26] = [
    ".-",   // A
    "-...", // B
    "-.-.", // C
    "-..",  // D
    ".",    // E
    "..-.", // F
    "--.",  // G
    "....", // H
    "..",   // I
    ".---", // J
    "-.-",  // K
    ".-..", // L
    "--",   // M
    "-.",   // N
    "---",  // O
    ".--.", // P
    "--.-", // Q
    ".-.",  // R
    "...",  // S
    "-",    // T
    "..-",  // U
    "...-", // V
    ".--",  // W
    "-..-", // X
    "-.--", // Y
    "--..", // Z
];

/// Separator between tokens of a Morse stream
pub const SYMBOL_DELIMITER: u8 = b' ';

/// Token marking a word boundary
pub const WORD_BOUNDARY: &str = "/";

/// Placeholder emitted for a token that matches no letter
pub const UNKNOWN_SYMBOL: char = '?';

/// Symbol for a letter, case-insensitive
pub fn symbol_for(ch: char) -> Option<&'static str> {
    if !ch.is_ascii_alphabetic() {
        return None;
    }
    let index = (ch.to_ascii_uppercase() as u8 - b'A') as usize;
    Some(MORSE_TABLE[index])
}

/// Letter for a symbol, exact match only
pub fn letter_for(symbol: &[u8]) -> Option<char> {
    MORSE_TABLE
        .iter()
        .position(|entry| entry.as_bytes() == symbol)
        .map(|index| (b'A' + index as u8) as char)
}

/// Result of encoding text into a Morse stream of at most `N` bytes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Encoded<const N: usize> {
    /// Morse stream, trailing delimiter included
    pub stream: String<N>,
    /// Characters dropped because they have no Morse symbol
    pub skipped: usize,
    /// True if the stream filled up and the rest of the text was dropped
    pub truncated: bool,
}

impl<const N: usize> Encoded<N> {
    pub fn as_str(&self) -> &str {
        self.stream.as_str()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.stream.as_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.stream.is_empty()
    }
}

/// Encode text into a Morse stream.
///
/// Letters are case-folded, spaces become the word boundary token and
/// everything else is skipped and counted. Tokens are only appended whole,
/// so a stream that runs out of room always ends on a delimiter.
pub fn encode<const N: usize>(text: &str) -> Encoded<N> {
    let mut out = Encoded {
        stream: String::new(),
        skipped: 0,
        truncated: false,
    };

    for ch in text.chars() {
        let token = if ch == ' ' {
            WORD_BOUNDARY
        } else if let Some(symbol) = symbol_for(ch) {
            symbol
        } else {
            out.skipped += 1;
            continue;
        };

        if out.stream.len() + token.len() + 1 > N {
            out.truncated = true;
            break;
        }
        // Capacity checked above
        let _ = out.stream.push_str(token);
        let _ = out.stream.push(SYMBOL_DELIMITER as char);
    }

    out
}

/// Result of decoding a Morse stream into at most `N` characters of text
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoded<const N: usize> {
    /// Uppercase letters, spaces and `?` markers
    pub text: String<N>,
    /// Tokens that matched no letter
    pub errors: usize,
}

impl<const N: usize> Decoded<N> {
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }
}

/// Decode a Morse stream.
///
/// Tokens are evaluated at each delimiter and once more at the end of the
/// stream, so an unterminated last symbol is not lost. Runs of delimiters
/// yield empty tokens, which are ignored. The word boundary token also
/// swallows the single delimiter that follows it.
pub fn decode<const N: usize>(stream: &[u8]) -> Decoded<N> {
    let mut out = Decoded {
        text: String::new(),
        errors: 0,
    };

    let mut start = 0;
    let mut i = 0;
    while i < stream.len() {
        if stream[i] == SYMBOL_DELIMITER {
            let token = &stream[start..i];
            if decode_token(token, &mut out) && stream.get(i + 1) == Some(&SYMBOL_DELIMITER) {
                i += 1;
            }
            start = i + 1;
        }
        i += 1;
    }
    if start < stream.len() {
        decode_token(&stream[start..], &mut out);
    }

    out
}

/// Append the text for one token. Returns true for a word boundary.
fn decode_token<const N: usize>(token: &[u8], out: &mut Decoded<N>) -> bool {
    if token.is_empty() {
        return false;
    }
    if token == WORD_BOUNDARY.as_bytes() {
        let _ = out.text.push(' ');
        return true;
    }
    match letter_for(token) {
        Some(letter) => {
            let _ = out.text.push(letter);
        }
        None => {
            let _ = out.text.push(UNKNOWN_SYMBOL);
            out.errors += 1;
        }
    }
    false
}
