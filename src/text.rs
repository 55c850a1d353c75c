//! String decoding for the two encodings a link file mixes: UTF-16LE and the
//! legacy 8-bit code page of the machine that wrote it.

use encoding::label::encoding_from_whatwg_label;
use encoding::{DecoderTrap, Encoding, EncodingRef};
use std::fmt;

/// Legacy 8-bit code page used for non-Unicode strings
#[derive(Clone, Copy)]
pub struct CodePage(EncodingRef);

impl CodePage {
    /// Look up a code page by WHATWG label ("windows-1252", "cp866", "koi8-r", ...)
    pub fn from_label(label: &str) -> Option<Self> {
        encoding_from_whatwg_label(label).map(CodePage)
    }

    /// Canonical name of the code page
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Decode 8-bit text. Unmappable bytes become U+FFFD.
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self.0.decode(bytes, DecoderTrap::Replace) {
            Ok(text) => text,
            Err(_) => String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}

impl Default for CodePage {
    fn default() -> Self {
        CodePage(encoding::all::WINDOWS_1252)
    }
}

impl fmt::Debug for CodePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CodePage").field(&self.name()).finish()
    }
}

/// Decode UTF-16LE code units. Unpaired surrogates become U+FFFD.
pub fn decode_utf16(units: &[u16]) -> String {
    String::from_utf16_lossy(units)
}

/// Decode UTF-16LE bytes; an odd trailing byte is ignored
pub fn decode_utf16_bytes(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    decode_utf16(&units)
}
