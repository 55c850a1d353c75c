//! StringData: up to five counted strings following LinkInfo.

use crate::cursor::ByteCursor;
use crate::error::{DecodeContext, ErrorKind, Result};
use crate::flags::LinkFlags;
use crate::text::{decode_utf16_bytes, CodePage};
use serde::Serialize;
use std::io::{Read, Seek};

/// String data section.
///
/// `None` means the flag for the entry was not set; `Some("")` means the entry
/// was present with a zero character count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StringData {
    pub name_string: Option<String>,
    pub relative_path: Option<String>,
    pub working_dir: Option<String>,
    pub command_line_arguments: Option<String>,
    pub icon_location: Option<String>,
}

impl StringData {
    /// True when no entry was present
    pub fn is_empty(&self) -> bool {
        self.name_string.is_none()
            && self.relative_path.is_none()
            && self.working_dir.is_none()
            && self.command_line_arguments.is_none()
            && self.icon_location.is_none()
    }
}

/// Decode one entry: a 2-byte character count then the characters
fn read_string<R: Read + Seek>(
    cursor: &mut ByteCursor<R>,
    field: &'static str,
    is_unicode: bool,
    codepage: CodePage,
) -> Result<String> {
    let count = cursor.read_u16().context(ErrorKind::StringData, field)? as usize;
    if count == 0 {
        return Ok(String::new());
    }

    if is_unicode {
        let bytes = cursor.read_bytes(count * 2).context(ErrorKind::StringData, field)?;
        Ok(decode_utf16_bytes(&bytes))
    } else {
        let bytes = cursor.read_bytes(count).context(ErrorKind::StringData, field)?;
        Ok(codepage.decode(&bytes))
    }
}

/// Decode each entry whose flag is set, in the fixed on-disk order
pub fn decode_string_data<R: Read + Seek>(
    cursor: &mut ByteCursor<R>,
    flags: LinkFlags,
    codepage: CodePage,
) -> Result<StringData> {
    let is_unicode = flags.is_unicode();
    let mut string_data = StringData::default();

    let entries: [(bool, &'static str, &mut Option<String>); 5] = [
        (flags.has_name(), "NameString", &mut string_data.name_string),
        (flags.has_relative_path(), "RelativePath", &mut string_data.relative_path),
        (flags.has_working_dir(), "WorkingDir", &mut string_data.working_dir),
        (
            flags.has_arguments(),
            "CommandLineArguments",
            &mut string_data.command_line_arguments,
        ),
        (flags.has_icon_location(), "IconLocation", &mut string_data.icon_location),
    ];

    for (present, field, slot) in entries {
        if present {
            *slot = Some(read_string(cursor, field, is_unicode, codepage)?);
        }
    }

    Ok(string_data)
}
