//! ShellLinkHeader: the fixed 76-byte record at the start of every link file.

use crate::cursor::ByteCursor;
use crate::datetime::Filetime;
use crate::error::{DecodeContext, Error, ErrorKind, Result};
use crate::flags::{FileAttributes, HotKey, LinkFlags, ShowCommand};
use serde::{Serialize, Serializer};
use std::io::{Read, Seek};

/// Required value of the HeaderSize field
pub const HEADER_SIZE: u32 = 0x0000_004C;

/// Shell Link CLSID 00021401-0000-0000-C000-000000000046, as stored on disk
pub const LINK_CLSID: [u8; 16] = [
    0x01, 0x14, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x46,
];

/// Shell Link Header structure (76 bytes)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkHeader {
    /// Header size (always 0x4C once validated)
    pub header_size: u32,
    /// Link class identifier
    #[serde(serialize_with = "serialize_clsid")]
    pub link_clsid: [u8; 16],
    pub link_flags: LinkFlags,
    pub file_attributes: FileAttributes,
    pub creation_time: Filetime,
    pub access_time: Filetime,
    pub write_time: Filetime,
    /// Low 32 bits of the target size
    pub file_size: u32,
    pub icon_index: i32,
    pub show_command: ShowCommand,
    pub hotkey: HotKey,
    pub reserved1: u16,
    pub reserved2: u32,
    pub reserved3: u32,
}

impl LinkHeader {
    /// CLSID in registry form, e.g. `00021401-0000-0000-c000-000000000046`
    pub fn clsid_string(&self) -> String {
        format_clsid(&self.link_clsid)
    }
}

/// Render a little-endian GUID in its canonical string form
pub fn format_clsid(bytes: &[u8; 16]) -> String {
    uuid::Uuid::from_bytes_le(*bytes).hyphenated().to_string()
}

fn serialize_clsid<S: Serializer>(bytes: &[u8; 16], serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_clsid(bytes))
}

fn header_error(field: &'static str, message: impl Into<String>) -> Error {
    Error::decode(ErrorKind::Header, field, message)
}

/// Decode and validate the header at the cursor position
pub fn decode_header<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<LinkHeader> {
    let header_size = cursor.read_u32().context(ErrorKind::Header, "HeaderSize")?;
    if header_size != HEADER_SIZE {
        return Err(header_error(
            "HeaderSize",
            format!("expected 0x4C, got 0x{:X}", header_size),
        ));
    }

    let link_clsid = cursor.read_array::<16>().context(ErrorKind::Header, "LinkClsid")?;
    if link_clsid != LINK_CLSID {
        return Err(header_error(
            "LinkClsid",
            format!("{} is not the Shell Link CLSID", format_clsid(&link_clsid)),
        ));
    }

    let link_flags = cursor.read_u32().context(ErrorKind::Header, "LinkFlags")?;
    let file_attributes = cursor.read_u32().context(ErrorKind::Header, "FileAttributes")?;
    let creation_time = cursor.read_scalar::<u64>().context(ErrorKind::Header, "CreationTime")?;
    let access_time = cursor.read_scalar::<u64>().context(ErrorKind::Header, "AccessTime")?;
    let write_time = cursor.read_scalar::<u64>().context(ErrorKind::Header, "WriteTime")?;
    let file_size = cursor.read_u32().context(ErrorKind::Header, "FileSize")?;
    let icon_index = cursor.read_scalar::<i32>().context(ErrorKind::Header, "IconIndex")?;
    let show_command = cursor.read_u32().context(ErrorKind::Header, "ShowCommand")?;
    let hotkey = cursor.read_u16().context(ErrorKind::Header, "HotKey")?;
    let reserved1 = cursor.read_u16().context(ErrorKind::Header, "Reserved1")?;
    let reserved2 = cursor.read_u32().context(ErrorKind::Header, "Reserved2")?;
    let reserved3 = cursor.read_u32().context(ErrorKind::Header, "Reserved3")?;

    for (field, value) in [
        ("Reserved1", u32::from(reserved1)),
        ("Reserved2", reserved2),
        ("Reserved3", reserved3),
    ] {
        if value != 0 {
            return Err(header_error(field, format!("reserved field must be 0, got 0x{:X}", value)));
        }
    }

    // SHOULD-level field: undefined values fall back to Normal instead of failing
    let show = ShowCommand::from_u32_lenient(show_command);
    if show.as_u32() != show_command {
        log::debug!("ShowCommand 0x{:X} is undefined, using SW_SHOWNORMAL", show_command);
    }

    Ok(LinkHeader {
        header_size,
        link_clsid,
        link_flags: LinkFlags::from_bits_truncate(link_flags),
        file_attributes: FileAttributes::from_bits_truncate(file_attributes),
        creation_time: Filetime(creation_time),
        access_time: Filetime(access_time),
        write_time: Filetime(write_time),
        file_size,
        icon_index,
        show_command: show,
        hotkey: HotKey::from_u16(hotkey),
        reserved1,
        reserved2,
        reserved3,
    })
}
