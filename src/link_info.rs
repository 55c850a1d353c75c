//! LinkInfo parsing: VolumeID, LocalBasePath, CommonNetworkRelativeLink and
//! CommonPathSuffix.
//!
//! The LinkInfo header is read from the stream, then the rest of the block (the
//! body) is read in one piece. Every offset stored in the header is relative to
//! the start of the whole LinkInfo structure, so it is rebased by subtracting
//! the header size before it is used as a position inside the body. Offsets
//! stored inside VolumeID and CommonNetworkRelativeLink are relative to the
//! start of their own structure.

use crate::cursor::{ByteCursor, Section};
use crate::error::{DecodeContext, Error, ErrorKind, Result};
use crate::flags::{CommonNetworkRelativeLinkFlags, DriveType, LinkInfoFlags, NetworkProviderType};
use crate::text::{decode_utf16, CodePage};
use serde::Serialize;
use std::io::{Read, Seek};

/// LinkInfo header size without the optional Unicode offsets
pub const LINK_INFO_HEADER_SIZE: u32 = 0x1C;

/// Smallest LinkInfo header size that carries the Unicode offsets
pub const LINK_INFO_HEADER_SIZE_UNICODE: u32 = 0x24;

/// VolumeID sizes must be strictly greater than this
const VOLUME_ID_MIN_SIZE: u32 = 0x10;

/// VolumeLabelOffset value that redirects to VolumeLabelOffsetUnicode
const VOLUME_LABEL_OFFSET_UNICODE_MARKER: u32 = 0x14;

/// Size of the fixed CommonNetworkRelativeLink header
const NETWORK_LINK_HEADER_SIZE: u32 = 0x14;

/// Link Info structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkInfo {
    pub header: LinkInfoHeader,
    /// Present when the header size is at least 0x24
    pub header_optional: Option<LinkInfoHeaderOptional>,
    pub volume_id: Option<VolumeId>,
    pub local_base_path: Option<String>,
    pub common_network_relative_link: Option<CommonNetworkRelativeLink>,
    pub common_path_suffix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkInfoHeader {
    /// Total size of the LinkInfo structure
    pub size: u32,
    /// Size of the header part; 0x1C, or >= 0x24 with Unicode offsets
    pub header_size: u32,
    pub flags: LinkInfoFlags,
    pub volume_id_offset: u32,
    pub local_base_path_offset: u32,
    pub common_network_relative_link_offset: u32,
    pub common_path_suffix_offset: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkInfoHeaderOptional {
    pub local_base_path_offset_unicode: u32,
    pub common_path_suffix_offset_unicode: u32,
}

/// Volume the target resided on when the link was created
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumeId {
    pub size: u32,
    pub drive_type: DriveType,
    pub drive_serial_number: u32,
    pub volume_label_offset: u32,
    /// Present only when VolumeLabelOffset is 0x14
    pub volume_label_offset_unicode: Option<u32>,
    pub volume_label: String,
}

/// Network share the target resided on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommonNetworkRelativeLink {
    pub size: u32,
    pub flags: CommonNetworkRelativeLinkFlags,
    pub net_name_offset: u32,
    pub device_name_offset: u32,
    /// Raw NetworkProviderType field; zero unless ValidNetType is set
    pub network_provider_type_raw: u32,
    pub net_name_offset_unicode: Option<u32>,
    pub device_name_offset_unicode: Option<u32>,
    /// UNC root of the share, e.g. `\\server\share`
    pub net_name: String,
    pub device_name: Option<String>,
    pub net_name_unicode: Option<String>,
    pub device_name_unicode: Option<String>,
}

impl CommonNetworkRelativeLink {
    /// Provider type, when ValidNetType says the field is meaningful
    pub fn network_provider_type(&self) -> Option<NetworkProviderType> {
        self.flags
            .valid_net_type()
            .then(|| NetworkProviderType::from(self.network_provider_type_raw))
    }
}

impl LinkInfo {
    /// UNC root of the network target, if the link has one
    pub fn net_name(&self) -> Option<&str> {
        self.common_network_relative_link
            .as_ref()
            .map(|link| link.net_name.as_str())
    }

    /// LocalBasePath joined with CommonPathSuffix
    pub fn local_path(&self) -> Option<String> {
        let base = self.local_base_path.as_deref()?;
        match self.common_path_suffix.as_deref() {
            Some(suffix) if !suffix.is_empty() => {
                if base.ends_with('\\') {
                    Some(format!("{}{}", base, suffix))
                } else {
                    Some(format!("{}\\{}", base, suffix))
                }
            }
            _ => Some(base.to_string()),
        }
    }
}

fn link_info_error(field: &'static str, message: impl Into<String>) -> Error {
    Error::decode(ErrorKind::LinkInfo, field, message)
}

/// Decode a string that may be stored twice: prefer the UTF-16 copy when its
/// position is known, otherwise decode the code page copy.
pub(crate) fn resolve_string(
    section: &Section<'_>,
    codepage: CodePage,
    field: &'static str,
    unicode: Option<usize>,
    legacy: usize,
) -> Result<String> {
    match unicode {
        Some(position) => {
            let units = section.utf16z_at(position).context(ErrorKind::LinkInfo, field)?;
            Ok(decode_utf16(&units))
        }
        None => {
            let bytes = section.cstr_at(legacy).context(ErrorKind::LinkInfo, field)?;
            Ok(codepage.decode(bytes))
        }
    }
}

/// Position of `offset` relative to a structure starting at `start` in the body
fn relative(start: usize, offset: u32, field: &'static str) -> Result<usize> {
    start
        .checked_add(offset as usize)
        .ok_or_else(|| link_info_error(field, format!("offset 0x{:X} overflows", offset)))
}

struct BodyDecoder<'a> {
    body: Section<'a>,
    /// Header size subtracted from header-level offsets
    base: u32,
    codepage: CodePage,
}

impl<'a> BodyDecoder<'a> {
    /// Turn an offset from the start of LinkInfo into a body position
    fn rebase(&self, field: &'static str, offset: u32) -> Result<usize> {
        offset.checked_sub(self.base).map(|pos| pos as usize).ok_or_else(|| {
            link_info_error(
                field,
                format!(
                    "offset 0x{:X} points inside the 0x{:X}-byte LinkInfo header",
                    offset, self.base
                ),
            )
        })
    }

    fn rebase_unicode(&self, field: &'static str, offset: Option<u32>) -> Result<Option<usize>> {
        match offset {
            Some(offset) if offset != 0 => self.rebase(field, offset).map(Some),
            _ => Ok(None),
        }
    }

    fn u32_at(&self, position: usize, field: &'static str) -> Result<u32> {
        self.body.read_u32_at(position).context(ErrorKind::LinkInfo, field)
    }

    fn resolve(&self, field: &'static str, unicode: Option<usize>, legacy: usize) -> Result<String> {
        resolve_string(&self.body, self.codepage, field, unicode, legacy)
    }

    fn decode_volume_id(&self, header: &LinkInfoHeader) -> Result<VolumeId> {
        let start = self.rebase("VolumeIdOffset", header.volume_id_offset)?;

        let size = self.u32_at(start, "VolumeId.Size")?;
        let drive_type = self.u32_at(start + 4, "VolumeId.DriveType")?;
        let drive_serial_number = self.u32_at(start + 8, "VolumeId.DriveSerialNumber")?;
        let volume_label_offset = self.u32_at(start + 12, "VolumeId.VolumeLabelOffset")?;

        if size <= VOLUME_ID_MIN_SIZE {
            return Err(link_info_error(
                "VolumeId.Size",
                format!("size 0x{:X} is not greater than 0x10", size),
            ));
        }
        if volume_label_offset >= size {
            return Err(link_info_error(
                "VolumeId.VolumeLabelOffset",
                format!("offset 0x{:X} is not less than size 0x{:X}", volume_label_offset, size),
            ));
        }

        let volume_label_offset_unicode = if volume_label_offset == VOLUME_LABEL_OFFSET_UNICODE_MARKER {
            let offset = self.u32_at(start + 16, "VolumeId.VolumeLabelOffsetUnicode")?;
            if offset >= size {
                return Err(link_info_error(
                    "VolumeId.VolumeLabelOffsetUnicode",
                    format!("offset 0x{:X} is not less than size 0x{:X}", offset, size),
                ));
            }
            Some(offset)
        } else {
            None
        };

        let unicode = match volume_label_offset_unicode {
            Some(offset) if offset != 0 => Some(relative(start, offset, "VolumeId.VolumeLabelOffsetUnicode")?),
            _ => None,
        };
        let legacy = relative(start, volume_label_offset, "VolumeId.VolumeLabelOffset")?;
        let volume_label = self.resolve("VolumeId.VolumeLabel", unicode, legacy)?;

        Ok(VolumeId {
            size,
            drive_type: DriveType::from(drive_type),
            drive_serial_number,
            volume_label_offset,
            volume_label_offset_unicode,
            volume_label,
        })
    }

    fn decode_network_link(&self, header: &LinkInfoHeader) -> Result<CommonNetworkRelativeLink> {
        let start = self.rebase(
            "CommonNetworkRelativeLinkOffset",
            header.common_network_relative_link_offset,
        )?;

        let size = self.u32_at(start, "CommonNetworkRelativeLink.Size")?;
        let flags = self.u32_at(start + 4, "CommonNetworkRelativeLink.Flags")?;
        let net_name_offset = self.u32_at(start + 8, "NetNameOffset")?;
        let device_name_offset = self.u32_at(start + 12, "DeviceNameOffset")?;
        let network_provider_type_raw = self.u32_at(start + 16, "NetProviderType")?;
        let flags = CommonNetworkRelativeLinkFlags::from_bits_truncate(flags);

        if size < NETWORK_LINK_HEADER_SIZE {
            return Err(link_info_error(
                "CommonNetworkRelativeLink.Size",
                format!("size 0x{:X} is less than 0x14", size),
            ));
        }

        let net_name = self.resolve(
            "NetName",
            None,
            relative(start, net_name_offset, "NetNameOffset")?,
        )?;

        let mut net_name_offset_unicode = None;
        let mut device_name_offset_unicode = None;
        let mut net_name_unicode = None;
        let mut device_name_unicode = None;

        // A NetNameOffset past the fixed header means the Unicode offsets follow it
        if net_name_offset > NETWORK_LINK_HEADER_SIZE {
            let optional = start + NETWORK_LINK_HEADER_SIZE as usize;
            let net_offset = self.u32_at(optional, "NetNameOffsetUnicode")?;
            let device_offset = self.u32_at(optional + 4, "DeviceNameOffsetUnicode")?;
            if net_offset == 0 {
                return Err(link_info_error(
                    "NetNameOffsetUnicode",
                    "NetNameOffsetUnicode is 0 but NetNameOffset says it is present",
                ));
            }

            net_name_unicode = Some(self.resolve(
                "NetNameUnicode",
                Some(relative(start, net_offset, "NetNameOffsetUnicode")?),
                0,
            )?);
            if device_offset > 0 {
                device_name_unicode = Some(self.resolve(
                    "DeviceNameUnicode",
                    Some(relative(start, device_offset, "DeviceNameOffsetUnicode")?),
                    0,
                )?);
            }

            net_name_offset_unicode = Some(net_offset);
            device_name_offset_unicode = Some(device_offset);
        }

        let device_name = if flags.valid_device() {
            if device_name_offset == 0 {
                return Err(link_info_error(
                    "DeviceNameOffset",
                    "ValidDevice is set but DeviceNameOffset is 0",
                ));
            }
            Some(self.resolve(
                "DeviceName",
                None,
                relative(start, device_name_offset, "DeviceNameOffset")?,
            )?)
        } else {
            if device_name_offset != 0 {
                return Err(link_info_error(
                    "DeviceNameOffset",
                    format!(
                        "DeviceNameOffset must be 0 when ValidDevice is not set, got 0x{:X}",
                        device_name_offset
                    ),
                ));
            }
            None
        };

        // Any provider code is accepted once ValidNetType is set
        if !flags.valid_net_type() && network_provider_type_raw != 0 {
            return Err(link_info_error(
                "NetProviderType",
                format!(
                    "NetProviderType must be 0 when ValidNetType is not set, got 0x{:X}",
                    network_provider_type_raw
                ),
            ));
        }

        Ok(CommonNetworkRelativeLink {
            size,
            flags,
            net_name_offset,
            device_name_offset,
            network_provider_type_raw,
            net_name_offset_unicode,
            device_name_offset_unicode,
            net_name,
            device_name,
            net_name_unicode,
            device_name_unicode,
        })
    }
}

fn check_absent(field: &'static str, offset: u32, flag: &str) -> Result<()> {
    if offset != 0 {
        return Err(link_info_error(
            field,
            format!("{} must be 0 when {} is not set, got 0x{:X}", field, flag, offset),
        ));
    }
    Ok(())
}

/// Decode the LinkInfo structure at the cursor position
pub fn decode_link_info<R: Read + Seek>(cursor: &mut ByteCursor<R>, codepage: CodePage) -> Result<LinkInfo> {
    let size = cursor.read_u32().context(ErrorKind::LinkInfo, "Size")?;
    let header_size = cursor.read_u32().context(ErrorKind::LinkInfo, "HeaderSize")?;
    let flags = cursor.read_u32().context(ErrorKind::LinkInfo, "Flags")?;
    let volume_id_offset = cursor.read_u32().context(ErrorKind::LinkInfo, "VolumeIdOffset")?;
    let local_base_path_offset = cursor.read_u32().context(ErrorKind::LinkInfo, "LocalBasePathOffset")?;
    let common_network_relative_link_offset = cursor
        .read_u32()
        .context(ErrorKind::LinkInfo, "CommonNetworkRelativeLinkOffset")?;
    let common_path_suffix_offset = cursor
        .read_u32()
        .context(ErrorKind::LinkInfo, "CommonPathSuffixOffset")?;

    let header = LinkInfoHeader {
        size,
        header_size,
        flags: LinkInfoFlags::from_bits_truncate(flags),
        volume_id_offset,
        local_base_path_offset,
        common_network_relative_link_offset,
        common_path_suffix_offset,
    };

    let header_optional = if header_size >= LINK_INFO_HEADER_SIZE_UNICODE {
        Some(LinkInfoHeaderOptional {
            local_base_path_offset_unicode: cursor
                .read_u32()
                .context(ErrorKind::LinkInfo, "LocalBasePathOffsetUnicode")?,
            common_path_suffix_offset_unicode: cursor
                .read_u32()
                .context(ErrorKind::LinkInfo, "CommonPathSuffixOffsetUnicode")?,
        })
    } else if header_size != LINK_INFO_HEADER_SIZE {
        return Err(link_info_error(
            "HeaderSize",
            format!("header size must be 0x1C or at least 0x24, got 0x{:X}", header_size),
        ));
    } else {
        None
    };

    if size < header_size {
        return Err(link_info_error(
            "Size",
            format!("size 0x{:X} is smaller than header size 0x{:X}", size, header_size),
        ));
    }

    // Header bytes past the fields this decoder knows about
    let known = if header_optional.is_some() {
        LINK_INFO_HEADER_SIZE_UNICODE
    } else {
        LINK_INFO_HEADER_SIZE
    };
    cursor
        .skip(u64::from(header_size - known))
        .context(ErrorKind::LinkInfo, "HeaderSize")?;

    let body = cursor
        .read_bytes((size - header_size) as usize)
        .context(ErrorKind::LinkInfo, "Size")?;
    let decoder = BodyDecoder {
        body: Section::new(&body),
        base: header_size,
        codepage,
    };

    let local_base_path_offset_unicode = header_optional
        .as_ref()
        .map(|optional| optional.local_base_path_offset_unicode);
    let common_path_suffix_offset_unicode = header_optional
        .as_ref()
        .map(|optional| optional.common_path_suffix_offset_unicode);

    let mut link_info = LinkInfo {
        header,
        header_optional,
        volume_id: None,
        local_base_path: None,
        common_network_relative_link: None,
        common_path_suffix: None,
    };
    let header = &link_info.header;

    if header.flags.has_volume_id_and_local_base_path() {
        let volume_id = decoder.decode_volume_id(header)?;

        let unicode = decoder.rebase_unicode("LocalBasePathOffsetUnicode", local_base_path_offset_unicode)?;
        let legacy = decoder.rebase("LocalBasePathOffset", header.local_base_path_offset)?;
        let local_base_path = decoder.resolve("LocalBasePath", unicode, legacy)?;

        let unicode = decoder.rebase_unicode("CommonPathSuffixOffsetUnicode", common_path_suffix_offset_unicode)?;
        let legacy = decoder.rebase("CommonPathSuffixOffset", header.common_path_suffix_offset)?;
        let common_path_suffix = decoder.resolve("CommonPathSuffix", unicode, legacy)?;

        link_info.volume_id = Some(volume_id);
        link_info.local_base_path = Some(local_base_path);
        link_info.common_path_suffix = Some(common_path_suffix);
    } else {
        check_absent("VolumeIdOffset", header.volume_id_offset, "VolumeIDAndLocalBasePath")?;
        check_absent("LocalBasePathOffset", header.local_base_path_offset, "VolumeIDAndLocalBasePath")?;
        check_absent(
            "LocalBasePathOffsetUnicode",
            local_base_path_offset_unicode.unwrap_or(0),
            "VolumeIDAndLocalBasePath",
        )?;
    }

    let header = &link_info.header;
    if header.flags.has_common_network_relative_link() {
        let network = decoder.decode_network_link(header)?;
        log::debug!(
            "CommonNetworkRelativeLink: {}, flags: {:?}",
            network.net_name,
            header.flags
        );
        link_info.common_network_relative_link = Some(network);
    } else {
        check_absent(
            "CommonNetworkRelativeLinkOffset",
            header.common_network_relative_link_offset,
            "CommonNetworkRelativeLinkAndPathSuffix",
        )?;
    }

    Ok(link_info)
}
