//! Builders for synthetic link images used by the unit tests.

use crate::flags::LinkFlags;
use crate::header::{HEADER_SIZE, LINK_CLSID};

fn utf16z(text: &str) -> Vec<u8> {
    let mut out: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
    out.extend_from_slice(&[0, 0]);
    out
}

fn cstr(text: &str) -> Vec<u8> {
    let mut out = text.as_bytes().to_vec();
    out.push(0);
    out
}

pub(crate) struct HeaderBuilder {
    header_size: u32,
    clsid: [u8; 16],
    flags: u32,
    attributes: u32,
    creation_time: u64,
    file_size: u32,
    show_command: u32,
    hotkey: u16,
    reserved: (u16, u32, u32),
}

impl HeaderBuilder {
    pub(crate) fn new() -> Self {
        Self {
            header_size: HEADER_SIZE,
            clsid: LINK_CLSID,
            flags: 0,
            attributes: 0x20,
            creation_time: 0,
            file_size: 0,
            show_command: 1,
            hotkey: 0,
            reserved: (0, 0, 0),
        }
    }

    pub(crate) fn header_size(mut self, size: u32) -> Self {
        self.header_size = size;
        self
    }

    pub(crate) fn clsid(mut self, clsid: [u8; 16]) -> Self {
        self.clsid = clsid;
        self
    }

    pub(crate) fn flags(mut self, flags: LinkFlags) -> Self {
        self.flags = flags.bits();
        self
    }

    pub(crate) fn file_size(mut self, size: u32) -> Self {
        self.file_size = size;
        self
    }

    pub(crate) fn creation_time(mut self, filetime: u64) -> Self {
        self.creation_time = filetime;
        self
    }

    pub(crate) fn show_command(mut self, value: u32) -> Self {
        self.show_command = value;
        self
    }

    pub(crate) fn hotkey(mut self, value: u16) -> Self {
        self.hotkey = value;
        self
    }

    pub(crate) fn reserved(mut self, r1: u16, r2: u32, r3: u32) -> Self {
        self.reserved = (r1, r2, r3);
        self
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(76);
        out.extend_from_slice(&self.header_size.to_le_bytes());
        out.extend_from_slice(&self.clsid);
        out.extend_from_slice(&self.flags.to_le_bytes());
        out.extend_from_slice(&self.attributes.to_le_bytes());
        out.extend_from_slice(&self.creation_time.to_le_bytes());
        out.extend_from_slice(&0u64.to_le_bytes());
        out.extend_from_slice(&0u64.to_le_bytes());
        out.extend_from_slice(&self.file_size.to_le_bytes());
        out.extend_from_slice(&0i32.to_le_bytes());
        out.extend_from_slice(&self.show_command.to_le_bytes());
        out.extend_from_slice(&self.hotkey.to_le_bytes());
        out.extend_from_slice(&self.reserved.0.to_le_bytes());
        out.extend_from_slice(&self.reserved.1.to_le_bytes());
        out.extend_from_slice(&self.reserved.2.to_le_bytes());
        out
    }
}

/// IDList with a correct declared size and a zero terminal marker
pub(crate) fn id_list(items: &[&[u8]]) -> Vec<u8> {
    let body: usize = items.iter().map(|item| item.len() + 2).sum();
    let mut out = Vec::new();
    out.extend_from_slice(&((body + 2) as u16).to_le_bytes());
    for item in items {
        out.extend_from_slice(&((item.len() + 2) as u16).to_le_bytes());
        out.extend_from_slice(item);
    }
    out.extend_from_slice(&[0, 0]);
    out
}

/// One StringData entry: character count then the characters
pub(crate) fn string_entry(text: &str, unicode: bool) -> Vec<u8> {
    let mut out = Vec::new();
    if unicode {
        let units: Vec<u16> = text.encode_utf16().collect();
        out.extend_from_slice(&(units.len() as u16).to_le_bytes());
        for unit in units {
            out.extend_from_slice(&unit.to_le_bytes());
        }
    } else {
        out.extend_from_slice(&(text.len() as u16).to_le_bytes());
        out.extend_from_slice(text.as_bytes());
    }
    out
}

/// VolumeID with a code page label at 0x10
pub(crate) fn volume_id(drive_type: u32, serial: u32, label: &str) -> Vec<u8> {
    let label = cstr(label);
    let size = 0x10 + label.len() as u32;
    let mut out = Vec::new();
    out.extend_from_slice(&size.to_le_bytes());
    out.extend_from_slice(&drive_type.to_le_bytes());
    out.extend_from_slice(&serial.to_le_bytes());
    out.extend_from_slice(&0x10u32.to_le_bytes());
    out.extend_from_slice(&label);
    out
}

/// VolumeID whose label is only stored as UTF-16 (VolumeLabelOffset = 0x14)
pub(crate) fn volume_id_unicode(drive_type: u32, serial: u32, label: &str) -> Vec<u8> {
    let label = utf16z(label);
    let size = 0x14 + label.len() as u32;
    let mut out = Vec::new();
    out.extend_from_slice(&size.to_le_bytes());
    out.extend_from_slice(&drive_type.to_le_bytes());
    out.extend_from_slice(&serial.to_le_bytes());
    out.extend_from_slice(&0x14u32.to_le_bytes());
    out.extend_from_slice(&0x14u32.to_le_bytes());
    out.extend_from_slice(&label);
    out
}

/// CommonNetworkRelativeLink block builder
pub(crate) struct NetworkLinkBuilder {
    flags: u32,
    net_name: String,
    device_name: Option<String>,
    provider: u32,
    unicode: bool,
    net_name_offset: Option<u32>,
    net_name_offset_unicode: Option<u32>,
    device_name_offset: Option<u32>,
    size: Option<u32>,
}

impl NetworkLinkBuilder {
    pub(crate) fn new(net_name: &str) -> Self {
        Self {
            flags: 0,
            net_name: net_name.to_string(),
            device_name: None,
            provider: 0,
            unicode: false,
            net_name_offset: None,
            net_name_offset_unicode: None,
            device_name_offset: None,
            size: None,
        }
    }

    pub(crate) fn flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    pub(crate) fn device(mut self, name: &str) -> Self {
        self.device_name = Some(name.to_string());
        self
    }

    pub(crate) fn provider(mut self, provider: u32) -> Self {
        self.provider = provider;
        self
    }

    /// Add the Unicode offsets header and UTF-16 copies of the names
    pub(crate) fn unicode(mut self) -> Self {
        self.unicode = true;
        self
    }

    pub(crate) fn net_name_offset(mut self, offset: u32) -> Self {
        self.net_name_offset = Some(offset);
        self
    }

    pub(crate) fn net_name_offset_unicode(mut self, offset: u32) -> Self {
        self.net_name_offset_unicode = Some(offset);
        self
    }

    pub(crate) fn device_name_offset(mut self, offset: u32) -> Self {
        self.device_name_offset = Some(offset);
        self
    }

    pub(crate) fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let fixed = if self.unicode { 0x1C } else { 0x14 };
        let mut strings = Vec::new();

        let net_offset = fixed + strings.len() as u32;
        strings.extend_from_slice(&cstr(&self.net_name));

        let mut device_offset = 0;
        if let Some(device) = &self.device_name {
            device_offset = fixed + strings.len() as u32;
            strings.extend_from_slice(&cstr(device));
        }

        let mut unicode_offsets = (0u32, 0u32);
        if self.unicode {
            unicode_offsets.0 = fixed + strings.len() as u32;
            strings.extend_from_slice(&utf16z(&self.net_name));
            if let Some(device) = &self.device_name {
                unicode_offsets.1 = fixed + strings.len() as u32;
                strings.extend_from_slice(&utf16z(device));
            }
        }

        let size = self.size.unwrap_or(fixed + strings.len() as u32);
        let mut out = Vec::new();
        out.extend_from_slice(&size.to_le_bytes());
        out.extend_from_slice(&self.flags.to_le_bytes());
        out.extend_from_slice(&self.net_name_offset.unwrap_or(net_offset).to_le_bytes());
        out.extend_from_slice(&self.device_name_offset.unwrap_or(device_offset).to_le_bytes());
        out.extend_from_slice(&self.provider.to_le_bytes());
        if self.unicode {
            out.extend_from_slice(&self.net_name_offset_unicode.unwrap_or(unicode_offsets.0).to_le_bytes());
            out.extend_from_slice(&unicode_offsets.1.to_le_bytes());
        }
        out.extend_from_slice(&strings);
        out
    }
}

/// LinkInfo builder; lays the optional parts out back to back after the header
pub(crate) struct LinkInfoBuilder {
    header_size: u32,
    flags: u32,
    volume_id: Option<Vec<u8>>,
    local_base_path: Option<String>,
    network: Option<Vec<u8>>,
    suffix: Option<String>,
    local_base_path_unicode: Option<String>,
    suffix_unicode: Option<String>,
    offsets: [Option<u32>; 4],
}

impl LinkInfoBuilder {
    pub(crate) fn new() -> Self {
        Self {
            header_size: 0x1C,
            flags: 0,
            volume_id: None,
            local_base_path: None,
            network: None,
            suffix: None,
            local_base_path_unicode: None,
            suffix_unicode: None,
            offsets: [None; 4],
        }
    }

    pub(crate) fn header_size(mut self, size: u32) -> Self {
        self.header_size = size;
        self
    }

    pub(crate) fn flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the VolumeIdAndLocalBasePath flag
    pub(crate) fn local(mut self, volume_id: Vec<u8>, base_path: &str, suffix: &str) -> Self {
        self.flags |= 0x1;
        self.volume_id = Some(volume_id);
        self.local_base_path = Some(base_path.to_string());
        self.suffix = Some(suffix.to_string());
        self
    }

    /// UTF-16 copies referenced from the extended header (needs header size 0x24)
    pub(crate) fn unicode_paths(mut self, base_path: &str, suffix: &str) -> Self {
        self.local_base_path_unicode = Some(base_path.to_string());
        self.suffix_unicode = Some(suffix.to_string());
        self
    }

    /// Sets the CommonNetworkRelativeLinkAndPathSuffix flag
    pub(crate) fn network(mut self, block: Vec<u8>) -> Self {
        self.flags |= 0x2;
        self.network = Some(block);
        self
    }

    /// Force one of VolumeIDOffset, LocalBasePathOffset,
    /// CommonNetworkRelativeLinkOffset, CommonPathSuffixOffset
    pub(crate) fn offset(mut self, index: usize, value: u32) -> Self {
        self.offsets[index] = Some(value);
        self
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let base = self.header_size;
        let mut body = Vec::new();
        let mut offsets = [0u32; 4];
        let mut unicode_offsets = [0u32; 2];

        if let Some(volume_id) = &self.volume_id {
            offsets[0] = base + body.len() as u32;
            body.extend_from_slice(volume_id);
        }
        if let Some(path) = &self.local_base_path {
            offsets[1] = base + body.len() as u32;
            body.extend_from_slice(&cstr(path));
        }
        if let Some(network) = &self.network {
            offsets[2] = base + body.len() as u32;
            body.extend_from_slice(network);
        }
        if let Some(suffix) = &self.suffix {
            offsets[3] = base + body.len() as u32;
            body.extend_from_slice(&cstr(suffix));
        }
        if let Some(path) = &self.local_base_path_unicode {
            unicode_offsets[0] = base + body.len() as u32;
            body.extend_from_slice(&utf16z(path));
        }
        if let Some(suffix) = &self.suffix_unicode {
            unicode_offsets[1] = base + body.len() as u32;
            body.extend_from_slice(&utf16z(suffix));
        }

        for (slot, forced) in offsets.iter_mut().zip(self.offsets.iter()) {
            if let Some(value) = forced {
                *slot = *value;
            }
        }

        let mut out = Vec::new();
        out.extend_from_slice(&(base + body.len() as u32).to_le_bytes());
        out.extend_from_slice(&self.header_size.to_le_bytes());
        out.extend_from_slice(&self.flags.to_le_bytes());
        for offset in offsets {
            out.extend_from_slice(&offset.to_le_bytes());
        }
        if self.header_size >= 0x24 {
            out.extend_from_slice(&unicode_offsets[0].to_le_bytes());
            out.extend_from_slice(&unicode_offsets[1].to_le_bytes());
        }
        // Pad any header bytes beyond the fields we know about
        out.resize(self.header_size.max(0x1C) as usize, 0);
        out.extend_from_slice(&body);
        out
    }
}
