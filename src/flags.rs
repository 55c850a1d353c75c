//! Flag sets and enumerations that drive every decode decision.
//!
//! Undefined flag bits are dropped when a bitset is built from raw input.
//! Unknown enumeration values land in an `Unknown`/`Other` variant, except for
//! [`ShowCommand`] which is clamped to `Normal`.

use bitflags::bitflags;
use serde::{Serialize, Serializer};

bitflags! {
    /// LinkFlags: which optional structures follow the header
    pub struct LinkFlags: u32 {
        const HAS_LINK_TARGET_ID_LIST          = 1 << 0;
        const HAS_LINK_INFO                    = 1 << 1;
        const HAS_NAME                         = 1 << 2;
        const HAS_RELATIVE_PATH                = 1 << 3;
        const HAS_WORKING_DIR                  = 1 << 4;
        const HAS_ARGUMENTS                    = 1 << 5;
        const HAS_ICON_LOCATION                = 1 << 6;
        const IS_UNICODE                       = 1 << 7;
        const FORCE_NO_LINK_INFO               = 1 << 8;
        const HAS_EXP_STRING                   = 1 << 9;
        const RUN_IN_SEPARATE_PROCESS          = 1 << 10;
        const UNUSED1                          = 1 << 11;
        const HAS_DARWIN_ID                    = 1 << 12;
        const RUN_AS_USER                      = 1 << 13;
        const HAS_EXP_ICON                     = 1 << 14;
        const NO_PIDL_ALIAS                    = 1 << 15;
        const UNUSED2                          = 1 << 16;
        const RUN_WITH_SHIM_LAYER              = 1 << 17;
        const FORCE_NO_LINK_TRACK              = 1 << 18;
        const ENABLE_TARGET_METADATA           = 1 << 19;
        const DISABLE_LINK_PATH_TRACKING       = 1 << 20;
        const DISABLE_KNOWN_FOLDER_TRACKING    = 1 << 21;
        const DISABLE_KNOWN_FOLDER_ALIAS       = 1 << 22;
        const ALLOW_LINK_TO_LINK               = 1 << 23;
        const UNALIAS_ON_SAVE                  = 1 << 24;
        const PREFER_ENVIRONMENT_PATH          = 1 << 25;
        const KEEP_LOCAL_ID_LIST_FOR_UNC_TARGET = 1 << 26;
    }
}

impl LinkFlags {
    pub fn has_link_target_id_list(&self) -> bool {
        self.contains(Self::HAS_LINK_TARGET_ID_LIST)
    }

    pub fn has_link_info(&self) -> bool {
        self.contains(Self::HAS_LINK_INFO)
    }

    pub fn has_name(&self) -> bool {
        self.contains(Self::HAS_NAME)
    }

    pub fn has_relative_path(&self) -> bool {
        self.contains(Self::HAS_RELATIVE_PATH)
    }

    pub fn has_working_dir(&self) -> bool {
        self.contains(Self::HAS_WORKING_DIR)
    }

    pub fn has_arguments(&self) -> bool {
        self.contains(Self::HAS_ARGUMENTS)
    }

    pub fn has_icon_location(&self) -> bool {
        self.contains(Self::HAS_ICON_LOCATION)
    }

    /// StringData is UTF-16 rather than the legacy code page
    pub fn is_unicode(&self) -> bool {
        self.contains(Self::IS_UNICODE)
    }
}

bitflags! {
    /// Attributes of the link target
    pub struct FileAttributes: u32 {
        const READONLY             = 0x0000_0001;
        const HIDDEN               = 0x0000_0002;
        const SYSTEM               = 0x0000_0004;
        const RESERVED1            = 0x0000_0008;
        const DIRECTORY            = 0x0000_0010;
        const ARCHIVE              = 0x0000_0020;
        const RESERVED2            = 0x0000_0040;
        const NORMAL               = 0x0000_0080;
        const TEMPORARY            = 0x0000_0100;
        const SPARSE_FILE          = 0x0000_0200;
        const REPARSE_POINT        = 0x0000_0400;
        const COMPRESSED           = 0x0000_0800;
        const OFFLINE              = 0x0000_1000;
        const NOT_CONTENT_INDEXED  = 0x0000_2000;
        const ENCRYPTED            = 0x0000_4000;
    }
}

bitflags! {
    /// LinkInfoFlags: which LinkInfo sub-structures are present
    pub struct LinkInfoFlags: u32 {
        const VOLUME_ID_AND_LOCAL_BASE_PATH                = 1 << 0;
        const COMMON_NETWORK_RELATIVE_LINK_AND_PATH_SUFFIX = 1 << 1;
    }
}

impl LinkInfoFlags {
    pub fn has_volume_id_and_local_base_path(&self) -> bool {
        self.contains(Self::VOLUME_ID_AND_LOCAL_BASE_PATH)
    }

    pub fn has_common_network_relative_link(&self) -> bool {
        self.contains(Self::COMMON_NETWORK_RELATIVE_LINK_AND_PATH_SUFFIX)
    }
}

bitflags! {
    /// CommonNetworkRelativeLink flags
    pub struct CommonNetworkRelativeLinkFlags: u32 {
        const VALID_DEVICE   = 1 << 0;
        const VALID_NET_TYPE = 1 << 1;
    }
}

impl CommonNetworkRelativeLinkFlags {
    pub fn valid_device(&self) -> bool {
        self.contains(Self::VALID_DEVICE)
    }

    pub fn valid_net_type(&self) -> bool {
        self.contains(Self::VALID_NET_TYPE)
    }
}

bitflags! {
    /// Modifier keys in the high byte of the hotkey
    pub struct HotKeyModifiers: u8 {
        const SHIFT = 0x01;
        const CTRL  = 0x02;
        const ALT   = 0x04;
    }
}

macro_rules! serialize_as_bits {
    ($($flags:ty),+) => {
        $(
            impl Serialize for $flags {
                fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                    self.bits().serialize(serializer)
                }
            }
        )+
    };
}

serialize_as_bits!(
    LinkFlags,
    FileAttributes,
    LinkInfoFlags,
    CommonNetworkRelativeLinkFlags,
    HotKeyModifiers
);

/// Window state requested for the launched target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShowCommand {
    Normal,
    Maximized,
    MinNoActive,
}

impl ShowCommand {
    pub const SW_SHOWNORMAL: u32 = 0x0000_0001;
    pub const SW_SHOWMAXIMIZED: u32 = 0x0000_0003;
    pub const SW_SHOWMINNOACTIVE: u32 = 0x0000_0007;

    /// Map a defined value, or `None`
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            Self::SW_SHOWNORMAL => Some(ShowCommand::Normal),
            Self::SW_SHOWMAXIMIZED => Some(ShowCommand::Maximized),
            Self::SW_SHOWMINNOACTIVE => Some(ShowCommand::MinNoActive),
            _ => None,
        }
    }

    /// Map any value; undefined values are treated as `Normal`
    pub fn from_u32_lenient(value: u32) -> Self {
        Self::from_u32(value).unwrap_or(ShowCommand::Normal)
    }

    pub fn as_u32(self) -> u32 {
        match self {
            ShowCommand::Normal => Self::SW_SHOWNORMAL,
            ShowCommand::Maximized => Self::SW_SHOWMAXIMIZED,
            ShowCommand::MinNoActive => Self::SW_SHOWMINNOACTIVE,
        }
    }
}

/// Keystroke that launches the link: virtual key code plus modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HotKey {
    pub key: u8,
    pub modifiers: HotKeyModifiers,
}

impl HotKey {
    pub fn from_u16(raw: u16) -> Self {
        let [key, high] = raw.to_le_bytes();
        Self {
            key,
            modifiers: HotKeyModifiers::from_bits_truncate(high),
        }
    }

    pub fn is_set(&self) -> bool {
        self.key != 0
    }
}

/// Type of drive the target resided on when the link was created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DriveType {
    Unknown,
    NoRootDir,
    Removable,
    Fixed,
    Remote,
    CdRom,
    RamDisk,
    Other(u32),
}

impl From<u32> for DriveType {
    fn from(value: u32) -> Self {
        match value {
            0 => DriveType::Unknown,
            1 => DriveType::NoRootDir,
            2 => DriveType::Removable,
            3 => DriveType::Fixed,
            4 => DriveType::Remote,
            5 => DriveType::CdRom,
            6 => DriveType::RamDisk,
            other => DriveType::Other(other),
        }
    }
}

macro_rules! network_providers {
    ($($name:ident = $value:literal,)+) => {
        /// Network provider (WNNC_NET_*) recorded for a network link
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
        pub enum NetworkProviderType {
            $($name,)+
            Unknown(u32),
        }

        impl From<u32> for NetworkProviderType {
            fn from(value: u32) -> Self {
                match value {
                    $($value => NetworkProviderType::$name,)+
                    other => NetworkProviderType::Unknown(other),
                }
            }
        }

        impl NetworkProviderType {
            pub fn as_u32(self) -> u32 {
                match self {
                    $(NetworkProviderType::$name => $value,)+
                    NetworkProviderType::Unknown(raw) => raw,
                }
            }
        }
    };
}

network_providers! {
    Avid = 0x001A_0000,
    Docuspace = 0x001B_0000,
    Mangosoft = 0x001C_0000,
    Sernet = 0x001D_0000,
    Riverfront1 = 0x001E_0000,
    Riverfront2 = 0x001F_0000,
    Decorb = 0x0020_0000,
    Protstor = 0x0021_0000,
    FjRedir = 0x0022_0000,
    Distinct = 0x0023_0000,
    Twins = 0x0024_0000,
    Rdr2Sample = 0x0025_0000,
    Csc = 0x0026_0000,
    ThreeInOne = 0x0027_0000,
    Extendnet = 0x0029_0000,
    Stac = 0x002A_0000,
    Foxbat = 0x002B_0000,
    Yahoo = 0x002C_0000,
    Exifs = 0x002D_0000,
    Dav = 0x002E_0000,
    Knoware = 0x002F_0000,
    ObjectDire = 0x0030_0000,
    Masfax = 0x0031_0000,
    HobNfs = 0x0032_0000,
    Shiva = 0x0033_0000,
    Ibmal = 0x0034_0000,
    Lock = 0x0035_0000,
    Termsrv = 0x0036_0000,
    Srt = 0x0037_0000,
    Quincy = 0x0038_0000,
    Openafs = 0x0039_0000,
    Avid1 = 0x003A_0000,
    Dfs = 0x003B_0000,
    Kwnp = 0x003C_0000,
    Zenworks = 0x003D_0000,
    Driveonweb = 0x003E_0000,
    Vmware = 0x003F_0000,
    Rsfx = 0x0040_0000,
    Mfiles = 0x0041_0000,
    MsNfs = 0x0042_0000,
    Google = 0x0043_0000,
    LanMan = 0x0002_0000,
}
