//! # lnkshare - MS Shell Link (.lnk) decoder
//!
//! Decodes the binary Shell Link format far enough to recover where a shortcut
//! points, with the UNC share (`\\server\share`) of network targets as the main
//! result.
//!
//! ## Features
//!
//! - Shell link header with validated size, CLSID and reserved fields
//! - Target IDList framing
//! - LinkInfo with VolumeID, local paths and CommonNetworkRelativeLink
//! - Unicode and legacy code page strings, Unicode preferred
//! - StringData entries and a skip-only walk of the extra data chain
//! - Credential lookup by share name
//!
//! ```no_run
//! let bytes = std::fs::read("report.lnk")?;
//! let link = lnkshare::parse_bytes(&bytes)?;
//! if let Some(target) = lnkshare::NetworkTarget::from_link(&link) {
//!     println!("{}", target.net_name);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod app;
pub mod cli;
pub mod cursor;
pub mod datetime;
pub mod error;
pub mod extra_data;
pub mod flags;
pub mod header;
pub mod id_list;
pub mod link_info;
pub mod network;
pub mod output;
pub mod parser;
pub mod string_data;
pub mod text;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{Error, ErrorKind, Result};
pub use network::{find_credentials, NetworkTarget, ShareCredential};
pub use output::{OutputFormat, OutputWriter};
pub use parser::{parse_bytes, parse_bytes_with, ParseState, ParsedLink, Parser};
pub use text::CodePage;
