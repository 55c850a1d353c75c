//! Network share view of a parsed link and credential lookup by share.

use crate::link_info::CommonNetworkRelativeLink;
use crate::parser::ParsedLink;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Network location a link points to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkTarget {
    /// UNC root, e.g. `\\server\share`
    pub net_name: String,
    /// Mapped drive letter recorded at link creation, e.g. `Z:`
    pub device_name: Option<String>,
    /// Path below the share root
    pub common_path_suffix: Option<String>,
    /// Provider name, when the link records one
    pub provider: Option<String>,
}

impl NetworkTarget {
    /// Extract the network target from a parsed link.
    ///
    /// Returns `None` unless LinkInfo carries a CommonNetworkRelativeLink. The
    /// Unicode NetName is preferred when the link stored one.
    pub fn from_link(link: &ParsedLink) -> Option<Self> {
        let info = link.link_info.as_ref()?;
        if !info.header.flags.has_common_network_relative_link() {
            return None;
        }
        let network = info.common_network_relative_link.as_ref()?;

        Some(Self {
            net_name: preferred(&network.net_name_unicode, &network.net_name),
            device_name: device_name(network),
            common_path_suffix: info.common_path_suffix.clone().filter(|s| !s.is_empty()),
            provider: network
                .network_provider_type()
                .map(|provider| format!("{:?}", provider)),
        })
    }

    /// Share component of the UNC root (`share` in `\\server\share`)
    pub fn share_name(&self) -> Option<&str> {
        self.net_name
            .trim_start_matches('\\')
            .split('\\')
            .nth(1)
            .filter(|share| !share.is_empty())
    }

    /// Server component of the UNC root
    pub fn server_name(&self) -> Option<&str> {
        self.net_name
            .trim_start_matches('\\')
            .split('\\')
            .next()
            .filter(|server| !server.is_empty())
    }

    /// UNC root joined with the path suffix
    pub fn full_path(&self) -> String {
        match self.common_path_suffix.as_deref() {
            Some(suffix) => format!("{}\\{}", self.net_name.trim_end_matches('\\'), suffix),
            None => self.net_name.clone(),
        }
    }
}

fn preferred(unicode: &Option<String>, legacy: &str) -> String {
    match unicode {
        Some(text) if !text.is_empty() => text.clone(),
        _ => legacy.to_string(),
    }
}

fn device_name(network: &CommonNetworkRelativeLink) -> Option<String> {
    match (&network.device_name_unicode, &network.device_name) {
        (Some(unicode), _) if !unicode.is_empty() => Some(unicode.clone()),
        (_, legacy) => legacy.clone(),
    }
}

/// Credentials configured for one share
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ShareCredential {
    /// Share name or UNC fragment matched against link paths
    pub share: String,
    pub user: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for ShareCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShareCredential")
            .field("share", &self.share)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// First credential whose share occurs in `path`, ignoring case
pub fn find_credentials<'a>(path: &str, credentials: &'a [ShareCredential]) -> Option<&'a ShareCredential> {
    let path = path.to_lowercase();
    credentials
        .iter()
        .filter(|credential| !credential.share.is_empty())
        .find(|credential| path.contains(&credential.share.to_lowercase()))
}
