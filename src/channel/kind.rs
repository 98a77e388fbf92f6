use crate::types::constants::{PRESENCE_PREFIX, PRIVATE_ENCRYPTED_PREFIX, PRIVATE_PREFIX};
use serde::{Deserialize, Serialize};

/// Channel type, decided by name prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    Public,
    Private,
    PrivateEncrypted,
    Presence,
}

impl ChannelType {
    /// Classifies a channel name. `private-encrypted-` is checked before
    /// `private-` so exactly one type is chosen.
    pub fn classify(name: &str) -> Self {
        if name.starts_with(PRIVATE_ENCRYPTED_PREFIX) {
            Self::PrivateEncrypted
        } else if name.starts_with(PRIVATE_PREFIX) {
            Self::Private
        } else if name.starts_with(PRESENCE_PREFIX) {
            Self::Presence
        } else {
            Self::Public
        }
    }

    pub fn is_presence(self) -> bool {
        self == Self::Presence
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::PrivateEncrypted => "private_encrypted",
            Self::Presence => "presence",
        }
    }
}

impl std::fmt::Display for ChannelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
