use super::ChannelType;
use crate::types::constants::{PRESENCE_PREFIX, PRIVATE_ENCRYPTED_PREFIX, PRIVATE_PREFIX};

/// Why a client trigger was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerDenial {
    /// Neither `private-` nor `presence-`
    NotPrivateOrPresence,
    /// `private-encrypted-`
    Encrypted,
}

impl TriggerDenial {
    pub fn message(&self) -> &'static str {
        match self {
            Self::NotPrivateOrPresence => "Trigger can only be used on private or presence channels.",
            Self::Encrypted => "Cannot trigger on encrypted channels.",
        }
    }
}

impl std::fmt::Display for TriggerDenial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Decides whether a client may trigger on `channel_name`.
///
/// The private-or-presence gate runs first, then the encrypted gate. On
/// success the returned type is `Private` or `Presence`.
pub fn authorize_trigger(channel_name: &str) -> Result<ChannelType, TriggerDenial> {
    if !(channel_name.starts_with(PRIVATE_PREFIX) || channel_name.starts_with(PRESENCE_PREFIX)) {
        return Err(TriggerDenial::NotPrivateOrPresence);
    }

    if channel_name.starts_with(PRIVATE_ENCRYPTED_PREFIX) {
        return Err(TriggerDenial::Encrypted);
    }

    Ok(ChannelType::classify(channel_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_channels_are_denied() {
        for name in ["public-room", "room", "", "my-private-room", "Presence-room"] {
            assert_eq!(
                authorize_trigger(name),
                Err(TriggerDenial::NotPrivateOrPresence),
                "{}",
                name
            );
        }
    }

    #[test]
    fn test_encrypted_channels_are_denied() {
        assert_eq!(
            authorize_trigger("private-encrypted-room"),
            Err(TriggerDenial::Encrypted)
        );
        assert_eq!(
            authorize_trigger("private-encrypted-"),
            Err(TriggerDenial::Encrypted)
        );
    }

    #[test]
    fn test_private_and_presence_are_allowed() {
        assert_eq!(authorize_trigger("private-room"), Ok(ChannelType::Private));
        assert_eq!(
            authorize_trigger("private-encrypted"),
            Ok(ChannelType::Private)
        );
        assert_eq!(authorize_trigger("presence-room"), Ok(ChannelType::Presence));
    }

    #[test]
    fn test_allowed_type_is_never_encrypted_or_public() {
        let names = [
            "private-a",
            "presence-b",
            "private-encrypted-c",
            "d",
            "private-encrypted",
            "presence-private-encrypted-e",
        ];
        for name in names {
            if let Ok(kind) = authorize_trigger(name) {
                assert!(matches!(kind, ChannelType::Private | ChannelType::Presence));
            }
        }
    }
}
