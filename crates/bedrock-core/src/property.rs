//! `server.properties` key schema and typed values

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of keys recognized in `server.properties`.
///
/// Wire-format names are the kebab-case form of the variant name, with
/// the exceptions marked below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServerProperty {
    ServerName,
    Gamemode,
    ForceGamemode,
    Difficulty,
    AllowCheats,
    MaxPlayers,
    OnlineMode,
    AllowList,
    ServerPort,
    #[serde(rename = "server-portv6")]
    ServerPortV6,
    EnableLanVisibility,
    ViewDistance,
    TickDistance,
    PlayerIdleTimeout,
    MaxThreads,
    LevelName,
    LevelSeed,
    DefaultPlayerPermissionLevel,
    TexturepackRequired,
    ContentLogFileEnabled,
    CompressionThreshold,
    CompressionAlgorithm,
    ServerAuthoritativeMovement,
    PlayerMovementScoreThreshold,
    PlayerMovementActionDirectionThreshold,
    PlayerMovementDistanceThreshold,
    PlayerMovementDurationThresholdInMs,
    CorrectPlayerMovement,
    ServerAuthoritativeBlockBreaking,
    ChatRestriction,
    DisablePlayerInteraction,
    ClientSideChunkGenerationEnabled,
    BlockNetworkIdsAreHashes,
    DisablePersona,
    DisableCustomSkins,
    ServerBuildRadiusRatio,
}

impl ServerProperty {
    /// Every key, in file-schema order
    pub const ALL: [ServerProperty; 36] = [
        ServerProperty::ServerName,
        ServerProperty::Gamemode,
        ServerProperty::ForceGamemode,
        ServerProperty::Difficulty,
        ServerProperty::AllowCheats,
        ServerProperty::MaxPlayers,
        ServerProperty::OnlineMode,
        ServerProperty::AllowList,
        ServerProperty::ServerPort,
        ServerProperty::ServerPortV6,
        ServerProperty::EnableLanVisibility,
        ServerProperty::ViewDistance,
        ServerProperty::TickDistance,
        ServerProperty::PlayerIdleTimeout,
        ServerProperty::MaxThreads,
        ServerProperty::LevelName,
        ServerProperty::LevelSeed,
        ServerProperty::DefaultPlayerPermissionLevel,
        ServerProperty::TexturepackRequired,
        ServerProperty::ContentLogFileEnabled,
        ServerProperty::CompressionThreshold,
        ServerProperty::CompressionAlgorithm,
        ServerProperty::ServerAuthoritativeMovement,
        ServerProperty::PlayerMovementScoreThreshold,
        ServerProperty::PlayerMovementActionDirectionThreshold,
        ServerProperty::PlayerMovementDistanceThreshold,
        ServerProperty::PlayerMovementDurationThresholdInMs,
        ServerProperty::CorrectPlayerMovement,
        ServerProperty::ServerAuthoritativeBlockBreaking,
        ServerProperty::ChatRestriction,
        ServerProperty::DisablePlayerInteraction,
        ServerProperty::ClientSideChunkGenerationEnabled,
        ServerProperty::BlockNetworkIdsAreHashes,
        ServerProperty::DisablePersona,
        ServerProperty::DisableCustomSkins,
        ServerProperty::ServerBuildRadiusRatio,
    ];

    /// Wire-format key name as it appears in the file
    pub const fn as_str(self) -> &'static str {
        match self {
            ServerProperty::ServerName => "server-name",
            ServerProperty::Gamemode => "gamemode",
            ServerProperty::ForceGamemode => "force-gamemode",
            ServerProperty::Difficulty => "difficulty",
            ServerProperty::AllowCheats => "allow-cheats",
            ServerProperty::MaxPlayers => "max-players",
            ServerProperty::OnlineMode => "online-mode",
            ServerProperty::AllowList => "allow-list",
            ServerProperty::ServerPort => "server-port",
            ServerProperty::ServerPortV6 => "server-portv6",
            ServerProperty::EnableLanVisibility => "enable-lan-visibility",
            ServerProperty::ViewDistance => "view-distance",
            ServerProperty::TickDistance => "tick-distance",
            ServerProperty::PlayerIdleTimeout => "player-idle-timeout",
            ServerProperty::MaxThreads => "max-threads",
            ServerProperty::LevelName => "level-name",
            ServerProperty::LevelSeed => "level-seed",
            ServerProperty::DefaultPlayerPermissionLevel => "default-player-permission-level",
            ServerProperty::TexturepackRequired => "texturepack-required",
            ServerProperty::ContentLogFileEnabled => "content-log-file-enabled",
            ServerProperty::CompressionThreshold => "compression-threshold",
            ServerProperty::CompressionAlgorithm => "compression-algorithm",
            ServerProperty::ServerAuthoritativeMovement => "server-authoritative-movement",
            ServerProperty::PlayerMovementScoreThreshold => "player-movement-score-threshold",
            ServerProperty::PlayerMovementActionDirectionThreshold => {
                "player-movement-action-direction-threshold"
            }
            ServerProperty::PlayerMovementDistanceThreshold => {
                "player-movement-distance-threshold"
            }
            ServerProperty::PlayerMovementDurationThresholdInMs => {
                "player-movement-duration-threshold-in-ms"
            }
            ServerProperty::CorrectPlayerMovement => "correct-player-movement",
            ServerProperty::ServerAuthoritativeBlockBreaking => {
                "server-authoritative-block-breaking"
            }
            ServerProperty::ChatRestriction => "chat-restriction",
            ServerProperty::DisablePlayerInteraction => "disable-player-interaction",
            ServerProperty::ClientSideChunkGenerationEnabled => {
                "client-side-chunk-generation-enabled"
            }
            ServerProperty::BlockNetworkIdsAreHashes => "block-network-ids-are-hashes",
            ServerProperty::DisablePersona => "disable-persona",
            ServerProperty::DisableCustomSkins => "disable-custom-skins",
            ServerProperty::ServerBuildRadiusRatio => "server-build-radius-ratio",
        }
    }

    /// Reverse lookup from a wire-format key name
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "server-name" => Some(ServerProperty::ServerName),
            "gamemode" => Some(ServerProperty::Gamemode),
            "force-gamemode" => Some(ServerProperty::ForceGamemode),
            "difficulty" => Some(ServerProperty::Difficulty),
            "allow-cheats" => Some(ServerProperty::AllowCheats),
            "max-players" => Some(ServerProperty::MaxPlayers),
            "online-mode" => Some(ServerProperty::OnlineMode),
            "allow-list" => Some(ServerProperty::AllowList),
            "server-port" => Some(ServerProperty::ServerPort),
            "server-portv6" => Some(ServerProperty::ServerPortV6),
            "enable-lan-visibility" => Some(ServerProperty::EnableLanVisibility),
            "view-distance" => Some(ServerProperty::ViewDistance),
            "tick-distance" => Some(ServerProperty::TickDistance),
            "player-idle-timeout" => Some(ServerProperty::PlayerIdleTimeout),
            "max-threads" => Some(ServerProperty::MaxThreads),
            "level-name" => Some(ServerProperty::LevelName),
            "level-seed" => Some(ServerProperty::LevelSeed),
            "default-player-permission-level" => {
                Some(ServerProperty::DefaultPlayerPermissionLevel)
            }
            "texturepack-required" => Some(ServerProperty::TexturepackRequired),
            "content-log-file-enabled" => Some(ServerProperty::ContentLogFileEnabled),
            "compression-threshold" => Some(ServerProperty::CompressionThreshold),
            "compression-algorithm" => Some(ServerProperty::CompressionAlgorithm),
            "server-authoritative-movement" => {
                Some(ServerProperty::ServerAuthoritativeMovement)
            }
            "player-movement-score-threshold" => {
                Some(ServerProperty::PlayerMovementScoreThreshold)
            }
            "player-movement-action-direction-threshold" => {
                Some(ServerProperty::PlayerMovementActionDirectionThreshold)
            }
            "player-movement-distance-threshold" => {
                Some(ServerProperty::PlayerMovementDistanceThreshold)
            }
            "player-movement-duration-threshold-in-ms" => {
                Some(ServerProperty::PlayerMovementDurationThresholdInMs)
            }
            "correct-player-movement" => Some(ServerProperty::CorrectPlayerMovement),
            "server-authoritative-block-breaking" => {
                Some(ServerProperty::ServerAuthoritativeBlockBreaking)
            }
            "chat-restriction" => Some(ServerProperty::ChatRestriction),
            "disable-player-interaction" => Some(ServerProperty::DisablePlayerInteraction),
            "client-side-chunk-generation-enabled" => {
                Some(ServerProperty::ClientSideChunkGenerationEnabled)
            }
            "block-network-ids-are-hashes" => Some(ServerProperty::BlockNetworkIdsAreHashes),
            "disable-persona" => Some(ServerProperty::DisablePersona),
            "disable-custom-skins" => Some(ServerProperty::DisableCustomSkins),
            "server-build-radius-ratio" => Some(ServerProperty::ServerBuildRadiusRatio),
            _ => None,
        }
    }
}

impl fmt::Display for ServerProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed property value.
///
/// Boolean literals and all-digit tokens are promoted on read;
/// everything else stays a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl PropertyValue {
    /// Interpret one raw right-hand-side token from the file.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "true" => return PropertyValue::Bool(true),
            "false" => return PropertyValue::Bool(false),
            _ => {}
        }
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            // Tokens too long for i64 stay strings
            if let Ok(n) = raw.parse::<i64>() {
                return PropertyValue::Int(n);
            }
        }
        PropertyValue::Str(raw.to_string())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Int(n) => write!(f, "{}", n),
            PropertyValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Str(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Str(value.to_string())
    }
}

/// One known key/value pair from the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyEntry {
    pub key: ServerProperty,
    pub value: PropertyValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_typing() {
        assert_eq!(PropertyValue::parse("true"), PropertyValue::Bool(true));
        assert_eq!(PropertyValue::parse("false"), PropertyValue::Bool(false));
        assert_eq!(PropertyValue::parse("10"), PropertyValue::Int(10));
        assert_eq!(
            PropertyValue::parse("survival"),
            PropertyValue::Str("survival".into())
        );
        // Mixed tokens are strings, not numbers
        assert_eq!(
            PropertyValue::parse("19132b"),
            PropertyValue::Str("19132b".into())
        );
        assert_eq!(PropertyValue::parse(""), PropertyValue::Str(String::new()));
    }

    #[test]
    fn test_value_serializes_verbatim() {
        assert_eq!(PropertyValue::Bool(false).to_string(), "false");
        assert_eq!(PropertyValue::Int(19132).to_string(), "19132");
        assert_eq!(PropertyValue::Str("Dedicated Server".into()).to_string(), "Dedicated Server");
    }

    #[test]
    fn test_key_table_is_bidirectional() {
        for key in ServerProperty::ALL {
            assert_eq!(ServerProperty::from_key(key.as_str()), Some(key));
        }
        assert_eq!(ServerProperty::from_key("no-such-key"), None);
    }

    #[test]
    fn test_key_serde_names_match_wire_format() {
        for key in ServerProperty::ALL {
            let json = serde_json::to_string(&key).unwrap();
            assert_eq!(json, format!("\"{}\"", key.as_str()));
        }
    }
}
