//! Typed access to `server.properties`
//!
//! Loads the flat `key=value` file next to the server executable, keeps
//! a typed in-memory view, and writes single-key updates back by
//! textual substitution, preserving comments and layout.
//!
//! On every write the file is re-read before substitution, so earlier
//! writes and external edits are never clobbered by a stale snapshot.

use bedrock_core::{BridgeError, PropertyEntry, PropertyValue, Result, ServerProperty};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the backing store, sibling to the server executable
pub const PROPERTIES_FILE: &str = "server.properties";

/// Typed view of a `server.properties` file
#[derive(Debug, Clone)]
pub struct ServerProperties {
    /// Path of the backing file
    path: PathBuf,
    /// Raw file text as of the last read or write
    raw: String,
    /// Typed values keyed by wire-format key name
    values: HashMap<String, PropertyValue>,
}

impl ServerProperties {
    /// Load the `server.properties` file from `dir`.
    ///
    /// A missing file is fatal; no defaults are synthesized.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(PROPERTIES_FILE);
        let raw = fs::read_to_string(&path).map_err(|e| {
            BridgeError::Properties(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let values = parse_properties(&raw);
        debug!("Loaded {} properties from {}", values.len(), path.display());
        Ok(Self { path, raw, values })
    }

    /// Current typed value for a key, if the file had one
    pub fn get(&self, key: ServerProperty) -> Option<&PropertyValue> {
        self.values.get(key.as_str())
    }

    /// Update a key in memory and on disk.
    ///
    /// Values are serialized verbatim, without validation. The file is
    /// re-read before substitution, then every line beginning `key=` is
    /// rewritten and the whole file written back; comments and other
    /// lines are preserved byte for byte. A key with no matching line
    /// updates memory only.
    pub fn set(&mut self, key: ServerProperty, value: impl Into<PropertyValue>) -> Result<()> {
        let value = value.into();
        self.values
            .insert(key.as_str().to_string(), value.clone());

        let current = fs::read_to_string(&self.path).map_err(|e| {
            BridgeError::Properties(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        let rewritten = substitute(&current, key.as_str(), &value.to_string());
        fs::write(&self.path, &rewritten).map_err(|e| {
            BridgeError::Properties(format!("Failed to write {}: {}", self.path.display(), e))
        })?;
        debug!("Set {}={}", key, value);
        self.raw = rewritten;
        Ok(())
    }

    /// Every known key present in the file, in schema order
    pub fn entries(&self) -> Vec<PropertyEntry> {
        ServerProperty::ALL
            .iter()
            .filter_map(|&key| {
                self.values.get(key.as_str()).map(|value| PropertyEntry {
                    key,
                    value: value.clone(),
                })
            })
            .collect()
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw file text as of the last read or write
    pub fn raw(&self) -> &str {
        &self.raw
    }

    fn get_str(&self, key: ServerProperty) -> Option<&str> {
        self.get(key).and_then(PropertyValue::as_str)
    }

    fn get_int(&self, key: ServerProperty) -> Option<i64> {
        self.get(key).and_then(PropertyValue::as_int)
    }

    fn get_bool(&self, key: ServerProperty) -> Option<bool> {
        self.get(key).and_then(PropertyValue::as_bool)
    }

    // Convenience accessors, one pair per key in the schema.

    pub fn server_name(&self) -> Option<&str> {
        self.get_str(ServerProperty::ServerName)
    }

    pub fn set_server_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.set(ServerProperty::ServerName, name.into())
    }

    pub fn gamemode(&self) -> Option<&str> {
        self.get_str(ServerProperty::Gamemode)
    }

    pub fn set_gamemode(&mut self, gamemode: impl Into<String>) -> Result<()> {
        self.set(ServerProperty::Gamemode, gamemode.into())
    }

    pub fn force_gamemode(&self) -> Option<bool> {
        self.get_bool(ServerProperty::ForceGamemode)
    }

    pub fn set_force_gamemode(&mut self, force: bool) -> Result<()> {
        self.set(ServerProperty::ForceGamemode, force)
    }

    pub fn difficulty(&self) -> Option<i64> {
        self.get_int(ServerProperty::Difficulty)
    }

    pub fn set_difficulty(&mut self, difficulty: i64) -> Result<()> {
        self.set(ServerProperty::Difficulty, difficulty)
    }

    pub fn allow_cheats(&self) -> Option<bool> {
        self.get_bool(ServerProperty::AllowCheats)
    }

    pub fn set_allow_cheats(&mut self, allow: bool) -> Result<()> {
        self.set(ServerProperty::AllowCheats, allow)
    }

    pub fn max_players(&self) -> Option<i64> {
        self.get_int(ServerProperty::MaxPlayers)
    }

    pub fn set_max_players(&mut self, max: i64) -> Result<()> {
        self.set(ServerProperty::MaxPlayers, max)
    }

    pub fn online_mode(&self) -> Option<bool> {
        self.get_bool(ServerProperty::OnlineMode)
    }

    pub fn set_online_mode(&mut self, online: bool) -> Result<()> {
        self.set(ServerProperty::OnlineMode, online)
    }

    pub fn allow_list(&self) -> Option<&str> {
        self.get_str(ServerProperty::AllowList)
    }

    pub fn set_allow_list(&mut self, allow: impl Into<String>) -> Result<()> {
        self.set(ServerProperty::AllowList, allow.into())
    }

    pub fn server_port(&self) -> Option<i64> {
        self.get_int(ServerProperty::ServerPort)
    }

    pub fn set_server_port(&mut self, port: i64) -> Result<()> {
        self.set(ServerProperty::ServerPort, port)
    }

    pub fn server_port_v6(&self) -> Option<i64> {
        self.get_int(ServerProperty::ServerPortV6)
    }

    pub fn set_server_port_v6(&mut self, port: i64) -> Result<()> {
        self.set(ServerProperty::ServerPortV6, port)
    }

    pub fn enable_lan_visibility(&self) -> Option<bool> {
        self.get_bool(ServerProperty::EnableLanVisibility)
    }

    pub fn set_enable_lan_visibility(&mut self, enable: bool) -> Result<()> {
        self.set(ServerProperty::EnableLanVisibility, enable)
    }

    pub fn view_distance(&self) -> Option<i64> {
        self.get_int(ServerProperty::ViewDistance)
    }

    pub fn set_view_distance(&mut self, distance: i64) -> Result<()> {
        self.set(ServerProperty::ViewDistance, distance)
    }

    pub fn tick_distance(&self) -> Option<i64> {
        self.get_int(ServerProperty::TickDistance)
    }

    pub fn set_tick_distance(&mut self, distance: i64) -> Result<()> {
        self.set(ServerProperty::TickDistance, distance)
    }

    pub fn player_idle_timeout(&self) -> Option<i64> {
        self.get_int(ServerProperty::PlayerIdleTimeout)
    }

    pub fn set_player_idle_timeout(&mut self, timeout: i64) -> Result<()> {
        self.set(ServerProperty::PlayerIdleTimeout, timeout)
    }

    pub fn max_threads(&self) -> Option<i64> {
        self.get_int(ServerProperty::MaxThreads)
    }

    pub fn set_max_threads(&mut self, threads: i64) -> Result<()> {
        self.set(ServerProperty::MaxThreads, threads)
    }

    pub fn level_name(&self) -> Option<&str> {
        self.get_str(ServerProperty::LevelName)
    }

    pub fn set_level_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.set(ServerProperty::LevelName, name.into())
    }

    pub fn level_seed(&self) -> Option<&str> {
        self.get_str(ServerProperty::LevelSeed)
    }

    pub fn set_level_seed(&mut self, seed: impl Into<String>) -> Result<()> {
        self.set(ServerProperty::LevelSeed, seed.into())
    }

    pub fn default_player_permission_level(&self) -> Option<i64> {
        self.get_int(ServerProperty::DefaultPlayerPermissionLevel)
    }

    pub fn set_default_player_permission_level(&mut self, level: i64) -> Result<()> {
        self.set(ServerProperty::DefaultPlayerPermissionLevel, level)
    }

    pub fn texturepack_required(&self) -> Option<bool> {
        self.get_bool(ServerProperty::TexturepackRequired)
    }

    pub fn set_texturepack_required(&mut self, required: bool) -> Result<()> {
        self.set(ServerProperty::TexturepackRequired, required)
    }

    pub fn content_log_file_enabled(&self) -> Option<bool> {
        self.get_bool(ServerProperty::ContentLogFileEnabled)
    }

    pub fn set_content_log_file_enabled(&mut self, enabled: bool) -> Result<()> {
        self.set(ServerProperty::ContentLogFileEnabled, enabled)
    }

    pub fn compression_threshold(&self) -> Option<i64> {
        self.get_int(ServerProperty::CompressionThreshold)
    }

    pub fn set_compression_threshold(&mut self, threshold: i64) -> Result<()> {
        self.set(ServerProperty::CompressionThreshold, threshold)
    }

    pub fn compression_algorithm(&self) -> Option<&str> {
        self.get_str(ServerProperty::CompressionAlgorithm)
    }

    pub fn set_compression_algorithm(&mut self, algorithm: impl Into<String>) -> Result<()> {
        self.set(ServerProperty::CompressionAlgorithm, algorithm.into())
    }

    pub fn server_authoritative_movement(&self) -> Option<&str> {
        self.get_str(ServerProperty::ServerAuthoritativeMovement)
    }

    pub fn set_server_authoritative_movement(&mut self, mode: impl Into<String>) -> Result<()> {
        self.set(ServerProperty::ServerAuthoritativeMovement, mode.into())
    }

    pub fn player_movement_score_threshold(&self) -> Option<i64> {
        self.get_int(ServerProperty::PlayerMovementScoreThreshold)
    }

    pub fn set_player_movement_score_threshold(&mut self, threshold: i64) -> Result<()> {
        self.set(ServerProperty::PlayerMovementScoreThreshold, threshold)
    }

    pub fn player_movement_action_direction_threshold(&self) -> Option<&str> {
        self.get_str(ServerProperty::PlayerMovementActionDirectionThreshold)
    }

    pub fn set_player_movement_action_direction_threshold(
        &mut self,
        threshold: impl Into<String>,
    ) -> Result<()> {
        self.set(
            ServerProperty::PlayerMovementActionDirectionThreshold,
            threshold.into(),
        )
    }

    pub fn player_movement_distance_threshold(&self) -> Option<&str> {
        self.get_str(ServerProperty::PlayerMovementDistanceThreshold)
    }

    pub fn set_player_movement_distance_threshold(
        &mut self,
        threshold: impl Into<String>,
    ) -> Result<()> {
        self.set(
            ServerProperty::PlayerMovementDistanceThreshold,
            threshold.into(),
        )
    }

    pub fn player_movement_duration_threshold_in_ms(&self) -> Option<i64> {
        self.get_int(ServerProperty::PlayerMovementDurationThresholdInMs)
    }

    pub fn set_player_movement_duration_threshold_in_ms(&mut self, threshold: i64) -> Result<()> {
        self.set(
            ServerProperty::PlayerMovementDurationThresholdInMs,
            threshold,
        )
    }

    pub fn correct_player_movement(&self) -> Option<bool> {
        self.get_bool(ServerProperty::CorrectPlayerMovement)
    }

    pub fn set_correct_player_movement(&mut self, correct: bool) -> Result<()> {
        self.set(ServerProperty::CorrectPlayerMovement, correct)
    }

    pub fn server_authoritative_block_breaking(&self) -> Option<bool> {
        self.get_bool(ServerProperty::ServerAuthoritativeBlockBreaking)
    }

    pub fn set_server_authoritative_block_breaking(&mut self, authoritative: bool) -> Result<()> {
        self.set(
            ServerProperty::ServerAuthoritativeBlockBreaking,
            authoritative,
        )
    }

    pub fn chat_restriction(&self) -> Option<&str> {
        self.get_str(ServerProperty::ChatRestriction)
    }

    pub fn set_chat_restriction(&mut self, restriction: impl Into<String>) -> Result<()> {
        self.set(ServerProperty::ChatRestriction, restriction.into())
    }

    pub fn disable_player_interaction(&self) -> Option<bool> {
        self.get_bool(ServerProperty::DisablePlayerInteraction)
    }

    pub fn set_disable_player_interaction(&mut self, disable: bool) -> Result<()> {
        self.set(ServerProperty::DisablePlayerInteraction, disable)
    }

    pub fn client_side_chunk_generation_enabled(&self) -> Option<bool> {
        self.get_bool(ServerProperty::ClientSideChunkGenerationEnabled)
    }

    pub fn set_client_side_chunk_generation_enabled(&mut self, enabled: bool) -> Result<()> {
        self.set(ServerProperty::ClientSideChunkGenerationEnabled, enabled)
    }

    pub fn block_network_ids_are_hashes(&self) -> Option<bool> {
        self.get_bool(ServerProperty::BlockNetworkIdsAreHashes)
    }

    pub fn set_block_network_ids_are_hashes(&mut self, hashes: bool) -> Result<()> {
        self.set(ServerProperty::BlockNetworkIdsAreHashes, hashes)
    }

    pub fn disable_persona(&self) -> Option<bool> {
        self.get_bool(ServerProperty::DisablePersona)
    }

    pub fn set_disable_persona(&mut self, disable: bool) -> Result<()> {
        self.set(ServerProperty::DisablePersona, disable)
    }

    pub fn disable_custom_skins(&self) -> Option<bool> {
        self.get_bool(ServerProperty::DisableCustomSkins)
    }

    pub fn set_disable_custom_skins(&mut self, disable: bool) -> Result<()> {
        self.set(ServerProperty::DisableCustomSkins, disable)
    }

    pub fn server_build_radius_ratio(&self) -> Option<&str> {
        self.get_str(ServerProperty::ServerBuildRadiusRatio)
    }

    pub fn set_server_build_radius_ratio(&mut self, ratio: impl Into<String>) -> Result<()> {
        self.set(ServerProperty::ServerBuildRadiusRatio, ratio.into())
    }
}

/// Parse every non-comment, non-blank `key=value` line into typed
/// values. Comments and blank lines produce no entries.
fn parse_properties(raw: &str) -> HashMap<String, PropertyValue> {
    let mut values = HashMap::new();
    for line in raw.lines() {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            values.insert(key.to_string(), PropertyValue::parse(value));
        }
    }
    values
}

/// Replace every `key=...` line with `key=value`, leaving all other
/// lines untouched. Line terminators (`\n` or `\r\n`) are preserved.
fn substitute(text: &str, key: &str, value: &str) -> String {
    let prefix = format!("{}=", key);
    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        let body = line.trim_end_matches(['\r', '\n']);
        if body.starts_with(&prefix) {
            out.push_str(&prefix);
            out.push_str(value);
            out.push_str(&line[body.len()..]);
        } else {
            out.push_str(line);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "max-players=10\nonline-mode=true\n#comment\n";

    fn store_with(content: &str) -> (tempfile::TempDir, ServerProperties) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(PROPERTIES_FILE), content).unwrap();
        let properties = ServerProperties::load(dir.path()).unwrap();
        (dir, properties)
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ServerProperties::load(dir.path()),
            Err(BridgeError::Properties(_))
        ));
    }

    #[test]
    fn test_load_types_values() {
        let (_dir, properties) = store_with(SAMPLE);
        assert_eq!(
            properties.get(ServerProperty::MaxPlayers),
            Some(&PropertyValue::Int(10))
        );
        assert_eq!(
            properties.get(ServerProperty::OnlineMode),
            Some(&PropertyValue::Bool(true))
        );
        // The comment produced no entry
        assert_eq!(properties.entries().len(), 2);
        assert_eq!(properties.get(ServerProperty::ServerName), None);
    }

    #[test]
    fn test_set_rewrites_only_the_target_line() {
        let (dir, mut properties) = store_with(SAMPLE);
        properties.set_max_players(20).unwrap();

        let on_disk = fs::read_to_string(dir.path().join(PROPERTIES_FILE)).unwrap();
        assert_eq!(on_disk, "max-players=20\nonline-mode=true\n#comment\n");
        assert_eq!(properties.max_players(), Some(20));
        // The retained snapshot tracks what was written
        assert_eq!(properties.raw(), on_disk);
    }

    #[test]
    fn test_set_is_idempotent() {
        let (dir, mut properties) = store_with(SAMPLE);
        properties.set_online_mode(false).unwrap();
        let first = fs::read_to_string(dir.path().join(PROPERTIES_FILE)).unwrap();
        properties.set_online_mode(false).unwrap();
        let second = fs::read_to_string(dir.path().join(PROPERTIES_FILE)).unwrap();
        assert_eq!(first, second);
        assert_eq!(properties.online_mode(), Some(false));
    }

    #[test]
    fn test_set_absent_key_updates_memory_only() {
        let (dir, mut properties) = store_with(SAMPLE);
        properties.set_level_name("Bedrock level").unwrap();

        let on_disk = fs::read_to_string(dir.path().join(PROPERTIES_FILE)).unwrap();
        assert_eq!(on_disk, SAMPLE);
        assert_eq!(properties.level_name(), Some("Bedrock level"));
    }

    #[test]
    fn test_sequential_sets_keep_both_changes() {
        let (dir, mut properties) = store_with(SAMPLE);
        properties.set_max_players(20).unwrap();
        properties.set_online_mode(false).unwrap();

        let on_disk = fs::read_to_string(dir.path().join(PROPERTIES_FILE)).unwrap();
        assert_eq!(on_disk, "max-players=20\nonline-mode=false\n#comment\n");
    }

    #[test]
    fn test_external_edits_survive_set() {
        let (dir, mut properties) = store_with(SAMPLE);
        let path = dir.path().join(PROPERTIES_FILE);
        fs::write(&path, "max-players=10\nonline-mode=true\n#edited\n").unwrap();

        properties.set_max_players(20).unwrap();
        let on_disk = fs::read_to_string(&path).unwrap();
        assert_eq!(on_disk, "max-players=20\nonline-mode=true\n#edited\n");
    }

    #[test]
    fn test_crlf_terminators_preserved() {
        let (dir, mut properties) = store_with("max-players=10\r\nonline-mode=true\r\n");
        properties.set_max_players(20).unwrap();

        let on_disk = fs::read_to_string(dir.path().join(PROPERTIES_FILE)).unwrap();
        assert_eq!(on_disk, "max-players=20\r\nonline-mode=true\r\n");
    }

    #[test]
    fn test_similar_key_names_do_not_collide() {
        let (dir, mut properties) = store_with("gamemode=survival\nforce-gamemode=false\n");
        properties.set_gamemode("creative").unwrap();

        let on_disk = fs::read_to_string(dir.path().join(PROPERTIES_FILE)).unwrap();
        assert_eq!(on_disk, "gamemode=creative\nforce-gamemode=false\n");
    }

    #[test]
    fn test_entries_map_back_to_schema_keys() {
        let (_dir, properties) = store_with("online-mode=true\nserver-name=Test\nunknown-key=1\n");
        let entries = properties.entries();
        // Schema order, unknown keys skipped
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].key, ServerProperty::ServerName);
        assert_eq!(entries[1].key, ServerProperty::OnlineMode);
        assert_eq!(entries[1].value, PropertyValue::Bool(true));
    }
}
