//! Model version value object

use crate::core::error::SettingsError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A deployed model version the prediction endpoint can run (Value Object)
///
/// The three Basilisk releases are built in; any other 64-character hex
/// version hash is accepted as [`ModelVersion::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ModelVersion {
    BasiliskV1,
    BasiliskV01D,
    #[default]
    BasiliskV2,
    Custom(String),
}

impl ModelVersion {
    /// All built-in versions, in display order.
    pub fn catalog() -> Vec<ModelVersion> {
        vec![
            ModelVersion::BasiliskV1,
            ModelVersion::BasiliskV01D,
            ModelVersion::BasiliskV2,
        ]
    }

    /// Human-readable name
    pub fn name(&self) -> &str {
        match self {
            ModelVersion::BasiliskV1 => "Basilisk V.1",
            ModelVersion::BasiliskV01D => "Basilisk V.0.1.D",
            ModelVersion::BasiliskV2 => "Basilisk V.2",
            ModelVersion::Custom(_) => "Custom",
        }
    }

    /// Short label used in the prompt line and in config files
    pub fn short_name(&self) -> &str {
        match self {
            ModelVersion::BasiliskV1 => "V.1",
            ModelVersion::BasiliskV01D => "VO1D",
            ModelVersion::BasiliskV2 => "V.2",
            ModelVersion::Custom(hash) => &hash[..hash.len().min(8)],
        }
    }

    /// Version identifier sent to the prediction endpoint
    pub fn version_id(&self) -> &str {
        match self {
            ModelVersion::BasiliskV1 => {
                "4b0970478e6123a0437561282904683f32a9ed0307205dc5db2b5609d6a2ceff"
            }
            ModelVersion::BasiliskV01D => {
                "d5da4236b006f967ceb7da037be9cfc3924b20d21fed88e1e94f19d56e2d3111"
            }
            ModelVersion::BasiliskV2 => {
                "2c1608e18606fad2812020dc541930f2d0495ce32eee50074220b87300bc16e1"
            }
            ModelVersion::Custom(hash) => hash,
        }
    }

    fn is_version_hash(s: &str) -> bool {
        s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit())
    }
}

impl std::fmt::Display for ModelVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.short_name())
    }
}

impl std::str::FromStr for ModelVersion {
    type Err = SettingsError;

    /// Accepts a short name, a display name, or a version hash.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lowered = trimmed.to_lowercase();

        if let Some(known) = Self::catalog().into_iter().find(|v| {
            v.short_name().to_lowercase() == lowered
                || v.name().to_lowercase() == lowered
                || v.version_id() == lowered
        }) {
            return Ok(known);
        }

        if Self::is_version_hash(trimmed) {
            return Ok(ModelVersion::Custom(lowered));
        }

        Err(SettingsError::UnknownVersion(trimmed.to_string()))
    }
}

impl Serialize for ModelVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ModelVersion::Custom(hash) => serializer.serialize_str(hash),
            known => serializer.serialize_str(known.short_name()),
        }
    }
}

impl<'de> Deserialize<'de> for ModelVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_v2() {
        assert_eq!(ModelVersion::default(), ModelVersion::BasiliskV2);
    }

    #[test]
    fn test_parse_by_short_name_and_display_name() {
        assert_eq!("V.1".parse::<ModelVersion>(), Ok(ModelVersion::BasiliskV1));
        assert_eq!("vo1d".parse::<ModelVersion>(), Ok(ModelVersion::BasiliskV01D));
        assert_eq!(
            "Basilisk V.2".parse::<ModelVersion>(),
            Ok(ModelVersion::BasiliskV2)
        );
    }

    #[test]
    fn test_parse_known_hash_resolves_to_catalog_entry() {
        let hash = ModelVersion::BasiliskV1.version_id().to_string();
        assert_eq!(hash.parse::<ModelVersion>(), Ok(ModelVersion::BasiliskV1));
    }

    #[test]
    fn test_parse_unknown_hash_is_custom() {
        let hash = "a".repeat(64);
        let version: ModelVersion = hash.parse().unwrap();
        assert_eq!(version, ModelVersion::Custom(hash.clone()));
        assert_eq!(version.version_id(), hash);
        assert_eq!(version.short_name(), "aaaaaaaa");
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert_eq!(
            "V.9".parse::<ModelVersion>(),
            Err(SettingsError::UnknownVersion("V.9".to_string()))
        );
    }

    #[test]
    fn test_serde_uses_short_name() {
        let json = serde_json::to_string(&ModelVersion::BasiliskV01D).unwrap();
        assert_eq!(json, "\"VO1D\"");
        let back: ModelVersion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ModelVersion::BasiliskV01D);
    }
}
