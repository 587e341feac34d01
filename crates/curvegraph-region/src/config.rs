//! Region configuration

use serde::{Deserialize, Serialize};

/// Vertex ceiling for 16-bit index buffers
pub const DEFAULT_MAX_VERTICES: u32 = u16::MAX as u32 + 1;

/// Index width of the consuming backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexWidth {
    #[default]
    U16,
    U32,
}

impl IndexWidth {
    /// Number of distinct vertices addressable with this width
    pub fn max_vertices(&self) -> u32 {
        match self {
            Self::U16 => DEFAULT_MAX_VERTICES,
            Self::U32 => u32::MAX,
        }
    }

    /// Bytes per index
    pub fn size(&self) -> usize {
        match self {
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }
}

/// Region configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    /// Index width used by the backend
    pub index_width: IndexWidth,
    /// Lower vertex ceiling overriding the one implied by `index_width`
    pub max_vertices: Option<u32>,
}

impl RegionConfig {
    /// Configuration for 32-bit index buffers
    pub fn wide() -> Self {
        Self {
            index_width: IndexWidth::U32,
            max_vertices: None,
        }
    }

    /// Override the vertex ceiling
    pub fn with_max_vertices(mut self, max_vertices: u32) -> Self {
        self.max_vertices = Some(max_vertices);
        self
    }

    /// Effective vertex ceiling, never above what `index_width` can address
    pub fn vertex_limit(&self) -> u32 {
        let width_limit = self.index_width.max_vertices();
        self.max_vertices
            .map_or(width_limit, |limit| limit.min(width_limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_sixteen_bit() {
        let config = RegionConfig::default();
        assert_eq!(config.index_width, IndexWidth::U16);
        assert_eq!(config.vertex_limit(), 65_536);
    }

    #[test]
    fn test_index_width_size() {
        assert_eq!(IndexWidth::U16.size(), 2);
        assert_eq!(IndexWidth::U32.size(), 4);
        assert_eq!(IndexWidth::U32.max_vertices(), u32::MAX);
    }

    #[test]
    fn test_override_is_clamped_to_width() {
        assert_eq!(RegionConfig::default().with_max_vertices(12).vertex_limit(), 12);
        assert_eq!(
            RegionConfig::default().with_max_vertices(1 << 20).vertex_limit(),
            DEFAULT_MAX_VERTICES
        );
        assert_eq!(RegionConfig::wide().with_max_vertices(1 << 20).vertex_limit(), 1 << 20);
    }

    #[test]
    fn test_config_from_json() {
        let config: RegionConfig = serde_json::from_str(r#"{ "index_width": "u32" }"#).unwrap();
        assert_eq!(config, RegionConfig::wide());

        let config: RegionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RegionConfig::default());
    }
}
