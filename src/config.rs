use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub symbols: SymbolConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    pub geojson: PathBuf,
    /// Property holding each feature's display name.
    #[serde(default = "default_name_property")]
    pub name_property: String,
}

fn default_name_property() -> String {
    "name".to_string()
}

/// Symbol styling, forwarded verbatim to the map layer. Only `base_radius`
/// and `value_label` are interpreted on this side.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SymbolConfig {
    pub base_radius: f64,
    /// Popup label prefix, e.g. "Hot days in" -> "Hot days in 2015: 37".
    pub value_label: String,
    pub fill_color: String,
    pub outline_color: String,
    pub outline_weight: f64,
    pub fill_opacity: f64,
}

impl Default for SymbolConfig {
    fn default() -> Self {
        Self {
            base_radius: 3.0,
            value_label: "Value in".to_string(),
            fill_color: "#ff6b6b".to_string(),
            outline_color: "#ffffff".to_string(),
            outline_weight: 1.5,
            fill_opacity: 0.5,
        }
    }
}

/// Basemap settings, forwarded verbatim to the map layer.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct MapConfig {
    /// [lat, lon]
    pub center: [f64; 2],
    pub zoom: u8,
    pub max_zoom: u8,
    pub tile_url: String,
    pub subdomains: String,
    pub attribution: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: [39.0, -98.0],
            zoom: 4,
            max_zoom: 20,
            tile_url: "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png".to_string(),
            subdomains: "abcd".to_string(),
            attribution: "&copy; OpenStreetMap &copy; CARTO".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    /// Static frontend directory served at "/".
    pub assets_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            assets_dir: PathBuf::from("assets"),
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [input]
            geojson = "data/cities.geojson"
            "#,
        )
        .unwrap();

        assert_eq!(config.input.name_property, "name");
        assert_eq!(config.symbols.base_radius, 3.0);
        assert_eq!(config.map.center, [39.0, -98.0]);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [input]
            geojson = "data/cities.geojson"
            name_property = "city"

            [symbols]
            base_radius = 5.0
            value_label = "Hot days in"

            [server]
            port = 9001
            "#,
        )
        .unwrap();

        assert_eq!(config.input.name_property, "city");
        assert_eq!(config.symbols.base_radius, 5.0);
        assert_eq!(config.symbols.value_label, "Hot days in");
        // untouched sections still default
        assert_eq!(config.symbols.fill_color, "#ff6b6b");
        assert_eq!(config.server.port, 9001);
    }
}
