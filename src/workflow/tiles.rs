use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Background imagery for the map.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileStyle {
    #[default]
    #[display(fmt = "normal")]
    Normal,
    #[display(fmt = "satellite")]
    Satellite,
    #[display(fmt = "hybrid")]
    Hybrid,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown map type `{0}`")]
pub struct UnknownTileStyle(pub String);

impl FromStr for TileStyle {
    type Err = UnknownTileStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(TileStyle::Normal),
            "satellite" => Ok(TileStyle::Satellite),
            "hybrid" => Ok(TileStyle::Hybrid),
            _ => Err(UnknownTileStyle(s.to_string())),
        }
    }
}

/// A raster tile source: a `{s}`/`{z}`/`{x}`/`{y}` URL template and the
/// subdomains `{s}` rotates through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileLayer {
    pub url_template: &'static str,
    pub subdomains: &'static [&'static str],
}

const OSM_SUBDOMAINS: &[&str] = &["a", "b", "c"];

impl TileStyle {
    pub fn layer(self) -> TileLayer {
        match self {
            TileStyle::Normal => TileLayer {
                url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
                subdomains: OSM_SUBDOMAINS,
            },
            TileStyle::Satellite => TileLayer {
                url_template: "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png",
                subdomains: OSM_SUBDOMAINS,
            },
            TileStyle::Hybrid => TileLayer {
                url_template: "https://{s}.google.com/vt/lyrs=s,h&x={x}&y={y}&z={z}",
                subdomains: &["mt0", "mt1", "mt2", "mt3"],
            },
        }
    }
}

impl TileLayer {
    /// URL of one tile. Subdomains are spread by tile position so
    /// neighbouring tiles load from different hosts.
    pub fn tile_url(&self, z: u32, x: u32, y: u32) -> String {
        let index = (u64::from(x) + u64::from(y)) % self.subdomains.len() as u64;
        let subdomain = self.subdomains[index as usize];
        self.url_template
            .replace("{s}", subdomain)
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}
