use crate::types::Place;
use anyhow::{anyhow, Context, Result};
use geojson::GeoJson;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

/// Loads the point dataset from disk. Any failure here (missing file, parse
/// error, wrong document shape, zero usable features) aborts startup.
pub fn load_places(path: &Path, name_property: &str) -> Result<Vec<Place>> {
    info!("Loading GeoJSON from {:?}...", path);
    let file = File::open(path)
        .with_context(|| format!("Failed to open GeoJSON file: {:?}", path))?;
    let reader = BufReader::new(file);

    // Parse the GeoJSON. warning: this loads the whole file into memory.
    let geojson = GeoJson::from_reader(reader).context("Failed to parse GeoJSON")?;

    let places = places_from_geojson(geojson, name_property)?;
    info!("Loaded {} point features", places.len());
    Ok(places)
}

/// Converts a parsed document into `Place`s. Split from file I/O so tests can
/// feed in-memory documents.
pub fn places_from_geojson(geojson: GeoJson, name_property: &str) -> Result<Vec<Place>> {
    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => return Err(anyhow!("GeoJSON must be a FeatureCollection")),
    };

    let mut places = Vec::new();

    for feature in collection.features {
        // 1. Display name
        let name = feature
            .properties
            .as_ref()
            .and_then(|props| props.get(name_property));

        let name = match name {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => {
                warn!("Skipping feature without a usable '{}' property", name_property);
                continue;
            }
        };

        // 2. Point geometry
        // geojson crate Value -> geo types -> Point
        let location = match feature.geometry {
            Some(geom) => {
                let converted: geo::Geometry<f64> = geom
                    .value
                    .try_into()
                    .map_err(|e| anyhow!("Failed to convert geometry for '{}': {:?}", name, e))?;

                match converted {
                    geo::Geometry::Point(p) => p,
                    _ => continue, // Skip polygons/lines
                }
            }
            None => continue,
        };

        places.push(Place {
            name,
            location,
            properties: feature.properties.unwrap_or_default(),
        });
    }

    if places.is_empty() {
        return Err(anyhow!("GeoJSON contained no point features"));
    }

    Ok(places)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CITIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [-112.07, 33.45]},
                "properties": {"name": "Phoenix", "2015": 110, "2016": 107}
            },
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [-104.99, 39.74]},
                "properties": {"name": "Denver", "2015": 24, "2016": 31}
            },
            {
                "type": "Feature",
                "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]},
                "properties": {"name": "Not a point", "2015": 1}
            }
        ]
    }"#;

    #[test]
    fn parses_point_features_and_skips_other_geometries() {
        let geojson: GeoJson = CITIES.parse().unwrap();
        let places = places_from_geojson(geojson, "name").unwrap();

        assert_eq!(places.len(), 2);
        assert_eq!(places[0].name, "Phoenix");
        assert_eq!(places[0].location.x(), -112.07);
        assert_eq!(places[0].location.y(), 33.45);
        assert_eq!(places[1].numeric_value("2016"), Some(31.0));
    }

    #[test]
    fn features_without_name_are_skipped() {
        let doc = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": {"type": "Point", "coordinates": [0.0, 0.0]},
                    "properties": {"2015": 5}
                },
                {
                    "type": "Feature",
                    "geometry": {"type": "Point", "coordinates": [1.0, 1.0]},
                    "properties": {"name": "Kept", "2015": 7}
                }
            ]
        }"#;

        let geojson: GeoJson = doc.parse().unwrap();
        let places = places_from_geojson(geojson, "name").unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].name, "Kept");
    }

    #[test]
    fn non_collection_document_is_rejected() {
        let doc = r#"{"type": "Point", "coordinates": [0.0, 0.0]}"#;
        let geojson: GeoJson = doc.parse().unwrap();
        assert!(places_from_geojson(geojson, "name").is_err());
    }

    #[test]
    fn collection_without_points_is_rejected() {
        let doc = r#"{"type": "FeatureCollection", "features": []}"#;
        let geojson: GeoJson = doc.parse().unwrap();
        assert!(places_from_geojson(geojson, "name").is_err());
    }
}
