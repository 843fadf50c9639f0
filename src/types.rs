use geo::bounding_rect::BoundingRect;
use geo::{MultiPoint, Point};
use serde::Serialize;
use serde_json::{Map, Value};

/// A single point feature with its raw GeoJSON properties.
#[derive(Debug, Clone)]
pub struct Place {
    pub name: String,
    pub location: Point<f64>,
    // Map<PropertyName, raw JSON value> straight from the feature
    pub properties: Map<String, Value>,
}

impl Place {
    /// Numeric view of a property. JSON numbers pass through, numeric strings
    /// parse; anything else counts as missing data for that property.
    pub fn numeric_value(&self, key: &str) -> Option<f64> {
        match self.properties.get(key)? {
            Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }
}

/// One rendered proportional symbol. Created once per place at startup and
/// mutated in place on every cursor change.
#[derive(Debug, Clone, Serialize)]
pub struct SymbolLayer {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// None when the place has no usable value for the current attribute;
    /// the map layer hides the circle instead of drawing a zero-size one.
    pub radius: Option<f64>,
    pub popup: String,
    pub popup_open: bool,
}

/// Snapshot of the full symbol set at one cursor position.
#[derive(Debug, Clone, Serialize)]
pub struct RenderFrame {
    pub index: usize,
    pub attribute: String,
    pub symbols: Vec<SymbolLayer>,
}

/// Lat/lon box the frontend fits the viewport to after the initial render.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    pub fn of(places: &[Place]) -> Option<Self> {
        let points: MultiPoint<f64> =
            MultiPoint::from(places.iter().map(|p| p.location).collect::<Vec<_>>());
        let rect = points.bounding_rect()?;
        Some(Self {
            south: rect.min().y,
            west: rect.min().x,
            north: rect.max().y,
            east: rect.max().x,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn place_with(props: serde_json::Value) -> Place {
        let Value::Object(properties) = props else {
            panic!("props must be a JSON object");
        };
        Place {
            name: "Testville".to_string(),
            location: Point::new(-98.0, 39.0),
            properties,
        }
    }

    #[test]
    fn numeric_value_coerces_numbers_and_strings() {
        let place = place_with(json!({"2015": 37, "2016": "41", "2017": "N/A", "note": true}));
        assert_eq!(place.numeric_value("2015"), Some(37.0));
        assert_eq!(place.numeric_value("2016"), Some(41.0));
        assert_eq!(place.numeric_value("2017"), None);
        assert_eq!(place.numeric_value("note"), None);
        assert_eq!(place.numeric_value("2099"), None);
    }

    #[test]
    fn bounds_cover_all_places() {
        let mut a = place_with(json!({}));
        a.location = Point::new(-120.0, 34.0);
        let mut b = place_with(json!({}));
        b.location = Point::new(-71.0, 42.5);

        let bounds = GeoBounds::of(&[a, b]).unwrap();
        assert_eq!(bounds.west, -120.0);
        assert_eq!(bounds.east, -71.0);
        assert_eq!(bounds.south, 34.0);
        assert_eq!(bounds.north, 42.5);
    }

    #[test]
    fn bounds_of_empty_set_is_none() {
        assert!(GeoBounds::of(&[]).is_none());
    }
}
