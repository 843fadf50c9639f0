use crate::error::DataError;
use crate::types::{Place, SymbolLayer};

// Flannery appearance compensation. The exponent corrects for how readers
// underestimate area differences between circles; both constants are part of
// the visual contract and are not configurable.
pub const FLANNERY_RATIO: f64 = 1.0083;
pub const FLANNERY_EXPONENT: f64 = 0.5715;

/// Converts attribute values to symbol radii against the dataset minimum.
#[derive(Debug, Clone, Copy)]
pub struct SymbolScaling {
    min_value: f64,
    base_radius: f64,
}

impl SymbolScaling {
    /// The minimum is the ratio denominator for every symbol at every year,
    /// so it must be finite and strictly positive. Checked here, once,
    /// before anything renders.
    pub fn new(min_value: f64, base_radius: f64) -> Result<Self, DataError> {
        if !min_value.is_finite() || min_value <= 0.0 {
            return Err(DataError::InvalidMinimum(min_value));
        }
        if !base_radius.is_finite() || base_radius <= 0.0 {
            return Err(DataError::InvalidBaseRadius(base_radius));
        }
        Ok(Self {
            min_value,
            base_radius,
        })
    }

    pub fn min_value(&self) -> f64 {
        self.min_value
    }

    pub fn radius(&self, value: f64) -> f64 {
        FLANNERY_RATIO * (value / self.min_value).powf(FLANNERY_EXPONENT) * self.base_radius
    }
}

/// Popup body for one place at one year.
pub fn popup_content(name: &str, value_label: &str, attribute: &str, value: Option<f64>) -> String {
    let value_line = match value {
        Some(v) => format_value(v),
        None => "no data".to_string(),
    };
    format!(
        "<p><b>{}</b></p><p><b>{} {}:</b> {}</p>",
        name, value_label, attribute, value_line
    )
}

fn format_value(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        v.to_string()
    }
}

/// Initial symbol set for the starting attribute. One symbol per place, kept
/// index-aligned with the place list for the life of the session.
pub fn build_symbols(
    places: &[Place],
    attribute: &str,
    scaling: &SymbolScaling,
    value_label: &str,
) -> Vec<SymbolLayer> {
    places
        .iter()
        .map(|place| {
            let value = place.numeric_value(attribute);
            SymbolLayer {
                name: place.name.clone(),
                lat: place.location.y(),
                lon: place.location.x(),
                radius: value.map(|v| scaling.radius(v)),
                popup: popup_content(&place.name, value_label, attribute, value),
                popup_open: false,
            }
        })
        .collect()
}

/// In-place radius and popup refresh for a new attribute. Popup content is
/// replaced even while the popup is open, so an open popup shows the new
/// year without being closed and reopened.
pub fn update_symbols(
    symbols: &mut [SymbolLayer],
    places: &[Place],
    attribute: &str,
    scaling: &SymbolScaling,
    value_label: &str,
) {
    for (symbol, place) in symbols.iter_mut().zip(places) {
        let value = place.numeric_value(attribute);
        symbol.radius = value.map(|v| scaling.radius(v));
        symbol.popup = popup_content(&place.name, value_label, attribute, value);
    }
}
