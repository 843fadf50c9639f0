use crate::error::DataError;
use crate::types::Place;
use rayon::prelude::*;
use tracing::info;

/// Year attributes discovered from the first feature's property names.
///
/// All features are assumed to share one schema, so only the first is
/// inspected. Keys must be exactly four decimal digits, which drops "name"
/// and any other non-temporal field. Returned ascending by numeric value.
pub fn discover_attributes(places: &[Place]) -> Vec<String> {
    let mut attributes: Vec<String> = match places.first() {
        Some(first) => first
            .properties
            .keys()
            .filter(|name| is_year_key(name))
            .cloned()
            .collect(),
        None => Vec::new(),
    };

    // Numeric order, not map insertion order
    attributes.sort_by_key(|a| a.parse::<u16>().unwrap_or(0));

    info!("Discovered year attributes: {:?}", attributes);
    attributes
}

fn is_year_key(name: &str) -> bool {
    name.len() == 4 && name.bytes().all(|b| b.is_ascii_digit())
}

/// Minimum over every (place, attribute) pair. This single value is the
/// denominator of the scaling law for every symbol at every year, which is
/// what keeps radii comparable across years and across places.
///
/// Values that fail numeric coercion are skipped. If nothing coerces, there
/// is no meaningful minimum and startup must not continue.
pub fn global_minimum(places: &[Place], attributes: &[String]) -> Result<f64, DataError> {
    let min = places
        .par_iter()
        .flat_map_iter(|place| {
            attributes
                .iter()
                .filter_map(|attribute| place.numeric_value(attribute))
        })
        .reduce(|| f64::INFINITY, f64::min);

    if min.is_finite() {
        Ok(min)
    } else {
        Err(DataError::NoNumericValues {
            features: places.len(),
            attributes: attributes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;
    use serde_json::{json, Value};

    fn place(name: &str, props: Value) -> Place {
        let Value::Object(properties) = props else {
            panic!("props must be a JSON object");
        };
        Place {
            name: name.to_string(),
            location: Point::new(0.0, 0.0),
            properties,
        }
    }

    #[test]
    fn discovery_keeps_only_four_digit_years_in_order() {
        let places = vec![place(
            "Phoenix",
            json!({"name": "Phoenix", "2021": 5, "2015": 1, "note": "x", "199": 2, "20155": 3}),
        )];

        assert_eq!(discover_attributes(&places), vec!["2015", "2021"]);
    }

    #[test]
    fn discovery_uses_first_feature_only() {
        let places = vec![
            place("A", json!({"name": "A", "2015": 1})),
            place("B", json!({"name": "B", "2015": 1, "2016": 2})),
        ];

        assert_eq!(discover_attributes(&places), vec!["2015"]);
    }

    #[test]
    fn discovery_of_empty_collection_is_empty() {
        assert!(discover_attributes(&[]).is_empty());
    }

    #[test]
    fn minimum_skips_values_that_do_not_coerce() {
        let attributes = vec!["2015".to_string(), "2016".to_string()];
        let places = vec![
            place("A", json!({"2015": 10, "2016": "not a number"})),
            place("B", json!({"2015": 5, "2016": 12})),
        ];

        assert_eq!(global_minimum(&places, &attributes).unwrap(), 5.0);
    }

    #[test]
    fn minimum_without_any_numeric_value_is_an_error() {
        let attributes = vec!["2015".to_string()];
        let places = vec![place("A", json!({"2015": "N/A"}))];

        let err = global_minimum(&places, &attributes).unwrap_err();
        assert!(matches!(err, DataError::NoNumericValues { features: 1, attributes: 1 }));
    }
}
