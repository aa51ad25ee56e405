use serde::Deserialize;
use serde_json::Value;

use crate::error::{BayWheelsError, Result};
use crate::types::Station;

const FEATURE_COLLECTION: &str = "FeatureCollection";
const NESTED_INVENTORY_FIELD: &str = "map_inventory_json";

/// `map_item_type` of a dock station feature; free-floating bikes use `2`.
pub const STATION_ITEM_TYPE: i64 = 1;

/// Parse a map inventory body into the stations it lists.
///
/// The GeoJSON may arrive directly or as a JSON string under
/// `map_inventory_json`. Bike features are skipped; every station feature
/// must convert cleanly or the whole call fails.
///
/// # Example
/// ```
/// use bay_wheels::parse::parse_stations;
///
/// let body = br#"{"type": "FeatureCollection", "features": [{
///     "type": "Feature",
///     "geometry": {"type": "Point", "coordinates": [-122.41, 37.77]},
///     "properties": {"map_item_type": 1, "station_id": "st-1", "num_ebikes_available": 2}
/// }]}"#;
/// let stations = parse_stations(body)?;
/// assert_eq!(stations[0].id, "st-1");
/// assert_eq!(stations[0].ebikes_available, 2);
/// # Ok::<(), bay_wheels::error::BayWheelsError>(())
/// ```
pub fn parse_stations(body: &[u8]) -> Result<Vec<Station>> {
    let outer: Value = serde_json::from_slice(body)?;
    let collection = unwrap_inventory(outer)?;

    match collection.get("type") {
        Some(Value::String(kind)) if kind == FEATURE_COLLECTION => {}
        Some(Value::String(kind)) => return Err(BayWheelsError::UnexpectedFormat(kind.clone())),
        Some(other) => return Err(BayWheelsError::UnexpectedFormat(other.to_string())),
        None => return Err(BayWheelsError::UnexpectedFormat("missing type".to_string())),
    }

    let features = match collection.get("features") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(features)) => features,
        Some(_) => {
            return Err(BayWheelsError::UnexpectedFormat(
                "features is not an array".to_string(),
            ))
        }
    };

    let stations = features
        .iter()
        .filter(|feature| map_item_type(feature) == Some(STATION_ITEM_TYPE))
        .map(station_from_feature)
        .collect::<Result<Vec<_>>>()?;
    tracing::debug!(
        features = features.len(),
        stations = stations.len(),
        "parsed map inventory"
    );
    Ok(stations)
}

fn unwrap_inventory(outer: Value) -> Result<Value> {
    let nested = match outer.get(NESTED_INVENTORY_FIELD) {
        None => None,
        Some(Value::String(encoded)) => Some(serde_json::from_str(encoded)?),
        Some(_) => {
            return Err(BayWheelsError::UnexpectedFormat(format!(
                "{NESTED_INVENTORY_FIELD} is not a string"
            )))
        }
    };
    Ok(nested.unwrap_or(outer))
}

fn map_item_type(feature: &Value) -> Option<i64> {
    feature
        .get("properties")?
        .get("map_item_type")?
        .as_i64()
}

#[derive(Debug, Deserialize)]
struct StationFeature {
    id: Option<Value>,
    properties: StationProperties,
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct StationProperties {
    station_id: Option<Value>,
    name: Option<String>,
    #[serde(alias = "ebikes_available")]
    num_ebikes_available: Option<u32>,
    #[serde(alias = "bikes_available")]
    num_bikes_available: Option<u32>,
    #[serde(alias = "docks_available")]
    num_docks_available: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Vec<f64>,
}

fn station_from_feature(feature: &Value) -> Result<Station> {
    let parsed = StationFeature::deserialize(feature)?;
    let id = parsed
        .properties
        .station_id
        .as_ref()
        .and_then(id_string)
        .or_else(|| parsed.id.as_ref().and_then(id_string))
        .ok_or_else(|| {
            BayWheelsError::UnexpectedFormat("station feature without id".to_string())
        })?;

    let (lon, lat) = match parsed.geometry.as_ref().map(|g| g.coordinates.as_slice()) {
        Some([lon, lat, ..]) => (*lon, *lat),
        _ => {
            return Err(BayWheelsError::UnexpectedFormat(format!(
                "station {id} has no coordinates"
            )))
        }
    };

    let props = parsed.properties;
    Ok(Station {
        id,
        name: props.name.filter(|name| !name.trim().is_empty()),
        ebikes_available: props.num_ebikes_available.unwrap_or(0),
        bikes_available: props.num_bikes_available.unwrap_or(0),
        docks_available: props.num_docks_available.unwrap_or(0),
        lat,
        lon,
    })
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(num) => Some(num.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn feature(item_type: i64, id: &str) -> Value {
        json!({
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [-122.4194, 37.7749]},
            "properties": {
                "map_item_type": item_type,
                "station_id": id,
                "name": format!("Station {id}"),
                "num_ebikes_available": 3,
                "num_bikes_available": 4,
                "num_docks_available": 5
            }
        })
    }

    fn collection() -> Value {
        json!({
            "type": "FeatureCollection",
            "features": [feature(1, "a"), feature(2, "bike-1"), feature(1, "b")]
        })
    }

    #[test]
    fn keeps_only_station_features() {
        let body = serde_json::to_vec(&collection()).unwrap();
        let stations = parse_stations(&body).unwrap();
        let ids: Vec<&str> = stations.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(
            stations[0],
            Station {
                id: "a".to_string(),
                name: Some("Station a".to_string()),
                ebikes_available: 3,
                bikes_available: 4,
                docks_available: 5,
                lat: 37.7749,
                lon: -122.4194,
            }
        );
    }

    #[test]
    fn nested_inventory_parses_like_direct_collection() {
        let direct = serde_json::to_vec(&collection()).unwrap();
        let nested = serde_json::to_vec(&json!({
            "map_inventory_json": collection().to_string()
        }))
        .unwrap();
        assert_eq!(parse_stations(&nested).unwrap(), parse_stations(&direct).unwrap());
    }

    #[test]
    fn wrong_type_is_reported() {
        let err = parse_stations(br#"{"type": "Point", "coordinates": [0, 0]}"#).unwrap_err();
        assert!(matches!(err, BayWheelsError::UnexpectedFormat(ref kind) if kind == "Point"));
        assert_eq!(err.to_string(), "Unexpected response format: Point");
    }

    #[test]
    fn malformed_outer_json_is_a_parse_error() {
        let err = parse_stations(b"{\"type\": ").unwrap_err();
        assert!(matches!(err, BayWheelsError::Parse(_)));
    }

    #[test]
    fn malformed_nested_json_is_a_parse_error() {
        let err = parse_stations(br#"{"map_inventory_json": "{\"type\": "}"#).unwrap_err();
        assert!(matches!(err, BayWheelsError::Parse(_)));
    }

    #[test]
    fn nested_field_must_be_a_string() {
        let err = parse_stations(br#"{"map_inventory_json": {"type": "FeatureCollection"}}"#)
            .unwrap_err();
        assert!(matches!(err, BayWheelsError::UnexpectedFormat(_)));
    }

    #[test]
    fn missing_features_yields_empty_list() {
        let stations = parse_stations(br#"{"type": "FeatureCollection"}"#).unwrap();
        assert!(stations.is_empty());
    }

    #[test]
    fn sparse_station_falls_back_to_feature_id_and_zero_counts() {
        let body = serde_json::to_vec(&json!({
            "type": "FeatureCollection",
            "features": [{
                "id": 42,
                "geometry": {"coordinates": [-122.0, 37.0]},
                "properties": {"map_item_type": 1, "num_docks_available": null}
            }]
        }))
        .unwrap();
        let stations = parse_stations(&body).unwrap();
        assert_eq!(stations[0].id, "42");
        assert_eq!(stations[0].name, None);
        assert_eq!(stations[0].docks_available, 0);
    }

    #[test]
    fn station_without_coordinates_is_an_error() {
        let body = serde_json::to_vec(&json!({
            "type": "FeatureCollection",
            "features": [{"properties": {"map_item_type": 1, "station_id": "x"}}]
        }))
        .unwrap();
        let err = parse_stations(&body).unwrap_err();
        assert!(err.to_string().contains("station x has no coordinates"));
    }

    #[test]
    fn negative_counts_are_rejected() {
        let body = serde_json::to_vec(&json!({
            "type": "FeatureCollection",
            "features": [{
                "geometry": {"coordinates": [0.0, 0.0]},
                "properties": {"map_item_type": 1, "station_id": "x", "num_bikes_available": -1}
            }]
        }))
        .unwrap();
        assert!(matches!(parse_stations(&body), Err(BayWheelsError::Parse(_))));
    }
}
