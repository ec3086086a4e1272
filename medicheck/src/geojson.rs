//! GeoJSON export of search results.
//!
//! Enable the `geojson` feature to use this module.
//!
//! ```ignore
//! use medicheck::geojson::to_feature_collection;
//!
//! let results = finder.find_nearby("02139", 10, 30_000).await?;
//! let collection = to_feature_collection(&results);
//! println!("{}", serde_json::to_string_pretty(&collection)?);
//! ```

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value as GeoJsonValue};

use crate::search::NearbyResults;

/// Convert search results into a `FeatureCollection`.
///
/// The origin comes first with `role: "origin"`; each hospital follows as a
/// Point with `role: "hospital"`, its 1-based `rank`, `name`, `formatted` and
/// `distance_miles`. Coordinates use GeoJSON `[longitude, latitude]` order.
pub fn to_feature_collection(results: &NearbyResults) -> FeatureCollection {
    let mut features = Vec::with_capacity(results.hospitals.len() + 1);

    let mut origin_props = JsonObject::new();
    origin_props.insert("role".to_string(), JsonValue::from("origin"));
    origin_props.insert(
        "formatted".to_string(),
        results
            .origin
            .formatted_address
            .clone()
            .map(JsonValue::from)
            .unwrap_or(JsonValue::Null),
    );
    features.push(point_feature(
        results.origin.longitude,
        results.origin.latitude,
        origin_props,
    ));

    for (index, hospital) in results.hospitals.iter().enumerate() {
        let mut props = JsonObject::new();
        props.insert("role".to_string(), JsonValue::from("hospital"));
        props.insert("rank".to_string(), JsonValue::from(index + 1));
        props.insert("name".to_string(), JsonValue::from(hospital.name.clone()));
        props.insert(
            "formatted".to_string(),
            hospital
                .formatted_address
                .clone()
                .map(JsonValue::from)
                .unwrap_or(JsonValue::Null),
        );
        props.insert(
            "distance_miles".to_string(),
            JsonValue::from(hospital.distance_miles),
        );
        features.push(point_feature(hospital.longitude, hospital.latitude, props));
    }

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn point_feature(lon: f64, lat: f64, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(GeoJsonValue::Point(vec![lon, lat]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}
