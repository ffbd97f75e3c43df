use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

/// A mappable location. Identity is the slug; everything else is display or
/// filter data that never changes after load.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(alias = "Slug")]
    pub slug: String,
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(default, alias = "Description")]
    pub description: String,
    #[serde(alias = "Lat", deserialize_with = "coordinate")]
    pub lat: f64,
    #[serde(alias = "Lng", deserialize_with = "coordinate")]
    pub lng: f64,
    #[serde(alias = "Standard")]
    pub standard: String,
    #[serde(default, alias = "Tags", deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default, alias = "Badges", deserialize_with = "null_as_empty")]
    pub badges: Vec<String>,
    #[serde(default, alias = "Image")]
    pub image: bool,
    #[serde(default, alias = "Url")]
    pub url: Option<String>,
}

impl Location {
    /// Mapbox orders coordinates longitude first.
    pub fn lng_lat(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

// The sheet-backed server emits coordinates as strings; hand-written configs use numbers.
fn coordinate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    struct CoordinateVisitor;

    impl Visitor<'_> for CoordinateVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a finite coordinate as a number or numeric string")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            if v.is_finite() {
                Ok(v)
            } else {
                Err(E::custom("coordinate is not finite"))
            }
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            let parsed = v
                .trim()
                .parse::<f64>()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))?;
            self.visit_f64(parsed)
        }
    }

    deserializer.deserialize_any(CoordinateVisitor)
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
pub(crate) fn sample(slug: &str, standard: &str, tags: &[&str]) -> Location {
    Location {
        slug: slug.to_string(),
        name: slug.to_uppercase(),
        description: String::new(),
        lat: 39.8,
        lng: -98.5,
        standard: standard.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        badges: Vec::new(),
        image: false,
        url: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> serde_json::Result<Vec<Location>> {
        serde_json::from_str(json)
    }

    #[test]
    fn parses_server_field_names_with_string_coordinates() {
        let json = r#"[{
            "Name": "Acre Farm",
            "Slug": "acre-farm",
            "Url": "https://acre.example",
            "Description": "Grass-fed",
            "Lat": "44.5",
            "Lng": "-72.25",
            "Standard": "gold",
            "Badges": ["roc"],
            "Tags": ["beef", "dairy"],
            "Image": true
        }]"#;
        let locations = parse(json).unwrap();
        assert_eq!(locations.len(), 1);
        let loc = &locations[0];
        assert_eq!(loc.slug, "acre-farm");
        assert_eq!(loc.lat, 44.5);
        assert_eq!(loc.lng_lat(), [-72.25, 44.5]);
        assert_eq!(loc.tags, vec!["beef", "dairy"]);
        assert!(loc.image);
        assert_eq!(loc.url.as_deref(), Some("https://acre.example"));
    }

    #[test]
    fn null_lists_become_empty() {
        let json = r#"[{"slug":"a","name":"A","lat":1,"lng":2.5,"standard":"silver","tags":null,"badges":null}]"#;
        let locations = parse(json).unwrap();
        assert!(locations[0].tags.is_empty());
        assert!(locations[0].badges.is_empty());
        assert!(!locations[0].image);
    }

    #[test]
    fn rejects_non_numeric_coordinate() {
        let json = r#"[{"slug":"a","name":"A","lat":"north","lng":0,"standard":"gold"}]"#;
        assert!(parse(json).is_err());
    }

    #[test]
    fn rejects_infinite_coordinate_string() {
        let json = r#"[{"slug":"a","name":"A","lat":"inf","lng":0,"standard":"gold"}]"#;
        assert!(parse(json).is_err());
    }
}
