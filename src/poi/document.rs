//! Geocoder document model and the primitive-to-document mapper.

use std::collections::BTreeMap;
use std::iter;

use log::info;

use crate::osm::element::variants::common::{TagString, Tags};
use crate::poi::filter::PoiFilters;

const DEFAULT_SOURCE: &str = "osm";
const DEFAULT_LAYER: &str = "pointOfInterest";

/// Language recorded for the primary display name.
const DEFAULT_LANGUAGE: &str = "no";

/// A WGS84 point, degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        GeoPoint { lat, lon }
    }
}

/// One geocoder record. The on-disk encoding is owned by the consumer;
/// this is only the record shape.
#[derive(Clone, Debug, PartialEq)]
pub struct PoiDocument {
    pub id: String,
    pub layer: &'static str,
    pub source: &'static str,
    pub default_name: String,
    pub display_name: String,
    pub alternative_names: BTreeMap<String, String>,
    pub categories: Vec<String>,
    pub popularity: i64,
    pub center: GeoPoint,
}

/// Maps one qualifying primitive to (potentially) multiple documents,
/// one per distinct name, since the downstream index does not support
/// per-language aliases on a single record yet.
#[derive(Clone, Debug)]
pub struct DocumentMapper {
    filters: PoiFilters,
    popularity: i64,
    type_filter: Vec<String>,
}

impl DocumentMapper {
    pub fn new(filters: PoiFilters, popularity: i64, type_filter: Vec<String>) -> Self {
        let type_filter: Vec<String> = type_filter
            .into_iter()
            .filter(|entry| !entry.is_empty())
            .collect();

        if type_filter.is_empty() {
            info!("No presentation type filter configured");
        } else {
            info!("Presentation type filter set to: {type_filter:?}");
        }

        DocumentMapper {
            filters,
            popularity,
            type_filter,
        }
    }

    pub fn filters(&self) -> &PoiFilters {
        &self.filters
    }

    /// Produces one document per distinct name of the primitive, or
    /// nothing when the presentation filter rejects it.
    pub fn map(&self, entity_id: i64, tags: &Tags, centroid: GeoPoint) -> Vec<PoiDocument> {
        if !self.passes_type_filter(tags) {
            return Vec::new();
        }

        let Some(display_name) = tags.assumed_name() else {
            return Vec::new();
        };

        // Names keyed by language; the display name owns its language
        // key, so a `name:no` alternative collapses into it.
        let mut names: BTreeMap<String, String> = tags
            .alternative_names()
            .map(|(lang, value)| (lang.to_string(), value.to_string()))
            .collect();
        names.insert(DEFAULT_LANGUAGE.to_string(), display_name.to_string());

        let categories: Vec<String> = iter::once("poi".to_string())
            .chain(self.filters.categories(tags))
            .collect();
        let popularity = self.popularity * self.filters.boost(tags);

        iter::once(&names[DEFAULT_LANGUAGE])
            .chain(
                names
                    .iter()
                    .filter(|(lang, _)| *lang != DEFAULT_LANGUAGE)
                    .map(|(_, value)| value),
            )
            .enumerate()
            .map(|(index, name)| PoiDocument {
                id: document_id(index, entity_id),
                layer: DEFAULT_LAYER,
                source: DEFAULT_SOURCE,
                default_name: name.clone(),
                display_name: display_name.to_string(),
                alternative_names: names.clone(),
                categories: categories.clone(),
                popularity,
                center: centroid,
            })
            .collect()
    }

    /// The optional presentation filter: when configured, at least one
    /// non-name `key=value` pair must start with a configured prefix.
    fn passes_type_filter(&self, tags: &Tags) -> bool {
        if self.type_filter.is_empty() {
            return true;
        }

        let mut pairs = tags
            .iter_sorted()
            .filter(|(key, _)| *key != TagString::NAME)
            .map(|(key, value)| format!("{key}={value}"))
            .peekable();

        if pairs.peek().is_none() {
            return false;
        }

        pairs.any(|pair| self.type_filter.iter().any(|prefix| pair.starts_with(prefix)))
    }
}

fn document_id(name_index: usize, entity_id: i64) -> String {
    let suffix = match name_index {
        0 => String::new(),
        index => format!("-{index}"),
    };

    format!("{DEFAULT_SOURCE}:PlaceOfInterest:{entity_id}{suffix}")
}
