//! Configured point-of-interest filters.
//!
//! A filter pairs a tag key with the tag values that mark a primitive
//! as a point of interest, each carrying a priority used for
//! popularity boosting. Filters are external input, immutable for the
//! duration of one extraction run.

use itertools::Itertools;

use crate::osm::element::variants::common::{TagString, Tags};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterTag {
    pub name: String,
    pub priority: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoiFilter {
    pub key: String,
    pub tags: Vec<FilterTag>,
}

impl PoiFilter {
    pub fn new(key: impl Into<String>, tags: Vec<FilterTag>) -> Self {
        PoiFilter {
            key: key.into(),
            tags,
        }
    }

    /// A filter with a single eligible tag value.
    pub fn single(key: impl Into<String>, name: impl Into<String>, priority: i64) -> Self {
        PoiFilter::new(
            key,
            vec![FilterTag {
                name: name.into(),
                priority,
            }],
        )
    }

    fn tag_with_name(&self, name: &str) -> Option<&FilterTag> {
        self.tags.iter().find(|tag| tag.name == name)
    }
}

/// An ordered set of [`PoiFilter`]s.
#[derive(Clone, Debug, Default)]
pub struct PoiFilters(Vec<PoiFilter>);

impl PoiFilters {
    pub fn new(filters: Vec<PoiFilter>) -> Self {
        PoiFilters(filters)
    }

    /// The structural filter: a primitive qualifies when it is named
    /// and some tag pair matches a configured filter key with a value
    /// equal to one of that filter's tag names.
    ///
    /// An empty filter set matches nothing.
    pub fn matches(&self, tags: &Tags) -> bool {
        if !tags.has(TagString::NAME) {
            return false;
        }

        tags.iter_sorted().any(|(key, value)| {
            self.0
                .iter()
                .any(|filter| filter.key == key && filter.tag_with_name(value).is_some())
        })
    }

    /// The highest priority among filters matched by the primitive's
    /// tags (the `name` tag excluded), defaulting to 1.
    ///
    /// The default also covers primitives that never passed
    /// [`PoiFilters::matches`]; callers are not required to pre-filter.
    pub fn boost(&self, tags: &Tags) -> i64 {
        tags.iter_sorted()
            .filter(|(key, _)| *key != TagString::NAME)
            .filter_map(|(key, value)| {
                self.0
                    .iter()
                    .filter(|filter| filter.key == key)
                    .filter_map(|filter| filter.tag_with_name(value))
                    .map(|tag| tag.priority)
                    .max()
            })
            .max()
            .unwrap_or(1)
    }

    /// The matched filter tag names, deduplicated, in deterministic
    /// order. These become the document's category list.
    pub fn categories(&self, tags: &Tags) -> Vec<String> {
        tags.iter_sorted()
            .filter(|(key, _)| *key != TagString::NAME)
            .filter(|(key, value)| {
                self.0
                    .iter()
                    .any(|filter| filter.key == *key && filter.tag_with_name(value).is_some())
            })
            .map(|(_, value)| value.to_string())
            .dedup()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The built-in filter table. Production runs usually fetch the
    /// table from a configuration service instead.
    pub fn defaults() -> Self {
        let flat = [
            ("amenity", "cinema"),
            ("amenity", "clinic"),
            ("amenity", "college"),
            ("amenity", "doctors"),
            ("amenity", "embassy"),
            ("amenity", "exhibition_center"),
            ("amenity", "golf_course"),
            ("amenity", "hospital"),
            ("amenity", "kindergarten"),
            ("amenity", "library"),
            ("amenity", "nursing_home"),
            ("amenity", "place_of_worship"),
            ("amenity", "prison"),
            ("amenity", "school"),
            ("amenity", "theatre"),
            ("amenity", "university"),
            ("landuse", "cemetery"),
            ("leisure", "park"),
            ("leisure", "sports_centre"),
            ("leisure", "stadium"),
            ("office", "government"),
            ("shop", "mall"),
            ("social_facility", "nursing_home"),
            ("tourism", "event"),
            ("tourism", "museum"),
        ];

        PoiFilters(
            flat.into_iter()
                .into_group_map_by(|(key, _)| *key)
                .into_iter()
                .sorted_by_key(|(key, _)| *key)
                .map(|(key, tags)| {
                    PoiFilter::new(
                        key,
                        tags.into_iter()
                            .map(|(_, name)| FilterTag {
                                name: name.to_string(),
                                priority: 1,
                            })
                            .collect(),
                    )
                })
                .collect(),
        )
    }
}

impl From<Vec<PoiFilter>> for PoiFilters {
    fn from(filters: Vec<PoiFilter>) -> Self {
        PoiFilters(filters)
    }
}
