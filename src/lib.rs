#![doc = include_str!("../docs/osmpoi.md")]

pub mod error;
pub mod extract;
pub mod osm;
pub mod poi;

pub use error::ExtractError;
pub use extract::Extractor;
pub use poi::document::{DocumentMapper, GeoPoint, PoiDocument};
pub use poi::filter::{FilterTag, PoiFilter, PoiFilters};
