//! POI eligibility filters and geocoder document mapping

pub mod document;
pub mod filter;

#[doc(inline)]
pub use document::{DocumentMapper, GeoPoint, PoiDocument};
#[doc(inline)]
pub use filter::{FilterTag, PoiFilter, PoiFilters};
