//! Element iterator and item definitions

pub mod item;
pub mod iterator;

#[doc(hidden)]
pub mod variants;

#[doc(inline)]
pub use item::Element;
#[doc(inline)]
pub use item::ProcessedElement;
#[doc(inline)]
pub use iterator::ElementIterator;

pub use variants::common::*;
pub use variants::{Node, Relation, Way};
