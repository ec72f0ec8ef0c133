//! Block decoding: blob payloads into header and primitive blocks

pub mod item;
pub mod iterator;

#[doc(inline)]
pub use item::BlockItem;
#[doc(inline)]
pub use iterator::BlockIterator;
