//! Describes the minimal `Way` structure: an identifier, the ordered
//! node references and the tag mapping.

use super::common::{Interner, Taggable, Tags};
use crate::error::ExtractError;
use crate::osm::model;
use crate::osm::model::PrimitiveBlock;

#[derive(Clone, Debug, PartialEq)]
pub struct Way {
    id: i64,
    refs: Vec<i64>,
    tags: Tags,
}

impl Way {
    pub fn new(id: i64, refs: Vec<i64>, tags: Tags) -> Self {
        Way { id, refs, tags }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    #[inline]
    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    #[inline]
    pub fn refs(&self) -> &[i64] {
        &self.refs
    }

    pub fn start(&self) -> Option<i64> {
        self.refs.first().copied()
    }

    pub fn end(&self) -> Option<i64> {
        self.refs.last().copied()
    }

    /// A way is closed iff its first and last node references are equal.
    pub fn is_closed(&self) -> bool {
        !self.refs.is_empty() && self.start() == self.end()
    }

    #[inline]
    pub(crate) fn from_raw(
        way: &model::Way,
        block: &PrimitiveBlock,
        interner: &mut Interner,
    ) -> Result<Self, ExtractError> {
        // Node references are delta-coded against the previous one.
        let mut refs = Vec::with_capacity(way.refs.len());
        let mut previous = 0_i64;
        for delta in &way.refs {
            previous += delta;
            refs.push(previous);
        }

        Ok(Way::new(way.id, refs, way.tags(block, interner)?))
    }
}

impl Taggable for model::Way {
    fn indices(&self) -> impl Iterator<Item = (&u32, &u32)> {
        self.keys.iter().zip(self.vals.iter())
    }
}
