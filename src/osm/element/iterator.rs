//! Iterator over all primitive entities in the structure,
//! ignoring header blocks.
//!
//! Each extraction pass constructs a fresh iterator with a fixed
//! [`DecodeKinds`] configuration, rather than toggling flags on a
//! shared parser.

use std::collections::VecDeque;
use std::path::PathBuf;

use bitflags::bitflags;

use crate::error::ExtractError;
use crate::osm::block::item::BlockItem;
use crate::osm::block::iterator::BlockIterator;
use crate::osm::element::item::{Element, ProcessedElement};
use crate::osm::element::variants::common::Interner;
use crate::osm::model::PrimitiveBlock;

bitflags! {
    /// The primitive kinds a pass decodes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DecodeKinds: u8 {
        const NODES = 1 << 0;
        const WAYS = 1 << 1;
        const RELATIONS = 1 << 2;
    }
}

pub struct ElementIterator {
    blocks: BlockIterator,
    buffer: VecDeque<ProcessedElement>,
    kinds: DecodeKinds,
    interner: Interner,
    failed: bool,
}

impl ElementIterator {
    pub fn new(
        path: impl Into<PathBuf>,
        kinds: DecodeKinds,
    ) -> Result<ElementIterator, ExtractError> {
        Ok(ElementIterator {
            blocks: BlockIterator::new(path.into())?,
            buffer: VecDeque::new(),
            kinds,
            interner: Interner::default(),
            failed: false,
        })
    }

    #[inline]
    fn decode_block(&mut self, block: &PrimitiveBlock) -> Result<(), ExtractError> {
        for group in &block.primitivegroup {
            for element in Element::from_group(group, self.kinds) {
                self.buffer
                    .extend(ProcessedElement::from_raw(element, block, &mut self.interner)?);
            }
        }

        Ok(())
    }
}

impl Iterator for ElementIterator {
    type Item = Result<ProcessedElement, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            if let Some(element) = self.buffer.pop_front() {
                return Some(Ok(element));
            }

            match self.blocks.next()? {
                // Header blocks carry no primitives; feature validation
                // already happened on decode.
                Ok(BlockItem::HeaderBlock(_)) => continue,
                Ok(BlockItem::PrimitiveBlock(block)) => {
                    if let Err(err) = self.decode_block(&block) {
                        self.failed = true;
                        return Some(Err(err));
                    }
                }
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err));
                }
            }
        }
    }
}
