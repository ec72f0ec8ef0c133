//! Iterates over `BlockItem`s in the file

use std::path::PathBuf;

use crate::error::ExtractError;
use crate::osm::blob::iterator::BlobIterator;
use crate::osm::block::item::BlockItem;

pub struct BlockIterator {
    blobs: BlobIterator,
}

impl BlockIterator {
    #[inline]
    pub fn new(path: PathBuf) -> Result<BlockIterator, ExtractError> {
        let blobs = BlobIterator::new(path)?;
        Ok(BlockIterator { blobs })
    }
}

impl Iterator for BlockIterator {
    type Item = Result<BlockItem, ExtractError>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.blobs.next()? {
                Ok(blob) => match BlockItem::from_blob_item(&blob) {
                    Ok(Some(block)) => return Some(Ok(block)),
                    Ok(None) => continue,
                    Err(err) => return Some(Err(err)),
                },
                Err(err) => return Some(Err(err)),
            }
        }
    }
}
