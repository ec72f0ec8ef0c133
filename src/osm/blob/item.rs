//! Describes the `BlobItem`, one framed payload of the extract

use crate::osm::model::BlobHeader;

pub struct BlobItem {
    pub header: BlobHeader,
    pub(crate) data: Vec<u8>,
}

impl BlobItem {
    #[inline]
    pub(crate) fn new(header: BlobHeader, data: Vec<u8>) -> BlobItem {
        BlobItem { header, data }
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
