//! A block item, used to decode a `BlobItem` into a `BlockItem`,
//! providing distinction for header and primitive blocks.

use bytes::Buf;
use flate2::read::ZlibDecoder;
use log::{trace, warn};
use prost::Message;
use std::io::Read;

use crate::error::ExtractError;
use crate::osm::blob::item::BlobItem;
use crate::osm::model::{Blob, HeaderBlock, PrimitiveBlock, blob::Data};

/// The two capability flags of the base schema. Any other required
/// feature means the file cannot be decoded faithfully.
const KNOWN_FEATURES: [&str; 2] = ["OsmSchema-V0.6", "DenseNodes"];

pub enum BlockItem {
    HeaderBlock(HeaderBlock),
    PrimitiveBlock(PrimitiveBlock),
}

impl BlockItem {
    /// Decodes a blob payload. Returns `Ok(None)` for blob types the
    /// format allows parsers to skip.
    #[inline]
    pub(crate) fn from_blob_item(blob: &BlobItem) -> Result<Option<Self>, ExtractError> {
        let raw = Blob::decode(blob.data())?;

        // Convert raw into actual. Handles ZLIB encoding.
        let data = BlockItem::from_blob(raw)?;
        BlockItem::from_data(data.as_slice(), blob)
    }

    #[inline]
    fn from_blob(blob: Blob) -> Result<Vec<u8>, ExtractError> {
        match blob.data {
            Some(Data::Raw(data)) => Ok(data.to_vec()),
            Some(Data::ZlibData(data)) => {
                BlockItem::zlib_decode(data, blob.raw_size.unwrap_or(0) as usize)
            }
            other => {
                warn!("Compression {other:?} not supported.");
                Err(ExtractError::UnsupportedCompression)
            }
        }
    }

    #[inline]
    fn from_data(data: &[u8], blob: &BlobItem) -> Result<Option<Self>, ExtractError> {
        match blob.header.r#type.as_str() {
            "OSMData" => Ok(Some(BlockItem::PrimitiveBlock(PrimitiveBlock::decode(
                data,
            )?))),
            "OSMHeader" => {
                let header = HeaderBlock::decode(data)?;
                BlockItem::validate_features(&header)?;
                Ok(Some(BlockItem::HeaderBlock(header)))
            }
            other => {
                trace!("Skipping unrecognized block type: {other}");
                Ok(None)
            }
        }
    }

    #[inline]
    fn zlib_decode(data: prost::bytes::Bytes, raw_size: usize) -> Result<Vec<u8>, ExtractError> {
        let mut decoded = vec![0_u8; raw_size];
        ZlibDecoder::new(data.reader()).read_exact(&mut decoded)?;

        Ok(decoded)
    }

    fn validate_features(header: &HeaderBlock) -> Result<(), ExtractError> {
        match header
            .required_features
            .iter()
            .find(|feature| !KNOWN_FEATURES.contains(&feature.as_str()))
        {
            Some(feature) => Err(ExtractError::UnknownRequiredFeature(feature.clone())),
            None => Ok(()),
        }
    }

    pub fn r#type(&self) -> &str {
        match self {
            BlockItem::HeaderBlock(_) => "HeaderBlock",
            BlockItem::PrimitiveBlock(_) => "PrimitiveBlock",
        }
    }
}
