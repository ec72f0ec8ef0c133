//! The file blob iterator
//!
//! Reads the extract strictly front-to-back, holding a single blob in
//! memory at a time. The three-pass extractor re-creates this iterator
//! for every pass, so the file itself is never buffered whole.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;

use log::trace;
use prost::Message;

use crate::error::ExtractError;
use crate::osm::blob::item::BlobItem;
use crate::osm::model::BlobHeader;

const HEADER_LEN_SIZE: usize = 4;

// Size bounds from the PBF format specification.
const MAX_HEADER_SIZE: usize = 64 * 1024;
const MAX_BLOB_SIZE: usize = 32 * 1024 * 1024;

pub struct BlobIterator {
    reader: BufReader<File>,
    pub(crate) index: u64,
    failed: bool,
}

impl BlobIterator {
    pub fn new(path: PathBuf) -> Result<BlobIterator, ExtractError> {
        let file = File::open(path)?;

        Ok(BlobIterator {
            reader: BufReader::new(file),
            index: 0,
            failed: false,
        })
    }

    /// Reads the next length-prefixed frame, or `None` on a clean
    /// end-of-file at a frame boundary.
    fn read_frame(&mut self) -> Result<Option<BlobItem>, ExtractError> {
        let mut header_len_buffer = [0_u8; HEADER_LEN_SIZE];
        match read_fully(&mut self.reader, &mut header_len_buffer)? {
            Filled::Empty => return Ok(None),
            Filled::Partial => return Err(ExtractError::Truncated),
            Filled::Complete => {}
        }

        // Translate to i32 (Big Endian)
        let blob_header_length = i32::from_be_bytes(header_len_buffer) as usize;
        if blob_header_length > MAX_HEADER_SIZE {
            return Err(ExtractError::OversizedBlob(blob_header_length));
        }

        let mut blob_header_buffer = vec![0_u8; blob_header_length];
        if read_fully(&mut self.reader, &mut blob_header_buffer)? != Filled::Complete {
            return Err(ExtractError::Truncated);
        }

        let header = BlobHeader::decode(blob_header_buffer.as_slice())?;
        let datasize = header.datasize as usize;
        if header.datasize < 0 || datasize > MAX_BLOB_SIZE {
            return Err(ExtractError::OversizedBlob(datasize));
        }

        let mut data = vec![0_u8; datasize];
        if read_fully(&mut self.reader, &mut data)? != Filled::Complete {
            return Err(ExtractError::Truncated);
        }

        self.index += 1;
        trace!("Read blob {}: {} bytes", self.index, datasize);

        Ok(Some(BlobItem::new(header, data)))
    }
}

impl Iterator for BlobIterator {
    type Item = Result<BlobItem, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match self.read_frame() {
            Ok(blob) => blob.map(Ok),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

#[derive(PartialEq, Eq)]
enum Filled {
    Complete,
    Partial,
    Empty,
}

fn read_fully(reader: &mut impl Read, buffer: &mut [u8]) -> Result<Filled, ExtractError> {
    let mut total = 0;
    while total < buffer.len() {
        match reader.read(&mut buffer[total..])? {
            0 if total == 0 => return Ok(Filled::Empty),
            0 => return Ok(Filled::Partial),
            n => total += n,
        }
    }

    Ok(Filled::Complete)
}
