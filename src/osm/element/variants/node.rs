//! Describes a simplification of an `osm::Node`, stripping the
//! changelog metadata and keeping the position and tags needed for
//! point-of-interest mapping.

use geo::{Point, point};

use super::common::{Interner, Taggable, Tags};
use crate::error::ExtractError;
use crate::osm::model;
use crate::osm::model::PrimitiveBlock;

#[derive(Debug, Clone)]
pub struct Node {
    id: i64,
    pub position: Point,
    tags: Tags,
}

impl Node {
    /// Constructs a `Node` from a given position and `id`.
    pub fn new(id: i64, position: Point, tags: Tags) -> Self {
        Node { id, position, tags }
    }

    /// Returns the identifier for the node
    pub fn id(&self) -> i64 {
        self.id
    }

    #[inline]
    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.position.y()
    }

    #[inline]
    pub fn lon(&self) -> f64 {
        self.position.x()
    }

    /// Extracts every node of an `osm::DenseNodes` group.
    ///
    /// Ids, latitudes and longitudes are delta-coded against the
    /// previous entry; the three accumulators reset at the start of
    /// each group. Tag key/value string indices share one array,
    /// delimited per node by a `0` entry.
    #[inline]
    pub(crate) fn from_dense(
        dense: &model::DenseNodes,
        block: &PrimitiveBlock,
        interner: &mut Interner,
    ) -> Result<Vec<Self>, ExtractError> {
        let mut nodes = Vec::with_capacity(dense.id.len());
        let mut keys_vals = dense.keys_vals.iter().copied();

        let (mut id, mut lat, mut lon) = (0_i64, 0_i64, 0_i64);
        for ((delta_id, delta_lat), delta_lon) in
            dense.id.iter().zip(dense.lat.iter()).zip(dense.lon.iter())
        {
            id += delta_id;
            lat += delta_lat;
            lon += delta_lon;

            let mut indices: Vec<(u32, u32)> = Vec::new();
            while let Some(key) = keys_vals.next() {
                if key == 0 {
                    break;
                }

                let value = keys_vals
                    .next()
                    .ok_or_else(|| prost::DecodeError::new("dangling dense-node tag key"))?;
                indices.push((key as u32, value as u32));
            }

            let tags = Tags::from_block(
                indices.iter().map(|(k, v)| (k, v)),
                block,
                interner,
            )?;

            nodes.push(Node::new(id, coordinate(block, lat, lon), tags));
        }

        Ok(nodes)
    }

    #[inline]
    pub(crate) fn from_raw(
        node: &model::Node,
        block: &PrimitiveBlock,
        interner: &mut Interner,
    ) -> Result<Self, ExtractError> {
        Ok(Node::new(
            node.id,
            coordinate(block, node.lat, node.lon),
            node.tags(block, interner)?,
        ))
    }
}

impl Taggable for model::Node {
    fn indices(&self) -> impl Iterator<Item = (&u32, &u32)> {
        self.keys.iter().zip(self.vals.iter())
    }
}

/// Converts block-granular integer coordinates to degrees:
/// `1e-9 * (offset + granularity * raw)`, per the format definition.
#[inline]
fn coordinate(block: &PrimitiveBlock, lat: i64, lon: i64) -> Point {
    // Default scaling factor: https://wiki.openstreetmap.org/wiki/PBF_Format
    let granularity = block.granularity.unwrap_or(100) as i64;
    let lat_offset = block.lat_offset.unwrap_or(0);
    let lon_offset = block.lon_offset.unwrap_or(0);

    point! {
        x: 1e-9 * (lon_offset + granularity * lon) as f64,
        y: 1e-9 * (lat_offset + granularity * lat) as f64,
    }
}
