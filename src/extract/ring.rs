//! Ring reconstruction: assembles the unordered way fragments of one
//! multipolygon boundary role into closed rings.
//!
//! Fragments live in a plain arena with an endpoint index over it, so
//! the join never builds pointer-linked fragment graphs.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::osm::element::variants::Way;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RingError {
    #[error("boundary node {0} is shared by {1} fragment endpoints, expected exactly 2")]
    UnbalancedEndpoint(i64, usize),

    #[error("boundary fragments do not close into a ring")]
    OpenBoundary,

    #[error("boundary contains a fragment without node references")]
    EmptyFragment,
}

/// An ordered set of way fragments hypothesized to form one closed
/// polygon boundary.
#[derive(Clone, Debug, PartialEq)]
pub struct Ring {
    ways: Vec<Way>,
}

impl Ring {
    pub fn new(ways: Vec<Way>) -> Self {
        Ring { ways }
    }

    pub fn ways(&self) -> &[Way] {
        &self.ways
    }

    /// A ring is closed when every fragment endpoint is incident to
    /// some other fragment's endpoint (a single fragment closes on
    /// itself).
    pub fn is_closed(&self) -> bool {
        match self.ways.as_slice() {
            [] => false,
            [only] => only.is_closed(),
            ways => ways.iter().enumerate().all(|(i, way)| {
                [way.start(), way.end()].into_iter().flatten().all(|endpoint| {
                    ways.iter().enumerate().any(|(j, other)| {
                        i != j
                            && (other.start() == Some(endpoint) || other.end() == Some(endpoint))
                    })
                })
            }),
        }
    }

    /// Materializes the ring as one continuous node-reference loop.
    ///
    /// Starting from the first fragment, repeatedly appends an
    /// unconsumed fragment that continues from the current tail,
    /// reversed when joined end-to-end; the duplicated joint node is
    /// dropped at each join. The resulting sequence starts and ends on
    /// the same node.
    pub fn node_refs(&self) -> Result<Vec<i64>, RingError> {
        let first = self.ways.first().ok_or(RingError::OpenBoundary)?;
        if first.refs().is_empty() {
            return Err(RingError::EmptyFragment);
        }

        let mut refs: Vec<i64> = first.refs().to_vec();
        let mut used = vec![false; self.ways.len()];
        used[0] = true;

        for _ in 1..self.ways.len() {
            let tail = *refs.last().ok_or(RingError::EmptyFragment)?;

            let next = (0..self.ways.len())
                .filter(|&index| !used[index])
                .find(|&index| {
                    self.ways[index].start() == Some(tail) || self.ways[index].end() == Some(tail)
                })
                .ok_or(RingError::OpenBoundary)?;
            used[next] = true;

            let way = &self.ways[next];
            if way.start() == Some(tail) {
                refs.extend(way.refs().iter().skip(1));
            } else {
                refs.extend(way.refs().iter().rev().skip(1));
            }
        }

        if refs.first() != refs.last() {
            return Err(RingError::OpenBoundary);
        }

        Ok(refs)
    }
}

/// Partitions `ways` into closed rings.
///
/// Already-closed ways pass through as single-fragment rings. The
/// remaining open fragments must form a set of disjoint cycles: every
/// endpoint they touch has to be shared by exactly two fragment
/// endpoints, and each connected component has to close on itself.
/// Anything else makes the whole set unresolvable; no partial result
/// is returned.
pub fn construct_rings(ways: &[Way]) -> Result<Vec<Ring>, RingError> {
    if ways.is_empty() {
        return Ok(Vec::new());
    }

    let mut rings = Vec::new();
    let mut open: Vec<(&Way, i64, i64)> = Vec::new();
    for way in ways {
        let (Some(start), Some(end)) = (way.start(), way.end()) else {
            return Err(RingError::EmptyFragment);
        };

        if start == end {
            rings.push(Ring::new(vec![way.clone()]));
        } else {
            open.push((way, start, end));
        }
    }

    if open.is_empty() {
        return Ok(rings);
    }

    // endpoint node -> indices of incident open fragments
    let mut by_endpoint: FxHashMap<i64, Vec<usize>> = FxHashMap::default();
    for (index, (_, start, end)) in open.iter().enumerate() {
        by_endpoint.entry(*start).or_default().push(index);
        by_endpoint.entry(*end).or_default().push(index);
    }

    if let Some((&node, incident)) = by_endpoint.iter().find(|(_, incident)| incident.len() != 2) {
        return Err(RingError::UnbalancedEndpoint(node, incident.len()));
    }

    // Walk each connected component; degree two everywhere means every
    // component is either a cycle or not closable at all.
    let mut visited = vec![false; open.len()];
    for first in 0..open.len() {
        if visited[first] {
            continue;
        }
        visited[first] = true;

        let mut component = vec![first];
        let (_, closing, mut cursor) = open[first];

        while cursor != closing {
            let Some(&next) = by_endpoint[&cursor].iter().find(|&&index| !visited[index])
            else {
                return Err(RingError::OpenBoundary);
            };

            visited[next] = true;
            component.push(next);
            let (_, start, end) = open[next];
            cursor = if start == cursor { end } else { start };
        }

        rings.push(Ring::new(
            component
                .into_iter()
                .map(|index| open[index].0.clone())
                .collect(),
        ));
    }

    Ok(rings)
}
