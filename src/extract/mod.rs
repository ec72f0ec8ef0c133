//! The three-pass extraction coordinator.
//!
//! Ways refer to nodes for coordinates, and multipolygon relations
//! refer to ways; a single pass would need the whole file in memory.
//! The coordinator instead decodes the extract three times in reverse
//! dependency order (relations, then ways, then nodes-and-ways),
//! keeping only the entities later passes were found to need.

pub mod geometry;
pub mod ring;

#[doc(hidden)]
pub mod test;

use std::path::Path;

use geo::Coord;
use log::{debug, info};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::ExtractError;
use crate::osm::element::item::ProcessedElement;
use crate::osm::element::iterator::{DecodeKinds, ElementIterator};
use crate::osm::element::variants::common::TagString;
use crate::osm::element::variants::{Node, Relation, Way};
use crate::osm::model::relation::MemberType;
use crate::poi::document::{DocumentMapper, GeoPoint, PoiDocument};
use crate::poi::filter::PoiFilters;

/// The ordered decode passes of one extraction run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Relations,
    Ways,
    NodesAndWays,
}

impl Phase {
    const ALL: [Phase; 3] = [Phase::Relations, Phase::Ways, Phase::NodesAndWays];

    fn kinds(self) -> DecodeKinds {
        match self {
            Phase::Relations => DecodeKinds::RELATIONS,
            Phase::Ways => DecodeKinds::WAYS,
            Phase::NodesAndWays => DecodeKinds::NODES | DecodeKinds::WAYS,
        }
    }
}

/// Working state of one run; created empty at run start and fully
/// consumed when relation processing completes.
#[derive(Default)]
struct RunState {
    node_refs_for_ways: FxHashSet<i64>,
    node_refs_for_relations: FxHashSet<i64>,
    way_refs_for_relations: FxHashSet<i64>,

    nodes_for_ways: FxHashMap<i64, Node>,
    nodes_for_relations: FxHashMap<i64, Node>,
    ways_for_relations: FxHashMap<i64, Way>,
    relations: FxHashMap<i64, Relation>,

    documents: Vec<PoiDocument>,

    ways_missing_nodes: u64,
    missing_node_sample: Option<String>,
}

/// Drives the passes and maps qualifying primitives to documents.
pub struct Extractor {
    mapper: DocumentMapper,
}

impl Extractor {
    pub fn new(mapper: DocumentMapper) -> Self {
        Extractor { mapper }
    }

    /// An extractor with the given filters, no presentation filter and
    /// a base popularity of 1.
    pub fn with_filters(filters: PoiFilters) -> Self {
        Extractor::new(DocumentMapper::new(filters, 1, Vec::new()))
    }

    /// Runs the full extraction. Either the complete document
    /// collection is returned, or the first fatal error; primitives
    /// skipped over missing geometry are logged, never fatal.
    pub fn extract(&self, path: &Path) -> Result<Vec<PoiDocument>, ExtractError> {
        let mut state = RunState::default();

        for phase in Phase::ALL {
            debug!("Starting {phase:?} pass");

            let elements = ElementIterator::new(path, phase.kinds())?;
            for element in elements {
                match element? {
                    ProcessedElement::Node(node) => self.collect_node(node, &mut state),
                    ProcessedElement::Way(way) => self.collect_way(way, phase, &mut state),
                    ProcessedElement::Relation(relation) => {
                        self.collect_relation(relation, &mut state)
                    }
                }
            }
        }

        if state.ways_missing_nodes > 0 {
            info!(
                "Ignored {} ways with node references outside the extract (e.g. {})",
                state.ways_missing_nodes,
                state.missing_node_sample.as_deref().unwrap_or("unnamed"),
            );
        }

        self.process_relations(&mut state);

        info!("Extraction produced {} documents", state.documents.len());
        Ok(state.documents)
    }

    /// Nodes only appear in the final pass: matching nodes map to
    /// documents immediately, and coordinates wanted by earlier passes
    /// are retained.
    fn collect_node(&self, node: Node, state: &mut RunState) {
        if self.mapper.filters().matches(node.tags()) {
            let centroid = GeoPoint::new(node.lat(), node.lon());
            state
                .documents
                .extend(self.mapper.map(node.id(), node.tags(), centroid));
        }

        if state.node_refs_for_ways.contains(&node.id()) {
            state.nodes_for_ways.insert(node.id(), node.clone());
        }

        if state.nodes_for_relations.contains_key(&node.id()) {
            return;
        }

        if state.node_refs_for_relations.contains(&node.id()) {
            state.nodes_for_relations.insert(node.id(), node);
        }
    }

    fn collect_way(&self, way: Way, phase: Phase, state: &mut RunState) {
        // Ways stored for relation processing in the previous pass are
        // never mapped standalone.
        if state.ways_for_relations.contains_key(&way.id()) {
            return;
        }

        if state.way_refs_for_relations.contains(&way.id()) {
            state.node_refs_for_relations.extend(way.refs().iter().copied());
            state.ways_for_relations.insert(way.id(), way.clone());
        }

        if !self.mapper.filters().matches(way.tags()) {
            return;
        }

        match phase {
            // Second pass: only learn which node coordinates the final
            // pass must retain.
            Phase::Ways => {
                state.node_refs_for_ways.extend(way.refs().iter().copied());
            }
            Phase::NodesAndWays => match self.way_centroid(&way, state) {
                Some(centroid) => {
                    state
                        .documents
                        .extend(self.mapper.map(way.id(), way.tags(), centroid));
                }
                None => {
                    state.ways_missing_nodes += 1;
                    if state.missing_node_sample.is_none() {
                        state.missing_node_sample = Some(
                            way.tags()
                                .assumed_name()
                                .map(str::to_string)
                                .unwrap_or_else(|| format!("way {}", way.id())),
                        );
                    }
                    debug!("Ignoring way {} with unresolved node references", way.id());
                }
            },
            Phase::Relations => {}
        }
    }

    /// First pass: record every matching multipolygon relation and
    /// mark its way members as wanted.
    fn collect_relation(&self, relation: Relation, state: &mut RunState) {
        if state.relations.contains_key(&relation.id()) {
            return;
        }

        if !relation.tags().is(TagString::TYPE, TagString::MULTIPOLYGON) {
            return;
        }

        if !self.mapper.filters().matches(relation.tags()) {
            return;
        }

        state
            .way_refs_for_relations
            .extend(relation.member_refs_of_kind(MemberType::Way));
        state.relations.insert(relation.id(), relation);
    }

    /// A way's centroid needs every referenced coordinate; a reference
    /// outside the extract disqualifies the way.
    fn way_centroid(&self, way: &Way, state: &RunState) -> Option<GeoPoint> {
        let coordinates: Option<Vec<Coord>> = way
            .refs()
            .iter()
            .map(|id| {
                state.nodes_for_ways.get(id).map(|node| Coord {
                    x: node.lon(),
                    y: node.lat(),
                })
            })
            .collect();

        geometry::centroid_of(&coordinates?)
    }

    /// Runs after the final pass, once the relation coordinate map is
    /// complete. The maps are read-only here, so relations fan out
    /// over the thread pool and their documents are appended in
    /// whatever order they finish.
    fn process_relations(&self, state: &mut RunState) {
        let RunState {
            relations,
            ways_for_relations,
            nodes_for_relations,
            documents,
            ..
        } = state;

        // Shared reborrows: the maps are read-only from here on.
        let relations = &*relations;
        let ways_for_relations = &*ways_for_relations;
        let nodes_for_relations = &*nodes_for_relations;

        let produced: Vec<PoiDocument> = relations
            .par_iter()
            .flat_map_iter(|(_, relation)| {
                for member in relation.members() {
                    if member.kind == MemberType::Way
                        && &*member.role != TagString::ROLE_INNER
                        && &*member.role != TagString::ROLE_OUTER
                    {
                        debug!(
                            "Unexpected role {} in multipolygon {}",
                            member.role,
                            relation.id()
                        );
                    }
                }

                let inner: Vec<Way> = relation
                    .member_refs_for_role(TagString::ROLE_INNER)
                    .filter_map(|id| ways_for_relations.get(&id).cloned())
                    .collect();
                let outer: Vec<Way> = relation
                    .member_refs_for_role(TagString::ROLE_OUTER)
                    .filter_map(|id| ways_for_relations.get(&id).cloned())
                    .collect();

                match geometry::multipolygon_interior_point(
                    relation.id(),
                    &outer,
                    &inner,
                    nodes_for_relations,
                ) {
                    Some(centroid) => self.mapper.map(relation.id(), relation.tags(), centroid),
                    None => Vec::new(),
                }
            })
            .collect();

        info!(
            "Total {} multipolygon documents added from {} relations.",
            produced.len(),
            relations.len()
        );

        documents.extend(produced);
    }
}
