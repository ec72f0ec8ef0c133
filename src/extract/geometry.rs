//! Centroid and interior-point computation over reconstructed rings.

use geo::{
    Centroid, Coord, Distance, Euclidean, InteriorPoint, LineString, MultiPoint, MultiPolygon,
    Point, Polygon, Validation,
};
use log::{debug, warn};
use rustc_hash::FxHashMap;

use crate::extract::ring::{Ring, RingError, construct_rings};
use crate::osm::element::variants::{Node, Way};
use crate::poi::document::GeoPoint;

/// Minimum distance between outer polygons of one relation, in the
/// source coordinate units. Outers further apart than this are likely
/// unrelated features improperly grouped.
const MINIMUM_DISTANCE: f64 = 0.0002;

/// Calculates the centroid of a coordinate sequence.
///
/// If the coordinates form a valid closed polygon, the polygon's
/// centroid is used. If not, the centroid of the corresponding
/// multipoint is used.
pub fn centroid_of(coordinates: &[Coord]) -> Option<GeoPoint> {
    if coordinates.is_empty() {
        return None;
    }

    if let Some(centroid) = closed_polygon(coordinates).and_then(|polygon| polygon.centroid()) {
        return Some(to_geo_point(centroid));
    }

    let points: Vec<Point> = coordinates.iter().copied().map(Point::from).collect();
    MultiPoint::new(points).centroid().map(to_geo_point)
}

/// The representative location of a multipolygon relation: the
/// interior point of the polygon collection built from its outer and
/// inner rings. A point inside the shape, not its true centroid.
///
/// Returns `None` when the outer boundary is unresolvable, produces no
/// valid polygon, or fails the mutual proximity check.
pub(crate) fn multipolygon_interior_point(
    relation_id: i64,
    outer_ways: &[Way],
    inner_ways: &[Way],
    nodes: &FxHashMap<i64, Node>,
) -> Option<GeoPoint> {
    let outer = match polygons_for_ways(outer_ways, nodes) {
        Ok(polygons) => polygons,
        Err(err) => {
            warn!("Unresolvable outer boundary of relation {relation_id}: {err}");
            return None;
        }
    };

    if outer.is_empty() {
        return None;
    }

    if !outer_rings_adjacent(&outer) {
        warn!("Outer rings of relation {relation_id} are too far apart, skipping");
        return None;
    }

    let inner = match polygons_for_ways(inner_ways, nodes) {
        Ok(polygons) => polygons,
        Err(err) => {
            debug!("Unresolvable inner boundary of relation {relation_id}: {err}");
            Vec::new()
        }
    };

    // Inner rings join as siblings, not holes; the interior point is
    // allowed to land inside a hole.
    let multipolygon = MultiPolygon::new(outer.into_iter().chain(inner).collect());
    multipolygon.interior_point().map(to_geo_point)
}

/// Reconstructs rings from `ways` and keeps every ring that produces a
/// valid polygon. Ring construction failure fails the whole set.
fn polygons_for_ways(
    ways: &[Way],
    nodes: &FxHashMap<i64, Node>,
) -> Result<Vec<Polygon>, RingError> {
    let rings = construct_rings(ways)?;

    Ok(rings
        .iter()
        .filter_map(|ring| ring_polygon(ring, nodes))
        .collect())
}

fn ring_polygon(ring: &Ring, nodes: &FxHashMap<i64, Node>) -> Option<Polygon> {
    let refs = ring.node_refs().ok()?;

    let coordinates: Option<Vec<Coord>> = refs
        .iter()
        .map(|id| {
            let node = nodes.get(id);
            if node.is_none() {
                debug!("Ring references node {id} outside the extract");
            }

            node.map(|node| Coord {
                x: node.lon(),
                y: node.lat(),
            })
        })
        .collect();

    closed_polygon(&coordinates?)
}

/// Every pair of outer polygons must sit within [`MINIMUM_DISTANCE`]
/// of each other.
fn outer_rings_adjacent(outer: &[Polygon]) -> bool {
    outer.iter().all(|polygon| {
        outer
            .iter()
            .all(|other| Euclidean.distance(polygon, other) <= MINIMUM_DISTANCE)
    })
}

fn closed_polygon(coordinates: &[Coord]) -> Option<Polygon> {
    if coordinates.len() < 4 || coordinates.first() != coordinates.last() {
        return None;
    }

    let polygon = Polygon::new(LineString::from(coordinates.to_vec()), Vec::new());
    polygon.is_valid().then_some(polygon)
}

fn to_geo_point(point: Point) -> GeoPoint {
    GeoPoint::new(point.y(), point.x())
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;
    use geo::coord;

    use super::*;
    use crate::osm::element::variants::common::Tags;

    fn node(id: i64, lat: f64, lon: f64) -> (i64, Node) {
        (id, Node::new(id, geo::point! { x: lon, y: lat }, Tags::default()))
    }

    fn square_coords() -> Vec<Coord> {
        vec![
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 2.0, y: 0.0 },
            coord! { x: 2.0, y: 2.0 },
            coord! { x: 0.0, y: 2.0 },
            coord! { x: 0.0, y: 0.0 },
        ]
    }

    #[test]
    fn centroid_of_closed_ring_is_the_polygon_centroid() {
        let centroid = centroid_of(&square_coords()).unwrap();

        assert_relative_eq!(centroid.lon, 1.0);
        assert_relative_eq!(centroid.lat, 1.0);
    }

    #[test]
    fn centroid_of_open_sequence_falls_back_to_multipoint() {
        let coords = vec![
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 2.0, y: 0.0 },
            coord! { x: 2.0, y: 2.0 },
        ];

        let centroid = centroid_of(&coords).unwrap();

        // Multipoint centroid is the mean of the vertices, which
        // differs from the polygon centroid of the closed triangle.
        assert_relative_eq!(centroid.lon, 4.0 / 3.0);
        assert_relative_eq!(centroid.lat, 2.0 / 3.0);
    }

    #[test]
    fn centroid_of_nothing_is_nothing() {
        assert!(centroid_of(&[]).is_none());
    }

    #[test]
    fn interior_point_lands_inside_the_outer_ring() {
        let nodes: FxHashMap<i64, Node> = [
            node(1, 0.0, 0.0),
            node(2, 0.0, 0.001),
            node(3, 0.001, 0.001),
            node(4, 0.001, 0.0),
            // Hole well inside the outer square.
            node(5, 0.0004, 0.0004),
            node(6, 0.0004, 0.0006),
            node(7, 0.0006, 0.0006),
            node(8, 0.0006, 0.0004),
        ]
        .into_iter()
        .collect();

        let outer = [Way::new(10, vec![1, 2, 3, 4, 1], Tags::default())];
        let inner = [Way::new(11, vec![5, 6, 7, 8, 5], Tags::default())];

        let point = multipolygon_interior_point(1, &outer, &inner, &nodes).unwrap();

        assert!(point.lat > 0.0 && point.lat < 0.001);
        assert!(point.lon > 0.0 && point.lon < 0.001);
    }

    #[test]
    fn distant_outer_rings_disqualify_the_relation() {
        let nodes: FxHashMap<i64, Node> = [
            node(1, 0.0, 0.0),
            node(2, 0.0, 0.0001),
            node(3, 0.0001, 0.0001),
            node(4, 0.0001, 0.0),
            // Second square far away from the first.
            node(5, 1.0, 1.0),
            node(6, 1.0, 1.0001),
            node(7, 1.0001, 1.0001),
            node(8, 1.0001, 1.0),
        ]
        .into_iter()
        .collect();

        let outer = [
            Way::new(10, vec![1, 2, 3, 4, 1], Tags::default()),
            Way::new(11, vec![5, 6, 7, 8, 5], Tags::default()),
        ];

        assert!(multipolygon_interior_point(1, &outer, &[], &nodes).is_none());
    }

    #[test]
    fn unresolvable_outer_boundary_yields_nothing() {
        let nodes: FxHashMap<i64, Node> =
            [node(1, 0.0, 0.0), node(2, 0.0, 0.001)].into_iter().collect();

        // A single open fragment cannot close into a ring.
        let outer = [Way::new(10, vec![1, 2], Tags::default())];

        assert!(multipolygon_interior_point(1, &outer, &[], &nodes).is_none());
    }

    #[test]
    fn ring_with_a_node_outside_the_extract_is_skipped() {
        let nodes: FxHashMap<i64, Node> = [node(1, 0.0, 0.0), node(2, 0.0, 0.001)]
            .into_iter()
            .collect();

        // Refs 3 and 4 have no coordinates in the map.
        let outer = [Way::new(10, vec![1, 2, 3, 4, 1], Tags::default())];

        assert!(multipolygon_interior_point(1, &outer, &[], &nodes).is_none());
    }
}
