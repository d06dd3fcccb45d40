//! Convex-polygon half-plane test: a point lies inside a convex polygon
//! iff it is on the interior side of every wall's supporting line, and
//! inside the union of several convex subpolygons iff any one of them
//! holds.

use std::collections::HashMap;

use super::{add, coord_expr, mul, sub, Point, Wall};
use crate::chain::{and_all, gt, lt, or_all};
use crate::expr::Expression;
use crate::stream::Stream;

/// Winding order a convex (sub)polygon's walls are listed in, which
/// flips the sign of the interior half-plane test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Walls listed clockwise; interior is where the signed area is positive.
    Clockwise,
    /// Walls listed counter-clockwise; interior is where it is negative.
    CounterClockwise,
}

/// The signed-area half-plane test for `test_point` against one `wall`,
/// oriented per `direction`.
pub fn convex_wall_check(test_point: &Point, wall: &Wall, direction: Direction) -> Expression {
    let (posx, posy) = test_point;
    let (a, b) = wall;
    let (ax, ay) = a;
    let (bx, by) = b;

    let signed_area = add(
        mul(sub(coord_expr(posx), coord_expr(ax)), sub(coord_expr(by), coord_expr(ay))),
        mul(sub(coord_expr(ay), coord_expr(posy)), sub(coord_expr(bx), coord_expr(ax))),
    );

    match direction {
        Direction::Clockwise => lt(Expression::literal("0.0"), signed_area),
        Direction::CounterClockwise => gt(Expression::literal("0.0"), signed_area),
    }
}

/// Tests `test_points` against the union of `polygons` (each an ordered
/// wall list for one convex subpolygon). For test point `i` and
/// subpolygon `m`, emits `<prefix>P<i>inSubPoly<m>` (all walls must
/// hold); then `<prefix>P<i>inPoly` (any subpolygon must hold).
///
/// Returns the fresh bindings and, per test point in input order, the
/// `P<i>inPoly` stream handle.
pub fn convex_polygon_test(
    test_points: &[Point],
    polygons: &[Vec<Wall>],
    stream_prefix: &str,
    direction: Direction,
) -> (HashMap<Stream, Expression>, Vec<Stream>) {
    let mut expressions = HashMap::new();
    let mut point_streams = Vec::with_capacity(test_points.len());

    for (i, point) in test_points.iter().enumerate() {
        let mut subpoly_streams = Vec::with_capacity(polygons.len());

        for (m, walls) in polygons.iter().enumerate() {
            let wall_checks: Vec<Expression> = walls
                .iter()
                .map(|wall| convex_wall_check(point, wall, direction))
                .collect();

            let stream = Stream::new(format!("{stream_prefix}P{i}inSubPoly{m}"));
            expressions.insert(stream.clone(), and_all(wall_checks));
            subpoly_streams.push(stream);
        }

        let union_stream = Stream::new(format!("{stream_prefix}P{i}inPoly"));
        expressions.insert(union_stream.clone(), or_all(subpoly_streams));
        point_streams.push(union_stream);
    }

    (expressions, point_streams)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Coord;

    fn ccw_square() -> Vec<Wall> {
        let corners = vec![
            (Coord::from(-1), Coord::from(-1)),
            (Coord::from(-1), Coord::from(1)),
            (Coord::from(1), Coord::from(1)),
            (Coord::from(1), Coord::from(-1)),
        ];
        super::super::connect_polygon(&corners)
    }

    #[test]
    fn single_subpolygon_names_matching_union_stream() {
        let walls = ccw_square();
        let points = vec![(Coord::from(0), Coord::from(0))];
        let (expressions, handles) =
            convex_polygon_test(&points, &[walls], "", Direction::CounterClockwise);

        assert_eq!(handles, vec![Stream::new("P0inPoly")]);
        assert!(expressions.contains_key(&Stream::new("P0inSubPoly0")));
        assert!(expressions.contains_key(&Stream::new("P0inPoly")));
    }

    #[test]
    fn every_wall_feeds_the_subpolygon_conjunction() {
        let walls = ccw_square();
        let e = and_all(
            walls
                .iter()
                .map(|w| convex_wall_check(&(Coord::from(0), Coord::from(0)), w, Direction::CounterClockwise)),
        );
        assert_eq!(e.render().matches("&&").count(), walls.len() - 1);
    }
}
