//! Ray-casting point-in-polygon test ([W. Randolph Franklin's parity
//! method](https://wrfranklin.org/Research/Short_Notes/pnpoly.html)),
//! generalized to name one stream per wall/point pair plus one composed
//! `P<m>InPoly` stream per test point.

use std::collections::HashMap;

use super::{add, coord_expr, div, modulo, mul, sub, Point, Wall};
use crate::chain::{and_all, conditional, eq, gt, lt, neq};
use crate::expr::Expression;
use crate::stream::Stream;

/// For one test point and one wall, the expression `1` if the
/// horizontal ray cast from `test_point` crosses `wall`, else `0`. A
/// horizontal wall (`Ay == By`) can never be crossed by a horizontal ray
/// and is suppressed by an explicit inequality guard rather than
/// dividing by its zero-length vertical extent.
pub fn pnpoly_check_wall(test_point: &Point, wall: &Wall) -> Expression {
    let (posx, posy) = test_point;
    let (a, b) = wall;
    let (ax, ay) = a;
    let (bx, by) = b;

    let straddles = neq(
        gt(coord_expr(ay), coord_expr(posy)),
        gt(coord_expr(by), coord_expr(posy)),
    );
    let not_horizontal = neq(coord_expr(by), coord_expr(ay));

    let x_at_crossing = add(
        div(
            mul(sub(coord_expr(bx), coord_expr(ax)), sub(coord_expr(posy), coord_expr(ay))),
            sub(coord_expr(by), coord_expr(ay)),
        ),
        coord_expr(ax),
    );
    let crosses_to_the_right = lt(coord_expr(posx), x_at_crossing);

    conditional(
        and_all([straddles, not_horizontal, crosses_to_the_right]),
        Expression::literal("1"),
        Expression::literal("0"),
    )
}

/// Applies [`pnpoly_check_wall`] across every `(point, wall)` pair,
/// naming each stream `<prefix>w<n>p<m>` for wall index `n` and point
/// index `m`.
pub fn pnpoly_check_walls(
    test_points: &[Point],
    walls: &[Wall],
    stream_prefix: &str,
) -> (HashMap<Stream, Expression>, HashMap<usize, Vec<Stream>>) {
    let mut expressions = HashMap::new();
    let mut point_streams: HashMap<usize, Vec<Stream>> = HashMap::new();

    for (m, point) in test_points.iter().enumerate() {
        let mut wall_streams = Vec::with_capacity(walls.len());
        for (n, wall) in walls.iter().enumerate() {
            let stream = Stream::new(format!("{stream_prefix}w{n}p{m}"));
            expressions.insert(stream.clone(), pnpoly_check_wall(point, wall));
            wall_streams.push(stream);
        }
        point_streams.insert(m, wall_streams);
    }

    (expressions, point_streams)
}

/// Builds the full parity test: one `<prefix>w<n>p<m>` stream per wall
/// crossing check, plus one `<prefix>P<m>InPoly` stream per test point
/// equal to `((Σₙ w<n>p<m>) % 2) == 1`.
///
/// Returns the fresh bindings and, per test point index, the
/// `P<m>InPoly` stream handle.
pub fn pnpoly(
    test_points: &[Point],
    walls: &[Wall],
    stream_prefix: &str,
) -> (HashMap<Stream, Expression>, HashMap<usize, Stream>) {
    let (mut expressions, point_streams) = pnpoly_check_walls(test_points, walls, stream_prefix);
    let mut pnp_streams = HashMap::new();

    for (m, wall_streams) in point_streams {
        let named = Stream::new(format!("{stream_prefix}P{m}InPoly"));
        let sum = crate::chain::add_all(wall_streams);
        let mod_expr = eq(modulo(sum, Expression::literal("2")), Expression::literal("1"));
        expressions.insert(named.clone(), mod_expr);
        pnp_streams.insert(m, named);
    }

    (expressions, pnp_streams)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Coord;

    fn square() -> Vec<Wall> {
        let corners = vec![
            (Coord::from(-1), Coord::from(-1)),
            (Coord::from(1), Coord::from(-1)),
            (Coord::from(1), Coord::from(1)),
            (Coord::from(-1), Coord::from(1)),
        ];
        super::super::connect_polygon(&corners)
    }

    #[test]
    fn check_wall_guards_against_horizontal_walls() {
        let point = (Coord::from(0), Coord::from(0));
        let wall = (
            (Coord::from(-1), Coord::from(1)),
            (Coord::from(1), Coord::from(1)),
        );
        let e = pnpoly_check_wall(&point, &wall);
        assert!(e.render().contains("!="));
        assert!(e.render().contains("if "));
    }

    #[test]
    fn pnpoly_names_one_wall_stream_per_pair_and_one_inpoly_per_point() {
        let walls = square();
        let points = vec![(Coord::from(0), Coord::from(0))];
        let (expressions, pnp_streams) = pnpoly(&points, &walls, "");

        assert_eq!(pnp_streams.len(), 1);
        assert!(expressions.contains_key(&Stream::new("P0InPoly")));
        for n in 0..walls.len() {
            assert!(expressions.contains_key(&Stream::new(format!("w{n}p0"))));
        }
    }

    #[test]
    fn pnpoly_tracks_stream_dependencies_of_test_point() {
        let walls = square();
        let px = Stream::new("Px");
        let py = Stream::new("Py");
        let points = vec![(Coord::Stream(px.clone()), Coord::Stream(py.clone()))];
        let (expressions, _) = pnpoly_check_walls(&points, &walls, "");

        let w0 = &expressions[&Stream::new("w0p0")];
        assert!(w0.active_dependencies().contains(&px));
        assert!(w0.active_dependencies().contains(&py));
    }

    /// `square()`'s walls, for the point `(0, 0)`: wall 0
    /// `((-1,-1),(-1,1))` is the left edge, whose rightward-ray crossing
    /// point is `x = -1`, strictly to the *left* of `Px = 0` — the ray
    /// does not cross it. Wall 2 `((1,1),(1,-1))` is the right edge,
    /// crossing point `x = 1`, strictly to the *right* of `Px = 0` — the
    /// ray does cross it. A point at the origin is inside the square, so
    /// exactly one of its four walls (the odd parity required by
    /// `pnpoly`) may cross.
    #[test]
    fn crosses_to_the_right_orders_point_before_crossing_x() {
        let walls = square();
        let point = (Coord::from(0), Coord::from(0));

        let non_crossing = pnpoly_check_wall(&point, &walls[0]).render();
        let crossing = pnpoly_check_wall(&point, &walls[2]).render();

        for rendered in [&non_crossing, &crossing] {
            assert!(
                rendered.contains("(0.0) < ("),
                "expected the point's x-coordinate on the left of a strict `<`, got: {rendered}"
            );
            assert!(
                !rendered.contains("<= (0.0)"),
                "the crossing-x coordinate must not be compared with `<=` against the point, got: {rendered}"
            );
        }
    }
}
