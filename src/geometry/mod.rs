//! Geometry expression builders (component C5): pure functions that
//! compose polygon, circle, and point primitives into fresh streams and
//! the expressions that define them. None of these touch a
//! [`crate::Specification`] — callers register the returned bindings
//! themselves, choosing order and pinning.
//!
//! A coordinate ([`Coord`]) is either a stream reference or a literal
//! number, matching the target surface's own mix of computed and
//! constant geometry.

use std::collections::HashMap;

use crate::chain::{add_all, and_all, eq, leq};
use crate::expr::Expression;
use crate::stream::Stream;

pub mod convex;
pub mod pnpoly;

pub use convex::{convex_polygon_test, convex_wall_check, Direction};
pub use pnpoly::{pnpoly, pnpoly_check_wall, pnpoly_check_walls};

/// Either a stream whose runtime value supplies this coordinate, or a
/// fixed literal number.
#[derive(Debug, Clone, PartialEq)]
pub enum Coord {
    /// A stream reference.
    Stream(Stream),
    /// A compile-time constant.
    Literal(f64),
}

impl From<Stream> for Coord {
    fn from(stream: Stream) -> Self {
        Coord::Stream(stream)
    }
}

impl From<&Stream> for Coord {
    fn from(stream: &Stream) -> Self {
        Coord::Stream(stream.clone())
    }
}

impl From<f64> for Coord {
    fn from(value: f64) -> Self {
        Coord::Literal(value)
    }
}

impl From<i32> for Coord {
    fn from(value: i32) -> Self {
        Coord::Literal(value as f64)
    }
}

/// A 2-D point: two coordinates, each independently a stream or a literal.
pub type Point = (Coord, Coord);

/// A circle: a center point plus a radius coordinate.
pub type Circle = (Point, Coord);

/// A wall segment between two points.
pub type Wall = (Point, Point);

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

pub(crate) fn coord_expr(c: &Coord) -> Expression {
    match c {
        Coord::Stream(stream) => Expression::reference(stream.clone()),
        Coord::Literal(value) => Expression::literal(format_number(*value)),
    }
}

pub(crate) fn add(a: Expression, b: Expression) -> Expression {
    let mut e = Expression::empty();
    e.append(a);
    e.append(" + ");
    e.append(b);
    e
}

pub(crate) fn sub(a: Expression, b: Expression) -> Expression {
    let mut e = Expression::empty();
    e.append(a);
    e.append(" - ");
    e.append(b);
    e
}

pub(crate) fn mul(a: Expression, b: Expression) -> Expression {
    let mut e = Expression::empty();
    e.append(a);
    e.append(" * ");
    e.append(b);
    e
}

pub(crate) fn div(a: Expression, b: Expression) -> Expression {
    let mut e = Expression::empty();
    e.append(a);
    e.append(" / ");
    e.append(b);
    e
}

pub(crate) fn modulo(a: Expression, b: Expression) -> Expression {
    let mut e = Expression::empty();
    e.append(a);
    e.append(" % ");
    e.append(b);
    e
}

pub(crate) fn squared(e: Expression) -> Expression {
    mul(e.clone(), e)
}

fn trig_call(name: &str, arg: &Coord) -> Expression {
    let mut e = Expression::literal(format!("{name}("));
    match arg {
        Coord::Stream(stream) => e.append(stream.clone()),
        Coord::Literal(value) => e.append(format_number(*value)),
    }
    e.append(")");
    e
}

/// Rotates each point of `polygon` about `center_of_rotation` by `angle`
/// (counter-clockwise, in the target language's own `sin`/`cos`), naming
/// the resulting streams `<prefix>C<n>X` / `<prefix>C<n>Y` for the point
/// at index `n`.
///
/// Returns the fresh bindings and the rotated point handles, in input
/// order.
pub fn rotate_polygon(
    polygon: &[Point],
    center_of_rotation: &Point,
    angle: &Coord,
    stream_prefix: &str,
) -> (HashMap<Stream, Expression>, Vec<(Stream, Stream)>) {
    let mut expressions = HashMap::new();
    let mut corner_points = Vec::with_capacity(polygon.len());

    for (n, (x, y)) in polygon.iter().enumerate() {
        let px = Stream::new(format!("{stream_prefix}C{n}X"));
        let py = Stream::new(format!("{stream_prefix}C{n}Y"));

        let rotated_x = add(
            sub(
                mul(coord_expr(x), trig_call("cos", angle)),
                mul(coord_expr(y), trig_call("sin", angle)),
            ),
            coord_expr(&center_of_rotation.0),
        );
        let rotated_y = add(
            add(
                mul(coord_expr(x), trig_call("sin", angle)),
                mul(coord_expr(y), trig_call("cos", angle)),
            ),
            coord_expr(&center_of_rotation.1),
        );

        expressions.insert(px.clone(), rotated_x);
        expressions.insert(py.clone(), rotated_y);
        corner_points.push((px, py));
    }

    (expressions, corner_points)
}

/// Connects `corners` cyclically into walls `(cᵢ, cᵢ₋₁ mod n)` for
/// `i = 0..n`. Produces no streams or expressions; this is a pure
/// rearrangement of the corner list.
pub fn connect_polygon(corners: &[Point]) -> Vec<Wall> {
    let n = corners.len();
    (0..n)
        .map(|i| {
            let j = (i + n - 1) % n;
            (corners[i].clone(), corners[j].clone())
        })
        .collect()
}

/// An expression evaluating to true iff `p` lies within or on the border
/// of circle `c`: `(px−cx)² + (py−cy)² ≤ r²`.
pub fn point_in_circle(p: &Point, c: &Circle) -> Expression {
    let (px, py) = p;
    let ((cx, cy), r) = c;

    let dx2 = squared(sub(coord_expr(px), coord_expr(cx)));
    let dy2 = squared(sub(coord_expr(py), coord_expr(cy)));
    let lhs = add(dx2, dy2);
    let rhs = squared(coord_expr(r));

    leq(lhs, rhs)
}

/// An expression evaluating to true iff circle `c` overlaps the segment
/// `wall`: the closest point on the infinite line through `wall` falls
/// strictly within the segment and lies strictly inside the circle.
pub fn circle_line_overlap(c: &Circle, wall: &Wall) -> Expression {
    let (a, b) = wall;
    let (ax, ay) = a;
    let (bx, by) = b;
    let ((cx, cy), r) = c;

    let dbx = sub(coord_expr(bx), coord_expr(ax));
    let dby = sub(coord_expr(by), coord_expr(ay));
    let dcx = sub(coord_expr(cx), coord_expr(ax));
    let dcy = sub(coord_expr(cy), coord_expr(ay));
    let dax = sub(coord_expr(ax), coord_expr(cx));

    let denom = add(squared(dbx.clone()), squared(dby.clone()));

    let s_num = add(mul(dcx, dbx.clone()), mul(dcy.clone(), dby.clone()));
    let s = div(s_num, denom.clone());

    let t_num = add(mul(dax, dby), mul(dcy, dbx));
    let t2 = div(squared(t_num), denom);

    let r2 = squared(coord_expr(r));

    and_all([
        crate::chain::lt(Expression::literal("0.0"), s.clone()),
        crate::chain::lt(s, Expression::literal("1.0")),
        crate::chain::lt(t2, r2),
    ])
}

/// Applies [`point_in_circle`] across the cartesian product of `points`
/// against `circles`, naming each resulting stream
/// `<prefix>Point<p>InCircle<c>`.
///
/// Returns the fresh bindings, the per-point groupings (in point order),
/// and the per-circle groupings (in circle order).
pub fn points_in_circles(
    points: &[Point],
    circles: &[Circle],
    stream_prefix: &str,
) -> (
    HashMap<Stream, Expression>,
    HashMap<usize, Vec<Stream>>,
    HashMap<usize, Vec<Stream>>,
) {
    let mut expressions = HashMap::new();
    let mut point_streams: HashMap<usize, Vec<Stream>> = HashMap::new();
    let mut circle_streams: HashMap<usize, Vec<Stream>> = HashMap::new();

    for (pn, p) in points.iter().enumerate() {
        let entry = point_streams.entry(pn).or_default();
        for (cn, c) in circles.iter().enumerate() {
            circle_streams.entry(cn).or_default();
            let stream = Stream::new(format!("{stream_prefix}Point{pn}InCircle{cn}"));
            entry.push(stream.clone());
            circle_streams.get_mut(&cn).unwrap().push(stream.clone());
            expressions.insert(stream, point_in_circle(p, c));
        }
    }

    (expressions, point_streams, circle_streams)
}

/// Applies [`circle_line_overlap`] across the cartesian product of
/// `circles` against `walls`, naming each resulting stream
/// `<prefix>Circle<c>CollidesWall<w>`.
///
/// Returns the fresh bindings, the per-wall groupings (in wall order),
/// and the per-circle groupings (in circle order).
pub fn circles_overlap_walls(
    circles: &[Circle],
    walls: &[Wall],
    stream_prefix: &str,
) -> (
    HashMap<Stream, Expression>,
    HashMap<usize, Vec<Stream>>,
    HashMap<usize, Vec<Stream>>,
) {
    let mut expressions = HashMap::new();
    let mut wall_streams: HashMap<usize, Vec<Stream>> = HashMap::new();
    let mut circle_streams: HashMap<usize, Vec<Stream>> = HashMap::new();

    for (cn, c) in circles.iter().enumerate() {
        let entry = circle_streams.entry(cn).or_default();
        for (wn, w) in walls.iter().enumerate() {
            wall_streams.entry(wn).or_default();
            let stream = Stream::new(format!("{stream_prefix}Circle{cn}CollidesWall{wn}"));
            entry.push(stream.clone());
            wall_streams.get_mut(&wn).unwrap().push(stream.clone());
            expressions.insert(stream, circle_line_overlap(c, w));
        }
    }

    (expressions, wall_streams, circle_streams)
}

/// Sums the 0/1-valued `per_wall` streams and tests the result's parity,
/// matching the `(Σ per-wall) mod 2 == 1` composition used by
/// [`pnpoly`]. Exposed separately because [`points_in_circles`]-style
/// callers sometimes need the same odd/even composition over a custom
/// stream set.
pub fn parity_test(per_wall: impl IntoIterator<Item = impl Into<Stream>>) -> Expression {
    let sum = add_all(per_wall.into_iter().map(|s| s.into()));
    eq(modulo(sum, Expression::literal("2")), Expression::literal("1"))
}
