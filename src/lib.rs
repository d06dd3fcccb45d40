#![allow(rustdoc::broken_intra_doc_links)]
//! A symbolic expression-graph compiler for stream-algebra monitoring
//! specifications.
//!
//! A [`Specification`] owns a set of declared input streams and a set of
//! named output streams, each bound to an [`Expression`] — an opaque
//! sequence of target-language text fragments interleaved with
//! references to other streams. Binding, collapsing (inlining unpinned
//! dependencies), and pruning (dropping unreachable bindings) are the
//! three core mutating operations; [`Specification::serialize`] renders
//! the result as flat, line-oriented target-language text.
//!
//! On top of the core sit the [`geometry`] builders: pure functions that
//! compose polygon, circle, and point primitives into fresh streams and
//! the expressions that define them, for monitors that check collision
//! and containment properties over time.
//!
//! # Build and collapse a small specification
//!
//! ```
//! use streamgraph::{Expression, Specification, Stream};
//!
//! let mut spec = Specification::new();
//! spec.declare_input("b");
//! spec.add_expression("x", Expression::literal("2 * b"), false).unwrap();
//!
//! let mut y = Expression::reference("x");
//! y.append(" + 1");
//! spec.add_expression("y", y, true).unwrap();
//!
//! let y_stream: Stream = "y".into();
//! spec.collapse_expression(&y_stream).unwrap();
//! spec.prune();
//!
//! assert_eq!(spec.outputs().len(), 1);
//! assert_eq!(spec.binding(&y_stream).unwrap().render(), "(2 * b) + 1");
//! ```
//!
//! # Parse a template with embedded stream references
//!
//! ```
//! use std::collections::HashMap;
//! use streamgraph::{Expression, Stream};
//!
//! let mut table = HashMap::new();
//! table.insert("speed".to_string(), Stream::new("VelocityX"));
//!
//! let expr = Expression::from_template("›speed‹ * 2", Some(&table)).unwrap();
//! assert_eq!(expr.render(), "VelocityX * 2");
//! ```

pub mod chain;
pub mod error;
pub mod expr;
pub mod geometry;
pub mod graph;
pub mod serialize;
pub mod spec;
pub mod stream;
pub mod template;

pub use chain::{
    add_all, and_all, chain as chain_operands, conditional, eq, geq, gt, leq, lt, neq, not,
    or_all, Operand,
};
pub use error::{Error, Result, Span};
pub use expr::{Appendable, Atom, Expression};
pub use geometry::{
    circle_line_overlap, circles_overlap_walls, connect_polygon, convex_polygon_test,
    parity_test, pnpoly, point_in_circle, points_in_circles, rotate_polygon, Circle, Coord,
    Direction, Point, Wall,
};
pub use spec::Specification;
pub use stream::Stream;
