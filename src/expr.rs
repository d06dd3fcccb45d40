//! Expressions: ordered sequences of literal text fragments and stream
//! references, plus the active-dependency set they carry alongside.

use std::collections::HashSet;
use std::fmt;

use crate::stream::Stream;
use crate::template;

/// A single element of an [`Expression`]'s atom sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    /// An opaque fragment of target-language surface syntax.
    Literal(String),
    /// A reference to another stream, rendered as its bare name.
    Ref(Stream),
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Literal(text) => write!(f, "{text}"),
            Atom::Ref(stream) => write!(f, "{stream}"),
        }
    }
}

/// Anything that can be appended to an [`Expression`]: a literal fragment,
/// a stream reference, or a nested expression (parenthesized on append).
pub enum Appendable {
    /// A literal text fragment, inserted verbatim.
    Literal(String),
    /// A stream reference, inserted and tracked as a dependency.
    Stream(Stream),
    /// A nested expression, wrapped in parentheses and unioned in.
    Expression(Expression),
}

impl From<&str> for Appendable {
    fn from(text: &str) -> Self {
        Appendable::Literal(text.to_string())
    }
}

impl From<String> for Appendable {
    fn from(text: String) -> Self {
        Appendable::Literal(text)
    }
}

impl From<Stream> for Appendable {
    fn from(stream: Stream) -> Self {
        Appendable::Stream(stream)
    }
}

impl From<&Stream> for Appendable {
    fn from(stream: &Stream) -> Self {
        Appendable::Stream(stream.clone())
    }
}

impl From<Expression> for Appendable {
    fn from(expr: Expression) -> Self {
        Appendable::Expression(expr)
    }
}

/// An ordered sequence of atoms representing a fragment of target-language
/// surface syntax, together with the set of streams it actively depends on.
///
/// Two `Expression`s are compared by their rendered text via
/// [`Expression::render`]; there is no structural equality beyond that,
/// matching the "opaque surface text" treatment described in §6 of the
/// specification this crate implements.
#[derive(Debug, Clone, Default)]
pub struct Expression {
    atoms: Vec<Atom>,
    active_dependencies: HashSet<Stream>,
}

impl Expression {
    /// Creates an expression with zero atoms and no dependencies.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates an expression from a textual template containing zero or
    /// more delimited stream-reference tokens, resolved against `table`.
    ///
    /// See [`crate::template`] for the exact grammar. Fails with
    /// [`crate::Error::UnknownReference`], [`crate::Error::MissingTable`],
    /// or [`crate::Error::MalformedTemplate`].
    pub fn from_template(
        text: &str,
        table: Option<&std::collections::HashMap<String, Stream>>,
    ) -> crate::Result<Self> {
        template::parse(text, table)
    }

    /// Creates an expression from a textual template with no stream
    /// references expected; equivalent to `from_template(text, None)`
    /// but reads better at call sites that just want a literal.
    pub fn literal(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            Self::empty()
        } else {
            Self {
                atoms: vec![Atom::Literal(text)],
                active_dependencies: HashSet::new(),
            }
        }
    }

    /// Creates an expression consisting of a single stream reference.
    pub fn reference(stream: impl Into<Stream>) -> Self {
        let stream = stream.into();
        let mut deps = HashSet::with_capacity(1);
        deps.insert(stream.clone());
        Self {
            atoms: vec![Atom::Ref(stream)],
            active_dependencies: deps,
        }
    }

    /// Creates an expression from an iterable of atoms (literals, stream
    /// references, or nested expressions), appending each in order.
    pub fn from_atoms(items: impl IntoIterator<Item = impl Into<Appendable>>) -> Self {
        let mut expr = Self::empty();
        for item in items {
            expr.append(item);
        }
        expr
    }

    /// Appends a literal, stream reference, or nested expression.
    ///
    /// A nested [`Expression`] is wrapped in `(` … `)` and its active
    /// dependencies are unioned into this expression's. A bare stream
    /// reference is appended unwrapped and added to the dependency set. A
    /// literal string is appended unwrapped.
    pub fn append(&mut self, item: impl Into<Appendable>) {
        match item.into() {
            Appendable::Literal(text) => {
                if !text.is_empty() {
                    self.atoms.push(Atom::Literal(text));
                }
            }
            Appendable::Stream(stream) => {
                self.active_dependencies.insert(stream.clone());
                self.atoms.push(Atom::Ref(stream));
            }
            Appendable::Expression(nested) => {
                self.atoms.push(Atom::Literal("(".to_string()));
                self.atoms.extend(nested.atoms);
                self.atoms.push(Atom::Literal(")".to_string()));
                self.active_dependencies.extend(nested.active_dependencies);
            }
        }
    }

    /// Consumes `self`, appends `item`, and returns the result. Convenient
    /// for building expressions in a single chained expression.
    pub fn appending(mut self, item: impl Into<Appendable>) -> Self {
        self.append(item);
        self
    }

    /// Returns the atom sequence.
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Returns the set of streams this expression actively depends on.
    pub fn active_dependencies(&self) -> &HashSet<Stream> {
        &self.active_dependencies
    }

    /// Renders the expression as flattened target-language surface text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for atom in &self.atoms {
            use fmt::Write;
            let _ = write!(out, "{atom}");
        }
        out
    }

    /// Returns `true` if the expression has no atoms.
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.render() == other.render()
    }
}
impl Eq for Expression {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_expression_renders_empty_string() {
        let e = Expression::empty();
        assert_eq!(e.render(), "");
        assert!(e.active_dependencies().is_empty());
        assert!(e.is_empty());
    }

    #[test]
    fn append_literal_is_unwrapped() {
        let mut e = Expression::empty();
        e.append("1 + 1");
        assert_eq!(e.render(), "1 + 1");
    }

    #[test]
    fn append_stream_tracks_dependency() {
        let mut e = Expression::empty();
        let s = Stream::new("x");
        e.append(s.clone());
        assert_eq!(e.render(), "x");
        assert!(e.active_dependencies().contains(&s));
    }

    #[test]
    fn append_nested_expression_parenthesizes_and_unions_deps() {
        let mut inner = Expression::empty();
        inner.append(Stream::new("x"));
        inner.append(" + 1");

        let mut outer = Expression::empty();
        outer.append("y * ");
        outer.append(inner);

        assert_eq!(outer.render(), "y * (x + 1)");
        assert!(outer.active_dependencies().contains(&Stream::new("x")));
    }

    #[test]
    fn clone_is_structurally_independent() {
        let mut e = Expression::empty();
        e.append(Stream::new("x"));
        let mut cloned = e.clone();
        cloned.append(Stream::new("y"));

        assert_eq!(e.active_dependencies().len(), 1);
        assert_eq!(cloned.active_dependencies().len(), 2);
        assert_eq!(e.render(), "x");
        assert_eq!(cloned.render(), "xy");
    }

    #[test]
    fn duplicate_references_count_once() {
        let mut e = Expression::empty();
        e.append(Stream::new("x"));
        e.append(" + ");
        e.append(Stream::new("x"));
        assert_eq!(e.active_dependencies().len(), 1);
        assert_eq!(e.render(), "x + x");
    }

    #[test]
    fn empty_literal_fragment_is_dropped() {
        let mut e = Expression::empty();
        e.append("");
        assert!(e.atoms().is_empty());
    }

    #[test]
    fn equality_is_by_rendered_text() {
        let a = Expression::literal("x + 1");
        let mut b = Expression::empty();
        b.append("x + 1");
        assert_eq!(a, b);
    }
}
