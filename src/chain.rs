//! Chain operator helpers (component C3): build expressions of the form
//! `e₁ OP e₂ OP … OP eₙ` for the target language's binary infix operators,
//! plus unary negation and the conditional trinary.

use crate::expr::{Appendable, Expression};
use crate::stream::Stream;

/// An operand accepted by [`chain`] and the comparison/logical helpers.
///
/// Matches the append rules of [`Expression`]: a bare literal string is
/// parenthesized when chained, a bare [`Stream`] is not, and a nested
/// [`Expression`] is parenthesized (and its dependencies unioned in) the
/// same way [`Expression::append`] would.
pub enum Operand {
    /// A literal operand; rendered as `(text)`.
    Literal(String),
    /// A stream operand; rendered as its bare name, not parenthesized.
    Stream(Stream),
    /// A sub-expression operand; rendered parenthesized.
    Expression(Expression),
}

impl From<&str> for Operand {
    fn from(text: &str) -> Self {
        Operand::Literal(text.to_string())
    }
}

impl From<String> for Operand {
    fn from(text: String) -> Self {
        Operand::Literal(text)
    }
}

impl From<Stream> for Operand {
    fn from(stream: Stream) -> Self {
        Operand::Stream(stream)
    }
}

impl From<&Stream> for Operand {
    fn from(stream: &Stream) -> Self {
        Operand::Stream(stream.clone())
    }
}

impl From<Expression> for Operand {
    fn from(expr: Expression) -> Self {
        Operand::Expression(expr)
    }
}

fn operand_as_appendable(operand: Operand) -> Appendable {
    match operand {
        Operand::Literal(text) if text.is_empty() => Appendable::Literal(String::new()),
        Operand::Literal(text) => Appendable::Literal(format!("({text})")),
        Operand::Stream(stream) => Appendable::Stream(stream),
        Operand::Expression(expr) => Appendable::Expression(expr),
    }
}

/// Builds `e₁ S e₂ S … S eₙ` for the infix symbol `symbol`, from operands
/// `[e₁, …, eₙ]`. An empty operand list yields the empty expression; a
/// singleton yields that one operand with no operator inserted.
pub fn chain(operands: impl IntoIterator<Item = impl Into<Operand>>, symbol: &str) -> Expression {
    let mut result = Expression::empty();
    let mut first = true;
    for operand in operands {
        if !first {
            result.append(format!(" {symbol} "));
        }
        result.append(operand_as_appendable(operand.into()));
        first = false;
    }
    result
}

/// `e₁ && e₂ && … && eₙ`
pub fn and_all(operands: impl IntoIterator<Item = impl Into<Operand>>) -> Expression {
    chain(operands, "&&")
}

/// `e₁ || e₂ || … || eₙ`
pub fn or_all(operands: impl IntoIterator<Item = impl Into<Operand>>) -> Expression {
    chain(operands, "||")
}

/// `e₁ + e₂ + … + eₙ`
pub fn add_all(operands: impl IntoIterator<Item = impl Into<Operand>>) -> Expression {
    chain(operands, "+")
}

/// `lhs < rhs`
pub fn lt(lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Expression {
    chain([lhs.into(), rhs.into()], "<")
}

/// `lhs <= rhs`
pub fn leq(lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Expression {
    chain([lhs.into(), rhs.into()], "<=")
}

/// `lhs > rhs`
pub fn gt(lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Expression {
    chain([lhs.into(), rhs.into()], ">")
}

/// `lhs >= rhs`
pub fn geq(lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Expression {
    chain([lhs.into(), rhs.into()], ">=")
}

/// `lhs == rhs`
pub fn eq(lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Expression {
    chain([lhs.into(), rhs.into()], "==")
}

/// `lhs != rhs`
pub fn neq(lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Expression {
    chain([lhs.into(), rhs.into()], "!=")
}

/// `!(expr)`
pub fn not(expr: impl Into<Operand>) -> Expression {
    let mut result = Expression::literal("!(");
    result.append(operand_as_appendable(expr.into()));
    result.append(")");
    result
}

/// `if (cond) then (then_expr) else (else_expr)`
pub fn conditional(
    cond: impl Into<Operand>,
    then_expr: impl Into<Operand>,
    else_expr: impl Into<Operand>,
) -> Expression {
    let mut result = Expression::literal("if ");
    result.append(operand_as_appendable(cond.into()));
    result.append(" then ");
    result.append(operand_as_appendable(then_expr.into()));
    result.append(" else ");
    result.append(operand_as_appendable(else_expr.into()));
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_of_literals_is_parenthesized_per_operand() {
        let e = chain(["a", "b", "c"], "&&");
        assert_eq!(e.render(), "(a) && (b) && (c)");
    }

    #[test]
    fn chain_of_streams_is_not_parenthesized() {
        let e = and_all([Stream::new("a"), Stream::new("b")]);
        assert_eq!(e.render(), "a && b");
    }

    #[test]
    fn chain_of_expressions_is_parenthesized() {
        let e = and_all([Expression::literal("a"), Expression::literal("b")]);
        assert_eq!(e.render(), "(a) && (b)");
    }

    #[test]
    fn empty_chain_is_empty_expression() {
        let e: Expression = chain(Vec::<Expression>::new(), "&&");
        assert!(e.is_empty());
    }

    #[test]
    fn singleton_chain_has_no_operator() {
        let e = chain(["a"], "&&");
        assert_eq!(e.render(), "(a)");
    }

    #[test]
    fn comparison_helpers() {
        assert_eq!(lt("a", "b").render(), "(a) < (b)");
        assert_eq!(leq("a", "b").render(), "(a) <= (b)");
        assert_eq!(gt("a", "b").render(), "(a) > (b)");
        assert_eq!(geq("a", "b").render(), "(a) >= (b)");
        assert_eq!(eq("a", "b").render(), "(a) == (b)");
        assert_eq!(neq("a", "b").render(), "(a) != (b)");
    }

    #[test]
    fn not_wraps_in_bang_parens() {
        let e = not(Stream::new("flag"));
        assert_eq!(e.render(), "!(flag)");
    }

    #[test]
    fn conditional_renders_if_then_else() {
        let e = conditional("cond", "1", "0");
        assert_eq!(e.render(), "if (cond) then (1) else (0)");
    }

    #[test]
    fn chain_tracks_dependencies_of_stream_operands() {
        let e = and_all([Stream::new("a"), Stream::new("b")]);
        assert!(e.active_dependencies().contains(&Stream::new("a")));
        assert!(e.active_dependencies().contains(&Stream::new("b")));
    }
}
