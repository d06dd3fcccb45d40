//! Parser for expressions written as a textual template with embedded,
//! delimited stream-reference tokens (component C7 of the specification).
//!
//! Two interchangeable delimiter pairs are recognized so callers can pick
//! whichever reads better in a given template without conflicting with
//! literal text: `›name‹` and `»name«`. A single template may freely mix
//! both pairs; a token just has to open and close with the same pair.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::expr::Expression;
use crate::stream::Stream;

const OPEN_A: char = '\u{203a}'; // ›
const CLOSE_A: char = '\u{2039}'; // ‹
const OPEN_B: char = '\u{00bb}'; // »
const CLOSE_B: char = '\u{00ab}'; // «

fn matching_close(open: char) -> char {
    match open {
        OPEN_A => CLOSE_A,
        OPEN_B => CLOSE_B,
        _ => unreachable!("only called with a recognized opening delimiter"),
    }
}

fn is_open(ch: char) -> bool {
    ch == OPEN_A || ch == OPEN_B
}

fn is_close(ch: char) -> bool {
    ch == CLOSE_A || ch == CLOSE_B
}

/// Parses `text` into an [`Expression`], resolving any delimited stream
/// references against `table`.
///
/// Text between (and outside) delimited tokens is preserved verbatim as
/// literal fragments; empty fragments are dropped. See the module
/// documentation for the delimiter grammar.
pub fn parse(text: &str, table: Option<&HashMap<String, Stream>>) -> Result<Expression> {
    let mut expr = Expression::empty();
    let mut literal_start = 0usize;

    // Active token, if we're currently inside a pair of delimiters:
    // (byte offset of the opening delimiter, the delimiter opened with).
    let mut open_token: Option<(usize, char)> = None;

    for (idx, ch) in text.char_indices() {
        if let Some((token_start, open_char)) = open_token {
            if ch == matching_close(open_char) {
                let content_start = token_start + open_char.len_utf8();
                let token_end = idx + ch.len_utf8();
                let key = &text[content_start..idx];

                let Some(table) = table else {
                    return Err(Error::MissingTable {
                        span: token_start..token_end,
                    });
                };
                match table.get(key) {
                    Some(stream) => expr.append(stream.clone()),
                    None => {
                        return Err(Error::UnknownReference {
                            name: key.to_string(),
                            span: token_start..token_end,
                        });
                    }
                }

                literal_start = token_end;
                open_token = None;
            } else if is_open(ch) {
                return Err(Error::MalformedTemplate {
                    message: "nested opening delimiter before the current token was closed"
                        .to_string(),
                    span: idx..idx + ch.len_utf8(),
                });
            } else if is_close(ch) {
                return Err(Error::MalformedTemplate {
                    message: "closing delimiter does not match the pair it was opened with"
                        .to_string(),
                    span: token_start..idx + ch.len_utf8(),
                });
            }
            // otherwise: ordinary character inside the token's key text
        } else if is_open(ch) {
            if idx > literal_start {
                expr.append(text[literal_start..idx].to_string());
            }
            open_token = Some((idx, ch));
        } else if is_close(ch) {
            return Err(Error::MalformedTemplate {
                message: "closing delimiter with no matching opening delimiter".to_string(),
                span: idx..idx + ch.len_utf8(),
            });
        }
    }

    if let Some((token_start, _)) = open_token {
        return Err(Error::MalformedTemplate {
            message: "unterminated stream reference: opening delimiter never closed".to_string(),
            span: token_start..text.len(),
        });
    }

    if literal_start < text.len() {
        expr.append(text[literal_start..].to_string());
    }

    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(&str, &str)]) -> HashMap<String, Stream> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Stream::new(*v)))
            .collect()
    }

    #[test]
    fn plain_literal_needs_no_table() {
        let e = parse("1 + 1", None).unwrap();
        assert_eq!(e.render(), "1 + 1");
        assert!(e.active_dependencies().is_empty());
    }

    #[test]
    fn resolves_pair_a_reference() {
        let t = table(&[("x", "x_stream")]);
        let e = parse("›x‹ + 1", Some(&t)).unwrap();
        assert_eq!(e.render(), "x_stream + 1");
    }

    #[test]
    fn resolves_pair_b_reference() {
        let t = table(&[("PosX", "px")]);
        let e = parse("»PosX« <= 0", Some(&t)).unwrap();
        assert_eq!(e.render(), "px <= 0");
    }

    #[test]
    fn mixes_both_pairs_in_one_template() {
        let t = table(&[("x", "xs"), ("y", "ys")]);
        let e = parse("›x‹ + »y«", Some(&t)).unwrap();
        assert_eq!(e.render(), "xs + ys");
    }

    #[test]
    fn unknown_reference_is_an_error_with_span() {
        let t = table(&[("x", "xs")]);
        let err = parse("›z‹", Some(&t)).unwrap_err();
        match err {
            Error::UnknownReference { name, span } => {
                assert_eq!(name, "z");
                assert_eq!(span, 0.."›z‹".len());
            }
            other => panic!("expected UnknownReference, got {other:?}"),
        }
    }

    #[test]
    fn missing_table_is_an_error() {
        let err = parse("›x‹", None).unwrap_err();
        assert!(matches!(err, Error::MissingTable { .. }));
    }

    #[test]
    fn unterminated_delimiter_is_malformed() {
        let err = parse("›x + 1", None).unwrap_err();
        assert!(matches!(err, Error::MalformedTemplate { .. }));
    }

    #[test]
    fn stray_close_is_malformed() {
        let err = parse("x‹ + 1", None).unwrap_err();
        assert!(matches!(err, Error::MalformedTemplate { .. }));
    }

    #[test]
    fn mismatched_pair_is_malformed() {
        let t = table(&[("x", "xs")]);
        let err = parse("›x«", Some(&t)).unwrap_err();
        assert!(matches!(err, Error::MalformedTemplate { .. }));
    }

    #[test]
    fn empty_fragments_between_adjacent_tokens_are_dropped() {
        let t = table(&[("x", "xs"), ("y", "ys")]);
        let e = parse("›x‹›y‹", Some(&t)).unwrap();
        assert_eq!(e.atoms().len(), 2);
        assert_eq!(e.render(), "xsys");
    }
}
