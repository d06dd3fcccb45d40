//! The `Specification` aggregate (component C4): inputs, ordered outputs,
//! their bindings, and the dependency graph that ties them together.

use std::collections::HashSet;
use std::fmt;

use crate::error::{Error, Result};
use crate::expr::{Atom, Expression};
use crate::graph::DependencyGraph;
use crate::serialize;
use crate::stream::Stream;

/// Owns the input set, the output sequence, the stream → expression
/// bindings, and the dependency graph, and exposes the mutating
/// operations (`declare_input`, `add_expression`, `collapse_expression`,
/// `prune`) plus serialization.
///
/// Every mutating operation either succeeds and restores invariants
/// S1–S5 (see the crate-level documentation), or fails and leaves the
/// `Specification` unchanged.
#[derive(Debug, Clone, Default)]
pub struct Specification {
    inputs: Vec<Stream>,
    outputs: Vec<Stream>,
    bindings: std::collections::HashMap<Stream, Expression>,
    graph: DependencyGraph,
}

impl Specification {
    /// Creates an empty specification: no inputs, no outputs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `stream` as an external input, appending it to the input
    /// set unless it is already present. No binding is created.
    ///
    /// Must be called before any `add_expression` call on the same
    /// stream; attempting to declare an already-bound stream as an input
    /// afterward is a caller error this method does not guard against
    /// (the reverse ordering — binding an already-declared input — *is*
    /// guarded, by [`Error::InputRebinding`] in [`Self::add_expression`]).
    pub fn declare_input(&mut self, stream: impl Into<Stream>) {
        let stream = stream.into();
        if !self.inputs.contains(&stream) {
            self.inputs.push(stream.clone());
        }
        self.graph.ensure_input(&stream);
    }

    /// Binds `stream` to `expr`. If `stream` is not yet in `outputs` it is
    /// appended (preserving insertion order on subsequent calls); if it
    /// is already bound, the prior expression and `pinned` value are
    /// replaced wholesale (last-writer-wins for `pinned`).
    ///
    /// Fails with [`Error::InputRebinding`] if `stream` was declared as
    /// an input. Does not validate that referenced dependencies are
    /// themselves declared or bound — unresolved references are only
    /// detected by [`Self::collapse_expression`].
    pub fn add_expression(
        &mut self,
        stream: impl Into<Stream>,
        expr: Expression,
        pinned: bool,
    ) -> Result<()> {
        let stream = stream.into();
        if self.graph.is_input(&stream) {
            return Err(Error::InputRebinding { stream });
        }

        if !self.bindings.contains_key(&stream) {
            self.outputs.push(stream.clone());
        }
        self.graph.bind_output(&stream, pinned);
        let deps = expr.active_dependencies().clone();
        self.bindings.insert(stream.clone(), expr);
        self.graph.set_outgoing(&stream, deps);
        Ok(())
    }

    /// Substitutes into `stream`'s defining expression the full
    /// definitions of all referenced streams that are unpinned and not
    /// inputs, recursively, until every remaining reference is to an
    /// input or a pinned stream. `stream`'s own `pinned` attribute and
    /// position in `outputs` are unaffected; no other binding is
    /// modified.
    ///
    /// Fails with [`Error::UnknownStream`] if `stream` has no binding,
    /// [`Error::UnresolvedReference`] if a transitively-referenced stream
    /// has neither a binding nor input status, or
    /// [`Error::CyclicDependency`] if a stream is re-entered while still
    /// being collapsed (a cycle in the binding graph).
    pub fn collapse_expression(&mut self, stream: &Stream) -> Result<()> {
        if !self.bindings.contains_key(stream) {
            return Err(Error::UnknownStream {
                stream: stream.clone(),
            });
        }

        let mut in_progress = HashSet::new();
        in_progress.insert(stream.clone());
        let collapsed = self.collapse_body(stream, &mut in_progress)?;

        let deps = collapsed.active_dependencies().clone();
        self.bindings.insert(stream.clone(), collapsed);
        self.graph.set_outgoing(stream, deps);
        Ok(())
    }

    /// Pure, recursive substitution step shared by every level of a
    /// `collapse_expression` call. `in_progress` tracks streams on the
    /// current recursion path so a re-entered stream is caught before it
    /// recurses unboundedly.
    fn collapse_body(&self, stream: &Stream, in_progress: &mut HashSet<Stream>) -> Result<Expression> {
        let expr = self
            .bindings
            .get(stream)
            .expect("caller only recurses into streams already known to be bound");

        let mut result = Expression::empty();
        for atom in expr.atoms() {
            match atom {
                Atom::Literal(text) => result.append(text.clone()),
                Atom::Ref(t) => {
                    if self.graph.is_input(t) {
                        result.append(t.name().to_string());
                    } else if !self.bindings.contains_key(t) {
                        return Err(Error::UnresolvedReference { stream: t.clone() });
                    } else if self.graph.is_pinned(t) {
                        result.append(t.clone());
                    } else {
                        if !in_progress.insert(t.clone()) {
                            return Err(Error::CyclicDependency { stream: t.clone() });
                        }
                        let nested = self.collapse_body(t, in_progress)?;
                        in_progress.remove(t);
                        result.append(nested);
                    }
                }
            }
        }
        Ok(result)
    }

    /// Removes every bound output not reachable, along outgoing
    /// (dependency) edges, from the union of pinned outputs and inputs.
    /// Inputs are never removed. The relative order of surviving outputs
    /// is preserved.
    pub fn prune(&mut self) {
        let roots = self
            .outputs
            .iter()
            .filter(|s| self.graph.is_pinned(s))
            .cloned()
            .chain(self.inputs.iter().cloned());
        let reachable = self.graph.reachable_from(roots);

        let mut survivors = Vec::with_capacity(self.outputs.len());
        for stream in self.outputs.drain(..) {
            if reachable.contains(&stream) {
                survivors.push(stream);
            } else {
                self.bindings.remove(&stream);
                self.graph.remove(&stream);
            }
        }
        self.outputs = survivors;
    }

    /// Returns the declared inputs, in insertion order.
    pub fn inputs(&self) -> &[Stream] {
        &self.inputs
    }

    /// Returns the bound outputs, in insertion order (modulo removal by
    /// `prune`).
    pub fn outputs(&self) -> &[Stream] {
        &self.outputs
    }

    /// Returns the current binding of `stream`, if any.
    pub fn binding(&self, stream: &Stream) -> Option<&Expression> {
        self.bindings.get(stream)
    }

    /// Returns `true` if `stream` is pinned (protected from `prune` and
    /// from substitution by dependents' `collapse_expression`).
    pub fn is_pinned(&self, stream: &Stream) -> bool {
        self.graph.is_pinned(stream)
    }

    /// Writes the textual serialization (§6 of the specification) to
    /// `sink`. Errors from the sink propagate as [`Error::SerializeIo`].
    pub fn serialize<W: std::io::Write>(&self, sink: &mut W) -> Result<()> {
        serialize::write(self, sink)
    }

    /// Renders the textual serialization to an owned `String`.
    pub fn to_text(&self) -> String {
        let mut buf = Vec::new();
        self.serialize(&mut buf)
            .expect("writing to an in-memory Vec<u8> cannot fail");
        String::from_utf8(buf)
            .expect("every atom renders from Display'able UTF-8 stream names and literal text")
    }
}

impl fmt::Display for Specification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}
