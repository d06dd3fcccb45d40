//! The dependency graph backing a [`crate::Specification`].
//!
//! One node per stream appearing in `inputs ∪ outputs ∪ (any referenced
//! dependency)`. An edge `u → v` means "the definition of `u` references
//! `v`". Only a forward adjacency index is kept — no operation specified
//! for this crate needs a reverse index (compare the upstream
//! `SymbolTable`, which likewise keeps only the indices its own
//! operations use).

use std::collections::{HashMap, HashSet};

use crate::stream::Stream;

/// Whether a graph node was created because the stream is a declared
/// input, or because it is (or was) a bound output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The stream is a declared input; it has no binding and no outgoing
    /// edges.
    Input,
    /// The stream is, or has been, a bound output.
    Output,
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    pinned: bool,
    outgoing: HashSet<Stream>,
}

/// The dependency graph itself: one [`Node`] per known stream.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: HashMap<Stream, Node>,
}

impl DependencyGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures a node exists for `stream` with kind [`NodeKind::Input`].
    /// Idempotent.
    pub fn ensure_input(&mut self, stream: &Stream) {
        self.nodes.entry(stream.clone()).or_insert_with(|| Node {
            kind: NodeKind::Input,
            pinned: false,
            outgoing: HashSet::new(),
        });
    }

    /// Ensures a node exists for `stream` with kind [`NodeKind::Output`],
    /// creating it if absent, and sets its `pinned` attribute to `pinned`
    /// (overriding any prior value — last-writer-wins, per
    /// `add_expression`'s contract).
    pub fn bind_output(&mut self, stream: &Stream, pinned: bool) {
        let node = self.nodes.entry(stream.clone()).or_insert_with(|| Node {
            kind: NodeKind::Output,
            pinned: false,
            outgoing: HashSet::new(),
        });
        node.kind = NodeKind::Output;
        node.pinned = pinned;
    }

    /// Replaces the outgoing edges of `stream` with exactly `deps`.
    /// Destination nodes are not created here — only `ensure_input` and
    /// `bind_output` create nodes — so an edge may legally point at a
    /// stream with no node yet (a forward reference); its destination is
    /// resolved by `is_input`/`is_pinned`/`has_node` lookups at
    /// collapse/prune time.
    pub fn set_outgoing(&mut self, stream: &Stream, deps: HashSet<Stream>) {
        if let Some(node) = self.nodes.get_mut(stream) {
            node.outgoing = deps;
        }
    }

    /// Removes the node for `stream` entirely, along with its outgoing
    /// edges. Incoming edges from streams that still exist are left
    /// dangling in those streams' `outgoing` sets; callers only ever
    /// prune streams that are already unreachable, so no remaining
    /// binding can reference a removed stream (see
    /// [`crate::Specification::prune`]).
    pub fn remove(&mut self, stream: &Stream) {
        self.nodes.remove(stream);
    }

    /// Returns `true` if a node exists for `stream` with kind
    /// [`NodeKind::Input`].
    pub fn is_input(&self, stream: &Stream) -> bool {
        matches!(
            self.nodes.get(stream),
            Some(Node {
                kind: NodeKind::Input,
                ..
            })
        )
    }

    /// Returns `true` if `stream` has an `Output` node (bound or
    /// previously bound).
    pub fn has_node(&self, stream: &Stream) -> bool {
        self.nodes.contains_key(stream)
    }

    /// Returns the `pinned` attribute of `stream`'s node, or `false` if it
    /// has no node.
    pub fn is_pinned(&self, stream: &Stream) -> bool {
        self.nodes.get(stream).map(|n| n.pinned).unwrap_or(false)
    }

    /// Returns the outgoing edges of `stream`, or an empty set if it has
    /// no node.
    pub fn outgoing(&self, stream: &Stream) -> HashSet<Stream> {
        self.nodes
            .get(stream)
            .map(|n| n.outgoing.clone())
            .unwrap_or_default()
    }

    /// Returns every stream reachable from `roots`, following outgoing
    /// edges, including the roots themselves.
    pub fn reachable_from(&self, roots: impl IntoIterator<Item = Stream>) -> HashSet<Stream> {
        let mut seen: HashSet<Stream> = HashSet::new();
        let mut stack: Vec<Stream> = roots.into_iter().collect();
        while let Some(stream) = stack.pop() {
            if seen.insert(stream.clone()) {
                if let Some(node) = self.nodes.get(&stream) {
                    for dep in &node.outgoing {
                        if !seen.contains(dep) {
                            stack.push(dep.clone());
                        }
                    }
                }
            }
        }
        seen
    }
}
