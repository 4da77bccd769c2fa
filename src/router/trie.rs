//! Segment trie used for per-method route matching
//!
//! Each HTTP method owns one tree. A node stands for one segment position
//! and, when it terminates a registered route, remembers the full registered
//! pattern string. Handlers are not stored here: the router maps the
//! matched pattern back to its handler.
//!
//! ## Matching rules
//!
//! - Literal children match an identical path segment
//! - Wildcard children (`:name`, `*name`) match any segment
//! - A `*name` node terminates the search no matter how many path
//!   segments remain
//! - Children are tried depth-first in registration order; the first
//!   complete match wins, there is no literal-over-wildcard precedence
//!
//! Children are keyed by their exact segment text, so `/users/:id/posts`
//! and `/users/:uid/comments` get separate wildcard children and each
//! keeps its own parameter names.

use std::sync::Arc;

/// Node in the segment trie
#[derive(Debug, Clone, Default)]
pub(crate) struct TrieNode {
    /// Segment text this node matches on (empty for the root)
    part: String,
    /// Set for `:name` and `*name` segments
    is_wild: bool,
    /// Full registered pattern, present only on nodes that terminate a route
    pattern: Option<Arc<str>>,
    /// Child nodes, in registration order
    children: Vec<TrieNode>,
}

impl TrieNode {
    /// Create an empty root node
    pub(crate) fn root() -> Self {
        Self::default()
    }

    fn new(part: &str) -> Self {
        Self {
            part: part.to_string(),
            is_wild: part.starts_with(':') || part.starts_with('*'),
            pattern: None,
            children: Vec::new(),
        }
    }

    /// The pattern registered at this node, if any
    pub(crate) fn pattern(&self) -> Option<&Arc<str>> {
        self.pattern.as_ref()
    }

    /// Insert `pattern` along `parts`, starting at `depth`.
    ///
    /// Re-inserting at an existing terminal node overwrites the stored
    /// pattern; the last registration wins.
    pub(crate) fn insert(&mut self, pattern: &Arc<str>, parts: &[&str], depth: usize) {
        let Some(part) = parts.get(depth) else {
            self.pattern = Some(Arc::clone(pattern));
            return;
        };

        let idx = match self.children.iter().position(|c| c.part == *part) {
            Some(idx) => idx,
            None => {
                self.children.push(TrieNode::new(part));
                self.children.len() - 1
            }
        };
        self.children[idx].insert(pattern, parts, depth + 1);
    }

    /// Find the first node that matches `parts` from `depth` onwards.
    ///
    /// Scaffolding nodes that were only created on the way to deeper
    /// routes never match.
    pub(crate) fn search(&self, parts: &[&str], depth: usize) -> Option<&TrieNode> {
        if depth == parts.len() || self.part.starts_with('*') {
            return self.pattern.as_ref().map(|_| self);
        }

        let part = parts[depth];
        self.children
            .iter()
            .filter(|child| child.is_wild || child.part == part)
            .find_map(|child| child.search(parts, depth + 1))
    }

    /// Collect every registered pattern below (and including) this node
    pub(crate) fn collect_patterns(&self, out: &mut Vec<Arc<str>>) {
        if let Some(pattern) = &self.pattern {
            out.push(Arc::clone(pattern));
        }
        for child in &self.children {
            child.collect_patterns(out);
        }
    }
}
