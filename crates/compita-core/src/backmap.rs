//! Node-to-token side table and diagnostic localization.
//!
//! The lowering step records, for selected nodes, the token that names them
//! and the first and last tokens they span. Analysis never reads this
//! table; only [`localize`] does, to turn a diagnostic's [`Site`] into a
//! [`SourceRange`].

use rustc_hash::{FxHashMap, FxHashSet};

use crate::ast::NodeId;
use crate::error::{SemanticError, Site};
use crate::span::{SourceRange, Token};

/// Tokens recorded for AST nodes during lowering.
#[derive(Debug, Clone, Default)]
pub struct Backmap {
    name_tokens: FxHashMap<NodeId, Token>,
    first_tokens: FxHashMap<NodeId, Token>,
    last_tokens: FxHashMap<NodeId, Token>,
    parenthesized: FxHashSet<NodeId>,
}

impl Backmap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the token naming a node (identifier, call, function).
    pub fn record_name(&mut self, node: NodeId, token: Token) {
        self.name_tokens.insert(node, token);
    }

    /// Record the first and last tokens a node spans.
    pub fn record_span(&mut self, node: NodeId, first: Token, last: Token) {
        self.first_tokens.insert(node, first);
        self.last_tokens.insert(node, last);
    }

    /// Remember that an expression was written inside parentheses.
    pub fn mark_parenthesized(&mut self, node: NodeId) {
        self.parenthesized.insert(node);
    }

    pub fn name_token(&self, node: NodeId) -> Option<&Token> {
        self.name_tokens.get(&node)
    }

    pub fn first_token(&self, node: NodeId) -> Option<&Token> {
        self.first_tokens.get(&node)
    }

    pub fn last_token(&self, node: NodeId) -> Option<&Token> {
        self.last_tokens.get(&node)
    }

    pub fn is_parenthesized(&self, node: NodeId) -> bool {
        self.parenthesized.contains(&node)
    }

    /// Source range of a single node.
    ///
    /// The name token wins when present; otherwise the range runs from the
    /// first token's start to the last token's end.
    pub fn range_of(&self, node: NodeId) -> Option<SourceRange> {
        if let Some(name) = self.name_tokens.get(&node) {
            return Some(name.range());
        }
        let first = self.first_tokens.get(&node)?;
        let last = self.last_tokens.get(&node).unwrap_or(first);
        Some(first.range().to(last.range()))
    }
}

/// Map a diagnostic back to the source text it is about.
///
/// Returns `None` when the lowering step recorded nothing for the site.
pub fn localize(error: &SemanticError, backmap: &Backmap) -> Option<SourceRange> {
    match error.site() {
        Site::Node(node) => backmap.range_of(node),
        Site::Between(from, to) => {
            let begin = backmap.range_of(from)?;
            let end = backmap.range_of(to)?;
            Some(begin.to(end))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Position;

    fn duplicate(node: u32) -> SemanticError {
        SemanticError::DuplicateDeclaration {
            name: "x".into(),
            site: Site::Node(NodeId::new(node)),
        }
    }

    #[test]
    fn name_token_preferred() {
        let mut backmap = Backmap::new();
        let node = NodeId::new(4);
        backmap.record_span(node, Token::new("int", 2, 0), Token::new("]", 2, 12));
        backmap.record_name(node, Token::new("x", 2, 4));

        let range = localize(&duplicate(4), &backmap);
        assert_eq!(
            range,
            Some(SourceRange::new(Position::new(2, 4), Position::new(2, 5)))
        );
    }

    #[test]
    fn first_to_last_span() {
        let mut backmap = Backmap::new();
        let node = NodeId::new(1);
        backmap.record_span(node, Token::new("a", 3, 2), Token::new("\"multi\nline\"", 3, 10));

        let range = localize(&duplicate(1), &backmap);
        assert_eq!(
            range,
            Some(SourceRange::new(Position::new(3, 2), Position::new(4, 5)))
        );
    }

    #[test]
    fn node_pair_spans_both() {
        let mut backmap = Backmap::new();
        backmap.record_name(NodeId::new(1), Token::new("f", 1, 0));
        backmap.record_name(NodeId::new(2), Token::new("g", 5, 8));
        let err = SemanticError::VoidInExpression {
            site: Site::Between(NodeId::new(1), NodeId::new(2)),
        };
        assert_eq!(
            localize(&err, &backmap),
            Some(SourceRange::new(Position::new(1, 0), Position::new(5, 9)))
        );
    }

    #[test]
    fn unknown_node_is_unlocalized() {
        let backmap = Backmap::new();
        assert_eq!(localize(&duplicate(99), &backmap), None);
        assert!(!backmap.is_parenthesized(NodeId::new(99)));
    }
}
