use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use quaestio_protocol::{Dependency, EdgeKind, Token, TokenIndex};
use std::fmt::Write as _;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("token {0} is not part of the sentence")]
    UnknownToken(TokenIndex),
    #[error("expected token {expected}, found token {found}")]
    IndexOutOfOrder { expected: TokenIndex, found: TokenIndex },
    #[error("a sentence needs at least one token")]
    Empty,
}

/// Labeled directed multigraph over the tokens of one sentence.
///
/// Node `i` of the underlying petgraph holds the token with index `i + 1`, so
/// lookups by token index are O(1) and node order is token order. Secondary
/// edges may give a token several governors; nothing here assumes a tree or
/// acyclicity.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    graph: DiGraph<Token, Dependency>,
    comments: Vec<String>,
}

impl DependencyGraph {
    pub fn builder() -> GraphBuilder {
        GraphBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn token(&self, index: TokenIndex) -> Option<&Token> {
        node_of(index).and_then(|node| self.graph.node_weight(node))
    }

    /// All tokens in index order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> + '_ {
        self.graph.raw_nodes().iter().map(|node| &node.weight)
    }

    /// All edges in the order they were added.
    pub fn edges(&self) -> impl Iterator<Item = &Dependency> + '_ {
        self.graph.raw_edges().iter().map(|edge| &edge.weight)
    }

    /// Edges governed by `index`, optionally restricted to one relation label.
    pub fn outgoing(&self, index: TokenIndex, relation: Option<&str>) -> Vec<&Dependency> {
        self.adjacent(index, Direction::Outgoing, relation)
    }

    /// Edges whose dependent is `index`, optionally restricted to one relation label.
    pub fn incoming(&self, index: TokenIndex, relation: Option<&str>) -> Vec<&Dependency> {
        self.adjacent(index, Direction::Incoming, relation)
    }

    fn adjacent(&self, index: TokenIndex, dir: Direction, relation: Option<&str>) -> Vec<&Dependency> {
        let Some(node) = self.node(index) else {
            return Vec::new();
        };

        // petgraph walks adjacency lists newest-first; report insertion order instead
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(node, dir)
            .filter(|edge| relation.map_or(true, |label| edge.weight().relation.is(label)))
            .collect();
        edges.sort_by_key(|edge| edge.id());
        edges.into_iter().map(|edge| edge.weight()).collect()
    }

    /// Whether `governor -> dependent` carries `relation`, optionally of one edge kind only.
    pub fn has_edge(
        &self,
        governor: TokenIndex,
        dependent: TokenIndex,
        relation: &str,
        kind: Option<EdgeKind>,
    ) -> bool {
        let (Some(from), Some(to)) = (self.node(governor), self.node(dependent)) else {
            return false;
        };

        self.graph.edges_connecting(from, to).any(|edge| {
            let dep = edge.weight();
            dep.relation.is(relation) && kind.map_or(true, |k| dep.kind == k)
        })
    }

    /// Distinct governors of `index` across all edge kinds, in index order.
    pub fn governors(&self, index: TokenIndex) -> Vec<&Token> {
        self.neighbours(index, Direction::Incoming)
    }

    /// Distinct dependents of `index` across all edge kinds, in index order.
    pub fn dependents(&self, index: TokenIndex) -> Vec<&Token> {
        self.neighbours(index, Direction::Outgoing)
    }

    fn neighbours(&self, index: TokenIndex, dir: Direction) -> Vec<&Token> {
        let Some(node) = self.node(index) else {
            return Vec::new();
        };

        let mut nodes: Vec<NodeIndex> = self.graph.neighbors_directed(node, dir).collect();
        nodes.sort();
        nodes.dedup();
        nodes.into_iter().map(|n| &self.graph[n]).collect()
    }

    /// Tokens without an incoming primary edge.
    pub fn roots(&self) -> impl Iterator<Item = &Token> + '_ {
        self.graph.node_indices().filter_map(move |node| {
            let governed = self
                .graph
                .edges_directed(node, Direction::Incoming)
                .any(|edge| edge.weight().is_primary());
            (!governed).then(|| &self.graph[node])
        })
    }

    /// Surface forms joined by single spaces, in index order.
    pub fn sentence_text(&self) -> String {
        let forms: Vec<&str> = self.tokens().map(|t| t.form.as_str()).collect();
        forms.join(" ")
    }

    /// Surface forms joined the way they appeared, honoring `SpaceAfter=No`.
    pub fn detokenized_text(&self) -> String {
        let mut text = String::new();
        let mut tokens = self.tokens().peekable();
        while let Some(token) = tokens.next() {
            text.push_str(&token.form);
            if token.space_after() && tokens.peek().is_some() {
                text.push(' ');
            }
        }
        text
    }

    /// Raw comment lines, without the leading `#`.
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// Value of a `# key = value` comment.
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.comments.iter().find_map(|comment| {
            let (name, value) = comment.split_once('=')?;
            (name.trim() == key).then(|| value.trim())
        })
    }

    pub fn sent_id(&self) -> Option<&str> {
        self.metadata("sent_id")
    }

    /// The sentence as the annotator received it (`# text = ...`), if recorded.
    pub fn original_text(&self) -> Option<&str> {
        self.metadata("text")
    }

    /// Renders the sentence back into the ten-column annotation format.
    pub fn to_conllu(&self) -> String {
        let mut out = String::new();
        for comment in &self.comments {
            let _ = writeln!(out, "# {}", comment);
        }

        for token in self.tokens() {
            let secondary: Vec<String> = self
                .incoming(token.index, None)
                .into_iter()
                .filter(|dep| dep.kind == EdgeKind::Secondary)
                .map(|dep| format!("{}:{}", dep.governor, dep.relation))
                .collect();

            let _ = writeln!(
                out,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                token.index,
                token.form,
                token.lemma.as_deref().unwrap_or("_"),
                token.upos.as_deref().unwrap_or("_"),
                token.xpos.as_deref().unwrap_or("_"),
                token.feats,
                token.head.map_or_else(|| "_".to_string(), |h| h.to_string()),
                token.deprel.as_ref().map_or("_", |r| r.as_str()),
                if secondary.is_empty() { "_".to_string() } else { secondary.join("|") },
                token.misc,
            );
        }
        out
    }

    fn node(&self, index: TokenIndex) -> Option<NodeIndex> {
        node_of(index).filter(|node| node.index() < self.graph.node_count())
    }
}

fn node_of(index: TokenIndex) -> Option<NodeIndex> {
    (index.get() as usize).checked_sub(1).map(NodeIndex::new)
}

impl PartialEq for DependencyGraph {
    fn eq(&self, other: &Self) -> bool {
        self.comments == other.comments
            && self.tokens().eq(other.tokens())
            && self.edges().eq(other.edges())
    }
}

impl Eq for DependencyGraph {}

#[cfg(feature = "serde")]
impl serde::Serialize for DependencyGraph {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("DependencyGraph", 3)?;
        state.serialize_field("sentId", &self.sent_id())?;
        state.serialize_field("tokens", &self.tokens().collect::<Vec<_>>())?;
        state.serialize_field("edges", &self.edges().collect::<Vec<_>>())?;
        state.end()
    }
}

/// Assembles a [`DependencyGraph`]: tokens first, in index order, then edges.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: DiGraph<Token, Dependency>,
    comments: Vec<String>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn comment(&mut self, comment: impl Into<String>) -> &mut Self {
        self.comments.push(comment.into());
        self
    }

    /// Appends a token. Indices must run 1, 2, 3, ... without gaps.
    pub fn add_token(&mut self, token: Token) -> Result<TokenIndex, GraphError> {
        let expected = TokenIndex::new(self.graph.node_count() as u32 + 1);
        if token.index != expected {
            return Err(GraphError::IndexOutOfOrder { expected, found: token.index });
        }
        self.graph.add_node(token);
        Ok(expected)
    }

    /// Adds an edge between two tokens already added. The artificial root is not a node.
    pub fn add_dependency(&mut self, dependency: Dependency) -> Result<(), GraphError> {
        let governor = self.existing(dependency.governor)?;
        let dependent = self.existing(dependency.dependent)?;
        self.graph.add_edge(governor, dependent, dependency);
        Ok(())
    }

    pub fn token_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn build(self) -> Result<DependencyGraph, GraphError> {
        if self.graph.node_count() == 0 {
            return Err(GraphError::Empty);
        }
        Ok(DependencyGraph { graph: self.graph, comments: self.comments })
    }

    fn existing(&self, index: TokenIndex) -> Result<NodeIndex, GraphError> {
        node_of(index)
            .filter(|node| node.index() < self.graph.node_count())
            .ok_or(GraphError::UnknownToken(index))
    }
}
