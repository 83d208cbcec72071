use quaestio_protocol::{EdgeKind, Relation, Token};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("variable `{0}` is declared twice")]
    DuplicateVariable(String),
    #[error("a pattern needs at least one node variable")]
    Empty,
    #[error("edge `{relation}` refers to variable #{index}, which this pattern does not declare")]
    UnknownVariable { relation: String, index: usize },
}

/// Handle to a node variable, handed out by [`PatternBuilder::node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub(crate) usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A local test on a single token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodePredicate {
    /// No requirement.
    Any,
    /// Coarse or fine part of speech starts with the prefix, ignoring case (`V` for the verb class).
    PosPrefix(String),
    CoarsePos(String),
    FinePos(String),
    Lemma(String),
    /// Surface form, compared case-insensitively.
    Form(String),
    Feature { name: String, value: String },
    All(Vec<NodePredicate>),
    Not(Box<NodePredicate>),
}

impl NodePredicate {
    pub fn pos_prefix(prefix: impl Into<String>) -> Self {
        Self::PosPrefix(prefix.into())
    }

    pub fn matches(&self, token: &Token) -> bool {
        match self {
            Self::Any => true,
            Self::PosPrefix(prefix) => [token.coarse_pos(), token.fine_pos()]
                .into_iter()
                .flatten()
                .any(|tag| starts_with_ignore_case(tag, prefix)),
            Self::CoarsePos(tag) => token.coarse_pos() == Some(tag.as_str()),
            Self::FinePos(tag) => token.fine_pos() == Some(tag.as_str()),
            Self::Lemma(lemma) => token.lemma.as_deref() == Some(lemma.as_str()),
            Self::Form(form) => token.form.to_lowercase() == form.to_lowercase(),
            Self::Feature { name, value } => token.feature(name) == Some(value.as_str()),
            Self::All(all) => all.iter().all(|p| p.matches(token)),
            Self::Not(inner) => !inner.matches(token),
        }
    }
}

impl fmt::Display for NodePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => Ok(()),
            Self::PosPrefix(prefix) => write!(f, "pos:/{}.*/", prefix),
            Self::CoarsePos(tag) => write!(f, "upos:{}", tag),
            Self::FinePos(tag) => write!(f, "xpos:{}", tag),
            Self::Lemma(lemma) => write!(f, "lemma:{}", lemma),
            Self::Form(form) => write!(f, "word:/{}/i", form),
            Self::Feature { name, value } => write!(f, "{}:{}", name, value),
            Self::All(all) => {
                for (i, p) in all.iter().enumerate() {
                    if i > 0 {
                        f.write_str(";")?;
                    }
                    write!(f, "{}", p)?;
                }
                Ok(())
            }
            Self::Not(inner) => write!(f, "!{}", inner),
        }
    }
}

fn starts_with_ignore_case(tag: &str, prefix: &str) -> bool {
    tag.get(..prefix.len()).map_or(false, |head| head.eq_ignore_ascii_case(prefix))
}

/// Which edges may satisfy a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeScope {
    #[default]
    Any,
    PrimaryOnly,
}

impl EdgeScope {
    pub(crate) fn kind(self) -> Option<EdgeKind> {
        match self {
            Self::Any => None,
            Self::PrimaryOnly => Some(EdgeKind::Primary),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeConstraint {
    pub governor: VarId,
    pub dependent: VarId,
    pub relation: Relation,
    pub scope: EdgeScope,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeVar {
    name: String,
    predicate: NodePredicate,
}

/// A compiled graph query: named node predicates plus relation constraints.
///
/// Immutable once built; one value can be shared by any number of matchers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    nodes: Vec<NodeVar>,
    edges: Vec<EdgeConstraint>,
}

impl Pattern {
    pub fn builder() -> PatternBuilder {
        PatternBuilder::default()
    }

    pub fn var_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn var(&self, name: &str) -> Option<VarId> {
        self.nodes.iter().position(|n| n.name == name).map(VarId)
    }

    pub fn var_name(&self, var: VarId) -> &str {
        &self.nodes[var.0].name
    }

    pub fn predicate(&self, var: VarId) -> &NodePredicate {
        &self.nodes[var.0].predicate
    }

    pub fn edges(&self) -> &[EdgeConstraint] {
        &self.edges
    }
}

/// Semgrex-style rendering, e.g. `{pos:/V.*/}=verb >sb {}=subject`.
impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = |var: VarId| format!("{{{}}}={}", self.predicate(var), self.var_name(var));

        let mut parts = Vec::new();
        for edge in &self.edges {
            parts.push(format!("{} >{} {}", node(edge.governor), edge.relation, node(edge.dependent)));
        }
        for i in 0..self.nodes.len() {
            let var = VarId(i);
            if !self.edges.iter().any(|e| e.governor == var || e.dependent == var) {
                parts.push(node(var));
            }
        }
        f.write_str(&parts.join(" : "))
    }
}

#[derive(Debug, Default)]
pub struct PatternBuilder {
    nodes: Vec<NodeVar>,
    edges: Vec<EdgeConstraint>,
}

impl PatternBuilder {
    /// Declares a node variable. Variables are searched in declaration order.
    pub fn node(&mut self, name: impl Into<String>, predicate: NodePredicate) -> VarId {
        self.nodes.push(NodeVar { name: name.into(), predicate });
        VarId(self.nodes.len() - 1)
    }

    /// Requires a `relation` edge from `governor` to `dependent`.
    pub fn edge(&mut self, governor: VarId, relation: impl Into<Relation>, dependent: VarId) -> &mut Self {
        self.edge_in_scope(governor, relation, dependent, EdgeScope::Any)
    }

    pub fn edge_in_scope(
        &mut self,
        governor: VarId,
        relation: impl Into<Relation>,
        dependent: VarId,
        scope: EdgeScope,
    ) -> &mut Self {
        self.edges.push(EdgeConstraint { governor, dependent, relation: relation.into(), scope });
        self
    }

    pub fn build(self) -> Result<Pattern, PatternError> {
        if self.nodes.is_empty() {
            return Err(PatternError::Empty);
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if self.nodes[..i].iter().any(|other| other.name == node.name) {
                return Err(PatternError::DuplicateVariable(node.name.clone()));
            }
        }
        // A handle from another builder may index past `nodes`
        for edge in &self.edges {
            for var in [edge.governor, edge.dependent] {
                if var.0 >= self.nodes.len() {
                    return Err(PatternError::UnknownVariable {
                        relation: edge.relation.to_string(),
                        index: var.0,
                    });
                }
            }
        }
        Ok(Pattern { nodes: self.nodes, edges: self.edges })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quaestio_protocol::TokenIndex;

    fn tagged(upos: Option<&str>, xpos: Option<&str>) -> Token {
        let mut token = Token::new(TokenIndex(1), "Ist");
        token.upos = upos.map(str::to_string);
        token.xpos = xpos.map(str::to_string);
        token
    }

    #[test]
    fn test_pos_prefix_checks_both_tag_columns() {
        let verb_class = NodePredicate::pos_prefix("V");

        assert!(verb_class.matches(&tagged(Some("VERB"), None)));
        // Auxiliaries carry AUX as coarse tag but VAFIN as fine tag
        assert!(verb_class.matches(&tagged(Some("AUX"), Some("VAFIN"))));
        assert!(!verb_class.matches(&tagged(Some("PRON"), Some("PPER"))));
        assert!(!verb_class.matches(&tagged(None, None)));
        assert!(verb_class.matches(&tagged(Some("verb"), None)));
        assert!(verb_class.matches(&tagged(None, Some("vvfin"))));
        // The prefix length falls inside a multi-byte character
        assert!(!verb_class.matches(&tagged(Some("Ü"), None)));
    }

    #[test]
    fn test_compound_predicates() {
        let mut token = tagged(Some("PRON"), Some("PPER"));
        token.feats.insert("Person", "2");

        let second_person_pronoun = NodePredicate::All(vec![
            NodePredicate::CoarsePos("PRON".into()),
            NodePredicate::Feature { name: "Person".into(), value: "2".into() },
        ]);
        assert!(second_person_pronoun.matches(&token));
        assert!(!NodePredicate::Not(Box::new(second_person_pronoun)).matches(&token));
        assert!(NodePredicate::Form("ist".into()).matches(&token));
        assert!(!NodePredicate::Lemma("sein".into()).matches(&token));
    }

    #[test]
    fn test_builder_validation() {
        assert_eq!(Pattern::builder().build(), Err(PatternError::Empty));

        let mut builder = Pattern::builder();
        builder.node("x", NodePredicate::Any);
        builder.node("x", NodePredicate::Any);
        assert_eq!(builder.build(), Err(PatternError::DuplicateVariable("x".into())));
    }

    #[test]
    fn test_edge_to_foreign_variable_is_rejected() {
        let mut other = Pattern::builder();
        other.node("a", NodePredicate::Any);
        other.node("b", NodePredicate::Any);
        let foreign = other.node("c", NodePredicate::Any);

        let mut builder = Pattern::builder();
        let verb = builder.node("verb", NodePredicate::pos_prefix("V"));
        builder.node("subject", NodePredicate::Any);
        builder.edge(verb, "sb", foreign);

        assert_eq!(
            builder.build(),
            Err(PatternError::UnknownVariable { relation: "sb".into(), index: 2 })
        );
    }

    #[test]
    fn test_display_reads_like_semgrex() {
        let mut builder = Pattern::builder();
        let verb = builder.node("verb", NodePredicate::pos_prefix("V"));
        let subject = builder.node("subject", NodePredicate::Any);
        builder.edge(verb, "sb", subject);
        let pattern = builder.build().unwrap();

        assert_eq!(pattern.to_string(), "{pos:/V.*/}=verb >sb {}=subject");
        assert_eq!(pattern.var("subject"), Some(subject));
        assert_eq!(pattern.var("object"), None);
    }
}
