use crate::ids::TokenIndex;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered `name=value` pairs, as found in the features and metadata columns.
///
/// Order of appearance is preserved so a sentence can be written back unchanged.
/// Bare flags (`Foo` without `=`) are stored with an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Features(Vec<(String, String)>);

impl Features {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// First value recorded for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(key, _)| key == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for Features {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Renders the column form: `A=1|B=2`, or `_` when empty.
impl fmt::Display for Features {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("_");
        }
        for (i, (name, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            if value.is_empty() {
                f.write_str(name)?;
            } else {
                write!(f, "{}={}", name, value)?;
            }
        }
        Ok(())
    }
}

/// A dependency relation label such as `sb` (subject) or `nsubj:pass`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Relation(String);

impl Relation {
    /// Fallback label for a governed token whose relation column is empty.
    pub const UNSPECIFIED: &'static str = "dep";

    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is(&self, label: &str) -> bool {
        self.0 == label
    }
}

impl From<&str> for Relation {
    fn from(label: &str) -> Self {
        Self(String::from(label))
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Distinguishes the base tree from enhanced relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum EdgeKind {
    /// Head/relation columns: exactly one per non-root token.
    Primary,
    /// Secondary-edges column: may give a token additional governors.
    Secondary,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dependency {
    pub governor: TokenIndex,
    pub dependent: TokenIndex,
    pub relation: Relation,
    pub kind: EdgeKind,
}

impl Dependency {
    pub fn primary(governor: TokenIndex, dependent: TokenIndex, relation: Relation) -> Self {
        Self { governor, dependent, relation, kind: EdgeKind::Primary }
    }

    pub fn secondary(governor: TokenIndex, dependent: TokenIndex, relation: Relation) -> Self {
        Self { governor, dependent, relation, kind: EdgeKind::Secondary }
    }

    pub fn is_primary(&self) -> bool {
        self.kind == EdgeKind::Primary
    }
}

/// One word or punctuation unit of an annotated sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Token {
    pub index: TokenIndex,
    pub form: String,
    pub lemma: Option<String>,
    /// Coarse part of speech (e.g. `VERB`).
    pub upos: Option<String>,
    /// Fine, tagset-specific part of speech (e.g. `VVFIN`).
    pub xpos: Option<String>,
    pub feats: Features,
    /// `Some(TokenIndex::ROOT)` for the sentence root, `None` when unannotated.
    pub head: Option<TokenIndex>,
    pub deprel: Option<Relation>,
    pub misc: Features,
}

impl Token {
    pub fn new(index: TokenIndex, form: impl Into<String>) -> Self {
        Self {
            index,
            form: form.into(),
            lemma: None,
            upos: None,
            xpos: None,
            feats: Features::new(),
            head: None,
            deprel: None,
            misc: Features::new(),
        }
    }

    pub fn coarse_pos(&self) -> Option<&str> {
        self.upos.as_deref()
    }

    pub fn fine_pos(&self) -> Option<&str> {
        self.xpos.as_deref()
    }

    pub fn feature(&self, name: &str) -> Option<&str> {
        self.feats.get(name)
    }

    /// `false` only when the metadata column carries `SpaceAfter=No`.
    pub fn space_after(&self) -> bool {
        self.misc.get("SpaceAfter") != Some("No")
    }

    pub fn is_root(&self) -> bool {
        self.head.map_or(false, TokenIndex::is_root)
    }
}
