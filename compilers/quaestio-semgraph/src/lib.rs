pub mod graph;
pub mod matcher;
pub mod pattern;

pub use graph::{DependencyGraph, GraphBuilder, GraphError};
pub use matcher::{Match, Matcher};
pub use pattern::{EdgeConstraint, EdgeScope, NodePredicate, Pattern, PatternBuilder, PatternError, VarId};
