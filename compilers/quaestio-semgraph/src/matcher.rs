use crate::graph::DependencyGraph;
use crate::pattern::{Pattern, VarId};
use quaestio_protocol::{EdgeKind, Token, TokenIndex};
use std::ops::ControlFlow;
use tracing::trace;

/// One satisfying assignment of tokens to the pattern's variables.
#[derive(Debug, Clone)]
pub struct Match<'p, 'g> {
    pattern: &'p Pattern,
    graph: &'g DependencyGraph,
    bindings: Vec<TokenIndex>,
}

impl<'p, 'g> Match<'p, 'g> {
    /// Token bound to the variable called `name`.
    pub fn get(&self, name: &str) -> Option<&'g Token> {
        self.pattern.var(name).and_then(|var| self.token(var))
    }

    pub fn token(&self, var: VarId) -> Option<&'g Token> {
        self.bindings.get(var.index()).and_then(|&index| self.graph.token(index))
    }

    /// Bound token indices, in variable declaration order.
    pub fn bindings(&self) -> &[TokenIndex] {
        &self.bindings
    }
}

/// Backtracking search for assignments of a [`Pattern`] over one graph.
///
/// Variables are bound in declaration order, candidates are tried in token
/// index order, and no token is bound to two variables at once. Edge
/// constraints are checked as soon as both endpoints are bound. Results are
/// therefore deterministic for a given pattern and graph.
pub struct Matcher<'p, 'g> {
    pattern: &'p Pattern,
    graph: &'g DependencyGraph,
    primary_only: bool,
}

impl<'p, 'g> Matcher<'p, 'g> {
    pub fn new(pattern: &'p Pattern, graph: &'g DependencyGraph) -> Self {
        Self { pattern, graph, primary_only: false }
    }

    /// Restricts every edge constraint to primary edges, whatever its own scope.
    pub fn primary_edges_only(mut self, primary_only: bool) -> Self {
        self.primary_only = primary_only;
        self
    }

    /// First satisfying assignment in search order, if any.
    pub fn find_first(&self) -> Option<Match<'p, 'g>> {
        let mut found = None;
        self.run(&mut |bindings: &[TokenIndex]| {
            found = Some(bindings.to_vec());
            ControlFlow::Break(())
        });
        found.map(|bindings| self.wrap(bindings))
    }

    /// Every satisfying assignment, in search order.
    pub fn find_all(&self) -> Vec<Match<'p, 'g>> {
        let mut all = Vec::new();
        self.run(&mut |bindings: &[TokenIndex]| {
            all.push(bindings.to_vec());
            ControlFlow::Continue(())
        });
        all.into_iter().map(|bindings| self.wrap(bindings)).collect()
    }

    fn wrap(&self, bindings: Vec<TokenIndex>) -> Match<'p, 'g> {
        Match { pattern: self.pattern, graph: self.graph, bindings }
    }

    fn run(&self, on_match: &mut dyn FnMut(&[TokenIndex]) -> ControlFlow<()>) {
        // Local predicates don't depend on other bindings, so filter once up front
        let candidates: Vec<Vec<TokenIndex>> = (0..self.pattern.var_count())
            .map(|i| {
                let predicate = self.pattern.predicate(VarId(i));
                self.graph
                    .tokens()
                    .filter(|token| predicate.matches(token))
                    .map(|token| token.index)
                    .collect()
            })
            .collect();

        if candidates.iter().any(Vec::is_empty) {
            return;
        }

        let mut bound = Vec::with_capacity(candidates.len());
        let _ = self.search(&candidates, &mut bound, on_match);
    }

    fn search(
        &self,
        candidates: &[Vec<TokenIndex>],
        bound: &mut Vec<TokenIndex>,
        on_match: &mut dyn FnMut(&[TokenIndex]) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        let depth = bound.len();
        if depth == candidates.len() {
            return on_match(bound);
        }

        for &candidate in &candidates[depth] {
            if bound.contains(&candidate) {
                continue;
            }

            bound.push(candidate);
            if self.edges_hold(bound) {
                trace!(var = self.pattern.var_name(VarId(depth)), token = %candidate, "bound");
                self.search(candidates, bound, on_match)?;
            }
            bound.pop();
        }

        ControlFlow::Continue(())
    }

    /// Checks the constraints that became decidable with the most recent binding.
    fn edges_hold(&self, bound: &[TokenIndex]) -> bool {
        let newest = bound.len() - 1;

        self.pattern
            .edges()
            .iter()
            .filter(|edge| edge.governor.index().max(edge.dependent.index()) == newest)
            .all(|edge| {
                let kind = if self.primary_only { Some(EdgeKind::Primary) } else { edge.scope.kind() };
                self.graph.has_edge(
                    bound[edge.governor.index()],
                    bound[edge.dependent.index()],
                    edge.relation.as_str(),
                    kind,
                )
            })
    }
}
