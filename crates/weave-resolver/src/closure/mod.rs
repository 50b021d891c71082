//! Peer dependency closure over linked modules
//!
//! npm never reads the peer dependencies of a module it did not install
//! itself, so for linked modules they are resolved here, round by round. The
//! caller processes the current frontier and feeds back the names the round
//! linked; only names never seen before form the next frontier.

use weave_config::WorkspaceDescriptor;
use weave_core::types::DependencyMap;

/// Fixpoint state: everything processed so far and what is left for the next round
#[derive(Debug, Clone, Default)]
pub struct PeerClosure {
    processed: DependencyMap,
    frontier: DependencyMap,
    rounds: usize,
}

impl PeerClosure {
    /// Start from the given linked dependencies
    pub fn new(initial: DependencyMap) -> Self {
        Self {
            processed: initial.clone(),
            frontier: initial,
            rounds: 0,
        }
    }

    /// Start from the entries of `deps` that the workspace links
    pub fn for_linked(deps: &DependencyMap, workspace: &WorkspaceDescriptor) -> Self {
        let initial = deps
            .iter()
            .filter(|(name, _)| workspace.is_linked(name))
            .map(|(name, spec)| (name.clone(), spec.clone()))
            .collect();
        Self::new(initial)
    }

    /// Dependencies the next round must process
    pub fn frontier(&self) -> &DependencyMap {
        &self.frontier
    }

    pub fn is_settled(&self) -> bool {
        self.frontier.is_empty()
    }

    /// Record what a round linked; returns the size of the new frontier
    pub fn advance(&mut self, discovered: DependencyMap) -> usize {
        let fresh: DependencyMap = discovered
            .into_iter()
            .filter(|(name, _)| !self.processed.contains_key(name))
            .collect();

        self.processed
            .extend(fresh.iter().map(|(name, spec)| (name.clone(), spec.clone())));
        self.frontier = fresh;
        self.rounds += 1;
        self.frontier.len()
    }

    /// Every dependency that was ever part of a frontier
    pub fn processed(&self) -> &DependencyMap {
        &self.processed
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }
}
