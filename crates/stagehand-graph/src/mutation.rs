//! Scoped editing of persisted assets.
//!
//! A [`MutationScope`] owns a working node for its lifetime. The node is
//! either fresh (empty, named after the target asset) or a duplicate of a
//! stored source asset. Closing the scope with [`CloseOutcome::Commit`]
//! saves the working node to the target path; dropping an unclosed scope
//! commits as well, so every exit path writes the target.

use std::mem;

use stagehand_config::CommitPolicy;
use tracing::{debug, warn};

use crate::error::GraphError;
use crate::node::Node;
use crate::store::AssetStore;

const MUTATION_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::mutation");

/// How a scope is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Save the working node to the target path.
    Commit,
    /// Drop the working node without writing.
    Discard,
}

impl CloseOutcome {
    /// Chooses the outcome for a failed edit under `policy`.
    #[must_use]
    pub const fn on_failure(policy: CommitPolicy) -> Self {
        if policy.commits_on_failure() {
            Self::Commit
        } else {
            Self::Discard
        }
    }
}

/// Exclusive working copy of an asset, saved to its target when released.
pub struct MutationScope<'s> {
    store: &'s dyn AssetStore,
    source: Option<String>,
    target: String,
    node: Node,
    closed: bool,
}

impl<'s> MutationScope<'s> {
    /// Opens a scope over a new empty node.
    pub fn open_fresh(store: &'s dyn AssetStore, target: impl Into<String>) -> Self {
        let target = target.into();
        let node = Node::new(asset_name(&target));
        Self {
            store,
            source: None,
            target,
            node,
            closed: false,
        }
    }

    /// Opens a scope over a duplicate of the asset stored at `source`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Store`] when the source cannot be loaded.
    pub fn open_cloned(
        store: &'s dyn AssetStore,
        source: &str,
        target: impl Into<String>,
    ) -> Result<Self, GraphError> {
        let node = store.load(source)?;
        Ok(Self {
            store,
            source: Some(source.to_owned()),
            target: target.into(),
            node,
            closed: false,
        })
    }

    /// Opens a cloned scope when `source` is given, a fresh one otherwise.
    ///
    /// # Errors
    ///
    /// As [`open_cloned`](Self::open_cloned).
    pub fn open(
        store: &'s dyn AssetStore,
        source: Option<&str>,
        target: impl Into<String>,
    ) -> Result<Self, GraphError> {
        match source {
            Some(path) => Self::open_cloned(store, path, target),
            None => Ok(Self::open_fresh(store, target)),
        }
    }

    /// Returns the source path of a cloned scope.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Returns the target path.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the working node.
    #[must_use]
    pub const fn node(&self) -> &Node {
        &self.node
    }

    /// Returns the working node for editing.
    pub const fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }

    /// Releases the scope.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Store`] when committing fails.
    pub fn close(mut self, outcome: CloseOutcome) -> Result<(), GraphError> {
        self.release(outcome)
    }

    fn release(&mut self, outcome: CloseOutcome) -> Result<(), GraphError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let node = mem::take(&mut self.node);
        match outcome {
            CloseOutcome::Commit => {
                self.store.save(&node, &self.target)?;
                debug!(
                    target: MUTATION_TARGET,
                    source = self.source.as_deref().unwrap_or(""),
                    target_path = %self.target,
                    nodes = node.node_count(),
                    "committed working node"
                );
            }
            CloseOutcome::Discard => {
                debug!(
                    target: MUTATION_TARGET,
                    target_path = %self.target,
                    "discarded working node"
                );
            }
        }
        Ok(())
    }
}

impl Drop for MutationScope<'_> {
    fn drop(&mut self) {
        if let Err(error) = self.release(CloseOutcome::Commit) {
            warn!(
                target: MUTATION_TARGET,
                target_path = %self.target,
                %error,
                "failed to commit working node on release"
            );
        }
    }
}

impl std::fmt::Debug for MutationScope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutationScope")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

/// Runs `body` against a scoped working node and releases the scope.
///
/// A successful body always commits. A failing body commits or discards
/// according to `policy`; its error is returned either way. A commit failure
/// after a failed body is logged and the body error wins.
///
/// # Errors
///
/// Returns the body error, or the open/commit error.
pub fn mutate<T, F>(
    store: &dyn AssetStore,
    source: Option<&str>,
    target: &str,
    policy: CommitPolicy,
    body: F,
) -> Result<T, GraphError>
where
    F: FnOnce(&mut Node) -> Result<T, GraphError>,
{
    let mut scope = MutationScope::open(store, source, target)?;
    match body(scope.node_mut()) {
        Ok(value) => {
            scope.close(CloseOutcome::Commit)?;
            Ok(value)
        }
        Err(error) => {
            if let Err(close_error) = scope.close(CloseOutcome::on_failure(policy)) {
                warn!(
                    target: MUTATION_TARGET,
                    target_path = target,
                    error = %close_error,
                    "failed to release working node after a failed edit"
                );
            }
            Err(error)
        }
    }
}

/// Derives a node name from a store path: the file stem of the last segment.
#[must_use]
pub fn asset_name(path: &str) -> &str {
    let file = path.rsplit('/').next().unwrap_or(path);
    match file.rfind('.') {
        Some(dot) if dot > 0 => file.get(..dot).unwrap_or(file),
        _ => file,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::store::MemoryStore;

    #[rstest]
    #[case("Assets/Props/crate.prefab", "crate")]
    #[case("crate", "crate")]
    #[case("Assets/.hidden", ".hidden")]
    #[case("a.b.c", "a.b")]
    fn names_nodes_after_the_asset_file(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(asset_name(path), expected);
    }

    #[rstest]
    fn dropping_an_unclosed_scope_commits() {
        let store = MemoryStore::new();
        {
            let mut scope = MutationScope::open_fresh(&store, "out.prefab");
            scope.node_mut().push_child(Node::new("Child"));
        }
        let saved = store.snapshot("out.prefab").expect("committed on drop");
        assert_eq!(saved.name(), "out");
        assert_eq!(saved.children().len(), 1);
    }

    #[rstest]
    fn discarding_leaves_the_target_absent() {
        let store = MemoryStore::new();
        let scope = MutationScope::open_fresh(&store, "out.prefab");
        scope.close(CloseOutcome::Discard).expect("discard");
        assert!(!store.exists("out.prefab"));
    }

    #[rstest]
    fn cloned_scope_requires_an_existing_source() {
        let store = MemoryStore::new();
        let error = MutationScope::open_cloned(&store, "missing.prefab", "out.prefab")
            .expect_err("source missing");
        assert!(matches!(error, GraphError::Store(_)));
        assert!(store.is_empty());
    }

    #[rstest]
    #[case(CommitPolicy::Always, true)]
    #[case(CommitPolicy::OnSuccess, false)]
    fn failed_bodies_follow_the_commit_policy(
        #[case] policy: CommitPolicy,
        #[case] committed: bool,
    ) {
        let store = MemoryStore::new();
        let result: Result<(), GraphError> = mutate(&store, None, "out.prefab", policy, |node| {
            node.push_child(Node::new("Partial"));
            Err(GraphError::EmptyMerge)
        });

        assert!(matches!(result, Err(GraphError::EmptyMerge)));
        assert_eq!(store.exists("out.prefab"), committed);
    }
}
