//! Behaviour-driven tests for path resolution and scoped mutation.

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use stagehand_config::CommitPolicy;

use crate::catalog::ComponentCatalog;
use crate::error::GraphError;
use crate::mutation::{CloseOutcome, MutationScope, mutate};
use crate::node::Node;
use crate::path::{Address, PathResolver};
use crate::store::{AssetStore, MemoryStore};

// ---------------------------------------------------------------------------
// Test world
// ---------------------------------------------------------------------------

struct TestWorld {
    catalog: ComponentCatalog,
    graph: Node,
    store: MemoryStore,
    policy: CommitPolicy,
    outcome: Option<Result<(), GraphError>>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self {
            catalog: ComponentCatalog::builtin(),
            graph: Node::new("Root"),
            store: MemoryStore::new(),
            policy: CommitPolicy::default(),
            outcome: None,
        }
    }
}

#[fixture]
fn world() -> TestWorld {
    TestWorld::default()
}

fn unquote(text: &str) -> &str {
    text.trim_matches('"')
}

fn child_names(world: &TestWorld, asset: &str) -> Vec<String> {
    world
        .store
        .snapshot(unquote(asset))
        .expect("asset should be stored")
        .children()
        .iter()
        .map(|child| child.name().to_owned())
        .collect()
}

fn captured_error(world: &TestWorld) -> &GraphError {
    world
        .outcome
        .as_ref()
        .expect("no outcome captured")
        .as_ref()
        .expect_err("expected failure but got success")
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

#[given("an empty graph")]
fn given_empty_graph(world: &mut TestWorld) {
    world.graph = Node::new("Root");
}

#[given("an empty store")]
fn given_empty_store(world: &mut TestWorld) {
    world.store = MemoryStore::new();
}

#[given("a store holding {asset} with a child {child}")]
fn given_store_with_child(world: &mut TestWorld, asset: String, child: String) {
    let mut node = Node::new("source");
    node.push_child(Node::new(unquote(&child)));
    world.store = MemoryStore::with_assets([(unquote(&asset), node)]);
}

#[given("the commit policy is {policy}")]
fn given_policy(world: &mut TestWorld, policy: String) {
    world.policy = unquote(&policy).parse().expect("valid commit policy");
}

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

fn resolve(world: &mut TestWorld, address: &str, create_missing: bool) {
    let parsed = Address::parse(unquote(address)).expect("valid address");
    let resolver = PathResolver::new(&world.catalog);
    let result = resolver
        .attach(&parsed, &mut world.graph, create_missing)
        .map(drop);
    world.outcome = Some(result);
}

#[when("{address} is resolved with creation allowed")]
fn when_resolved_creating(world: &mut TestWorld, address: String) {
    resolve(world, &address, true);
}

#[when("{address} is resolved without creation")]
fn when_resolved_strict(world: &mut TestWorld, address: String) {
    resolve(world, &address, false);
}

#[when("a cloned scope from {source} to {target} adds a child {child}")]
fn when_cloned_scope(world: &mut TestWorld, source: String, target: String, child: String) {
    let mut scope = MutationScope::open_cloned(&world.store, unquote(&source), unquote(&target))
        .expect("open cloned scope");
    scope.node_mut().push_child(Node::new(unquote(&child)));
    world.outcome = Some(scope.close(CloseOutcome::Commit));
}

#[when("a fresh scope for {target} is closed without edits")]
fn when_fresh_scope(world: &mut TestWorld, target: String) {
    let scope = MutationScope::open_fresh(&world.store, unquote(&target));
    world.outcome = Some(scope.close(CloseOutcome::Commit));
}

#[when("a fresh edit of {target} adds a child {child} and then fails")]
fn when_failing_edit(world: &mut TestWorld, target: String, child: String) {
    let result = mutate(&world.store, None, unquote(&target), world.policy, |node| {
        node.push_child(Node::new(unquote(&child)));
        Err(GraphError::invalid_address("deliberate failure"))
    });
    world.outcome = Some(result);
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

#[then("the graph holds {count} nodes")]
fn then_node_count(world: &mut TestWorld, count: usize) {
    assert_eq!(world.graph.node_count(), count);
}

#[then("the node at {path} carries {count} {component} component")]
fn then_component_count(world: &mut TestWorld, path: String, count: usize, component: String) {
    let segments: Vec<&str> = unquote(&path).split('/').collect();
    let node = world
        .graph
        .descendant(&segments)
        .expect("node should exist");
    let wanted = unquote(&component);
    let found = node
        .components()
        .iter()
        .filter(|instance| instance.type_name() == wanted)
        .count();
    assert_eq!(found, count);
}

#[then("resolution fails with {kind}")]
fn then_resolution_fails(world: &mut TestWorld, kind: String) {
    let error = captured_error(world);
    match unquote(&kind) {
        "child_not_found" => assert!(
            matches!(error, GraphError::ChildNotFound { .. }),
            "expected ChildNotFound, got: {error}"
        ),
        "unknown_component_type" => assert!(
            matches!(error, GraphError::UnknownComponentType { .. }),
            "expected UnknownComponentType, got: {error}"
        ),
        other => panic!("unsupported error kind: '{other}'"),
    }
}

#[then("the edit error is reported")]
fn then_edit_error(world: &mut TestWorld) {
    let error = captured_error(world);
    assert!(matches!(error, GraphError::InvalidAddress { .. }));
}

#[then("{asset} has children {names}")]
fn then_children(world: &mut TestWorld, asset: String, names: String) {
    let expected: Vec<String> = unquote(&names).split(',').map(str::to_owned).collect();
    assert_eq!(child_names(world, &asset), expected);
}

#[then("{asset} has no children")]
fn then_no_children(world: &mut TestWorld, asset: String) {
    assert!(child_names(world, &asset).is_empty());
}

#[then("{asset} does not exist")]
fn then_absent(world: &mut TestWorld, asset: String) {
    assert!(!world.store.exists(unquote(&asset)));
}

// ---------------------------------------------------------------------------
// Scenario registration
// ---------------------------------------------------------------------------

#[scenario(path = "tests/features/path_resolution.feature")]
fn path_resolution_behaviour(world: TestWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/scoped_mutation.feature")]
fn scoped_mutation_behaviour(world: TestWorld) {
    let _ = world;
}
