//! BDD step definitions for the hierarchy viewer

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use cucumber::{then, when};

use orgchart_console::model::TreeNode;
use orgchart_console::tree::{render_text, LoadOutcome};

use crate::world::ConsoleWorld;

fn visible_names(node: &TreeNode, collapsed: &HashSet<u64>, out: &mut Vec<String>) {
    out.push(node.name.clone());
    if collapsed.contains(&node.id) {
        return;
    }
    for child in &node.children {
        visible_names(child, collapsed, out);
    }
}

async fn shown(world: &ConsoleWorld) -> Vec<String> {
    let state = world.console.tree.snapshot().await;
    let mut names = Vec::new();
    if let Some(node) = state.visible_node() {
        visible_names(node, &state.collapsed, &mut names);
    }
    names
}

#[when(expr = "I show the tree for {string}")]
async fn show_tree(world: &mut ConsoleWorld, name: String) {
    let id = world.backend.employee_id(&name);
    world.post_form("/tree", &format!("root={}", id)).await;
}

#[when(expr = "I toggle {string} in the tree")]
async fn toggle(world: &mut ConsoleWorld, name: String) {
    let id = world.backend.employee_id(&name);
    world.post_form(&format!("/tree/toggle/{}", id), "").await;
}

#[when("I refresh the tree")]
async fn refresh(world: &mut ConsoleWorld) {
    world.post_form("/tree/refresh", "").await;
}

#[when(expr = "I select {string} and then {string} before the first tree arrives")]
async fn select_twice(world: &mut ConsoleWorld, first: String, second: String) {
    let first_id = world.backend.employee_id(&first);
    let second_id = world.backend.employee_id(&second);
    let viewer = Arc::clone(&world.console.tree);

    let slow = tokio::spawn({
        let viewer = Arc::clone(&viewer);
        async move { viewer.select(first_id).await }
    });
    tokio::time::sleep(Duration::from_millis(20)).await;
    let latest = viewer.select(second_id).await;
    let earlier = slow.await.unwrap();
    world.tree_outcomes = vec![earlier, latest];
}

async fn print(world: &mut ConsoleWorld, name: &str, collapse: &str) {
    let id = world.backend.employee_id(name);
    let collapsed: HashSet<u64> = collapse
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(|n| world.backend.employee_id(n))
        .collect();
    let node = world.console.api.employee_tree(id).await.unwrap();
    world.printed_tree = Some(render_text(&node, &collapsed));
}

#[when(expr = "I print the tree for {string}")]
async fn print_tree(world: &mut ConsoleWorld, name: String) {
    print(world, &name, "").await;
}

#[when(expr = "I print the tree for {string} collapsing {string}")]
async fn print_tree_collapsed(world: &mut ConsoleWorld, name: String, collapse: String) {
    print(world, &name, &collapse).await;
}

#[then(expr = "the tree shows {string}")]
async fn tree_shows(world: &mut ConsoleWorld, name: String) {
    let names = shown(world).await;
    assert!(names.contains(&name), "{} not in {:?}", name, names);
}

#[then(expr = "the tree does not show {string}")]
async fn tree_hides(world: &mut ConsoleWorld, name: String) {
    let names = shown(world).await;
    assert!(!names.contains(&name), "{} unexpectedly in {:?}", name, names);
}

#[then(expr = "the tree root is {string}")]
async fn tree_root(world: &mut ConsoleWorld, name: String) {
    let id = world.backend.employee_id(&name);
    let state = world.console.tree.snapshot().await;
    assert_eq!(state.root_id, Some(id));
    assert_eq!(state.node.map(|n| n.name), Some(name));
    assert!(!state.busy);
}

#[then("the earlier selection was superseded")]
fn earlier_superseded(world: &mut ConsoleWorld) {
    assert_eq!(
        world.tree_outcomes,
        vec![LoadOutcome::Superseded, LoadOutcome::Loaded]
    );
}

#[then(expr = "the tree error is {string}")]
async fn tree_error(world: &mut ConsoleWorld, message: String) {
    let state = world.console.tree.snapshot().await;
    assert_eq!(state.error.as_deref(), Some(message.as_str()));
}

#[then(expr = "printed line {int} is {string}")]
fn printed_line(world: &mut ConsoleWorld, line: usize, expected: String) {
    let printed = world.printed_tree.as_deref().expect("no printed tree");
    let actual = printed.lines().nth(line - 1);
    assert_eq!(actual, Some(expected.as_str()), "printed tree:\n{}", printed);
}

#[then(expr = "the printed tree has {int} line(s)")]
fn printed_line_count(world: &mut ConsoleWorld, count: usize) {
    let printed = world.printed_tree.as_deref().expect("no printed tree");
    assert_eq!(printed.lines().count(), count);
}
