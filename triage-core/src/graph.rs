//! Dependency graph analysis: cycle membership and fan-in.
//!
//! The graph is rebuilt from scratch for every batch. Nodes are the task ids
//! present in the batch; a dependency id that names no task is kept on the
//! task for display but never becomes an edge.
//!
//! Cycle detection is a three-colour DFS driven by an explicit path stack, so
//! long dependency chains never touch the native call stack. Each back edge
//! marks the slice of the path from the repeated node to the top. A single
//! DFS can miss members of a tangled strongly connected component (a node
//! that only reaches the cycle through an already-finished node), so every
//! marked node is widened to its full component with one petgraph SCC pass.
//! The resulting set does not depend on traversal order.

use std::collections::{BTreeSet, HashMap, HashSet};

use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Unvisited,
    InProgress,
    Done,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    node: usize,
    next_edge: usize,
}

/// Adjacency view over one batch of tasks, keyed by task id.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    ids: Vec<String>,
    index: HashMap<String, usize>,
    /// edges[n] = nodes that n depends on (deduplicated, declaration order)
    edges: Vec<Vec<usize>>,
}

impl DependencyGraph {
    /// Build from normalized tasks. A repeated id merges its dependencies
    /// into the first node carrying that id.
    pub fn build(tasks: &[Task]) -> Self {
        let mut graph = Self::default();
        for task in tasks {
            if !graph.index.contains_key(&task.id) {
                graph.index.insert(task.id.clone(), graph.ids.len());
                graph.ids.push(task.id.clone());
                graph.edges.push(Vec::new());
            }
        }

        for task in tasks {
            let from = graph.index[&task.id];
            for dep in &task.dependencies {
                let Some(&to) = graph.index.get(dep) else { continue };
                if !graph.edges[from].contains(&to) {
                    graph.edges[from].push(to);
                }
            }
        }

        graph
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Resolved dependencies of `id`, in declaration order.
    pub fn dependencies_of(&self, id: &str) -> Vec<&str> {
        self.index
            .get(id)
            .map(|&n| self.edges[n].iter().map(|&d| self.ids[d].as_str()).collect())
            .unwrap_or_default()
    }

    /// Ids of every task that lies on at least one dependency cycle.
    pub fn cycle_members(&self) -> BTreeSet<String> {
        let mut on_cycle = self.back_edge_members();

        // Widen to whole components in one linear pass.
        for component in kosaraju_scc(&self.to_digraph()) {
            if component.iter().any(|n| on_cycle[n.index()]) {
                for n in &component {
                    on_cycle[n.index()] = true;
                }
            }
        }

        on_cycle
            .iter()
            .enumerate()
            .filter(|&(_, &member)| member)
            .map(|(n, _)| self.ids[n].clone())
            .collect()
    }

    /// Three-colour DFS; marks each path slice closed by a back edge.
    fn back_edge_members(&self) -> Vec<bool> {
        let n = self.len();
        let mut color = vec![Color::Unvisited; n];
        let mut position = vec![0usize; n];
        let mut on_cycle = vec![false; n];
        let mut path: Vec<Frame> = Vec::new();

        for root in 0..n {
            if color[root] != Color::Unvisited {
                continue;
            }
            color[root] = Color::InProgress;
            position[root] = 0;
            path.push(Frame { node: root, next_edge: 0 });

            while let Some(top) = path.last_mut() {
                let node = top.node;
                let Some(&dep) = self.edges[node].get(top.next_edge) else {
                    path.pop();
                    color[node] = Color::Done;
                    continue;
                };
                top.next_edge += 1;

                match color[dep] {
                    Color::Unvisited => {
                        color[dep] = Color::InProgress;
                        position[dep] = path.len();
                        path.push(Frame { node: dep, next_edge: 0 });
                    }
                    Color::InProgress => {
                        for frame in &path[position[dep]..] {
                            on_cycle[frame.node] = true;
                        }
                    }
                    Color::Done => {}
                }
            }
        }

        on_cycle
    }

    /// Node `i` of the returned graph is node `i` here.
    fn to_digraph(&self) -> DiGraph<(), ()> {
        let edge_count = self.edges.iter().map(Vec::len).sum();
        let mut graph = DiGraph::with_capacity(self.len(), edge_count);
        let nodes: Vec<NodeIndex> = (0..self.len()).map(|_| graph.add_node(())).collect();
        for (from, deps) in self.edges.iter().enumerate() {
            for &to in deps {
                graph.add_edge(nodes[from], nodes[to], ());
            }
        }
        graph
    }
}

/// Count, per task id, how many task records list it as a dependency.
///
/// A record naming the same dependency twice counts once. A task that
/// depends on itself counts toward its own fan-in. Ids outside the batch
/// receive nothing.
pub fn fan_in(tasks: &[Task]) -> HashMap<String, usize> {
    let mut counts: HashMap<String, usize> = tasks.iter().map(|t| (t.id.clone(), 0)).collect();

    for task in tasks {
        let mut seen: HashSet<&str> = HashSet::new();
        for dep in &task.dependencies {
            if !seen.insert(dep.as_str()) {
                continue;
            }
            if let Some(count) = counts.get_mut(dep) {
                *count += 1;
            }
        }
    }

    counts
}

/// Everything the scoring stage needs from the graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphAnalysis {
    pub cycle_members: BTreeSet<String>,
    pub fan_in: HashMap<String, usize>,
}

impl GraphAnalysis {
    pub fn of(tasks: &[Task]) -> Self {
        let graph = DependencyGraph::build(tasks);
        Self {
            cycle_members: graph.cycle_members(),
            fan_in: fan_in(tasks),
        }
    }

    pub fn fan_in_of(&self, id: &str) -> usize {
        self.fan_in.get(id).copied().unwrap_or(0)
    }

    pub fn max_fan_in(&self) -> usize {
        self.fan_in.values().copied().max().unwrap_or(0)
    }

    pub fn in_cycle(&self, id: &str) -> bool {
        self.cycle_members.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, deps: &[&str]) -> Task {
        Task {
            id: id.to_string(),
            title: id.to_string(),
            due_date: None,
            estimated_hours: None,
            importance: None,
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
        }
    }

    fn members(tasks: &[Task]) -> Vec<String> {
        DependencyGraph::build(tasks).cycle_members().into_iter().collect()
    }

    #[test]
    fn mutual_dependency_is_a_cycle() {
        let tasks = vec![task("A", &["B"]), task("B", &["A"])];
        assert_eq!(members(&tasks), vec!["A", "B"]);
    }

    #[test]
    fn whole_ring_is_reported_not_just_endpoints() {
        let tasks = vec![
            task("A", &["B"]),
            task("B", &["C"]),
            task("C", &["D"]),
            task("D", &["A"]),
            task("E", &["A"]),
        ];
        assert_eq!(members(&tasks), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn chain_without_back_edge_has_no_cycle() {
        let tasks = vec![task("A", &["B"]), task("B", &["C"]), task("C", &[])];
        assert!(members(&tasks).is_empty());
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let tasks = vec![task("A", &["A"]), task("B", &["A"])];
        assert_eq!(members(&tasks), vec!["A"]);
    }

    #[test]
    fn dangling_dependencies_are_ignored() {
        let tasks = vec![task("A", &["ghost"]), task("ghost2", &["A", "nobody"])];
        let graph = DependencyGraph::build(&tasks);
        assert!(graph.cycle_members().is_empty());
        assert!(graph.dependencies_of("A").is_empty());
        assert_eq!(graph.dependencies_of("ghost2"), vec!["A"]);
        assert!(!graph.contains("ghost"));
    }

    #[test]
    fn members_reached_through_finished_nodes_are_found() {
        // DFS from A finishes B via A<->B before walking A->C->D->B.
        // C and D are still on the cycle A->C->D->B->A.
        let tasks = vec![
            task("A", &["B", "C"]),
            task("B", &["A"]),
            task("C", &["D"]),
            task("D", &["B"]),
        ];
        assert_eq!(members(&tasks), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn disconnected_components_are_all_visited() {
        let tasks = vec![
            task("A", &["B"]),
            task("B", &[]),
            task("X", &["Y"]),
            task("Y", &["X"]),
        ];
        assert_eq!(members(&tasks), vec!["X", "Y"]);
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        let n = 50_000;
        let tasks: Vec<Task> = (0..n)
            .map(|i| {
                let next = format!("n{}", (i + 1) % n);
                Task {
                    dependencies: vec![next],
                    ..task(&format!("n{i}"), &[])
                }
            })
            .collect();
        assert_eq!(DependencyGraph::build(&tasks).cycle_members().len(), n);
    }

    #[test]
    fn many_chained_pairs_are_widened_in_one_pass() {
        // a_i <-> b_i, a_i -> a_{i+1}: 5000 separate two-node cycles.
        let k = 5_000;
        let mut tasks: Vec<Task> = Vec::with_capacity(2 * k + 1);
        for i in 0..k {
            let mut deps = vec![format!("b{i}")];
            if i + 1 < k {
                deps.push(format!("a{}", i + 1));
            }
            tasks.push(Task {
                dependencies: deps,
                ..task(&format!("a{i}"), &[])
            });
            tasks.push(Task {
                dependencies: vec![format!("a{i}")],
                ..task(&format!("b{i}"), &[])
            });
        }
        tasks.push(task("tail", &["a0"]));

        let cycle = DependencyGraph::build(&tasks).cycle_members();
        assert_eq!(cycle.len(), 2 * k);
        assert!(!cycle.contains("tail"));
    }

    #[test]
    fn duplicate_ids_merge_dependencies() {
        let tasks = vec![task("A", &["B"]), task("B", &[]), task("A", &["C"]), task("C", &["A"])];
        let graph = DependencyGraph::build(&tasks);
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.dependencies_of("A"), vec!["B", "C"]);
        assert_eq!(members(&tasks), vec!["A", "C"]);
    }

    #[test]
    fn fan_in_counts_dependents() {
        let tasks = vec![
            task("A", &[]),
            task("B", &["A"]),
            task("C", &["A", "B", "ghost"]),
        ];
        let counts = fan_in(&tasks);
        assert_eq!(counts["A"], 2);
        assert_eq!(counts["B"], 1);
        assert_eq!(counts["C"], 0);
        assert!(!counts.contains_key("ghost"));
    }

    #[test]
    fn fan_in_counts_self_dependency() {
        // A task depending on itself raises its own fan-in.
        let tasks = vec![task("A", &["A"])];
        assert_eq!(fan_in(&tasks)["A"], 1);
    }

    #[test]
    fn fan_in_ignores_repeated_listing() {
        let tasks = vec![task("A", &[]), task("B", &["A", "A"])];
        assert_eq!(fan_in(&tasks)["A"], 1);
    }

    #[test]
    fn analysis_helpers() {
        let tasks = vec![task("A", &["B"]), task("B", &["A"]), task("C", &["A"])];
        let analysis = GraphAnalysis::of(&tasks);
        assert_eq!(analysis.fan_in_of("A"), 2);
        assert_eq!(analysis.fan_in_of("missing"), 0);
        assert_eq!(analysis.max_fan_in(), 2);
        assert!(analysis.in_cycle("A"));
        assert!(!analysis.in_cycle("C"));
    }
}
