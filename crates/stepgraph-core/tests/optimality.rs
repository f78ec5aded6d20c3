//! Shortest-path guarantees checked against exhaustive enumeration.

use proptest::prelude::*;
use stepgraph_core::{Algorithm, Edge, Graph, Node, NodeState};

/// Cheapest simple path from `from` to `to`, by trying every one.
fn brute_force(n: usize, edges: &[(usize, usize, u32)], from: usize, to: usize) -> Option<u64> {
    fn walk(
        node: usize,
        to: usize,
        cost: u64,
        edges: &[(usize, usize, u32)],
        on_path: &mut Vec<bool>,
        best: &mut Option<u64>,
    ) {
        if node == to {
            *best = Some(best.map_or(cost, |b| b.min(cost)));
            return;
        }
        for &(s, t, w) in edges {
            if s == node && !on_path[t] {
                on_path[t] = true;
                walk(t, to, cost + u64::from(w), edges, on_path, best);
                on_path[t] = false;
            }
        }
    }

    let mut on_path = vec![false; n];
    on_path[from] = true;
    let mut best = None;
    walk(from, to, 0, edges, &mut on_path, &mut best);
    best
}

/// Fewest edges on any path, by BFS over the raw edge list.
fn min_hops(n: usize, edges: &[(usize, usize, u32)], from: usize, to: usize) -> Option<usize> {
    let mut hops = vec![None; n];
    hops[from] = Some(0);
    let mut queue = std::collections::VecDeque::from([from]);
    while let Some(node) = queue.pop_front() {
        let next = hops[node].map(|h: usize| h + 1);
        for &(s, t, _) in edges {
            if s == node && hops[t].is_none() {
                hops[t] = next;
                queue.push_back(t);
            }
        }
    }
    hops[to]
}

fn build(n: usize, edges: &[(usize, usize, u32)], positions: Option<&[(i32, i32)]>) -> Graph {
    let nodes = (0..n)
        .map(|i| {
            let node = Node::new(format!("n{i}"), format!("N{i}"));
            match positions {
                Some(p) => node.at(f64::from(p[i].0), f64::from(p[i].1)),
                None => node,
            }
        })
        .collect();
    let edges = edges
        .iter()
        .enumerate()
        .map(|(i, &(s, t, w))| Edge::new(format!("e{i}"), format!("n{s}"), format!("n{t}"), w))
        .collect();
    Graph::from_parts(nodes, edges)
}

fn small_graph() -> impl Strategy<Value = (usize, Vec<(usize, usize, u32)>)> {
    (2usize..=6).prop_flat_map(|n| {
        let edge = (0..n, 0..n, 1u32..=20);
        (Just(n), prop::collection::vec(edge, 0..=14))
    })
}

fn positioned_graph() -> impl Strategy<Value = (usize, Vec<(i32, i32)>, Vec<(usize, usize, u32)>)> {
    (2usize..=6).prop_flat_map(|n| {
        let positions = prop::collection::vec((0i32..50, 0i32..50), n);
        let edge = (0..n, 0..n, 0u32..=10);
        (Just(n), positions, prop::collection::vec(edge, 0..=14))
    })
}

proptest! {
    #[test]
    fn dijkstra_matches_brute_force((n, edges) in small_graph()) {
        let graph = build(n, &edges, None);
        let goal = format!("n{}", n - 1);
        let trace = Algorithm::Dijkstra.generate(&graph, "n0", Some(goal.as_str())).unwrap();
        prop_assert_eq!(trace.goal_distance(), brute_force(n, &edges, 0, n - 1));
    }

    #[test]
    fn bfs_path_has_minimum_hops((n, edges) in small_graph()) {
        let graph = build(n, &edges, None);
        let goal = format!("n{}", n - 1);
        let trace = Algorithm::Bfs.generate(&graph, "n0", Some(goal.as_str())).unwrap();
        let hops = trace.path_nodes().len().checked_sub(1);
        prop_assert_eq!(hops, min_hops(n, &edges, 0, n - 1));
    }

    #[test]
    fn astar_matches_dijkstra_with_admissible_heuristic((n, positions, raw) in positioned_graph()) {
        // every edge costs at least the straight-line distance it spans
        let edges: Vec<_> = raw
            .iter()
            .map(|&(s, t, extra)| {
                let (dx, dy) = (positions[s].0 - positions[t].0, positions[s].1 - positions[t].1);
                let span = f64::from(dx).hypot(f64::from(dy)).ceil() as u32;
                (s, t, span + extra)
            })
            .collect();
        let graph = build(n, &edges, Some(positions.as_slice()));
        let goal = format!("n{}", n - 1);
        let a_star = Algorithm::AStar.generate(&graph, "n0", Some(goal.as_str())).unwrap();
        let plain = Algorithm::Dijkstra.generate(&graph, "n0", Some(goal.as_str())).unwrap();
        prop_assert_eq!(a_star.goal_distance(), plain.goal_distance());
        prop_assert_eq!(a_star.goal_distance(), brute_force(n, &edges, 0, n - 1));
    }

    #[test]
    fn every_algorithm_opens_with_start((n, edges) in small_graph()) {
        let graph = build(n, &edges, None);
        let goal = format!("n{}", n - 1);
        for algorithm in Algorithm::ALL {
            let trace = algorithm.generate(&graph, "n0", Some(goal.as_str())).unwrap();
            prop_assert!(!trace.is_empty());
            prop_assert_eq!(trace[0].target_id.as_str(), "n0");
            prop_assert!(trace[0].is_node(NodeState::Start));
        }
    }

    #[test]
    fn path_steps_follow_real_edges((n, edges) in small_graph()) {
        let graph = build(n, &edges, None);
        let goal = format!("n{}", n - 1);
        for algorithm in [Algorithm::Bfs, Algorithm::Dijkstra] {
            let trace = algorithm.generate(&graph, "n0", Some(goal.as_str())).unwrap();
            let nodes = trace.path_nodes();
            let path_edges = trace.path_edges();
            if trace.reached_goal() {
                prop_assert_eq!(nodes.first().copied(), Some("n0"));
                prop_assert_eq!(nodes.last().copied(), Some(goal.as_str()));
                prop_assert_eq!(path_edges.len(), nodes.len() - 1);
            } else {
                prop_assert!(nodes.is_empty());
            }
        }
    }
}

#[test]
fn concrete_abc_scenario() {
    let graph = Graph::from_parts(
        vec![
            Node::new("A", "A").at(0.0, 0.0),
            Node::new("B", "B").at(10.0, 0.0),
            Node::new("C", "C").at(10.0, 10.0),
        ],
        vec![
            Edge::new("AB", "A", "B", 5),
            Edge::new("AC", "A", "C", 20),
            Edge::new("BC", "B", "C", 1),
        ],
    );
    let trace = Algorithm::Dijkstra.generate(&graph, "A", Some("C")).unwrap();
    assert_eq!(trace.goal_distance(), Some(6));
    assert_eq!(trace.path_nodes(), vec!["A", "B", "C"]);
}
