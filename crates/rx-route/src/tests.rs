//! Unit tests for rx-route.
//!
//! All tests use hand-crafted or seeded random graphs, so they run without
//! any OSM file.

#[cfg(test)]
mod helpers {
    use rx_core::NodeId;
    use rx_graph::{Graph, Node};

    /// Add an edge whose cost is the great-circle distance times `factor`.
    pub fn connect(g: &mut Graph, from: i64, to: i64, factor: f32) {
        let a = g.get(NodeId(from)).unwrap();
        let b = g.get(NodeId(to)).unwrap();
        g.set_edge(a.id, b.id, a.distance_to(&b) * factor);
    }

    pub fn connect_both(g: &mut Graph, a: i64, b: i64, factor: f32) {
        connect(g, a, b, factor);
        connect(g, b, a, factor);
    }

    /// ```text
    /// 1 ──→ 2 ──→ 3      (exact distances, along a parallel)
    /// ```
    pub fn line_graph() -> Graph {
        let mut g = Graph::new();
        g.set(Node::canonical(1, 52.0, 21.000));
        g.set(Node::canonical(2, 52.0, 21.001));
        g.set(Node::canonical(3, 52.0, 21.002));
        connect(&mut g, 1, 2, 1.0);
        connect(&mut g, 2, 3, 1.0);
        g
    }

    /// Small grid-like network:
    ///
    /// ```text
    ///   4 ─── 5 ─── 6
    ///   │     │     │
    ///   1 ─── 2 ─── 3
    /// ```
    ///
    /// The bottom row is cheap (factor 1), the top row and rungs expensive
    /// (factor 2), except 2 ─ 5 which is blocked entirely.
    pub fn ladder_graph() -> Graph {
        let mut g = Graph::new();
        g.set(Node::canonical(1, 50.000, 19.000));
        g.set(Node::canonical(2, 50.000, 19.010));
        g.set(Node::canonical(3, 50.000, 19.020));
        g.set(Node::canonical(4, 50.010, 19.000));
        g.set(Node::canonical(5, 50.010, 19.010));
        g.set(Node::canonical(6, 50.010, 19.020));
        connect_both(&mut g, 1, 2, 1.0);
        connect_both(&mut g, 2, 3, 1.0);
        connect_both(&mut g, 4, 5, 2.0);
        connect_both(&mut g, 5, 6, 2.0);
        connect_both(&mut g, 1, 4, 2.0);
        connect_both(&mut g, 3, 6, 2.0);
        g
    }

    pub fn route_cost(g: &Graph, route: &[NodeId]) -> f32 {
        route.windows(2).map(|w| g.get_edge(w[0], w[1])).sum()
    }
}

// ── Basic behaviour ───────────────────────────────────────────────────────────

#[cfg(test)]
mod basics {
    use rx_core::NodeId;

    use crate::{find_route, find_route_without_turn_around, AStarError, DEFAULT_STEP_LIMIT};

    #[test]
    fn concrete_line_example() {
        let mut g = super::helpers::line_graph();
        let route = find_route(&g, NodeId(1), NodeId(3), DEFAULT_STEP_LIMIT).unwrap();
        assert_eq!(route, vec![NodeId(1), NodeId(2), NodeId(3)]);

        g.delete_edge(NodeId(2), NodeId(3));
        let route = find_route(&g, NodeId(1), NodeId(3), DEFAULT_STEP_LIMIT).unwrap();
        assert!(route.is_empty());
    }

    #[test]
    fn trivial_route() {
        let g = super::helpers::line_graph();
        for limit in [0, DEFAULT_STEP_LIMIT] {
            assert_eq!(find_route(&g, NodeId(2), NodeId(2), limit).unwrap(), vec![NodeId(2)]);
            assert_eq!(
                find_route_without_turn_around(&g, NodeId(2), NodeId(2), limit).unwrap(),
                vec![NodeId(2)]
            );
        }
    }

    #[test]
    fn invalid_reference_names_start_first() {
        let g = super::helpers::line_graph();
        assert_eq!(
            find_route(&g, NodeId(8), NodeId(9), DEFAULT_STEP_LIMIT),
            Err(AStarError::InvalidReference(NodeId(8)))
        );
        assert_eq!(
            find_route(&g, NodeId(1), NodeId(9), DEFAULT_STEP_LIMIT),
            Err(AStarError::InvalidReference(NodeId(9)))
        );
        assert_eq!(
            find_route_without_turn_around(&g, NodeId(8), NodeId(1), DEFAULT_STEP_LIMIT),
            Err(AStarError::InvalidReference(NodeId(8)))
        );
    }

    #[test]
    fn one_way_blocks_return() {
        let g = super::helpers::line_graph();
        assert!(find_route(&g, NodeId(3), NodeId(1), DEFAULT_STEP_LIMIT).unwrap().is_empty());
    }

    #[test]
    fn prefers_cheaper_detour() {
        let g = super::helpers::ladder_graph();
        let route = find_route(&g, NodeId(4), NodeId(6), DEFAULT_STEP_LIMIT).unwrap();
        // 4→5→6 costs 2×2 units, 4→1→2→3→6 costs 2+1+1+2 units.
        assert_eq!(route, vec![NodeId(4), NodeId(5), NodeId(6)]);

        let route = find_route(&g, NodeId(1), NodeId(3), DEFAULT_STEP_LIMIT).unwrap();
        assert_eq!(route, vec![NodeId(1), NodeId(2), NodeId(3)]);
    }

    #[test]
    fn dangling_edges_are_skipped() {
        let mut g = super::helpers::ladder_graph();
        g.delete(NodeId(2));
        let route = find_route(&g, NodeId(1), NodeId(3), DEFAULT_STEP_LIMIT).unwrap();
        assert_eq!(route, vec![NodeId(1), NodeId(4), NodeId(5), NodeId(6), NodeId(3)]);
    }

    #[test]
    fn deterministic() {
        let g = super::helpers::ladder_graph();
        let first = find_route(&g, NodeId(1), NodeId(6), DEFAULT_STEP_LIMIT).unwrap();
        for _ in 0..10 {
            assert_eq!(find_route(&g, NodeId(1), NodeId(6), DEFAULT_STEP_LIMIT).unwrap(), first);
        }
    }
}

// ── Step limit ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod step_limit {
    use rx_core::NodeId;
    use rx_graph::{Graph, Node};

    use crate::{find_route, find_route_without_turn_around, AStarError};

    /// Two components: a chain of `big` nodes (ids 1..=big) and a chain of 3
    /// nodes (ids 1001..=1003).
    fn two_components(big: i64) -> Graph {
        let mut g = Graph::new();
        for i in 1..=big {
            g.set(Node::canonical(i, 50.0, 19.0 + i as f32 * 0.001));
        }
        for i in 1..big {
            super::helpers::connect_both(&mut g, i, i + 1, 1.0);
        }
        for i in 1001..=1003 {
            g.set(Node::canonical(i, 51.0, 19.0 + (i - 1000) as f32 * 0.001));
        }
        super::helpers::connect_both(&mut g, 1001, 1002, 1.0);
        super::helpers::connect_both(&mut g, 1002, 1003, 1.0);
        g
    }

    #[test]
    fn large_component_exceeds_limit() {
        let g = two_components(50);
        assert_eq!(
            find_route(&g, NodeId(1), NodeId(1001), 20),
            Err(AStarError::StepLimitExceeded)
        );
        assert_eq!(
            find_route_without_turn_around(&g, NodeId(1), NodeId(1001), 20),
            Err(AStarError::StepLimitExceeded)
        );
    }

    #[test]
    fn small_component_is_exhausted() {
        let g = two_components(50);
        // Only 3 nodes reachable from 1001.
        assert!(find_route(&g, NodeId(1001), NodeId(1), 20).unwrap().is_empty());
        assert!(find_route_without_turn_around(&g, NodeId(1001), NodeId(1), 20).unwrap().is_empty());
    }

    #[test]
    fn generous_limit_reports_no_route() {
        let g = two_components(50);
        assert!(find_route(&g, NodeId(1), NodeId(1001), 1_000).unwrap().is_empty());
    }

    #[test]
    fn limit_counts_expansions() {
        let g = two_components(50);
        // Exactly 50 nodes reachable: 50 expansions are allowed, 49 are not.
        assert!(find_route(&g, NodeId(1), NodeId(1001), 50).unwrap().is_empty());
        assert_eq!(
            find_route(&g, NodeId(1), NodeId(1001), 49),
            Err(AStarError::StepLimitExceeded)
        );
    }
}

// ── Turn-around suppression ───────────────────────────────────────────────────

#[cfg(test)]
mod turn_around {
    use rx_core::NodeId;
    use rx_graph::{Graph, Node};

    use crate::{find_route, find_route_without_turn_around, to_osm_ids, DEFAULT_STEP_LIMIT};

    /// ```text
    ///           3 (B)
    ///           │
    /// 1 (A) ─── 2 (V)
    ///           │
    ///           4 (C)
    /// ```
    ///
    /// with "no A → V → B" encoded by hand: A now leads to a phantom V'
    /// which only continues to A and C.
    fn restricted_junction() -> (Graph, NodeId) {
        let mut g = Graph::new();
        g.set(Node::canonical(1, 50.000, 19.000));
        g.set(Node::canonical(2, 50.000, 19.001));
        g.set(Node::canonical(3, 50.001, 19.001));
        g.set(Node::canonical(4, 49.999, 19.001));
        super::helpers::connect_both(&mut g, 1, 2, 1.0);
        super::helpers::connect_both(&mut g, 2, 3, 1.0);
        super::helpers::connect_both(&mut g, 2, 4, 1.0);

        let via = g.add_phantom(NodeId(2)).unwrap();
        let cost = g.get_edge(NodeId(1), NodeId(2));
        g.delete_edge(NodeId(1), NodeId(2));
        g.set_edge(NodeId(1), via, cost);
        g.set_edge(via, NodeId(1), cost);
        g.set_edge(via, NodeId(4), g.get_edge(NodeId(2), NodeId(4)));
        (g, via)
    }

    #[test]
    fn restriction_bypass_via_bounce() {
        let (g, via) = restricted_junction();
        // Plain search escapes the restriction by bouncing off the dead end.
        let route = find_route(&g, NodeId(1), NodeId(3), DEFAULT_STEP_LIMIT).unwrap();
        assert_eq!(route, vec![NodeId(1), via, NodeId(4), NodeId(2), NodeId(3)]);
    }

    #[test]
    fn suppression_blocks_bounce() {
        let (g, _) = restricted_junction();
        let route = find_route_without_turn_around(&g, NodeId(1), NodeId(3), DEFAULT_STEP_LIMIT).unwrap();
        assert!(route.is_empty(), "got {route:?}");
    }

    #[test]
    fn unrestricted_turn_unaffected() {
        let (g, via) = restricted_junction();
        let route = find_route_without_turn_around(&g, NodeId(1), NodeId(4), DEFAULT_STEP_LIMIT).unwrap();
        assert_eq!(route, vec![NodeId(1), via, NodeId(4)]);
        assert_eq!(to_osm_ids(&g, &route), Some(vec![1, 2, 4]));
    }

    #[test]
    fn u_turn_on_plain_two_way_road() {
        // 1 ─ 2 ─ 3, start at 2 facing nowhere in particular: both
        // directions are fine, only immediate reversal is blocked.
        let g = {
            let mut g = super::helpers::line_graph();
            super::helpers::connect(&mut g, 2, 1, 1.0);
            super::helpers::connect(&mut g, 3, 2, 1.0);
            g
        };
        let route = find_route_without_turn_around(&g, NodeId(2), NodeId(1), DEFAULT_STEP_LIMIT).unwrap();
        assert_eq!(route, vec![NodeId(2), NodeId(1)]);
    }

    #[test]
    fn osm_ids_of_missing_node() {
        let (g, _) = restricted_junction();
        assert_eq!(to_osm_ids(&g, &[NodeId(1), NodeId(77)]), None);
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod router {
    use rx_core::NodeId;

    use crate::{AStarError, AStarRouter, Router, DEFAULT_STEP_LIMIT};

    #[test]
    fn defaults() {
        let r = AStarRouter::default();
        assert!(r.without_turn_around);
        assert_eq!(r.step_limit, DEFAULT_STEP_LIMIT);
    }

    #[test]
    fn dispatches_through_trait_object() {
        let g = super::helpers::ladder_graph();
        let routers: Vec<Box<dyn Router>> = vec![
            Box::new(AStarRouter::new()),
            Box::new(AStarRouter::new().without_turn_around(false)),
        ];
        for r in &routers {
            assert_eq!(
                r.route(&g, NodeId(1), NodeId(3)).unwrap(),
                vec![NodeId(1), NodeId(2), NodeId(3)]
            );
        }
    }

    #[test]
    fn step_limit_setting_is_honoured() {
        let g = super::helpers::ladder_graph();
        let r = AStarRouter::new().step_limit(0);
        assert_eq!(r.find(&g, NodeId(4), NodeId(3)), Err(AStarError::StepLimitExceeded));
    }
}

// ── Optimality against a reference Dijkstra ───────────────────────────────────

#[cfg(test)]
mod optimality {
    use std::cmp::Reverse;
    use std::collections::BinaryHeap;

    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use rx_core::NodeId;
    use rx_graph::{Graph, Node};

    use crate::{find_route, find_route_without_turn_around, DEFAULT_STEP_LIMIT};

    fn random_graph(rng: &mut SmallRng, nodes: i64, edges: usize) -> Graph {
        let mut g = Graph::new();
        for id in 1..=nodes {
            let lat = 50.0 + rng.gen_range(0.0..0.05);
            let lon = 19.0 + rng.gen_range(0.0..0.05);
            g.set(Node::canonical(id, lat, lon));
        }
        for _ in 0..edges {
            let a = rng.gen_range(1..=nodes);
            let b = rng.gen_range(1..=nodes);
            if a != b {
                super::helpers::connect(&mut g, a, b, rng.gen_range(1.0..3.0));
            }
        }
        g
    }

    /// Plain Dijkstra in f64 over integer-scaled costs.  Returns the minimum
    /// cost, or `None` if `to` is unreachable.
    fn reference_cost(g: &Graph, from: NodeId, to: NodeId) -> Option<f64> {
        let mut dist: std::collections::HashMap<NodeId, f64> = Default::default();
        let mut heap = BinaryHeap::new();
        dist.insert(from, 0.0);
        // Costs scaled to micrometres so they can be ordered as integers.
        heap.push(Reverse((0u64, from)));
        while let Some(Reverse((scaled, node))) = heap.pop() {
            let cost = dist[&node];
            if scaled as f64 / 1e9 > cost + 1e-6 {
                continue;
            }
            if node == to {
                return Some(cost);
            }
            for e in g.edges(node) {
                let next = cost + e.cost as f64;
                if dist.get(&e.to).is_none_or(|&d| next < d) {
                    dist.insert(e.to, next);
                    heap.push(Reverse(((next * 1e9) as u64, e.to)));
                }
            }
        }
        None
    }

    #[test]
    fn matches_exhaustive_search() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        for _ in 0..30 {
            let g = random_graph(&mut rng, 25, 70);
            for _ in 0..10 {
                let from = NodeId(rng.gen_range(1..=25));
                let to = NodeId(rng.gen_range(1..=25));
                let route = find_route(&g, from, to, DEFAULT_STEP_LIMIT).unwrap();
                match reference_cost(&g, from, to) {
                    None => assert!(route.is_empty()),
                    Some(best) => {
                        assert_eq!(route.first(), Some(&from));
                        assert_eq!(route.last(), Some(&to));
                        let cost = super::helpers::route_cost(&g, &route) as f64;
                        assert!(
                            (cost - best).abs() <= 1e-4 * best.max(1e-3),
                            "A* {cost} vs Dijkstra {best} for {from} → {to}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn turn_around_variant_never_beats_optimum() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..20 {
            let g = random_graph(&mut rng, 20, 60);
            let from = NodeId(rng.gen_range(1..=20));
            let to = NodeId(rng.gen_range(1..=20));
            let route = find_route_without_turn_around(&g, from, to, DEFAULT_STEP_LIMIT).unwrap();
            if let Some(best) = reference_cost(&g, from, to) {
                if !route.is_empty() {
                    let cost = super::helpers::route_cost(&g, &route) as f64;
                    assert!(cost + 1e-4 >= best);
                }
            } else {
                assert!(route.is_empty());
            }
        }
    }
}
