//! 随机图上的算法性质测试

use graphbench::algorithm::{
    bellman_ford, bfs, check_bipartite, dfs, dijkstra, fleury, ford_fulkerson, hierholzer,
    kruskal, prim,
};
use graphbench::convert;
use graphbench::{Algorithm, AlgorithmRequest, Engine, Graph, Link};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

const ROUNDS: u64 = 40;

fn node_ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("n{}", i)).collect()
}

/// 随机图，权重为非负整数
fn random_graph(rng: &mut StdRng, directed: bool, n: usize, m: usize) -> Graph {
    let ids = node_ids(n);
    let mut graph = Graph::new(directed).with_nodes(ids.iter().cloned());
    for _ in 0..m {
        let u = rng.gen_range(0..n);
        let v = rng.gen_range(0..n);
        if u == v {
            continue;
        }
        let w = rng.gen_range(0..10) as f64;
        graph = graph.with_link(&ids[u], &ids[v], w);
    }
    graph
}

/// Floyd-Warshall 作为对照
fn all_pairs(graph: &Graph) -> Vec<Vec<f64>> {
    let n = graph.node_count();
    let pos: HashMap<&str, usize> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.id.as_str(), i))
        .collect();
    let mut dist = vec![vec![f64::INFINITY; n]; n];
    for (i, row) in dist.iter_mut().enumerate() {
        row[i] = 0.0;
    }
    for link in &graph.links {
        let (u, v) = (pos[link.source.as_str()], pos[link.target.as_str()]);
        dist[u][v] = dist[u][v].min(link.weight);
        if !graph.is_directed {
            dist[v][u] = dist[v][u].min(link.weight);
        }
    }
    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                let through = dist[i][k] + dist[k][j];
                if through < dist[i][j] {
                    dist[i][j] = through;
                }
            }
        }
    }
    dist
}

fn path_weight(graph: &Graph, path: &[String]) -> f64 {
    path.windows(2)
        .map(|pair| {
            graph
                .links
                .iter()
                .filter(|l| {
                    (l.source == pair[0] && l.target == pair[1])
                        || (!graph.is_directed && l.source == pair[1] && l.target == pair[0])
                })
                .map(|l| l.weight)
                .fold(f64::INFINITY, f64::min)
        })
        .sum()
}

#[test]
fn test_dijkstra_matches_floyd_warshall() {
    let mut rng = StdRng::seed_from_u64(7);
    for round in 0..ROUNDS {
        let directed = round % 2 == 0;
        let graph = random_graph(&mut rng, directed, 8, 18);
        let expected = all_pairs(&graph);

        for (s, source) in graph.nodes.iter().enumerate() {
            let result = dijkstra(&graph, &source.id, None).unwrap();
            let distances = result.distances.unwrap();
            for (t, target) in graph.nodes.iter().enumerate() {
                let got = distances[&target.id];
                if expected[s][t].is_finite() {
                    assert_eq!(got, Some(expected[s][t]), "round {} {}->{}", round, s, t);
                } else {
                    assert_eq!(got, None);
                }
            }
        }
    }
}

#[test]
fn test_dijkstra_path_weight_equals_distance() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..ROUNDS {
        let graph = random_graph(&mut rng, true, 7, 16);
        let result = dijkstra(&graph, "n0", Some("n6")).unwrap();
        let path = result.path.unwrap();
        match result.distance {
            Some(d) => {
                assert_eq!(path.first().map(String::as_str), Some("n0"));
                assert_eq!(path.last().map(String::as_str), Some("n6"));
                assert_eq!(path_weight(&graph, &path), d);
            }
            None => assert!(path.is_empty()),
        }
    }
}

#[test]
fn test_bellman_ford_agrees_with_dijkstra() {
    let mut rng = StdRng::seed_from_u64(13);
    for round in 0..ROUNDS {
        let graph = random_graph(&mut rng, round % 2 == 1, 9, 20);
        let a = dijkstra(&graph, "n0", None).unwrap();
        let b = bellman_ford(&graph, "n0", None).unwrap();
        assert_eq!(b.has_negative_cycle, Some(false));
        assert_eq!(a.distances, b.distances);
    }
}

#[test]
fn test_traversals_visit_reachable_set() {
    let mut rng = StdRng::seed_from_u64(17);
    for round in 0..ROUNDS {
        let graph = random_graph(&mut rng, round % 2 == 0, 10, 12);
        let reachable = all_pairs(&graph)[0]
            .iter()
            .filter(|d| d.is_finite())
            .count();

        for result in [bfs(&graph, "n0").unwrap(), dfs(&graph, "n0").unwrap()] {
            let visited = result.visited.unwrap();
            assert_eq!(visited.len(), reachable);
            assert_eq!(visited[0], "n0");
            let mut unique = visited.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), visited.len());
        }
    }
}

#[test]
fn test_prim_and_kruskal_same_weight() {
    let mut rng = StdRng::seed_from_u64(19);
    for _ in 0..ROUNDS {
        let graph = random_graph(&mut rng, false, 9, 16);
        let p = prim(&graph).unwrap();
        let k = kruskal(&graph).unwrap();
        assert_eq!(p.mst_weight(), k.mst_weight());

        // 生成森林的边数 = n - 连通分量数
        let pairs = all_pairs(&graph);
        let mut components = 0;
        let mut seen = vec![false; graph.node_count()];
        for i in 0..graph.node_count() {
            if !seen[i] {
                components += 1;
                for (j, d) in pairs[i].iter().enumerate() {
                    if d.is_finite() {
                        seen[j] = true;
                    }
                }
            }
        }
        let expected = graph.node_count() - components;
        assert_eq!(p.mst_links.unwrap().len(), expected);
        assert_eq!(k.mst_links.unwrap().len(), expected);
    }
}

#[test]
fn test_max_flow_equals_min_cut() {
    let mut rng = StdRng::seed_from_u64(23);
    let ids = node_ids(7);
    for _ in 0..ROUNDS {
        let mut graph = Graph::directed().with_nodes(ids.iter().cloned());
        for _ in 0..16 {
            let u = rng.gen_range(0..7);
            let v = rng.gen_range(0..7);
            if u != v {
                let cap = rng.gen_range(0..8) as f64;
                graph = graph.with_capacity_link(&ids[u], &ids[v], cap);
            }
        }

        let result = ford_fulkerson(&graph, "n0", "n6").unwrap();
        let max_flow = result.max_flow.unwrap();
        let cut: f64 = result.min_cut.unwrap().iter().map(Link::capacity).sum();
        assert!((max_flow - cut).abs() < 1e-9, "flow {} cut {}", max_flow, cut);

        // 源点净流出 = 最大流
        let flow = result.flow_details.unwrap();
        let out: f64 = flow
            .iter()
            .filter(|(k, _)| k.starts_with("n0->"))
            .map(|(_, v)| v)
            .sum();
        let back: f64 = flow
            .iter()
            .filter(|(k, _)| k.ends_with("->n0"))
            .map(|(_, v)| v)
            .sum();
        assert!((out - back - max_flow).abs() < 1e-9);
    }
}

/// 若干条从 n0 出发的闭合游走叠加，必然连通且度数全为偶数
fn random_eulerian(rng: &mut StdRng) -> Graph {
    let ids = node_ids(6);
    let mut graph = Graph::undirected().with_nodes(ids.iter().cloned());
    for _ in 0..rng.gen_range(1..4) {
        let mut walk = vec![0usize];
        for _ in 0..rng.gen_range(2..6) {
            let last = walk[walk.len() - 1];
            let mut next = rng.gen_range(0..6);
            while next == last {
                next = rng.gen_range(0..6);
            }
            walk.push(next);
        }
        if walk[walk.len() - 1] == 0 {
            walk.pop();
        }
        walk.push(0);
        for pair in walk.windows(2) {
            graph = graph.with_link(&ids[pair[0]], &ids[pair[1]], 1.0);
        }
    }
    graph
}

fn assert_covers_every_link(graph: &Graph, circuit: &[String]) {
    assert_eq!(circuit.len(), graph.link_count() + 1);
    assert_eq!(circuit.first(), circuit.last());

    let key = |a: &str, b: &str| {
        if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        }
    };
    let mut unused: HashMap<(String, String), usize> = HashMap::new();
    for link in &graph.links {
        *unused.entry(key(&link.source, &link.target)).or_insert(0) += 1;
    }
    for pair in circuit.windows(2) {
        let count = unused
            .get_mut(&key(&pair[0], &pair[1]))
            .expect("circuit uses a link that does not exist");
        assert!(*count > 0, "link {}-{} used too often", pair[0], pair[1]);
        *count -= 1;
    }
}

#[test]
fn test_euler_circuits_cover_every_link() {
    let mut rng = StdRng::seed_from_u64(29);
    for _ in 0..ROUNDS {
        let graph = random_eulerian(&mut rng);
        for result in [fleury(&graph).unwrap(), hierholzer(&graph).unwrap()] {
            let circuit = result.euler_path.unwrap().unwrap();
            assert_covers_every_link(&graph, &circuit);
        }
    }
}

#[test]
fn test_bipartite_partition_is_proper() {
    let mut rng = StdRng::seed_from_u64(31);
    let ids = node_ids(10);
    for _ in 0..ROUNDS {
        // 偶数下标与奇数下标之间连边
        let mut graph = Graph::undirected().with_nodes(ids.iter().cloned());
        for _ in 0..14 {
            let u = rng.gen_range(0..5) * 2;
            let v = rng.gen_range(0..5) * 2 + 1;
            graph = graph.with_link(&ids[u], &ids[v], 1.0);
        }

        let result = check_bipartite(&graph).unwrap();
        assert_eq!(result.is_bipartite, Some(true));
        let sets = result.bipartite_sets.unwrap();
        assert_eq!(sets.set_a.len() + sets.set_b.len(), graph.node_count());
        for link in &graph.links {
            let a = sets.set_a.contains(&link.source);
            let b = sets.set_a.contains(&link.target);
            assert_ne!(a, b, "{}-{} inside one set", link.source, link.target);
        }
    }
}

#[test]
fn test_edge_list_round_trip_random() {
    let mut rng = StdRng::seed_from_u64(37);
    for round in 0..ROUNDS {
        let graph = random_graph(&mut rng, round % 2 == 0, 6, 10);
        let edges = convert::to_edge_list(&graph).unwrap();
        let ids: Vec<String> = graph.nodes.iter().map(|n| n.id.clone()).collect();
        let rebuilt =
            convert::from_edge_list(&edges, graph.is_directed, Some(ids.as_slice())).unwrap();
        assert_eq!(rebuilt.node_count(), graph.node_count());

        let relabelled: Vec<(String, String, f64)> = convert::to_edge_list(&rebuilt)
            .unwrap()
            .into_iter()
            .map(|(u, v, w)| {
                (
                    rebuilt.label_of(&u).to_string(),
                    rebuilt.label_of(&v).to_string(),
                    w,
                )
            })
            .collect();
        assert_eq!(relabelled, edges);
    }
}

#[test]
fn test_triangle_scenario() {
    let graph = Graph::undirected()
        .with_nodes(["A", "B", "C"])
        .with_link("A", "B", 1.0)
        .with_link("B", "C", 2.0)
        .with_link("A", "C", 4.0);
    let engine = Engine::default();

    let result = engine
        .run(&AlgorithmRequest::new(Algorithm::Dijkstra, graph.clone()).with_start("A").with_end("C"))
        .unwrap();
    assert_eq!(result.path.unwrap(), vec!["A", "B", "C"]);
    assert_eq!(result.distance, Some(3.0));

    let result = engine
        .run(&AlgorithmRequest::new(Algorithm::Kruskal, graph.clone()))
        .unwrap();
    assert_eq!(result.mst_weight(), Some(3.0));
    let links: Vec<(String, String)> = result
        .mst_links
        .unwrap()
        .into_iter()
        .map(|l| (l.source, l.target))
        .collect();
    assert_eq!(
        links,
        vec![
            ("A".to_string(), "B".to_string()),
            ("B".to_string(), "C".to_string())
        ]
    );

    let result = engine
        .run(&AlgorithmRequest::new(Algorithm::Bipartite, graph))
        .unwrap();
    assert_eq!(result.is_bipartite, Some(false));
}

#[test]
fn test_flow_network_scenario() {
    let graph = Graph::directed()
        .with_nodes(["S", "A", "B", "T"])
        .with_capacity_link("S", "A", 3.0)
        .with_capacity_link("S", "B", 2.0)
        .with_capacity_link("A", "T", 2.0)
        .with_capacity_link("B", "T", 3.0);
    let request = AlgorithmRequest::new(Algorithm::FordFulkerson, graph)
        .with_start("S")
        .with_end("T");
    let result = Engine::default().run(&request).unwrap();
    assert_eq!(result.max_flow, Some(4.0));

    // 轨迹是冻结的数据，序列化后可完整回放
    let json = serde_json::to_string(&result).unwrap();
    let replayed: graphbench::AlgorithmResult = serde_json::from_str(&json).unwrap();
    assert_eq!(replayed.steps, result.steps);
}
