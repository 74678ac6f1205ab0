//! Layout properties checked through the public API.

use charmviz::config::SimulationConfig;
use charmviz::force::{self, EQUILIBRIUM_DISTANCE};
use charmviz::geometry::EdgeGeometry;
use charmviz::graph::{GraphStore, scatter_positions};
use charmviz::math;
use charmviz::simulation::Simulation;

fn build(nodes: &[(&str, [f32; 3])], edges: &[(&str, &str)]) -> GraphStore {
    GraphStore::build(
        nodes.iter().map(|(id, p)| (id.to_string(), *p)),
        edges.iter().copied(),
    )
    .expect("valid graph")
}

#[test]
fn path_graph_has_two_segments_in_edge_order() {
    let mut store = build(
        &[
            ("a", [-3.0, 0.0, 0.0]),
            ("b", [0.0, 0.5, 0.0]),
            ("c", [3.0, 0.0, 1.0]),
        ],
        &[("a", "b"), ("b", "c")],
    );
    let mut geometry = EdgeGeometry::from_store(&store);
    let mut sim = Simulation::default();

    for _ in 0..4 {
        sim.step(&mut store, &mut geometry);

        let positions = geometry.positions();
        assert_eq!(positions.len(), 12);

        let [a, b, c] = [0, 1, 2].map(|i| store.nodes()[i].position);
        assert_eq!(&positions[0..3], &a);
        assert_eq!(&positions[3..6], &b);
        assert_eq!(&positions[6..9], &b);
        assert_eq!(&positions[9..12], &c);

        // No segment joins a and c directly
        for segment in positions.chunks(6) {
            let ends = [&segment[0..3], &segment[3..6]];
            assert!(!(ends.contains(&&a[..]) && ends.contains(&&c[..])));
        }
    }
}

#[test]
fn relations_are_symmetric_for_every_edge() {
    let store = build(
        &[
            ("a", [0.0; 3]),
            ("b", [1.0, 0.0, 0.0]),
            ("c", [2.0, 0.0, 0.0]),
            ("d", [3.0, 0.0, 0.0]),
        ],
        &[("a", "b"), ("c", "a"), ("d", "c"), ("b", "a")],
    );
    for edge in store.edges() {
        assert!(store.are_related(edge.a, edge.b));
        assert!(store.are_related(edge.b, edge.a));
    }
    assert!(!store.are_related(1, 3));
}

#[test]
fn equilibrium_force_vanishes() {
    assert!(force::lj_force(EQUILIBRIUM_DISTANCE as f32).abs() < 1e-6);
}

#[test]
fn random_graph_stays_finite_and_centered() {
    let ids: Vec<String> = (0..12).map(|i| format!("n{i}")).collect();
    let positions = scatter_positions(ids.len(), 0.1, Some(2024));
    let edges: Vec<(String, String)> = (1..ids.len())
        .map(|i| (ids[i - 1].clone(), ids[i].clone()))
        .chain([(ids[0].clone(), ids[6].clone())])
        .collect();

    let mut store = GraphStore::build(ids.iter().cloned().zip(positions), edges).unwrap();
    let mut geometry = EdgeGeometry::from_store(&store);
    let mut sim = Simulation::new(SimulationConfig::default());

    for _ in 0..20 {
        sim.advance_frame(&mut store, &mut geometry);
        assert!(math::length(store.centroid()) < 1e-3);
        assert_eq!(geometry.positions().len(), 6 * store.edge_count());
    }
    for node in store.nodes() {
        assert!(node.position.iter().all(|c| c.is_finite()));
    }
}

#[test]
fn related_pairs_end_near_equilibrium() {
    let mut store = build(
        &[("a", [0.05, 0.0, 0.0]), ("b", [-0.05, 0.02, 0.0])],
        &[("a", "b")],
    );
    let mut geometry = EdgeGeometry::from_store(&store);
    let mut sim = Simulation::default();
    for _ in 0..50 {
        sim.advance_frame(&mut store, &mut geometry);
    }
    let nodes = store.nodes();
    let r = math::length(math::sub(nodes[0].position, nodes[1].position));
    assert!((r - 4.0).abs() < 1e-2, "settled at r = {r}");
}
