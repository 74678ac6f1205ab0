//! Force-directed layout simulation
//!
//! Overdamped, velocity-free integration: every substep recomputes all
//! pairwise forces from scratch, moves each node by its accumulated force,
//! re-centers the layout on the origin, and rebuilds the edge geometry.

use tracing::trace;

use crate::config::SimulationConfig;
use crate::force;
use crate::geometry::EdgeGeometry;
use crate::graph::GraphStore;
use crate::math::{self, Vec3};

/// Layout simulation driving a [`GraphStore`]
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    steps: u64,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config, steps: 0 }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Total substeps run so far
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Run one frame's worth of substeps
    pub fn advance_frame(&mut self, store: &mut GraphStore, geometry: &mut EdgeGeometry) {
        for _ in 0..self.config.substeps {
            self.step(store, geometry);
        }
    }

    /// Run a single substep
    pub fn step(&mut self, store: &mut GraphStore, geometry: &mut EdgeGeometry) {
        self.accumulate_forces(store);
        integrate(store);
        recenter(store);
        geometry.rebuild(store);
        self.steps += 1;
    }

    /// Recompute every node's force accumulator from current positions.
    ///
    /// Reads positions only; nothing moves until all forces are known.
    fn accumulate_forces(&self, store: &mut GraphStore) {
        let forces: Vec<Vec3> = {
            let nodes = store.nodes();
            (0..nodes.len())
                .map(|a| {
                    (0..nodes.len())
                        .filter(|&b| b != a)
                        .fold([0.0; 3], |acc, b| {
                            let related = nodes[a].is_related_to(b);
                            let f = self.pair_contribution(
                                a,
                                b,
                                nodes[a].position,
                                nodes[b].position,
                                related,
                            );
                            math::add(acc, f)
                        })
                })
                .collect()
        };

        for (node, force) in store.nodes_mut().iter_mut().zip(forces) {
            node.force = force;
        }
    }

    /// Force exerted on node `a` by node `b`
    fn pair_contribution(&self, a: usize, b: usize, pa: Vec3, pb: Vec3, related: bool) -> Vec3 {
        let separation = math::sub(pa, pb);
        let r = math::length(separation);

        let direction = if r >= f32::MIN_POSITIVE && r.is_finite() {
            math::scale(separation, 1.0 / r)
        } else {
            trace!(a, b, r, "coincident nodes, using nominal direction");
            // The pair's two members are pushed along opposite directions
            let (lo, hi) = if a < b { (a, b) } else { (b, a) };
            let nominal = nominal_direction(lo, hi);
            if a == hi { nominal } else { math::scale(nominal, -1.0) }
        };

        // Only the magnitude is floored; the direction above stays exact
        let r = r.max(self.config.min_distance);
        let magnitude = force::clamp_force(force::pair_force(r, related), self.config.force_limit);
        math::scale(direction, magnitude * self.config.force_scale)
    }
}

/// Fixed unit direction for the node pair `(lo, hi)`, `lo < hi`.
///
/// Pairs are numbered `hi * (hi - 1) / 2 + lo` and placed on a golden-angle
/// spiral over the sphere, so different pairs of a coincident cluster
/// separate along different axes.
fn nominal_direction(lo: usize, hi: usize) -> Vec3 {
    const INV_GOLDEN_RATIO: f64 = 0.618_033_988_749_895;
    const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

    let k = (hi * hi.saturating_sub(1) / 2 + lo) as f64;
    let z = 1.0 - 2.0 * ((k + 0.5) * INV_GOLDEN_RATIO).fract();
    let ring = (1.0 - z * z).max(0.0).sqrt();
    let phi = k * GOLDEN_ANGLE;
    [
        (ring * phi.cos()) as f32,
        (ring * phi.sin()) as f32,
        z as f32,
    ]
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

/// Move every node by its accumulated force (unit time step, unit mass)
fn integrate(store: &mut GraphStore) {
    for node in store.nodes_mut() {
        node.position = math::add(node.position, node.force);
    }
}

/// Shift every node so the centroid sits at the origin
fn recenter(store: &mut GraphStore) {
    let centroid = store.centroid();
    for node in store.nodes_mut() {
        node.position = math::sub(node.position, centroid);
    }
}
