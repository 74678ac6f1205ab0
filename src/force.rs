//! Pairwise force model
//!
//! Lennard-Jones style forces between two nodes at distance `r`. Related
//! nodes settle at the equilibrium distance [`EQUILIBRIUM_DISTANCE`];
//! unrelated nodes only push each other apart.
//!
//! Returned magnitudes are signed along the separation axis: positive pushes
//! the pair apart, negative pulls it together.

/// Well depth of the potential
pub const ALPHA: f64 = 1.0;

/// Equilibrium distance between related nodes
pub const EQUILIBRIUM_DISTANCE: f64 = 4.0;

/// Default bound applied to every magnitude before it moves a node
pub const DEFAULT_FORCE_LIMIT: f32 = 2.0;

/// Negative derivative of the Lennard-Jones potential.
///
/// Repulsive for `r < m`, attractive for `r > m`, zero at `r = m`.
pub fn lj_force(r: f32) -> f32 {
    let r = f64::from(r);
    let m6 = EQUILIBRIUM_DISTANCE.powi(6);
    let r6 = r.powi(6);
    let r13 = r.powi(13);
    (12.0 * ALPHA * m6 * (m6 - r6) / r13) as f32
}

/// Negative derivative of the repulsive term of the Lennard-Jones potential.
///
/// Always positive, diverging as `r -> 0`.
pub fn lj_repulsive(r: f32) -> f32 {
    let r = f64::from(r);
    let m12 = EQUILIBRIUM_DISTANCE.powi(12);
    let r13 = r.powi(13);
    (12.0 * m12 * ALPHA / r13) as f32
}

/// Force magnitude between two nodes, picking the curve by relation status
pub fn pair_force(r: f32, related: bool) -> f32 {
    if related { lj_force(r) } else { lj_repulsive(r) }
}

/// Clamp a magnitude into `[-limit, limit]`.
///
/// Infinities land on the nearest bound; NaN contributes nothing.
pub fn clamp_force(magnitude: f32, limit: f32) -> f32 {
    if magnitude.is_nan() {
        0.0
    } else {
        magnitude.clamp(-limit, limit)
    }
}
