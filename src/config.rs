//! Configuration
//!
//! Every knob has a default matching the stock visualizer, so an empty or
//! partial YAML file is a valid configuration.

use std::f32::consts::{FRAC_PI_2, PI};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{VizError, VizResult};
use crate::force::DEFAULT_FORCE_LIMIT;
use crate::math::{self, Vec3};

// =============================================================================
// Default Constants
// =============================================================================

/// Integration substeps per rendered frame
pub const DEFAULT_SUBSTEPS: u32 = 16;

/// Scale applied to each clamped pair force before it moves a node
pub const DEFAULT_FORCE_SCALE: f32 = 0.125;

/// Separation below which two nodes are treated as coincident
pub const DEFAULT_MIN_DISTANCE: f32 = 1e-4;

/// Distance from the origin at which nodes are initially scattered
pub const DEFAULT_INITIAL_SPREAD: f32 = 0.1;

/// Light grey background
pub const DEFAULT_CLEAR_COLOR: [f32; 4] = [0.9, 0.9, 0.9, 1.0];

/// Field of view in radians (90 degrees)
pub const DEFAULT_FOV: f32 = FRAC_PI_2;

pub const DEFAULT_NEAR: f32 = 0.01;

pub const DEFAULT_FAR: f32 = 100.0;

pub const DEFAULT_EYE: Vec3 = [0.0, 0.0, 10.0];

/// Spin rate of the default rotation controller, radians per frame
pub const DEFAULT_SPIN_SPEED: f32 = 0.1;

/// Layout simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Substeps run before each frame is drawn
    pub substeps: u32,
    /// Scale applied to clamped pair forces
    pub force_scale: f32,
    /// Pair forces are clamped to `[-force_limit, force_limit]`
    pub force_limit: f32,
    /// Distance floor used for coincident nodes
    pub min_distance: f32,
    /// Initial distance of every node from the origin
    pub initial_spread: f32,
    /// Seed for initial placement (random when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            substeps: DEFAULT_SUBSTEPS,
            force_scale: DEFAULT_FORCE_SCALE,
            force_limit: DEFAULT_FORCE_LIMIT,
            min_distance: DEFAULT_MIN_DISTANCE,
            initial_spread: DEFAULT_INITIAL_SPREAD,
            seed: None,
        }
    }
}

/// Camera and frame parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Background color (RGBA)
    pub clear_color: [f32; 4],
    /// Field of view in radians
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Camera position
    pub eye: Vec3,
    /// Point the camera looks at
    pub target: Vec3,
    pub up: Vec3,
    /// Viewport width in pixels
    pub width: u32,
    /// Viewport height in pixels
    pub height: u32,
    /// Axis of the default spin rotation
    pub spin_axis: Vec3,
    /// Spin rate in radians per frame
    pub spin_speed: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: DEFAULT_CLEAR_COLOR,
            fov: DEFAULT_FOV,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            eye: DEFAULT_EYE,
            target: [0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0],
            width: 800,
            height: 600,
            spin_axis: [1.0, 0.0, 0.0],
            spin_speed: DEFAULT_SPIN_SPEED,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub render: RenderConfig,
}

impl Config {
    /// Read a YAML configuration file and validate it
    pub fn from_path(path: &Path) -> VizResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a YAML configuration document and validate it
    pub fn from_yaml(content: &str) -> VizResult<Self> {
        let config: Config =
            serde_yaml::from_str(content).map_err(|e| VizError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation or camera cannot work with
    pub fn validate(&self) -> VizResult<()> {
        let sim = &self.simulation;
        if sim.substeps == 0 {
            return Err(VizError::Config("substeps must be at least 1".into()));
        }
        if !is_positive(sim.force_scale) {
            return Err(VizError::Config("force_scale must be finite and positive".into()));
        }
        if !is_positive(sim.force_limit) {
            return Err(VizError::Config("force_limit must be positive".into()));
        }
        if !is_positive(sim.min_distance) {
            return Err(VizError::Config("min_distance must be positive".into()));
        }
        if !is_positive(sim.initial_spread) {
            return Err(VizError::Config(
                "initial_spread must be finite and positive".into(),
            ));
        }

        let render = &self.render;
        if render.width == 0 || render.height == 0 {
            return Err(VizError::Config("viewport size must be non-zero".into()));
        }
        if !is_positive(render.near) || !is_positive(render.far - render.near) {
            return Err(VizError::Config("clip planes must satisfy 0 < near < far".into()));
        }
        if !is_positive(render.fov) || render.fov >= PI {
            return Err(VizError::Config("fov must lie strictly between 0 and pi".into()));
        }
        for (name, v) in [
            ("eye", render.eye),
            ("target", render.target),
            ("up", render.up),
            ("spin_axis", render.spin_axis),
        ] {
            if !v.iter().all(|c| c.is_finite()) {
                return Err(VizError::Config(format!("{name} must be finite")));
            }
        }
        if math::length(math::sub(render.target, render.eye)) == 0.0 {
            return Err(VizError::Config("eye and target must differ".into()));
        }
        if !render.clear_color.iter().all(|c| c.is_finite()) {
            return Err(VizError::Config("clear_color must be finite".into()));
        }
        if !render.spin_speed.is_finite() {
            return Err(VizError::Config("spin_speed must be finite".into()));
        }
        Ok(())
    }

    /// Serialize back to YAML
    pub fn to_yaml(&self) -> VizResult<String> {
        serde_yaml::to_string(self).map_err(|e| VizError::Config(e.to_string()))
    }
}

/// Finite and strictly greater than zero (rejects NaN)
fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
