//! Visualizer lifecycle and frame loop
//!
//! A [`Visualizer`] moves through three phases, never backwards:
//!
//! 1. `loading(bundle)`: waiting for the graph source
//! 2. `loading(icons)`: graph built, icons being resolved into textures
//! 3. `ready`: frames can be ticked
//!
//! Each tick runs the configured number of simulation substeps and then
//! submits one frame of draw calls.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::assets::{self, IconDirectory, TextureLoader};
use crate::bundle::{Bundle, BundleSource};
use crate::config::Config;
use crate::error::{VizError, VizResult};
use crate::geometry::EdgeGeometry;
use crate::graph::{self, GraphStore};
use crate::math::{Mat4, Vec3};
use crate::render::{DrawSubmitter, RenderPipeline, RenderStats};
use crate::rotation::RotationSource;
use crate::simulation::Simulation;

/// Loading phase of a visualizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    LoadingBundle,
    LoadingIcons,
    Ready,
}

impl fmt::Display for LoadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadPhase::LoadingBundle => write!(f, "loading(bundle)"),
            LoadPhase::LoadingIcons => write!(f, "loading(icons)"),
            LoadPhase::Ready => write!(f, "ready"),
        }
    }
}

/// Final position of a node, for export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodePosition {
    pub id: String,
    pub position: Vec3,
}

/// Everything a frame reads or writes: the graph, its derived edge
/// geometry, the simulation and the render pipeline.
#[derive(Debug, Clone)]
pub struct Scene {
    store: GraphStore,
    edges: EdgeGeometry,
    simulation: Simulation,
    pipeline: RenderPipeline,
}

impl Scene {
    /// Build a scene around an existing store
    pub fn new(store: GraphStore, config: &Config) -> Self {
        let edges = EdgeGeometry::from_store(&store);
        Self {
            store,
            edges,
            simulation: Simulation::new(config.simulation.clone()),
            pipeline: RenderPipeline::new(&config.render),
        }
    }

    /// Build a scene from a bundle, scattering nodes around the origin
    pub fn from_bundle(bundle: &Bundle, config: &Config) -> VizResult<Self> {
        let sim = &config.simulation;
        let positions =
            graph::scatter_positions(bundle.applications.len(), sim.initial_spread, sim.seed);
        let nodes = bundle
            .applications
            .iter()
            .map(|app| app.name.clone())
            .zip(positions);
        let store = GraphStore::build(nodes, bundle.relations.iter().map(|(a, b)| (a, b)))?;
        Ok(Self::new(store, config))
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn edges(&self) -> &EdgeGeometry {
        &self.edges
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }

    /// Run one frame's worth of substeps
    pub fn advance_frame(&mut self) {
        self.simulation.advance_frame(&mut self.store, &mut self.edges);
    }

    /// Submit the current layout
    pub fn render(&self, rotation: &Mat4, submitter: &mut dyn DrawSubmitter) -> RenderStats {
        self.pipeline
            .render(&self.store, &self.edges, rotation, submitter)
    }

    pub fn positions(&self) -> Vec<NodePosition> {
        self.store
            .nodes()
            .iter()
            .map(|n| NodePosition {
                id: n.id.clone(),
                position: n.position,
            })
            .collect()
    }
}

/// Outcome of the icon phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IconReport {
    /// Nodes that received a texture
    pub loaded: usize,
    /// Nodes with no readable icon file
    pub missing: usize,
    /// Icons the texture loader declined
    pub rejected: usize,
}

/// Counts for one ticked frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame number, starting at 1
    pub frame: u64,
    pub substeps: u32,
    pub render: RenderStats,
}

enum Stage {
    LoadingBundle,
    LoadingIcons { bundle: Bundle, scene: Scene },
    Ready { scene: Scene },
}

/// Owns a visualization from loading through the frame loop
pub struct Visualizer {
    config: Config,
    stage: Stage,
    frames: u64,
}

impl Visualizer {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            stage: Stage::LoadingBundle,
            frames: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn phase(&self) -> LoadPhase {
        match self.stage {
            Stage::LoadingBundle => LoadPhase::LoadingBundle,
            Stage::LoadingIcons { .. } => LoadPhase::LoadingIcons,
            Stage::Ready { .. } => LoadPhase::Ready,
        }
    }

    /// The scene, once the bundle has been loaded
    pub fn scene(&self) -> Option<&Scene> {
        match &self.stage {
            Stage::LoadingBundle => None,
            Stage::LoadingIcons { scene, .. } | Stage::Ready { scene } => Some(scene),
        }
    }

    /// Frames ticked so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// First phase: fetch the bundle and build the graph
    pub async fn load_bundle<S: BundleSource>(&mut self, source: &S) -> VizResult<()> {
        let phase = self.phase();
        if phase != LoadPhase::LoadingBundle {
            return Err(VizError::InvalidPhaseTransition {
                from: phase,
                to: LoadPhase::LoadingIcons,
            });
        }

        info!(source = %source.describe(), "loading bundle");
        let bundle = source.load().await?;
        let scene = Scene::from_bundle(&bundle, &self.config)?;
        info!(
            nodes = scene.store().len(),
            edges = scene.store().edge_count(),
            "bundle loaded"
        );

        self.stage = Stage::LoadingIcons { bundle, scene };
        Ok(())
    }

    /// Second phase: resolve icons into textures, then become ready.
    ///
    /// With no icon directory every node stays untextured.
    pub async fn load_icons(
        &mut self,
        icons: Option<&IconDirectory>,
        loader: &mut dyn TextureLoader,
    ) -> VizResult<IconReport> {
        let phase = self.phase();
        let Stage::LoadingIcons { bundle, scene } = &mut self.stage else {
            return Err(VizError::InvalidPhaseTransition {
                from: phase,
                to: LoadPhase::Ready,
            });
        };

        let mut report = IconReport::default();
        match icons {
            Some(dir) => {
                info!(dir = %dir.root().display(), "loading icons");
                for icon in assets::fetch_icons(dir, bundle).await {
                    let Some(image) = icon.image else {
                        warn!(node = %icon.name, "no icon found");
                        report.missing += 1;
                        continue;
                    };
                    match loader.upload(&icon.name, &image) {
                        Some(handle) => {
                            scene.store.set_texture(&icon.name, handle)?;
                            report.loaded += 1;
                        }
                        None => {
                            warn!(node = %icon.name, "icon rejected by texture loader");
                            report.rejected += 1;
                        }
                    }
                }
            }
            None => report.missing = scene.store.len(),
        }

        self.stage = match std::mem::replace(&mut self.stage, Stage::LoadingBundle) {
            Stage::LoadingIcons { scene, .. } => Stage::Ready { scene },
            other => other,
        };
        info!(
            loaded = report.loaded,
            missing = report.missing,
            rejected = report.rejected,
            "ready"
        );
        Ok(report)
    }

    /// Track the viewport size
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.config.render.width = width;
        self.config.render.height = height;
        match &mut self.stage {
            Stage::LoadingIcons { scene, .. } | Stage::Ready { scene } => {
                scene.pipeline.set_viewport(width, height)
            }
            Stage::LoadingBundle => {}
        }
    }

    /// Run one frame: all substeps, then one round of draw calls.
    ///
    /// Fails without side effects until the visualizer is ready.
    pub fn tick(
        &mut self,
        rotation: &mut dyn RotationSource,
        submitter: &mut dyn DrawSubmitter,
    ) -> VizResult<FrameStats> {
        let phase = self.phase();
        let Stage::Ready { scene } = &mut self.stage else {
            return Err(VizError::NotReady(phase));
        };

        scene.advance_frame();
        let render = scene.render(&rotation.rotation(), submitter);
        rotation.advance();

        self.frames += 1;
        let stats = FrameStats {
            frame: self.frames,
            substeps: self.config.simulation.substeps,
            render,
        };
        debug!(frame = stats.frame, draw_calls = render.draw_calls, "tick");
        Ok(stats)
    }
}
