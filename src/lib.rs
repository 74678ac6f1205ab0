//! charmviz - Force-directed 3D layout for application bundle graphs.
//!
//! Applications become nodes, relations become edges. A Lennard-Jones style
//! pairwise force model settles related applications at a fixed distance
//! while pushing unrelated ones apart; every frame the layout is drawn as
//! textured cubes joined by lines through a backend-agnostic
//! [`render::DrawSubmitter`].
//!
//! # Example
//!
//! ```
//! use charmviz::app::Visualizer;
//! use charmviz::assets::HandleAllocator;
//! use charmviz::bundle::Bundle;
//! use charmviz::config::Config;
//! use charmviz::render::RecordingSubmitter;
//! use charmviz::rotation::Spin;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let bundle: Bundle = "
//! services:
//!   wiki: { charm: 'cs:mediawiki' }
//!   db: { charm: 'cs:mysql' }
//! relations:
//!   - ['wiki:db', 'db:db']
//! ".parse()?;
//!
//! let mut viz = Visualizer::new(Config::default());
//! viz.load_bundle(&bundle).await?;
//! viz.load_icons(None, &mut HandleAllocator::new()).await?;
//!
//! let mut spin = Spin::new([1.0, 0.0, 0.0], 0.1);
//! let mut submitter = RecordingSubmitter::new();
//! let stats = viz.tick(&mut spin, &mut submitter)?;
//! assert_eq!(stats.substeps, 16);
//! # Ok::<(), charmviz::error::VizError>(())
//! # }).unwrap();
//! ```

pub mod app;
pub mod assets;
pub mod bundle;
pub mod camera;
pub mod config;
pub mod error;
pub mod force;
pub mod geometry;
pub mod graph;
pub mod math;
pub mod render;
pub mod rotation;
pub mod simulation;

pub use app::{LoadPhase, Scene, Visualizer};
pub use error::{VizError, VizResult};
