//! Per-frame draw submission
//!
//! [`RenderPipeline`] turns the current layout into draw calls: one line
//! list for every edge, then one textured cube per node. Calls go through
//! the [`DrawSubmitter`] trait, so nothing here depends on a graphics API.

use std::fmt::Write as _;

use tracing::debug;

use crate::camera::Camera;
use crate::config::RenderConfig;
use crate::geometry::{CubeVertex, EdgeGeometry, cube_mesh};
use crate::graph::{GraphStore, TextureHandle};
use crate::math::{self, Mat4};

/// Primitive topology of a draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    TriangleList,
    LineList,
}

/// Vertex data for a draw call
#[derive(Debug, Clone, Copy)]
pub enum VertexSource<'a> {
    /// Packed xyz positions
    Positions(&'a [f32]),
    /// Mesh vertices with texture coordinates
    Mesh(&'a [CubeVertex]),
}

impl VertexSource<'_> {
    pub fn vertex_count(&self) -> usize {
        match self {
            VertexSource::Positions(p) => p.len() / 3,
            VertexSource::Mesh(m) => m.len(),
        }
    }
}

/// Matrix uniforms shared by both shaders
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniforms {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}

impl Uniforms {
    /// Uniforms paired with their shader names
    pub fn named(&self) -> [(&'static str, &Mat4); 3] {
        [
            ("uModel", &self.model),
            ("uView", &self.view),
            ("uProjection", &self.projection),
        ]
    }
}

/// A single draw submission
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    pub primitive: Primitive,
    pub vertices: VertexSource<'a>,
    pub uniforms: Uniforms,
    pub texture: Option<TextureHandle>,
}

/// Backend that executes draw calls.
///
/// Submission is assumed to succeed; backends report their own failures.
pub trait DrawSubmitter {
    /// Clear color and depth buffers
    fn clear(&mut self, color: [f32; 4], depth: f32);

    /// Execute one draw call
    fn submit(&mut self, call: DrawCall<'_>);
}

/// Counts for one rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub draw_calls: usize,
    pub cubes_drawn: usize,
    /// Nodes skipped because their texture never arrived
    pub cubes_skipped: usize,
}

/// Builds and submits the draw calls for a frame
#[derive(Debug, Clone)]
pub struct RenderPipeline {
    camera: Camera,
    clear_color: [f32; 4],
    cube: Vec<CubeVertex>,
}

impl RenderPipeline {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            camera: Camera::new(config),
            clear_color: config.clear_color,
            cube: cube_mesh(),
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Track the viewport size
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
    }

    /// Draw the current layout.
    ///
    /// Clears once, submits all edges as one line list, then one cube per
    /// textured node.
    pub fn render(
        &self,
        store: &GraphStore,
        edges: &EdgeGeometry,
        rotation: &Mat4,
        submitter: &mut dyn DrawSubmitter,
    ) -> RenderStats {
        let view = self.camera.view_matrix();
        let projection = self.camera.projection_matrix();
        let mut stats = RenderStats::default();

        submitter.clear(self.clear_color, 1.0);

        // Edge positions are already in world space
        submitter.submit(DrawCall {
            primitive: Primitive::LineList,
            vertices: VertexSource::Positions(edges.positions()),
            uniforms: Uniforms {
                model: *rotation,
                view,
                projection,
            },
            texture: None,
        });
        stats.draw_calls += 1;

        for node in store.nodes() {
            let Some(texture) = node.texture() else {
                stats.cubes_skipped += 1;
                continue;
            };

            let model = math::multiply(rotation, &math::translation(node.position));
            submitter.submit(DrawCall {
                primitive: Primitive::TriangleList,
                vertices: VertexSource::Mesh(&self.cube),
                uniforms: Uniforms {
                    model,
                    view,
                    projection,
                },
                texture: Some(texture),
            });
            stats.draw_calls += 1;
            stats.cubes_drawn += 1;
        }

        debug!(
            draw_calls = stats.draw_calls,
            skipped = stats.cubes_skipped,
            "frame submitted"
        );
        stats
    }
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

/// A command captured by [`RecordingSubmitter`]
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Clear {
        color: [f32; 4],
        depth: f32,
    },
    Draw {
        primitive: Primitive,
        vertex_count: usize,
        /// Copy of the position data for line lists
        positions: Option<Vec<f32>>,
        uniforms: Uniforms,
        texture: Option<TextureHandle>,
    },
}

/// Submitter that records commands instead of drawing them.
///
/// Used for headless runs and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSubmitter {
    commands: Vec<Recorded>,
}

impl RecordingSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[Recorded] {
        &self.commands
    }

    /// Forget everything recorded so far
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// One line per command, for logs and snapshots
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for command in &self.commands {
            match command {
                Recorded::Clear { color, depth } => {
                    let _ = writeln!(out, "clear color={:?} depth={}", color, depth);
                }
                Recorded::Draw {
                    primitive,
                    vertex_count,
                    uniforms,
                    texture,
                    ..
                } => {
                    let t = uniforms.model[3];
                    let _ = write!(
                        out,
                        "draw {:?} vertices={} origin=({:.2}, {:.2}, {:.2})",
                        primitive, vertex_count, t[0], t[1], t[2]
                    );
                    match texture {
                        Some(TextureHandle(id)) => {
                            let _ = writeln!(out, " texture={}", id);
                        }
                        None => out.push('\n'),
                    }
                }
            }
        }
        out
    }
}

impl DrawSubmitter for RecordingSubmitter {
    fn clear(&mut self, color: [f32; 4], depth: f32) {
        self.commands.push(Recorded::Clear { color, depth });
    }

    fn submit(&mut self, call: DrawCall<'_>) {
        let positions = match call.vertices {
            VertexSource::Positions(p) => Some(p.to_vec()),
            VertexSource::Mesh(_) => None,
        };
        self.commands.push(Recorded::Draw {
            primitive: call.primitive,
            vertex_count: call.vertices.vertex_count(),
            positions,
            uniforms: call.uniforms,
            texture: call.texture,
        });
    }
}
