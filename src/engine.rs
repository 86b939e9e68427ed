//! Frame pipeline.
//!
//! The [`Engine`] owns the scene, camera, projection and rasterizer. Each
//! [`Engine::draw`] projects every polygon, rasterizes the visible ones into
//! the shared buffers, and publishes the frame with one `render` call.

use crate::camera::Camera;
use crate::colors::Color;
use crate::projection::{DistortionCorrection, Projection, DEFAULT_FOV_SCALAR};
use crate::render::{FrameBufferError, FrameSink, ScanlineRasterizer, Triangle};
use crate::scene::Object;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;

/// How projected triangles are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Depth-tested, color-interpolated fill.
    #[default]
    Filled,
    /// White edges only.
    Wireframe,
    /// Fill, then white edges on top.
    FilledWireframe,
}

impl RenderMode {
    fn fills(self) -> bool {
        matches!(self, RenderMode::Filled | RenderMode::FilledWireframe)
    }

    fn outlines(self) -> bool {
        matches!(self, RenderMode::Wireframe | RenderMode::FilledWireframe)
    }
}

impl std::fmt::Display for RenderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderMode::Filled => write!(f, "Filled"),
            RenderMode::Wireframe => write!(f, "Wireframe"),
            RenderMode::FilledWireframe => write!(f, "FilledWireframe"),
        }
    }
}

/// Engine settings fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub width: u32,
    pub height: u32,
    pub fov_scalar: f32,
    pub distortion: DistortionCorrection,
    pub render_mode: RenderMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fov_scalar: DEFAULT_FOV_SCALAR,
            distortion: DistortionCorrection::default(),
            render_mode: RenderMode::default(),
        }
    }
}

/// Counts from one [`Engine::draw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Triangles handed to the rasterizer.
    pub drawn: usize,
    /// Triangles with no vertex in front of the camera.
    pub culled: usize,
}

pub struct Engine {
    rasterizer: ScanlineRasterizer,
    projection: Projection,
    camera: Camera,
    objects: Vec<Object>,
    render_mode: RenderMode,
    triangles_to_render: Vec<Triangle>,
}

impl Engine {
    /// Allocates the frame buffers. Fails only if they cannot be allocated.
    pub fn new(config: EngineConfig) -> Result<Self, FrameBufferError> {
        let rasterizer = ScanlineRasterizer::new(config.width, config.height)?;
        let projection = Projection::new(config.width, config.height)
            .with_fov_scalar(config.fov_scalar)
            .with_distortion(config.distortion);

        log::info!(
            "engine {}x{}, fov scalar {}, distortion {}, mode {}",
            config.width,
            config.height,
            config.fov_scalar,
            config.distortion,
            config.render_mode
        );

        Ok(Self {
            rasterizer,
            projection,
            camera: Camera::default(),
            objects: Vec::new(),
            render_mode: config.render_mode,
            triangles_to_render: Vec::new(),
        })
    }

    pub fn add_object(&mut self, object: Object) {
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut [Object] {
        &mut self.objects
    }

    pub fn polygon_count(&self) -> usize {
        self.objects.iter().map(Object::polygon_count).sum()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.render_mode = mode;
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn rasterizer(&self) -> &ScanlineRasterizer {
        &self.rasterizer
    }

    /// Projects every polygon of every object, returning the visible
    /// screen-space triangles and the number culled.
    pub fn project_frame(&mut self) -> (&[Triangle], usize) {
        let rotation = self.camera.rotation_matrix();
        let mut culled = 0;
        self.triangles_to_render.clear();

        for object in &self.objects {
            for polygon in object.polygons() {
                let vertices = polygon.map(|v| (v.offset, v.color));
                match self
                    .projection
                    .project_triangle(&self.camera, &rotation, object.position, vertices)
                {
                    Some(triangle) => self.triangles_to_render.push(triangle),
                    None => culled += 1,
                }
            }
        }

        (&self.triangles_to_render, culled)
    }

    /// Renders one frame into `sink`: project, rasterize, then present and
    /// clear.
    pub fn draw<S: FrameSink>(&mut self, sink: &mut S) -> Result<FrameStats, S::Error> {
        let (_, culled) = self.project_frame();
        let mode = self.render_mode;

        if mode.fills() {
            for triangle in &self.triangles_to_render {
                self.rasterizer.fill_triangle(triangle);
            }
        }
        if mode.outlines() {
            self.rasterizer.set_color(Color::WHITE);
            for triangle in &self.triangles_to_render {
                self.rasterizer.triangle_wireframe(triangle);
            }
        }

        let stats = FrameStats {
            drawn: self.triangles_to_render.len(),
            culled,
        };
        log::trace!("frame: {} drawn, {} culled", stats.drawn, stats.culled);

        self.rasterizer.render(sink)?;
        Ok(stats)
    }
}
