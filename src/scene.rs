//! Scene objects: colored vertex lists with triangle indices.
//!
//! An [`Object`] stores its vertices as offsets from its position. Polygons
//! index into the vertex list, so shared vertices are stored once.

use std::fmt;
use std::path::Path;

use rand::Rng;

use crate::colors::Color;
use crate::math::mat3::RotationMatrix;
use crate::math::vec3::Vec3;

/// Error type for OBJ loading
#[derive(Debug)]
pub enum LoadError {
    Obj(tobj::LoadError),
    /// The file contained no triangles.
    Empty,
}

impl From<tobj::LoadError> for LoadError {
    fn from(e: tobj::LoadError) -> Self {
        LoadError::Obj(e)
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Obj(e) => write!(f, "OBJ error: {}", e),
            LoadError::Empty => write!(f, "OBJ file contains no triangles"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Obj(e) => Some(e),
            LoadError::Empty => None,
        }
    }
}

/// A vertex offset from its object's position, with a color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneVertex {
    pub offset: Vec3,
    pub color: Color,
}

// Corner indices for the cube's 12 triangles. Corners 0-3 are the bottom
// ring, 4-7 the top ring directly above them.
const CUBE_POLYGONS: [[usize; 3]; 12] = [
    [0, 1, 4],
    [1, 4, 5],
    [1, 2, 5],
    [2, 5, 6],
    [2, 3, 6],
    [3, 6, 7],
    [3, 0, 7],
    [0, 4, 7],
    [0, 2, 3],
    [0, 1, 2],
    [4, 5, 6],
    [4, 6, 7],
];

/// A positioned collection of colored triangles.
#[derive(Debug, Clone, Default)]
pub struct Object {
    pub position: Vec3,
    vertices: Vec<SceneVertex>,
    polygons: Vec<[usize; 3]>,
}

impl Object {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            vertices: Vec::new(),
            polygons: Vec::new(),
        }
    }

    /// Appends a vertex and returns its index.
    pub fn add_vertex(&mut self, offset: Vec3, color: Color) -> usize {
        self.vertices.push(SceneVertex { offset, color });
        self.vertices.len() - 1
    }

    /// Adds a triangle over three existing vertex indices.
    ///
    /// # Panics
    /// Panics if any index is out of range.
    pub fn add_polygon(&mut self, a: usize, b: usize, c: usize) {
        let count = self.vertices.len();
        assert!(
            a < count && b < count && c < count,
            "polygon ({}, {}, {}) indexes past {} vertices",
            a,
            b,
            c,
            count
        );
        self.polygons.push([a, b, c]);
    }

    pub fn vertices(&self) -> &[SceneVertex] {
        &self.vertices
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Each polygon's three vertices, in index order.
    pub fn polygons(&self) -> impl Iterator<Item = [SceneVertex; 3]> + '_ {
        self.polygons
            .iter()
            .map(move |&[a, b, c]| [self.vertices[a], self.vertices[b], self.vertices[c]])
    }

    /// Rotates every vertex offset about the object's position.
    pub fn rotate(&mut self, rotation: Vec3) {
        let matrix = RotationMatrix::calculate(rotation);
        for vertex in &mut self.vertices {
            vertex.offset.rotate(&matrix);
        }
    }

    /// A cube centered on the origin with randomly colored corners.
    pub fn cube(radius: f32, rng: &mut impl Rng) -> Self {
        let diameter = 2.0 * radius;
        let mut object = Object::new(Vec3::ZERO);

        for ring in 0..2 {
            for corner in 0..4 {
                let x = (if corner == 2 || corner == 3 { diameter } else { 0.0 }) - radius;
                let y = ring as f32 * diameter - radius;
                let z = (if corner == 1 || corner == 2 { diameter } else { 0.0 }) - radius;
                object.add_vertex(Vec3::new(x, y, z), random_color(rng));
            }
        }

        for [a, b, c] in CUBE_POLYGONS {
            object.add_polygon(a, b, c);
        }
        object
    }

    /// A `rows` x `columns` grid of tiles on the XZ plane with random
    /// heights in `0..50` and random colors. Each tile is two triangles.
    ///
    /// ```text
    ///   ----------------
    ///   |1 / |3 / |5 / |
    ///   | / 2| / 4| / 6| . . .
    ///   ----------------
    /// ```
    pub fn terrain(rows: usize, columns: usize, tile_size: f32, rng: &mut impl Rng) -> Self {
        let per_row = columns + 1;
        let mut object = Object::new(Vec3::ZERO);

        for z in 0..=rows {
            for x in 0..=columns {
                let height = rng.gen_range(0..50) as f32;
                object.add_vertex(
                    Vec3::new(x as f32 * tile_size, height, z as f32 * tile_size),
                    random_color(rng),
                );
            }
        }

        for row in 0..rows {
            for column in 0..columns {
                let near_left = row * per_row + column;
                let near_right = near_left + 1;
                let far_left = near_left + per_row;
                let far_right = far_left + 1;
                object.add_polygon(near_left, near_right, far_left);
                object.add_polygon(near_right, far_right, far_left);
            }
        }
        object
    }

    /// Loads every triangulated mesh in an OBJ file into one object.
    ///
    /// Vertex colors from the file are used when present; otherwise every
    /// vertex gets `color`.
    pub fn from_obj<P: AsRef<Path>>(path: P, color: Color) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let (models, _materials) = tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS)?;
        let mut object = Object::new(Vec3::ZERO);

        for model in &models {
            let mesh = &model.mesh;
            let base = object.vertices.len();
            let has_colors = mesh.vertex_color.len() == mesh.positions.len();

            for (i, p) in mesh.positions.chunks_exact(3).enumerate() {
                let vertex_color = if has_colors {
                    let c = &mesh.vertex_color[i * 3..i * 3 + 3];
                    Color::rgb(to_channel(c[0]), to_channel(c[1]), to_channel(c[2]))
                } else {
                    color
                };
                object.add_vertex(Vec3::new(p[0], p[1], p[2]), vertex_color);
            }

            for face in mesh.indices.chunks_exact(3) {
                object.add_polygon(
                    base + face[0] as usize,
                    base + face[1] as usize,
                    base + face[2] as usize,
                );
            }
        }

        if object.polygons.is_empty() {
            return Err(LoadError::Empty);
        }

        log::info!(
            "loaded {} ({} models, {} vertices, {} triangles)",
            path.display(),
            models.len(),
            object.vertices.len(),
            object.polygons.len()
        );
        Ok(object)
    }
}

fn random_color(rng: &mut impl Rng) -> Color {
    Color::rgb(rng.gen_range(0..255), rng.gen_range(0..255), rng.gen_range(0..255))
}

fn to_channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}
