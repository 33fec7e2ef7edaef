//! Parametric poster surfaces.
//!
//! Poster kinds are not composited into an atlas page: each placed
//! poster owns a dedicated texture sized to its canonical payload and a
//! tessellated double-sided quad mesh whose physical height follows the
//! pixel aspect ratio. The mesh data is plain geometry handed to the
//! rendering collaborator.

use crate::pixel::PixelBuffer;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Default tessellation: interior points between the corners on each side.
pub const DEFAULT_DIVISIONS: u32 = 8;

/// Immutable geometry parameters for one poster aspect-ratio variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PosterSpec {
    /// Canonical texture width in pixels.
    pub width_pixels: u32,
    /// Canonical texture height in pixels.
    pub height_pixels: u32,
    /// Physical mesh width in block-space units.
    pub physical_width: f32,
    /// Vertical collider-center correction in block-space units.
    pub height_offset: f32,
    /// Interior tessellation points per side.
    pub divisions: u32,
}

impl PosterSpec {
    /// Creates a poster spec with the default tessellation.
    #[must_use]
    pub const fn new(
        width_pixels: u32,
        height_pixels: u32,
        physical_width: f32,
        height_offset: f32,
    ) -> Self {
        Self {
            width_pixels,
            height_pixels,
            physical_width,
            height_offset,
            divisions: DEFAULT_DIVISIONS,
        }
    }

    /// Physical mesh height, derived from the pixel aspect ratio.
    #[must_use]
    pub fn mesh_height(&self) -> f32 {
        self.height_pixels as f32 * (self.physical_width / self.width_pixels as f32)
    }

    /// Whether the variant is landscape (width >= height).
    #[must_use]
    pub const fn is_horizontal(&self) -> bool {
        self.width_pixels >= self.height_pixels
    }

    /// Collider box dimensions (thin slab spanning the mesh).
    #[must_use]
    pub fn collider_size(&self) -> Vec3 {
        Vec3::new(0.01, self.mesh_height(), self.physical_width)
    }

    /// Collider box center offset.
    #[must_use]
    pub fn collider_center(&self) -> Vec3 {
        Vec3::new(0.0, self.height_offset, 0.0)
    }

    /// Builds the tessellated front+back mesh for this variant.
    ///
    /// Vertices run bottom-up in a `(divisions + 2)^2` grid per face, the
    /// mesh bottom sits at y = 0 and is centered on x = 0.
    #[must_use]
    pub fn build_mesh(&self) -> PosterMesh {
        let mesh_top = self.mesh_height();
        let mesh_right = self.physical_width / 2.0;
        let mesh_left = -mesh_right;

        let points_per_side = (self.divisions + 2) as usize;
        let divisor = (points_per_side - 1) as f32;

        let mut locations_v = vec![mesh_top];
        let mut locations_h = vec![mesh_left];
        let mut uv_v = vec![1.0_f32];
        let mut uv_h = vec![0.0_f32];

        for i in 1..points_per_side - 1 {
            let ratio = i as f32 / divisor;
            locations_v.push(mesh_top - ratio * mesh_top);
            uv_v.push(1.0 - ratio);
            locations_h.push(mesh_left + ratio * self.physical_width);
            uv_h.push(ratio);
        }

        locations_v.push(0.0);
        uv_v.push(0.0);
        locations_h.push(mesh_right);
        uv_h.push(1.0);

        let mut vertices = Vec::with_capacity(points_per_side * points_per_side * 2);
        let mut uvs = Vec::with_capacity(points_per_side * points_per_side * 2);

        // Front face, then the back face with identical positions; the
        // triangle winding below flips the back.
        for _ in 0..2 {
            for x in 0..points_per_side {
                for y in 0..points_per_side {
                    uvs.push(Vec2::new(uv_h[x], uv_v[y]));
                    vertices.push(Vec3::new(locations_h[x], locations_v[y], 0.0));
                }
            }
        }

        PosterMesh {
            vertices,
            uvs,
            triangles: self.triangles(),
        }
    }

    fn triangles(&self) -> Vec<u32> {
        let squares_per_side = self.divisions + 1;
        let squares = squares_per_side * squares_per_side;

        let mut points = Vec::with_capacity(squares as usize * 12);
        for i in 0..squares {
            let top_left = i / squares_per_side + i;
            let top_right = top_left + 1;
            let bottom_left = top_left + squares_per_side + 1;
            let bottom_right = bottom_left + 1;
            points.extend_from_slice(&[top_left, top_right, bottom_right]);
            points.extend_from_slice(&[top_left, bottom_right, bottom_left]);
        }

        // Back face re-uses the front triangles with reversed winding.
        let front_len = points.len();
        let back_offset = (self.divisions + 2) * (self.divisions + 2);
        for i in (0..front_len).step_by(3) {
            points.push(back_offset + points[i + 2]);
            points.push(back_offset + points[i + 1]);
            points.push(back_offset + points[i]);
        }

        points
    }

    /// Bundles a canonical-size texture with this spec's mesh.
    #[must_use]
    pub fn build_surface(&self, texture: PixelBuffer) -> PosterSurface {
        PosterSurface {
            texture,
            mesh: self.build_mesh(),
        }
    }
}

/// Tessellated poster geometry: vertex positions, UVs and triangle indices
/// for the front and back faces.
#[derive(Debug, Clone, PartialEq)]
pub struct PosterMesh {
    /// Vertex positions.
    pub vertices: Vec<Vec3>,
    /// Per-vertex texture coordinates.
    pub uvs: Vec<Vec2>,
    /// Triangle index list, front face then back face.
    pub triangles: Vec<u32>,
}

/// A dedicated poster rendering surface: the texture plus its mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct PosterSurface {
    /// Canonical-size RGBA texture.
    pub texture: PixelBuffer,
    /// Parametric mesh geometry.
    pub mesh: PosterMesh,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_height_follows_aspect_ratio() {
        let spec = PosterSpec::new(960, 540, 2.0, -0.036);
        let h = spec.mesh_height();
        assert!((h - 1.125).abs() < 1e-6);
    }

    #[test]
    fn test_mesh_vertex_and_triangle_counts() {
        let spec = PosterSpec::new(540, 540, 1.125, -0.036);
        let mesh = spec.build_mesh();
        let per_face = (DEFAULT_DIVISIONS as usize + 2).pow(2);
        assert_eq!(mesh.vertices.len(), per_face * 2);
        assert_eq!(mesh.uvs.len(), per_face * 2);
        let squares = (DEFAULT_DIVISIONS as usize + 1).pow(2);
        assert_eq!(mesh.triangles.len(), squares * 6 * 2);
    }

    #[test]
    fn test_mesh_triangle_indices_in_range() {
        let spec = PosterSpec::new(720, 540, 1.5, -0.036);
        let mesh = spec.build_mesh();
        let max = mesh.vertices.len() as u32;
        assert!(mesh.triangles.iter().all(|&i| i < max));
    }

    #[test]
    fn test_mesh_extents() {
        let spec = PosterSpec::new(960, 540, 2.0, -0.036);
        let mesh = spec.build_mesh();
        let min_x = mesh.vertices.iter().map(|v| v.x).fold(f32::MAX, f32::min);
        let max_x = mesh.vertices.iter().map(|v| v.x).fold(f32::MIN, f32::max);
        let min_y = mesh.vertices.iter().map(|v| v.y).fold(f32::MAX, f32::min);
        let max_y = mesh.vertices.iter().map(|v| v.y).fold(f32::MIN, f32::max);
        assert!((min_x + 1.0).abs() < 1e-6);
        assert!((max_x - 1.0).abs() < 1e-6);
        assert!(min_y.abs() < 1e-6);
        assert!((max_y - spec.mesh_height()).abs() < 1e-6);
    }

    #[test]
    fn test_uv_corners() {
        let spec = PosterSpec::new(540, 960, 1.125, 0.4);
        let mesh = spec.build_mesh();
        // First vertex of the grid is the top-left corner.
        assert_eq!(mesh.uvs[0], Vec2::new(0.0, 1.0));
        let per_face = (DEFAULT_DIVISIONS as usize + 2).pow(2);
        // Last vertex of the front face is the bottom-right corner.
        assert_eq!(mesh.uvs[per_face - 1], Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_collider_matches_mesh() {
        let spec = PosterSpec::new(540, 1080, 1.125, 0.525);
        let size = spec.collider_size();
        assert!((size.y - spec.mesh_height()).abs() < 1e-6);
        assert!((size.z - 1.125).abs() < 1e-6);
        assert_eq!(spec.collider_center(), Vec3::new(0.0, 0.525, 0.0));
        assert!(!spec.is_horizontal());
    }
}
