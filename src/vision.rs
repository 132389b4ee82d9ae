//! Vision cone and vision radius geometry.
//!
//! Both shapes are fans of rays cast from the viewer. Each ray contributes one
//! boundary vertex (the hit point, or the point at full range on a miss) and
//! the viewer position is appended last as the fan apex. Because every ray
//! starts at the apex, the polygon is star-shaped from it and a fan
//! triangulation is always valid.

use glam::Vec2;

/// Answers "where does this ray stop?" for the world being simulated.
pub trait RaycastOracle {
    /// First hit point along `dir` (unit length) within `max_distance`, if any.
    fn cast(&self, origin: Vec2, dir: Vec2, max_distance: f32) -> Option<Vec2>;
}

/// Open space: every ray reaches full range.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoObstacles;

impl RaycastOracle for NoObstacles {
    fn cast(&self, _origin: Vec2, _dir: Vec2, _max_distance: f32) -> Option<Vec2> {
        None
    }
}

impl<F> RaycastOracle for F
where
    F: Fn(Vec2, Vec2, f32) -> Option<Vec2>,
{
    fn cast(&self, origin: Vec2, dir: Vec2, max_distance: f32) -> Option<Vec2> {
        self(origin, dir, max_distance)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanShape {
    /// Boundary stops at the last ray
    Open,
    /// Boundary wraps from the last ray back to the first
    Closed,
}

/// Boundary vertices in increasing angle order followed by the apex.
#[derive(Debug, Clone, PartialEq)]
pub struct VisionPolygon {
    pub vertices: Vec<Vec2>,
    pub shape: FanShape,
}

/// Triangle mesh ready to upload; indices reference `vertices` in triples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisionMesh {
    pub vertices: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl VisionMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vec2; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            [
                self.vertices[tri[0] as usize],
                self.vertices[tri[1] as usize],
                self.vertices[tri[2] as usize],
            ]
        })
    }
}

/// Rotate a unit direction by `angle` radians (counter-clockwise)
fn rotate(dir: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(dir)
}

fn ray_end<O: RaycastOracle + ?Sized>(oracle: &O, apex: Vec2, dir: Vec2, range: f32) -> Vec2 {
    oracle.cast(apex, dir, range).unwrap_or(apex + dir * range)
}

/// Forward vision cone: `num_rays` rays evenly spread over `[-fov/2, +fov/2]`.
///
/// A single ray points straight along `facing`. A zero-length `facing` falls
/// back to +Y, the sprite forward.
pub fn vision_cone<O: RaycastOracle + ?Sized>(
    apex: Vec2,
    facing: Vec2,
    fov_degrees: f32,
    num_rays: usize,
    range: f32,
    oracle: &O,
) -> VisionPolygon {
    let forward = facing.try_normalize().unwrap_or(Vec2::Y);
    let fov = fov_degrees.to_radians();

    let mut vertices = Vec::with_capacity(num_rays + 1);
    for i in 0..num_rays {
        let angle = if num_rays == 1 {
            0.0
        } else {
            -fov / 2.0 + fov * i as f32 / (num_rays - 1) as f32
        };
        let dir = rotate(forward, angle);
        vertices.push(ray_end(oracle, apex, dir, range));
    }
    vertices.push(apex);

    VisionPolygon {
        vertices,
        shape: FanShape::Open,
    }
}

/// Short-range all-around visibility with `num_verts` vertices in total,
/// the apex included.
pub fn vision_radius<O: RaycastOracle + ?Sized>(apex: Vec2, num_verts: usize, range: f32, oracle: &O) -> VisionPolygon {
    let num_rays = num_verts.saturating_sub(1);
    let step = std::f32::consts::TAU / num_rays.max(1) as f32;

    let mut vertices = Vec::with_capacity(num_verts);
    for i in 0..num_rays {
        let dir = rotate(Vec2::X, step * i as f32);
        vertices.push(ray_end(oracle, apex, dir, range));
    }
    vertices.push(apex);

    VisionPolygon {
        vertices,
        shape: FanShape::Closed,
    }
}

impl VisionPolygon {
    pub fn apex(&self) -> Option<Vec2> {
        self.vertices.last().copied()
    }

    pub fn boundary(&self) -> &[Vec2] {
        match self.vertices.split_last() {
            Some((_, boundary)) => boundary,
            None => &[],
        }
    }

    /// Fan triangulation around the apex. Degenerate polygons give an empty mesh.
    pub fn triangulate(&self) -> VisionMesh {
        if self.vertices.len() < 3 {
            return VisionMesh::default();
        }

        let (Ok(apex), Ok(boundary)) = (
            u32::try_from(self.vertices.len() - 1),
            u32::try_from(self.boundary().len()),
        ) else {
            return VisionMesh::default();
        };
        let mut indices = Vec::with_capacity(self.vertices.len() * 3);
        for i in 0..boundary - 1 {
            indices.extend_from_slice(&[apex, i, i + 1]);
        }
        if self.shape == FanShape::Closed && boundary > 2 {
            indices.extend_from_slice(&[apex, boundary - 1, 0]);
        }

        VisionMesh {
            vertices: self.vertices.clone(),
            indices,
        }
    }
}

/// A viewer's geometry: polygons are rebuilt in the physics phase, meshes in
/// the render phase. A mesh can lag its polygon by one frame.
#[derive(Debug, Clone, Default)]
pub struct Viewer {
    pub cone: Option<VisionPolygon>,
    pub radius: Option<VisionPolygon>,
    pub cone_mesh: VisionMesh,
    pub radius_mesh: VisionMesh,
}

impl Viewer {
    pub fn rebuild_meshes(&mut self) {
        self.cone_mesh = self.cone.as_ref().map(VisionPolygon::triangulate).unwrap_or_default();
        self.radius_mesh = self.radius.as_ref().map(VisionPolygon::triangulate).unwrap_or_default();
    }
}
