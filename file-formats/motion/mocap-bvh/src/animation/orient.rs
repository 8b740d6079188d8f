//! Bone orienter: maps a canonical Z-aligned primitive onto a bone segment
//!
//! Builds an orthonormal basis around the segment direction so a renderer
//! can draw one unit-radius cylinder per bone with no further geometric
//! work. The canonical cylinder itself is tessellated once per process and
//! shared by every bone.

use std::sync::OnceLock;

use glam::{Mat4, Vec3};

use super::pose::BoneSegment;

/// Directions and bone lengths below this are treated as degenerate
pub const DEGENERATE_EPSILON: f32 = 1e-4;

/// Placement of one bone primitive: a rigid transform plus the length to
/// scale the canonical unit cylinder by along its Z axis
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct BoneInstance {
    /// Rotation and translation mapping primitive space onto the segment
    pub transform: Mat4,
    /// World-space length of the bone
    pub length: f32,
}

impl BoneInstance {
    /// Full model matrix with the length baked into the Z scale
    pub fn model_matrix(&self) -> Mat4 {
        self.transform * Mat4::from_scale(Vec3::new(1.0, 1.0, self.length))
    }
}

/// Derive the transform that orients a Z-aligned primitive along `start → end`
///
/// Degenerate inputs fall back rather than fail: a segment shorter than
/// [`DEGENERATE_EPSILON`] is replaced by a unit bone along +Z, and a
/// direction parallel to the +Y reference is given the +X side axis. The
/// resulting basis `(side, up, dir)` is orthonormal to floating-point
/// tolerance and varies continuously with the direction everywhere except
/// those two fallback boundaries.
pub fn orient(start: Vec3, end: Vec3) -> BoneInstance {
    let mut dir = end - start;
    let mut length = dir.length();
    if length < DEGENERATE_EPSILON {
        dir = Vec3::Z;
        length = 1.0;
    }
    dir /= length;

    let mut side = Vec3::Y.cross(dir);
    if side.length() < DEGENERATE_EPSILON {
        side = Vec3::X;
    }
    side = side.normalize();

    // The +Y reference is generally not orthogonal to dir; re-derive the up
    // axis so the basis is exactly orthonormal.
    let up = dir.cross(side);

    let transform = Mat4::from_cols(
        side.extend(0.0),
        up.extend(0.0),
        dir.extend(0.0),
        start.extend(1.0),
    );
    BoneInstance { transform, length }
}

/// Orient a whole segment list, one instance per segment
pub fn orient_segments(segments: &[BoneSegment]) -> Vec<BoneInstance> {
    segments
        .iter()
        .map(|segment| orient(segment.start, segment.end))
        .collect()
}

/// Canonical bone primitive: a unit-radius open cylinder along +Z
///
/// Tessellation matches the original renderer's quadric: 8 slices around
/// the axis, 3 stacks along it, side surface only.
#[derive(Debug, Clone)]
pub struct CylinderMesh {
    /// Vertex positions, rings from z = 0 to z = 1
    pub positions: Vec<[f32; 3]>,
    /// Outward unit normals, one per vertex
    pub normals: Vec<[f32; 3]>,
    /// Triangle list indices into the vertex arrays
    pub indices: Vec<u32>,
}

const CYLINDER_SLICES: usize = 8;
const CYLINDER_STACKS: usize = 3;

impl CylinderMesh {
    fn generate(slices: usize, stacks: usize) -> Self {
        let ring_count = stacks + 1;
        let mut positions = Vec::with_capacity(slices * ring_count);
        let mut normals = Vec::with_capacity(slices * ring_count);
        for ring in 0..ring_count {
            let z = ring as f32 / stacks as f32;
            for slice in 0..slices {
                let theta = std::f32::consts::TAU * slice as f32 / slices as f32;
                let (sin, cos) = theta.sin_cos();
                positions.push([cos, sin, z]);
                normals.push([cos, sin, 0.0]);
            }
        }

        let mut indices = Vec::with_capacity(slices * stacks * 6);
        for ring in 0..stacks {
            let below = (ring * slices) as u32;
            let above = below + slices as u32;
            for slice in 0..slices as u32 {
                let next = (slice + 1) % slices as u32;
                indices.extend_from_slice(&[
                    below + slice,
                    below + next,
                    above + next,
                    below + slice,
                    above + next,
                    above + slice,
                ]);
            }
        }

        Self {
            positions,
            normals,
            indices,
        }
    }

    /// Number of vertices in the mesh
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// The process-lifetime shared bone primitive, tessellated on first use
pub fn shared_cylinder() -> &'static CylinderMesh {
    static MESH: OnceLock<CylinderMesh> = OnceLock::new();
    MESH.get_or_init(|| CylinderMesh::generate(CYLINDER_SLICES, CYLINDER_STACKS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const TOLERANCE: f32 = 1e-5;

    fn basis(instance: &BoneInstance) -> (Vec3, Vec3, Vec3) {
        (
            instance.transform.x_axis.truncate(),
            instance.transform.y_axis.truncate(),
            instance.transform.z_axis.truncate(),
        )
    }

    #[test_case(Vec3::new(3.0, 1.0, 2.0) ; "generic direction")]
    #[test_case(Vec3::X ; "along x")]
    #[test_case(Vec3::Z ; "along z")]
    #[test_case(Vec3::new(-1.0, -5.0, 0.5) ; "mostly downward")]
    #[test_case(Vec3::new(1e-3, 1.0, 1e-3) ; "near parallel to up")]
    fn test_basis_is_orthonormal(end: Vec3) {
        let instance = orient(Vec3::ZERO, end);
        let (side, up, dir) = basis(&instance);

        assert!((side.length() - 1.0).abs() < TOLERANCE);
        assert!((up.length() - 1.0).abs() < TOLERANCE);
        assert!((dir.length() - 1.0).abs() < TOLERANCE);
        assert!(side.dot(up).abs() < TOLERANCE);
        assert!(side.dot(dir).abs() < TOLERANCE);
        assert!(up.dot(dir).abs() < TOLERANCE);
    }

    #[test]
    fn test_dir_column_points_along_segment() {
        let start = Vec3::new(1.0, 2.0, 3.0);
        let end = Vec3::new(4.0, 2.0, 3.0);
        let instance = orient(start, end);
        let (_, _, dir) = basis(&instance);

        assert!((dir - Vec3::X).length() < TOLERANCE);
        assert!((instance.length - 3.0).abs() < TOLERANCE);
        // Translation column carries the segment start.
        let translation = instance.transform.w_axis.truncate();
        assert!((translation - start).length() < TOLERANCE);
    }

    #[test]
    fn test_zero_length_falls_back_to_unit_z() {
        let p = Vec3::new(7.0, -1.0, 2.5);
        let instance = orient(p, p);
        let (_, _, dir) = basis(&instance);

        assert!((instance.length - 1.0).abs() < TOLERANCE);
        assert!((dir - Vec3::Z).length() < TOLERANCE);
    }

    #[test]
    fn test_direction_parallel_to_up_uses_side_fallback() {
        let instance = orient(Vec3::ZERO, Vec3::new(0.0, 5.0, 0.0));
        let (side, up, dir) = basis(&instance);

        assert!((side - Vec3::X).length() < TOLERANCE);
        assert!((dir - Vec3::Y).length() < TOLERANCE);
        assert!((up - Vec3::new(0.0, 0.0, -1.0)).length() < TOLERANCE);
    }

    #[test]
    fn test_model_matrix_scales_z_by_length() {
        let instance = orient(Vec3::ZERO, Vec3::new(0.0, 0.0, 4.0));
        let tip = instance.model_matrix() * Vec3::Z.extend(1.0);
        assert!((tip.truncate() - Vec3::new(0.0, 0.0, 4.0)).length() < TOLERANCE);
    }

    #[test]
    fn test_shared_cylinder_is_cached() {
        let first = shared_cylinder() as *const CylinderMesh;
        let second = shared_cylinder() as *const CylinderMesh;
        assert_eq!(first, second);
    }

    #[test]
    fn test_cylinder_tessellation() {
        let mesh = shared_cylinder();
        // 8 slices, 4 rings (3 stacks), two triangles per quad.
        assert_eq!(mesh.vertex_count(), 32);
        assert_eq!(mesh.indices.len(), 8 * 3 * 6);

        for (position, normal) in mesh.positions.iter().zip(&mesh.normals) {
            let radial = (position[0] * position[0] + position[1] * position[1]).sqrt();
            assert!((radial - 1.0).abs() < TOLERANCE);
            let n = Vec3::from_array(*normal);
            assert!((n.length() - 1.0).abs() < TOLERANCE);
        }
        for &index in &mesh.indices {
            assert!((index as usize) < mesh.vertex_count());
        }
    }
}
