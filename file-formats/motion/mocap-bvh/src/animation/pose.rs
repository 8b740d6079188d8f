//! Pose evaluator: forward kinematics over the bound skeleton
//!
//! Walks the joint tree depth-first, accumulating the parent chain's
//! rotation and origin per recursion level, and emits one world-space
//! [`BoneSegment`] per drawable bone. Rotation channels compose in the
//! fixed order Z, X, Y (extrinsic, degrees); a joint's offset is expressed
//! in its parent's already-rotated frame.

use glam::{Mat3, Vec3};

use crate::skeleton::{ChannelLayout, Joint, JointId, Skeleton};

/// One drawable bone: a straight segment between two world-space points
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct BoneSegment {
    /// World-space segment start
    pub start: Vec3,
    /// World-space segment end
    pub end: Vec3,
}

impl BoneSegment {
    /// Segment length
    pub fn length(&self) -> f32 {
        (self.end - self.start).length()
    }
}

/// Evaluate the skeleton's current pose into world-space bone segments
///
/// Reads whatever channel data the binder last wrote; performs no mutation,
/// so repeated evaluation between frame changes is deterministic. Segments
/// are emitted in depth-first pre-order, parent bones before descendants.
pub fn evaluate(skeleton: &Skeleton) -> Vec<BoneSegment> {
    let mut segments = Vec::with_capacity(skeleton.len());
    evaluate_joint(
        skeleton,
        skeleton.root(),
        Vec3::ZERO,
        Mat3::IDENTITY,
        &mut segments,
    );
    segments
}

fn evaluate_joint(
    skeleton: &Skeleton,
    id: JointId,
    parent_origin: Vec3,
    parent_rotation: Mat3,
    segments: &mut Vec<BoneSegment>,
) {
    let joint = skeleton.joint(id);
    let origin = world_origin(joint, parent_origin, parent_rotation);
    let (rz, rx, ry) = joint.rotation_zxy();
    let rotation = parent_rotation * rotation_zxy_degrees(rz, rx, ry);

    match joint.children() {
        [] => {
            // Terminal stub: the joint's own offset stands in for a
            // trailing child.
            segments.push(BoneSegment {
                start: origin,
                end: origin + rotation * joint.offset(),
            });
        }
        [child] => {
            let child_origin = world_origin(skeleton.joint(*child), origin, rotation);
            segments.push(BoneSegment {
                start: origin,
                end: child_origin,
            });
        }
        children => {
            // Branch point: centroid of the children's offsets with a
            // damping divisor of (count + 1), which pulls the trunk bone
            // toward the parent before fanning out.
            let summed: Vec3 = children
                .iter()
                .map(|&child| skeleton.joint(child).offset())
                .sum();
            let branch = origin + rotation * (summed / (children.len() + 1) as f32);
            segments.push(BoneSegment {
                start: origin,
                end: branch,
            });
            for &child in children {
                let child_origin = world_origin(skeleton.joint(child), origin, rotation);
                segments.push(BoneSegment {
                    start: branch,
                    end: child_origin,
                });
            }
        }
    }

    for &child in skeleton.joint(id).children() {
        evaluate_joint(skeleton, child, origin, rotation, segments);
    }
}

/// A joint's world origin given its parent's accumulated transform
///
/// Six-channel joints place themselves by their absolute translation
/// channels; three-channel joints by their fixed offset re-expressed in the
/// parent's rotated frame.
fn world_origin(joint: &Joint, parent_origin: Vec3, parent_rotation: Mat3) -> Vec3 {
    match joint.channels() {
        ChannelLayout::TranslationRotation => {
            let data = joint.channel_data();
            parent_origin + Vec3::new(data[0], data[1], data[2])
        }
        ChannelLayout::Rotation => parent_origin + parent_rotation * joint.offset(),
    }
}

/// Rotation matrix for Euler angles applied Z, then X, then Y, in degrees
fn rotation_zxy_degrees(z: f32, x: f32, y: f32) -> Mat3 {
    Mat3::from_rotation_z(z.to_radians())
        * Mat3::from_rotation_x(x.to_radians())
        * Mat3::from_rotation_y(y.to_radians())
}
