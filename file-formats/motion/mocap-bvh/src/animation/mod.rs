//! BVH animation pipeline
//!
//! This module turns a bound joint hierarchy into drawable geometry:
//! - Channel binding: copy one frame's flat float vector onto the joints
//! - Pose evaluation: forward kinematics producing world-space bone segments
//! - Bone orientation: per-segment transforms for a shared cylinder primitive
//! - Playback: a context owning skeleton, clip and cursor with cyclic stepping
//!
//! # Example
//!
//! ```rust,ignore
//! use mocap_bvh::AnimationManager;
//!
//! let mut manager = AnimationManager::load("walk.bvh")?;
//! manager.advance_frame()?;
//! for instance in manager.render_instances() {
//!     // submit instance.transform / instance.length with shared_cylinder()
//! }
//! ```

pub mod binder;
mod manager;
pub mod orient;
pub mod pose;

pub use binder::bind_frame;
pub use manager::AnimationManager;
pub use orient::{
    BoneInstance, CylinderMesh, DEGENERATE_EPSILON, orient, orient_segments, shared_cylinder,
};
pub use pose::{BoneSegment, evaluate};
