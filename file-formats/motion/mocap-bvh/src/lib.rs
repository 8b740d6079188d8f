//! Parser and forward-kinematics animation pipeline for BioVision Hierarchy
//! (BVH) motion capture files.
//!
//! A BVH document pairs a joint hierarchy with a sequence of pose frames;
//! this crate loads both, binds frames onto the skeleton, evaluates forward
//! kinematics into world-space bone segments, and orients a shared cylinder
//! primitive along each segment so a renderer has nothing geometric left to
//! do.
//!
//! # Example
//!
//! ```no_run
//! use mocap_bvh::AnimationManager;
//!
//! # fn main() -> mocap_bvh::Result<()> {
//! let mut manager = AnimationManager::load("walk.bvh")?;
//! manager.advance_frame()?;
//! for instance in manager.render_instances() {
//!     let _ = (instance.transform, instance.length);
//! }
//! # Ok(())
//! # }
//! ```

pub mod animation;
pub mod error;
pub mod motion;
pub mod parser;
pub mod skeleton;

// Re-export common types
pub use animation::{AnimationManager, BoneInstance, BoneSegment};
pub use error::{BvhError, Result};
pub use motion::{FrameCursor, MotionData};
pub use parser::{BvhFile, BvhParser, load};
pub use skeleton::{ChannelLayout, Joint, JointId, Skeleton, SkeletonBuilder};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
