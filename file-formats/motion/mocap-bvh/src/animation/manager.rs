//! Playback context: one skeleton, one motion clip, one frame cursor
//!
//! [`AnimationManager`] owns everything a viewer mutates, so independent
//! skeletons (and tests) never share state. Frame changes always rebind
//! before the next evaluation; `&mut self` on the stepping operations makes
//! an interleaved bind/evaluate impossible to express.

use std::path::Path;

use crate::animation::binder::bind_frame;
use crate::animation::orient::{BoneInstance, orient_segments};
use crate::animation::pose::{BoneSegment, evaluate};
use crate::error::{BvhError, Result};
use crate::motion::{FrameCursor, MotionData};
use crate::parser;
use crate::skeleton::Skeleton;

/// Owns a skeleton and its motion clip, stepping a cyclic frame cursor
#[derive(Debug, Clone)]
pub struct AnimationManager {
    skeleton: Skeleton,
    motion: MotionData,
    cursor: FrameCursor,
}

impl AnimationManager {
    /// Pair a skeleton with motion data and bind the first frame
    ///
    /// Every frame is validated against the skeleton's channel layout up
    /// front; a clip that cannot be animated in full is rejected whole.
    pub fn new(skeleton: Skeleton, motion: MotionData) -> Result<Self> {
        if motion.frame_count() == 0 {
            return Err(BvhError::EmptyMotion);
        }
        let expected = skeleton.total_channel_count();
        for frame in motion.frames() {
            if frame.len() != expected {
                return Err(BvhError::FrameLayoutMismatch {
                    expected,
                    actual: frame.len(),
                });
            }
        }

        let cursor = FrameCursor::new(motion.frame_count());
        let mut manager = Self {
            skeleton,
            motion,
            cursor,
        };
        manager.bind_current()?;
        log::debug!(
            "animation ready: {} joints, {} frames at {:.4}s",
            manager.skeleton.len(),
            manager.motion.frame_count(),
            manager.motion.frame_time()
        );
        Ok(manager)
    }

    /// Load a BVH file and build the playback context in one step
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = parser::load(path)?;
        Self::new(file.skeleton, file.motion)
    }

    /// The animated skeleton with its currently bound channel data
    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    /// The immutable motion clip
    pub fn motion(&self) -> &MotionData {
        &self.motion
    }

    /// Index of the currently bound frame
    pub fn current_frame(&self) -> usize {
        self.cursor.index()
    }

    /// Number of frames in the clip
    pub fn frame_count(&self) -> usize {
        self.motion.frame_count()
    }

    /// Step to the next frame, wrapping to 0 after the last, and rebind
    pub fn advance_frame(&mut self) -> Result<()> {
        self.cursor.advance();
        self.bind_current()
    }

    /// Step to the previous frame, wrapping to the last, and rebind
    pub fn retreat_frame(&mut self) -> Result<()> {
        self.cursor.retreat();
        self.bind_current()
    }

    /// Jump to a frame (reduced modulo the frame count) and rebind
    pub fn set_frame(&mut self, index: usize) -> Result<()> {
        self.cursor.seek(index);
        self.bind_current()
    }

    /// Evaluate the current pose into world-space bone segments
    pub fn evaluate(&self) -> Vec<BoneSegment> {
        evaluate(&self.skeleton)
    }

    /// Evaluate and orient: one drawable instance per bone segment
    pub fn render_instances(&self) -> Vec<BoneInstance> {
        orient_segments(&self.evaluate())
    }

    fn bind_current(&mut self) -> Result<()> {
        // Frames were validated in new(); the lookup cannot miss while the
        // cursor stays inside [0, frame_count).
        let index = self.cursor.index();
        let frame = self
            .motion
            .frame(index)
            .ok_or(BvhError::EmptyMotion)?
            .to_vec();
        bind_frame(&mut self.skeleton, &frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::{ChannelLayout, SkeletonBuilder};
    use glam::Vec3;

    fn chain() -> Skeleton {
        let mut builder = SkeletonBuilder::new();
        let root = builder
            .joint("Root", None, ChannelLayout::TranslationRotation, Vec3::ZERO, 1)
            .unwrap();
        builder
            .end_site("End", root, Vec3::new(0.0, 1.0, 0.0))
            .unwrap();
        builder.build().unwrap()
    }

    fn motion_with_x_translation(values: &[f32]) -> MotionData {
        MotionData::new(
            0.05,
            values
                .iter()
                .map(|&x| vec![x, 0.0, 0.0, 0.0, 0.0, 0.0])
                .collect(),
        )
    }

    #[test]
    fn test_new_binds_first_frame() {
        let manager =
            AnimationManager::new(chain(), motion_with_x_translation(&[4.0, 8.0])).unwrap();
        assert_eq!(manager.current_frame(), 0);
        let segments = manager.evaluate();
        assert!((segments[0].start.x - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_advance_wraps_and_rebinds() {
        let mut manager =
            AnimationManager::new(chain(), motion_with_x_translation(&[1.0, 2.0, 3.0])).unwrap();
        manager.advance_frame().unwrap();
        manager.advance_frame().unwrap();
        assert_eq!(manager.current_frame(), 2);
        assert!((manager.evaluate()[0].start.x - 3.0).abs() < 1e-6);

        manager.advance_frame().unwrap();
        assert_eq!(manager.current_frame(), 0);
        assert!((manager.evaluate()[0].start.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_retreat_from_zero_wraps_to_last() {
        let mut manager =
            AnimationManager::new(chain(), motion_with_x_translation(&[1.0, 2.0, 3.0])).unwrap();
        manager.retreat_frame().unwrap();
        assert_eq!(manager.current_frame(), 2);
        assert!((manager.evaluate()[0].start.x - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_motion_is_rejected() {
        let result = AnimationManager::new(chain(), MotionData::new(0.05, Vec::new()));
        assert!(matches!(result, Err(BvhError::EmptyMotion)));
    }

    #[test]
    fn test_misaligned_frame_is_rejected_at_construction() {
        let motion = MotionData::new(0.05, vec![vec![0.0; 6], vec![0.0; 5]]);
        let result = AnimationManager::new(chain(), motion);
        assert!(matches!(
            result,
            Err(BvhError::FrameLayoutMismatch {
                expected: 6,
                actual: 5
            })
        ));
    }

    #[test]
    fn test_render_instances_cover_all_segments() {
        let manager =
            AnimationManager::new(chain(), motion_with_x_translation(&[0.0])).unwrap();
        let segments = manager.evaluate();
        let instances = manager.render_instances();
        assert_eq!(segments.len(), instances.len());
    }
}
