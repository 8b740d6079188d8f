//! Channel binder: copies one frame of channel values onto the skeleton
//!
//! The frame layout is defined by the skeleton's depth-first pre-order over
//! non-leaf joints. The read position is an explicit value threaded through
//! the recursion, so correctness never depends on evaluation order of
//! shared mutable state.

use crate::error::{BvhError, Result};
use crate::skeleton::{JointId, Skeleton};

/// Bind one frame's flat channel values to the skeleton's joints
///
/// Fails with [`BvhError::FrameLayoutMismatch`] before any joint is written
/// when the frame's length disagrees with the skeleton's total channel
/// count; a partial or misaligned bind never happens.
pub fn bind_frame(skeleton: &mut Skeleton, frame: &[f32]) -> Result<()> {
    let expected = skeleton.total_channel_count();
    if frame.len() != expected {
        return Err(BvhError::FrameLayoutMismatch {
            expected,
            actual: frame.len(),
        });
    }
    let consumed = bind_joint(skeleton, skeleton.root(), frame, 0);
    debug_assert_eq!(consumed, expected);
    Ok(())
}

/// Bind one joint and its subtree, returning the advanced read position
fn bind_joint(skeleton: &mut Skeleton, id: JointId, frame: &[f32], mut position: usize) -> usize {
    let joint = skeleton.joint(id);
    if joint.is_leaf() {
        // End Sites are visited but consume no channel data.
        return position;
    }

    let count = joint.channels().count();
    let children = joint.children().to_vec();
    skeleton
        .joint_mut(id)
        .channel_data_mut()
        .copy_from_slice(&frame[position..position + count]);
    position += count;

    for child in children {
        position = bind_joint(skeleton, child, frame, position);
    }
    position
}
