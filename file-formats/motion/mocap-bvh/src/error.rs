//! Error handling for BVH loading and animation

use std::io;
use thiserror::Error;

/// Errors that can occur when building skeletons or loading motion data
#[derive(Debug, Error)]
pub enum BvhError {
    /// An I/O error occurred (missing file, unreadable data)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The hierarchy section could not be parsed
    #[error("Malformed hierarchy at line {line}: {reason}")]
    MalformedHierarchy {
        /// 1-based line number in the source document
        line: usize,
        /// What went wrong
        reason: String,
    },

    /// The motion section could not be parsed
    #[error("Malformed motion section at line {line}: {reason}")]
    MalformedMotionSection {
        /// 1-based line number in the source document
        line: usize,
        /// What went wrong
        reason: String,
    },

    /// A frame's channel count disagrees with the skeleton's layout
    #[error("frame carries {actual} channel values, skeleton expects {expected}")]
    FrameLayoutMismatch {
        /// Total channel count computed from the skeleton
        expected: usize,
        /// Channel count the frame actually carries
        actual: usize,
    },

    /// More children were attached to a joint than it declared
    #[error("joint '{parent}' declared {declared} children, cannot attach '{child}'")]
    SlotOverflow {
        /// Name of the parent whose child slots are exhausted
        parent: String,
        /// Number of child slots the parent declared
        declared: usize,
        /// Name of the joint that did not fit
        child: String,
    },

    /// A joint declared a channel count other than 3 or 6
    #[error("joint '{joint}' declares {count} channels, expected 3 or 6")]
    InvalidChannelCount {
        /// Name of the offending joint
        joint: String,
        /// Declared channel count
        count: usize,
    },

    /// A second parentless joint was added to a builder
    #[error("joint '{0}' has no parent but the skeleton already has a root")]
    DuplicateRoot(String),

    /// The builder finished without any joints
    #[error("skeleton has no root joint")]
    MissingRoot,

    /// The motion section contains no frames to animate
    #[error("motion data contains no frames")]
    EmptyMotion,
}

/// Type alias for Results from BVH operations
pub type Result<T> = std::result::Result<T, BvhError>;
