//! Skeleton joint hierarchy: arena-based joint tree and its builder
//!
//! Joints live in a flat arena indexed by [`JointId`] rather than in an
//! owning pointer tree. Children are always appended after their parent, so
//! for every non-root joint `child index > parent index` holds and the
//! hierarchy is acyclic by construction.

use glam::Vec3;

use crate::error::{BvhError, Result};

/// Index of a joint inside a [`Skeleton`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct JointId(pub(crate) usize);

impl JointId {
    /// Arena index of this joint
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for JointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Channel layout of a joint for one animation frame
///
/// BVH joints carry either three rotation channels or three translation
/// channels followed by three rotation channels. Rotation channels are
/// consumed in the fixed axis order Z, X, Y, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum ChannelLayout {
    /// Three rotation channels (Z, X, Y)
    Rotation,
    /// Three translation channels (X, Y, Z) followed by three rotation
    /// channels (Z, X, Y); in practice only the root carries these
    TranslationRotation,
}

impl ChannelLayout {
    /// Number of channel values this layout consumes per frame
    pub fn count(self) -> usize {
        match self {
            Self::Rotation => 3,
            Self::TranslationRotation => 6,
        }
    }

    /// Map a BVH `CHANNELS` count to a layout
    pub fn from_count(count: usize) -> Option<Self> {
        match count {
            3 => Some(Self::Rotation),
            6 => Some(Self::TranslationRotation),
            _ => None,
        }
    }
}

/// A single node of the skeleton tree
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Joint {
    name: String,
    offset: Vec3,
    channels: ChannelLayout,
    channel_data: Vec<f32>,
    children: Vec<JointId>,
    declared_children: usize,
    parent: Option<JointId>,
}

impl Joint {
    /// Joint name, unique within the tree, used only for diagnostics
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position relative to the parent's local frame, fixed at construction
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Channel layout of this joint
    pub fn channels(&self) -> ChannelLayout {
        self.channels
    }

    /// Channel values written by the last frame bind
    ///
    /// Always exactly `channels().count()` values. Leaf joints keep their
    /// zero-filled initial buffer; the binder never writes them.
    pub fn channel_data(&self) -> &[f32] {
        &self.channel_data
    }

    pub(crate) fn channel_data_mut(&mut self) -> &mut [f32] {
        &mut self.channel_data
    }

    /// Child joints in insertion order
    pub fn children(&self) -> &[JointId] {
        &self.children
    }

    /// Number of child slots declared at construction
    pub fn declared_children(&self) -> usize {
        self.declared_children
    }

    /// Parent joint, `None` for the root
    pub fn parent(&self) -> Option<JointId> {
        self.parent
    }

    /// A joint with no children is an End Site
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Translation channel values, present only on 6-channel joints
    pub fn translation(&self) -> Option<Vec3> {
        match self.channels {
            ChannelLayout::TranslationRotation => Some(Vec3::new(
                self.channel_data[0],
                self.channel_data[1],
                self.channel_data[2],
            )),
            ChannelLayout::Rotation => None,
        }
    }

    /// Rotation channel values as `(z, x, y)` degrees
    pub fn rotation_zxy(&self) -> (f32, f32, f32) {
        let base = match self.channels {
            ChannelLayout::Rotation => 0,
            ChannelLayout::TranslationRotation => 3,
        };
        (
            self.channel_data[base],
            self.channel_data[base + 1],
            self.channel_data[base + 2],
        )
    }
}

/// An immutable joint hierarchy with per-joint channel buffers
///
/// Built once by [`SkeletonBuilder`]; only the channel buffers are mutated
/// afterwards, by the frame binder.
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Skeleton {
    joints: Vec<Joint>,
}

impl Skeleton {
    /// The root joint, always at arena index 0
    pub fn root(&self) -> JointId {
        JointId(0)
    }

    /// Look up a joint by id
    ///
    /// Ids are only handed out by this skeleton's builder, so the lookup is
    /// infallible for ids that belong here.
    pub fn joint(&self, id: JointId) -> &Joint {
        &self.joints[id.0]
    }

    pub(crate) fn joint_mut(&mut self, id: JointId) -> &mut Joint {
        &mut self.joints[id.0]
    }

    /// Number of joints in the arena, End Sites included
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// A skeleton always has at least its root
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Iterate over all joints in arena order
    pub fn joints(&self) -> impl Iterator<Item = (JointId, &Joint)> {
        self.joints
            .iter()
            .enumerate()
            .map(|(i, joint)| (JointId(i), joint))
    }

    /// Find a joint by name
    pub fn find(&self, name: &str) -> Option<JointId> {
        self.joints
            .iter()
            .position(|joint| joint.name == name)
            .map(JointId)
    }

    /// Depth-first pre-order walk starting at the root
    pub fn preorder(&self) -> Vec<JointId> {
        let mut order = Vec::with_capacity(self.joints.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            for &child in self.joint(id).children().iter().rev() {
                stack.push(child);
            }
        }
        order
    }

    /// Total channel values one frame must carry for this skeleton
    ///
    /// Computed with the same depth-first pre-order the binder uses, over
    /// non-leaf joints only: End Sites consume no channel data.
    pub fn total_channel_count(&self) -> usize {
        self.preorder()
            .into_iter()
            .map(|id| {
                let joint = self.joint(id);
                if joint.is_leaf() {
                    0
                } else {
                    joint.channels().count()
                }
            })
            .sum()
    }
}

/// Constructs a [`Skeleton`] top-down, parent before children
///
/// Each joint declares how many children it will receive; attaching more is
/// a hard [`BvhError::SlotOverflow`]. Declared slots may legally remain
/// unfilled. Re-invoking a builder produces a disjoint new skeleton; an
/// existing skeleton is never mutated.
#[derive(Debug, Default)]
pub struct SkeletonBuilder {
    joints: Vec<Joint>,
}

impl SkeletonBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a joint, splicing it into its parent's first unfilled slot
    ///
    /// The first joint must be the root (`parent: None`); any later
    /// parentless joint fails with [`BvhError::DuplicateRoot`].
    pub fn joint(
        &mut self,
        name: &str,
        parent: Option<JointId>,
        channels: ChannelLayout,
        offset: Vec3,
        declared_children: usize,
    ) -> Result<JointId> {
        let id = JointId(self.joints.len());
        match parent {
            None if self.joints.is_empty() => {}
            None => return Err(BvhError::DuplicateRoot(name.to_string())),
            Some(parent_id) => {
                let parent_joint = &mut self.joints[parent_id.0];
                if parent_joint.children.len() >= parent_joint.declared_children {
                    return Err(BvhError::SlotOverflow {
                        parent: parent_joint.name.clone(),
                        declared: parent_joint.declared_children,
                        child: name.to_string(),
                    });
                }
                parent_joint.children.push(id);
            }
        }

        log::trace!(
            "joint '{}' ({:?}, {} declared children)",
            name,
            channels,
            declared_children
        );
        self.joints.push(Joint {
            name: name.to_string(),
            offset,
            channels,
            channel_data: vec![0.0; channels.count()],
            children: Vec::with_capacity(declared_children),
            declared_children,
            parent,
        });
        Ok(id)
    }

    /// Append an End Site: zero children, no meaningful channel data
    pub fn end_site(&mut self, name: &str, parent: JointId, offset: Vec3) -> Result<JointId> {
        self.joint(name, Some(parent), ChannelLayout::Rotation, offset, 0)
    }

    /// Finish the skeleton
    pub fn build(self) -> Result<Skeleton> {
        if self.joints.is_empty() {
            return Err(BvhError::MissingRoot);
        }
        // Append order guarantees acyclicity; keep it checkable.
        debug_assert!(self.joints.iter().enumerate().all(|(index, joint)| {
            joint.children.iter().all(|child| child.0 > index)
        }));
        Ok(Skeleton {
            joints: self.joints,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_arm_skeleton() -> Skeleton {
        let mut builder = SkeletonBuilder::new();
        let root = builder
            .joint(
                "Hips",
                None,
                ChannelLayout::TranslationRotation,
                Vec3::ZERO,
                2,
            )
            .unwrap();
        let left = builder
            .joint(
                "LeftArm",
                Some(root),
                ChannelLayout::Rotation,
                Vec3::new(2.0, 0.0, 0.0),
                1,
            )
            .unwrap();
        builder
            .end_site("EndLeft", left, Vec3::new(1.0, 0.0, 0.0))
            .unwrap();
        let right = builder
            .joint(
                "RightArm",
                Some(root),
                ChannelLayout::Rotation,
                Vec3::new(-2.0, 0.0, 0.0),
                1,
            )
            .unwrap();
        builder
            .end_site("EndRight", right, Vec3::new(-1.0, 0.0, 0.0))
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_builder_constructs_arena() {
        let skeleton = two_arm_skeleton();
        assert_eq!(skeleton.len(), 5);
        assert_eq!(skeleton.root().index(), 0);
        assert_eq!(skeleton.joint(skeleton.root()).children().len(), 2);
        assert_eq!(skeleton.joint(skeleton.root()).name(), "Hips");
    }

    #[test]
    fn test_channel_buffer_matches_layout() {
        let skeleton = two_arm_skeleton();
        for (_, joint) in skeleton.joints() {
            assert_eq!(joint.channel_data().len(), joint.channels().count());
        }
    }

    #[test]
    fn test_slot_overflow_is_rejected() {
        let mut builder = SkeletonBuilder::new();
        let root = builder
            .joint("Root", None, ChannelLayout::TranslationRotation, Vec3::ZERO, 1)
            .unwrap();
        builder
            .joint("A", Some(root), ChannelLayout::Rotation, Vec3::ZERO, 0)
            .unwrap();
        let result = builder.joint("B", Some(root), ChannelLayout::Rotation, Vec3::ZERO, 0);
        assert!(matches!(result, Err(BvhError::SlotOverflow { .. })));
    }

    #[test]
    fn test_duplicate_root_is_rejected() {
        let mut builder = SkeletonBuilder::new();
        builder
            .joint("Root", None, ChannelLayout::TranslationRotation, Vec3::ZERO, 0)
            .unwrap();
        let result = builder.joint("Other", None, ChannelLayout::Rotation, Vec3::ZERO, 0);
        assert!(matches!(result, Err(BvhError::DuplicateRoot(_))));
    }

    #[test]
    fn test_empty_builder_is_rejected() {
        assert!(matches!(
            SkeletonBuilder::new().build(),
            Err(BvhError::MissingRoot)
        ));
    }

    #[test]
    fn test_underfilled_slots_are_legal() {
        let mut builder = SkeletonBuilder::new();
        builder
            .joint("Root", None, ChannelLayout::TranslationRotation, Vec3::ZERO, 3)
            .unwrap();
        let skeleton = builder.build().unwrap();
        assert!(skeleton.joint(skeleton.root()).is_leaf());
        assert_eq!(skeleton.joint(skeleton.root()).declared_children(), 3);
    }

    #[test]
    fn test_preorder_visits_children_in_insertion_order() {
        let skeleton = two_arm_skeleton();
        let names: Vec<&str> = skeleton
            .preorder()
            .into_iter()
            .map(|id| skeleton.joint(id).name())
            .collect();
        assert_eq!(
            names,
            vec!["Hips", "LeftArm", "EndLeft", "RightArm", "EndRight"]
        );
    }

    #[test]
    fn test_total_channel_count_skips_leaves() {
        let skeleton = two_arm_skeleton();
        // Hips 6 + LeftArm 3 + RightArm 3; End Sites contribute nothing.
        assert_eq!(skeleton.total_channel_count(), 12);
    }

    #[test]
    fn test_find_by_name() {
        let skeleton = two_arm_skeleton();
        let id = skeleton.find("RightArm").unwrap();
        assert_eq!(skeleton.joint(id).offset(), Vec3::new(-2.0, 0.0, 0.0));
        assert!(skeleton.find("Tail").is_none());
    }

    #[test]
    fn test_rotation_channel_slice() {
        let mut builder = SkeletonBuilder::new();
        let root = builder
            .joint("Root", None, ChannelLayout::TranslationRotation, Vec3::ZERO, 1)
            .unwrap();
        builder
            .joint("Child", Some(root), ChannelLayout::Rotation, Vec3::X, 0)
            .unwrap();
        let mut skeleton = builder.build().unwrap();

        let root_id = skeleton.root();
        skeleton
            .joint_mut(root_id)
            .channel_data_mut()
            .copy_from_slice(&[1.0, 2.0, 3.0, 40.0, 50.0, 60.0]);
        let root_joint = skeleton.joint(root_id);
        assert_eq!(root_joint.translation(), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(root_joint.rotation_zxy(), (40.0, 50.0, 60.0));

        let child = skeleton.find("Child").unwrap();
        assert_eq!(skeleton.joint(child).translation(), None);
        assert_eq!(skeleton.joint(child).rotation_zxy(), (0.0, 0.0, 0.0));
    }
}
