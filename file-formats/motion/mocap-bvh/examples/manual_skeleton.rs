//! Build a small biped by hand and evaluate one pose
//!
//! Usage: cargo run --example manual_skeleton

use glam::Vec3;
use mocap_bvh::animation::{bind_frame, evaluate, orient};
use mocap_bvh::{ChannelLayout, Result, SkeletonBuilder};

fn main() -> Result<()> {
    let mut builder = SkeletonBuilder::new();

    let hips = builder.joint(
        "Hips",
        None,
        ChannelLayout::TranslationRotation,
        Vec3::ZERO,
        3,
    )?;

    let spine = builder.joint(
        "Spine",
        Some(hips),
        ChannelLayout::Rotation,
        Vec3::new(0.0, 10.8, 2.0),
        1,
    )?;
    let neck = builder.joint(
        "Neck",
        Some(spine),
        ChannelLayout::Rotation,
        Vec3::new(0.0, 26.0, -0.1),
        1,
    )?;
    builder.end_site("Head", neck, Vec3::new(0.0, 9.5, -0.9))?;

    let left_leg = builder.joint(
        "LeftUpLeg",
        Some(hips),
        ChannelLayout::Rotation,
        Vec3::new(-5.6, -2.2, -10.2),
        1,
    )?;
    builder.end_site("LeftFoot", left_leg, Vec3::new(2.6, -44.7, -7.9))?;

    let right_leg = builder.joint(
        "RightUpLeg",
        Some(hips),
        ChannelLayout::Rotation,
        Vec3::new(-5.8, -1.7, 10.6),
        1,
    )?;
    builder.end_site("RightFoot", right_leg, Vec3::new(-2.6, -44.7, -7.9))?;

    let mut skeleton = builder.build()?;

    // Hips at standing height, spine leaning 15 degrees forward about Z.
    let frame = [
        0.0, 98.8, 0.0, 0.0, 0.0, 0.0, // Hips: translation + rotation
        15.0, 0.0, 0.0, // Spine
        0.0, 0.0, 0.0, // Neck
        0.0, 0.0, 0.0, // LeftUpLeg
        0.0, 0.0, 0.0, // RightUpLeg
    ];
    bind_frame(&mut skeleton, &frame)?;

    for segment in evaluate(&skeleton) {
        let instance = orient(segment.start, segment.end);
        println!(
            "({:7.2} {:7.2} {:7.2}) -> ({:7.2} {:7.2} {:7.2})  length {:6.2}",
            segment.start.x,
            segment.start.y,
            segment.start.z,
            segment.end.x,
            segment.end.y,
            segment.end.z,
            instance.length
        );
    }
    Ok(())
}
