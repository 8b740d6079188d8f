//! Integration tests for the BVH pipeline: load, bind, evaluate, orient

use std::io::Cursor;

use glam::Vec3;
use mocap_bvh::animation::shared_cylinder;
use mocap_bvh::{AnimationManager, BvhError, BvhParser, MotionData};

/// Root(6ch) -> Mid(3ch, zero offset) -> End Site at (10, 0, 0), two frames:
/// a rest pose and a 45 degree Z rotation on Mid's parent chain.
const CHAIN: &str = "\
HIERARCHY
ROOT Root
{
    OFFSET 0.0 0.0 0.0
    CHANNELS 6 Xposition Yposition Zposition Zrotation Xrotation Yrotation
    JOINT Mid
    {
        OFFSET 0.0 0.0 0.0
        CHANNELS 3 Zrotation Xrotation Yrotation
        End Site
        {
            OFFSET 10.0 0.0 0.0
        }
    }
}
MOTION
Frames: 2
Frame Time: 0.05
0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0
0.0 0.0 0.0 45.0 0.0 0.0 0.0 0.0 0.0
";

const EPSILON: f32 = 1e-4;

fn manager() -> AnimationManager {
    let file = BvhParser::new()
        .parse(&mut Cursor::new(CHAIN.as_bytes()))
        .expect("chain document parses");
    AnimationManager::new(file.skeleton, file.motion).expect("chain document animates")
}

#[test]
fn rest_pose_points_straight_along_x() {
    let manager = manager();
    let segments = manager.evaluate();

    // Root -> Mid, Mid -> End Site, End Site stub.
    assert_eq!(segments.len(), 3);
    assert!((segments[1].end - Vec3::new(10.0, 0.0, 0.0)).length() < EPSILON);
    assert!((segments[2].end - Vec3::new(20.0, 0.0, 0.0)).length() < EPSILON);
}

#[test]
fn rotated_frame_swings_the_chain_about_z() {
    let mut manager = manager();
    manager.advance_frame().expect("frame 1 binds");

    let segments = manager.evaluate();
    let diagonal = 10.0 * std::f32::consts::FRAC_1_SQRT_2;
    assert!((segments[1].end - Vec3::new(diagonal, diagonal, 0.0)).length() < EPSILON);
}

#[test]
fn frame_stepping_wraps_in_both_directions() {
    let mut manager = manager();
    assert_eq!(manager.current_frame(), 0);

    manager.advance_frame().expect("advance");
    assert_eq!(manager.current_frame(), 1);
    manager.advance_frame().expect("advance wraps");
    assert_eq!(manager.current_frame(), 0);

    manager.retreat_frame().expect("retreat wraps");
    assert_eq!(manager.current_frame(), 1);
}

#[test]
fn binding_and_evaluation_are_deterministic_per_frame() {
    let mut manager = manager();
    manager.set_frame(1).expect("seek");
    let first = manager.evaluate();
    let second = manager.evaluate();
    assert_eq!(first, second);

    // Stepping away and back reproduces the same pose.
    manager.advance_frame().expect("advance");
    manager.retreat_frame().expect("retreat");
    assert_eq!(manager.evaluate(), first);
}

#[test]
fn render_instances_match_segments_and_share_one_primitive() {
    let manager = manager();
    let segments = manager.evaluate();
    let instances = manager.render_instances();
    assert_eq!(segments.len(), instances.len());

    for (segment, instance) in segments.iter().zip(&instances) {
        let expected = segment.length();
        if expected < 1e-4 {
            assert!((instance.length - 1.0).abs() < EPSILON);
        } else {
            assert!((instance.length - expected).abs() < EPSILON);
        }
    }
    assert!(!shared_cylinder().positions.is_empty());
}

#[test]
fn mismatched_motion_is_rejected_as_a_whole() {
    let file = BvhParser::new()
        .parse(&mut Cursor::new(CHAIN.as_bytes()))
        .expect("chain document parses");

    let bad_motion = MotionData::new(0.05, vec![vec![0.0; 8]]);
    let result = AnimationManager::new(file.skeleton, bad_motion);
    assert!(matches!(
        result,
        Err(BvhError::FrameLayoutMismatch {
            expected: 9,
            actual: 8
        })
    ));
}
