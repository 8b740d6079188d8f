//! Step through a BVH clip and print the root position per frame
//!
//! Usage: cargo run --example play_clip -- <file.bvh> [frames]

use mocap_bvh::AnimationManager;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let path = args.next().ok_or("usage: play_clip <file.bvh> [frames]")?;
    let steps: usize = match args.next() {
        Some(raw) => raw.parse()?,
        None => 10,
    };

    let mut manager = AnimationManager::load(&path)?;
    println!(
        "{}: {} joints, {} frames, {:.4}s per frame",
        path,
        manager.skeleton().len(),
        manager.frame_count(),
        manager.motion().frame_time()
    );

    for _ in 0..steps {
        let segments = manager.evaluate();
        let root = segments.first().map_or(glam::Vec3::ZERO, |s| s.start);
        println!(
            "frame {:4}: root ({:8.3} {:8.3} {:8.3}), {} bones",
            manager.current_frame(),
            root.x,
            root.y,
            root.z,
            segments.len()
        );
        manager.advance_frame()?;
    }
    Ok(())
}
