//! BVH motion capture command implementations

use anyhow::{Context, Result};
use std::path::Path;

use mocap_bvh::{AnimationManager, BvhFile, JointId, Skeleton};

use crate::utils::{NodeType, TreeNode, TreeOptions, render_tree};

fn load(path: &Path) -> Result<BvhFile> {
    mocap_bvh::load(path).with_context(|| format!("Failed to parse BVH file: {}", path.display()))
}

pub fn info(path: &Path) -> Result<()> {
    use console::style;

    let file = load(path)?;
    let end_sites = file
        .skeleton
        .joints()
        .filter(|(_, joint)| joint.is_leaf())
        .count();

    println!("\n{}", style("BVH File Information").bold().underlined());
    println!("File: {}", style(path.display()).cyan());
    println!(
        "Joints: {} ({} End Sites)",
        style(file.skeleton.len()).green(),
        style(end_sites).dim()
    );
    println!(
        "Channels per frame: {}",
        style(file.skeleton.total_channel_count()).green()
    );
    println!("Frames: {}", style(file.motion.frame_count()).green());
    println!(
        "Frame time: {}s ({} fps)",
        style(format!("{:.4}", file.motion.frame_time())).yellow(),
        style(format!("{:.1}", 1.0 / file.motion.frame_time())).dim()
    );
    println!(
        "Duration: {}s",
        style(format!("{:.2}", file.motion.duration())).yellow()
    );

    Ok(())
}

pub fn validate(path: &Path) -> Result<()> {
    use console::style;

    let file = load(path)?;
    let frame_count = file.motion.frame_count();

    // Constructing the playback context validates every frame against the
    // skeleton's channel layout and rejects empty clips.
    let manager = AnimationManager::new(file.skeleton, file.motion)
        .with_context(|| format!("Failed to validate BVH file: {}", path.display()))?;

    println!(
        "✓ BVH file '{}' is valid ({} joints, {} frames)",
        style(path.display()).cyan(),
        style(manager.skeleton().len()).green(),
        style(frame_count).green()
    );

    Ok(())
}

pub fn tree(path: &Path, depth: Option<usize>, no_color: bool, compact: bool) -> Result<()> {
    let file = load(path)?;
    let root = joint_node(&file.skeleton, file.skeleton.root())
        .with_metadata("frames", &file.motion.frame_count().to_string())
        .with_metadata(
            "total_channels",
            &file.skeleton.total_channel_count().to_string(),
        );

    let options = TreeOptions {
        max_depth: depth,
        no_color,
        show_metadata: true,
        compact,
    };

    println!("{}", render_tree(&root, &options));
    Ok(())
}

fn joint_node(skeleton: &Skeleton, id: JointId) -> TreeNode {
    let joint = skeleton.joint(id);
    let node_type = if joint.parent().is_none() {
        NodeType::Root
    } else if joint.is_leaf() {
        NodeType::EndSite
    } else {
        NodeType::Joint
    };

    let offset = joint.offset();
    let mut node = TreeNode::new(joint.name().to_string(), node_type).with_metadata(
        "offset",
        &format!("({:.2}, {:.2}, {:.2})", offset.x, offset.y, offset.z),
    );
    if !joint.is_leaf() {
        node = node.with_metadata("channels", &joint.channels().count().to_string());
    }

    for &child in joint.children() {
        node = node.add_child(joint_node(skeleton, child));
    }
    node
}

pub fn pose(path: &Path, frame: usize) -> Result<()> {
    use crate::utils::table::create_table;
    use console::style;
    use prettytable::row;

    let file = load(path)?;
    let mut manager = AnimationManager::new(file.skeleton, file.motion)
        .with_context(|| format!("Failed to animate BVH file: {}", path.display()))?;
    manager.set_frame(frame)?;

    println!(
        "\n{} {} / {}",
        style("Pose at frame").bold(),
        style(manager.current_frame()).cyan(),
        style(manager.frame_count()).dim()
    );

    let segments = manager.evaluate();
    let instances = manager.render_instances();

    let mut table = create_table(vec!["Bone", "Start", "End", "Length"]);
    for (index, (segment, instance)) in segments.iter().zip(&instances).enumerate() {
        table.add_row(row![
            index,
            format!(
                "{:8.3} {:8.3} {:8.3}",
                segment.start.x, segment.start.y, segment.start.z
            ),
            format!(
                "{:8.3} {:8.3} {:8.3}",
                segment.end.x, segment.end.y, segment.end.z
            ),
            format!("{:.3}", instance.length),
        ]);
    }
    table.printstd();

    Ok(())
}

pub fn play(path: &Path, frames: usize, start: usize, backwards: bool) -> Result<()> {
    use console::style;

    let file = load(path)?;
    let mut manager = AnimationManager::new(file.skeleton, file.motion)
        .with_context(|| format!("Failed to animate BVH file: {}", path.display()))?;
    manager.set_frame(start)?;

    println!(
        "Stepping {} frames {} from frame {} of {}",
        style(frames).green(),
        if backwards { "backwards" } else { "forwards" },
        style(manager.current_frame()).cyan(),
        style(manager.frame_count()).cyan()
    );

    for _ in 0..frames {
        let segments = manager.evaluate();
        let root = segments.first().map(|segment| segment.start);
        match root {
            Some(root) => println!(
                "frame {:>5}: root ({:8.3} {:8.3} {:8.3}), {} bones",
                manager.current_frame(),
                root.x,
                root.y,
                root.z,
                segments.len()
            ),
            None => println!("frame {:>5}: empty pose", manager.current_frame()),
        }

        if backwards {
            manager.retreat_frame()?;
        } else {
            manager.advance_frame()?;
        }
    }

    Ok(())
}
