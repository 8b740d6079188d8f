//! Root CLI structure for mocap-rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mocap-rs")]
#[command(about = "Command-line tools for BVH motion capture files", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Display information about a BVH file
    Info {
        /// Path to the BVH file
        file: PathBuf,
    },

    /// Validate a BVH file against its own channel layout
    Validate {
        /// Path to the BVH file
        file: PathBuf,
    },

    /// Show the joint hierarchy of a BVH file
    Tree {
        /// Path to the BVH file
        file: PathBuf,

        /// Maximum depth to display
        #[arg(long)]
        depth: Option<usize>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Show compact metadata inline
        #[arg(long)]
        compact: bool,
    },

    /// Evaluate one frame and print its world-space bone segments
    Pose {
        /// Path to the BVH file
        file: PathBuf,

        /// Frame to evaluate (wraps modulo the frame count)
        #[arg(short, long, default_value_t = 0)]
        frame: usize,
    },

    /// Step through frames, printing the root position per frame
    Play {
        /// Path to the BVH file
        file: PathBuf,

        /// Number of frames to step through
        #[arg(short = 'n', long, default_value_t = 10)]
        frames: usize,

        /// Frame to start from
        #[arg(short, long, default_value_t = 0)]
        start: usize,

        /// Step backwards instead of forwards
        #[arg(long)]
        backwards: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
