//! BVH document parser
//!
//! Reads the `HIERARCHY` section into a [`Skeleton`] and the `MOTION`
//! section into [`MotionData`]. Validation is strict: channel declarations
//! must match the fixed Z, X, Y consumption order and every frame line must
//! tokenize to exactly the skeleton's total channel count. A malformed
//! document is rejected at load instead of silently misaligning later.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use glam::Vec3;

use crate::error::{BvhError, Result};
use crate::motion::MotionData;
use crate::skeleton::{ChannelLayout, JointId, Skeleton, SkeletonBuilder};

/// Rotation channel names in the only supported consumption order
const ROTATION_CHANNELS: [&str; 3] = ["Zrotation", "Xrotation", "Yrotation"];

/// Six-channel layout: world translation first, then rotations
const FULL_CHANNELS: [&str; 6] = [
    "Xposition",
    "Yposition",
    "Zposition",
    "Zrotation",
    "Xrotation",
    "Yrotation",
];

/// A fully parsed BVH document
#[derive(Debug, Clone)]
pub struct BvhFile {
    /// The joint hierarchy from the `HIERARCHY` section
    pub skeleton: Skeleton,
    /// The frame sequence from the `MOTION` section
    pub motion: MotionData,
}

/// Load and parse a BVH file from disk
///
/// A missing or unreadable file surfaces as [`BvhError::Io`]; the load
/// either completes in full or fails before anything can be animated.
pub fn load<P: AsRef<Path>>(path: P) -> Result<BvhFile> {
    let path = path.as_ref();
    log::debug!("loading BVH file {}", path.display());
    let file = File::open(path)?;
    BvhParser::new().parse(&mut BufReader::new(file))
}

/// Parser for BVH motion capture documents
#[derive(Debug, Default)]
pub struct BvhParser;

/// Joint description accumulated while walking the hierarchy section
struct RawJoint {
    name: String,
    offset: Vec3,
    channels: Option<ChannelLayout>,
    children: Vec<RawJoint>,
    line: usize,
}

impl BvhParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self
    }

    /// Parse a complete BVH document from a reader
    pub fn parse<R: BufRead>(&self, reader: &mut R) -> Result<BvhFile> {
        let mut lines = Vec::new();
        for line in reader.lines() {
            lines.push(line?);
        }

        let motion_index = lines
            .iter()
            .position(|line| line.trim() == "MOTION")
            .ok_or_else(|| BvhError::MalformedMotionSection {
                line: lines.len(),
                reason: "missing MOTION section".to_string(),
            })?;

        let mut tokens = Tokens::new(&lines[..motion_index]);
        tokens.expect("HIERARCHY")?;
        tokens.expect("ROOT")?;
        let root_name = tokens.next_token("a root joint name")?;
        let root = parse_joint_block(&mut tokens, root_name, true)?;
        if let Some((line, token)) = tokens.peek() {
            return Err(BvhError::MalformedHierarchy {
                line,
                reason: format!("unexpected token '{token}' after the root joint"),
            });
        }

        let skeleton = build_skeleton(&root)?;
        let motion = parse_motion(&lines, motion_index + 1, skeleton.total_channel_count())?;
        log::debug!(
            "parsed {} joints, {} channels, {} frames",
            skeleton.len(),
            skeleton.total_channel_count(),
            motion.frame_count()
        );

        Ok(BvhFile { skeleton, motion })
    }
}

/// Whitespace token stream over the hierarchy section, tracking line numbers
struct Tokens {
    items: Vec<(usize, String)>,
    position: usize,
}

impl Tokens {
    fn new(lines: &[String]) -> Self {
        let mut items = Vec::new();
        for (index, line) in lines.iter().enumerate() {
            for token in line.split_whitespace() {
                items.push((index + 1, token.to_string()));
            }
        }
        Self { items, position: 0 }
    }

    fn peek(&self) -> Option<(usize, &str)> {
        self.items
            .get(self.position)
            .map(|(line, token)| (*line, token.as_str()))
    }

    /// Line number to report when the stream ends early
    fn eof_line(&self) -> usize {
        self.items.last().map_or(1, |(line, _)| *line)
    }

    fn next_token(&mut self, wanted: &str) -> Result<String> {
        match self.items.get(self.position) {
            Some((_, token)) => {
                self.position += 1;
                Ok(token.clone())
            }
            None => Err(BvhError::MalformedHierarchy {
                line: self.eof_line(),
                reason: format!("expected {wanted}, found end of section"),
            }),
        }
    }

    fn expect(&mut self, expected: &str) -> Result<()> {
        match self.items.get(self.position) {
            Some((line, token)) => {
                if token == expected {
                    self.position += 1;
                    Ok(())
                } else {
                    Err(BvhError::MalformedHierarchy {
                        line: *line,
                        reason: format!("expected '{expected}', found '{token}'"),
                    })
                }
            }
            None => Err(BvhError::MalformedHierarchy {
                line: self.eof_line(),
                reason: format!("expected '{expected}', found end of section"),
            }),
        }
    }

    fn next_f32(&mut self) -> Result<f32> {
        let line = self.peek().map_or_else(|| self.eof_line(), |(l, _)| l);
        let token = self.next_token("a number")?;
        token.parse().map_err(|_| BvhError::MalformedHierarchy {
            line,
            reason: format!("expected a number, found '{token}'"),
        })
    }

    fn next_usize(&mut self) -> Result<usize> {
        let line = self.peek().map_or_else(|| self.eof_line(), |(l, _)| l);
        let token = self.next_token("a count")?;
        token.parse().map_err(|_| BvhError::MalformedHierarchy {
            line,
            reason: format!("expected a count, found '{token}'"),
        })
    }
}

/// Parse one `ROOT`/`JOINT` block, including nested joints and End Sites
fn parse_joint_block(tokens: &mut Tokens, name: String, is_root: bool) -> Result<RawJoint> {
    let block_line = tokens.peek().map_or_else(|| tokens.eof_line(), |(l, _)| l);
    tokens.expect("{")?;

    let mut offset = None;
    let mut channels = None;
    let mut children = Vec::new();

    loop {
        let (line, token) = match tokens.peek() {
            Some(item) => item,
            None => {
                return Err(BvhError::MalformedHierarchy {
                    line: tokens.eof_line(),
                    reason: format!("unterminated block for joint '{name}'"),
                });
            }
        };
        match token {
            "OFFSET" => {
                tokens.next_token("OFFSET")?;
                offset = Some(Vec3::new(
                    tokens.next_f32()?,
                    tokens.next_f32()?,
                    tokens.next_f32()?,
                ));
            }
            "CHANNELS" => {
                tokens.next_token("CHANNELS")?;
                channels = Some(parse_channels(tokens, &name, line)?);
            }
            "JOINT" => {
                tokens.next_token("JOINT")?;
                let child_name = tokens.next_token("a joint name")?;
                children.push(parse_joint_block(tokens, child_name, false)?);
            }
            "End" => {
                tokens.next_token("End")?;
                tokens.expect("Site")?;
                children.push(parse_end_site(tokens, &name)?);
            }
            "}" => {
                tokens.next_token("}")?;
                break;
            }
            other => {
                return Err(BvhError::MalformedHierarchy {
                    line,
                    reason: format!("unexpected token '{other}' in joint '{name}'"),
                });
            }
        }
    }

    let offset = offset.ok_or_else(|| BvhError::MalformedHierarchy {
        line: block_line,
        reason: format!("joint '{name}' has no OFFSET"),
    })?;
    if channels.is_none() {
        return Err(BvhError::MalformedHierarchy {
            line: block_line,
            reason: format!("joint '{name}' has no CHANNELS declaration"),
        });
    }
    if is_root && channels != Some(ChannelLayout::TranslationRotation) {
        log::warn!("root joint '{name}' carries no translation channels");
    }

    Ok(RawJoint {
        name,
        offset,
        channels,
        children,
        line: block_line,
    })
}

/// Parse a `CHANNELS` declaration, enforcing the fixed Z, X, Y order
fn parse_channels(tokens: &mut Tokens, joint: &str, line: usize) -> Result<ChannelLayout> {
    let count = tokens.next_usize()?;
    let layout =
        ChannelLayout::from_count(count).ok_or_else(|| BvhError::InvalidChannelCount {
            joint: joint.to_string(),
            count,
        })?;

    let expected: &[&str] = match layout {
        ChannelLayout::Rotation => &ROTATION_CHANNELS,
        ChannelLayout::TranslationRotation => &FULL_CHANNELS,
    };
    for wanted in expected {
        let token = tokens.next_token("a channel name")?;
        if token != *wanted {
            return Err(BvhError::MalformedHierarchy {
                line,
                reason: format!(
                    "joint '{joint}' declares channel '{token}' where '{wanted}' was \
                     expected (only the Z X Y rotation order is supported)"
                ),
            });
        }
    }
    Ok(layout)
}

/// Parse an `End Site` block: offset only, no channels, no children
fn parse_end_site(tokens: &mut Tokens, parent: &str) -> Result<RawJoint> {
    let line = tokens.peek().map_or_else(|| tokens.eof_line(), |(l, _)| l);
    tokens.expect("{")?;
    tokens.expect("OFFSET")?;
    let offset = Vec3::new(
        tokens.next_f32()?,
        tokens.next_f32()?,
        tokens.next_f32()?,
    );
    tokens.expect("}")?;
    Ok(RawJoint {
        name: format!("{parent}End"),
        offset,
        channels: None,
        children: Vec::new(),
        line,
    })
}

/// Build the skeleton arena from the parsed hierarchy, parent before children
fn build_skeleton(root: &RawJoint) -> Result<Skeleton> {
    let mut builder = SkeletonBuilder::new();
    add_joint(&mut builder, root, None)?;
    builder.build()
}

fn add_joint(
    builder: &mut SkeletonBuilder,
    raw: &RawJoint,
    parent: Option<JointId>,
) -> Result<()> {
    let id = match (raw.channels, parent) {
        (Some(layout), _) => {
            builder.joint(&raw.name, parent, layout, raw.offset, raw.children.len())?
        }
        (None, Some(parent_id)) => builder.end_site(&raw.name, parent_id, raw.offset)?,
        (None, None) => {
            return Err(BvhError::MalformedHierarchy {
                line: raw.line,
                reason: "an End Site cannot be the root".to_string(),
            });
        }
    };
    for child in &raw.children {
        add_joint(builder, child, Some(id))?;
    }
    Ok(())
}

/// Parse the motion section: frame count, frame time, one line per frame
fn parse_motion(lines: &[String], start: usize, expected_channels: usize) -> Result<MotionData> {
    let mut rows = lines
        .iter()
        .enumerate()
        .skip(start)
        .filter(|(_, line)| !line.trim().is_empty());

    let (line_no, frames_line) =
        rows.next()
            .ok_or_else(|| BvhError::MalformedMotionSection {
                line: lines.len(),
                reason: "missing frame count line".to_string(),
            })?;
    let frame_count = frames_line
        .trim()
        .strip_prefix("Frames:")
        .and_then(|rest| rest.trim().parse::<usize>().ok())
        .ok_or_else(|| BvhError::MalformedMotionSection {
            line: line_no + 1,
            reason: format!("expected 'Frames: <count>', found '{}'", frames_line.trim()),
        })?;

    let (line_no, time_line) =
        rows.next()
            .ok_or_else(|| BvhError::MalformedMotionSection {
                line: lines.len(),
                reason: "missing frame time line".to_string(),
            })?;
    let frame_time = time_line
        .trim()
        .strip_prefix("Frame Time:")
        .and_then(|rest| rest.trim().parse::<f32>().ok())
        .ok_or_else(|| BvhError::MalformedMotionSection {
            line: line_no + 1,
            reason: format!(
                "expected 'Frame Time: <seconds>', found '{}'",
                time_line.trim()
            ),
        })?;

    let mut frames = Vec::with_capacity(frame_count);
    for (index, line) in rows {
        if frames.len() == frame_count {
            return Err(BvhError::MalformedMotionSection {
                line: index + 1,
                reason: format!("more than the declared {frame_count} frames"),
            });
        }
        let mut values = Vec::with_capacity(expected_channels);
        for token in line.split_whitespace() {
            let value: f32 = token
                .parse()
                .map_err(|_| BvhError::MalformedMotionSection {
                    line: index + 1,
                    reason: format!("expected a channel value, found '{token}'"),
                })?;
            values.push(value);
        }
        if values.len() != expected_channels {
            return Err(BvhError::MalformedMotionSection {
                line: index + 1,
                reason: format!(
                    "expected {expected_channels} channel values, found {}",
                    values.len()
                ),
            });
        }
        frames.push(values);
    }

    if frames.len() != frame_count {
        return Err(BvhError::MalformedMotionSection {
            line: lines.len(),
            reason: format!(
                "declared {frame_count} frames, found {}",
                frames.len()
            ),
        });
    }

    Ok(MotionData::new(frame_time, frames))
}
