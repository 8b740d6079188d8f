//! Command implementations for the mocap-rs CLI

pub mod bvh;
