//! Keyframe animation for the Lumite engine.
//!
//! This crate provides:
//! - glTF-style keyframe samplers (linear, step, cubic-spline)
//! - Channels binding sampler output to node transform paths
//! - Animation playback driving all channels once per frame
//!
//! Keyframe data arrives pre-parsed from the asset loader as the timeline
//! and output buffers described on [`AnimationSampler`].

pub mod animation;
pub mod channel;
pub mod sampler;

pub use animation::{Animation, LoopPolicy};
pub use channel::{AnimationChannel, PathType};
pub use sampler::{AnimationSampler, Interpolation};
