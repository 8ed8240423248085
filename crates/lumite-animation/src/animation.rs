//! Animation playback.

use crate::channel::{AnimationChannel, PathType};
use crate::sampler::AnimationSampler;
use lumite_scene::Scene;

/// What to do when the playback clock passes the last keyframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopPolicy {
    /// Reset the clock to `0.0` on overflow.
    #[default]
    Restart,
    /// Subtract the timeline extent, preserving the overshoot phase.
    Wrap,
}

/// A named set of samplers and channels driven by a playback clock.
///
/// `update` is expected once per frame from a single simulation thread;
/// nothing here synchronizes concurrent access to the same scene nodes.
#[derive(Debug, Default)]
pub struct Animation {
    pub name: String,
    pub samplers: Vec<AnimationSampler>,
    pub channels: Vec<AnimationChannel>,
    /// Playback clock in seconds. Mutated only by [`Animation::update`].
    pub current_time: f32,
    /// Earliest keyframe time across all samplers.
    pub start: f32,
    /// Latest keyframe time across all samplers.
    pub end: f32,
    pub loop_policy: LoopPolicy,
}

impl Animation {
    /// Create an empty animation.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: f32::MAX,
            end: f32::MIN,
            ..Self::default()
        }
    }

    /// Recompute `start`/`end` from the current sampler timelines.
    ///
    /// Call after filling in samplers; looping uses `end` as the timeline
    /// extent.
    pub fn update_bounds(&mut self) {
        self.start = f32::MAX;
        self.end = f32::MIN;
        for sampler in &self.samplers {
            for &input in &sampler.inputs {
                self.start = self.start.min(input);
                self.end = self.end.max(input);
            }
        }
    }

    /// Advance the clock by `delta_time` and write every channel's pose
    /// into its target node.
    ///
    /// The clock advances (and wraps) before evaluation, so after
    /// `update(dt)` every node holds the pose at the new clock value.
    /// Malformed samplers, out-of-range sampler indices, and despawned
    /// nodes are skipped for the frame; playback never raises. Every
    /// keyframe pair containing the current time is evaluated, so
    /// overlapping qualifying segments resolve last-write-wins.
    pub fn update(&mut self, delta_time: f32, scene: &mut Scene) {
        self.current_time += delta_time;
        if self.current_time > self.end {
            match self.loop_policy {
                LoopPolicy::Restart => self.current_time = 0.0,
                LoopPolicy::Wrap => self.current_time -= self.end,
            }
        }

        for channel in &self.channels {
            let Some(sampler) = self.samplers.get(channel.sampler_index) else {
                tracing::debug!(
                    animation = %self.name,
                    sampler_index = channel.sampler_index,
                    "channel references a missing sampler, skipping"
                );
                continue;
            };
            if !sampler.is_valid_for(channel.path) {
                tracing::debug!(
                    animation = %self.name,
                    sampler_index = channel.sampler_index,
                    "sampler output buffer inconsistent with its timeline, skipping"
                );
                continue;
            }
            let Some(transform) = scene.transform_mut(channel.node) else {
                continue;
            };

            for i in 0..sampler.keyframe_count().saturating_sub(1) {
                if self.current_time < sampler.inputs[i]
                    || self.current_time > sampler.inputs[i + 1]
                {
                    continue;
                }
                let u = sampler.segment_factor(i, self.current_time);
                if u > 1.0 {
                    continue;
                }
                match channel.path {
                    PathType::Translation => sampler.translate(i, self.current_time, transform),
                    PathType::Scale => sampler.scale(i, self.current_time, transform),
                    PathType::Rotation => sampler.rotate(i, self.current_time, transform),
                }
            }
        }
    }
}
