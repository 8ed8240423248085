//! Keyframe samplers and the interpolation kernel.
//!
//! A sampler owns a monotonic keyframe timeline (`inputs`) and the output
//! values for each keyframe. Linear and step samplers store one `Vec4` per
//! keyframe in `outputs_vec4`; cubic-spline samplers store three blocks of
//! `stride` floats per keyframe in the flat `outputs` buffer, laid out as
//! in-tangent, value, out-tangent.
//!
//! The interpolation kernel (`sample_vec4` / `sample_quat`) is pure; the
//! `translate` / `rotate` / `scale` entry points compute through it and
//! write the result into a caller-provided [`Transform`].

use crate::channel::PathType;
use glam::{Quat, Vec4};
use lumite_scene::Transform;

/// Interpolation mode between adjacent keyframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Componentwise lerp; slerp for rotations.
    #[default]
    Linear,
    /// Zeroth-order hold of the segment's start keyframe.
    Step,
    /// Hermite cubic spline using per-keyframe in/out tangents.
    CubicSpline,
}

/// Keyframe timeline plus per-keyframe output values.
#[derive(Debug, Clone, Default)]
pub struct AnimationSampler {
    pub interpolation: Interpolation,
    /// Keyframe times in seconds, strictly increasing.
    pub inputs: Vec<f32>,
    /// One value per keyframe, for linear/step interpolation.
    pub outputs_vec4: Vec<Vec4>,
    /// Flat `[in-tangent, value, out-tangent]` blocks per keyframe, for
    /// cubic-spline interpolation.
    pub outputs: Vec<f32>,
}

impl AnimationSampler {
    /// Number of keyframes on the timeline.
    #[must_use]
    pub fn keyframe_count(&self) -> usize {
        self.inputs.len()
    }

    /// Whether the timeline is strictly increasing.
    ///
    /// Loaders should reject or repair keyframe data that fails this
    /// before handing it to playback.
    #[must_use]
    pub fn has_monotonic_inputs(&self) -> bool {
        self.inputs.windows(2).all(|pair| pair[0] < pair[1])
    }

    /// Whether this sampler's buffers are consistent for the given path.
    ///
    /// Linear/step need one `Vec4` per keyframe; cubic-spline needs
    /// `stride * 3` floats per keyframe. Inconsistent samplers are skipped
    /// during playback rather than evaluated out of bounds.
    #[must_use]
    pub fn is_valid_for(&self, path: PathType) -> bool {
        match self.interpolation {
            Interpolation::Linear | Interpolation::Step => {
                self.inputs.len() <= self.outputs_vec4.len()
            }
            Interpolation::CubicSpline => {
                self.outputs.len() >= self.inputs.len() * path.stride() * 3
            }
        }
    }

    /// Normalized position of `time` within segment `index`.
    ///
    /// Zero-length segments (equal adjacent keyframe times) report `0.0`,
    /// degrading the segment to an instantaneous step at its start value.
    #[must_use]
    pub fn segment_factor(&self, index: usize, time: f32) -> f32 {
        let delta = self.inputs[index + 1] - self.inputs[index];
        if delta <= 0.0 {
            return 0.0;
        }
        (time - self.inputs[index]).max(0.0) / delta
    }

    /// Sample a translation or scale value at `time` within segment
    /// `index`. Pure; requires `index + 1 < inputs.len()`.
    #[must_use]
    pub fn sample_vec4(&self, index: usize, time: f32) -> Vec4 {
        match self.interpolation {
            Interpolation::Linear => {
                let u = self.segment_factor(index, time);
                self.outputs_vec4[index].lerp(self.outputs_vec4[index + 1], u)
            }
            Interpolation::Step => self.outputs_vec4[index],
            Interpolation::CubicSpline => self.cubic_spline(index, time, 3),
        }
    }

    /// Sample a rotation at `time` within segment `index`, renormalized to
    /// a unit quaternion. Pure; requires `index + 1 < inputs.len()`.
    #[must_use]
    pub fn sample_quat(&self, index: usize, time: f32) -> Quat {
        match self.interpolation {
            Interpolation::Linear => {
                let u = self.segment_factor(index, time);
                let q1 = quat_from_vec4(self.outputs_vec4[index]);
                let q2 = quat_from_vec4(self.outputs_vec4[index + 1]);
                // glam's slerp already takes the shortest arc
                q1.slerp(q2, u).normalize()
            }
            Interpolation::Step => quat_from_vec4(self.outputs_vec4[index]),
            Interpolation::CubicSpline => {
                quat_from_vec4(self.cubic_spline(index, time, 4)).normalize()
            }
        }
    }

    /// Hermite cubic-spline interpolation over the flat output buffer.
    ///
    /// See the glTF 2.0 appendix on spline interpolation for the layout
    /// and basis. `m0` is the start keyframe's out-tangent, `m1` the end
    /// keyframe's in-tangent, both scaled by the segment duration.
    fn cubic_spline(&self, index: usize, time: f32, stride: usize) -> Vec4 {
        let delta = self.inputs[index + 1] - self.inputs[index];
        let current = index * stride * 3;
        let next = (index + 1) * stride * 3;
        let (a, v, b) = (0, stride, stride * 2);

        if delta <= 0.0 {
            // Zero-length segment: hold the start keyframe's value
            return read_block(&self.outputs, current + v, stride);
        }

        let t = (time - self.inputs[index]) / delta;
        let t2 = t * t;
        let t3 = t2 * t;
        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;

        let mut pt = [0.0f32; 4];
        for (i, component) in pt.iter_mut().enumerate().take(stride) {
            let p0 = self.outputs[current + v + i];
            let m0 = delta * self.outputs[current + b + i];
            let p1 = self.outputs[next + v + i];
            let m1 = delta * self.outputs[next + a + i];
            *component = h00 * p0 + h10 * m0 + h01 * p1 + h11 * m1;
        }
        Vec4::from_array(pt)
    }

    /// Evaluate segment `index` at `time` and overwrite the transform's
    /// translation.
    pub fn translate(&self, index: usize, time: f32, transform: &mut Transform) {
        transform.set_translation(self.sample_vec4(index, time).truncate());
    }

    /// Evaluate segment `index` at `time` and overwrite the transform's
    /// scale.
    pub fn scale(&self, index: usize, time: f32, transform: &mut Transform) {
        transform.set_scale(self.sample_vec4(index, time).truncate());
    }

    /// Evaluate segment `index` at `time` and overwrite the transform's
    /// rotation.
    pub fn rotate(&self, index: usize, time: f32, transform: &mut Transform) {
        transform.set_rotation(self.sample_quat(index, time));
    }
}

fn quat_from_vec4(v: Vec4) -> Quat {
    Quat::from_xyzw(v.x, v.y, v.z, v.w)
}

fn read_block(outputs: &[f32], base: usize, stride: usize) -> Vec4 {
    let mut block = [0.0f32; 4];
    block[..stride].copy_from_slice(&outputs[base..base + stride]);
    Vec4::from_array(block)
}
