//! Reproducible heading jitter

use std::f32::consts::FRAC_PI_8;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{DrawContext, DrawRule};
use crate::turtle::Turtle;

/// Perturb the heading by up to `max_offset` radians either way.
///
/// The offset depends only on the seed and the invocation site, so a rerun
/// with the same inputs reproduces every jitter. An argument in degrees
/// replaces the maximum.
#[derive(Clone, Copy, Debug)]
pub struct RandomAngle {
    seed: u64,
    max_offset: f32,
}

impl RandomAngle {
    pub fn new(seed: u64) -> Self {
        Self { seed, max_offset: FRAC_PI_8 }
    }

    pub fn with_max_offset(mut self, max_offset: f32) -> Self {
        self.max_offset = max_offset.abs();
        self
    }

    /// Offset applied at `site`.
    pub fn offset_at(&self, site: u64, max_offset: f32) -> f32 {
        let max = max_offset.abs();
        if max == 0.0 {
            return 0.0;
        }
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ site);
        rng.gen_range(-max..=max)
    }
}

impl DrawRule for RandomAngle {
    fn draw(&self, turtle: &mut Turtle, ctx: &mut DrawContext<'_>, arg: Option<f32>) {
        let max = arg.map(f32::to_radians).unwrap_or(self.max_offset);
        turtle.direction += self.offset_at(ctx.site, max);
    }
}
