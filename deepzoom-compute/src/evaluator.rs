use crate::perturbation::iterate_pixel;
use crate::plan::FramePlan;
use crate::scheduler::PixelEvaluator;
use deepzoom_core::{GlitchPolicy, PixelResult};
use std::sync::Arc;

/// Evaluates pixels against a frame plan by perturbation, optionally
/// re-iterating glitched pixels at full precision.
#[derive(Clone, Debug)]
pub struct PerturbationEvaluator {
    plan: Arc<FramePlan>,
    glitch_policy: GlitchPolicy,
}

impl PerturbationEvaluator {
    pub fn new(plan: Arc<FramePlan>, glitch_policy: GlitchPolicy) -> Self {
        Self {
            plan,
            glitch_policy,
        }
    }

    pub fn plan(&self) -> &Arc<FramePlan> {
        &self.plan
    }
}

impl PixelEvaluator for PerturbationEvaluator {
    fn evaluate(&self, px: u32, py: u32) -> PixelResult {
        let plan = &*self.plan;
        let delta0 = plan.geometry.delta_for_pixel(px, py);
        let result = iterate_pixel(
            &plan.orbit,
            &plan.series,
            plan.skip_count,
            delta0,
            plan.bailout_sq,
        );

        if !result.glitched || self.glitch_policy == GlitchPolicy::Flag {
            return result;
        }

        match plan.direct_pixel(px, py) {
            Ok(recomputed) => recomputed,
            Err(e) => {
                log::warn!("Direct re-render of pixel ({}, {}) failed: {}", px, py, e);
                result
            }
        }
    }
}
