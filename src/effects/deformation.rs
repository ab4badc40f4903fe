use std::collections::BTreeMap;

use tracing::debug;

use crate::bodies::{BodyFlags, Deformation};
use crate::core::{BodyHandle, BodyRegistry, DeformationConfig};

/// Horizontal scale factor for each animation frame
pub const DEFORMATION_X: [f64; 54] = [
    0.98, 0.95, 0.92, 0.90, 0.87, 0.85, 0.86, 0.88, 0.85, 0.82, 0.80, 0.77, 0.75, 0.73, 0.71,
    0.67, 0.65, 0.60, 0.62, 0.64, 0.66, 0.68, 0.72, 0.75, 0.78, 0.81, 0.84, 0.87, 0.90, 0.92,
    0.93, 0.95, 0.98, 1.1, 1.2, 1.1, 1.0, 0.98, 0.95, 0.92, 0.90, 0.87, 0.85, 0.86, 0.88,
    0.90, 0.92, 0.93, 0.95, 0.98, 1.1, 1.2, 1.1, 1.0,
];

/// Vertical scale factor for each animation frame
pub const DEFORMATION_Y: [f64; 54] = [
    1.0, 1.1, 1.2, 1.1, 0.98, 0.95, 0.93, 0.92, 0.9, 0.88, 0.86, 0.85, 0.87, 0.9, 0.92, 0.95,
    0.98, 1.0, 1.1, 1.2, 1.1, 0.98, 0.95, 0.93, 0.92, 0.9, 0.87, 0.84, 0.81, 0.78, 0.75, 0.72,
    0.68, 0.66, 0.64, 0.62, 0.6, 0.65, 0.67, 0.71, 0.73, 0.75, 0.77, 0.8, 0.82, 0.85, 0.88,
    0.86, 0.85, 0.87, 0.9, 0.92, 0.95, 0.98,
];

/// Progress of one animation after [`DeformationAnimator::advance`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeformationFrame {
    /// Scale factors written this tick
    Playing { frame: usize, x: f64, y: f64 },

    /// The curve ran out and the body is back to its rest shape
    Finished,

    /// The body left the registry before the curve ended
    Abandoned,
}

/// Plays the impact deformation curve on bodies, driven by the simulation clock.
///
/// A body plays at most one animation at a time; starting a second one while
/// the first is running is ignored.
#[derive(Debug, Clone)]
pub struct DeformationAnimator {
    frame_interval: f64,
    active: BTreeMap<BodyHandle, f64>,
}

impl DeformationAnimator {
    pub fn new(frame_interval: f64) -> Self {
        Self {
            frame_interval,
            active: BTreeMap::new(),
        }
    }

    pub fn from_config(config: &DeformationConfig) -> Self {
        Self::new(config.frame_interval)
    }

    /// Total length of one animation in seconds
    pub fn duration(&self) -> f64 {
        self.frame_interval * DEFORMATION_X.len() as f64
    }

    /// Starts an animation at `now`. Returns `false` when the body is not live
    /// or is already deforming.
    pub fn start(&mut self, registry: &mut BodyRegistry, handle: BodyHandle, now: f64) -> bool {
        if self.active.contains_key(&handle) {
            return false;
        }
        let Ok(body) = registry.get_mut(handle) else {
            return false;
        };
        body.insert_flags(BodyFlags::DEFORMING);
        self.active.insert(handle, now);
        debug!(body = body.name(), "deformation started");
        true
    }

    /// Writes the current frame onto every animated body and reports each
    /// animation's state
    pub fn advance(&mut self, registry: &mut BodyRegistry, now: f64) -> Vec<(BodyHandle, DeformationFrame)> {
        let mut frames = Vec::with_capacity(self.active.len());
        let mut done = Vec::new();

        for (&handle, &started) in &self.active {
            let Ok(body) = registry.get_mut(handle) else {
                frames.push((handle, DeformationFrame::Abandoned));
                done.push(handle);
                continue;
            };

            let frame = ((now - started).max(0.0) / self.frame_interval) as usize;
            if frame >= DEFORMATION_X.len() {
                body.reset_deformation();
                body.remove_flags(BodyFlags::DEFORMING);
                debug!(body = body.name(), "deformation finished");
                frames.push((handle, DeformationFrame::Finished));
                done.push(handle);
                continue;
            }

            let (x, y) = (DEFORMATION_X[frame], DEFORMATION_Y[frame]);
            body.apply_deformation(Deformation { x, y });
            frames.push((handle, DeformationFrame::Playing { frame, x, y }));
        }

        for handle in done {
            self.active.remove(&handle);
        }
        frames
    }

    /// Stops an animation and restores the rest shape if the body is still live
    pub fn cancel(&mut self, registry: &mut BodyRegistry, handle: BodyHandle) -> bool {
        if self.active.remove(&handle).is_none() {
            return false;
        }
        if let Ok(body) = registry.get_mut(handle) {
            body.reset_deformation();
            body.remove_flags(BodyFlags::DEFORMING);
        }
        true
    }

    pub fn is_active(&self, handle: BodyHandle) -> bool {
        self.active.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}

impl Default for DeformationAnimator {
    fn default() -> Self {
        Self::from_config(&DeformationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::Body;
    use crate::core::Arena;
    use crate::math::Vector2;
    use approx::assert_abs_diff_eq;

    fn setup() -> (BodyRegistry, BodyHandle) {
        let mut registry = BodyRegistry::new();
        let body = Body::new(Vector2::new(10.0, 10.0), Vector2::new(20.0, 20.0), 2.0, "ball", &Arena::default()).unwrap();
        let handle = registry.insert(body).unwrap();
        (registry, handle)
    }

    #[test]
    fn every_curve_frame_is_a_valid_deformation() {
        let (mut registry, handle) = setup();
        let body = registry.get_mut(handle).unwrap();
        for (x, y) in DEFORMATION_X.iter().zip(DEFORMATION_Y.iter()) {
            assert!(body.set_deformation(*x, *y).is_ok());
        }
    }

    #[test]
    fn curve_is_played_then_reset() {
        let (mut registry, handle) = setup();
        let mut animator = DeformationAnimator::new(0.01);
        assert!(animator.start(&mut registry, handle, 0.0));
        assert!(!animator.start(&mut registry, handle, 0.0));

        let frames = animator.advance(&mut registry, 0.025);
        assert!(matches!(frames[0].1, DeformationFrame::Playing { frame: 2, .. }));
        let deformation = registry.get(handle).unwrap().deformation();
        assert_abs_diff_eq!(deformation.x, 0.92);
        assert_abs_diff_eq!(deformation.y, 1.2);
        assert!(registry.get(handle).unwrap().flags().contains(BodyFlags::DEFORMING));

        let frames = animator.advance(&mut registry, animator.duration() + 0.001);
        assert_eq!(frames[0].1, DeformationFrame::Finished);
        let body = registry.get(handle).unwrap();
        assert_eq!(body.deformation().x, 1.0);
        assert_eq!(body.deformation().y, 1.0);
        assert!(!body.flags().contains(BodyFlags::DEFORMING));
        assert!(animator.is_empty());
    }

    #[test]
    fn removed_body_abandons_animation() {
        let (mut registry, handle) = setup();
        let mut animator = DeformationAnimator::default();
        animator.start(&mut registry, handle, 0.0);
        registry.remove(handle).unwrap();
        let frames = animator.advance(&mut registry, 0.1);
        assert_eq!(frames, vec![(handle, DeformationFrame::Abandoned)]);
        assert!(!animator.is_active(handle));
    }

    #[test]
    fn cancel_restores_rest_shape() {
        let (mut registry, handle) = setup();
        let mut animator = DeformationAnimator::default();
        animator.start(&mut registry, handle, 0.0);
        animator.advance(&mut registry, 0.3);
        assert!(animator.cancel(&mut registry, handle));
        assert_eq!(registry.get(handle).unwrap().deformation().x, 1.0);
        assert!(!animator.cancel(&mut registry, handle));
    }
}
