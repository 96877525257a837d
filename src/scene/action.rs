//! Timed node actions
//!
//! Only Y-axis rotations are needed: the pivot turn between levels and the
//! idle spin on each model.

/// An action that can be scheduled on a scene node
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Rotate around Y by `angle` radians over `duration` seconds (linear)
    RotateBy { angle: f32, duration: f32 },
    /// Run the inner action again and again, never finishing
    RepeatForever(Box<Action>),
}

impl Action {
    pub fn rotate_by(angle: f32, duration: f32) -> Self {
        Action::RotateBy { angle, duration }
    }

    pub fn repeat_forever(self) -> Self {
        Action::RepeatForever(Box::new(self))
    }
}

#[derive(Debug, Clone)]
enum Progress {
    Once { angle: f32, duration: f32, elapsed: f32, applied: f32 },
    Forever { angle: f32, duration: f32 },
}

/// An action in flight on a node
#[derive(Debug, Clone)]
pub struct RunningAction {
    pub key: Option<String>,
    progress: Progress,
}

impl RunningAction {
    pub fn new(key: Option<&str>, action: Action) -> Self {
        Self {
            key: key.map(str::to_string),
            progress: Self::progress_for(action),
        }
    }

    fn progress_for(action: Action) -> Progress {
        match action {
            Action::RotateBy { angle, duration } => Progress::Once {
                angle,
                duration,
                elapsed: 0.0,
                applied: 0.0,
            },
            Action::RepeatForever(inner) => match Self::progress_for(*inner) {
                Progress::Once { angle, duration, .. } | Progress::Forever { angle, duration } => {
                    Progress::Forever { angle, duration }
                }
            },
        }
    }

    /// Advance by `dt` seconds and return the rotation to apply this step
    pub fn step(&mut self, dt: f32) -> f32 {
        match &mut self.progress {
            Progress::Once { angle, duration, elapsed, applied } => {
                *elapsed += dt;
                let t = if *duration <= 0.0 {
                    1.0
                } else {
                    (*elapsed / *duration).min(1.0)
                };
                let target = *angle * t;
                let delta = target - *applied;
                *applied = target;
                delta
            }
            Progress::Forever { angle, duration } => {
                if *duration <= 0.0 {
                    0.0
                } else {
                    *angle * dt / *duration
                }
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        match &self.progress {
            Progress::Once { angle, applied, .. } => *applied == *angle,
            Progress::Forever { .. } => false,
        }
    }

    /// Rotation this action still owes its node
    pub fn remaining(&self) -> f32 {
        match &self.progress {
            Progress::Once { angle, applied, .. } => *angle - *applied,
            Progress::Forever { .. } => 0.0,
        }
    }

    /// Take over rotation left behind by a superseded action
    pub fn absorb(&mut self, extra: f32) {
        if let Progress::Once { angle, .. } = &mut self.progress {
            *angle += extra;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_by_applies_full_angle_once() {
        let mut running = RunningAction::new(None, Action::rotate_by(1.2, 0.3));
        let mut total = 0.0;
        for _ in 0..10 {
            total += running.step(0.1);
        }
        assert!((total - 1.2).abs() < 1e-5);
        assert!(running.is_finished());
        assert_eq!(running.step(0.1), 0.0);
    }

    #[test]
    fn test_rotate_by_is_linear() {
        let mut running = RunningAction::new(None, Action::rotate_by(2.0, 1.0));
        let first = running.step(0.25);
        assert!((first - 0.5).abs() < 1e-5);
        assert!((running.remaining() - 1.5).abs() < 1e-5);
        assert!(!running.is_finished());
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let mut running = RunningAction::new(None, Action::rotate_by(0.7, 0.0));
        assert_eq!(running.step(0.016), 0.7);
        assert!(running.is_finished());
    }

    #[test]
    fn test_repeat_forever_keeps_rate() {
        let mut spin = RunningAction::new(Some("spin"), Action::rotate_by(-10.0, 15.0).repeat_forever());
        let mut total = 0.0;
        for _ in 0..30 {
            total += spin.step(1.0);
        }
        assert!((total + 20.0).abs() < 1e-3);
        assert!(!spin.is_finished());
        assert_eq!(spin.remaining(), 0.0);
        assert_eq!(spin.key.as_deref(), Some("spin"));
    }

    #[test]
    fn test_absorb_extends_rotation() {
        let mut running = RunningAction::new(None, Action::rotate_by(1.0, 1.0));
        running.absorb(0.5);
        let total = running.step(2.0);
        assert!((total - 1.5).abs() < 1e-5);
    }
}
