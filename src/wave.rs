/// Attack waves: short-lived pulses emitted when an enemy commits to an attack.
///
/// Waves are purely presentational. They are created by the behaviors, aged once
/// per world tick and dropped as soon as their timer passes [`WAVE_LIFETIME`].
use glam::Vec2;
use log::trace;
use serde::{Deserialize, Serialize};

/// Seconds a wave stays alive.
pub const WAVE_LIFETIME: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wave {
    pub center: Vec2,
    /// Seconds since emission.
    pub timer: f32,
}

impl Wave {
    pub fn new(center: Vec2) -> Self {
        Wave { center, timer: 0.0 }
    }

    pub fn is_expired(&self) -> bool {
        self.timer > WAVE_LIFETIME
    }
}

/// Live waves in emission order.
#[derive(Debug, Clone, Default)]
pub struct WaveList {
    waves: Vec<Wave>,
}

impl WaveList {
    pub fn new() -> Self {
        WaveList::default()
    }

    pub fn emit(&mut self, center: Vec2) {
        trace!("wave emitted at ({:.2}, {:.2})", center.x, center.y);
        self.waves.push(Wave::new(center));
    }

    /// Advances every wave by `dt` and drops the expired ones.
    ///
    /// Survivors keep their relative order. Returns how many were dropped.
    pub fn age(&mut self, dt: f32) -> usize {
        let before = self.waves.len();
        for wave in &mut self.waves {
            wave.timer += dt;
        }
        self.waves.retain(|wave| !wave.is_expired());

        let expired = before - self.waves.len();
        if expired > 0 {
            trace!("{} wave(s) expired", expired);
        }
        expired
    }

    pub fn as_slice(&self) -> &[Wave] {
        &self.waves
    }

    pub fn iter(&self) -> impl Iterator<Item = &Wave> {
        self.waves.iter()
    }

    pub fn len(&self) -> usize {
        self.waves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn list_with_timers(timers: &[f32]) -> WaveList {
        let mut list = WaveList::new();
        for (i, &timer) in timers.iter().enumerate() {
            list.emit(Vec2::new(i as f32, 0.0));
            list.waves[i].timer = timer;
        }
        list
    }

    #[test]
    fn test_emit_starts_at_zero() {
        let mut list = WaveList::new();
        list.emit(Vec2::new(1.0, 2.0));

        assert_eq!(list.as_slice(), &[Wave::new(Vec2::new(1.0, 2.0))]);
    }

    #[test]
    fn test_age_drops_expired_and_keeps_order() {
        let mut list = list_with_timers(&[0.95, 0.5]);

        let expired = list.age(0.1);

        assert_eq!(expired, 1);
        assert_eq!(list.len(), 1);
        assert_relative_eq!(list.as_slice()[0].timer, 0.6);
        assert_eq!(list.as_slice()[0].center, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_exactly_one_second_is_still_alive() {
        let mut list = list_with_timers(&[0.5]);

        list.age(0.5);

        assert_eq!(list.len(), 1);
        list.age(0.01);
        assert!(list.is_empty());
    }

    #[test]
    fn test_stable_order_across_interleaved_expiry() {
        let mut list = list_with_timers(&[0.1, 0.99, 0.2, 0.98, 0.3]);

        list.age(0.05);

        let centers: Vec<f32> = list.iter().map(|w| w.center.x).collect();
        assert_eq!(centers, vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn test_zero_dt_changes_nothing() {
        let mut list = list_with_timers(&[0.3, 0.7]);

        assert_eq!(list.age(0.0), 0);
        assert_relative_eq!(list.as_slice()[0].timer, 0.3);
        assert_relative_eq!(list.as_slice()[1].timer, 0.7);
    }
}
