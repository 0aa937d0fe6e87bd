//! Drives a mover along a found path, one waypoint at a time.
//!
//! The follower never moves anything itself: every [update](PathFollower::update) reads the
//! mover's position and returns the [Motion] the mover should apply this tick.

use glam::Vec3;
use grid_util::point::Point;
use log::{debug, warn};

use crate::settings::MoverSettings;
use crate::tile_grid::Grid;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FollowerState {
    Idle,
    FollowingPath {
        /// Waypoint currently walked towards.
        index: usize,
        /// Distance to that waypoint on the previous tick, infinite right after it was chosen.
        previous_distance: f32,
    },
    /// Stays here until the path is reset or a new one is followed.
    AtDestination,
}

/// What the presentation layer should show this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionSignal {
    Idle,
    Walking,
    Running,
    Arrived,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    /// World-space displacement to apply to the mover.
    pub translation: Vec3,
    pub signal: MotionSignal,
}

impl Motion {
    fn still(signal: MotionSignal) -> Motion {
        Motion {
            translation: Vec3::ZERO,
            signal,
        }
    }
}

/// Critically damped interpolation of `current` towards `target`, as in Game Programming Gems 4
/// (8.1). `velocity` carries the rate of change between calls. Never overshoots `target`.
pub fn smooth_damp(
    current: Vec3,
    target: Vec3,
    velocity: &mut Vec3,
    smooth_time: f32,
    dt: f32,
) -> Vec3 {
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);
    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * exp;
    let output = target + (change + temp) * exp;
    if (target - current).dot(output - target) > 0.0 {
        *velocity = Vec3::ZERO;
        return target;
    }
    output
}

fn flat(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

#[derive(Clone, Debug)]
pub struct PathFollower {
    settings: MoverSettings,
    path: Vec<Point>,
    state: FollowerState,
    /// Smoothed per-tick direction.
    direction: Vec3,
    damping: Vec3,
    signal: MotionSignal,
}

impl PathFollower {
    pub fn new(settings: MoverSettings) -> PathFollower {
        PathFollower {
            settings,
            path: Vec::new(),
            state: FollowerState::Idle,
            direction: Vec3::ZERO,
            damping: Vec3::ZERO,
            signal: MotionSignal::Idle,
        }
    }

    pub fn settings(&self) -> &MoverSettings {
        &self.settings
    }

    pub fn state(&self) -> FollowerState {
        self.state
    }

    pub fn path(&self) -> &[Point] {
        &self.path
    }

    /// The waypoint index while following a path.
    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            FollowerState::FollowingPath { index, .. } => Some(index),
            _ => None,
        }
    }

    /// The smoothed direction the mover last moved in, zero when standing still.
    pub fn velocity(&self) -> Vec3 {
        self.direction
    }

    /// Starts following `path` from its first tile.
    pub fn follow_path(&mut self, path: Vec<Point>) {
        if path.is_empty() {
            warn!("Asked to follow an empty path, staying idle");
            self.reset_path();
            return;
        }
        debug!("Following path of {} tiles", path.len());
        self.path = path;
        self.state = FollowerState::FollowingPath {
            index: 0,
            previous_distance: f32::INFINITY,
        };
    }

    /// Drops the path and stops.
    pub fn reset_path(&mut self) {
        self.path.clear();
        self.stop();
        self.state = FollowerState::Idle;
        self.signal = MotionSignal::Idle;
    }

    fn stop(&mut self) {
        self.direction = Vec3::ZERO;
        self.damping = Vec3::ZERO;
    }

    fn move_towards(&mut self, offset: Vec3, speed: f32, dt: f32) -> Vec3 {
        let wanted = offset.normalize_or_zero() * dt;
        self.direction = smooth_damp(
            self.direction,
            wanted,
            &mut self.damping,
            self.settings.smooth_time,
            dt,
        );
        self.direction * speed
    }

    /// Advances the follower by `dt` seconds for a mover at `position`.
    ///
    /// A waypoint counts as reached once it is within one tick of travel, or as soon as the
    /// distance to it grows, which means the mover passed it. The last waypoint gets one more
    /// move straight at it before the follower reports arrival.
    pub fn update(&mut self, grid: &Grid, position: Vec3, dt: f32) -> Motion {
        let FollowerState::FollowingPath {
            index,
            previous_distance,
        } = self.state
        else {
            return Motion::still(self.signal);
        };
        if dt <= 0.0 {
            return Motion::still(self.signal);
        }
        let offset = flat(grid.world_position(self.path[index]) - position);
        let distance = offset.length();
        let cost = grid
            .cell_near(position)
            .and_then(|id| grid.cell(id).cost());
        let speed = self.settings.speed_for(cost);
        self.signal = if self.settings.runs_on(cost) {
            MotionSignal::Running
        } else {
            MotionSignal::Walking
        };

        if distance <= speed * dt || distance > previous_distance {
            let translation = if index + 1 == self.path.len() {
                self.move_towards(offset, speed, dt)
            } else {
                Vec3::ZERO
            };
            let next = index + 1;
            if next >= self.path.len() {
                debug!("Reached {:?}, end of path", self.path[index]);
                self.stop();
                self.state = FollowerState::AtDestination;
                self.signal = MotionSignal::Arrived;
                return Motion {
                    translation,
                    signal: MotionSignal::Arrived,
                };
            }
            self.state = FollowerState::FollowingPath {
                index: next,
                previous_distance: f32::INFINITY,
            };
            return Motion {
                translation,
                signal: self.signal,
            };
        }

        self.state = FollowerState::FollowingPath {
            index,
            previous_distance: distance,
        };
        Motion {
            translation: self.move_towards(offset, speed, dt),
            signal: self.signal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile_grid::tests::grid_from_rows;

    const DT: f32 = 1.0 / 60.0;

    fn straight_grid() -> Grid {
        grid_from_rows(&["S1E", "111"])
    }

    fn line() -> Vec<Point> {
        vec![Point::new(0, 0), Point::new(1, 0), Point::new(2, 0)]
    }

    #[test]
    fn starts_idle() {
        let grid = straight_grid();
        let mut follower = PathFollower::new(MoverSettings::default());
        assert_eq!(follower.state(), FollowerState::Idle);
        let motion = follower.update(&grid, Vec3::ZERO, DT);
        assert_eq!(motion, Motion::still(MotionSignal::Idle));
    }

    #[test]
    fn arrives_when_within_one_tick_of_last_tile() {
        let grid = straight_grid();
        let mut follower = PathFollower::new(MoverSettings::default());
        follower.follow_path(line());
        follower.update(&grid, Vec3::new(0.0, 0.0, 0.0), DT);
        follower.update(&grid, Vec3::new(1.0, 0.0, 0.0), DT);
        assert_eq!(follower.current_index(), Some(2));
        let motion = follower.update(&grid, Vec3::new(1.99, 0.0, 0.0), DT);
        assert_eq!(follower.state(), FollowerState::AtDestination);
        assert_eq!(motion.signal, MotionSignal::Arrived);
        assert!(motion.translation.x > 0.0);
    }

    #[test]
    fn walks_the_whole_path() {
        let grid = grid_from_rows(&["S11", "11E"]);
        let mut follower = PathFollower::new(MoverSettings::default());
        let path = vec![
            Point::new(0, 0),
            Point::new(1, 0),
            Point::new(2, 0),
            Point::new(2, 1),
        ];
        follower.follow_path(path);
        let mut position = Vec3::new(0.0, 0.5, 0.0);
        let mut ticks = 0;
        while follower.state() != FollowerState::AtDestination {
            let motion = follower.update(&grid, position, DT);
            assert_ne!(motion.signal, MotionSignal::Walking);
            position += motion.translation;
            ticks += 1;
            assert!(ticks < 600, "follower never arrived");
        }
        assert!(position.distance(Vec3::new(2.0, 0.5, 1.0)) < 0.1);
        assert_eq!(follower.velocity(), Vec3::ZERO);
    }

    #[test]
    fn overshoot_counts_as_reached() {
        let grid = straight_grid();
        let mut follower = PathFollower::new(MoverSettings::default());
        follower.follow_path(line());
        follower.update(&grid, Vec3::ZERO, DT);
        follower.update(&grid, Vec3::new(0.5, 0.0, 0.0), DT);
        assert_eq!(follower.current_index(), Some(1));
        follower.update(&grid, Vec3::new(1.6, 0.0, 0.0), DT);
        assert_eq!(follower.current_index(), Some(2));
    }

    #[test]
    fn walks_on_expensive_tiles() {
        let grid = grid_from_rows(&["S", "E"]);
        let settings = MoverSettings {
            max_run_cost: 0,
            ..MoverSettings::default()
        };
        let mut follower = PathFollower::new(settings);
        follower.follow_path(vec![Point::new(0, 0), Point::new(0, 1)]);
        follower.update(&grid, Vec3::ZERO, DT);
        let motion = follower.update(&grid, Vec3::ZERO, DT);
        assert_eq!(motion.signal, MotionSignal::Walking);
        assert!(motion.translation.z > 0.0);
    }

    #[test]
    fn zero_time_changes_nothing() {
        let grid = straight_grid();
        let mut follower = PathFollower::new(MoverSettings::default());
        follower.follow_path(line());
        let before = follower.state();
        let motion = follower.update(&grid, Vec3::ZERO, 0.0);
        assert_eq!(motion.translation, Vec3::ZERO);
        assert_eq!(follower.state(), before);
    }

    #[test]
    fn reset_returns_to_idle_from_any_state() {
        let grid = straight_grid();
        let mut follower = PathFollower::new(MoverSettings::default());
        follower.reset_path();
        assert_eq!(follower.state(), FollowerState::Idle);

        follower.follow_path(line());
        follower.update(&grid, Vec3::ZERO, DT);
        follower.update(&grid, Vec3::ZERO, DT);
        assert!(follower.velocity().length() > 0.0);
        follower.reset_path();
        assert_eq!(follower.state(), FollowerState::Idle);
        assert!(follower.path().is_empty());
        assert_eq!(follower.velocity(), Vec3::ZERO);

        follower.follow_path(vec![Point::new(2, 0)]);
        follower.update(&grid, Vec3::new(2.0, 0.0, 0.0), DT);
        assert_eq!(follower.state(), FollowerState::AtDestination);
        follower.reset_path();
        assert_eq!(follower.state(), FollowerState::Idle);
        assert_eq!(
            follower.update(&grid, Vec3::ZERO, DT).signal,
            MotionSignal::Idle
        );
    }

    #[test]
    fn new_path_restarts_at_first_tile() {
        let grid = straight_grid();
        let mut follower = PathFollower::new(MoverSettings::default());
        follower.follow_path(line());
        follower.update(&grid, Vec3::ZERO, DT);
        assert_eq!(follower.current_index(), Some(1));
        follower.follow_path(line());
        assert_eq!(follower.current_index(), Some(0));
    }

    #[test]
    fn smooth_damp_converges_without_overshoot() {
        let mut velocity = Vec3::ZERO;
        let mut current = Vec3::ZERO;
        let target = Vec3::new(1.0, 0.0, 0.0);
        for _ in 0..120 {
            current = smooth_damp(current, target, &mut velocity, 0.03, DT);
            assert!(current.x <= 1.0);
        }
        assert!((current.x - 1.0).abs() < 1e-3);
    }
}
