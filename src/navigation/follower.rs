//! Steps an agent along a sequence of world space waypoints.
//!
//! Each tick the follower does exactly one thing:
//!
//! * further than [WAYPOINT_EPSILON] from the current waypoint - move towards
//! it by `min(speed * dt, remaining)`
//! * at the waypoint and it is not the last one - advance to the next
//! waypoint without moving
//! * at the last waypoint - report arrival
//!
//! There is no collision response, the caller applies the returned
//! displacement however it sees fit.
//!

use bevy::prelude::*;

use crate::prelude::*;

/// What the agent should do as a result of a tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FollowerStep {
	/// There is nothing to follow
	Idle,
	/// Translate the agent by this displacement
	Move(Vec3),
	/// The waypoint at the old index was reached, the index now points at
	/// the contained value
	Advanced(usize),
	/// The final waypoint has been reached
	Arrived,
}

/// Tracks progress along a set of waypoints
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Reflect)]
pub struct PathFollower {
	/// World positions to visit in order
	waypoints: Vec<Vec3>,
	/// Index of the waypoint currently being approached
	index: usize,
	/// Maximum distance travelled per second
	speed: f32,
}

impl Default for PathFollower {
	fn default() -> Self {
		PathFollower::new(DEFAULT_MOVEMENT_SPEED)
	}
}

impl PathFollower {
	/// Create a new instance of [PathFollower] with no waypoints
	pub fn new(speed: f32) -> Self {
		PathFollower {
			waypoints: Vec::new(),
			index: 0,
			speed,
		}
	}
	/// Replace the waypoints and start from the first of them
	pub fn set_path(&mut self, waypoints: Vec<Vec3>) {
		self.waypoints = waypoints;
		self.index = 0;
	}
	/// Drop all waypoints
	pub fn clear(&mut self) {
		self.set_path(Vec::new());
	}
	pub fn get_waypoints(&self) -> &[Vec3] {
		&self.waypoints
	}
	pub fn get_index(&self) -> usize {
		self.index
	}
	pub fn get_speed(&self) -> f32 {
		self.speed
	}
	pub fn set_speed(&mut self, speed: f32) {
		self.speed = speed;
	}
	/// The waypoint being approached, [None] without a path
	pub fn current_waypoint(&self) -> Option<Vec3> {
		self.waypoints.get(self.index).copied()
	}
	/// Work out the next step for an agent at `position` after `dt` seconds
	pub fn advance(&mut self, position: Vec3, dt: f32) -> FollowerStep {
		let Some(target) = self.current_waypoint() else {
			return FollowerStep::Idle;
		};
		let offset = target - position;
		let remaining = offset.length();
		if remaining > WAYPOINT_EPSILON {
			let step = (self.speed * dt).min(remaining);
			FollowerStep::Move(offset / remaining * step)
		} else if self.index + 1 < self.waypoints.len() {
			self.index += 1;
			FollowerStep::Advanced(self.index)
		} else {
			FollowerStep::Arrived
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn idle_without_path() {
		let mut follower = PathFollower::default();
		assert_eq!(FollowerStep::Idle, follower.advance(Vec3::ZERO, 0.1));
		assert_eq!(None, follower.current_waypoint());
	}
	#[test]
	fn step_is_capped_by_speed() {
		let mut follower = PathFollower::new(5.0);
		follower.set_path(vec![Vec3::new(10.0, 0.0, 0.0)]);
		let step = follower.advance(Vec3::ZERO, 0.1);
		let FollowerStep::Move(displacement) = step else {
			panic!("Expected a move, got {:?}", step);
		};
		assert!((displacement - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-5);
	}
	#[test]
	fn step_never_overshoots() {
		let mut follower = PathFollower::new(5.0);
		follower.set_path(vec![Vec3::new(0.0, 0.0, 0.2)]);
		let step = follower.advance(Vec3::ZERO, 1.0);
		let FollowerStep::Move(displacement) = step else {
			panic!("Expected a move, got {:?}", step);
		};
		assert!((displacement - Vec3::new(0.0, 0.0, 0.2)).length() < 1e-5);
	}
	#[test]
	fn within_epsilon_advances() {
		let mut follower = PathFollower::new(5.0);
		follower.set_path(vec![Vec3::ZERO, Vec3::X]);
		let step = follower.advance(Vec3::new(0.0005, 0.0, 0.0), 0.1);
		assert_eq!(FollowerStep::Advanced(1), step);
		assert_eq!(Some(Vec3::X), follower.current_waypoint());
	}
	#[test]
	fn final_waypoint_arrives() {
		let mut follower = PathFollower::new(5.0);
		follower.set_path(vec![Vec3::ZERO]);
		assert_eq!(FollowerStep::Arrived, follower.advance(Vec3::ZERO, 0.1));
		// stays arrived
		assert_eq!(FollowerStep::Arrived, follower.advance(Vec3::ZERO, 0.1));
		assert_eq!(0, follower.get_index());
	}
	#[test]
	fn walks_whole_path() {
		let waypoints = vec![
			Vec3::new(0.0, 0.5, 0.0),
			Vec3::new(1.0, 0.5, 0.0),
			Vec3::new(2.0, 0.5, 1.0),
		];
		let mut follower = PathFollower::new(5.0);
		follower.set_path(waypoints.clone());
		let mut position = Vec3::new(-1.0, 0.5, 0.0);
		let mut arrived = false;
		for _ in 0..100 {
			match follower.advance(position, 1.0 / 60.0) {
				FollowerStep::Move(d) => position += d,
				FollowerStep::Advanced(_) => {}
				FollowerStep::Arrived => {
					arrived = true;
					break;
				}
				FollowerStep::Idle => panic!("Follower lost its path"),
			}
		}
		assert!(arrived);
		assert!(position.distance(waypoints[2]) <= WAYPOINT_EPSILON);
		assert_eq!(2, follower.get_index());
	}
	#[test]
	fn set_path_resets_index() {
		let mut follower = PathFollower::new(5.0);
		follower.set_path(vec![Vec3::ZERO, Vec3::X]);
		follower.advance(Vec3::ZERO, 0.1);
		assert_eq!(1, follower.get_index());
		follower.set_path(vec![Vec3::Z]);
		assert_eq!(0, follower.get_index());
		follower.clear();
		assert!(follower.get_waypoints().is_empty());
		assert_eq!(FollowerStep::Idle, follower.advance(Vec3::ZERO, 0.1));
	}
}
