//! Logic for answering destination requests with paths and moving
//! [Navigator] actors along them
//!

use crate::prelude::*;
use bevy::prelude::*;

/// An actor that travels between named markers in the world
#[derive(Component, Clone, Debug, Default, Reflect)]
pub struct Navigator {
	/// [Name] of the marker every path starts from, when [None] the actor's
	/// own position is used
	start: Option<String>,
	/// [Name]s of the markers the actor can be sent to
	destinations: Vec<String>,
	/// Index into `destinations` of the current goal
	destination_index: usize,
	/// On arrival request a path to the next destination, wrapping around
	cycle: bool,
	/// A path to the first destination is still to be requested, cleared once
	/// the request has been sent
	auto_start: bool,
	/// Progress along the current path
	follower: PathFollower,
}

impl Navigator {
	/// Create a new instance of [Navigator] that can travel to the named
	/// destinations, starting from wherever it is
	pub fn new(destinations: Vec<String>) -> Self {
		Navigator {
			start: None,
			destinations,
			destination_index: 0,
			cycle: false,
			auto_start: false,
			follower: PathFollower::default(),
		}
	}
	/// Begin every path from the named marker
	pub fn with_start(mut self, start: &str) -> Self {
		self.start = Some(start.to_string());
		self
	}
	/// Keep travelling between destinations in turn
	pub fn with_cycle(mut self, cycle: bool) -> Self {
		self.cycle = cycle;
		self
	}
	/// Head for the first destination without waiting for an
	/// [EventSetDestination]
	pub fn with_auto_start(mut self, auto_start: bool) -> Self {
		self.auto_start = auto_start;
		self
	}
	pub fn get_start(&self) -> Option<&str> {
		self.start.as_deref()
	}
	pub fn get_destinations(&self) -> &[String] {
		&self.destinations
	}
	pub fn get_destination_index(&self) -> usize {
		self.destination_index
	}
	/// Name of the current destination
	pub fn get_destination(&self) -> Option<&str> {
		self.destinations
			.get(self.destination_index)
			.map(|s| s.as_str())
	}
	pub fn is_cycling(&self) -> bool {
		self.cycle
	}
	/// Whether the first destination will be requested once a grid is built
	pub fn is_auto_starting(&self) -> bool {
		self.auto_start
	}
	pub fn get_follower(&self) -> &PathFollower {
		&self.follower
	}
	pub fn get_follower_mut(&mut self) -> &mut PathFollower {
		&mut self.follower
	}
	/// The destination after the current one, wrapping to the first
	pub fn next_destination_index(&self) -> usize {
		if self.destinations.is_empty() {
			0
		} else {
			(self.destination_index + 1) % self.destinations.len()
		}
	}
}

/// Send a [Navigator] towards one of its destinations
#[derive(Event, Clone, Copy, Debug)]
pub struct EventSetDestination {
	/// The actor to move
	agent: Entity,
	/// Index into the actor's destinations
	index: usize,
}

impl EventSetDestination {
	/// Create a new instance of [EventSetDestination]
	pub fn new(agent: Entity, index: usize) -> Self {
		EventSetDestination { agent, index }
	}
	pub fn get_agent(&self) -> Entity {
		self.agent
	}
	pub fn get_index(&self) -> usize {
		self.index
	}
}

/// Find the world position of the entity carrying `name`
fn find_marker<'a>(
	mut markers: impl Iterator<Item = (&'a Name, &'a GlobalTransform)>,
	name: &str,
) -> Option<Vec3> {
	markers
		.find(|(n, _)| n.as_str() == name)
		.map(|(_, t)| t.translation())
}

/// Search the grid between the start and goal world positions and turn the
/// result into waypoints at the agent's height. Empty when there is no path
pub fn plan_waypoints(grid: &NavGrid, start: Vec3, goal: Vec3, height: f32) -> Vec<Vec3> {
	let path = grid.find_path_between(start, goal);
	if path.is_empty() {
		return Vec::new();
	}
	debug!(
		"Path of {} cells with length {}",
		path.len(),
		path.cost(grid)
	);
	path.to_waypoints(grid, height)
}

/// Send [Navigator]s that auto start towards their first destination once a
/// grid has been built to search across
#[cfg(not(tarpaulin_include))]
pub fn start_navigators(
	mut navigator_q: Query<(Entity, &mut Navigator)>,
	grid_q: Query<&NavGrid>,
	mut event_destination: EventWriter<EventSetDestination>,
) {
	if !grid_q.iter().any(|g| !g.is_empty()) {
		return;
	}
	for (entity, mut navigator) in &mut navigator_q {
		if navigator.auto_start && !navigator.destinations.is_empty() {
			navigator.auto_start = false;
			event_destination.write(EventSetDestination::new(entity, 0));
		}
	}
}

/// Read [EventSetDestination]s, search for a path to the requested marker
/// and hand the waypoints to the [Navigator]
#[cfg(not(tarpaulin_include))]
pub fn process_destination_requests(
	mut events: EventReader<EventSetDestination>,
	mut navigator_q: Query<(&mut Navigator, &GlobalTransform)>,
	marker_q: Query<(&Name, &GlobalTransform)>,
	grid_q: Query<(&NavGrid, &NavSettings)>,
) {
	for event in events.read() {
		let Ok((grid, settings)) = grid_q.single() else {
			warn!("Destination requested without exactly one navigation grid");
			continue;
		};
		if grid.is_empty() {
			warn!("Destination requested before the navigation grid was built");
			continue;
		}
		let Ok((mut navigator, agent_transform)) = navigator_q.get_mut(event.get_agent()) else {
			warn!("Entity {} is not a Navigator", event.get_agent());
			continue;
		};
		let Some(goal_name) = navigator.get_destinations().get(event.get_index()).cloned() else {
			warn!(
				"Destination index {} out of range, {} has {} destinations",
				event.get_index(),
				event.get_agent(),
				navigator.get_destinations().len()
			);
			continue;
		};
		let Some(goal) = find_marker(marker_q.iter(), &goal_name) else {
			warn!("No marker named {} to travel to", goal_name);
			continue;
		};
		let start = match navigator.get_start() {
			Some(start_name) => match find_marker(marker_q.iter(), start_name) {
				Some(position) => position,
				None => {
					warn!("No marker named {} to start from", start_name);
					continue;
				}
			},
			None => agent_transform.translation(),
		};
		navigator.destination_index = event.get_index();
		let waypoints = plan_waypoints(grid, start, goal, settings.get_agent_height());
		if waypoints.is_empty() {
			info!("No path to {}, staying put", goal_name);
		} else {
			info!("Travelling to {} via {} waypoints", goal_name, waypoints.len());
		}
		let follower = navigator.get_follower_mut();
		follower.set_speed(settings.get_movement_speed());
		follower.set_path(waypoints);
	}
}

/// Step every [Navigator] along its path and, for those that cycle, request
/// the next destination on arrival
#[cfg(not(tarpaulin_include))]
pub fn advance_navigators(
	time: Res<Time>,
	mut navigator_q: Query<(Entity, &mut Navigator, &mut Transform)>,
	mut event_destination: EventWriter<EventSetDestination>,
) {
	let dt = time.delta_secs();
	for (entity, mut navigator, mut transform) in &mut navigator_q {
		match navigator.get_follower_mut().advance(transform.translation, dt) {
			FollowerStep::Idle | FollowerStep::Advanced(_) => {}
			FollowerStep::Move(displacement) => transform.translation += displacement,
			FollowerStep::Arrived => {
				debug!("{} arrived", entity);
				navigator.get_follower_mut().clear();
				if navigator.is_cycling() {
					let next = navigator.next_destination_index();
					event_destination.write(EventSetDestination::new(entity, next));
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn next_destination_wraps() {
		let mut navigator = Navigator::new(vec!["a".to_string(), "b".to_string()]);
		assert_eq!(1, navigator.next_destination_index());
		navigator.destination_index = 1;
		assert_eq!(0, navigator.next_destination_index());
		assert_eq!(Some("b"), navigator.get_destination());
		let empty = Navigator::new(vec![]);
		assert_eq!(0, empty.next_destination_index());
		assert_eq!(None, empty.get_destination());
	}
	#[test]
	fn builder_options() {
		let navigator = Navigator::new(vec!["end".to_string()])
			.with_start("start")
			.with_cycle(true)
			.with_auto_start(true);
		assert_eq!(Some("start"), navigator.get_start());
		assert!(navigator.is_cycling());
		assert!(navigator.is_auto_starting());
		assert!(!Navigator::new(vec![]).is_auto_starting());
		assert!(navigator.get_follower().get_waypoints().is_empty());
	}
	#[test]
	fn marker_lookup() {
		let a = (Name::new("a"), GlobalTransform::from_xyz(1.0, 0.0, 0.0));
		let b = (Name::new("b"), GlobalTransform::from_xyz(0.0, 0.0, 2.0));
		let markers = vec![(&a.0, &a.1), (&b.0, &b.1)];
		assert_eq!(
			Some(Vec3::new(0.0, 0.0, 2.0)),
			find_marker(markers.clone().into_iter(), "b")
		);
		assert_eq!(None, find_marker(markers.into_iter(), "c"));
	}
	#[test]
	fn waypoints_at_agent_height() {
		let grid = NavGrid::new(
			PlaneBounds::new(Vec3::ZERO, 10.0, 10.0),
			1.0,
			&ObstacleSet::default(),
		)
		.unwrap();
		let waypoints = plan_waypoints(
			&grid,
			Vec3::new(-5.0, 0.0, -5.0),
			Vec3::new(-5.0, 0.0, -1.0),
			0.5,
		);
		assert_eq!(5, waypoints.len());
		assert!(waypoints.iter().all(|w| w.y == 0.5));
		assert_eq!(Vec3::new(-5.0, 0.5, -1.0), waypoints[4]);
	}
}
