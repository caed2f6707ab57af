//! Drive the whole pipeline, from obstacle vertices to an actor arriving at
//! its goal, across a handful of layouts
//!

use bevy::prelude::*;
use bevy_navgrid_astar_plugin::prelude::*;

/// Corners of a box footprint centred on `(x, z)`, top and bottom faces
fn box_vertices(x: f32, z: f32, half_x: f32, half_z: f32) -> Vec<Vec3> {
	let mut vertices = Vec::new();
	for y in [0.0, 1.0] {
		vertices.push(Vec3::new(x - half_x, y, z - half_z));
		vertices.push(Vec3::new(x + half_x, y, z - half_z));
		vertices.push(Vec3::new(x + half_x, y, z + half_z));
		vertices.push(Vec3::new(x - half_x, y, z + half_z));
	}
	vertices
}

/// Walk a follower until it arrives, returning the final position
fn walk(mut follower: PathFollower, mut position: Vec3) -> Vec3 {
	for _ in 0..10_000 {
		match follower.advance(position, 1.0 / 30.0) {
			FollowerStep::Move(d) => position += d,
			FollowerStep::Advanced(_) => {}
			FollowerStep::Arrived | FollowerStep::Idle => break,
		}
	}
	position
}

#[test]
fn open_plane_diagonal() {
	let grid = NavGrid::new(
		PlaneBounds::new(Vec3::ZERO, 10.0, 10.0),
		1.0,
		&ObstacleSet::default(),
	)
	.unwrap();
	let goal = GridPosition::new(9, 9);
	let path = grid.find_path(GridPosition::new(0, 0), goal);
	assert_eq!(10, path.len());
	let goal_world = grid.get_cell_position(goal).unwrap();
	let mut previous = f32::MAX;
	for cell in path.get() {
		let distance = grid.get_cell_position(*cell).unwrap().distance(goal_world);
		assert!(distance < previous);
		previous = distance;
	}
}

#[test]
fn wall_across_columns_is_avoided() {
	// a box covering columns 4 and 5 on every row except the last two
	let simple = vec![ObstacleSource::new(box_vertices(-0.5, -1.8, 0.9, 4.2))];
	// exceptional sources are mandatory, place one out of the way
	let exceptional = vec![ObstacleSource::new(box_vertices(20.0, 20.0, 0.5, 0.5))];
	let obstacles = ObstacleExtractor::default()
		.extract(&exceptional, &simple)
		.unwrap();
	let grid = NavGrid::new(PlaneBounds::new(Vec3::ZERO, 10.0, 10.0), 1.0, &obstacles).unwrap();
	for row in 0..8 {
		assert!(!grid.is_walkable(GridPosition::new(4, row)));
		assert!(!grid.is_walkable(GridPosition::new(5, row)));
	}
	let path = grid.find_path(GridPosition::new(0, 0), GridPosition::new(9, 0));
	assert!(!path.is_empty());
	for cell in path.get() {
		assert!(grid.is_walkable(*cell));
	}
	let waypoints = path.to_waypoints(&grid, 0.5);
	let end = walk(
		{
			let mut f = PathFollower::new(5.0);
			f.set_path(waypoints.clone());
			f
		},
		waypoints[0],
	);
	assert!(end.distance(Vec3::new(4.0, 0.5, -5.0)) <= WAYPOINT_EPSILON);
}

#[test]
fn separated_crates_leave_a_gap() {
	// one mesh holding two crates whose nearest vertices are 5 units apart
	let mut vertices = box_vertices(-3.0, 0.0, 0.5, 1.0);
	vertices.extend(box_vertices(3.0, 0.0, 0.5, 1.0));
	let exceptional = vec![ObstacleSource::new(vertices)];
	let obstacles = ObstacleExtractor::default()
		.extract(&exceptional, &[])
		.unwrap();
	assert_eq!(2, obstacles.len());
	let grid = NavGrid::new(PlaneBounds::new(Vec3::ZERO, 10.0, 10.0), 1.0, &obstacles).unwrap();
	assert!(!grid.is_walkable(GridPosition::new(2, 5)));
	assert!(!grid.is_walkable(GridPosition::new(8, 5)));
	// the corridor between the crates is open
	let path = grid.find_path_between(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 4.0));
	assert_eq!(10, path.len());
	assert!(path.get().iter().all(|c| c.get_column() == 5));
}

#[test]
fn enclosed_goal_has_no_path() {
	// two thin walls seal off the far corner cell
	let exceptional = vec![ObstacleSource::new(box_vertices(20.0, 20.0, 0.5, 0.5))];
	let simple = vec![
		ObstacleSource::new(box_vertices(3.0, 3.7, 0.2, 0.9)),
		ObstacleSource::new(box_vertices(3.7, 3.0, 0.9, 0.2)),
	];
	let obstacles = ObstacleExtractor::default()
		.extract(&exceptional, &simple)
		.unwrap();
	let grid = NavGrid::new(PlaneBounds::new(Vec3::ZERO, 10.0, 10.0), 1.0, &obstacles).unwrap();
	let goal = GridPosition::new(9, 9);
	assert!(grid.is_walkable(goal));
	assert!(!grid.is_walkable(GridPosition::new(8, 8)));
	assert!(!grid.is_walkable(GridPosition::new(8, 9)));
	assert!(!grid.is_walkable(GridPosition::new(9, 8)));
	let path = grid.find_path(GridPosition::new(0, 0), goal);
	assert!(path.is_empty());
	// an agent handed an empty path stays put
	let mut follower = PathFollower::default();
	follower.set_path(path.to_waypoints(&grid, 0.5));
	assert_eq!(FollowerStep::Idle, follower.advance(Vec3::ZERO, 1.0));
}

#[cfg(feature = "ron")]
#[test]
fn layout_from_disk() {
	let path = env!("CARGO_MANIFEST_DIR").to_string() + "/assets/obstacle_set.ron";
	let obstacles = ObstacleSet::from_ron(&path).unwrap();
	let grid = NavGrid::new(PlaneBounds::new(Vec3::ZERO, 10.0, 10.0), 0.5, &obstacles).unwrap();
	assert!(grid.count_unwalkable() > 0);
	let path = grid.find_path_between(Vec3::new(-4.0, 0.0, -4.0), Vec3::new(4.0, 0.0, 4.0));
	assert!(!path.is_empty());
	for cell in path.get() {
		assert!(grid.is_walkable(*cell));
	}
}
