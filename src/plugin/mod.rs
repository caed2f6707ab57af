//! Defines the Bevy [Plugin] for navigation grids
//!

use crate::prelude::*;
use bevy::prelude::*;

pub mod grid_layer;
pub mod path_layer;

/// Stages of the navigation systems within a tick
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum OrderingSet {
	/// (Re)build grids from the plane and obstacles
	Build,
	/// Answer destination requests with paths
	Search,
	/// Move actors along their paths
	Follow,
}

/// Builds navigation grids and moves [Navigator] actors across them
pub struct NavGridPlugin;

impl Plugin for NavGridPlugin {
	#[cfg(not(tarpaulin_include))]
	fn build(&self, app: &mut App) {
		app.register_type::<NavSettings>()
			.register_type::<NavGrid>()
			.register_type::<GridPosition>()
			.register_type::<GridCell>()
			.register_type::<PlaneBounds>()
			.register_type::<ObstacleSet>()
			.register_type::<ObstaclePolygon>()
			.register_type::<NavPath>()
			.register_type::<PathFollower>()
			.register_type::<Navigator>()
			.register_type::<NavPlane>()
			.register_type::<Obstacle>()
			.register_type::<ExceptionalObstacle>()
			.add_event::<grid_layer::EventRebuildGrid>()
			.add_event::<path_layer::EventSetDestination>()
			.configure_sets(
				Update,
				(OrderingSet::Build, OrderingSet::Search, OrderingSet::Follow).chain(),
			)
			.add_systems(
				Update,
				(
					(grid_layer::rebuild_grid, path_layer::start_navigators)
						.chain()
						.in_set(OrderingSet::Build),
					path_layer::process_destination_requests.in_set(OrderingSet::Search),
					path_layer::advance_navigators.in_set(OrderingSet::Follow),
				),
			);
	}
}
