//! Configuration of a navigation grid and the [Bundle] used to spawn one
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Tunables used when building the grid and moving actors across it
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Component, Clone, Copy, Debug, PartialEq, Reflect)]
pub struct NavSettings {
	/// Edge length of a grid cell
	resolution: f32,
	/// Speed of actors following a path, world units per second
	movement_speed: f32,
	/// Proximity used to split exceptional obstacles into separate objects
	cluster_distance: f32,
	/// Height above the plane actors travel at
	agent_height: f32,
	/// Whether obstacles are extracted from meshes in the world on a rebuild.
	/// Disabled when the [ObstacleSet] was supplied up front
	extract_obstacles: bool,
}

impl Default for NavSettings {
	fn default() -> Self {
		NavSettings {
			resolution: DEFAULT_RESOLUTION,
			movement_speed: DEFAULT_MOVEMENT_SPEED,
			cluster_distance: CLUSTER_DISTANCE,
			agent_height: DEFAULT_AGENT_HEIGHT,
			extract_obstacles: true,
		}
	}
}

impl NavSettings {
	/// Create a new instance of [NavSettings]
	pub fn new(
		resolution: f32,
		movement_speed: f32,
		cluster_distance: f32,
		agent_height: f32,
	) -> Self {
		NavSettings {
			resolution,
			movement_speed,
			cluster_distance,
			agent_height,
			extract_obstacles: true,
		}
	}
	pub fn get_resolution(&self) -> f32 {
		self.resolution
	}
	pub fn get_movement_speed(&self) -> f32 {
		self.movement_speed
	}
	pub fn get_cluster_distance(&self) -> f32 {
		self.cluster_distance
	}
	pub fn get_agent_height(&self) -> f32 {
		self.agent_height
	}
	pub fn extracts_obstacles(&self) -> bool {
		self.extract_obstacles
	}
	/// Toggle reading obstacles from meshes when the grid is rebuilt
	pub fn set_extract_obstacles(&mut self, extract: bool) {
		self.extract_obstacles = extract;
	}
	/// An [ObstacleExtractor] configured with this clustering distance
	pub fn get_extractor(&self) -> ObstacleExtractor {
		ObstacleExtractor::new(self.cluster_distance)
	}
}

/// Everything needed to navigate a single plane. The [NavGrid] starts empty
/// and is built by the plugin once the plane can be found in the world
#[derive(Bundle, Default)]
pub struct NavGridBundle {
	/// Configuration
	settings: NavSettings,
	/// Polygons marking where actors cannot go
	obstacles: ObstacleSet,
	/// Walkable cells of the plane
	grid: NavGrid,
}

impl NavGridBundle {
	/// Create a new instance of [NavGridBundle] whose obstacles will be read
	/// from meshes marked with [Obstacle] or [ExceptionalObstacle]
	pub fn new(settings: NavSettings) -> Self {
		NavGridBundle {
			settings,
			obstacles: ObstacleSet::default(),
			grid: NavGrid::default(),
		}
	}
	/// Create a new instance of [NavGridBundle] with a fixed [ObstacleSet],
	/// obstacle meshes in the world are ignored
	pub fn new_with_obstacles(mut settings: NavSettings, obstacles: ObstacleSet) -> Self {
		settings.set_extract_obstacles(false);
		NavGridBundle {
			settings,
			obstacles,
			grid: NavGrid::default(),
		}
	}
	/// Create a new instance of [NavGridBundle] where the [ObstacleSet] is
	/// derived from disk
	#[cfg(feature = "ron")]
	pub fn new_from_disk(settings: NavSettings, path: &str) -> Result<Self, NavError> {
		let obstacles = ObstacleSet::from_ron(path)?;
		Ok(NavGridBundle::new_with_obstacles(settings, obstacles))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn default_settings() {
		let settings = NavSettings::default();
		assert_eq!(0.5, settings.get_resolution());
		assert_eq!(5.0, settings.get_movement_speed());
		assert_eq!(3.0, settings.get_cluster_distance());
		assert_eq!(0.5, settings.get_agent_height());
		assert!(settings.extracts_obstacles());
		assert_eq!(3.0, settings.get_extractor().get_cluster_distance());
	}
	#[test]
	fn fixed_obstacles_disable_extraction() {
		let obstacles = ObstacleSet::new(vec![ObstaclePolygon::from_points(&[
			Vec3::ZERO,
			Vec3::X,
			Vec3::Z,
		])]);
		let bundle = NavGridBundle::new_with_obstacles(NavSettings::default(), obstacles);
		assert!(!bundle.settings.extracts_obstacles());
		assert_eq!(1, bundle.obstacles.len());
		assert!(bundle.grid.is_empty());
	}
	#[test]
	#[cfg(feature = "ron")]
	fn bundle_from_disk() {
		let path = env!("CARGO_MANIFEST_DIR").to_string() + "/assets/obstacle_set.ron";
		let bundle = NavGridBundle::new_from_disk(NavSettings::default(), &path).unwrap();
		assert_eq!(2, bundle.obstacles.len());
		assert!(!bundle.settings.extracts_obstacles());
	}
}
