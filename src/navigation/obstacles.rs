//! Obstacles placed on the navigation plane are described by their mesh
//! vertices in world space. Each is reduced to a convex [ObstaclePolygon] which the
//! [crate::prelude::NavGrid] uses to decide which cells cannot be walked.
//!
//! There are two kinds of obstacle source:
//!
//! * Simple - the vertices describe a single physical object and are hulled
//! directly
//! * Exceptional - the vertices may describe several physically separate
//! objects (a single mesh holding a row of crates for instance). The vertices
//! are first grouped by proximity and each group is hulled on its own so that
//! the walkable gaps between the objects survive
//!
//! ```text
//!  exceptional mesh            simple mesh
//!   _     _     _                _______
//!  |_|   |_|   |_|              |       |
//!                               |_______|
//!   3 polygons                  1 polygon
//! ```
//!

use bevy::prelude::*;

use crate::prelude::*;

/// World space vertices of a single obstacle object
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObstacleSource {
	/// Vertex positions in world space
	vertices: Vec<Vec3>,
}

impl ObstacleSource {
	/// Create a new instance of [ObstacleSource] from world space vertices
	pub fn new(vertices: Vec<Vec3>) -> Self {
		ObstacleSource { vertices }
	}
	/// Create a new instance of [ObstacleSource] from a mesh placed in the
	/// world by `transform`. Returns [None] if the mesh has no readable
	/// positions
	pub fn from_mesh(mesh: &Mesh, transform: &GlobalTransform) -> Option<Self> {
		mesh_world_vertices(mesh, transform).map(ObstacleSource::new)
	}
	pub fn get_vertices(&self) -> &[Vec3] {
		&self.vertices
	}
}

/// Read the vertex positions of a mesh and move them into world space with
/// the supplied transform. Returns [None] when the mesh lacks a
/// [Mesh::ATTRIBUTE_POSITION] attribute made of `[f32; 3]`
pub fn mesh_world_vertices(mesh: &Mesh, transform: &GlobalTransform) -> Option<Vec<Vec3>> {
	let positions = mesh.attribute(Mesh::ATTRIBUTE_POSITION)?.as_float3()?;
	Some(
		positions
			.iter()
			.map(|p| transform.transform_point(Vec3::from_array(*p)))
			.collect(),
	)
}

/// Greedily split a vertex cloud into clusters. Each vertex joins the first
/// cluster (in creation order) whose *first* vertex is within `max_distance`
/// of it, otherwise it starts a new cluster.
///
/// This is order dependent and is not a true single-link clustering, two
/// vertices of the same object can end up apart if the object is wider than
/// `max_distance` from its first seen vertex
pub fn group_vertices_by_distance(vertices: &[Vec3], max_distance: f32) -> Vec<Vec<Vec3>> {
	let mut clusters: Vec<Vec<Vec3>> = Vec::new();
	for vertex in vertices.iter() {
		let existing = clusters
			.iter_mut()
			.find(|c| c.first().is_some_and(|first| first.distance(*vertex) <= max_distance));
		match existing {
			Some(cluster) => cluster.push(*vertex),
			None => clusters.push(vec![*vertex]),
		}
	}
	clusters
}

/// The complete set of obstacle polygons for a plane layout
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Component, Clone, Debug, Default, PartialEq, Reflect)]
pub struct ObstacleSet {
	/// Polygons that cells are tested against
	polygons: Vec<ObstaclePolygon>,
}

impl ObstacleSet {
	/// Create a new instance of [ObstacleSet]
	pub fn new(polygons: Vec<ObstaclePolygon>) -> Self {
		ObstacleSet { polygons }
	}
	pub fn get(&self) -> &[ObstaclePolygon] {
		&self.polygons
	}
	pub fn len(&self) -> usize {
		self.polygons.len()
	}
	pub fn is_empty(&self) -> bool {
		self.polygons.is_empty()
	}
	/// Whether `point` falls inside any of the polygons
	pub fn contains_point(&self, point: Vec3) -> bool {
		self.polygons.iter().any(|p| p.contains_point(point))
	}
	/// From a `ron` file generate the [ObstacleSet]
	#[cfg(feature = "ron")]
	pub fn from_ron(path: &str) -> Result<Self, NavError> {
		let file = std::fs::File::open(path)?;
		let set: ObstacleSet = ron::de::from_reader(file)?;
		Ok(set)
	}
}

/// Turns [ObstacleSource]s into an [ObstacleSet]
#[derive(Clone, Copy, Debug)]
pub struct ObstacleExtractor {
	/// Vertices of an exceptional source closer than this to the first vertex
	/// of a cluster are considered part of the same physical obstacle
	cluster_distance: f32,
}

impl Default for ObstacleExtractor {
	fn default() -> Self {
		ObstacleExtractor {
			cluster_distance: CLUSTER_DISTANCE,
		}
	}
}

impl ObstacleExtractor {
	/// Create a new instance of [ObstacleExtractor] with a custom clustering
	/// distance
	pub fn new(cluster_distance: f32) -> Self {
		ObstacleExtractor { cluster_distance }
	}
	pub fn get_cluster_distance(&self) -> f32 {
		self.cluster_distance
	}
	/// Hull every source into polygons. Exceptional sources are clustered
	/// first and contribute one polygon per cluster, simple sources contribute
	/// exactly one polygon each. Exceptional polygons come first in the set.
	///
	/// An empty `exceptional` collection is treated as a misconfigured scene
	/// and produces [NavError::NoExceptionalObstacles]
	pub fn extract(
		&self,
		exceptional: &[ObstacleSource],
		simple: &[ObstacleSource],
	) -> Result<ObstacleSet, NavError> {
		if exceptional.is_empty() {
			return Err(NavError::NoExceptionalObstacles);
		}
		let mut polygons = Vec::new();
		for source in exceptional.iter() {
			let clusters = group_vertices_by_distance(source.get_vertices(), self.cluster_distance);
			for cluster in clusters.iter().filter(|c| !c.is_empty()) {
				polygons.push(ObstaclePolygon::from_points(cluster));
			}
		}
		for source in simple.iter() {
			polygons.push(ObstaclePolygon::from_points(source.get_vertices()));
		}
		debug!("Extracted {} obstacle polygons", polygons.len());
		Ok(ObstacleSet::new(polygons))
	}
}
