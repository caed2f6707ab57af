//! Logic for reading the plane and obstacle meshes out of the world and
//! building a [NavGrid] from them
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Marks the entity whose transform (and mesh if it has one) describes the
/// walkable plane
#[derive(Component, Default, Clone, Copy, Debug, Reflect)]
pub struct NavPlane;

/// Marks a mesh describing a single physical obstacle
#[derive(Component, Default, Clone, Copy, Debug, Reflect)]
pub struct Obstacle;

/// Marks a mesh that may describe several physically separate obstacles,
/// its vertices are clustered before being turned into polygons
#[derive(Component, Default, Clone, Copy, Debug, Reflect)]
pub struct ExceptionalObstacle;

/// Request that every [NavGrid] re-reads its obstacles and is rebuilt, sent
/// after the plane or obstacles have moved
#[derive(Event, Default, Clone, Copy, Debug)]
pub struct EventRebuildGrid;

/// Convert obstacle meshes into [ObstacleSource]s along with the number of
/// meshes that haven't loaded yet. Meshes without positions are reported
pub fn collect_obstacle_sources<'a>(
	obstacles: impl Iterator<Item = (Entity, &'a Mesh3d, &'a GlobalTransform, Option<&'a Name>)>,
	meshes: &Assets<Mesh>,
) -> (Vec<ObstacleSource>, usize) {
	let mut sources = Vec::new();
	let mut pending = 0;
	for (entity, mesh_handle, transform, name) in obstacles {
		let Some(mesh) = meshes.get(&mesh_handle.0) else {
			debug!("Obstacle mesh of {} is not loaded yet", entity);
			pending += 1;
			continue;
		};
		match ObstacleSource::from_mesh(mesh, transform) {
			Some(source) => sources.push(source),
			None => {
				let label = name.map_or_else(|| entity.to_string(), |n| n.as_str().to_string());
				error!("{}", NavError::MissingMeshPositions(label));
			}
		}
	}
	(sources, pending)
}

/// Work out the extent of the plane, from its mesh when it has one loaded and
/// otherwise from the scale of a unit plane
pub fn plane_bounds(
	global: &GlobalTransform,
	local: &Transform,
	mesh: Option<&Mesh3d>,
	meshes: &Assets<Mesh>,
) -> PlaneBounds {
	mesh.and_then(|m| meshes.get(&m.0))
		.and_then(|m| mesh_world_vertices(m, global))
		.and_then(|v| PlaneBounds::from_vertices(&v))
		.unwrap_or_else(|| PlaneBounds::from_transforms(global, local))
}

/// Build each [NavGrid] when it is first spawned, when its [NavSettings]
/// change or when an [EventRebuildGrid] is received.
///
/// A build is deferred while the plane or any obstacle mesh is still loading
/// and retried every tick until they all are available
#[cfg(not(tarpaulin_include))]
#[allow(clippy::type_complexity)]
pub fn rebuild_grid(
	mut events: EventReader<EventRebuildGrid>,
	mut grid_q: Query<(Ref<NavSettings>, &mut ObstacleSet, &mut NavGrid)>,
	plane_q: Query<(&GlobalTransform, &Transform, Option<&Mesh3d>), With<NavPlane>>,
	exceptional_q: Query<
		(Entity, &Mesh3d, &GlobalTransform, Option<&Name>),
		With<ExceptionalObstacle>,
	>,
	simple_q: Query<
		(Entity, &Mesh3d, &GlobalTransform, Option<&Name>),
		(With<Obstacle>, Without<ExceptionalObstacle>),
	>,
	meshes: Res<Assets<Mesh>>,
	mut awaiting_meshes: Local<bool>,
) {
	let requested = events.read().count() > 0 || *awaiting_meshes;
	*awaiting_meshes = false;
	for (settings, mut obstacles, mut grid) in &mut grid_q {
		let forced = requested || settings.is_changed();
		if !forced && !grid.is_empty() {
			continue;
		}
		let Ok((global, local, plane_mesh)) = plane_q.single() else {
			// the plane may not have been spawned yet, keep trying quietly
			if forced {
				warn!("Cannot build a navigation grid without exactly one NavPlane");
			}
			continue;
		};
		if plane_mesh.is_some_and(|m| meshes.get(&m.0).is_none()) {
			debug!("Waiting on the plane mesh before building the grid");
			*awaiting_meshes = true;
			continue;
		}
		if settings.extracts_obstacles() {
			let (exceptional, pending_exceptional) =
				collect_obstacle_sources(exceptional_q.iter(), &meshes);
			let (simple, pending_simple) = collect_obstacle_sources(simple_q.iter(), &meshes);
			if pending_exceptional + pending_simple > 0 {
				debug!(
					"Waiting on {} obstacle meshes before building the grid",
					pending_exceptional + pending_simple
				);
				*awaiting_meshes = true;
				continue;
			}
			*obstacles = match settings.get_extractor().extract(&exceptional, &simple) {
				Ok(set) => set,
				Err(e) => {
					error!("{}", e);
					ObstacleSet::default()
				}
			};
		}
		let bounds = plane_bounds(global, local, plane_mesh, &meshes);
		match NavGrid::new(bounds, settings.get_resolution(), &obstacles) {
			Ok(new_grid) => {
				info!(
					"Navigation grid built, {}x{} cells with {} unwalkable",
					new_grid.get_columns(),
					new_grid.get_rows(),
					new_grid.count_unwalkable()
				);
				*grid = new_grid;
			}
			Err(e) => {
				if forced {
					error!("{}", e);
				}
			}
		}
	}
}
