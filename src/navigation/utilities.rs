//! Useful constants and tools shared by the navigation types
//!

/// Default edge length of a grid cell in world units
pub const DEFAULT_RESOLUTION: f32 = 0.5;
/// Default speed of an agent in world units per second
pub const DEFAULT_MOVEMENT_SPEED: f32 = 5.0;
/// Vertices of an exceptional obstacle within this distance of the first
/// vertex of a cluster are grouped into that cluster
pub const CLUSTER_DISTANCE: f32 = 3.0;
/// An agent closer than this to its current waypoint has reached it
pub const WAYPOINT_EPSILON: f32 = 0.001;
/// Height above the plane that agents travel at
pub const DEFAULT_AGENT_HEIGHT: f32 = 0.5;

/// The 8 `(column, row)` offsets of a cell's neighbours. Columns vary in the
/// outer loop and rows in the inner loop, the order is part of the search's
/// tie-breaking so must not be rearranged
pub const NEIGHBOUR_OFFSETS: [(i32, i32); 8] = [
	(-1, -1),
	(-1, 0),
	(-1, 1),
	(0, -1),
	(0, 1),
	(1, -1),
	(1, 0),
	(1, 1),
];

#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn neighbour_offsets_exclude_self() {
		assert!(!NEIGHBOUR_OFFSETS.contains(&(0, 0)));
		for i in 0..NEIGHBOUR_OFFSETS.len() {
			for j in (i + 1)..NEIGHBOUR_OFFSETS.len() {
				assert_ne!(NEIGHBOUR_OFFSETS[i], NEIGHBOUR_OFFSETS[j]);
			}
		}
	}
}
