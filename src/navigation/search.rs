//! A* search across the 8-connected [NavGrid].
//!
//! Both the step cost and the heuristic are the Euclidean distance between
//! cell world positions, the heuristic is therefore admissible and consistent
//! and the returned path is a shortest one.
//!
//! The grid itself is never written to. Everything a search learns (cost so
//! far, heuristic, parent) is held in a [SearchState] that only lives for the
//! duration of one call, so repeated or interleaved searches over the same
//! grid cannot see each other's leftovers.
//!
//! The frontier is a plain list scanned for the lowest `f` cost. When several
//! cells share the lowest cost the one that entered the frontier first wins,
//! which makes the chosen path among equally short ones deterministic.
//!

use bevy::prelude::*;

use crate::prelude::*;

/// Per-cell scratch data for a single search
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct NodeRecord {
	/// Best known cost from the start to this cell
	g_cost: f32,
	/// Estimated cost from this cell to the goal
	h_cost: f32,
	/// Flat index of the predecessor on the best known path
	parent: Option<usize>,
}

impl NodeRecord {
	/// Total estimated cost of a path through this cell
	fn f_cost(&self) -> f32 {
		self.g_cost + self.h_cost
	}
}

/// Scratch space of one search, indexed the same way as the grid cells
#[derive(Debug)]
struct SearchState {
	/// Scratch costs and parents
	records: Vec<NodeRecord>,
	/// Cells waiting to be expanded, in the order they were discovered
	frontier: Vec<usize>,
	/// Membership mask for `frontier`
	in_frontier: Vec<bool>,
	/// Cells that have been expanded
	visited: Vec<bool>,
}

impl SearchState {
	/// Fresh state for a grid of `len` cells
	fn new(len: usize) -> Self {
		SearchState {
			records: vec![NodeRecord::default(); len],
			frontier: Vec::new(),
			in_frontier: vec![false; len],
			visited: vec![false; len],
		}
	}
	/// Add a cell to the back of the frontier
	fn push_frontier(&mut self, index: usize) {
		self.frontier.push(index);
		self.in_frontier[index] = true;
	}
	/// Remove and return the frontier cell with the lowest `f` cost, the
	/// earliest entry wins a tie. The cell is marked as visited
	fn pop_lowest(&mut self) -> Option<usize> {
		if self.frontier.is_empty() {
			return None;
		}
		let mut lowest = 0;
		for i in 1..self.frontier.len() {
			if self.records[self.frontier[i]].f_cost()
				< self.records[self.frontier[lowest]].f_cost()
			{
				lowest = i;
			}
		}
		// order preserving removal, tie-breaks depend on discovery order
		let index = self.frontier.remove(lowest);
		self.in_frontier[index] = false;
		self.visited[index] = true;
		Some(index)
	}
	/// Walk parents back from `goal` and return the indices start-first
	fn reconstruct(&self, goal: usize) -> Vec<usize> {
		let mut path = vec![goal];
		let mut current = goal;
		while let Some(parent) = self.records[current].parent {
			path.push(parent);
			current = parent;
		}
		path.reverse();
		path
	}
}

/// Ordered cells from start to goal inclusive, empty when no path exists
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq, Reflect)]
pub struct NavPath(Vec<GridPosition>);

impl NavPath {
	/// Create a new instance of [NavPath]
	pub fn new(cells: Vec<GridPosition>) -> Self {
		NavPath(cells)
	}
	pub fn get(&self) -> &[GridPosition] {
		&self.0
	}
	pub fn len(&self) -> usize {
		self.0.len()
	}
	/// An empty path means the goal could not be reached, an agent given one
	/// should stay where it is
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
	/// Sum of the Euclidean distances between consecutive cells
	pub fn cost(&self, grid: &NavGrid) -> f32 {
		let positions: Vec<Vec3> = self
			.0
			.iter()
			.filter_map(|p| grid.get_cell_position(*p))
			.collect();
		positions.windows(2).map(|w| w[0].distance(w[1])).sum()
	}
	/// World positions of each cell with `y` replaced by the height an agent
	/// travels at
	pub fn to_waypoints(&self, grid: &NavGrid, height: f32) -> Vec<Vec3> {
		self.0
			.iter()
			.filter_map(|p| grid.get_cell_position(*p))
			.map(|p| Vec3::new(p.x, height, p.z))
			.collect()
	}
}

/// The outcome of a search along with how much work it did
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchReport {
	/// The path found, empty on failure
	path: NavPath,
	/// Number of cells removed from the frontier and expanded
	expanded: usize,
}

impl SearchReport {
	pub fn get_path(&self) -> &NavPath {
		&self.path
	}
	/// Number of cells the search expanded, `0` when the search never ran
	pub fn get_expanded(&self) -> usize {
		self.expanded
	}
	/// Take the path out of the report
	pub fn into_path(self) -> NavPath {
		self.path
	}
}

impl NavGrid {
	/// Find a shortest path between two cells. An empty [NavPath] is returned
	/// when no path exists
	pub fn find_path(&self, start: GridPosition, goal: GridPosition) -> NavPath {
		self.search(start, goal).into_path()
	}
	/// Find a shortest path between two world positions, each is mapped to
	/// its nearest cell with [NavGrid::world_to_grid]
	pub fn find_path_between(&self, start: Vec3, goal: Vec3) -> NavPath {
		if self.is_empty() {
			return NavPath::default();
		}
		self.find_path(self.world_to_grid(start), self.world_to_grid(goal))
	}
	/// Run A* from `start` to `goal` and report the path along with the
	/// number of cells expanded.
	///
	/// The search is refused only when *both* ends are unwalkable. With a
	/// walkable start and an unwalkable goal the search runs until the
	/// frontier is exhausted, with an unwalkable start and a walkable goal it
	/// may still succeed by stepping off the start cell
	pub fn search(&self, start: GridPosition, goal: GridPosition) -> SearchReport {
		let (Some(start_index), Some(goal_index)) = (self.get_index(start), self.get_index(goal))
		else {
			warn!(
				"Search endpoints {:?} -> {:?} lie outside of the grid",
				start, goal
			);
			return SearchReport::default();
		};
		let goal_position = self.get_cell_by_index(goal_index).get_position();
		if !self.get_cell_by_index(start_index).is_walkable()
			&& !self.get_cell_by_index(goal_index).is_walkable()
		{
			info!(
				"No path found due to unwalkable start {:?} and goal {:?}",
				start, goal
			);
			return SearchReport::default();
		}

		let mut state = SearchState::new(self.len());
		state.push_frontier(start_index);
		let mut expanded = 0;

		while let Some(current) = state.pop_lowest() {
			expanded += 1;
			if current == goal_index {
				let path = state
					.reconstruct(goal_index)
					.into_iter()
					.map(|i| self.get_grid_position(i))
					.collect();
				return SearchReport {
					path: NavPath::new(path),
					expanded,
				};
			}
			let current_position = self.get_cell_by_index(current).get_position();
			let current_g = state.records[current].g_cost;
			for neighbour in self.get_all_cell_neighbours(self.get_grid_position(current)) {
				let Some(n) = self.get_index(neighbour) else {
					continue;
				};
				let cell = self.get_cell_by_index(n);
				if !cell.is_walkable() || state.visited[n] {
					continue;
				}
				let tentative_g = current_g + current_position.distance(cell.get_position());
				if tentative_g < state.records[n].g_cost || !state.in_frontier[n] {
					let record = &mut state.records[n];
					record.g_cost = tentative_g;
					record.h_cost = cell.get_position().distance(goal_position);
					record.parent = Some(current);
					if !state.in_frontier[n] {
						state.push_frontier(n);
					}
				}
			}
		}
		debug!("No path found from {:?} to {:?}", start, goal);
		SearchReport {
			path: NavPath::default(),
			expanded,
		}
	}
}
