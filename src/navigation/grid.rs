//! The [NavGrid] rasterises a rectangular plane into square cells of a fixed
//! `resolution`. Each cell records its world position and whether an agent
//! may stand on it.
//!
//! Cells are indexed by `(column, row)` where columns run along the `x` axis
//! and rows along the `z` axis, starting from the `(-x, -z)` corner of the
//! plane:
//!
//! ```text
//!  (-x, -z)
//!     _____________________________
//!    |0,0|1,0|2,0|__|__|__|__|__|__|
//!    |0,1|1,1|__|__|__|__|__|__|__|
//!    |0,2|__|__|__|__|__|__|__|__|__|  ---> +x
//!    |__|__|__|__|__|__|__|__|__|__|
//!    |__|__|__|__|__|__|__|__|__|__|
//!                 |
//!                 v +z
//! ```
//!
//! A cell is unwalkable when any of five sample points (its four corners and
//! its centre) falls inside any obstacle polygon. This is a conservative
//! approximation of overlap, thin obstacles that slip between the samples of
//! a coarse grid are not detected.
//!

use bevy::prelude::*;

use crate::prelude::*;

/// ID of a cell within the grid
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Reflect)]
pub struct GridPosition((usize, usize));

impl GridPosition {
	/// Create a new instance of [GridPosition]
	pub fn new(column: usize, row: usize) -> Self {
		GridPosition((column, row))
	}
	/// Get the `(column, row)` tuple
	pub fn get_column_row(&self) -> (usize, usize) {
		self.0
	}
	/// Get the column, the `x` axis index
	pub fn get_column(&self) -> usize {
		self.0 .0
	}
	/// Get the row, the `z` axis index
	pub fn get_row(&self) -> usize {
		self.0 .1
	}
}

/// The world placement and extent of the navigation plane
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Reflect)]
pub struct PlaneBounds {
	/// Centre of the plane in world space
	position: Vec3,
	/// Extent along `x`
	width: f32,
	/// Extent along `z`
	depth: f32,
}

impl PlaneBounds {
	/// Create a new instance of [PlaneBounds]
	pub fn new(position: Vec3, width: f32, depth: f32) -> Self {
		PlaneBounds {
			position,
			width,
			depth,
		}
	}
	/// A unit plane mesh scaled in the world, the position is taken from the
	/// global transform and the extents from the local `x` and `z` scale
	pub fn from_transforms(global: &GlobalTransform, local: &Transform) -> Self {
		PlaneBounds::new(global.translation(), local.scale.x, local.scale.z)
	}
	/// The `x-z` bounding rectangle of a plane mesh's world space vertices.
	/// The position takes the lowest `y` found. [None] without vertices
	pub fn from_vertices(vertices: &[Vec3]) -> Option<Self> {
		let first = vertices.first()?;
		let (min, max) = vertices
			.iter()
			.fold((*first, *first), |(min, max), v| (min.min(*v), max.max(*v)));
		let position = Vec3::new((min.x + max.x) / 2.0, min.y, (min.z + max.z) / 2.0);
		Some(PlaneBounds::new(position, max.x - min.x, max.z - min.z))
	}
	pub fn get_position(&self) -> Vec3 {
		self.position
	}
	pub fn get_width(&self) -> f32 {
		self.width
	}
	pub fn get_depth(&self) -> f32 {
		self.depth
	}
	/// Offset that moves a world `x` into the plane's own space where `0` is
	/// the `-x` edge
	fn get_offset_x(&self) -> f32 {
		self.width / 2.0 - self.position.x
	}
	/// Offset that moves a world `z` into the plane's own space where `0` is
	/// the `-z` edge
	fn get_offset_z(&self) -> f32 {
		self.depth / 2.0 - self.position.z
	}
}

/// A single rasterised unit of the grid
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Reflect)]
pub struct GridCell {
	/// World position of the cell
	position: Vec3,
	/// Whether an agent may occupy the cell, fixed when the grid is built
	walkable: bool,
}

impl GridCell {
	/// Create a new instance of [GridCell]
	pub fn new(position: Vec3, walkable: bool) -> Self {
		GridCell { position, walkable }
	}
	pub fn get_position(&self) -> Vec3 {
		self.position
	}
	pub fn is_walkable(&self) -> bool {
		self.walkable
	}
}

/// Uniform grid of cells covering a plane. Built once per layout and treated
/// as read-only afterwards, a change of obstacles or plane means building a
/// new one
#[cfg_attr(
	feature = "serde",
	derive(serde::Deserialize, serde::Serialize),
	serde(try_from = "NavGridData")
)]
#[derive(Component, Clone, Debug, Default, PartialEq, Reflect)]
pub struct NavGrid {
	/// The plane the grid covers
	bounds: PlaneBounds,
	/// Edge length of a cell
	resolution: f32,
	/// Number of cells along `x`
	columns: usize,
	/// Number of cells along `z`
	rows: usize,
	/// Column-major cells, index `column * rows + row`
	cells: Vec<GridCell>,
}

/// Unchecked fields of a deserialized [NavGrid]
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct NavGridData {
	bounds: PlaneBounds,
	resolution: f32,
	columns: usize,
	rows: usize,
	cells: Vec<GridCell>,
}

#[cfg(feature = "serde")]
impl TryFrom<NavGridData> for NavGrid {
	type Error = NavError;
	/// Reject grids whose cells don't fill `columns * rows`, indexing them
	/// would otherwise go out of bounds
	fn try_from(data: NavGridData) -> Result<Self, Self::Error> {
		if data.columns.checked_mul(data.rows) != Some(data.cells.len()) {
			return Err(NavError::MismatchedCells {
				columns: data.columns,
				rows: data.rows,
				cells: data.cells.len(),
			});
		}
		if !data.cells.is_empty() && !(data.resolution.is_finite() && data.resolution > 0.0) {
			return Err(NavError::InvalidResolution(data.resolution));
		}
		Ok(NavGrid {
			bounds: data.bounds,
			resolution: data.resolution,
			columns: data.columns,
			rows: data.rows,
			cells: data.cells,
		})
	}
}

impl NavGrid {
	/// Create a new instance of [NavGrid] over `bounds` with cells of size
	/// `resolution`, marking each cell unwalkable if it overlaps `obstacles`
	pub fn new(
		bounds: PlaneBounds,
		resolution: f32,
		obstacles: &ObstacleSet,
	) -> Result<Self, NavError> {
		if !resolution.is_finite() || resolution <= 0.0 {
			return Err(NavError::InvalidResolution(resolution));
		}
		let columns = (bounds.get_width() / resolution).ceil();
		let rows = (bounds.get_depth() / resolution).ceil();
		if !(columns.is_finite() && rows.is_finite() && columns >= 1.0 && rows >= 1.0) {
			return Err(NavError::EmptyPlane {
				width: bounds.get_width(),
				depth: bounds.get_depth(),
			});
		}
		let (columns, rows) = (columns as usize, rows as usize);
		let min_x = bounds.get_position().x - bounds.get_width() / 2.0;
		let min_z = bounds.get_position().z - bounds.get_depth() / 2.0;
		let y = bounds.get_position().y;
		let half = resolution / 2.0;

		let mut cells = Vec::with_capacity(columns * rows);
		for column in 0..columns {
			for row in 0..rows {
				let x = min_x + column as f32 * resolution;
				let z = min_z + row as f32 * resolution;
				let samples = [
					Vec3::new(x - half, y, z - half),
					Vec3::new(x + half, y, z - half),
					Vec3::new(x - half, y, z + half),
					Vec3::new(x + half, y, z + half),
					Vec3::new(x, y, z),
				];
				let walkable = !samples.iter().any(|s| obstacles.contains_point(*s));
				cells.push(GridCell::new(Vec3::new(x, y, z), walkable));
			}
		}
		let grid = NavGrid {
			bounds,
			resolution,
			columns,
			rows,
			cells,
		};
		debug!(
			"Built {}x{} grid with {} unwalkable cells",
			columns,
			rows,
			grid.count_unwalkable()
		);
		Ok(grid)
	}
	pub fn get_bounds(&self) -> &PlaneBounds {
		&self.bounds
	}
	pub fn get_resolution(&self) -> f32 {
		self.resolution
	}
	/// Number of cells along `x`
	pub fn get_columns(&self) -> usize {
		self.columns
	}
	/// Number of cells along `z`
	pub fn get_rows(&self) -> usize {
		self.rows
	}
	/// Total number of cells
	pub fn len(&self) -> usize {
		self.cells.len()
	}
	pub fn is_empty(&self) -> bool {
		self.cells.is_empty()
	}
	/// Flat index of a position, [None] if it is out of bounds
	pub fn get_index(&self, position: GridPosition) -> Option<usize> {
		if position.get_column() < self.columns && position.get_row() < self.rows {
			Some(position.get_column() * self.rows + position.get_row())
		} else {
			None
		}
	}
	/// Inverse of [NavGrid::get_index]
	pub fn get_grid_position(&self, index: usize) -> GridPosition {
		GridPosition::new(index / self.rows, index % self.rows)
	}
	pub fn get_cell(&self, position: GridPosition) -> Option<&GridCell> {
		self.get_index(position).map(|i| &self.cells[i])
	}
	/// Get a cell by flat index
	pub(crate) fn get_cell_by_index(&self, index: usize) -> &GridCell {
		&self.cells[index]
	}
	/// Whether the cell exists and is walkable
	pub fn is_walkable(&self, position: GridPosition) -> bool {
		self.get_cell(position).is_some_and(|c| c.is_walkable())
	}
	/// World position of a cell
	pub fn get_cell_position(&self, position: GridPosition) -> Option<Vec3> {
		self.get_cell(position).map(|c| c.get_position())
	}
	/// Number of cells an agent cannot enter
	pub fn count_unwalkable(&self) -> usize {
		self.cells.iter().filter(|c| !c.is_walkable()).count()
	}
	/// Map a world position to the nearest cell. Positions outside of the
	/// plane are clamped to the edge cells
	pub fn world_to_grid(&self, world: Vec3) -> GridPosition {
		let column = ((world.x + self.bounds.get_offset_x()) / self.resolution).round();
		let row = ((world.z + self.bounds.get_offset_z()) / self.resolution).round();
		GridPosition::new(
			clamp_axis(column, self.columns),
			clamp_axis(row, self.rows),
		)
	}
	/// Based on a cell's `(column, row)` find all neighbours that lie within
	/// the grid, including diagonals (up to 8). The order follows
	/// [NEIGHBOUR_OFFSETS]
	pub fn get_all_cell_neighbours(&self, position: GridPosition) -> Vec<GridPosition> {
		let mut neighbours = Vec::with_capacity(NEIGHBOUR_OFFSETS.len());
		let column = position.get_column() as i64;
		let row = position.get_row() as i64;
		for (dc, dr) in NEIGHBOUR_OFFSETS.iter() {
			let c = column + *dc as i64;
			let r = row + *dr as i64;
			if c >= 0 && r >= 0 && (c as usize) < self.columns && (r as usize) < self.rows {
				neighbours.push(GridPosition::new(c as usize, r as usize));
			}
		}
		neighbours
	}
}

/// Clamp a rounded axis coordinate into `[0, count - 1]`
fn clamp_axis(value: f32, count: usize) -> usize {
	let max = count.saturating_sub(1);
	if value <= 0.0 {
		0
	} else {
		(value as usize).min(max)
	}
}
