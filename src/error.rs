//! Errors raised while preparing navigation data. A failed search is not an
//! error, it produces an empty [crate::prelude::NavPath]
//!

use thiserror::Error;

/// Problems encountered building obstacles or grids
#[derive(Debug, Error)]
pub enum NavError {
	/// The scene declared no exceptional obstacle sources
	#[error("no exceptional obstacle sources found, at least one is required")]
	NoExceptionalObstacles,
	/// Grid resolution must be finite and greater than zero
	#[error("grid resolution must be positive and finite, got {0}")]
	InvalidResolution(f32),
	/// The plane is too small to hold a single cell along an axis, or its
	/// extent is not finite
	#[error("plane of width {width} and depth {depth} cannot be divided into cells")]
	EmptyPlane {
		/// Extent along `x`
		width: f32,
		/// Extent along `z`
		depth: f32,
	},
	/// A stored grid whose cells don't fill its columns and rows
	#[error("grid of {columns}x{rows} cells holds {cells} cells")]
	MismatchedCells {
		columns: usize,
		rows: usize,
		cells: usize,
	},
	/// A mesh offered as an obstacle has no `[f32; 3]` positions
	#[error("obstacle mesh on entity {0} has no readable vertex positions")]
	MissingMeshPositions(String),
	/// Reading a file failed
	#[cfg(feature = "ron")]
	#[error("failed reading file: {0}")]
	Io(#[from] std::io::Error),
	/// Parsing a `ron` file failed
	#[cfg(feature = "ron")]
	#[error("failed deserializing ron: {0}")]
	Ron(#[from] ron::error::SpannedError),
}
