//! Navigation across a flat plane scattered with obstacles.
//!
//! [Introduction to A*](https://theory.stanford.edu/~amitp/GameProgramming/AStarComparison.html)
//!
//! [Monotone chain convex hull](https://en.wikibooks.org/wiki/Algorithm_Implementation/Geometry/Convex_hull/Monotone_chain)
//!
//! The plane is rasterised into a uniform grid of square cells. Obstacles
//! are described by the vertices of their meshes which are reduced to convex
//! polygons, any cell touched by a polygon is considered unwalkable.
//!
//! ```text
//!  _____________________________
//! |__|__|__|__|__|__|__|__|__|__|
//! |__|__|__|x_|x_|__|__|__|__|__|
//! |__|__|__|x_|x_|__|__|__|__|__|
//! |__|__|__|__|__|__|__|__|x_|x_|
//! |__|__|__|__|__|__|__|__|x_|x_|
//! |__|x_|__|__|__|__|__|__|__|__|
//! |__|__|__|__|__|__|__|__|__|__|
//! ```
//!
//! Definitions:
//!
//! * Obstacle source - the world space vertices of one obstacle mesh
//! * Exceptional obstacle - a single mesh describing several physically
//! separate objects, its vertices are clustered by proximity before hulling
//! * Grid cell - a square of the plane with a world position and a walkable flag
//! * Path - the ordered cells from a start to a goal, turned into world
//! space waypoints for an actor to follow
//!
//! Data flows from meshes to an [obstacles::ObstacleSet], from the set to a
//! [grid::NavGrid], from the grid to a [search::NavPath] and finally from the
//! path into a [follower::PathFollower].
//!

pub mod follower;
pub mod geometry;
pub mod grid;
pub mod obstacles;
pub mod search;
pub mod utilities;
