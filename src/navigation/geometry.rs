//! Planar geometry used to turn obstacle vertex clouds into polygons and to
//! test whether a point on the navigation plane sits inside one of them.
//!
//! All predicates work in the `x-z` plane, the `y` coordinate of any [Vec3]
//! is ignored.
//!
//! ```text
//!        z
//!        ^
//!        |    b
//!        |   /
//!        |  /    cross(o, a, b) > 0
//!        | /
//!        o-------a----> x
//! ```
//!

use bevy::prelude::*;

/// A convex polygon in the `x-z` plane with a consistent (counter-clockwise)
/// winding. The last vertex implicitly joins the first
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, Default, PartialEq, Reflect)]
pub struct ObstaclePolygon {
	/// Ordered corners of the polygon
	vertices: Vec<Vec3>,
}

impl ObstaclePolygon {
	/// Create a new instance of [ObstaclePolygon] from already ordered vertices
	pub fn new(vertices: Vec<Vec3>) -> Self {
		ObstaclePolygon { vertices }
	}
	/// Build the convex hull of an arbitrary point cloud
	pub fn from_points(points: &[Vec3]) -> Self {
		ObstaclePolygon::new(convex_hull(points))
	}
	/// Get the ordered vertices
	pub fn vertices(&self) -> &[Vec3] {
		&self.vertices
	}
	pub fn len(&self) -> usize {
		self.vertices.len()
	}
	pub fn is_empty(&self) -> bool {
		self.vertices.is_empty()
	}
	/// Whether `point` falls inside the polygon, see [point_in_polygon]
	pub fn contains_point(&self, point: Vec3) -> bool {
		point_in_polygon(&self.vertices, point)
	}
}

/// Signed area (doubled) of the triangle `o -> a -> b` in the `x-z` plane.
/// Positive for a counter-clockwise turn, negative for clockwise and zero
/// when the points are collinear
pub fn cross(o: Vec3, a: Vec3, b: Vec3) -> f32 {
	(a.x - o.x) * (b.z - o.z) - (a.z - o.z) * (b.x - o.x)
}

/// Ray casting parity test. A ray is cast from `point` towards `+x` and each
/// polygon edge that straddles the `z` of the point and intersects the ray
/// to the right of it flips the parity, an odd number of crossings means the
/// point is inside.
///
/// A point lying exactly on an edge has no defined answer, it may report
/// either way depending on the edge orientation
pub fn point_in_polygon(vertices: &[Vec3], point: Vec3) -> bool {
	let mut inside = false;
	if vertices.len() < 3 {
		return inside;
	}
	let mut j = vertices.len() - 1;
	for i in 0..vertices.len() {
		let (xi, zi) = (vertices[i].x, vertices[i].z);
		let (xj, zj) = (vertices[j].x, vertices[j].z);
		// the straddle check guarantees `zj != zi` for the division
		let straddles = (zi > point.z) != (zj > point.z);
		if straddles && point.x < (xj - xi) * (point.z - zi) / (zj - zi) + xi {
			inside = !inside;
		}
		j = i;
	}
	inside
}

/// Andrew's monotone chain. Points are sorted by `x` then `z`, a lower chain
/// is built left to right and an upper chain right to left. Whenever the last
/// three points of a chain fail to make a strict counter-clockwise turn the
/// middle one is dropped, so collinear points never appear in the hull.
///
/// Fewer than 3 points cannot form a hull and are returned as given
pub fn convex_hull(points: &[Vec3]) -> Vec<Vec3> {
	if points.len() < 3 {
		return points.to_vec();
	}
	let mut sorted = points.to_vec();
	sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.z.total_cmp(&b.z)));

	let mut lower: Vec<Vec3> = Vec::with_capacity(sorted.len());
	for p in sorted.iter() {
		while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], *p) <= 0.0
		{
			lower.pop();
		}
		lower.push(*p);
	}
	let mut upper: Vec<Vec3> = Vec::with_capacity(sorted.len());
	for p in sorted.iter().rev() {
		while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], *p) <= 0.0
		{
			upper.pop();
		}
		upper.push(*p);
	}
	// the last point of each chain is the first point of the other
	lower.pop();
	upper.pop();
	lower.extend(upper);
	lower
}
