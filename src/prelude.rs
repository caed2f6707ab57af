//! `use bevy_navgrid_astar_plugin::prelude::*;` to import common structures and methods
//!

#[doc(hidden)]
pub use crate::navigation::{
	follower::*, geometry::*, grid::*, obstacles::*, search::*, utilities::*,
};

#[doc(hidden)]
pub use crate::{
	bundle::*,
	error::*,
	plugin::{grid_layer::*, path_layer::*, *},
};
