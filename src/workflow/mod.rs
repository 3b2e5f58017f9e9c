//! The map screen: two endpoints, their resolution, the route between them
//! and the tile style, driven by [`controller::MapController`].

pub mod controller;
pub mod reducer;
pub mod state;
pub mod tiles;
pub mod view;

pub use controller::{Collaborators, MapController};
pub use reducer::{reduce, Action, Effect, Notification};
pub use state::{Endpoint, Location, MapState, Resolution};
pub use tiles::{TileLayer, TileStyle};
pub use view::{Bounds, MapView, RouteOverlay, Viewport};
