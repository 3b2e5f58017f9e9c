//! What the map widget draws: tile layer, endpoint markers, the route line
//! and the visible viewport.

use crate::services::Coordinates;

use super::{state::Endpoint, tiles::TileStyle};

pub const DEFAULT_CENTER: (f64, f64) = (20.5937, 78.9629);
pub const DEFAULT_ZOOM: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// Smallest box containing every point, `None` for an empty slice.
    pub fn enclosing(points: &[Coordinates]) -> Option<Bounds> {
        let (first, rest) = points.split_first()?;
        let start = Bounds {
            south: first.lat(),
            west: first.lng(),
            north: first.lat(),
            east: first.lng(),
        };
        Some(rest.iter().fold(start, |b, p| Bounds {
            south: b.south.min(p.lat()),
            west: b.west.min(p.lng()),
            north: b.north.max(p.lat()),
            east: b.east.max(p.lng()),
        }))
    }

    pub fn contains(&self, point: &Coordinates) -> bool {
        (self.south..=self.north).contains(&point.lat())
            && (self.west..=self.east).contains(&point.lng())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolylineStyle {
    pub color: &'static str,
    pub weight: u8,
    pub opacity: f32,
}

impl Default for PolylineStyle {
    fn default() -> Self {
        PolylineStyle {
            color: "blue",
            weight: 5,
            opacity: 0.7,
        }
    }
}

/// A drawn driving route. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOverlay {
    points: Vec<Coordinates>,
    bounds: Bounds,
    pub style: PolylineStyle,
}

impl RouteOverlay {
    pub fn new(points: Vec<Coordinates>) -> Option<Self> {
        let bounds = Bounds::enclosing(&points)?;
        Some(RouteOverlay {
            points,
            bounds,
            style: PolylineStyle::default(),
        })
    }

    pub fn points(&self) -> &[Coordinates] {
        &self.points
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Viewport {
    Centered { center: (f64, f64), zoom: u8 },
    Fitted(Bounds),
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::Centered {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub endpoint: Endpoint,
    pub position: Coordinates,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapViewConfig {
    pub tile_style: TileStyle,
}

/// The map widget's drawable state.
///
/// The route is a single owned slot: installing a route drops the previous
/// one, so at most one polyline ever exists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapView {
    pub config: MapViewConfig,
    route: Option<RouteOverlay>,
    viewport: Viewport,
}

impl MapView {
    pub fn route(&self) -> Option<&RouteOverlay> {
        self.route.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Replaces any drawn route and frames the viewport on the new one.
    pub fn show_route(&mut self, overlay: RouteOverlay) {
        self.clear_route();
        self.viewport = Viewport::Fitted(overlay.bounds());
        self.route = Some(overlay);
    }

    /// Removes the drawn route, returning it. The viewport stays put.
    pub fn clear_route(&mut self) -> Option<RouteOverlay> {
        self.route.take()
    }

    /// Number of polylines on the map.
    pub fn polyline_count(&self) -> usize {
        usize::from(self.route.is_some())
    }
}
