use derive_more::Display;

use crate::services::Coordinates;

use super::view::{MapView, Marker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Endpoint {
    #[display(fmt = "start")]
    Start,
    #[display(fmt = "end")]
    End,
}

impl Endpoint {
    fn marker_label(self) -> &'static str {
        match self {
            Endpoint::Start => "Start Location",
            Endpoint::End => "Destination",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Location {
    pub name: String,
    pub coords: Option<Coordinates>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Empty,
    StartOnly,
    EndOnly,
    BothResolved,
}

/// Everything the map screen shows for one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapState {
    pub start: Location,
    pub end: Location,
    pub view: MapView,
    pub(super) start_lookups: u32,
    pub(super) end_lookups: u32,
    /// Both ends were known but a lookup was still out when they changed.
    pub(super) route_deferred: bool,
}

impl MapState {
    pub fn location(&self, endpoint: Endpoint) -> &Location {
        match endpoint {
            Endpoint::Start => &self.start,
            Endpoint::End => &self.end,
        }
    }

    pub fn location_mut(&mut self, endpoint: Endpoint) -> &mut Location {
        match endpoint {
            Endpoint::Start => &mut self.start,
            Endpoint::End => &mut self.end,
        }
    }

    /// Number of address lookups in flight for `endpoint`.
    pub(super) fn lookups_mut(&mut self, endpoint: Endpoint) -> &mut u32 {
        match endpoint {
            Endpoint::Start => &mut self.start_lookups,
            Endpoint::End => &mut self.end_lookups,
        }
    }

    pub fn is_resolving(&self) -> bool {
        self.start_lookups > 0 || self.end_lookups > 0
    }

    pub fn resolution(&self) -> Resolution {
        match (self.start.coords, self.end.coords) {
            (None, None) => Resolution::Empty,
            (Some(_), None) => Resolution::StartOnly,
            (None, Some(_)) => Resolution::EndOnly,
            (Some(_), Some(_)) => Resolution::BothResolved,
        }
    }

    pub fn resolved_pair(&self) -> Option<(Coordinates, Coordinates)> {
        Some((self.start.coords?, self.end.coords?))
    }

    pub fn markers(&self) -> Vec<Marker> {
        [Endpoint::Start, Endpoint::End]
            .into_iter()
            .filter_map(|endpoint| {
                let position = self.location(endpoint).coords?;
                Some(Marker {
                    endpoint,
                    position,
                    label: endpoint.marker_label(),
                })
            })
            .collect()
    }
}
