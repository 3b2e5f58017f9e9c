//! The map screen's state transitions.
//!
//! `reduce` is pure: it takes the current state and one action and hands back
//! the next state plus the effects the controller has to run. Effect results
//! come back in as further actions.

use derive_more::Constructor;
use log::*;

use crate::{
    services::{
        geolocation::{DeviceError, PositionOptions},
        Coordinates,
    },
    NavMapError,
};

use super::{
    state::{Endpoint, MapState},
    tiles::TileStyle,
    view::RouteOverlay,
};

#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct Notification {
    pub message: String,
}

#[derive(Debug)]
pub enum Action {
    EditName {
        endpoint: Endpoint,
        name: String,
    },
    Search,
    Swap,
    UseCurrentLocation,
    SelectTileStyle(TileStyle),
    AddressResolved {
        endpoint: Endpoint,
        address: String,
        result: Result<Coordinates, NavMapError>,
    },
    DeviceLocated(Result<Coordinates, NavMapError>),
    /// Reverse geocoding result for a device position.
    PlaceNamed {
        coords: Coordinates,
        result: Result<String, NavMapError>,
    },
    RouteFetched {
        start: Coordinates,
        end: Coordinates,
        result: Result<Vec<Coordinates>, NavMapError>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ResolveAddress { endpoint: Endpoint, address: String },
    LocateDevice(PositionOptions),
    ReverseGeocode(Coordinates),
    FetchRoute { start: Coordinates, end: Coordinates },
    Notify(Notification),
}

pub fn reduce(mut state: MapState, action: Action) -> (MapState, Vec<Effect>) {
    let mut effects = Vec::new();

    match action {
        Action::EditName { endpoint, name } => state.location_mut(endpoint).name = name,
        Action::Search => {
            for endpoint in [Endpoint::Start, Endpoint::End] {
                let address = state.location(endpoint).name.trim();
                if !address.is_empty() {
                    let address = address.to_string();
                    *state.lookups_mut(endpoint) += 1;
                    effects.push(Effect::ResolveAddress { endpoint, address });
                }
            }
        }
        Action::Swap => {
            std::mem::swap(&mut state.start, &mut state.end);
            coords_changed(&mut state, &mut effects);
        }
        Action::UseCurrentLocation => {
            effects.push(Effect::LocateDevice(PositionOptions::default()));
        }
        Action::SelectTileStyle(style) => state.view.config.tile_style = style,
        Action::AddressResolved {
            endpoint,
            address,
            result,
        } => {
            let lookups = state.lookups_mut(endpoint);
            *lookups = lookups.saturating_sub(1);
            match result {
                Ok(coords) => {
                    debug!("Resolved {} location {:?} to {}.", endpoint, address, coords);
                    state.location_mut(endpoint).coords = Some(coords);
                    coords_changed(&mut state, &mut effects);
                }
                Err(error) => {
                    notify(
                        &mut effects,
                        format!("Could not find {} location {:?}: {}", endpoint, address, error),
                    );
                    if state.route_deferred {
                        request_route(&mut state, &mut effects);
                    }
                }
            }
        }
        Action::DeviceLocated(Ok(coords)) => {
            state.start.coords = Some(coords);
            coords_changed(&mut state, &mut effects);
            effects.push(Effect::ReverseGeocode(coords));
        }
        Action::DeviceLocated(Err(error)) => {
            warn!("Geolocation error: {}", error);
            let message = match error {
                NavMapError::Device(DeviceError::Unsupported) => {
                    "Geolocation is not supported by this device."
                }
                _ => "Unable to fetch location. Please allow location access.",
            };
            notify(&mut effects, message.to_string());
        }
        Action::PlaceNamed { coords, result } => {
            if state.start.coords != Some(coords) {
                debug!("Discarding place name for superseded position {}.", coords);
            } else {
                state.start.name = result.unwrap_or_else(|error| {
                    warn!("Error fetching address: {}", error);
                    coords.to_string()
                });
            }
        }
        Action::RouteFetched { start, end, result } => {
            if state.resolved_pair() != Some((start, end)) {
                debug!("Discarding route for superseded endpoints {} -> {}.", start, end);
            } else {
                let overlay = result.and_then(|points| {
                    RouteOverlay::new(points).ok_or(NavMapError::RouteNotFound)
                });
                match overlay {
                    Ok(overlay) => state.view.show_route(overlay),
                    Err(error) => notify(&mut effects, format!("Could not fetch route: {}", error)),
                }
            }
        }
    }

    (state, effects)
}

/// A drawn route always belongs to the current endpoint pair, so any change
/// to either endpoint drops it and asks for a new one when both are known.
fn coords_changed(state: &mut MapState, effects: &mut Vec<Effect>) {
    state.view.clear_route();
    request_route(state, effects);
}

/// Holds the request back while an address lookup is still out, so a search
/// of both ends never routes between one new end and one old end.
fn request_route(state: &mut MapState, effects: &mut Vec<Effect>) {
    let Some((start, end)) = state.resolved_pair() else {
        state.route_deferred = false;
        return;
    };
    if state.is_resolving() {
        trace!("Deferring route until pending lookups finish.");
        state.route_deferred = true;
    } else {
        state.route_deferred = false;
        effects.push(Effect::FetchRoute { start, end });
    }
}

fn notify(effects: &mut Vec<Effect>, message: String) {
    warn!("{}", message);
    effects.push(Effect::Notify(Notification::new(message)));
}
