use std::sync::Arc;

use futures_util::{
    future::BoxFuture,
    stream::{FuturesUnordered, StreamExt},
    FutureExt,
};
use log::*;
use tokio::sync::mpsc;

use crate::{
    config::Config,
    services::{
        geocoding::{resolve_address, GeocodingService, NominatimService, ReverseGeocodingService},
        geolocation::{DeviceError, Geolocator},
        http_client,
        proxy::ProxyGeocodingClient,
        routing::{OsrmService, RoutingService},
    },
    NavMapError,
};

use super::{
    reducer::{reduce, Action, Effect, Notification},
    state::MapState,
};

/// The outside services the map screen talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub geocoder: Arc<dyn GeocodingService>,
    pub reverse_geocoder: Arc<dyn ReverseGeocodingService>,
    pub router: Arc<dyn RoutingService>,
    pub locator: Arc<dyn Geolocator>,
}

impl Collaborators {
    /// Addresses go through the geocode proxy; reverse lookups and routes go
    /// straight to the public services.
    pub fn from_config(config: &Config, locator: Arc<dyn Geolocator>) -> reqwest::Result<Self> {
        let client = http_client(config)?;
        Ok(Collaborators {
            geocoder: Arc::new(ProxyGeocodingClient::new(
                client.clone(),
                config.proxy_url.clone(),
            )),
            reverse_geocoder: Arc::new(NominatimService::new(
                client.clone(),
                config.geocoder_url.clone(),
            )),
            router: Arc::new(OsrmService::new(client, config.router_url.clone())),
            locator,
        })
    }
}

/// Drives the reducer on a single task.
///
/// `dispatch` applies an action right away and queues its effects; the
/// effects run as futures polled together, and each completion is fed back
/// through `reduce` one at a time, so state is only ever touched here.
pub struct MapController {
    state: MapState,
    services: Collaborators,
    notifications: Vec<Notification>,
    pending: Pending,
}

type Pending = FuturesUnordered<BoxFuture<'static, Action>>;

impl MapController {
    pub fn new(services: Collaborators) -> Self {
        MapController {
            state: MapState::default(),
            services,
            notifications: Vec::new(),
            pending: Pending::new(),
        }
    }

    pub fn state(&self) -> &MapState {
        &self.state
    }

    /// Drains the notifications shown since the last call.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Whether no request is in flight.
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Applies `action` and starts its effects without waiting on them.
    pub fn dispatch(&mut self, action: Action) {
        let (state, effects) = reduce(std::mem::take(&mut self.state), action);
        self.state = state;
        for effect in effects {
            self.perform(effect);
        }
    }

    /// Waits for the next in-flight request and applies its result. Returns
    /// `false` straight away when nothing is in flight.
    pub async fn next_completion(&mut self) -> bool {
        match self.pending.next().await {
            Some(action) => {
                self.dispatch(action);
                true
            }
            None => false,
        }
    }

    /// Applies completions until nothing is left in flight.
    pub async fn settle(&mut self) {
        while self.next_completion().await {}
    }

    /// Event loop: user actions from `actions` and request completions are
    /// applied in whatever order they arrive. Once the sender is gone the
    /// remaining requests are allowed to finish.
    pub async fn run(mut self, mut actions: mpsc::Receiver<Action>) -> Self {
        loop {
            tokio::select! {
                action = actions.recv() => match action {
                    Some(action) => self.dispatch(action),
                    None => break,
                },
                Some(action) = self.pending.next(), if !self.pending.is_empty() => {
                    self.dispatch(action);
                }
            }
        }
        self.settle().await;
        self
    }

    fn perform(&mut self, effect: Effect) {
        trace!("Performing {:?}.", effect);
        match effect {
            Effect::Notify(notification) => self.notifications.push(notification),
            Effect::ResolveAddress { endpoint, address } => {
                let geocoder = Arc::clone(&self.services.geocoder);
                self.pending.push(
                    async move {
                        let result = resolve_address(geocoder.as_ref(), &address).await;
                        Action::AddressResolved {
                            endpoint,
                            address,
                            result,
                        }
                    }
                    .boxed(),
                );
            }
            Effect::LocateDevice(options) => {
                let locator = Arc::clone(&self.services.locator);
                self.pending.push(
                    async move {
                        let result = tokio::time::timeout(
                            options.timeout,
                            locator.current_position(options),
                        )
                        .await
                        .unwrap_or(Err(DeviceError::Timeout))
                        .map_err(NavMapError::from);
                        Action::DeviceLocated(result)
                    }
                    .boxed(),
                );
            }
            Effect::ReverseGeocode(coords) => {
                let reverse_geocoder = Arc::clone(&self.services.reverse_geocoder);
                self.pending.push(
                    async move {
                        let result = reverse_geocoder.reverse_geocode(coords).await;
                        Action::PlaceNamed { coords, result }
                    }
                    .boxed(),
                );
            }
            Effect::FetchRoute { start, end } => {
                let router = Arc::clone(&self.services.router);
                self.pending.push(
                    async move {
                        let result = router.route(start, end).await;
                        Action::RouteFetched { start, end, result }
                    }
                    .boxed(),
                );
            }
        }
    }
}
