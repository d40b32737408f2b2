use crate::airspace::{Airspace, AirspaceHandle, AirspaceViewer};
use crate::extrapolator::{DeadReckoning, ExtrapolationTask};
use crate::parser::builder::routing_name;
use crate::parser::types::FeedRequest;
use crate::scheduler::TimerScheduler;
use crate::selection::{Airport, FlightDetails, Routing};
use crate::thread_manager::SteppableTask;
use crate::types::{ICAOAddress, TrackedEntity};

const IDLE_PRUNE_INTERVAL: std::time::Duration = std::time::Duration::from_secs(1);

#[derive(Debug, PartialEq, Clone)]
pub enum TrackerEvent {
    Update(Vec<TrackedEntity>),
    Remove(Vec<ICAOAddress>),
    Select(ICAOAddress),
    ClearSelection,
    Details(FlightDetails),
    Airport(Routing, Airport),
    /// Airport code typed in for the selected flight.
    RequestAirport(Routing, String),
}

/// Owns the airspace and the extrapolation timers of every aircraft in it.
///
/// Dropping the tracker cancels all of its timers.
pub struct Tracker {
    airspace: AirspaceHandle,
    scheduler: TimerScheduler<ICAOAddress>,
    tick_interval: std::time::Duration,
    event_receiver: crossbeam_channel::Receiver<TrackerEvent>,
    request_sender: crossbeam_channel::Sender<FeedRequest>,
}

impl Tracker {
    #[must_use]
    pub fn new(
        stale_after: chrono::TimeDelta,
        tick_interval: std::time::Duration,
        event_receiver: crossbeam_channel::Receiver<TrackerEvent>,
        request_sender: crossbeam_channel::Sender<FeedRequest>,
    ) -> Self {
        Tracker {
            airspace: AirspaceHandle::new(Airspace::new(stale_after)),
            scheduler: TimerScheduler::new(),
            tick_interval,
            event_receiver,
            request_sender,
        }
    }

    #[must_use]
    pub fn get_airspace_viewer(&self) -> AirspaceViewer {
        self.airspace.get_airspace_viewer()
    }

    /// Shared handle for driving the extrapolation timers.
    #[must_use]
    pub fn scheduler(&self) -> TimerScheduler<ICAOAddress> {
        self.scheduler.clone()
    }

    pub fn handle_event(&mut self, event: TrackerEvent) {
        match event {
            TrackerEvent::Update(aircraft) => {
                self.apply_updates(aircraft);
                self.prune(chrono::Utc::now());
            }
            TrackerEvent::Remove(addresses) => self.remove(&addresses),
            TrackerEvent::Select(icao_address) => self.select(icao_address),
            TrackerEvent::ClearSelection => self.airspace.write().clear_selection(),
            TrackerEvent::Details(details) => self.apply_details(details),
            TrackerEvent::Airport(routing, airport) => self.apply_airport(routing, airport),
            TrackerEvent::RequestAirport(routing, code) => self.request_airport(routing, &code),
        }
    }

    pub fn apply_updates(&mut self, aircraft: Vec<TrackedEntity>) {
        let mut new_aircraft = 0;
        for entry in aircraft {
            // stop the old motion before the authoritative position lands
            self.scheduler.cancel(&entry.icao_address);
            let motion = DeadReckoning::for_aircraft(&entry, self.tick_interval);
            let icao_address = entry.icao_address;

            if self.airspace.write().update(entry) {
                new_aircraft += 1;
            }
            if let Some(motion) = motion {
                self.extrapolate(icao_address, motion);
            }
        }
        log::debug!("Tracker: {new_aircraft} new aircraft");
    }

    /// (Re)starts dead-reckoning for a tracked aircraft.
    pub fn extrapolate(&self, icao_address: ICAOAddress, motion: DeadReckoning) {
        let task = ExtrapolationTask::new(icao_address, motion, self.airspace.clone());
        self.scheduler.start(icao_address, task, self.tick_interval);
    }

    pub fn remove(&mut self, addresses: &[ICAOAddress]) {
        for icao_address in addresses {
            self.scheduler.cancel(icao_address);
            self.airspace.write().remove(*icao_address);
        }
    }

    pub fn prune(&mut self, now: chrono::DateTime<chrono::Utc>) {
        let removed = self.airspace.write().prune_stale(now);
        if !removed.is_empty() {
            log::info!("Tracker: Pruned {} stale aircraft", removed.len());
        }
        for icao_address in &removed {
            self.scheduler.cancel(icao_address);
        }
    }

    pub fn select(&mut self, icao_address: ICAOAddress) {
        let callsign = {
            let mut airspace = self.airspace.write();
            if !airspace.select(icao_address) {
                log::debug!("Tracker: Cannot select untracked {icao_address}");
                return;
            }
            airspace
                .selection()
                .map(|selection| selection.callsign.clone())
                .unwrap_or_default()
        };

        self.send_request(FeedRequest::LookupAll(icao_address.to_string(), callsign));
    }

    /// Asks the feed for an airport to use as the selected flight's origin or destination.
    pub fn request_airport(&mut self, routing: Routing, code: &str) {
        let code = code.trim().to_ascii_uppercase();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            log::debug!("Tracker: Ignoring airport code '{code}'");
            return;
        }
        if self.airspace.read().selection().is_none() {
            log::debug!("Tracker: Airport {code} requested without selection");
            return;
        }
        self.send_request(FeedRequest::LookupAirport(
            code,
            routing_name(routing).to_string(),
        ));
    }

    fn send_request(&self, request: FeedRequest) {
        if let Err(err) = self.request_sender.send(request) {
            log::error!("Tracker: Failed to send feed request: {err}");
        }
    }

    fn apply_details(&mut self, details: FlightDetails) {
        let mut airspace = self.airspace.write();
        let Some(selection) = airspace.selection_mut() else {
            log::debug!("Tracker: Lookup for {} arrived without selection", details.callsign);
            return;
        };
        let matches = match details.icao_address {
            Some(icao_address) => icao_address == selection.icao_address,
            None => details.callsign == selection.callsign,
        };
        if matches {
            selection.apply_details(details);
        } else {
            log::debug!("Tracker: Ignoring lookup for {}", details.callsign);
        }
    }

    fn apply_airport(&mut self, routing: Routing, airport: Airport) {
        let airport_icao = airport.icao.clone();
        let callsign = {
            let mut airspace = self.airspace.write();
            let Some(selection) = airspace.selection_mut() else {
                log::debug!("Tracker: Airport {airport_icao} arrived without selection");
                return;
            };
            selection.set_airport(routing, airport);
            selection.callsign.clone()
        };

        // remember the route upstream so later lookups return it
        if airport_icao.is_empty() {
            return;
        }
        self.send_request(match routing {
            Routing::Origin => FeedRequest::AddOrigin(callsign, airport_icao),
            Routing::Destination => FeedRequest::AddDestination(callsign, airport_icao),
        });
    }
}

impl SteppableTask for Tracker {
    fn step(&mut self) -> bool {
        match self.event_receiver.recv_timeout(IDLE_PRUNE_INTERVAL) {
            Ok(event) => {
                self.handle_event(event);
                true
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                self.prune(chrono::Utc::now());
                true
            }
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                log::info!("Tracker: event sources disconnected");
                false
            }
        }
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        self.scheduler.cancel_all();
    }
}
