pub mod builder;
mod constants;
pub mod types;

use crate::parser::builder::{
    build_aircraft_from_record, build_airport_from_record, build_details_from_record,
    build_routing, decode_aircraft_record, decode_message, AircraftBuildError,
};
use crate::parser::types::FeedMessage;
use crate::thread_manager::SteppableTask;
use crate::tracker::TrackerEvent;
use crate::types::ICAOAddress;

pub struct FeedParser {
    receiver: crossbeam_channel::Receiver<String>,
    sender: crossbeam_channel::Sender<TrackerEvent>,
}
impl FeedParser {
    #[must_use]
    pub fn new(
        messages_receiver: crossbeam_channel::Receiver<String>,
        event_sender: crossbeam_channel::Sender<TrackerEvent>,
    ) -> Self {
        FeedParser {
            receiver: messages_receiver,
            sender: event_sender,
        }
    }
}

/// Turns one feed line into the tracker event it carries, if any.
///
/// Invalid aircraft records are dropped individually so one bad record does
/// not discard the rest of its batch.
pub fn parse_line(
    line: &str,
    received: chrono::DateTime<chrono::Utc>,
) -> Result<Option<TrackerEvent>, AircraftBuildError> {
    match decode_message(line)? {
        FeedMessage::AircraftUpdate(records) => {
            let aircraft: Vec<_> = records
                .into_values()
                .filter_map(|value| {
                    decode_aircraft_record(value)
                        .and_then(|record| build_aircraft_from_record(record, received))
                        .map_err(|err| log::debug!("Discarding noisy record: {err}"))
                        .ok()
                })
                .collect();
            Ok((!aircraft.is_empty()).then_some(TrackerEvent::Update(aircraft)))
        }
        FeedMessage::AircraftRemove(addresses) => {
            let addresses: Vec<ICAOAddress> = addresses
                .iter()
                .filter_map(|address| {
                    address
                        .parse()
                        .map_err(|err| log::debug!("Discarding removal: {err}"))
                        .ok()
                })
                .collect();
            Ok((!addresses.is_empty()).then_some(TrackerEvent::Remove(addresses)))
        }
        FeedMessage::LookupAll(record) => {
            Ok(Some(TrackerEvent::Details(build_details_from_record(record)?)))
        }
        FeedMessage::LookupAirport(mut record) => {
            let Some(routing) = record.routing.take() else {
                return Ok(None);
            };
            let routing = build_routing(&routing)?;
            Ok(Some(TrackerEvent::Airport(
                routing,
                build_airport_from_record(record),
            )))
        }
    }
}

impl SteppableTask for FeedParser {
    fn step(&mut self) -> bool {
        let Ok(line) = self.receiver.recv() else {
            log::info!("FeedParser: upstream disconnected");
            return false;
        };

        match parse_line(&line, chrono::Utc::now()) {
            Ok(Some(event)) => {
                if let Err(err) = self.sender.send(event) {
                    log::error!("Failed to forward tracker event: {err}");
                    return false;
                }
            }
            Ok(None) => {}
            Err(err) => log::debug!("Discarding noisy data: {err}"),
        }

        true
    }
}
