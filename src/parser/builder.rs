use super::constants::{DESTINATION_ROUTING, ORIGIN_ROUTING};
use super::types::{AircraftRecord, AirportRecord, FeedMessage, LookupRecord};
use crate::selection::{Airport, FlightDetails, Routing};
use crate::types::{GeoPoint, GeoPointError, ICAOAddress, ICAOAddressError, TrackedEntity};

#[derive(Debug, PartialEq)]
pub enum AircraftBuildError {
    InvalidJSON(String),
    InvalidICAOAddress(ICAOAddressError),
    InvalidPosition(GeoPointError),
    InvalidGroundSpeed(f64),
    InvalidHeading(f64),
    UnknownRouting(String),
}
impl std::fmt::Display for AircraftBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AircraftBuildError::InvalidJSON(e) => write!(f, "Invalid feed message: {e}"),
            AircraftBuildError::InvalidICAOAddress(e) => write!(f, "{e}"),
            AircraftBuildError::InvalidPosition(e) => write!(f, "{e}"),
            AircraftBuildError::InvalidGroundSpeed(speed) => {
                write!(f, "Invalid ground speed: {speed}")
            }
            AircraftBuildError::InvalidHeading(heading) => write!(f, "Invalid heading: {heading}"),
            AircraftBuildError::UnknownRouting(routing) => {
                write!(f, "Unknown airport routing: {routing}")
            }
        }
    }
}
impl std::error::Error for AircraftBuildError {}

pub fn decode_message(string: &str) -> Result<FeedMessage, AircraftBuildError> {
    serde_json::from_str(string.trim()).map_err(|e| AircraftBuildError::InvalidJSON(e.to_string()))
}

pub fn decode_aircraft_record(
    value: serde_json::Value,
) -> Result<AircraftRecord, AircraftBuildError> {
    serde_json::from_value(value).map_err(|e| AircraftBuildError::InvalidJSON(e.to_string()))
}

pub fn build_aircraft_from_record(
    record: AircraftRecord,
    received: chrono::DateTime<chrono::Utc>,
) -> Result<TrackedEntity, AircraftBuildError> {
    let icao_address: ICAOAddress = record
        .icao
        .parse()
        .map_err(AircraftBuildError::InvalidICAOAddress)?;
    let position =
        GeoPoint::new(record.lat, record.lng).map_err(AircraftBuildError::InvalidPosition)?;
    if !record.speed.is_finite() || record.speed < 0.0 {
        return Err(AircraftBuildError::InvalidGroundSpeed(record.speed));
    }
    if !record.hdg.is_finite() {
        return Err(AircraftBuildError::InvalidHeading(record.hdg));
    }

    Ok(TrackedEntity {
        icao_address,
        callsign: record.csign.trim().to_string(),
        registration: non_empty(record.reg),
        aircraft_type: non_empty(record.aircraft_type),
        position,
        heading: record.hdg.rem_euclid(360.0),
        ground_speed: record.speed,
        altitude: record.alt,
        last_update: received,
    })
}

pub fn build_airport_from_record(record: AirportRecord) -> Airport {
    // airports without coordinates are still shown by name
    let position = match (record.lat, record.lng) {
        (Some(latitude), Some(longitude)) => GeoPoint::new(latitude, longitude)
            .map_err(|e| log::debug!("Airport {} has bad position: {e}", record.icao))
            .ok(),
        _ => None,
    };
    Airport {
        icao: record.icao,
        iata: record.iata,
        municipality: record.muni,
        position,
    }
}

pub fn build_routing(routing: &str) -> Result<Routing, AircraftBuildError> {
    match routing {
        ORIGIN_ROUTING => Ok(Routing::Origin),
        DESTINATION_ROUTING => Ok(Routing::Destination),
        other => Err(AircraftBuildError::UnknownRouting(other.to_string())),
    }
}

#[must_use]
pub fn routing_name(routing: Routing) -> &'static str {
    match routing {
        Routing::Origin => ORIGIN_ROUTING,
        Routing::Destination => DESTINATION_ROUTING,
    }
}

pub fn build_details_from_record(record: LookupRecord) -> Result<FlightDetails, AircraftBuildError> {
    let icao_address = record
        .aircraft
        .icao24
        .as_deref()
        .map(str::parse::<ICAOAddress>)
        .transpose()
        .map_err(AircraftBuildError::InvalidICAOAddress)?;

    Ok(FlightDetails {
        icao_address,
        callsign: record.callsign,
        airline_name: non_empty(record.airline.name),
        radio: non_empty(record.radio),
        registration: non_empty(record.aircraft.reg),
        aircraft_type: non_empty(record.aircraft.aircraft_type),
        country: non_empty(record.aircraft.country),
        origin: record.origin.map(build_airport_from_record),
        destination: record.destination.map(build_airport_from_record),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|string| !string.trim().is_empty())
}

#[cfg(test)]
mod test {
    use super::{
        build_aircraft_from_record, build_details_from_record, build_routing,
        decode_aircraft_record, decode_message, routing_name, AircraftBuildError,
    };
    use crate::parser::types::FeedMessage;
    use crate::selection::Routing;
    use crate::types::{GeoPointError, ICAOAddress};

    const UPDATE_LINE: &str = r#"{"event":"decoder.get","payload":{"4ca7b5":{"icao":"4ca7b5","csign":"RYR12 ","lat":53.42,"lng":-6.27,"hdg":-90,"speed":420.5,"alt":37000,"reg":"EI-DCL","type":"B738","cat":0}}}"#;

    fn only_record(message: FeedMessage) -> crate::parser::types::AircraftRecord {
        match message {
            FeedMessage::AircraftUpdate(records) => {
                decode_aircraft_record(records.into_values().next().expect("one record"))
                    .expect("well-typed record")
            }
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn when_decoding_update_line_then_aircraft_is_built() {
        let received = chrono::Utc::now();
        let record = only_record(decode_message(UPDATE_LINE).expect("valid line"));

        let aircraft = build_aircraft_from_record(record, received).expect("valid record");

        assert_eq!(aircraft.icao_address, ICAOAddress::new(0x004C_A7B5).unwrap());
        assert_eq!(aircraft.callsign, "RYR12");
        assert_eq!(aircraft.registration.as_deref(), Some("EI-DCL"));
        assert_eq!(aircraft.aircraft_type.as_deref(), Some("B738"));
        assert_eq!(aircraft.heading, 270.0);
        assert_eq!(aircraft.ground_speed, 420.5);
        assert_eq!(aircraft.altitude, 37000.0);
        assert_eq!(aircraft.last_update, received);
    }

    #[test]
    fn when_heading_and_speed_missing_then_they_default_to_zero() {
        let line = r#"{"event":"decoder.get","payload":{"a1":{"icao":"a1","csign":"N1","lat":1,"lng":2}}}"#;
        let record = only_record(decode_message(line).unwrap());

        let aircraft = build_aircraft_from_record(record, chrono::Utc::now()).unwrap();

        assert_eq!(aircraft.heading, 0.0);
        assert_eq!(aircraft.ground_speed, 0.0);
        assert_eq!(aircraft.registration, None);
    }

    #[test]
    fn when_record_has_bad_position_then_error_is_returned() {
        let line = r#"{"event":"decoder.get","payload":{"a1":{"icao":"a1","csign":"N1","lat":95,"lng":2}}}"#;
        let record = only_record(decode_message(line).unwrap());

        assert_eq!(
            build_aircraft_from_record(record, chrono::Utc::now()),
            Err(AircraftBuildError::InvalidPosition(
                GeoPointError::InvalidLatitude(95.0)
            ))
        );
    }

    #[test]
    fn when_record_has_negative_speed_then_error_is_returned() {
        let line = r#"{"event":"decoder.get","payload":{"a1":{"icao":"a1","csign":"N1","lat":5,"lng":2,"speed":-3}}}"#;
        let record = only_record(decode_message(line).unwrap());

        assert_eq!(
            build_aircraft_from_record(record, chrono::Utc::now()),
            Err(AircraftBuildError::InvalidGroundSpeed(-3.0))
        );
    }

    #[test]
    fn when_decoding_removal_then_addresses_are_listed() {
        let message = decode_message(r#"{"event":"decoder.remove","payload":["4ca7b5","a1"]}"#)
            .expect("valid line");
        assert_eq!(
            message,
            FeedMessage::AircraftRemove(vec![String::from("4ca7b5"), String::from("a1")])
        );
    }

    #[test]
    fn when_decoding_unknown_event_then_error_is_returned() {
        assert!(matches!(
            decode_message(r#"{"event":"weather.get","payload":{}}"#),
            Err(AircraftBuildError::InvalidJSON(_))
        ));
        assert!(decode_message("not json").is_err());
    }

    #[test]
    fn when_decoding_lookup_then_details_include_airports() {
        let line = r#"{"event":"lookup.all","payload":{"callsign":"BAW117","radio":"SPEEDBIRD ONE ONE SEVEN","airline":{"name":"British Airways"},"aircraft":{"icao24":"406a93","reg":"G-XWBA","type":"A35K","country":"GB"},"origin":{"icao":"EGLL","iata":"LHR","muni":"London","lat":51.47,"lng":-0.4543},"destination":{"icao":"KJFK","iata":"JFK","muni":"New York"}}}"#;
        let FeedMessage::LookupAll(record) = decode_message(line).unwrap() else {
            panic!("expected lookup");
        };

        let details = build_details_from_record(record).expect("valid lookup");

        assert_eq!(details.icao_address, ICAOAddress::new(0x0040_6A93).ok());
        assert_eq!(details.callsign, "BAW117");
        assert_eq!(details.radio.as_deref(), Some("SPEEDBIRD ONE ONE SEVEN"));
        let origin = details.origin.expect("origin given");
        assert_eq!(origin.iata, "LHR");
        assert!(origin.position.is_some());
        let destination = details.destination.expect("destination given");
        assert_eq!(destination.municipality, "New York");
        assert_eq!(destination.position, None);
    }

    #[test]
    fn when_lookup_has_null_route_then_airports_are_absent() {
        let line = r#"{"event":"lookup.all","payload":{"callsign":"N1","origin":null,"destination":null}}"#;
        let FeedMessage::LookupAll(record) = decode_message(line).unwrap() else {
            panic!("expected lookup");
        };

        let details = build_details_from_record(record).unwrap();

        assert_eq!(details.origin, None);
        assert_eq!(details.icao_address, None);
        assert_eq!(details.origin_label(), "Origin");
    }

    #[test]
    fn when_building_routing_then_only_known_values_are_accepted() {
        assert_eq!(build_routing("origin"), Ok(Routing::Origin));
        assert_eq!(
            build_routing(routing_name(Routing::Destination)),
            Ok(Routing::Destination)
        );
        assert_eq!(build_routing("destination"), Ok(Routing::Destination));
        assert_eq!(
            build_routing("alternate"),
            Err(AircraftBuildError::UnknownRouting(String::from("alternate")))
        );
    }

    #[test]
    fn when_record_has_null_field_then_it_fails_to_decode_on_its_own() {
        let line = r#"{"event":"decoder.get","payload":{"a1":{"icao":"a1","csign":"N1","lat":null,"lng":2}}}"#;
        let FeedMessage::AircraftUpdate(records) = decode_message(line).expect("line decodes")
        else {
            panic!("expected update");
        };

        let value = records.into_values().next().expect("one record");

        assert!(matches!(
            decode_aircraft_record(value),
            Err(AircraftBuildError::InvalidJSON(_))
        ));
    }
}
