use crate::types::{GeoPoint, ICAOAddress};

#[derive(Debug, PartialEq, Clone)]
pub struct Airport {
    pub icao: String,
    pub iata: String,
    pub municipality: String,
    pub position: Option<GeoPoint>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Routing {
    Origin,
    Destination,
}

/// Detail-panel data returned by a lookup for one aircraft.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct FlightDetails {
    pub icao_address: Option<ICAOAddress>,
    pub callsign: String,
    pub airline_name: Option<String>,
    pub radio: Option<String>,
    pub registration: Option<String>,
    pub aircraft_type: Option<String>,
    pub country: Option<String>,
    pub origin: Option<Airport>,
    pub destination: Option<Airport>,
}

impl FlightDetails {
    /// Airline name shortened to fit the detail panel.
    #[must_use]
    pub fn display_airline_name(&self) -> Option<String> {
        self.airline_name
            .as_ref()
            .map(|name| name.replace("International", "Int'l"))
    }

    #[must_use]
    pub fn origin_label(&self) -> &str {
        self.origin
            .as_ref()
            .map_or("Origin", |airport| airport.municipality.as_str())
    }

    #[must_use]
    pub fn destination_label(&self) -> &str {
        self.destination
            .as_ref()
            .map_or("Destination", |airport| airport.municipality.as_str())
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Selection {
    pub icao_address: ICAOAddress,
    pub callsign: String,
    /// `None` until the lookup response arrives.
    pub details: Option<FlightDetails>,
    /// Airports entered by hand, which outlive later lookup responses.
    overridden: Vec<Routing>,
}

impl Selection {
    #[must_use]
    pub fn new(icao_address: ICAOAddress, callsign: String) -> Self {
        Selection {
            icao_address,
            callsign,
            details: None,
            overridden: Vec::new(),
        }
    }

    #[must_use]
    pub fn origin_position(&self) -> Option<GeoPoint> {
        self.details
            .as_ref()
            .and_then(|details| details.origin.as_ref())
            .and_then(|airport| airport.position)
    }

    #[must_use]
    pub fn destination_position(&self) -> Option<GeoPoint> {
        self.details
            .as_ref()
            .and_then(|details| details.destination.as_ref())
            .and_then(|airport| airport.position)
    }

    /// Attaches a lookup response, keeping any airport set by hand.
    pub fn apply_details(&mut self, mut details: FlightDetails) {
        if let Some(current) = self.details.take() {
            if self.overridden.contains(&Routing::Origin) {
                details.origin = current.origin;
            }
            if self.overridden.contains(&Routing::Destination) {
                details.destination = current.destination;
            }
        }
        self.details = Some(details);
    }

    pub fn set_airport(&mut self, routing: Routing, airport: Airport) {
        if !self.overridden.contains(&routing) {
            self.overridden.push(routing);
        }
        let icao_address = self.icao_address;
        let callsign = &self.callsign;
        let details = self.details.get_or_insert_with(|| FlightDetails {
            icao_address: Some(icao_address),
            callsign: callsign.clone(),
            ..FlightDetails::default()
        });
        match routing {
            Routing::Origin => details.origin = Some(airport),
            Routing::Destination => details.destination = Some(airport),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Airport, FlightDetails, Routing, Selection};
    use crate::types::{GeoPoint, ICAOAddress};

    fn heathrow() -> Airport {
        Airport {
            icao: String::from("EGLL"),
            iata: String::from("LHR"),
            municipality: String::from("London"),
            position: GeoPoint::new(51.47, -0.4543).ok(),
        }
    }

    #[test]
    fn when_no_details_then_labels_fall_back_to_placeholders() {
        let details = FlightDetails::default();
        assert_eq!(details.origin_label(), "Origin");
        assert_eq!(details.destination_label(), "Destination");
    }

    #[test]
    fn when_airline_name_is_long_then_international_is_shortened() {
        let details = FlightDetails {
            airline_name: Some(String::from("Emirates International")),
            ..FlightDetails::default()
        };
        assert_eq!(
            details.display_airline_name().as_deref(),
            Some("Emirates Int'l")
        );
    }

    #[test]
    fn when_airport_set_before_lookup_then_details_are_created() {
        let mut selection = Selection::new(ICAOAddress::new(1).unwrap(), String::from("BAW1"));

        selection.set_airport(Routing::Origin, heathrow());

        assert_eq!(selection.origin_position(), heathrow().position);
        assert_eq!(selection.destination_position(), None);
        let details = selection.details.expect("details created");
        assert_eq!(details.callsign, "BAW1");
        assert_eq!(details.origin_label(), "London");
    }

    #[test]
    fn when_lookup_arrives_after_override_then_override_is_kept() {
        let mut selection = Selection::new(ICAOAddress::new(1).unwrap(), String::from("BAW1"));
        selection.set_airport(Routing::Origin, heathrow());

        selection.apply_details(FlightDetails {
            callsign: String::from("BAW1"),
            radio: Some(String::from("SPEEDBIRD")),
            origin: Some(Airport {
                icao: String::from("LFPG"),
                iata: String::from("CDG"),
                municipality: String::from("Paris"),
                position: GeoPoint::new(49.01, 2.55).ok(),
            }),
            destination: Some(Airport {
                icao: String::from("KJFK"),
                iata: String::from("JFK"),
                municipality: String::from("New York"),
                position: None,
            }),
            ..FlightDetails::default()
        });

        let details = selection.details.as_ref().expect("details attached");
        assert_eq!(details.origin_label(), "London");
        assert_eq!(details.destination_label(), "New York");
        assert_eq!(details.radio.as_deref(), Some("SPEEDBIRD"));
    }
}
