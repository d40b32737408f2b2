//! Records as they appear on the feed.

/// One line of the feed, tagged by its event name.
#[derive(serde::Deserialize, Debug, PartialEq)]
#[serde(tag = "event", content = "payload")]
pub enum FeedMessage {
    /// Records stay raw so a malformed one can be dropped on its own.
    #[serde(rename = "decoder.get")]
    AircraftUpdate(std::collections::HashMap<String, serde_json::Value>),
    #[serde(rename = "decoder.remove")]
    AircraftRemove(Vec<String>),
    #[serde(rename = "lookup.all")]
    LookupAll(LookupRecord),
    #[serde(rename = "lookup.airport")]
    LookupAirport(AirportRecord),
}

/// Requests written back to the feed.
#[derive(serde::Serialize, Debug, PartialEq, Clone)]
#[serde(tag = "event", content = "args")]
pub enum FeedRequest {
    #[serde(rename = "decoder.get")]
    AircraftSnapshot,
    #[serde(rename = "lookup.all")]
    LookupAll(String, String),
    /// Airport code and the routing it should be applied as.
    #[serde(rename = "lookup.airport")]
    LookupAirport(String, String),
    /// Callsign and airport ICAO code.
    #[serde(rename = "lookup.add_origin")]
    AddOrigin(String, String),
    #[serde(rename = "lookup.add_destination")]
    AddDestination(String, String),
}

#[derive(serde::Deserialize, Debug, PartialEq, Clone)]
pub struct AircraftRecord {
    pub icao: String,
    pub csign: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub hdg: f64,
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub alt: f64,
    #[serde(default)]
    pub reg: Option<String>,
    #[serde(default, rename = "type")]
    pub aircraft_type: Option<String>,
}

#[derive(serde::Deserialize, Debug, PartialEq, Clone, Default)]
pub struct LookupRecord {
    pub callsign: String,
    #[serde(default)]
    pub aircraft: LookupAircraftRecord,
    #[serde(default)]
    pub airline: LookupAirlineRecord,
    #[serde(default)]
    pub radio: Option<String>,
    #[serde(default)]
    pub origin: Option<AirportRecord>,
    #[serde(default)]
    pub destination: Option<AirportRecord>,
}

#[derive(serde::Deserialize, Debug, PartialEq, Clone, Default)]
pub struct LookupAircraftRecord {
    #[serde(default)]
    pub icao24: Option<String>,
    #[serde(default)]
    pub reg: Option<String>,
    #[serde(default, rename = "type")]
    pub aircraft_type: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(serde::Deserialize, Debug, PartialEq, Clone, Default)]
pub struct LookupAirlineRecord {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(serde::Deserialize, Debug, PartialEq, Clone, Default)]
pub struct AirportRecord {
    #[serde(default)]
    pub icao: String,
    #[serde(default)]
    pub iata: String,
    #[serde(default)]
    pub muni: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub routing: Option<String>,
}
