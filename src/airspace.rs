use crate::config::RouteConfig;
use crate::route::SelectedRoutes;
use crate::selection::Selection;
use crate::types::{ICAOAddress, TrackedEntity};

/// Registry of the aircraft currently tracked, plus the user's selection.
#[derive(Debug)]
pub struct Airspace {
    stale_after: chrono::TimeDelta,
    datetime: chrono::DateTime<chrono::Utc>,
    icao_to_aircraft_map: std::collections::HashMap<ICAOAddress, TrackedEntity>,
    selection: Option<Selection>,
}

impl Airspace {
    #[must_use]
    pub fn new(stale_after: chrono::TimeDelta) -> Self {
        Airspace {
            stale_after,
            datetime: chrono::Utc::now(),
            icao_to_aircraft_map: std::collections::HashMap::new(),
            selection: None,
        }
    }

    /// Replaces whatever was known about the aircraft. Returns `true` if it is new.
    pub fn update(&mut self, aircraft: TrackedEntity) -> bool {
        self.icao_to_aircraft_map
            .insert(aircraft.icao_address, aircraft)
            .is_none()
    }

    pub fn remove(&mut self, icao_address: ICAOAddress) -> Option<TrackedEntity> {
        if self
            .selection
            .as_ref()
            .is_some_and(|selection| selection.icao_address == icao_address)
        {
            self.selection = None;
        }
        self.icao_to_aircraft_map.remove(&icao_address)
    }

    /// Drops aircraft without an authoritative update since `now - stale_after`.
    pub fn prune_stale(&mut self, now: chrono::DateTime<chrono::Utc>) -> Vec<ICAOAddress> {
        self.datetime = now;
        let cutoff_time = now - self.stale_after;
        let stale: Vec<ICAOAddress> = self
            .icao_to_aircraft_map
            .values()
            .filter(|aircraft| aircraft.last_update < cutoff_time)
            .map(|aircraft| aircraft.icao_address)
            .collect();
        for icao_address in &stale {
            self.remove(*icao_address);
        }
        stale
    }

    #[must_use]
    pub fn get(&self, icao_address: ICAOAddress) -> Option<&TrackedEntity> {
        self.icao_to_aircraft_map.get(&icao_address)
    }

    pub fn get_mut(&mut self, icao_address: ICAOAddress) -> Option<&mut TrackedEntity> {
        self.icao_to_aircraft_map.get_mut(&icao_address)
    }

    #[must_use]
    pub fn get_datetime(&self) -> chrono::DateTime<chrono::Utc> {
        self.datetime
    }

    #[must_use]
    pub fn icao_to_aircraft_mapping(
        &self,
    ) -> &std::collections::HashMap<ICAOAddress, TrackedEntity> {
        &self.icao_to_aircraft_map
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.icao_to_aircraft_map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.icao_to_aircraft_map.is_empty()
    }

    /// Aircraft whose callsign, registration or type contains `query`,
    /// ignoring case, ordered by callsign. An empty query matches everything.
    #[must_use]
    pub fn filter(&self, query: &str) -> Vec<&TrackedEntity> {
        let query = query.trim().to_uppercase();
        let mut matches: Vec<&TrackedEntity> = self
            .icao_to_aircraft_map
            .values()
            .filter(|aircraft| {
                query.is_empty()
                    || [
                        Some(aircraft.callsign.as_str()),
                        aircraft.registration.as_deref(),
                        aircraft.aircraft_type.as_deref(),
                    ]
                    .into_iter()
                    .flatten()
                    .any(|field| field.to_uppercase().contains(&query))
            })
            .collect();
        matches.sort_by(|a, b| {
            a.callsign
                .cmp(&b.callsign)
                .then(a.icao_address.cmp(&b.icao_address))
        });
        matches
    }

    #[must_use]
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn selection_mut(&mut self) -> Option<&mut Selection> {
        self.selection.as_mut()
    }

    /// Selects a tracked aircraft. Returns `false` if it is not tracked.
    pub fn select(&mut self, icao_address: ICAOAddress) -> bool {
        let Some(aircraft) = self.icao_to_aircraft_map.get(&icao_address) else {
            return false;
        };
        self.selection = Some(Selection::new(icao_address, aircraft.callsign.clone()));
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Routes either side of the selected aircraft at its current position.
    #[must_use]
    pub fn selected_routes(&self, route_config: &RouteConfig) -> Option<SelectedRoutes> {
        let selection = self.selection.as_ref()?;
        let aircraft = self.icao_to_aircraft_map.get(&selection.icao_address)?;
        Some(SelectedRoutes::plot(
            selection.origin_position(),
            aircraft.position,
            selection.destination_position(),
            route_config.origin_style(),
            route_config.destination_style(),
        ))
    }
}

/// Write access to the shared airspace.
#[derive(Clone)]
pub struct AirspaceHandle {
    inner: std::sync::Arc<std::sync::RwLock<Airspace>>,
}

impl AirspaceHandle {
    #[must_use]
    pub fn new(airspace: Airspace) -> Self {
        AirspaceHandle {
            inner: std::sync::Arc::new(std::sync::RwLock::new(airspace)),
        }
    }

    #[must_use]
    pub fn get_airspace_viewer(&self) -> AirspaceViewer {
        AirspaceViewer {
            inner: self.inner.clone(),
        }
    }

    #[allow(clippy::missing_panics_doc)]
    pub fn write(&self) -> std::sync::RwLockWriteGuard<'_, Airspace> {
        self.inner.write().expect("Write lock poisoned")
    }

    #[allow(clippy::missing_panics_doc)]
    pub fn read(&self) -> std::sync::RwLockReadGuard<'_, Airspace> {
        self.inner.read().expect("Read lock poisoned")
    }
}

#[derive(Clone)]
pub struct AirspaceViewer {
    inner: std::sync::Arc<std::sync::RwLock<Airspace>>,
}
impl AirspaceViewer {
    #[allow(clippy::missing_panics_doc)]
    pub fn read(&self) -> std::sync::RwLockReadGuard<'_, Airspace> {
        self.inner.read().expect("Read lock poisoned")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::airspace::Airspace;
    use crate::config::RouteConfig;
    use crate::selection::{Airport, FlightDetails};
    use crate::types::{GeoPoint, ICAOAddress, TrackedEntity};

    pub(crate) fn create_dummy_aircraft(
        icao_address: u32,
        callsign: &str,
        last_update: chrono::DateTime<chrono::Utc>,
    ) -> TrackedEntity {
        TrackedEntity {
            icao_address: ICAOAddress::new(icao_address).unwrap(),
            callsign: String::from(callsign),
            registration: None,
            aircraft_type: None,
            position: GeoPoint::new(0.0, 0.0).unwrap(),
            heading: 0.0,
            ground_speed: 0.0,
            altitude: 0.0,
            last_update,
        }
    }

    fn airspace_with(aircraft: Vec<TrackedEntity>) -> Airspace {
        let mut airspace = Airspace::new(chrono::TimeDelta::seconds(60));
        for entry in aircraft {
            airspace.update(entry);
        }
        airspace
    }

    #[test]
    fn when_update_repeats_an_address_then_entry_is_overwritten() {
        let now = chrono::Utc::now();
        let mut airspace = Airspace::new(chrono::TimeDelta::seconds(60));

        assert!(airspace.update(create_dummy_aircraft(1, "BAW1", now)));
        let mut moved = create_dummy_aircraft(1, "BAW1", now);
        moved.position = GeoPoint::new(10.0, 10.0).unwrap();
        assert!(!airspace.update(moved.clone()));

        assert_eq!(airspace.len(), 1);
        assert_eq!(airspace.get(moved.icao_address), Some(&moved));
    }

    #[test]
    fn when_pruning_then_only_stale_aircraft_are_removed() {
        let now = chrono::Utc::now();
        let mut airspace = airspace_with(vec![
            create_dummy_aircraft(1, "FRESH", now - chrono::TimeDelta::seconds(10)),
            create_dummy_aircraft(2, "STALE", now - chrono::TimeDelta::seconds(61)),
        ]);

        let removed = airspace.prune_stale(now);

        assert_eq!(removed, vec![ICAOAddress::new(2).unwrap()]);
        assert_eq!(airspace.len(), 1);
        assert_eq!(airspace.get_datetime(), now);
    }

    #[cfg(test)]
    mod when_filtering {
        use super::*;

        fn fleet() -> Airspace {
            let now = chrono::Utc::now();
            let mut easyjet = create_dummy_aircraft(3, "EZY45", now);
            easyjet.aircraft_type = Some(String::from("A320"));
            let mut ryanair = create_dummy_aircraft(2, "RYR12", now);
            ryanair.registration = Some(String::from("EI-DCL"));
            airspace_with(vec![
                ryanair,
                easyjet,
                create_dummy_aircraft(1, "BAW117", now),
            ])
        }

        #[test]
        fn and_query_is_empty_then_all_aircraft_sorted_by_callsign() {
            let airspace = fleet();
            let callsigns: Vec<&str> = airspace
                .filter("")
                .iter()
                .map(|aircraft| aircraft.callsign.as_str())
                .collect();
            assert_eq!(callsigns, vec!["BAW117", "EZY45", "RYR12"]);
        }

        #[test]
        fn and_query_is_lowercase_then_matching_ignores_case() {
            let airspace = fleet();
            let matches = airspace.filter("ryr");
            assert_eq!(matches.len(), 1);
            assert_eq!(matches[0].callsign, "RYR12");
        }

        #[test]
        fn and_query_matches_registration_or_type_then_aircraft_is_included() {
            let airspace = fleet();
            assert_eq!(airspace.filter("ei-dcl")[0].callsign, "RYR12");
            assert_eq!(airspace.filter("A320")[0].callsign, "EZY45");
            assert!(airspace.filter("B744").is_empty());
        }
    }

    #[cfg(test)]
    mod when_selecting {
        use super::*;

        #[test]
        fn and_aircraft_untracked_then_selection_is_refused() {
            let mut airspace = airspace_with(vec![]);
            assert!(!airspace.select(ICAOAddress::new(9).unwrap()));
            assert!(airspace.selection().is_none());
        }

        #[test]
        fn and_selected_aircraft_is_removed_then_selection_is_cleared() {
            let now = chrono::Utc::now();
            let mut airspace = airspace_with(vec![create_dummy_aircraft(1, "BAW1", now)]);
            let address = ICAOAddress::new(1).unwrap();

            assert!(airspace.select(address));
            assert_eq!(airspace.selection().unwrap().callsign, "BAW1");
            airspace.remove(address);

            assert!(airspace.selection().is_none());
        }

        #[test]
        fn and_details_carry_airports_then_routes_are_plotted_from_current_position() {
            let now = chrono::Utc::now();
            let mut aircraft = create_dummy_aircraft(1, "BAW1", now);
            aircraft.position = GeoPoint::new(0.0, 10.0).unwrap();
            let mut airspace = airspace_with(vec![aircraft]);
            let address = ICAOAddress::new(1).unwrap();
            airspace.select(address);

            assert_eq!(
                airspace
                    .selected_routes(&RouteConfig::default())
                    .unwrap()
                    .progress,
                None
            );

            let airport = |code: &str, longitude: f64| Airport {
                icao: String::from(code),
                iata: String::new(),
                municipality: String::from(code),
                position: GeoPoint::new(0.0, longitude).ok(),
            };
            airspace.selection_mut().unwrap().details = Some(FlightDetails {
                origin: Some(airport("ORIG", 0.0)),
                destination: Some(airport("DEST", 40.0)),
                ..FlightDetails::default()
            });

            let routes = airspace
                .selected_routes(&RouteConfig::default())
                .expect("selection is tracked");
            let origin_leg = routes.from_origin.expect("origin known");
            assert_eq!(origin_leg.points.len(), 101);
            assert_eq!(origin_leg.style.opacity, 1.0);
            assert_eq!(routes.to_destination.unwrap().style.opacity, 0.5);
            assert!((routes.progress.unwrap() - 0.25).abs() < 1e-9);
        }
    }
}
