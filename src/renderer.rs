use crate::airspace::{Airspace, AirspaceViewer};
use crate::config::RouteConfig;
use crate::thread_manager::SteppableTask;

/// Logs a one-line summary of the airspace each step.
pub struct TerminalRenderer {
    viewer: AirspaceViewer,
    route_config: RouteConfig,
}

impl TerminalRenderer {
    #[must_use]
    pub fn new(viewer: AirspaceViewer, route_config: RouteConfig) -> Self {
        Self {
            viewer,
            route_config,
        }
    }
}

#[must_use]
pub fn summarise(airspace: &Airspace, route_config: &RouteConfig) -> String {
    let mut summary = format!("{} aircraft", airspace.len());

    let Some(selection) = airspace.selection() else {
        return summary;
    };
    let Some(aircraft) = airspace.get(selection.icao_address) else {
        return summary;
    };
    summary.push_str(&format!(
        " | {} at {} hdg {:.0} {:.0} KTS",
        aircraft.callsign, aircraft.position, aircraft.heading, aircraft.ground_speed
    ));
    if let Some(details) = &selection.details {
        summary.push_str(&format!(
            " {} -> {}",
            details.origin_label(),
            details.destination_label()
        ));
    }
    if let Some(progress) = airspace
        .selected_routes(route_config)
        .and_then(|routes| routes.progress)
    {
        summary.push_str(&format!(" ({:.0}%)", progress * 100.0));
    }
    summary
}

impl SteppableTask for TerminalRenderer {
    fn step(&mut self) -> bool {
        let airspace = self.viewer.read();
        log::info!("{}", summarise(&airspace, &self.route_config));
        true
    }
}
