mod constants;

use crate::airspace::{Airspace, AirspaceViewer};
use crate::config::RouteConfig;
use crate::route::GreatCircleRoute;
use crate::selection::{Routing, Selection};
use crate::tracker::TrackerEvent;
use crate::types::{ICAOAddress, TrackedEntity};
use constants::{
    AIRCRAFT_COLOUR, AIRCRAFT_REFERENCE_SHAPE, CLICK_RADIUS, DIMMED_ALPHA, INITIAL_LATITUDE,
    INITIAL_LONGITUDE, INITIAL_ZOOM, REPAINT_INTERVAL, SELECTED_AIRCRAFT_COLOUR,
};
use eframe::{egui, epaint};
use walkers;

pub struct RadarApp {
    airspace_viewer: AirspaceViewer,
    event_sender: crossbeam_channel::Sender<TrackerEvent>,
    route_config: RouteConfig,
    tiles: walkers::HttpTiles,
    map_memory: walkers::MapMemory,
    filter: String,
    origin_input: String,
    destination_input: String,
    // aircraft the airport inputs were typed for
    inputs_for: Option<ICAOAddress>,
}

impl RadarApp {
    #[must_use]
    pub fn new(
        egui_ctx: egui::Context,
        airspace_viewer: AirspaceViewer,
        event_sender: crossbeam_channel::Sender<TrackerEvent>,
        route_config: RouteConfig,
    ) -> Self {
        let mut map_memory = walkers::MapMemory::default();
        let _ = map_memory.set_zoom(INITIAL_ZOOM);
        Self {
            tiles: walkers::HttpTiles::new(walkers::sources::OpenStreetMap, egui_ctx),
            map_memory,
            airspace_viewer,
            event_sender,
            route_config,
            filter: String::new(),
            origin_input: String::new(),
            destination_input: String::new(),
            inputs_for: None,
        }
    }

    fn send(&self, event: TrackerEvent) {
        if let Err(err) = self.event_sender.send(event) {
            log::error!("RadarApp: tracker is gone: {err}");
        }
    }

    fn show_aircraft_list(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.text_edit_singleline(&mut self.filter);
            if !self.filter.is_empty() && ui.button("✕").clicked() {
                self.filter.clear();
            }
        });
        ui.separator();

        let airspace = self.airspace_viewer.read();
        let mut clicked = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            for aircraft in airspace.filter(&self.filter) {
                if ui.selectable_label(false, list_entry(aircraft)).clicked() {
                    clicked = Some(aircraft.icao_address);
                }
            }
        });
        ui.separator();
        ui.label(format!("{} aircraft", airspace.len()));
        drop(airspace);

        if let Some(icao_address) = clicked {
            self.send(TrackerEvent::Select(icao_address));
        }
    }

    fn show_airport_inputs(&mut self, ui: &mut egui::Ui, selection: &Selection) {
        if self.inputs_for != Some(selection.icao_address) {
            self.origin_input.clear();
            self.destination_input.clear();
            self.inputs_for = Some(selection.icao_address);
        }

        let mut requested = Vec::new();
        ui.horizontal(|ui| {
            for (routing, input) in [
                (Routing::Origin, &mut self.origin_input),
                (Routing::Destination, &mut self.destination_input),
            ] {
                let response = ui.add(
                    egui::TextEdit::singleline(&mut *input)
                        .hint_text("IATA")
                        .char_limit(3)
                        .desired_width(40.0),
                );
                if response.changed() && input.chars().count() == 3 {
                    requested.push(TrackerEvent::RequestAirport(routing, input.clone()));
                }
            }
        });
        for event in requested {
            self.send(event);
        }
    }

    fn show_aircraft_details(
        &mut self,
        ui: &mut egui::Ui,
        airspace: &Airspace,
        selection: &Selection,
    ) {
        let Some(aircraft) = airspace.get(selection.icao_address) else {
            return;
        };

        ui.heading(&aircraft.callsign);
        if let Some(details) = &selection.details {
            if let Some(name) = details.display_airline_name() {
                ui.label(name);
            }
            if let Some(radio) = &details.radio {
                ui.label(egui::RichText::new(radio).italics());
            }
            ui.label(format!(
                "{} → {}",
                details.origin_label(),
                details.destination_label()
            ));
            if let Some(country) = &details.country {
                ui.label(format!("Registered in {country}"));
            }
        } else {
            ui.label("Looking up flight…");
        }
        self.show_airport_inputs(ui, selection);

        let routes = airspace.selected_routes(&self.route_config);
        if let Some(progress) = routes.and_then(|routes| routes.progress) {
            #[allow(clippy::cast_possible_truncation)]
            ui.add(egui::ProgressBar::new(progress as f32).show_percentage());
        }

        ui.separator();
        ui.label(format!(
            "{} {}",
            aircraft.registration.as_deref().unwrap_or_default(),
            aircraft.aircraft_type.as_deref().unwrap_or_default()
        ));
        ui.label(format!("Airline code {}", aircraft.airline_code()));
        ui.label(format!("{:.0} ft", aircraft.altitude));
        #[allow(clippy::cast_possible_truncation)]
        ui.add(
            egui::ProgressBar::new(aircraft.speed_gauge() as f32)
                .text(format!("{:.0} KTS", aircraft.ground_speed)),
        );
    }
}

fn list_entry(aircraft: &TrackedEntity) -> String {
    format!(
        "{}  {} {}  {:03.0}°  {:.0} KTS",
        aircraft.callsign,
        aircraft.registration.as_deref().unwrap_or_default(),
        aircraft.aircraft_type.as_deref().unwrap_or_default(),
        aircraft.heading,
        aircraft.ground_speed
    )
}

impl eframe::App for RadarApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.request_repaint_after(REPAINT_INTERVAL);

        egui::SidePanel::left("aircraft_panel")
            .resizable(true)
            .show(ctx, |ui| {
                let selection = self.airspace_viewer.read().selection().cloned();
                match selection {
                    Some(selection) => {
                        if ui.button("← Back").clicked() {
                            self.send(TrackerEvent::ClearSelection);
                        }
                        let viewer = self.airspace_viewer.clone();
                        let airspace = viewer.read();
                        self.show_aircraft_details(ui, &airspace, &selection);
                    }
                    None => self.show_aircraft_list(ui),
                }
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let my_position = walkers::lat_lon(INITIAL_LATITUDE, INITIAL_LONGITUDE);

                let mut map =
                    walkers::Map::new(Some(&mut self.tiles), &mut self.map_memory, my_position);

                let airspace_plugin = AirspacePlugin::new(
                    self.airspace_viewer.clone(),
                    self.event_sender.clone(),
                    self.route_config.clone(),
                );

                map = map
                    .zoom_with_ctrl(false)
                    .drag_pan_buttons(
                        egui::DragPanButtons::PRIMARY | egui::DragPanButtons::SECONDARY,
                    )
                    .with_plugin(airspace_plugin);

                map.show(ui, |_ui, _response, _projector, _map_memory| {})
            });
    }
}

pub struct AirspacePlugin {
    viewer: AirspaceViewer,
    event_sender: crossbeam_channel::Sender<TrackerEvent>,
    route_config: RouteConfig,
}
impl AirspacePlugin {
    #[must_use]
    pub fn new(
        viewer: AirspaceViewer,
        event_sender: crossbeam_channel::Sender<TrackerEvent>,
        route_config: RouteConfig,
    ) -> Self {
        AirspacePlugin {
            viewer,
            event_sender,
            route_config,
        }
    }
}

impl walkers::Plugin for AirspacePlugin {
    fn run(
        self: Box<Self>,
        ui: &mut egui::Ui,
        response: &egui::Response,
        projector: &walkers::Projector,
        _map_memory: &walkers::MapMemory,
    ) {
        let click_position = if response.clicked() {
            response.interact_pointer_pos()
        } else {
            None
        };
        let mut clicked_aircraft: Option<(ICAOAddress, f32)> = None;

        {
            let airspace = self.viewer.read();

            if let Some(routes) = airspace.selected_routes(&self.route_config) {
                for route in [routes.from_origin, routes.to_destination]
                    .iter()
                    .flatten()
                {
                    draw_route(ui, projector, route);
                }
            }

            let selected = airspace
                .selection()
                .map(|selection| selection.icao_address);

            for aircraft in airspace.icao_to_aircraft_mapping().values() {
                let current_position = projector
                    .project(walkers::lat_lon(
                        aircraft.position.latitude(),
                        aircraft.position.longitude(),
                    ))
                    .to_pos2();

                // don't draw if the aircraft is off-screen
                if !ui.max_rect().contains(current_position) {
                    continue;
                }

                if let Some(click) = click_position {
                    let distance = click.distance(current_position);
                    if distance <= CLICK_RADIUS
                        && clicked_aircraft.is_none_or(|(_, nearest)| distance < nearest)
                    {
                        clicked_aircraft = Some((aircraft.icao_address, distance));
                    }
                }

                let colour = match selected {
                    Some(icao_address) if icao_address == aircraft.icao_address => {
                        SELECTED_AIRCRAFT_COLOUR
                    }
                    Some(_) => AIRCRAFT_COLOUR.gamma_multiply(f32::from(DIMMED_ALPHA) / 255.0),
                    None => AIRCRAFT_COLOUR,
                };

                let aircraft_shape = apply_shape_on_point(
                    current_position,
                    &AIRCRAFT_REFERENCE_SHAPE,
                    #[allow(clippy::cast_possible_truncation)]
                    egui::emath::Rot2::from_angle(aircraft.heading.to_radians() as f32),
                );
                ui.painter().add(egui::Shape::convex_polygon(
                    aircraft_shape,
                    colour,
                    egui::epaint::PathStroke::new(1.0, colour),
                ));
            }
        }

        if click_position.is_some() {
            let event = match clicked_aircraft {
                Some((icao_address, _)) => TrackerEvent::Select(icao_address),
                None => TrackerEvent::ClearSelection,
            };
            if let Err(err) = self.event_sender.send(event) {
                log::error!("AirspacePlugin: tracker is gone: {err}");
            }
        }
    }
}

fn draw_route(ui: &egui::Ui, projector: &walkers::Projector, route: &GreatCircleRoute) {
    let [red, green, blue] = route.style.colour;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let alpha = (route.style.opacity * 255.0).round() as u8;
    let stroke = epaint::Stroke::new(
        route.style.weight,
        epaint::Color32::from_rgba_unmultiplied(red, green, blue, alpha),
    );

    for segment in route.segments() {
        let points: Vec<egui::Pos2> = segment
            .iter()
            .map(|point| {
                projector
                    .project(walkers::lat_lon(point.latitude(), point.longitude()))
                    .to_pos2()
            })
            .collect();
        if points.len() > 1 {
            ui.painter().add(egui::Shape::line(points, stroke));
        }
    }
}

fn apply_shape_on_point(
    center_point: egui::Pos2,
    raw_shape: &[egui::Pos2],
    rotation: egui::emath::Rot2,
) -> Vec<egui::Pos2> {
    raw_shape
        .iter()
        .map(|&shape_point| center_point + rotation * shape_point.to_vec2())
        .collect::<Vec<egui::Pos2>>()
}
