use eframe::egui;

pub const AIRCRAFT_REFERENCE_SHAPE: [egui::Pos2; 4] = [
    egui::pos2(0.0, -10.0), // Nose
    egui::pos2(7.0, 8.0),   // Right Wing tip
    egui::pos2(0.0, 2.0),   // Tail center indentation
    egui::pos2(-7.0, 8.0),  // Left Wing tip
];

pub const INITIAL_LATITUDE: f64 = 51.505;
pub const INITIAL_LONGITUDE: f64 = -0.09;
pub const INITIAL_ZOOM: f64 = 7.0;

/// Pixels around an aircraft that still count as clicking it.
pub const CLICK_RADIUS: f32 = 14.0;

/// Matches the extrapolation tick so motion looks continuous.
pub const REPAINT_INTERVAL: std::time::Duration = std::time::Duration::from_millis(100);

pub const SELECTED_AIRCRAFT_COLOUR: egui::Color32 = egui::Color32::from_rgb(0xFF, 0x95, 0x00);
pub const AIRCRAFT_COLOUR: egui::Color32 = egui::Color32::BLACK;
// Alpha of unselected aircraft while another one is selected.
pub const DIMMED_ALPHA: u8 = 128;
