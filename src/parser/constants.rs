pub const ORIGIN_ROUTING: &str = "origin";
pub const DESTINATION_ROUTING: &str = "destination";
