//! Spherical geometry shared by route plotting and dead-reckoning.

use crate::types::GeoPoint;

pub const EARTH_RADIUS_METRES: f64 = 6_371e3;
pub const METRES_PER_DEGREE_LATITUDE: f64 = 111_111.0;

// Below this the sine of the central angle is treated as zero.
const DEGENERATE_ANGLE_EPSILON: f64 = 1e-12;
const POLE_EPSILON: f64 = 1e-9;

/// Central angle in radians between two points, from the haversine formula.
#[must_use]
pub fn central_angle(start: GeoPoint, end: GeoPoint) -> f64 {
    let lat1 = start.latitude().to_radians();
    let lat2 = end.latitude().to_radians();
    let delta_lat = lat2 - lat1;
    let delta_lng = (end.longitude() - start.longitude()).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    // rounding can push `a` a hair past 1 for near-antipodal points
    let a = a.clamp(0.0, 1.0);
    2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Great-circle distance in metres.
#[must_use]
pub fn distance(start: GeoPoint, end: GeoPoint) -> f64 {
    EARTH_RADIUS_METRES * central_angle(start, end)
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Geodesic {
    Coincident,
    Antipodal,
    Defined { angle: f64 },
}

#[must_use]
pub fn classify(angle: f64) -> Geodesic {
    if angle.sin().abs() > DEGENERATE_ANGLE_EPSILON {
        Geodesic::Defined { angle }
    } else if angle < std::f64::consts::FRAC_PI_2 {
        Geodesic::Coincident
    } else {
        Geodesic::Antipodal
    }
}

/// Point at `ratio` (0 = start, 1 = end) along the geodesic subtending `angle`.
///
/// Callers must have checked that the geodesic is [`Geodesic::Defined`];
/// `angle` is only used through `sin`, so a degenerate angle yields NaN.
#[must_use]
pub fn intermediate_point(start: GeoPoint, end: GeoPoint, angle: f64, ratio: f64) -> GeoPoint {
    let lat1 = start.latitude().to_radians();
    let lng1 = start.longitude().to_radians();
    let lat2 = end.latitude().to_radians();
    let lng2 = end.longitude().to_radians();

    let sin_angle = angle.sin();
    let a = ((1.0 - ratio) * angle).sin() / sin_angle;
    let b = (ratio * angle).sin() / sin_angle;

    let x = a * lat1.cos() * lng1.cos() + b * lat2.cos() * lng2.cos();
    let y = a * lat1.cos() * lng1.sin() + b * lat2.cos() * lng2.sin();
    let z = a * lat1.sin() + b * lat2.sin();

    let latitude = z.atan2((x * x + y * y).sqrt()).to_degrees();
    let longitude = y.atan2(x).to_degrees();
    GeoPoint::normalised(latitude, longitude)
}

/// One planar dead-reckoning step of `metres` along `heading_radians`.
#[must_use]
pub fn project(position: GeoPoint, heading_radians: f64, metres: f64) -> GeoPoint {
    let change_in_latitude = heading_radians.cos() * (metres / METRES_PER_DEGREE_LATITUDE);

    let latitude_cosine = position.latitude().to_radians().cos();
    let change_in_longitude = if latitude_cosine.abs() < POLE_EPSILON {
        0.0
    } else {
        heading_radians.sin() * (metres / (METRES_PER_DEGREE_LATITUDE * latitude_cosine))
    };

    GeoPoint::normalised(
        position.latitude() + change_in_latitude,
        position.longitude() + change_in_longitude,
    )
}
