use crate::geometry::{self, Geodesic};
use crate::types::GeoPoint;

pub const ROUTE_SEGMENTS: usize = 100;

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct RouteStyle {
    pub colour: [u8; 3],
    pub weight: f32,
    pub opacity: f32,
}

impl Default for RouteStyle {
    fn default() -> Self {
        RouteStyle {
            colour: [0xFF, 0x95, 0x00],
            weight: 2.0,
            opacity: 1.0,
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct GreatCircleRoute {
    pub points: Vec<GeoPoint>,
    /// Metres.
    pub distance: f64,
    pub style: RouteStyle,
}

/// Samples the geodesic between `start` and `end` at every hundredth of the way.
///
/// Coincident endpoints give a single point and zero distance. Antipodal
/// endpoints have no unique geodesic, so only the endpoints are returned.
#[must_use]
pub fn great_circle_route(start: GeoPoint, end: GeoPoint, style: RouteStyle) -> GreatCircleRoute {
    let angle = geometry::central_angle(start, end);

    let (points, distance) = match geometry::classify(angle) {
        Geodesic::Coincident => (vec![start], 0.0),
        Geodesic::Antipodal => (vec![start, end], geometry::EARTH_RADIUS_METRES * angle),
        Geodesic::Defined { angle } => {
            let points = (0..=ROUTE_SEGMENTS)
                .map(|step| {
                    #[allow(clippy::cast_precision_loss)]
                    let ratio = step as f64 / ROUTE_SEGMENTS as f64;
                    geometry::intermediate_point(start, end, angle, ratio)
                })
                .collect();
            (points, geometry::EARTH_RADIUS_METRES * angle)
        }
    };

    GreatCircleRoute {
        points,
        distance,
        style,
    }
}

impl GreatCircleRoute {
    /// Splits the line wherever it crosses the antimeridian so that a flat
    /// map does not draw a segment across the whole world.
    #[must_use]
    pub fn segments(&self) -> Vec<&[GeoPoint]> {
        let mut segments = Vec::new();
        let mut segment_start = 0;
        for (index, pair) in self.points.windows(2).enumerate() {
            if (pair[1].longitude() - pair[0].longitude()).abs() > GeoPoint::MAX_LONGITUDE {
                segments.push(&self.points[segment_start..=index]);
                segment_start = index + 1;
            }
        }
        if segment_start < self.points.len() {
            segments.push(&self.points[segment_start..]);
        }
        segments
    }
}

/// Share of the journey flown, from the two legs either side of the aircraft.
#[must_use]
pub fn progress(from_origin: &GreatCircleRoute, to_destination: &GreatCircleRoute) -> f64 {
    let total = from_origin.distance + to_destination.distance;
    if total > 0.0 {
        from_origin.distance / total
    } else {
        0.0
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct SelectedRoutes {
    pub from_origin: Option<GreatCircleRoute>,
    pub to_destination: Option<GreatCircleRoute>,
    pub progress: Option<f64>,
}

impl SelectedRoutes {
    #[must_use]
    pub fn plot(
        origin: Option<GeoPoint>,
        current: GeoPoint,
        destination: Option<GeoPoint>,
        origin_style: RouteStyle,
        destination_style: RouteStyle,
    ) -> Self {
        let from_origin = origin.map(|origin| great_circle_route(origin, current, origin_style));
        let to_destination = destination
            .map(|destination| great_circle_route(current, destination, destination_style));

        let progress = match (&from_origin, &to_destination) {
            (Some(from_origin), Some(to_destination)) => {
                Some(progress(from_origin, to_destination))
            }
            _ => None,
        };

        SelectedRoutes {
            from_origin,
            to_destination,
            progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{great_circle_route, RouteStyle, SelectedRoutes, ROUTE_SEGMENTS};
    use crate::geometry;
    use crate::types::GeoPoint;

    const TOLERANCE: f64 = 1e-9;

    fn point(latitude: f64, longitude: f64) -> GeoPoint {
        GeoPoint::new(latitude, longitude).expect("valid test coordinates")
    }

    fn assert_close(actual: GeoPoint, expected: GeoPoint) {
        assert!(
            (actual.latitude() - expected.latitude()).abs() < TOLERANCE
                && (actual.longitude() - expected.longitude()).abs() < TOLERANCE,
            "{actual} is not {expected}"
        );
    }

    #[test]
    fn when_plotting_distinct_points_then_route_has_101_points_from_start_to_end() {
        let london = point(51.5074, -0.1278);
        let new_york = point(40.7128, -74.0060);

        let route = great_circle_route(london, new_york, RouteStyle::default());

        assert_eq!(route.points.len(), ROUTE_SEGMENTS + 1);
        assert_close(route.points[0], london);
        assert_close(route.points[ROUTE_SEGMENTS], new_york);
        assert!((route.distance - geometry::distance(london, new_york)).abs() < 1e-6);
    }

    #[test]
    fn when_plotting_transatlantic_route_then_midpoint_bows_north() {
        let london = point(51.5074, -0.1278);
        let new_york = point(40.7128, -74.0060);

        let route = great_circle_route(london, new_york, RouteStyle::default());

        assert!(route.points[50].latitude() > 51.5074);
    }

    #[test]
    fn when_plotting_across_antimeridian_then_longitudes_stay_in_range() {
        let tokyo = point(35.6762, 139.6503);
        let anchorage = point(61.2181, -149.9003);

        let route = great_circle_route(tokyo, anchorage, RouteStyle::default());

        assert!(route
            .points
            .iter()
            .all(|point| point.longitude().abs() <= 180.0 && point.latitude().is_finite()));
    }

    #[test]
    fn when_route_crosses_antimeridian_then_it_is_split_into_two_segments() {
        let route = great_circle_route(point(35.0, 170.0), point(40.0, -170.0), RouteStyle::default());

        let segments = route.segments();

        assert_eq!(segments.len(), 2);
        assert_eq!(
            segments.iter().map(|segment| segment.len()).sum::<usize>(),
            ROUTE_SEGMENTS + 1
        );
        assert!(segments[0].iter().all(|point| point.longitude() > 0.0));
        assert!(segments[1].iter().all(|point| point.longitude() < 0.0));
    }

    #[test]
    fn when_route_stays_on_one_side_then_it_is_a_single_segment() {
        let route = great_circle_route(point(51.5, -0.1), point(40.7, -74.0), RouteStyle::default());
        assert_eq!(route.segments().len(), 1);
    }

    #[test]
    fn when_points_coincide_then_single_point_and_zero_distance() {
        let gatwick = point(51.1537, -0.1821);

        let route = great_circle_route(gatwick, gatwick, RouteStyle::default());

        assert_eq!(route.points, vec![gatwick]);
        assert_eq!(route.distance, 0.0);
    }

    #[test]
    fn when_points_are_antipodal_then_no_nan_is_produced() {
        let start = point(0.0, 0.0);
        let end = point(0.0, 180.0);

        let route = great_circle_route(start, end, RouteStyle::default());

        assert_eq!(route.points, vec![start, end]);
        assert!(route.distance.is_finite());
        assert!(route.distance > 0.0);
    }

    #[test]
    fn when_style_is_given_then_it_is_carried_on_the_route() {
        let style = RouteStyle {
            opacity: 0.5,
            ..RouteStyle::default()
        };
        let route = great_circle_route(point(0.0, 0.0), point(10.0, 10.0), style);
        assert_eq!(route.style, style);
    }

    #[cfg(test)]
    mod when_plotting_selected_routes {
        use super::*;

        #[test]
        fn and_both_airports_known_then_progress_is_origin_share() {
            let origin = point(0.0, 0.0);
            let current = point(0.0, 10.0);
            let destination = point(0.0, 40.0);

            let routes = SelectedRoutes::plot(
                Some(origin),
                current,
                Some(destination),
                RouteStyle::default(),
                RouteStyle::default(),
            );

            let progress = routes.progress.expect("both legs plotted");
            assert!((progress - 0.25).abs() < 1e-9);
        }

        #[test]
        fn and_destination_unknown_then_progress_is_absent() {
            let routes = SelectedRoutes::plot(
                Some(point(0.0, 0.0)),
                point(0.0, 10.0),
                None,
                RouteStyle::default(),
                RouteStyle::default(),
            );

            assert!(routes.from_origin.is_some());
            assert!(routes.to_destination.is_none());
            assert_eq!(routes.progress, None);
        }

        #[test]
        fn and_aircraft_sits_on_both_airports_then_progress_is_zero() {
            let here = point(10.0, 10.0);
            let routes = SelectedRoutes::plot(
                Some(here),
                here,
                Some(here),
                RouteStyle::default(),
                RouteStyle::default(),
            );
            assert_eq!(routes.progress, Some(0.0));
        }
    }
}
