#[derive(Debug, PartialEq, Clone, Copy)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    pub const MAX_LATITUDE: f64 = 90.0;
    pub const MAX_LONGITUDE: f64 = 180.0;

    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoPointError> {
        if !latitude.is_finite() || latitude.abs() > Self::MAX_LATITUDE {
            return Err(GeoPointError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || longitude.abs() > Self::MAX_LONGITUDE {
            return Err(GeoPointError::InvalidLongitude(longitude));
        }
        Ok(GeoPoint {
            latitude,
            longitude,
        })
    }

    /// Builds a point from coordinates that may have drifted out of range,
    /// clamping latitude and wrapping longitude.
    #[must_use]
    pub fn normalised(latitude: f64, longitude: f64) -> Self {
        let latitude = latitude.clamp(-Self::MAX_LATITUDE, Self::MAX_LATITUDE);
        let longitude = if longitude.abs() > Self::MAX_LONGITUDE {
            (longitude + Self::MAX_LONGITUDE).rem_euclid(2.0 * Self::MAX_LONGITUDE)
                - Self::MAX_LONGITUDE
        } else {
            longitude
        };
        GeoPoint {
            latitude,
            longitude,
        }
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

#[derive(Debug, PartialEq)]
pub enum GeoPointError {
    InvalidLatitude(f64),
    InvalidLongitude(f64),
}
impl std::fmt::Display for GeoPointError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoPointError::InvalidLatitude(value) => {
                write!(f, "Latitude {value} outside of [-90, 90]")
            }
            GeoPointError::InvalidLongitude(value) => {
                write!(f, "Longitude {value} outside of [-180, 180]")
            }
        }
    }
}
impl std::error::Error for GeoPointError {}

#[derive(Debug, PartialEq, Clone)]
pub struct TrackedEntity {
    pub icao_address: ICAOAddress,
    pub callsign: String,
    pub registration: Option<String>,
    pub aircraft_type: Option<String>,
    pub position: GeoPoint,
    pub heading: f64,
    pub ground_speed: f64,
    pub altitude: f64,
    pub last_update: chrono::DateTime<chrono::Utc>,
}

impl TrackedEntity {
    /// Fraction of the speed gauge, bounded to `[0, 1]` over 600 knots.
    #[must_use]
    pub fn speed_gauge(&self) -> f64 {
        (self.ground_speed / 600.0).clamp(0.0, 1.0)
    }

    /// Three-letter airline designator used to pick a logo.
    #[must_use]
    pub fn airline_code(&self) -> &str {
        self.callsign.get(..3).unwrap_or(&self.callsign)
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Eq, Hash, PartialOrd, Ord)]
pub struct ICAOAddress(u32);

impl ICAOAddress {
    pub const MAX_VALUE: u32 = 0x00FF_FFFF;

    pub fn new(value: u32) -> Result<Self, ICAOAddressError> {
        if value <= Self::MAX_VALUE {
            Ok(ICAOAddress(value))
        } else {
            Err(ICAOAddressError::InvalidAddress(value))
        }
    }

    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl std::str::FromStr for ICAOAddress {
    type Err = ICAOAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.len() > 6 {
            return Err(ICAOAddressError::InvalidHexFormat(s.to_string()));
        }
        let value = u32::from_str_radix(trimmed, 16)
            .map_err(|_| ICAOAddressError::InvalidHexFormat(s.to_string()))?;
        ICAOAddress::new(value)
    }
}

impl std::fmt::Display for ICAOAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:06x}", self.0)
    }
}

#[derive(Debug, PartialEq)]
pub enum ICAOAddressError {
    InvalidHexFormat(String),
    InvalidAddress(u32),
}
impl std::fmt::Display for ICAOAddressError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ICAOAddressError::InvalidHexFormat(string) => {
                write!(f, "Invalid hexadecimal format: '{string}'")
            }
            ICAOAddressError::InvalidAddress(val) => {
                write!(
                    f,
                    "Value 0x{:X} ({}) exceeds 24-bit ICAO address limit (0x{:X})",
                    val,
                    val,
                    ICAOAddress::MAX_VALUE
                )
            }
        }
    }
}
impl std::error::Error for ICAOAddressError {}
