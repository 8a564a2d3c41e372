use std::fmt;

/// Number of decimal places coordinates are rounded to (~1.1m at the equator)
pub const KEY_PRECISION: i32 = 5;

/// Cache key built from a coordinate pair rounded to [`KEY_PRECISION`] places
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build the key for a coordinate pair.
    ///
    /// Rounding is half away from zero, so GPS jitter below the fifth decimal
    /// collapses onto the same key.
    pub fn from_coords(latitude: f64, longitude: f64) -> Self {
        Self(format!("{},{}", round(latitude), round(longitude)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn round(value: f64) -> f64 {
    let scale = 10f64.powi(KEY_PRECISION);
    let rounded = (value * scale).round() / scale;
    // -0.0 would otherwise render as "-0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
