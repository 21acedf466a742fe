//! Meter/pixel conversion for the simulated display (96 DPI)

/// Pixels per meter
pub const METER_TO_PIXEL: f64 = 3779.52;

#[inline]
pub fn meters_to_pixels(m: f64) -> f64 {
    m * METER_TO_PIXEL
}

#[inline]
pub fn pixels_to_meters(px: f64) -> f64 {
    px / METER_TO_PIXEL
}
