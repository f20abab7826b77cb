//! Geometry around the antimeridian, the +180/-180 longitude seam.

/// The longitude of the seam on the same side as `lon`.
pub fn seam_longitude(lon: f64) -> f64 {
    if lon > 0.0 {
        180.0
    } else {
        -180.0
    }
}

/// Whether `lon` sits exactly on the seam.
pub fn on_seam(lon: f64) -> bool {
    lon.abs() == 180.0
}

/// Going from `lon1` to `lon2` across the seam, the share of the east-west distance covered
/// before reaching it. Both points must be on opposite sides near the seam.
pub fn share_before_seam(lon1: f64, lon2: f64) -> f64 {
    let w1 = 180.0 - lon1.abs();
    let w2 = 180.0 - lon2.abs();
    // Both points are already on the seam; everything happens after it
    if w1 + w2 == 0.0 {
        return 0.0;
    }
    w1 / (w1 + w2)
}

/// The latitude where the path from `(lon1, lat1)` to `(lon2, lat2)` meets the seam, going the
/// short way around.
pub fn crossing_latitude(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    share_before_seam(lon1, lon2) * (lat2 - lat1) + lat1
}
