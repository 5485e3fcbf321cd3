//! Canvas sizing
//!
//! The canvas backing store follows the device pixel ratio (clamped). The
//! shader stretches the design rectangle over whatever size results.

/// Backing-store size for a canvas of `client_w` x `client_h` CSS pixels
pub fn canvas_size(client_w: f64, client_h: f64, dpr: f64, max_dpr: f64) -> (u32, u32) {
    let dpr = if dpr.is_finite() { dpr } else { 1.0 };
    let dpr = dpr.clamp(1.0, max_dpr.max(1.0));
    let w = (client_w.max(0.0) * dpr).floor() as u32;
    let h = (client_h.max(0.0) * dpr).floor() as u32;
    (w, h)
}
