use palette::Srgb;

// ---------------------------------------------------------------------------
// Heat colour map
// ---------------------------------------------------------------------------

/// Black → red → yellow → white ramp for a value in `[0, 1]`.
///
/// Same piecewise-linear channels as matplotlib's `gist_heat`.
pub fn heat(t: f64) -> Srgb<u8> {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let t = t as f32;
    let rgb = Srgb::new(
        (1.5 * t).min(1.0),
        (2.0 * t - 1.0).clamp(0.0, 1.0),
        (4.0 * t - 3.0).clamp(0.0, 1.0),
    );
    rgb.into_format()
}

/// Map `value` onto `[0, 1]` between `vmin` and `vmax`.
pub fn scale(value: f64, vmin: f64, vmax: f64) -> f64 {
    let range = vmax - vmin;
    if range.abs() < f64::EPSILON {
        0.0
    } else {
        (value - vmin) / range
    }
}
