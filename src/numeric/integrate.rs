use ndarray::ArrayView1;

/// Integrate `y(x)` assuming `y` is a power law between consecutive samples.
///
/// Exact for power laws, which makes it the right rule for spectra sampled on
/// log-spaced frequency grids. A segment with a non-positive endpoint has no
/// power-law form and is integrated with the trapezoid rule instead.
///
/// `x` must be strictly increasing and positive, with `y` of the same length.
pub fn integrate_loglog(x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
    debug_assert_eq!(x.len(), y.len(), "x and y must have equal length");
    (1..x.len())
        .map(|i| power_law_segment(x[i - 1], x[i], y[i - 1], y[i]))
        .sum()
}

fn power_law_segment(x1: f64, x2: f64, y1: f64, y2: f64) -> f64 {
    if y1 <= 0.0 || y2 <= 0.0 {
        return 0.5 * (y1 + y2) * (x2 - x1);
    }
    let log_ratio = (x2 / x1).ln();
    let slope = (y2 / y1).ln() / log_ratio;
    if (slope + 1.0).abs() < 1e-10 {
        // y ~ 1/x
        y1 * x1 * log_ratio
    } else {
        (x2 * y2 - x1 * y1) / (slope + 1.0)
    }
}
