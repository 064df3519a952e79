use ndarray::{Array1, ArrayView1};

/// Linear interpolation in log-log space.
///
/// Points outside `[x[0], x[n-1]]` are extrapolated along the power law of the
/// nearest edge segment. Where a segment has a non-positive `y` endpoint the
/// interpolation is linear in `x` for that segment.
///
/// `x` must be strictly increasing and positive.
pub fn interp_loglog(x: ArrayView1<f64>, y: ArrayView1<f64>, xnew: ArrayView1<f64>) -> Array1<f64> {
    debug_assert_eq!(x.len(), y.len(), "x and y must have equal length");
    match x.len() {
        0 => Array1::from_elem(xnew.len(), f64::NAN),
        1 => Array1::from_elem(xnew.len(), y[0]),
        _ => xnew.mapv(|xv| interp_one(&x, &y, xv)),
    }
}

fn interp_one(x: &ArrayView1<f64>, y: &ArrayView1<f64>, xv: f64) -> f64 {
    let lo = segment_index(x, xv);
    let hi = lo + 1;
    let (x1, x2, y1, y2) = (x[lo], x[hi], y[lo], y[hi]);

    if y1 > 0.0 && y2 > 0.0 && xv > 0.0 {
        let t = (xv / x1).ln() / (x2 / x1).ln();
        (y1.ln() + t * (y2 / y1).ln()).exp()
    } else {
        y1 + (xv - x1) * (y2 - y1) / (x2 - x1)
    }
}

/// Index `lo` of the segment `[x[lo], x[lo + 1]]` used for `xv`, clamped to
/// the first/last segment when `xv` is out of range.
fn segment_index(x: &ArrayView1<f64>, xv: f64) -> usize {
    let mut lo = 0;
    let mut hi = x.len() - 1;
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if x[mid] > xv {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    lo
}
