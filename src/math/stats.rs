//! Statistical primitives over time series.
//!
//! Note: `median` may reorder the input slice.

use statrs::function::beta::beta_reg;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (ddof = 0).
pub fn std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|&v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// NaN entries are ignored; returns NaN when nothing is left.
pub fn median(values: &mut [f64]) -> f64 {
    let mut n = 0usize;
    for i in 0..values.len() {
        if !values[i].is_nan() {
            values.swap(n, i);
            n += 1;
        }
    }
    let values = &mut values[..n];
    if values.is_empty() {
        return f64::NAN;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}

/// Pearson correlation. `None` when the lengths differ, fewer than two samples are
/// given, either series holds a non-finite value, or either series is constant.
pub fn pearson<'a, I, J>(x: I, y: J) -> Option<f64>
where
    I: IntoIterator<Item = &'a f64>,
    J: IntoIterator<Item = &'a f64>,
    I::IntoIter: ExactSizeIterator + Clone,
    J::IntoIter: ExactSizeIterator + Clone,
{
    let x = x.into_iter();
    let y = y.into_iter();
    let n = x.len();
    if n != y.len() || n < 2 {
        return None;
    }
    if !is_varying(x.clone()) || !is_varying(y.clone()) {
        return None;
    }
    let mx = x.clone().sum::<f64>() / n as f64;
    let my = y.clone().sum::<f64>() / n as f64;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (&a, &b) in x.zip(y) {
        let dx = a - mx;
        let dy = b - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

/// All values finite and not all equal to the first. A constant series is detected by
/// comparison, not by its sum of squares, which keeps a roundoff residual.
pub fn is_varying<'a>(mut values: impl Iterator<Item = &'a f64>) -> bool {
    let Some(&first) = values.next() else {
        return false;
    };
    if !first.is_finite() {
        return false;
    }
    let mut varying = false;
    for &v in values {
        if !v.is_finite() {
            return false;
        }
        if v != first {
            varying = true;
        }
    }
    varying
}

/// Two-sided p-value for a Pearson `r` over `n` samples (Student t, n - 2 df).
pub fn pearson_p_value(r: f64, n: usize) -> f64 {
    if r.is_nan() || n < 2 {
        return f64::NAN;
    }
    if n == 2 {
        return 1.0;
    }
    let df = (n - 2) as f64;
    let r2 = r * r;
    if r2 >= 1.0 {
        return 0.0;
    }
    // P(|T| > t) = I_{df / (df + t^2)}(df / 2, 1 / 2), with t^2 = df r^2 / (1 - r^2).
    let x = (1.0 - r2).clamp(0.0, 1.0);
    beta_reg(df / 2.0, 0.5, x)
}

/// In-place z-score (ddof = 0). Returns `false` and leaves the data untouched for a constant
/// or non-finite series.
pub fn zscore_inplace(values: &mut [f64]) -> bool {
    if !is_varying(values.iter()) {
        return false;
    }
    let m = mean(values);
    let s = std(values);
    for v in values.iter_mut() {
        *v = (*v - m) / s;
    }
    true
}
