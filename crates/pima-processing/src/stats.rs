//! Descriptive statistics over plain `f64` slices.
//!
//! Callers pass present, finite values only. Quantiles use
//! linear interpolation between the two bracketing order statistics, the
//! default of pandas and NumPy, so clip fences match what a statistics
//! package reports for the same column.

/// Return a sorted copy of `values`.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Median of `values`: the middle value for an odd count, the mean of the
/// two middle values for an even count. `None` when empty.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sorted = sorted(values);
    let n = sorted.len();
    if n % 2 == 1 {
        Some(sorted[n / 2])
    } else {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    }
}

/// The `p`-th quantile of already sorted data, linear method.
///
/// With `h = p·(n−1)`, `j = ⌊h⌋` and `t = h − j`, the result lies between
/// `x[j]` and `x[j+1]` at fraction `t`. The interpolation is anchored on
/// the nearer neighbour, as NumPy does, so the result is bit-identical to
/// `numpy.quantile(..., method="linear")`.
///
/// Returns `None` for empty input or `p` outside `[0, 1]`.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 || !(0.0..=1.0).contains(&p) {
        return None;
    }
    if n == 1 {
        return Some(sorted[0]);
    }

    let h = (n - 1) as f64 * p;
    let j = h.floor() as usize;
    if j + 1 >= n {
        return Some(sorted[n - 1]);
    }

    let t = h - h.floor();
    let (a, b) = (sorted[j], sorted[j + 1]);
    let diff = b - a;
    if t < 0.5 {
        Some(a + diff * t)
    } else {
        Some(b - diff * (1.0 - t))
    }
}

/// The `p`-th quantile of unsorted data, linear method.
pub fn quantile(values: &[f64], p: f64) -> Option<f64> {
    quantile_sorted(&sorted(values), p)
}

/// Arithmetic mean. `None` when empty.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n − 1 denominator). `None` below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    Some(variance.sqrt())
}

/// Pearson correlation coefficient of two equal-length samples.
///
/// `None` when the lengths differ, fewer than two pairs exist, or either
/// sample has zero variance.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let mean_x = mean(x)?;
    let mean_y = mean(y)?;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}
