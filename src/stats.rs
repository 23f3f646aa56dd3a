//! Summary statistics over column values.
//!
//! All functions take the non-missing values of a column (see
//! [`Column::valid_numbers`](crate::table::Column::valid_numbers)) and return
//! `None` when the input is too small for the statistic to exist.

use std::cmp::Ordering;

/// Histogram bin count used for continuous columns.
pub const DEFAULT_BINS: usize = 30;
/// Evaluation points of a KDE curve.
pub const KDE_GRID_SIZE: usize = 200;
/// How many bandwidths the KDE grid extends past the data.
pub const KDE_CUT: f64 = 3.0;

const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Sample standard deviation (n - 1 in the denominator).
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Quantile with linear interpolation between closest ranks.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    Some(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}

fn cmp_values(a: &f64, b: &f64) -> Ordering {
    // -0.0 and 0.0 are the same category.
    if a == b { Ordering::Equal } else { a.total_cmp(b) }
}

/// Distinct values in ascending order.
pub fn sorted_unique(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(cmp_values);
    sorted.dedup_by(|a, b| a == b);
    sorted
}

pub fn distinct_count(values: &[f64]) -> usize {
    sorted_unique(values).len()
}

/// Occurrences of each distinct value, ascending by value.
pub fn value_counts(values: &[f64]) -> Vec<(f64, usize)> {
    let mut sorted = values.to_vec();
    sorted.sort_by(cmp_values);

    let mut counts: Vec<(f64, usize)> = Vec::new();
    for v in sorted {
        match counts.last_mut() {
            Some((last, n)) if *last == v => *n += 1,
            _ => counts.push((v, 1)),
        }
    }
    counts
}

/// Occurrences of each category.
///
/// Without an explicit `order` categories appear in order of first
/// occurrence. With one, exactly the listed categories are returned (count
/// may be zero) and values outside the list are dropped.
pub fn category_counts(values: &[Option<String>], order: Option<&[String]>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = match order {
        Some(order) => order.iter().map(|c| (c.clone(), 0)).collect(),
        None => Vec::new(),
    };

    for v in values.iter().flatten() {
        match counts.iter_mut().find(|(c, _)| c == v) {
            Some((_, n)) => *n += 1,
            None if order.is_none() => counts.push((v.clone(), 1)),
            None => {}
        }
    }
    counts
}

/// Histogram normalised so that the bar areas sum to one.
#[derive(Clone, Debug, PartialEq)]
pub struct DensityHistogram {
    /// `bins + 1` ascending bin edges.
    pub edges: Vec<f64>,
    pub density: Vec<f64>,
}

impl DensityHistogram {
    pub fn bin_width(&self) -> f64 {
        match self.edges.as_slice() {
            [a, b, ..] => b - a,
            _ => 0.0,
        }
    }
}

/// Equal-width bins over `[min, max]`; the last bin is closed on the right.
pub fn density_histogram(values: &[f64], bins: usize) -> Option<DensityHistogram> {
    if values.is_empty() || bins == 0 {
        return None;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return None;
    }
    let (lo, hi) = if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };

    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    let n = values.len() as f64;
    Some(DensityHistogram {
        edges: (0..=bins).map(|i| lo + i as f64 * width).collect(),
        density: counts.iter().map(|&c| c as f64 / (n * width)).collect(),
    })
}

/// Sampled Gaussian kernel density estimate.
#[derive(Clone, Debug, PartialEq)]
pub struct KdeCurve {
    pub bandwidth: f64,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

/// Scott's rule: sample std scaled by `n^(-1/5)`.
pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
    let sd = std_dev(values)?;
    let bw = sd * (values.len() as f64).powf(-0.2);
    (bw > 0.0 && bw.is_finite()).then_some(bw)
}

/// Evaluate a Gaussian KDE on `grid_size` points spanning the data plus
/// `cut` bandwidths on either side. `None` for constant or tiny samples.
pub fn gaussian_kde(values: &[f64], grid_size: usize, cut: f64) -> Option<KdeCurve> {
    let bandwidth = scott_bandwidth(values)?;
    if grid_size < 2 {
        return None;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let x_min = min - cut * bandwidth;
    let x_max = max + cut * bandwidth;

    let n = values.len() as f64;
    let step = (x_max - x_min) / (grid_size - 1) as f64;
    let xs: Vec<f64> = (0..grid_size).map(|i| x_min + i as f64 * step).collect();
    let ys = xs
        .iter()
        .map(|&x| {
            values
                .iter()
                .map(|&xi| {
                    let u = (x - xi) / bandwidth;
                    (-0.5 * u * u).exp() * INV_SQRT_2PI
                })
                .sum::<f64>()
                / (n * bandwidth)
        })
        .collect();

    Some(KdeCurve { bandwidth, xs, ys })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn basic_moments() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&v).unwrap(), 5.0);
        assert_relative_eq!(median(&v).unwrap(), 4.5);
        assert_relative_eq!(std_dev(&v).unwrap(), (32.0f64 / 7.0).sqrt());
        assert_eq!(mean(&[]), None);
        assert_eq!(std_dev(&[1.0]), None);
    }

    #[test]
    fn quantile_interpolates_linearly() {
        let v: Vec<f64> = (1..=5).map(f64::from).collect();
        assert_relative_eq!(quantile(&v, 0.0).unwrap(), 1.0);
        assert_relative_eq!(quantile(&v, 0.25).unwrap(), 2.0);
        assert_relative_eq!(quantile(&v, 0.1).unwrap(), 1.4);
        assert_relative_eq!(quantile(&v, 1.0).unwrap(), 5.0);
        assert_eq!(quantile(&v, 1.5), None);
    }

    #[test]
    fn unique_and_counts_are_sorted() {
        let v = [3.0, 1.0, 3.0, -0.0, 0.0, 2.0];
        assert_eq!(sorted_unique(&v).len(), 4);
        assert_eq!(distinct_count(&v), 4);
        assert_eq!(
            value_counts(&v),
            vec![(-0.0, 2), (1.0, 1), (2.0, 1), (3.0, 2)]
        );
    }

    #[test]
    fn categories_follow_first_appearance() {
        let v: Vec<Option<String>> = ["b", "a", "b", "c"]
            .iter()
            .map(|s| Some(s.to_string()))
            .chain([None])
            .collect();
        assert_eq!(
            category_counts(&v, None),
            vec![("b".into(), 2), ("a".into(), 1), ("c".into(), 1)]
        );

        let order = vec!["c".to_string(), "z".to_string(), "b".to_string()];
        assert_eq!(
            category_counts(&v, Some(&order)),
            vec![("c".into(), 1), ("z".into(), 0), ("b".into(), 2)]
        );
    }

    #[test]
    fn histogram_density_integrates_to_one() {
        let v: Vec<f64> = (0..100).map(|i| (i as f64 * 0.37).sin()).collect();
        let h = density_histogram(&v, 30).unwrap();
        assert_eq!(h.edges.len(), 31);
        let area: f64 = h.density.iter().map(|d| d * h.bin_width()).sum();
        assert_relative_eq!(area, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn histogram_of_constant_column_uses_unit_range() {
        let h = density_histogram(&[3.0, 3.0], 2).unwrap();
        assert_relative_eq!(h.edges[0], 2.5);
        assert_relative_eq!(h.edges[2], 3.5);
        assert_relative_eq!(h.density[1], 2.0);
    }

    #[test]
    fn kde_is_a_density() {
        let v = [1.0, 2.0, 2.5, 3.0, 7.0];
        let kde = gaussian_kde(&v, KDE_GRID_SIZE, KDE_CUT).unwrap();
        assert_eq!(kde.xs.len(), KDE_GRID_SIZE);
        let step = kde.xs[1] - kde.xs[0];
        let area: f64 = kde.ys.iter().sum::<f64>() * step;
        assert_relative_eq!(area, 1.0, epsilon = 1e-2);
        assert!(kde.xs[0] < 1.0 && *kde.xs.last().unwrap() > 7.0);
    }

    #[test]
    fn kde_skips_degenerate_samples() {
        assert!(gaussian_kde(&[4.0, 4.0, 4.0], KDE_GRID_SIZE, KDE_CUT).is_none());
        assert!(gaussian_kde(&[4.0], KDE_GRID_SIZE, KDE_CUT).is_none());
    }
}
