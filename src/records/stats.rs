use serde::Serialize;

use crate::core::{SessionRecord, Theme};

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; absent below two values.
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl Describe {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std = (count > 1).then(|| {
            let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            variance.sqrt()
        });

        Some(Self {
            count,
            mean,
            std,
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted[count - 1],
        })
    }
}

/// Linear interpolation between closest ranks. `sorted` must be non-empty and ascending.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Number of equal-width bins in the jump distribution.
pub const HISTOGRAM_BINS: usize = 10;

/// One bar of a histogram, covering `[start, end)`. The last bin also holds `end`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width bins spanning the data. A constant column is widened to
/// `value ± 0.5` so it still gets `bins` bars.
pub fn histogram(values: &[f64], bins: usize) -> Vec<Bin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let (mut low, mut high) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if low == high {
        low -= 0.5;
        high += 0.5;
    }

    let width = (high - low) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &value in values {
        let index = (((value - low) / width) as usize).min(bins - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            start: low + width * i as f64,
            end: if i + 1 == bins { high } else { low + width * (i + 1) as f64 },
            count,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeShare {
    pub theme: Theme,
    pub games: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeScores {
    pub theme: Theme,
    pub score: Describe,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub games: usize,
    pub total_jump: Option<Describe>,
    pub score: Option<Describe>,
    pub level: Option<Describe>,
    pub theme_distribution: Vec<ThemeShare>,
    pub score_by_theme: Vec<ThemeScores>,
    pub jumps_time_correlation: Option<f64>,
    pub jump_distribution: Vec<Bin>,
}

impl Summary {
    pub fn from_records(records: &[SessionRecord]) -> Self {
        let column = |f: fn(&SessionRecord) -> f64| records.iter().map(f).collect::<Vec<f64>>();

        let jumps = column(|r| r.total_jump as f64);
        let times = column(|r| r.time_played);

        let theme_distribution = Theme::ALL
            .iter()
            .map(|&theme| {
                let games = records.iter().filter(|r| r.theme == theme).count();
                let percentage = if records.is_empty() {
                    0.0
                } else {
                    games as f64 * 100.0 / records.len() as f64
                };
                ThemeShare { theme, games, percentage }
            })
            .collect();

        let score_by_theme = Theme::ALL
            .iter()
            .filter_map(|&theme| {
                let scores: Vec<f64> = records
                    .iter()
                    .filter(|r| r.theme == theme)
                    .map(|r| r.score as f64)
                    .collect();
                Describe::from_values(&scores).map(|score| ThemeScores { theme, score })
            })
            .collect();

        Self {
            games: records.len(),
            total_jump: Describe::from_values(&jumps),
            score: Describe::from_values(&column(|r| r.score as f64)),
            level: Describe::from_values(&column(|r| r.level as f64)),
            theme_distribution,
            score_by_theme,
            jumps_time_correlation: pearson(&jumps, &times),
            jump_distribution: histogram(&jumps, HISTOGRAM_BINS),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.games == 0
    }
}

/// Pearson correlation coefficient. `None` for fewer than two pairs or a constant column.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }

    let mean_x = xs[..n].iter().sum::<f64>() / n as f64;
    let mean_y = ys[..n].iter().sum::<f64>() / n as f64;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs[..n].iter().zip(&ys[..n]) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(covariance / (var_x.sqrt() * var_y.sqrt()))
}
