//! Quantile classification of population density.

use seattle_access_models::PolygonFeature;
use strum_macros::{AsRefStr, Display};

/// Percentiles the five class breaks sit at.
const BREAK_PERCENTILES: [f64; 5] = [0.1, 0.3, 0.5, 0.7, 0.9];

/// One of six density classes, or no density at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum DensityClass {
    /// At or below the 10th percentile.
    Lowest,
    /// At or below the 30th percentile.
    Low,
    /// At or below the median.
    Medium,
    /// At or below the 70th percentile.
    High,
    /// At or below the 90th percentile.
    Higher,
    /// Above the 90th percentile.
    Highest,
    /// No usable `density` property.
    Missing,
}

impl DensityClass {
    /// Fill color, light to dark blue.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Lowest => "#f1eef6",
            Self::Low => "#d0d1e6",
            Self::Medium => "#a6bddb",
            Self::High => "#74a9cf",
            Self::Higher => "#2b8cbe",
            Self::Highest => "#045a8d",
            Self::Missing => "#eee",
        }
    }

    const BY_RANK: [Self; 6] = [
        Self::Lowest,
        Self::Low,
        Self::Medium,
        Self::High,
        Self::Higher,
        Self::Highest,
    ];
}

/// Class breaks computed from one collection of population polygons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityBreaks {
    breaks: [f64; 5],
}

impl DensityBreaks {
    /// Computes breaks over every finite density in `features`.
    ///
    /// With no densities at all, every break is 0.
    #[must_use]
    pub fn from_features(features: &[PolygonFeature]) -> Self {
        let mut densities: Vec<f64> = features.iter().filter_map(PolygonFeature::density).collect();
        densities.sort_by(f64::total_cmp);
        Self::from_sorted(&densities)
    }

    fn from_sorted(sorted: &[f64]) -> Self {
        let quantile = |p: f64| {
            if sorted.is_empty() {
                return 0.0;
            }
            #[allow(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                clippy::cast_precision_loss
            )]
            let index = (p * (sorted.len() - 1) as f64).floor() as usize;
            sorted[index.min(sorted.len() - 1)]
        };

        Self {
            breaks: BREAK_PERCENTILES.map(quantile),
        }
    }

    /// The five break values in ascending order.
    #[must_use]
    pub const fn breaks(&self) -> [f64; 5] {
        self.breaks
    }

    /// Classifies a density. A value equal to a break falls in the lower
    /// class.
    #[must_use]
    pub fn classify(&self, density: Option<f64>) -> DensityClass {
        let Some(density) = density.filter(|d| d.is_finite()) else {
            return DensityClass::Missing;
        };

        let rank = self
            .breaks
            .iter()
            .position(|&limit| density <= limit)
            .unwrap_or(self.breaks.len());
        DensityClass::BY_RANK[rank]
    }
}
