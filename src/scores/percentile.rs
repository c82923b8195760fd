use serde::Serialize;

/// Hand-set log-normal population parameters for one metric.
///
/// These are editorial estimates, not measured populations; the `estimated`
/// flag travels with every ranking so downstream surfaces must label them.
/// Swapping in empirically fitted parameters only touches this table.
#[derive(Debug, Clone, Copy)]
pub struct EstimatedDistribution {
    pub metric: &'static str,
    pub median: f64,
    pub sigma: f64,
}

const ESTIMATED_DISTRIBUTIONS: &[EstimatedDistribution] = &[
    EstimatedDistribution {
        metric: "messages_per_day",
        median: 18.0,
        sigma: 1.1,
    },
    EstimatedDistribution {
        metric: "median_response_secs",
        median: 540.0,
        sigma: 1.3,
    },
    EstimatedDistribution {
        metric: "avg_words_per_message",
        median: 7.0,
        sigma: 0.7,
    },
    EstimatedDistribution {
        metric: "emoji_per_message",
        median: 0.15,
        sigma: 1.2,
    },
    EstimatedDistribution {
        metric: "vocabulary_size",
        median: 1800.0,
        sigma: 0.9,
    },
    EstimatedDistribution {
        metric: "daily_streak_days",
        median: 6.0,
        sigma: 1.0,
    },
];

/// One metric ranked against its estimated population.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentileRanking {
    pub metric: String,
    pub value: f64,
    /// Share of the estimated population below `value`, 0-100.
    pub percentile: f64,
    /// Always true for this table; the population is assumed, not measured.
    pub estimated: bool,
}

/// Ranks a value against the named estimated distribution.
/// `None` for unknown metrics or non-positive values (log-normal support).
pub fn rank_against_population(metric: &str, value: f64) -> Option<PercentileRanking> {
    if value <= 0.0 {
        return None;
    }
    let distribution = ESTIMATED_DISTRIBUTIONS
        .iter()
        .find(|d| d.metric == metric)?;
    let z = (value.ln() - distribution.median.ln()) / distribution.sigma;
    Some(PercentileRanking {
        metric: metric.to_string(),
        value,
        percentile: normal_cdf(z) * 100.0,
        estimated: true,
    })
}

/// Standard normal CDF via the Abramowitz-Stegun erf approximation.
fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + 0.327_591_1 * x);
    let poly = t
        * (0.254_829_592
            + t * (-0.284_496_736 + t * (1.421_413_741 + t * (-1.453_152_027 + t * 1.061_405_429))));
    sign * (1.0 - poly * (-x * x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_value_sits_at_the_fiftieth() {
        let ranking = rank_against_population("messages_per_day", 18.0).unwrap();
        assert!((ranking.percentile - 50.0).abs() < 0.5);
        assert!(ranking.estimated);
    }

    #[test]
    fn heavy_usage_ranks_high() {
        let ranking = rank_against_population("messages_per_day", 200.0).unwrap();
        assert!(ranking.percentile > 95.0);
    }

    #[test]
    fn unknown_metric_or_bad_value_is_none() {
        assert!(rank_against_population("unknown_metric", 5.0).is_none());
        assert!(rank_against_population("messages_per_day", 0.0).is_none());
    }

    #[test]
    fn cdf_is_monotone() {
        let low = rank_against_population("median_response_secs", 60.0).unwrap();
        let high = rank_against_population("median_response_secs", 7200.0).unwrap();
        assert!(low.percentile < high.percentile);
    }
}
