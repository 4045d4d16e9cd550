//! Spatial/temporal diversity analyzer (spec §4.5.2): azimuth distribution
//! binned into 8 compass sectors, Shannon-entropy-normalized to a [0,1]
//! diversity score.

use crate::types::DiversityReport;

fn sector_index(azimuth_deg: f64) -> usize {
    let normalized = azimuth_deg.rem_euclid(360.0);
    ((normalized / 45.0).floor() as usize).min(7)
}

/// Bucket every connectable point's azimuth from the given satellites into
/// 8 compass sectors and compute the Shannon-entropy-normalized diversity
/// score used both for reporting and for the Set-Cover tie-break.
pub fn analyze(azimuths_deg: impl Iterator<Item = f64>) -> DiversityReport {
    let mut sector_counts = [0usize; 8];
    let mut total = 0usize;
    for az in azimuths_deg {
        sector_counts[sector_index(az)] += 1;
        total += 1;
    }

    if total == 0 {
        return DiversityReport {
            sector_counts,
            score: 0.0,
        };
    }

    let entropy: f64 = sector_counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total as f64;
            -p * p.ln()
        })
        .sum();
    let max_entropy = 8f64.ln();
    let score = if max_entropy > 0.0 {
        entropy / max_entropy
    } else {
        0.0
    };

    DiversityReport {
        sector_counts,
        score,
    }
}

/// Cheap incremental diversity score used for the Set-Cover tie-break (spec
/// §4.5.2 step 2): how much would adding `candidate_azimuths` push the
/// currently-selected set's sector distribution toward uniformity.
pub fn marginal_diversity_score(current_sector_counts: &[usize; 8], candidate_azimuths: &[f64]) -> f64 {
    let mut projected = *current_sector_counts;
    for &az in candidate_azimuths {
        projected[sector_index(az)] += 1;
    }
    analyze(projected_to_samples(&projected).into_iter()).score
}

fn projected_to_samples(sector_counts: &[usize; 8]) -> Vec<f64> {
    let mut samples = Vec::new();
    for (sector, &count) in sector_counts.iter().enumerate() {
        let azimuth = sector as f64 * 45.0 + 22.5;
        samples.extend(std::iter::repeat(azimuth).take(count));
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_distribution_scores_near_one() {
        let azimuths = (0..8).map(|i| i as f64 * 45.0 + 1.0);
        let report = analyze(azimuths);
        assert!(report.score > 0.99);
    }

    #[test]
    fn single_sector_scores_zero() {
        let azimuths = std::iter::repeat(10.0).take(20);
        let report = analyze(azimuths);
        assert_eq!(report.score, 0.0);
    }

    #[test]
    fn sector_index_wraps_at_360() {
        assert_eq!(sector_index(359.9), 7);
        assert_eq!(sector_index(0.0), 0);
        assert_eq!(sector_index(360.0), 0);
    }
}
