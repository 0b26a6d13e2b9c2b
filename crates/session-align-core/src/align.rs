//! C8 — map a source timestamp sequence onto a reference timebase
//! (spec §4.8).

use session_types::{AlignedResult, JitterStats, MappingStrategy};

use crate::{Error, Result};

pub struct Aligner;

impl Aligner {
    /// Align `source_times` (sorted ascending) onto `reference_times` (sorted
    /// ascending) under `mapping`.
    ///
    /// If `enforce_budget` is true and the resulting max jitter exceeds
    /// `budget_s`, returns `JitterBudgetExceeded` and no `AlignedResult` —
    /// the budget check happens before any result is constructed.
    pub fn align(
        source_times: &[f64],
        reference_times: &[f64],
        mapping: MappingStrategy,
        budget_s: f64,
        enforce_budget: bool,
    ) -> Result<(AlignedResult, JitterStats)> {
        match mapping {
            MappingStrategy::Nearest => Self::align_nearest(source_times, reference_times),
            MappingStrategy::Linear => Self::align_linear(source_times, reference_times),
        }
        .and_then(|(result, stats)| {
            if enforce_budget && stats.max_s > budget_s {
                return Err(Error::JitterBudgetExceeded {
                    max_s: stats.max_s,
                    budget_s,
                });
            }
            Ok((result, stats))
        })
    }

    fn align_nearest(
        source_times: &[f64],
        reference_times: &[f64],
    ) -> Result<(AlignedResult, JitterStats)> {
        if reference_times.is_empty() {
            return Err(Error::DomainError(
                "NEAREST alignment requires a non-empty reference sequence".into(),
            ));
        }

        let mut indices = Vec::with_capacity(source_times.len());
        let mut jitters = Vec::with_capacity(source_times.len());
        let mut j = 0usize;

        for &s in source_times {
            while j + 1 < reference_times.len() && reference_times[j + 1] <= s {
                j += 1;
            }
            let best = if j + 1 < reference_times.len() {
                let d_here = (reference_times[j] - s).abs();
                let d_next = (reference_times[j + 1] - s).abs();
                if d_next < d_here {
                    j + 1
                } else {
                    j
                }
            } else {
                j
            };
            indices.push(best);
            jitters.push((reference_times[best] - s).abs());
        }

        let stats = jitter_stats(&jitters);
        Ok((AlignedResult::Nearest { indices }, stats))
    }

    fn align_linear(
        source_times: &[f64],
        reference_times: &[f64],
    ) -> Result<(AlignedResult, JitterStats)> {
        if reference_times.len() < 2 {
            return Err(Error::DomainError(
                "LINEAR alignment requires at least 2 reference timestamps".into(),
            ));
        }
        let m = reference_times.len();

        let mut brackets = Vec::with_capacity(source_times.len());
        let mut weights = Vec::with_capacity(source_times.len());
        let mut jitters = Vec::with_capacity(source_times.len());
        let mut j = 0usize;

        for &s in source_times {
            if s <= reference_times[0] {
                brackets.push((0, 1));
                weights.push((1.0, 0.0));
                jitters.push((s - reference_times[0]).abs());
                continue;
            }
            if s >= reference_times[m - 1] {
                brackets.push((m - 2, m - 1));
                weights.push((0.0, 1.0));
                jitters.push((s - reference_times[m - 1]).abs());
                continue;
            }

            while j + 1 < m - 1 && reference_times[j + 1] <= s {
                j += 1;
            }
            let (lo, hi) = (j, j + 1);
            let w_high = (s - reference_times[lo]) / (reference_times[hi] - reference_times[lo]);
            let w_low = 1.0 - w_high;

            brackets.push((lo, hi));
            weights.push((w_low, w_high));
            jitters.push(
                (s - reference_times[lo])
                    .abs()
                    .min((s - reference_times[hi]).abs()),
            );
        }

        let stats = jitter_stats(&jitters);
        Ok((AlignedResult::Linear { brackets, weights }, stats))
    }
}

/// Computes max/p95 over a fixed sorted-ascending copy of `jitters`, so the
/// result is independent of input order (spec §4.8 determinism guarantee).
fn jitter_stats(jitters: &[f64]) -> JitterStats {
    let aligned_samples = jitters.len();
    if jitters.is_empty() {
        return JitterStats {
            max_s: 0.0,
            p95_s: 0.0,
            aligned_samples: 0,
        };
    }

    let mut sorted = jitters.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("jitter values are never NaN"));
    let max_s = *sorted.last().unwrap();

    let rank = ((sorted.len() as f64) * 0.95).ceil() as usize;
    let idx = rank.saturating_sub(1).min(sorted.len() - 1);
    let p95_s = sorted[idx];

    JitterStats {
        max_s,
        p95_s,
        aligned_samples,
    }
}
