//! Symmetric downsampling of pressure distributions.
//!
//! A distribution sweeps the airfoil surface from one trailing edge around
//! the leading edge to the other. The sweep is split at `mid = (M - 1) / 2`
//! into an upper half `[0, mid]` and a lower half `[mid, M - 1]`; the
//! station at `mid` belongs to both. Each half contributes up to `N / 2`
//! stations picked at the same evenly spaced offsets. Upper offsets count
//! from the start of the sweep and lower offsets count back from its end,
//! so both halves are sampled inward from their free trailing edge.

use crate::config::UnderflowPolicy;
use crate::error::{IngestError, Result};
use crate::models::PressurePoint;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Copy)]
pub struct PressureResampler {
    target_size: usize,
    policy: UnderflowPolicy,
}

impl PressureResampler {
    pub fn new(target_size: usize, policy: UnderflowPolicy) -> Self {
        Self {
            target_size,
            policy,
        }
    }

    pub fn target_size(&self) -> usize {
        self.target_size
    }

    /// Reduce `points` to at most `target_size` stations.
    ///
    /// Short distributions yield fewer stations under
    /// [`UnderflowPolicy::Lenient`] and fail under [`UnderflowPolicy::Strict`].
    pub fn resample(&self, points: &[PressurePoint], source: &Path) -> Result<Vec<PressurePoint>> {
        let half = self.target_size / 2;
        let available = if points.is_empty() {
            0
        } else {
            midpoint(points.len()) + 1
        };

        if half > available {
            match self.policy {
                UnderflowPolicy::Strict => {
                    return Err(IngestError::ResampleUnderflow {
                        path: source.to_path_buf(),
                        available: points.len(),
                        requested: self.target_size,
                    });
                }
                UnderflowPolicy::Lenient => warn!(
                    "{} has {} points; sample will be shorter than {}",
                    source.display(),
                    points.len(),
                    self.target_size
                ),
            }
        }

        Ok(symmetric_sample(points, self.target_size))
    }
}

/// Index of the station shared by both surface halves
pub fn midpoint(len: usize) -> usize {
    len.saturating_sub(1) / 2
}

/// `count` offsets spread evenly over `[0, last]`, truncated towards zero.
///
/// Both endpoints are included; when `count > last + 1` offsets repeat.
pub fn sample_offsets(last: usize, count: usize) -> Vec<usize> {
    match count {
        0 => Vec::new(),
        1 => vec![0],
        _ => {
            let step = last as f64 / (count - 1) as f64;
            let mut offsets: Vec<usize> = (0..count)
                .map(|i| (i as f64 * step).floor() as usize)
                .collect();
            offsets[count - 1] = last;
            offsets
        }
    }
}

/// Select stations from both halves of a sweep and concatenate them
pub fn symmetric_sample(points: &[PressurePoint], target_size: usize) -> Vec<PressurePoint> {
    if points.is_empty() {
        return Vec::new();
    }

    let mid = midpoint(points.len());
    let offsets: BTreeSet<usize> = sample_offsets(mid, target_size / 2).into_iter().collect();

    let upper = points[..=mid]
        .iter()
        .enumerate()
        .filter(|(pos, _)| offsets.contains(pos))
        .map(|(_, p)| *p);

    // Offsets on the lower half are measured from the end of the sweep.
    let mut lower: Vec<PressurePoint> = points[mid..]
        .iter()
        .rev()
        .enumerate()
        .filter(|(pos, _)| offsets.contains(pos))
        .map(|(_, p)| *p)
        .collect();
    lower.reverse();

    upper.chain(lower).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sweep from the upper trailing edge (x = 1) to the leading edge and back
    fn sweep(len: usize) -> Vec<PressurePoint> {
        let mid = midpoint(len) as f64;
        (0..len)
            .map(|i| {
                let x = ((i as f64 - mid) / mid.max(1.0)).abs();
                PressurePoint::new(x, i as f64)
            })
            .collect()
    }

    fn indices(sample: &[PressurePoint]) -> Vec<usize> {
        sample.iter().map(|p| p.cp as usize).collect()
    }

    #[test]
    fn test_sample_offsets_match_linspace() {
        assert_eq!(sample_offsets(10, 3), vec![0, 5, 10]);
        assert_eq!(sample_offsets(10, 4), vec![0, 3, 6, 10]);
        assert_eq!(sample_offsets(7, 1), vec![0]);
        assert_eq!(sample_offsets(0, 3), vec![0, 0, 0]);
        assert!(sample_offsets(5, 0).is_empty());
    }

    #[test]
    fn test_exact_size_for_dense_distribution() {
        let points = sweep(161);
        let sample = symmetric_sample(&points, 48);

        assert_eq!(sample.len(), 48);
        let idx = indices(&sample);
        assert_eq!(idx[0], 0);
        assert_eq!(idx[23], 80);
        assert_eq!(idx[24], 80);
        assert_eq!(idx[47], 160);
    }

    #[test]
    fn test_halves_are_mirror_images() {
        let points = sweep(101);
        let sample = symmetric_sample(&points, 10);
        let idx = indices(&sample);

        assert_eq!(idx, vec![0, 12, 25, 37, 50, 50, 63, 75, 88, 100]);
        for k in 0..5 {
            assert_eq!(idx[k] + idx[9 - k], 100);
            assert_eq!(sample[k].x, sample[9 - k].x);
        }
    }

    #[test]
    fn test_shared_midpoint_kept_from_both_halves() {
        let points = sweep(21);
        let sample = symmetric_sample(&points, 6);
        let mid_hits = indices(&sample).iter().filter(|&&i| i == 10).count();
        assert_eq!(mid_hits, 2);
    }

    #[test]
    fn test_x_monotonic_within_each_half() {
        let points = sweep(201);
        let sample = symmetric_sample(&points, 48);
        let (upper, lower) = sample.split_at(24);

        assert!(upper.windows(2).all(|w| w[0].x > w[1].x));
        assert!(lower.windows(2).all(|w| w[0].x < w[1].x));
    }

    #[test]
    fn test_even_length_sweep() {
        // mid = 4; the lower half has one more station than the upper
        let points = sweep(10);
        let idx = indices(&symmetric_sample(&points, 4));
        assert_eq!(idx, vec![0, 4, 5, 9]);
    }

    #[test]
    fn test_deterministic() {
        let points = sweep(97);
        assert_eq!(symmetric_sample(&points, 48), symmetric_sample(&points, 48));
    }

    #[test]
    fn test_short_distribution_lenient() {
        let points = sweep(41);
        let resampler = PressureResampler::new(48, UnderflowPolicy::Lenient);
        let sample = resampler.resample(&points, Path::new("a2.txt")).unwrap();

        assert_eq!(sample.len(), 42);
        assert!(sample.len() < 48);
    }

    #[test]
    fn test_short_distribution_strict() {
        let points = sweep(41);
        let resampler = PressureResampler::new(48, UnderflowPolicy::Strict);

        match resampler.resample(&points, Path::new("a2.txt")) {
            Err(IngestError::ResampleUnderflow {
                available,
                requested,
                ..
            }) => {
                assert_eq!(available, 41);
                assert_eq!(requested, 48);
            }
            other => panic!("Expected ResampleUnderflow, got {:?}", other),
        }
    }

    #[test]
    fn test_strict_accepts_exact_fit() {
        // mid + 1 = 24 stations per half, exactly N / 2
        let points = sweep(47);
        let resampler = PressureResampler::new(48, UnderflowPolicy::Strict);
        assert_eq!(resampler.resample(&points, Path::new("a0.txt")).unwrap().len(), 48);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(symmetric_sample(&[], 48).is_empty());

        let single = vec![PressurePoint::new(0.0, 1.0)];
        assert_eq!(symmetric_sample(&single, 48), vec![single[0], single[0]]);
    }
}
