//! Pairing pressure samples with polar rows.

use crate::config::JoinStrategy;
use crate::constants::ANGLE_TOLERANCE;
use crate::error::{IngestError, Result};
use crate::models::{JoinOutcome, PolarRow};
use crate::processor::pressure::PressureEntry;
use tracing::{debug, warn};

/// Order `entries` so that the i-th encoded sample belongs to `rows[i]`
pub fn align_samples(
    rows: &[PolarRow],
    entries: Vec<PressureEntry>,
    strategy: JoinStrategy,
) -> Result<(Vec<String>, JoinOutcome)> {
    let all_keyed = !entries.is_empty() && entries.iter().all(|e| e.angle_of_attack.is_some());

    match strategy {
        JoinStrategy::AngleKey => Ok((by_angle(rows, entries)?, JoinOutcome::AngleKey)),
        JoinStrategy::ListingOrder => Ok((by_position(rows, entries)?, JoinOutcome::ListingOrder)),
        JoinStrategy::Auto if all_keyed => Ok((by_angle(rows, entries)?, JoinOutcome::AngleKey)),
        JoinStrategy::Auto => {
            if !entries.is_empty() {
                warn!(
                    "Not every pressure file declares its angle of attack; joining by file-name order"
                );
            }
            Ok((by_position(rows, entries)?, JoinOutcome::ListingOrder))
        }
    }
}

fn by_position(rows: &[PolarRow], entries: Vec<PressureEntry>) -> Result<Vec<String>> {
    if rows.len() != entries.len() {
        return Err(IngestError::PressureMismatch {
            reason: format!(
                "{} polar rows but {} pressure distribution files",
                rows.len(),
                entries.len()
            ),
        });
    }
    Ok(entries.into_iter().map(|e| e.encoded).collect())
}

fn by_angle(rows: &[PolarRow], entries: Vec<PressureEntry>) -> Result<Vec<String>> {
    let mut keyed: Vec<(f64, PressureEntry)> = Vec::with_capacity(entries.len());
    for entry in entries {
        let angle = entry
            .angle_of_attack
            .ok_or_else(|| IngestError::PressureMismatch {
                reason: format!(
                    "no angle of attack found in {}",
                    entry.path.display()
                ),
            })?;

        if let Some((_, other)) = keyed
            .iter()
            .find(|(a, _)| (a - angle).abs() <= ANGLE_TOLERANCE)
        {
            return Err(IngestError::PressureMismatch {
                reason: format!(
                    "{} and {} both declare alpha = {}",
                    other.path.display(),
                    entry.path.display(),
                    angle
                ),
            });
        }
        keyed.push((angle, entry));
    }

    let mut used = vec![false; keyed.len()];
    let mut samples = Vec::with_capacity(rows.len());

    for row in rows {
        let index = keyed
            .iter()
            .position(|(a, _)| (a - row.angle_of_attack).abs() <= ANGLE_TOLERANCE)
            .ok_or_else(|| IngestError::PressureMismatch {
                reason: format!(
                    "no pressure distribution for alpha = {}",
                    row.angle_of_attack
                ),
            })?;

        if used[index] {
            return Err(IngestError::PressureMismatch {
                reason: format!("polar file repeats alpha = {}", row.angle_of_attack),
            });
        }
        used[index] = true;
        samples.push(keyed[index].1.encoded.clone());
    }

    for ((angle, entry), _) in keyed.iter().zip(&used).filter(|(_, used)| !**used) {
        debug!(
            "Unused pressure distribution {} (alpha = {})",
            entry.path.display(),
            angle
        );
    }
    let unused = used.iter().filter(|u| !**u).count();
    if unused > 0 {
        warn!("{} pressure distribution files have no matching polar row", unused);
    }

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PressureSample;
    use std::path::PathBuf;

    fn row(alpha: f64) -> PolarRow {
        PolarRow {
            angle_of_attack: alpha,
            lift_coefficient: 0.1 * alpha,
            drag_coefficient: 0.01,
            moment_coefficient: -0.05,
            ..Default::default()
        }
    }

    fn entry(name: &str, alpha: Option<f64>) -> PressureEntry {
        PressureEntry {
            path: PathBuf::from(name),
            angle_of_attack: alpha,
            sample: PressureSample::default(),
            encoded: name.to_string(),
        }
    }

    #[test]
    fn test_angle_join_reorders_listing() {
        // Lexicographic listing puts -2 after 0 and 10 before 2
        let entries = vec![
            entry("a0", Some(0.0)),
            entry("a10", Some(10.0)),
            entry("a2", Some(2.0)),
            entry("a-2", Some(-2.0)),
        ];
        let rows = [row(-2.0), row(0.0), row(2.0), row(10.0)];

        let (samples, outcome) = align_samples(&rows, entries, JoinStrategy::Auto).unwrap();
        assert_eq!(outcome, JoinOutcome::AngleKey);
        assert_eq!(samples, vec!["a-2", "a0", "a2", "a10"]);
    }

    #[test]
    fn test_auto_falls_back_to_listing_order() {
        let entries = vec![entry("first", Some(0.0)), entry("second", None)];
        let rows = [row(4.0), row(5.0)];

        let (samples, outcome) = align_samples(&rows, entries, JoinStrategy::Auto).unwrap();
        assert_eq!(outcome, JoinOutcome::ListingOrder);
        assert_eq!(samples, vec!["first", "second"]);
    }

    #[test]
    fn test_listing_order_count_mismatch() {
        let entries = vec![entry("only", None)];
        let rows = [row(0.0), row(1.0)];

        assert!(matches!(
            align_samples(&rows, entries, JoinStrategy::ListingOrder),
            Err(IngestError::PressureMismatch { .. })
        ));
    }

    #[test]
    fn test_angle_key_missing_distribution() {
        let entries = vec![entry("a0", Some(0.0))];
        let rows = [row(0.0), row(1.0)];

        let err = align_samples(&rows, entries, JoinStrategy::AngleKey).unwrap_err();
        assert!(err.to_string().contains("no pressure distribution for alpha = 1"));
    }

    #[test]
    fn test_angle_key_requires_keys() {
        let entries = vec![entry("unknown", None)];
        assert!(align_samples(&[row(0.0)], entries, JoinStrategy::AngleKey).is_err());
    }

    #[test]
    fn test_duplicate_angles_rejected() {
        let entries = vec![entry("a", Some(1.0)), entry("b", Some(1.0))];
        assert!(align_samples(&[row(1.0)], entries, JoinStrategy::AngleKey).is_err());
    }

    #[test]
    fn test_extra_files_are_ignored_by_angle() {
        let entries = vec![entry("a0", Some(0.0)), entry("a1", Some(1.0))];
        let (samples, _) = align_samples(&[row(1.0)], entries, JoinStrategy::AngleKey).unwrap();
        assert_eq!(samples, vec!["a1"]);
    }

    #[test]
    fn test_empty_inputs() {
        let (samples, outcome) = align_samples(&[], Vec::new(), JoinStrategy::Auto).unwrap();
        assert!(samples.is_empty());
        assert_eq!(outcome, JoinOutcome::ListingOrder);
    }
}
