// src/filter.rs

use ahash::AHashMap;

use crate::error::HitError;
use crate::types::HitRecord;

/// Significance and coverage thresholds a hit must beat (strictly).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitFilter {
    pub evalue_threshold: f64,
    pub coverage_threshold: f64,
}

impl Default for HitFilter {
    /// Accepts every hit.
    fn default() -> Self {
        Self {
            evalue_threshold: f64::INFINITY,
            coverage_threshold: 0.0,
        }
    }
}

impl HitFilter {
    pub fn new(evalue_threshold: f64, coverage_threshold: f64) -> Result<Self, HitError> {
        if evalue_threshold.is_nan() {
            return Err(HitError::Config("e-value threshold is NaN".into()));
        }
        if coverage_threshold.is_nan() {
            return Err(HitError::Config("coverage threshold is NaN".into()));
        }
        Ok(Self {
            evalue_threshold,
            coverage_threshold,
        })
    }

    /// A hit sitting exactly on either threshold is rejected.
    pub fn accepts(&self, evalue: f64, coverage: f64) -> bool {
        evalue < self.evalue_threshold && coverage > self.coverage_threshold
    }
}

/// Keeps the most significant hit of every protein.
///
/// Proteins appear in the order they were first seen; on equal e-values the
/// earlier hit wins.
pub fn best_per_protein(hits: Vec<HitRecord>) -> Vec<HitRecord> {
    let mut slot_of: AHashMap<String, usize> = AHashMap::with_capacity(hits.len());
    let mut best: Vec<HitRecord> = Vec::with_capacity(hits.len());

    for hit in hits {
        match slot_of.get(&hit.id_prot).copied() {
            Some(slot) => {
                if hit.evalue < best[slot].evalue {
                    log::debug!(
                        "{}: {} (e={:e}) replaces {} (e={:e})",
                        hit.id_prot,
                        hit.query_name,
                        hit.evalue,
                        best[slot].query_name,
                        best[slot].evalue
                    );
                    best[slot] = hit;
                }
            }
            None => {
                slot_of.insert(hit.id_prot.clone(), best.len());
                best.push(hit);
            }
        }
    }
    best
}
