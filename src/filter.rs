//! Threshold, region-of-interest and stochastic subsampling filters.

use tracing::debug;

use crate::core::RecordSet;
use crate::transform::Candidate;
use crate::util::{Result, Sampler};

/// Active filters of one pipeline, applied in declaration order.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FilterChain {
    /// Keep iff the candidate key is strictly greater.
    pub threshold: Option<f64>,
    /// Keep iff every coordinate is strictly less than this edge length.
    pub roi_edge: Option<f32>,
    /// Keep iff a uniform draw is below `1 / factor`.
    pub subsample: Option<f64>,
}

/// Why candidates were dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterReport {
    pub read: usize,
    pub below_threshold: usize,
    pub outside_roi: usize,
    pub sampled_out: usize,
    pub accepted: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Verdict {
    Keep,
    BelowThreshold,
    OutsideRoi,
    SampledOut,
}

impl FilterChain {
    /// No filtering at all.
    pub const NONE: Self = Self { threshold: None, roi_edge: None, subsample: None };

    fn verdict(&self, c: &Candidate, sampler: &mut Sampler) -> Verdict {
        if let Some(t) = self.threshold {
            if !(c.key > t) {
                return Verdict::BelowThreshold;
            }
        }
        if let Some(edge) = self.roi_edge {
            let r = &c.record;
            if !(r.x < edge && r.y < edge && r.z < edge) {
                return Verdict::OutsideRoi;
            }
        }
        if let Some(factor) = self.subsample {
            if !sampler.keep(factor) {
                return Verdict::SampledOut;
            }
        }
        Verdict::Keep
    }

    /// Whether a single candidate passes every active filter.
    pub fn accepts(&self, c: &Candidate, sampler: &mut Sampler) -> bool {
        self.verdict(c, sampler) == Verdict::Keep
    }

    /// Run candidates through the chain, appending survivors in source order.
    ///
    /// `capacity` is the upper bound on accepted records, normally the source
    /// row count. The first malformed row aborts the whole run.
    pub fn collect<I>(&self, candidates: I, capacity: usize, sampler: &mut Sampler) -> Result<(RecordSet, FilterReport)>
    where
        I: IntoIterator<Item = Result<Candidate>>,
    {
        let mut records = RecordSet::with_capacity(capacity);
        let mut report = FilterReport::default();

        for candidate in candidates {
            let candidate = candidate?;
            report.read += 1;
            match self.verdict(&candidate, sampler) {
                Verdict::Keep => {
                    records.push(candidate.record);
                    report.accepted += 1;
                }
                Verdict::BelowThreshold => report.below_threshold += 1,
                Verdict::OutsideRoi => report.outside_roi += 1,
                Verdict::SampledOut => report.sampled_out += 1,
            }
        }

        debug!(
            "Filtered {} rows: {} accepted, {} below threshold, {} outside ROI, {} sampled out",
            report.read, report.accepted, report.below_threshold, report.outside_roi, report.sampled_out
        );
        Ok((records.finalize(), report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PointRecord;
    use crate::util::Error;

    fn cand(x: f32, y: f32, z: f32, w: f32) -> Candidate {
        Candidate { record: PointRecord::new(x, y, z, w), key: w as f64 }
    }

    #[test]
    fn test_threshold_is_strict() {
        let chain = FilterChain { threshold: Some(0.0), ..FilterChain::NONE };
        let mut s = Sampler::new(Some(0));
        assert!(!chain.accepts(&cand(1.0, 1.0, 1.0, 0.0), &mut s));
        assert!(chain.accepts(&cand(1.0, 1.0, 1.0, 0.001), &mut s));
    }

    #[test]
    fn test_roi_is_strict() {
        let chain = FilterChain { roi_edge: Some(256.0), ..FilterChain::NONE };
        let mut s = Sampler::new(Some(0));
        assert!(chain.accepts(&cand(255.9, 0.0, 10.0, 1.0), &mut s));
        assert!(!chain.accepts(&cand(10.0, 256.0, 10.0, 1.0), &mut s));
        assert!(!chain.accepts(&cand(10.0, 10.0, 300.0, 1.0), &mut s));
    }

    #[test]
    fn test_collect_keeps_order_and_counts() {
        let chain = FilterChain { threshold: Some(1.0), roi_edge: Some(10.0), subsample: None };
        let input = vec![
            Ok(cand(1.0, 1.0, 1.0, 5.0)),
            Ok(cand(1.0, 1.0, 1.0, 0.5)),
            Ok(cand(11.0, 1.0, 1.0, 5.0)),
            Ok(cand(2.0, 2.0, 2.0, 3.0)),
        ];
        let mut s = Sampler::new(Some(0));
        let (records, report) = chain.collect(input, 4, &mut s).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records.as_slice()[0].weight, 5.0);
        assert_eq!(records.as_slice()[1].weight, 3.0);
        assert_eq!(
            report,
            FilterReport { read: 4, below_threshold: 1, outside_roi: 1, sampled_out: 0, accepted: 2 }
        );
    }

    #[test]
    fn test_subsample_factor_one_keeps_all() {
        let chain = FilterChain { subsample: Some(1.0), ..FilterChain::NONE };
        let input: Vec<Result<Candidate>> = (0..200).map(|i| Ok(cand(i as f32, 0.0, 0.0, 1.0))).collect();
        let mut s = Sampler::new(None);
        let (records, _) = chain.collect(input, 200, &mut s).unwrap();
        assert_eq!(records.len(), 200);
    }

    #[test]
    fn test_collect_aborts_on_error() {
        let input = vec![
            Ok(cand(1.0, 1.0, 1.0, 1.0)),
            Err(Error::MissingColumn { line: 2, index: 3, found: 1 }),
        ];
        let mut s = Sampler::new(Some(0));
        assert!(FilterChain::NONE.collect(input, 2, &mut s).is_err());
    }
}
