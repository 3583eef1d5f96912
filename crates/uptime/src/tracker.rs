//! Cumulative per-domain availability.
//!
//! The tracker is the only state that outlives a cycle. Counters only ever
//! grow, and a domain exists in the table only once a probe for it has been
//! folded in, so every percentage is computed over at least one request.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::monitoring::ProbeResult;

/// Running totals for one domain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DomainStats {
    pub total_requests: u64,
    pub up_requests: u64,
}

impl DomainStats {
    /// Availability rounded to the nearest integer percent.
    ///
    /// Exact ties round half to even (12.5 -> 12, 37.5 -> 38). Returns
    /// `None` before the first request.
    pub fn percentage(&self) -> Option<u64> {
        if self.total_requests == 0 {
            return None;
        }

        let scaled = 100 * self.up_requests;
        let quotient = scaled / self.total_requests;
        let twice_remainder = 2 * (scaled % self.total_requests);

        let round_up = match twice_remainder.cmp(&self.total_requests) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Equal => quotient % 2 == 1,
            std::cmp::Ordering::Less => false,
        };

        Some(quotient + u64::from(round_up))
    }
}

/// One row of a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainAvailability {
    pub domain: String,
    pub percentage: u64,
}

/// Domain -> cumulative stats, in first-seen order
#[derive(Debug, Default)]
pub struct AvailabilityTracker {
    stats: HashMap<String, DomainStats>,
    order: Vec<String>,
}

impl AvailabilityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one cycle's results into the table.
    ///
    /// Takes `&mut self`, so no snapshot can observe a half-folded batch.
    pub fn update(&mut self, results: &[ProbeResult]) {
        for result in results {
            let stats = match self.stats.entry(result.domain.clone()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    self.order.push(entry.key().clone());
                    entry.insert(DomainStats::default())
                }
            };

            stats.total_requests += 1;
            if result.is_up() {
                stats.up_requests += 1;
            }
        }
    }

    /// Current percentage of every known domain, in first-seen order
    pub fn snapshot(&self) -> Vec<DomainAvailability> {
        self.order
            .iter()
            .filter_map(|domain| {
                let percentage = self.stats.get(domain)?.percentage()?;
                Some(DomainAvailability { domain: domain.clone(), percentage })
            })
            .collect()
    }

    pub fn stats(&self, domain: &str) -> Option<DomainStats> {
        self.stats.get(domain).copied()
    }

    pub fn domain_count(&self) -> usize {
        self.order.len()
    }

    /// Total results folded so far, across every domain
    pub fn total_requests(&self) -> u64 {
        self.stats.values().map(|stats| stats.total_requests).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(up: u64, total: u64) -> DomainStats {
        DomainStats { total_requests: total, up_requests: up }
    }

    #[test]
    fn rounding_to_nearest() {
        assert_eq!(stats(1, 3).percentage(), Some(33));
        assert_eq!(stats(2, 3).percentage(), Some(67));
        assert_eq!(stats(0, 5).percentage(), Some(0));
        assert_eq!(stats(5, 5).percentage(), Some(100));
        assert_eq!(stats(1, 2).percentage(), Some(50));
    }

    #[test]
    fn exact_ties_round_half_to_even() {
        // 12.5 and 37.5, 62.5, 87.5
        assert_eq!(stats(1, 8).percentage(), Some(12));
        assert_eq!(stats(3, 8).percentage(), Some(38));
        assert_eq!(stats(5, 8).percentage(), Some(62));
        assert_eq!(stats(7, 8).percentage(), Some(88));
        // 0.5
        assert_eq!(stats(1, 200).percentage(), Some(0));
        // 1.5
        assert_eq!(stats(3, 200).percentage(), Some(2));
    }

    #[test]
    fn no_percentage_without_requests() {
        assert_eq!(DomainStats::default().percentage(), None);
    }

    #[test]
    fn same_domain_one_up_one_down_is_fifty_percent() {
        let mut tracker = AvailabilityTracker::new();
        tracker.update(&[ProbeResult::up("example.com"), ProbeResult::down("example.com")]);

        assert_eq!(tracker.stats("example.com"), Some(stats(1, 2)));
        assert_eq!(
            tracker.snapshot(),
            vec![DomainAvailability { domain: "example.com".into(), percentage: 50 }]
        );
    }

    #[test]
    fn counts_accumulate_across_cycles() {
        let mut tracker = AvailabilityTracker::new();
        tracker.update(&[ProbeResult::up("a.test")]);
        tracker.update(&[ProbeResult::down("a.test")]);
        tracker.update(&[ProbeResult::down("a.test")]);

        assert_eq!(tracker.stats("a.test"), Some(stats(1, 3)));
        assert_eq!(tracker.snapshot()[0].percentage, 33);
    }

    #[test]
    fn snapshot_keeps_first_seen_order() {
        let mut tracker = AvailabilityTracker::new();
        tracker.update(&[
            ProbeResult::up("zeta.test"),
            ProbeResult::up("alpha.test"),
            ProbeResult::down("zeta.test"),
            ProbeResult::up("mid.test"),
        ]);

        let domains: Vec<_> = tracker.snapshot().into_iter().map(|row| row.domain).collect();
        assert_eq!(domains, ["zeta.test", "alpha.test", "mid.test"]);
        assert_eq!(tracker.domain_count(), 3);
    }

    #[test]
    fn repeated_domain_is_listed_once() {
        let mut tracker = AvailabilityTracker::new();
        tracker.update(&[ProbeResult::up("a.test"), ProbeResult::up("b.test")]);
        tracker.update(&[ProbeResult::down("b.test"), ProbeResult::up("a.test")]);

        let domains: Vec<_> = tracker.snapshot().into_iter().map(|row| row.domain).collect();
        assert_eq!(domains, ["a.test", "b.test"]);
        assert_eq!(tracker.stats("a.test").unwrap().total_requests, 2);
        assert_eq!(tracker.stats("b.test").unwrap().up_requests, 1);
    }

    #[test]
    fn every_result_is_counted_once() {
        let results: Vec<_> = (0..10)
            .map(|i| {
                let domain = format!("d{}.test", i % 3);
                if i % 2 == 0 { ProbeResult::up(domain) } else { ProbeResult::down(domain) }
            })
            .collect();

        let mut tracker = AvailabilityTracker::new();
        tracker.update(&results);

        assert_eq!(tracker.total_requests(), 10);
    }

    #[test]
    fn up_never_exceeds_total() {
        let mut tracker = AvailabilityTracker::new();
        for cycle in 0..50u32 {
            let batch: Vec<_> = (0..4u32)
                .map(|i| {
                    let domain = format!("d{i}.test");
                    if (cycle + i) % 3 == 0 { ProbeResult::down(domain) } else { ProbeResult::up(domain) }
                })
                .collect();
            tracker.update(&batch);

            for row in tracker.snapshot() {
                let stats = tracker.stats(&row.domain).unwrap();
                assert!(stats.up_requests <= stats.total_requests);
                assert!(row.percentage <= 100);
            }
        }
    }

    #[test]
    fn empty_batch_changes_nothing() {
        let mut tracker = AvailabilityTracker::new();
        tracker.update(&[]);
        assert!(tracker.snapshot().is_empty());
        assert_eq!(tracker.total_requests(), 0);
    }
}
