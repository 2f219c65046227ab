//! Groups streamed part results into whole days
//!
//! Workers finish in any order. A day is released once all of its selected
//! parts have arrived and every earlier day has been released, so output
//! stays in (year, day) order without waiting for the whole run.

use crate::executor::{SolverResult, WorkItem};
use chrono::TimeDelta;
use std::collections::BTreeMap;

/// Every result received for one day, sorted by part
#[derive(Debug)]
pub struct DayReport {
    pub year: u16,
    pub day: u8,
    pub parts: Vec<SolverResult>,
}

impl DayReport {
    /// Parse time spent on this day; part-level parallelism parses once per part
    pub fn parse_time(&self) -> Option<TimeDelta> {
        self.parts.iter().filter_map(|r| r.parse_duration).reduce(|a, b| a + b)
    }

    pub fn solve_time(&self) -> TimeDelta {
        self.parts.iter().map(|r| r.solve_duration).sum()
    }

    pub fn solved(&self) -> usize {
        self.parts.iter().filter(|r| r.answer.is_ok()).count()
    }
}

struct PendingDay {
    expected: usize,
    parts: Vec<SolverResult>,
}

impl PendingDay {
    fn into_report(mut self, (year, day): (u16, u8)) -> DayReport {
        self.parts.sort_by_key(|r| r.part);
        DayReport {
            year,
            day,
            parts: self.parts,
        }
    }
}

/// Buffers results until their day is complete and next in line
pub struct DayCollector {
    pending: BTreeMap<(u16, u8), PendingDay>,
}

impl DayCollector {
    pub fn new(work_items: &[WorkItem]) -> Self {
        let pending = work_items
            .iter()
            .map(|w| {
                let day = PendingDay {
                    expected: w.parts.clone().count(),
                    parts: Vec::new(),
                };
                ((w.year, w.day), day)
            })
            .collect();
        Self { pending }
    }

    /// Record a result and return the days it completes, in order
    pub fn add(&mut self, result: SolverResult) -> Vec<DayReport> {
        match self.pending.get_mut(&(result.year, result.day)) {
            Some(day) => day.parts.push(result),
            None => {
                tracing::warn!(year = result.year, day = result.day, part = result.part, "unexpected result dropped");
                return Vec::new();
            }
        }

        let mut ready = Vec::new();
        while let Some(entry) = self.pending.first_entry() {
            if entry.get().parts.len() < entry.get().expected {
                break;
            }
            let key = *entry.key();
            ready.push(entry.remove().into_report(key));
        }
        ready
    }

    /// Release whatever is left, including days with missing parts
    pub fn finish(self) -> Vec<DayReport> {
        self.pending
            .into_iter()
            .filter(|(_, day)| !day.parts.is_empty())
            .map(|(key, day)| day.into_report(key))
            .collect()
    }

    /// Number of expected part results not yet received
    pub fn outstanding(&self) -> usize {
        self.pending
            .values()
            .map(|day| day.expected.saturating_sub(day.parts.len()))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn result(year: u16, day: u8, part: u8) -> SolverResult {
        SolverResult {
            year,
            day,
            part,
            answer: Ok(format!("{}_{}_{}", year, day, part)),
            solve_duration: TimeDelta::milliseconds(10),
            parse_duration: (part == 1).then(|| TimeDelta::milliseconds(5)),
        }
    }

    fn work(year: u16, day: u8, parts: u8) -> WorkItem {
        WorkItem {
            year,
            day,
            parts: 1..=parts,
        }
    }

    fn keys(reports: &[DayReport]) -> Vec<(u16, u8, Vec<u8>)> {
        reports
            .iter()
            .map(|r| (r.year, r.day, r.parts.iter().map(|p| p.part).collect()))
            .collect()
    }

    #[test]
    fn test_day_released_when_complete() {
        let mut collector = DayCollector::new(&[work(2023, 5, 2)]);
        assert!(collector.add(result(2023, 5, 2)).is_empty());
        assert_eq!(collector.outstanding(), 1);

        let ready = collector.add(result(2023, 5, 1));
        assert_eq!(keys(&ready), vec![(2023, 5, vec![1, 2])]);
        assert_eq!(collector.outstanding(), 0);

        let day = &ready[0];
        assert_eq!(day.parse_time(), Some(TimeDelta::milliseconds(5)));
        assert_eq!(day.solve_time(), TimeDelta::milliseconds(20));
        assert_eq!(day.solved(), 2);
    }

    #[test]
    fn test_later_day_waits_for_earlier_one() {
        let mut collector = DayCollector::new(&[work(2023, 4, 1), work(2023, 5, 1), work(2024, 1, 1)]);
        assert!(collector.add(result(2023, 5, 1)).is_empty());
        assert!(collector.add(result(2024, 1, 1)).is_empty());

        let ready = collector.add(result(2023, 4, 1));
        assert_eq!(
            keys(&ready),
            vec![(2023, 4, vec![1]), (2023, 5, vec![1]), (2024, 1, vec![1])]
        );
    }

    #[test]
    fn test_finish_releases_partial_days() {
        let mut collector = DayCollector::new(&[work(2023, 4, 2), work(2023, 5, 2)]);
        collector.add(result(2023, 5, 2));
        assert_eq!(collector.outstanding(), 3);

        // 2023/04 never reported anything, so it has no report
        assert_eq!(keys(&collector.finish()), vec![(2023, 5, vec![2])]);
    }

    #[test]
    fn test_unexpected_result_is_dropped() {
        let mut collector = DayCollector::new(&[work(2023, 5, 1)]);
        assert!(collector.add(result(2015, 1, 1)).is_empty());
        assert_eq!(collector.outstanding(), 1);
    }

    fn days_and_arrival() -> impl Strategy<Value = (Vec<(u16, u8)>, Vec<(u16, u8, u8)>)> {
        proptest::collection::btree_set((2015u16..2018, 1u8..26), 1..15)
            .prop_map(|days| days.into_iter().collect::<Vec<_>>())
            .prop_flat_map(|days| {
                let arrival: Vec<_> = days
                    .iter()
                    .flat_map(|&(year, day)| [(year, day, 1), (year, day, 2)])
                    .collect();
                (Just(days), Just(arrival).prop_shuffle())
            })
    }

    proptest! {
        #[test]
        fn prop_any_arrival_order_releases_sorted_days((days, arrival) in days_and_arrival()) {
            let items: Vec<_> = days.iter().map(|&(year, day)| work(year, day, 2)).collect();
            let mut collector = DayCollector::new(&items);
            let mut released = Vec::new();
            for (year, day, part) in arrival {
                released.extend(collector.add(result(year, day, part)));
            }
            prop_assert_eq!(collector.outstanding(), 0);

            let expected: Vec<_> = days.iter().map(|&(y, d)| (y, d, vec![1, 2])).collect();
            prop_assert_eq!(keys(&released), expected);
            let unique: BTreeSet<_> = released.iter().map(|r| (r.year, r.day)).collect();
            prop_assert_eq!(unique.len(), days.len());
        }
    }
}
