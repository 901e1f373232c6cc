use std::collections::BTreeMap;

use serde::Serialize;

use crate::record::{Location, Quake};

/// The strongest earthquake in a collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extremum {
    pub magnitude: f64,
    pub location: Location,
}

impl Extremum {
    /// Returned for an empty collection. Not a real event.
    pub const SENTINEL: Extremum = Extremum {
        magnitude: 0.0,
        location: Location::ORIGIN,
    };
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuakeStats {
    pub total: usize,
    /// `None` when there were no records to search.
    pub strongest: Option<Extremum>,
    pub counts_per_year: BTreeMap<i32, usize>,
    pub mean_magnitude_per_year: BTreeMap<i32, f64>,
}

impl QuakeStats {
    pub fn from_records(records: &[Quake]) -> Self {
        let total = count_total(records);
        let strongest = if total == 0 {
            None
        } else {
            Some(find_maximum(records))
        };

        QuakeStats {
            total,
            strongest,
            counts_per_year: counts_per_year(records),
            mean_magnitude_per_year: mean_magnitude_per_year(records),
        }
    }
}

pub fn count_total(records: &[Quake]) -> usize {
    records.len()
}

/// Finds the record with the strictly greatest magnitude.
///
/// Ties keep the earliest record in iteration order. An empty slice yields
/// [`Extremum::SENTINEL`].
pub fn find_maximum(records: &[Quake]) -> Extremum {
    let mut iter = records.iter();
    let Some(first) = iter.next() else {
        return Extremum::SENTINEL;
    };

    let best = iter.fold(first, |best, q| {
        if q.magnitude > best.magnitude {
            q
        } else {
            best
        }
    });

    Extremum {
        magnitude: best.magnitude,
        location: best.location,
    }
}

/// Number of records per UTC year, ascending by year.
pub fn counts_per_year(records: &[Quake]) -> BTreeMap<i32, usize> {
    let mut counts = BTreeMap::new();
    for q in records {
        *counts.entry(q.year()).or_default() += 1;
    }
    counts
}

/// Arithmetic mean magnitude per UTC year, ascending by year.
pub fn mean_magnitude_per_year(records: &[Quake]) -> BTreeMap<i32, f64> {
    let mut sums: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for q in records {
        let (sum, n) = sums.entry(q.year()).or_insert((0.0, 0));
        *sum += q.magnitude;
        *n += 1;
    }

    sums
        .into_iter()
        .map(|(year, (sum, n))| (year, sum / n as f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn quake(year: i32, magnitude: f64, lat: f64, lon: f64) -> Quake {
        let time = Utc.with_ymd_and_hms(year, 6, 1, 12, 0, 0).unwrap();
        Quake::new(magnitude, Location::new(lat, lon), time)
    }

    fn sample() -> Vec<Quake> {
        vec![
            quake(2001, 1.0, 50.1, -1.1),
            quake(2001, 3.0, 51.2, -2.2),
            quake(2002, 2.0, 52.3, -3.3),
        ]
    }

    #[test]
    fn test_find_maximum_empty_is_sentinel() {
        let max = find_maximum(&[]);
        assert_eq!(max, Extremum::SENTINEL);
        assert_eq!(max.magnitude, 0.0);
        assert_eq!(max.location, Location::new(0.0, 0.0));
    }

    #[test]
    fn test_sample_aggregates() {
        let records = sample();

        assert_eq!(count_total(&records), 3);
        assert_eq!(
            counts_per_year(&records),
            BTreeMap::from([(2001, 2), (2002, 1)])
        );
        assert_eq!(
            mean_magnitude_per_year(&records),
            BTreeMap::from([(2001, 2.0), (2002, 2.0)])
        );

        let max = find_maximum(&records);
        assert_eq!(max.magnitude, 3.0);
        assert_eq!(max.location, records[1].location);
    }

    #[test]
    fn test_find_maximum_keeps_first_of_ties() {
        let records = vec![
            quake(2010, 2.5, 1.0, 1.0),
            quake(2011, 4.0, 2.0, 2.0),
            quake(2012, 4.0, 3.0, 3.0),
        ];
        assert_eq!(find_maximum(&records).location, Location::new(2.0, 2.0));
    }

    #[test]
    fn test_find_maximum_bounds_every_record() {
        let records = vec![
            quake(2003, 1.7, 0.0, 0.0),
            quake(2004, 3.9, 0.0, 0.0),
            quake(2004, 0.4, 0.0, 0.0),
            quake(2009, 2.2, 0.0, 0.0),
        ];
        let max = find_maximum(&records);
        assert!(records.iter().all(|q| max.magnitude >= q.magnitude));
    }

    #[test]
    fn test_counts_sum_to_total_and_keys_match() {
        let records = vec![
            quake(2016, 1.1, 0.0, 0.0),
            quake(2000, 2.0, 0.0, 0.0),
            quake(2016, 1.5, 0.0, 0.0),
            quake(2008, 5.2, 0.0, 0.0),
            quake(2000, 1.0, 0.0, 0.0),
        ];
        let counts = counts_per_year(&records);
        let means = mean_magnitude_per_year(&records);

        assert_eq!(counts.values().sum::<usize>(), count_total(&records));
        assert!(counts.keys().eq(means.keys()));
        assert_eq!(counts.keys().copied().collect::<Vec<_>>(), vec![2000, 2008, 2016]);
    }

    #[test]
    fn test_mean_is_not_rounded() {
        let records = vec![
            quake(2005, 1.0, 0.0, 0.0),
            quake(2005, 1.0, 0.0, 0.0),
            quake(2005, 2.0, 0.0, 0.0),
        ];
        let mean = mean_magnitude_per_year(&records)[&2005];
        assert!((mean - 4.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_aggregates_are_idempotent() {
        let records = sample();
        assert_eq!(find_maximum(&records), find_maximum(&records));
        assert_eq!(counts_per_year(&records), counts_per_year(&records));
        assert_eq!(
            mean_magnitude_per_year(&records),
            mean_magnitude_per_year(&records)
        );
        assert_eq!(QuakeStats::from_records(&records), QuakeStats::from_records(&records));
    }

    #[test]
    fn test_from_records_empty() {
        let stats = QuakeStats::from_records(&[]);
        assert_eq!(stats.total, 0);
        assert!(stats.strongest.is_none());
        assert!(stats.counts_per_year.is_empty());
        assert!(stats.mean_magnitude_per_year.is_empty());
    }
}
