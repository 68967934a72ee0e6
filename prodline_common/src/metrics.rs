//! Production metrics: the snapshot pushed to observers and the
//! append-only history owned by the production line.

use serde::{Deserialize, Serialize};

/// Metrics captured together under the line lock.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Most recent cycle's production rate (units/minute).
    pub production_rate: f64,
    /// Error cycles since the last maintenance.
    pub error_count: u32,
    /// Cumulative output, never decreasing.
    pub total_produced: u64,
    /// Seconds since the line was constructed.
    pub uptime_s: f64,
}

/// One history entry per completed cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    /// 1-based cycle sequence number.
    pub cycle: u64,
    /// Seconds since line construction at which the record was taken.
    pub time_s: f64,
    /// Production rate of this cycle (0 for an error cycle).
    pub production_rate: f64,
    /// Error count after this cycle.
    pub error_count: u32,
    /// Cumulative output after this cycle.
    pub total_produced: u64,
}

/// Append-only, time-ordered record of completed cycles.
///
/// `cycle` and `time_s` are strictly increasing across entries.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsHistory {
    records: Vec<MetricsRecord>,
}

impl MetricsHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record for the next cycle and return it.
    ///
    /// A `time_s` that does not advance past the previous entry (clock
    /// resolution) is nudged forward so ordering stays strict.
    pub fn push(&mut self, time_s: f64, snapshot: &MetricsSnapshot) -> MetricsRecord {
        let (cycle, time_s) = match self.records.last() {
            Some(last) if time_s <= last.time_s => {
                (last.cycle + 1, last.time_s + f64::EPSILON * last.time_s.max(1.0))
            }
            Some(last) => (last.cycle + 1, time_s),
            None => (1, time_s),
        };
        let record = MetricsRecord {
            cycle,
            time_s,
            production_rate: snapshot.production_rate,
            error_count: snapshot.error_count,
            total_produced: snapshot.total_produced,
        };
        self.records.push(record);
        record
    }

    /// Number of recorded cycles.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if no cycle has completed yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recent record.
    pub fn last(&self) -> Option<&MetricsRecord> {
        self.records.last()
    }

    /// All records in cycle order.
    pub fn records(&self) -> &[MetricsRecord] {
        &self.records
    }

    /// Mean production rate over all recorded cycles (error cycles count as 0).
    pub fn average_production_rate(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.records.iter().map(|r| r.production_rate).sum();
        sum / self.records.len() as f64
    }
}
