//! Collection point for the output of a poll cycle.

use huesight_common::{Fields, MetricRecord, Tags};

use crate::error::CycleError;

/// Receiver of records and non-fatal errors.
pub trait MetricSink {
    /// Record one counter-style measurement. The sink assigns the timestamp.
    fn add_counter(&mut self, measurement: &str, fields: Fields, tags: Tags);

    fn add_error(&mut self, error: CycleError);
}

/// In-memory sink filled by one poll cycle.
#[derive(Debug, Default)]
pub struct Accumulator {
    records: Vec<MetricRecord>,
    errors: Vec<CycleError>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[MetricRecord] {
        &self.records
    }

    pub fn errors(&self) -> &[CycleError] {
        &self.errors
    }

    pub fn has_measurement(&self, measurement: &str) -> bool {
        self.records.iter().any(|r| r.measurement == measurement)
    }

    pub fn into_parts(self) -> (Vec<MetricRecord>, Vec<CycleError>) {
        (self.records, self.errors)
    }
}

impl MetricSink for Accumulator {
    fn add_counter(&mut self, measurement: &str, fields: Fields, tags: Tags) {
        self.records.push(MetricRecord::new(measurement, fields, tags));
    }

    fn add_error(&mut self, error: CycleError) {
        self.errors.push(error);
    }
}
