//! ResultPublisher trait and built-in publishers

use std::io::Write;
use std::sync::{Arc, Mutex};

use tracing::debug;

use super::types::{ClassificationReport, PublishError};

/// Trait for the collaborator receiving final classification results
pub trait ResultPublisher: Send {
    /// Forward a validated report; an error means nothing was published
    fn publish(&mut self, report: &ClassificationReport) -> Result<(), PublishError>;
}

/// Publisher that discards every report
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPublisher;

impl ResultPublisher for NoopPublisher {
    fn publish(&mut self, _report: &ClassificationReport) -> Result<(), PublishError> {
        Ok(())
    }
}

/// Publisher keeping reports in memory
///
/// Clones share the same buffer, so a caller can keep one handle and give
/// another to a store.
#[derive(Debug, Default, Clone)]
pub struct MemoryPublisher {
    reports: Arc<Mutex<Vec<ClassificationReport>>>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// All reports published so far, oldest first
    pub fn reports(&self) -> Vec<ClassificationReport> {
        self.reports
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn last(&self) -> Option<ClassificationReport> {
        self.reports
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .last()
            .cloned()
    }
}

impl ResultPublisher for MemoryPublisher {
    fn publish(&mut self, report: &ClassificationReport) -> Result<(), PublishError> {
        self.reports
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(report.clone());
        Ok(())
    }
}

/// Publisher writing each report as one JSON line
pub struct JsonPublisher<W> {
    writer: W,
}

impl<W: Write + Send> JsonPublisher<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> ResultPublisher for JsonPublisher<W> {
    fn publish(&mut self, report: &ClassificationReport) -> Result<(), PublishError> {
        serde_json::to_writer(&mut self.writer, report)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        debug!(
            "Wrote report for run {} ({} cells, {} patterns)",
            report.run_id,
            report.cells.len(),
            report.architectural_patterns.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Polygon;
    use crate::publish::ClassifiedPolygon;
    use crate::store::PolygonCategory;
    use uuid::Uuid;

    fn report() -> ClassificationReport {
        ClassificationReport {
            run_id: Uuid::new_v4(),
            cells: vec![ClassifiedPolygon {
                image_id: "a".into(),
                index: 0,
                polygon: Polygon::rectangle(0.0, 0.0, 4.0, 4.0).unwrap(),
                label: 7,
            }],
            architectural_patterns: Vec::new(),
        }
    }

    #[test]
    fn test_memory_publisher_shares_buffer() {
        let handle = MemoryPublisher::new();
        let mut publisher = handle.clone();

        publisher.publish(&report()).unwrap();

        assert_eq!(handle.reports().len(), 1);
        assert_eq!(handle.last().unwrap().labels(PolygonCategory::Cell), vec![7]);
    }

    #[test]
    fn test_json_publisher_writes_lines() {
        let mut publisher = JsonPublisher::new(Vec::new());
        let first = report();
        publisher.publish(&first).unwrap();
        publisher.publish(&report()).unwrap();

        let output = String::from_utf8(publisher.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: ClassificationReport = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed, first);
    }
}
