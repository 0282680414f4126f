use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Per-file outcome. Serialized as `"Pending"`, `"Success"` or `"Error: <message>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStatus {
    Pending,
    Success,
    Error(String),
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchStatus::Pending => write!(f, "Pending"),
            BatchStatus::Success => write!(f, "Success"),
            BatchStatus::Error(message) => write!(f, "Error: {}", message),
        }
    }
}

impl std::str::FromStr for BatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(BatchStatus::Pending),
            "Success" => Ok(BatchStatus::Success),
            _ => s
                .strip_prefix("Error:")
                .map(|m| BatchStatus::Error(m.trim_start().to_string()))
                .ok_or_else(|| format!("Unknown batch status: {}", s)),
        }
    }
}

impl Serialize for BatchStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BatchStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRecord {
    pub filename: String,
    pub timestamp: DateTime<Local>,
    pub status: BatchStatus,
    pub issues_detected: String,
    /// Only meaningful when `status` is `Success`
    pub quality_score: u8,
    pub reviewer_comments: String,
}

impl BatchRecord {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            timestamp: Local::now(),
            status: BatchStatus::Pending,
            issues_detected: String::new(),
            quality_score: 0,
            reviewer_comments: String::new(),
        }
    }

    pub fn failed(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: BatchStatus::Error(message.into()),
            ..Self::new(filename)
        }
    }
}

/// All records of one run, in input order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionReport {
    pub records: Vec<BatchRecord>,
}

#[derive(Debug, Default, PartialEq)]
pub struct ReportTotals {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Mean quality score over successful records
    pub mean_score: Option<f64>,
}

impl SessionReport {
    pub fn push(&mut self, record: BatchRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn totals(&self) -> ReportTotals {
        let scores: Vec<f64> = self
            .records
            .iter()
            .filter(|r| r.status == BatchStatus::Success)
            .map(|r| f64::from(r.quality_score))
            .collect();
        let failed = self
            .records
            .iter()
            .filter(|r| matches!(r.status, BatchStatus::Error(_)))
            .count();

        ReportTotals {
            total: self.records.len(),
            succeeded: scores.len(),
            failed,
            mean_score: if scores.is_empty() {
                None
            } else {
                Some(scores.iter().sum::<f64>() / scores.len() as f64)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_value(BatchStatus::Success).unwrap(), json!("Success"));
        assert_eq!(serde_json::to_value(BatchStatus::Pending).unwrap(), json!("Pending"));
        assert_eq!(
            serde_json::to_value(BatchStatus::Error("HTTP 500".into())).unwrap(),
            json!("Error: HTTP 500")
        );
    }

    #[test]
    fn test_status_parse_back() {
        let status: BatchStatus = serde_json::from_value(json!("Error: boom: nested")).unwrap();
        assert_eq!(status, BatchStatus::Error("boom: nested".into()));
        assert!(serde_json::from_value::<BatchStatus>(json!("Failed")).is_err());
    }

    #[test]
    fn test_record_shape() {
        let record = BatchRecord::new("sales.csv");
        let value = serde_json::to_value(&record).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        for key in [
            "filename",
            "timestamp",
            "status",
            "issues_detected",
            "quality_score",
            "reviewer_comments",
        ] {
            assert!(keys.contains(&key.to_string()), "missing {key}");
        }
        assert_eq!(value["status"], json!("Pending"));
        assert_eq!(value["quality_score"], json!(0));
    }

    #[test]
    fn test_report_serializes_as_array() {
        let mut report = SessionReport::default();
        report.push(BatchRecord::new("a.csv"));
        report.push(BatchRecord::failed("b.csv", "bad"));
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[1]["status"], json!("Error: bad"));
    }

    #[test]
    fn test_totals() {
        let mut report = SessionReport::default();
        let mut a = BatchRecord::new("a.csv");
        a.status = BatchStatus::Success;
        a.quality_score = 80;
        let mut b = BatchRecord::new("b.csv");
        b.status = BatchStatus::Success;
        b.quality_score = 90;
        report.push(a);
        report.push(b);
        report.push(BatchRecord::failed("c.csv", "x"));

        let totals = report.totals();
        assert_eq!(totals.total, 3);
        assert_eq!(totals.succeeded, 2);
        assert_eq!(totals.failed, 1);
        assert_eq!(totals.mean_score, Some(85.0));
    }

    #[test]
    fn test_totals_empty() {
        assert_eq!(SessionReport::default().totals(), ReportTotals::default());
    }
}
