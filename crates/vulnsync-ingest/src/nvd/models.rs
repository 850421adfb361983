//! Feed document model and canonical record derivation
//!
//! The NVD JSON 1.1 feeds are deeply nested and every level can be absent
//! in practice, so the serde model is lenient throughout: missing objects
//! and lists deserialize to their defaults instead of failing the whole
//! document. An entry only becomes unusable when no identifier can be
//! extracted, and such entries are skipped by the merger rather than
//! treated as errors.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;

/// Description stored when a feed entry carries none
pub const PLACEHOLDER_DESCRIPTION: &str = "No description available";

/// Severity stored when neither CVSS metric block is present
pub const UNKNOWN_SEVERITY: &str = "UNKNOWN";

/// Classification stored when no CWE is listed
pub const UNKNOWN_CWE: &str = "N/A";

/// One decoded feed snapshot
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeedDocument {
    #[serde(rename = "CVE_Items")]
    pub items: Vec<RawEntry>,
}

/// One entry as published in the feed
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawEntry {
    pub cve: CveDetail,
    #[serde(rename = "publishedDate")]
    pub published_date: Option<String>,
    pub impact: Impact,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CveDetail {
    #[serde(rename = "CVE_data_meta")]
    pub meta: CveMeta,
    pub description: DescriptionBlock,
    pub problemtype: ProblemType,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CveMeta {
    #[serde(rename = "ID")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DescriptionBlock {
    pub description_data: Vec<LocalizedText>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LocalizedText {
    pub lang: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProblemType {
    pub problemtype_data: Vec<ProblemTypeData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProblemTypeData {
    pub description: Vec<LocalizedText>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Impact {
    #[serde(rename = "baseMetricV3")]
    pub base_metric_v3: Option<BaseMetricV3>,
    #[serde(rename = "baseMetricV2")]
    pub base_metric_v2: Option<BaseMetricV2>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BaseMetricV3 {
    #[serde(rename = "cvssV3")]
    pub cvss_v3: CvssV3,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CvssV3 {
    #[serde(rename = "baseScore")]
    pub base_score: Option<f64>,
    #[serde(rename = "baseSeverity")]
    pub base_severity: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BaseMetricV2 {
    #[serde(rename = "cvssV2")]
    pub cvss_v2: CvssV2,
    pub severity: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CvssV2 {
    #[serde(rename = "baseScore")]
    pub base_score: Option<f64>,
}

/// CVSS metrics resolved to a single schema version
///
/// The feeds can carry v2 and v3 metric blocks side by side; the choice
/// between them is made exactly once per entry and never re-checked
/// downstream.
#[derive(Debug, Clone, PartialEq)]
pub enum CvssMetrics {
    V3 { base_score: f64, severity: String },
    V2 { base_score: f64, severity: String },
    Missing,
}

impl CvssMetrics {
    pub fn base_score(&self) -> f64 {
        match self {
            CvssMetrics::V3 { base_score, .. } | CvssMetrics::V2 { base_score, .. } => *base_score,
            CvssMetrics::Missing => 0.0,
        }
    }

    pub fn severity(&self) -> &str {
        match self {
            CvssMetrics::V3 { severity, .. } | CvssMetrics::V2 { severity, .. } => severity,
            CvssMetrics::Missing => UNKNOWN_SEVERITY,
        }
    }
}

impl Impact {
    /// Resolve the metric blocks to one tagged variant, v3 preferred
    pub fn resolve(&self) -> CvssMetrics {
        if let Some(v3) = &self.base_metric_v3 {
            return CvssMetrics::V3 {
                base_score: v3.cvss_v3.base_score.unwrap_or(0.0),
                severity: v3
                    .cvss_v3
                    .base_severity
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_SEVERITY.to_string()),
            };
        }
        if let Some(v2) = &self.base_metric_v2 {
            return CvssMetrics::V2 {
                base_score: v2.cvss_v2.base_score.unwrap_or(0.0),
                severity: v2
                    .severity
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_SEVERITY.to_string()),
            };
        }
        CvssMetrics::Missing
    }
}

/// The deduplicated, merged representation of one vulnerability
///
/// Immutable after construction; built fresh each run and only ever
/// written to the sink.
#[derive(Debug, Clone, PartialEq)]
pub struct VulnerabilityRecord {
    pub id: String,
    pub description: String,
    pub severity: String,
    pub base_score: f64,
    pub published_date: DateTime<Utc>,
    pub cwe: String,
}

impl RawEntry {
    /// The entry's identifier, if one is present and non-empty
    pub fn id(&self) -> Option<&str> {
        self.cve.meta.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Derive the canonical record, or `None` when no identifier exists
    pub fn to_record(&self) -> Option<VulnerabilityRecord> {
        let id = self.id()?.to_string();

        let description = self
            .cve
            .description
            .description_data
            .iter()
            .find_map(|text| text.value.clone())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_DESCRIPTION.to_string());

        let cwe = self
            .cve
            .problemtype
            .problemtype_data
            .first()
            .and_then(|data| data.description.first())
            .and_then(|text| text.value.clone())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| UNKNOWN_CWE.to_string());

        let metrics = self.impact.resolve();

        Some(VulnerabilityRecord {
            id,
            description,
            severity: metrics.severity().to_string(),
            base_score: metrics.base_score(),
            published_date: parse_published_date(self.published_date.as_deref()),
            cwe,
        })
    }
}

/// Parse a feed timestamp, falling back to the current (ingestion) time
///
/// The NVD 1.1 feeds publish minute-precision timestamps (`2024-01-12T20:15Z`),
/// which RFC 3339 parsing rejects, so both forms are accepted.
pub fn parse_published_date(raw: Option<&str>) -> DateTime<Utc> {
    raw.and_then(|value| {
        DateTime::parse_from_rfc3339(value)
            .map(|parsed| parsed.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%MZ")
                    .ok()
                    .map(|naive| Utc.from_utc_datetime(&naive))
            })
    })
    .unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn entry_from_json(value: serde_json::Value) -> RawEntry {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_v3_metrics_preferred_over_v2() {
        let entry = entry_from_json(serde_json::json!({
            "cve": { "CVE_data_meta": { "ID": "CVE-2024-0001" } },
            "impact": {
                "baseMetricV3": { "cvssV3": { "baseScore": 9.8, "baseSeverity": "CRITICAL" } },
                "baseMetricV2": { "cvssV2": { "baseScore": 5.0 }, "severity": "MEDIUM" }
            }
        }));

        let metrics = entry.impact.resolve();
        assert_eq!(
            metrics,
            CvssMetrics::V3 {
                base_score: 9.8,
                severity: "CRITICAL".to_string()
            }
        );
    }

    #[test]
    fn test_v2_metrics_used_when_v3_absent() {
        let entry = entry_from_json(serde_json::json!({
            "cve": { "CVE_data_meta": { "ID": "CVE-2024-0002" } },
            "impact": {
                "baseMetricV2": { "cvssV2": { "baseScore": 5.0 }, "severity": "MEDIUM" }
            }
        }));

        let metrics = entry.impact.resolve();
        assert_eq!(
            metrics,
            CvssMetrics::V2 {
                base_score: 5.0,
                severity: "MEDIUM".to_string()
            }
        );
    }

    #[test]
    fn test_missing_metrics_default() {
        let metrics = Impact::default().resolve();
        assert_eq!(metrics, CvssMetrics::Missing);
        assert_eq!(metrics.base_score(), 0.0);
        assert_eq!(metrics.severity(), UNKNOWN_SEVERITY);
    }

    #[test]
    fn test_to_record_full_entry() {
        let entry = entry_from_json(serde_json::json!({
            "cve": {
                "CVE_data_meta": { "ID": "CVE-2024-1234" },
                "description": {
                    "description_data": [ { "lang": "en", "value": "Heap overflow in parser" } ]
                },
                "problemtype": {
                    "problemtype_data": [ { "description": [ { "lang": "en", "value": "CWE-122" } ] } ]
                }
            },
            "publishedDate": "2024-01-12T20:15Z",
            "impact": {
                "baseMetricV3": { "cvssV3": { "baseScore": 7.5, "baseSeverity": "HIGH" } }
            }
        }));

        let record = entry.to_record().unwrap();
        assert_eq!(record.id, "CVE-2024-1234");
        assert_eq!(record.description, "Heap overflow in parser");
        assert_eq!(record.severity, "HIGH");
        assert_eq!(record.base_score, 7.5);
        assert_eq!(record.cwe, "CWE-122");
        assert_eq!(record.published_date.year(), 2024);
        assert_eq!(record.published_date.month(), 1);
        assert_eq!(record.published_date.day(), 12);
    }

    #[test]
    fn test_to_record_applies_fallbacks() {
        let entry = entry_from_json(serde_json::json!({
            "cve": { "CVE_data_meta": { "ID": "CVE-2024-0003" } }
        }));

        let record = entry.to_record().unwrap();
        assert_eq!(record.description, PLACEHOLDER_DESCRIPTION);
        assert_eq!(record.severity, UNKNOWN_SEVERITY);
        assert_eq!(record.base_score, 0.0);
        assert_eq!(record.cwe, UNKNOWN_CWE);
    }

    #[test]
    fn test_to_record_without_id_is_none() {
        assert!(RawEntry::default().to_record().is_none());

        let entry = entry_from_json(serde_json::json!({
            "cve": { "CVE_data_meta": { "ID": "" } }
        }));
        assert!(entry.to_record().is_none());
    }

    #[test]
    fn test_parse_published_date_formats() {
        let minute_precision = parse_published_date(Some("2024-01-12T20:15Z"));
        assert_eq!(minute_precision.to_rfc3339(), "2024-01-12T20:15:00+00:00");

        let rfc3339 = parse_published_date(Some("2024-01-12T20:15:30Z"));
        assert_eq!(rfc3339.to_rfc3339(), "2024-01-12T20:15:30+00:00");
    }

    #[test]
    fn test_parse_published_date_fallback_is_recent() {
        let before = Utc::now();
        let parsed = parse_published_date(None);
        let garbled = parse_published_date(Some("not a date"));
        let after = Utc::now();

        assert!(parsed >= before && parsed <= after);
        assert!(garbled >= before && garbled <= after);
    }
}
