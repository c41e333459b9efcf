//! Triage data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Assessment urgency level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    High,
    Moderate,
    Low,
}

impl std::fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UrgencyLevel::High => write!(f, "high"),
            UrgencyLevel::Moderate => write!(f, "moderate"),
            UrgencyLevel::Low => write!(f, "low"),
        }
    }
}

impl std::str::FromStr for UrgencyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(UrgencyLevel::High),
            "moderate" => Ok(UrgencyLevel::Moderate),
            "low" => Ok(UrgencyLevel::Low),
            _ => Err(format!("unknown urgency level: {}", s)),
        }
    }
}

/// One past assessment in a patient's history timeline.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub id: String,
    pub date: DateTime<Utc>,
    pub urgency_level: UrgencyLevel,
    /// 0-100 composite risk score.
    pub risk_score: u8,
    pub primary_complaint: String,
    pub symptoms: Vec<String>,
    pub specialist: String,
}

/// Workflow status of a flagged case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CaseStatus {
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
    #[serde(rename = "Video Consult")]
    VideoConsult,
    #[serde(rename = "Emergency Route")]
    EmergencyRoute,
    Pending,
}

/// A high-risk case row on the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct HighRiskCase {
    pub id: String,
    /// Masked patient identifier, last four digits only.
    pub patient_id: String,
    pub urgency: UrgencyLevel,
    pub primary_complaint: String,
    pub timestamp: DateTime<Utc>,
    pub status: CaseStatus,
}

/// Assessments completed on one day.
#[derive(Debug, Clone, Serialize)]
pub struct DailyCount {
    pub date: String,
    pub count: u32,
}

/// Assessment counts per urgency level.
#[derive(Debug, Clone, Serialize)]
pub struct UrgencyDistribution {
    pub high: u32,
    pub moderate: u32,
    pub low: u32,
}

/// Admin dashboard snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct AdminStats {
    pub total_assessments: u32,
    pub high_risk_count: u32,
    pub active_consultations: u32,
    /// Percentage of assessments that raised a red flag.
    pub red_flag_frequency: f32,
    pub daily_assessments: Vec<DailyCount>,
    pub urgency_distribution: UrgencyDistribution,
    pub high_risk_cases: Vec<HighRiskCase>,
}
