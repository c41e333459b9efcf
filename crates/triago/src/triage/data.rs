//! Compiled-in sample datasets.
//!
//! The front end renders these verbatim; there is no persistence behind them.

use chrono::{TimeZone, Utc};

use super::models::{
    AdminStats, CaseStatus, DailyCount, HighRiskCase, HistoryEntry, UrgencyDistribution,
    UrgencyLevel,
};

/// Assessment history for the demo patient.
pub fn sample_history() -> Vec<HistoryEntry> {
    vec![
        HistoryEntry {
            id: "1".to_string(),
            date: Utc.with_ymd_and_hms(2026, 2, 5, 0, 0, 0).unwrap(),
            urgency_level: UrgencyLevel::High,
            risk_score: 100,
            primary_complaint: "Severe chest pain".to_string(),
            symptoms: vec![
                "Chest pain".to_string(),
                "Sweating".to_string(),
                "Shortness of breath".to_string(),
            ],
            specialist: "Cardiology".to_string(),
        },
        HistoryEntry {
            id: "2".to_string(),
            date: Utc.with_ymd_and_hms(2026, 1, 28, 0, 0, 0).unwrap(),
            urgency_level: UrgencyLevel::Moderate,
            risk_score: 50,
            primary_complaint: "Persistent headache".to_string(),
            symptoms: vec![
                "Headache".to_string(),
                "Nausea".to_string(),
                "Light sensitivity".to_string(),
            ],
            specialist: "Neurology".to_string(),
        },
        HistoryEntry {
            id: "3".to_string(),
            date: Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap(),
            urgency_level: UrgencyLevel::Low,
            risk_score: 25,
            primary_complaint: "Mild sore throat".to_string(),
            symptoms: vec![
                "Sore throat".to_string(),
                "Mild fever".to_string(),
                "Fatigue".to_string(),
            ],
            specialist: "General Practice".to_string(),
        },
        HistoryEntry {
            id: "4".to_string(),
            date: Utc.with_ymd_and_hms(2025, 12, 20, 0, 0, 0).unwrap(),
            urgency_level: UrgencyLevel::Moderate,
            risk_score: 60,
            primary_complaint: "Ankle sprain".to_string(),
            symptoms: vec![
                "Ankle pain".to_string(),
                "Swelling".to_string(),
                "Difficulty walking".to_string(),
            ],
            specialist: "Orthopedics".to_string(),
        },
    ]
}

/// Admin dashboard snapshot.
pub fn admin_stats() -> AdminStats {
    AdminStats {
        total_assessments: 1247,
        high_risk_count: 89,
        active_consultations: 12,
        red_flag_frequency: 7.1,
        daily_assessments: vec![
            DailyCount { date: "Feb 1".to_string(), count: 42 },
            DailyCount { date: "Feb 2".to_string(), count: 38 },
            DailyCount { date: "Feb 3".to_string(), count: 51 },
            DailyCount { date: "Feb 4".to_string(), count: 45 },
            DailyCount { date: "Feb 5".to_string(), count: 48 },
            DailyCount { date: "Feb 6".to_string(), count: 33 },
        ],
        urgency_distribution: UrgencyDistribution {
            high: 89,
            moderate: 412,
            low: 746,
        },
        high_risk_cases: vec![
            HighRiskCase {
                id: "P-001".to_string(),
                patient_id: "****1234".to_string(),
                urgency: UrgencyLevel::High,
                primary_complaint: "Severe chest pain".to_string(),
                timestamp: Utc.with_ymd_and_hms(2026, 2, 6, 9, 30, 0).unwrap(),
                status: CaseStatus::InProgress,
            },
            HighRiskCase {
                id: "P-002".to_string(),
                patient_id: "****5678".to_string(),
                urgency: UrgencyLevel::High,
                primary_complaint: "Difficulty breathing".to_string(),
                timestamp: Utc.with_ymd_and_hms(2026, 2, 6, 8, 15, 0).unwrap(),
                status: CaseStatus::Resolved,
            },
            HighRiskCase {
                id: "P-003".to_string(),
                patient_id: "****9012".to_string(),
                urgency: UrgencyLevel::High,
                primary_complaint: "Severe headache with vision changes".to_string(),
                timestamp: Utc.with_ymd_and_hms(2026, 2, 6, 7, 45, 0).unwrap(),
                status: CaseStatus::VideoConsult,
            },
            HighRiskCase {
                id: "P-004".to_string(),
                patient_id: "****3456".to_string(),
                urgency: UrgencyLevel::High,
                primary_complaint: "Abdominal pain with fever".to_string(),
                timestamp: Utc.with_ymd_and_hms(2026, 2, 6, 6, 20, 0).unwrap(),
                status: CaseStatus::EmergencyRoute,
            },
            HighRiskCase {
                id: "P-005".to_string(),
                patient_id: "****7890".to_string(),
                urgency: UrgencyLevel::Moderate,
                primary_complaint: "Persistent cough".to_string(),
                timestamp: Utc.with_ymd_and_hms(2026, 2, 6, 5, 55, 0).unwrap(),
                status: CaseStatus::Pending,
            },
        ],
    }
}
