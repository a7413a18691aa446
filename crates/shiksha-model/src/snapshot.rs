// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectorMessage {
    pub name: String,
    pub position: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub name: String,
    pub date: String,
    pub description: String,
    #[serde(default)]
    pub participants: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateMonth {
    pub attendance: f64,
    pub apaar_coverage: f64,
    pub schools: u64,
}

/// One month of pre-aggregated figures. `month` is the display label the
/// backend already formatted ("April 2025"); it is never parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthRecord {
    pub month: String,
    pub schools: u64,
    pub teachers: u64,
    pub students: u64,
    pub apaar_ids: u64,
    pub attendance_rate: f64,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default)]
    pub events: Vec<EventRecord>,
    #[serde(default)]
    pub states: BTreeMap<String, StateMonth>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApaarMilestone {
    pub month: String,
    pub registrations: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TechnicalDevelopments {
    #[serde(default)]
    pub apaar_milestones: Vec<ApaarMilestone>,
    #[serde(default)]
    pub dashboard_features: Vec<String>,
    #[serde(default)]
    pub infrastructure_upgrades: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatePerf {
    pub name: String,
    pub apaar_coverage: f64,
    pub attendance: f64,
    pub digital_readiness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StateEngagement {
    #[serde(default)]
    pub top_performing_states: Vec<StatePerf>,
}

/// Category name -> metric key -> pre-formatted display value.
pub type KpiCategories = BTreeMap<String, BTreeMap<String, String>>;

/// One complete fetch result from the analytics endpoint. Immutable once
/// installed; a refetch replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub director_message: DirectorMessage,
    pub months: Vec<MonthRecord>,
    #[serde(default)]
    pub technical_developments: TechnicalDevelopments,
    #[serde(default)]
    pub key_performance_indicators: KpiCategories,
    #[serde(default)]
    pub state_engagement: StateEngagement,
}

impl DashboardSnapshot {
    /// Shape check applied at the fetch boundary. A payload that fails here
    /// is rejected wholesale; partially-shaped data is never rendered.
    pub fn validate(&self) -> Result<()> {
        if self.months.is_empty() {
            bail!("payload has no months");
        }
        if self.director_message.name.trim().is_empty() {
            bail!("payload is missing director_message.name");
        }
        for month in &self.months {
            if month.month.trim().is_empty() {
                bail!("payload has a month record without a label");
            }
            if !(0.0..=100.0).contains(&month.attendance_rate) {
                bail!(
                    "attendance rate {} for {} is out of range",
                    month.attendance_rate,
                    month.month
                );
            }
        }
        Ok(())
    }

    /// Latest month is always the last entry; `months` arrives sorted
    /// ascending by time.
    pub fn latest_month(&self) -> Option<&MonthRecord> {
        self.months.last()
    }

    pub fn previous_month(&self) -> Option<&MonthRecord> {
        self.months.len().checked_sub(2).map(|i| &self.months[i])
    }
}

#[cfg(test)]
mod tests {
    use super::{DashboardSnapshot, DirectorMessage, MonthRecord};

    fn month(label: &str, attendance_rate: f64) -> MonthRecord {
        MonthRecord {
            month: label.to_owned(),
            schools: 915_000,
            teachers: 4_230_000,
            students: 106_700_000,
            apaar_ids: 120_000_000,
            attendance_rate,
            highlights: Vec::new(),
            activities: Vec::new(),
            events: Vec::new(),
            states: Default::default(),
        }
    }

    fn snapshot(months: Vec<MonthRecord>) -> DashboardSnapshot {
        DashboardSnapshot {
            director_message: DirectorMessage {
                name: "Dr. Sharma".to_owned(),
                position: "Director".to_owned(),
                message: "Welcome.".to_owned(),
            },
            months,
            technical_developments: Default::default(),
            key_performance_indicators: Default::default(),
            state_engagement: Default::default(),
        }
    }

    #[test]
    fn valid_snapshot_passes() {
        let snapshot = snapshot(vec![month("April 2025", 95.8)]);
        snapshot.validate().expect("one well-formed month suffices");
    }

    #[test]
    fn empty_months_rejected() {
        let error = snapshot(Vec::new())
            .validate()
            .expect_err("no months should fail");
        assert!(error.to_string().contains("no months"));
    }

    #[test]
    fn missing_director_name_rejected() {
        let mut snapshot = snapshot(vec![month("April 2025", 95.8)]);
        snapshot.director_message.name = "  ".to_owned();
        let error = snapshot.validate().expect_err("blank name should fail");
        assert!(error.to_string().contains("director_message"));
    }

    #[test]
    fn out_of_range_attendance_rejected() {
        let error = snapshot(vec![month("April 2025", 104.2)])
            .validate()
            .expect_err("rate above 100 should fail");
        assert!(error.to_string().contains("out of range"));
    }

    #[test]
    fn latest_and_previous_months() {
        let snapshot = snapshot(vec![month("April 2025", 95.8), month("May 2025", 96.0)]);
        assert_eq!(
            snapshot.latest_month().map(|m| m.month.as_str()),
            Some("May 2025")
        );
        assert_eq!(
            snapshot.previous_month().map(|m| m.month.as_str()),
            Some("April 2025")
        );

        let single = super::DashboardSnapshot {
            months: vec![month("April 2025", 95.8)],
            ..snapshot
        };
        assert!(single.previous_month().is_none());
    }

    #[test]
    fn wire_field_names_deserialize() {
        let raw = r#"{
            "director_message": {"name": "Dr. Sharma", "position": "Director", "message": "Hi"},
            "months": [{
                "month": "January 2026",
                "schools": 948000,
                "teachers": 4370000,
                "students": 112500000,
                "apaar_ids": 235000000,
                "attendance_rate": 96.8,
                "states": {"Kerala": {"attendance": 98.2, "apaar_coverage": 96.5, "schools": 16240}}
            }],
            "technical_developments": {
                "apaar_milestones": [{"month": "Jan", "registrations": 235000000}],
                "dashboard_features": ["AI chatbot"],
                "infrastructure_upgrades": ["CDN rollout"]
            },
            "key_performance_indicators": {
                "overall_growth": {"apaar_adoption": "87.3%"}
            },
            "state_engagement": {
                "top_performing_states": [
                    {"name": "Kerala", "apaar_coverage": 96.5, "attendance": 98.2, "digital_readiness": 94.1}
                ]
            }
        }"#;

        let snapshot: DashboardSnapshot =
            serde_json::from_str(raw).expect("wire payload should deserialize");
        assert_eq!(snapshot.months[0].apaar_ids, 235_000_000);
        assert_eq!(snapshot.months[0].states["Kerala"].schools, 16_240);
        assert_eq!(
            snapshot.state_engagement.top_performing_states[0].name,
            "Kerala"
        );
        snapshot.validate().expect("payload is well formed");
    }
}
