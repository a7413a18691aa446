// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use shiksha_model::{
    ApaarMilestone, DashboardSnapshot, DirectorMessage, EventRecord, MonthRecord, StateEngagement,
    StateMonth, StatePerf, TechnicalDevelopments, format_count,
};
use std::collections::BTreeMap;
use std::path::PathBuf;

// One row per month, April 2025 through January 2026:
// (label, schools, teachers, students, apaar_ids, attendance_rate).
const MONTH_TABLE: [(&str, u64, u64, u64, u64, f64); 10] = [
    ("April 2025", 915_000, 4_230_000, 106_700_000, 120_000_000, 95.8),
    ("May 2025", 920_000, 4_260_000, 107_800_000, 135_000_000, 96.0),
    ("June 2025", 923_000, 4_280_000, 108_500_000, 150_000_000, 96.1),
    ("July 2025", 927_000, 4_290_000, 109_200_000, 165_000_000, 96.2),
    ("August 2025", 930_000, 4_300_000, 109_800_000, 180_000_000, 96.3),
    ("September 2025", 935_000, 4_310_000, 110_200_000, 195_000_000, 96.2),
    ("October 2025", 938_000, 4_320_000, 110_500_000, 207_000_000, 96.2),
    ("November 2025", 942_000, 4_340_000, 111_200_000, 218_000_000, 96.4),
    ("December 2025", 945_000, 4_350_000, 111_800_000, 227_000_000, 96.6),
    ("January 2026", 948_000, 4_370_000, 112_500_000, 235_000_000, 96.8),
];

const TOP_STATES: [(&str, f64, f64, f64); 5] = [
    ("Kerala", 96.5, 98.2, 94.1),
    ("Tamil Nadu", 94.8, 96.3, 91.7),
    ("Gujarat", 93.2, 95.8, 90.4),
    ("Maharashtra", 91.6, 95.1, 89.2),
    ("Karnataka", 90.9, 94.7, 88.6),
];

/// Fully-populated snapshot matching what the analytics backend serves.
/// Deterministic; the same call always yields the same data.
pub fn sample_snapshot() -> DashboardSnapshot {
    let months = MONTH_TABLE
        .iter()
        .enumerate()
        .map(
            |(index, &(label, schools, teachers, students, apaar_ids, attendance_rate))| {
                let mut record = MonthRecord {
                    month: label.to_owned(),
                    schools,
                    teachers,
                    students,
                    apaar_ids,
                    attendance_rate,
                    highlights: vec![
                        format!("{} schools reporting live attendance", format_count(schools)),
                        format!("APAAR registrations reached {}M", apaar_ids / 1_000_000),
                    ],
                    activities: vec!["State review meetings held across regions".to_owned()],
                    events: Vec::new(),
                    states: state_breakdown(index),
                };
                if label == "December 2025" {
                    record.events.push(EventRecord {
                        name: "National Education Technology Summit".to_owned(),
                        date: "December 12, 2025".to_owned(),
                        description: "Annual convening of state education technology leads"
                            .to_owned(),
                        participants: 4_800,
                    });
                }
                record
            },
        )
        .collect();

    DashboardSnapshot {
        director_message: DirectorMessage {
            name: "Dr. Kavita Raghavan".to_owned(),
            position: "Director, Vidya Samiksha Kendra".to_owned(),
            message: "This year the dashboard crossed 235 million APAAR registrations while \
                      attendance tracking reached every district."
                .to_owned(),
        },
        months,
        technical_developments: TechnicalDevelopments {
            apaar_milestones: MONTH_TABLE
                .iter()
                .map(|&(label, _, _, _, apaar_ids, _)| ApaarMilestone {
                    month: label.to_owned(),
                    registrations: apaar_ids,
                })
                .collect(),
            dashboard_features: vec![
                "AI-assisted chatbot for district queries".to_owned(),
                "Hindi language interface".to_owned(),
            ],
            infrastructure_upgrades: vec!["CDN rollout for state mirrors".to_owned()],
        },
        key_performance_indicators: kpi_categories(),
        state_engagement: StateEngagement {
            top_performing_states: TOP_STATES
                .iter()
                .map(
                    |&(name, apaar_coverage, attendance, digital_readiness)| StatePerf {
                        name: name.to_owned(),
                        apaar_coverage,
                        attendance,
                        digital_readiness,
                    },
                )
                .collect(),
        },
    }
}

/// Minimal valid snapshot for tests that only need shape, not breadth.
pub fn tiny_snapshot() -> DashboardSnapshot {
    let mut snapshot = sample_snapshot();
    snapshot.months.truncate(1);
    snapshot
}

pub fn temp_pref_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("preferences.toml");
    Ok((dir, path))
}

fn state_breakdown(month_index: usize) -> BTreeMap<String, StateMonth> {
    TOP_STATES
        .iter()
        .map(|&(name, apaar_coverage, attendance, _)| {
            // Early months trail the final figures slightly.
            let lag = (MONTH_TABLE.len() - 1 - month_index) as f64 * 0.2;
            (
                name.to_owned(),
                StateMonth {
                    attendance: round1(attendance - lag),
                    apaar_coverage: round1(apaar_coverage - lag),
                    schools: 16_240 - (MONTH_TABLE.len() - 1 - month_index) as u64 * 40,
                },
            )
        })
        .collect()
}

fn kpi_categories() -> shiksha_model::KpiCategories {
    let mut overall = BTreeMap::new();
    overall.insert("apaar_adoption".to_owned(), "87.3%".to_owned());
    overall.insert("school_growth".to_owned(), "+33,000".to_owned());

    let mut digital = BTreeMap::new();
    digital.insert("digital_readiness".to_owned(), "87.3%".to_owned());
    digital.insert("dashboard_uptime".to_owned(), "99.95%".to_owned());

    let mut categories = BTreeMap::new();
    categories.insert("overall_growth".to_owned(), overall);
    categories.insert("digital_infrastructure".to_owned(), digital);
    categories
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
