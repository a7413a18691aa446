// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::ViewName;
use shiksha_model::{DashboardSnapshot, format_count, format_millions, format_percent, kpi_label};
use std::ops::Range;

const MIN_QUERY_CHARS: usize = 2;

/// One searchable item: a display title, supporting description, and the
/// view the dashboard should jump to when the result is picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEntry {
    pub title: String,
    pub description: String,
    pub target: ViewName,
}

/// Where in the entry the query matched; stronger matches sort first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchRank {
    ExactTitle,
    TitleSubstring,
    DescriptionSubstring,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    pub entry: SearchEntry,
    pub rank: MatchRank,
    /// Byte range of the matched text, into the title for title ranks
    /// and into the description otherwise.
    pub highlight: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Queries under two characters are refused, not answered with noise.
    TooShort,
    Matches(Vec<SearchMatch>),
}

/// In-memory index over everything the dashboard shows. Rebuilt whenever
/// a new snapshot is installed; queries never touch the network.
#[derive(Debug, Clone)]
pub struct SearchIndex {
    entries: Vec<SearchEntry>,
}

impl SearchIndex {
    pub fn build(snapshot: &DashboardSnapshot) -> Self {
        let mut entries = Vec::new();

        if let Some(latest) = snapshot.latest_month() {
            let metrics = [
                ("Total Schools", format_count(latest.schools)),
                ("Teachers", format_millions(latest.teachers, 2)),
                ("Students", format_millions(latest.students, 1)),
                ("APAAR IDs Generated", format_millions(latest.apaar_ids, 0)),
                ("Attendance Rate", format_percent(latest.attendance_rate)),
            ];
            for (label, value) in metrics {
                entries.push(SearchEntry {
                    title: label.to_owned(),
                    description: format!("{value} as of {}", latest.month),
                    target: ViewName::Highlights,
                });
            }
        }

        for month in &snapshot.months {
            entries.push(SearchEntry {
                title: month.month.clone(),
                description: format!(
                    "Monthly report: {} schools, attendance {}",
                    format_count(month.schools),
                    format_percent(month.attendance_rate),
                ),
                target: ViewName::Calendar,
            });
        }

        for state in &snapshot.state_engagement.top_performing_states {
            entries.push(SearchEntry {
                title: state.name.clone(),
                description: format!(
                    "APAAR coverage {}, attendance {}",
                    format_percent(state.apaar_coverage),
                    format_percent(state.attendance),
                ),
                target: ViewName::TopStates,
            });
        }

        for (category, metrics) in &snapshot.key_performance_indicators {
            for metric in metrics.keys() {
                entries.push(SearchEntry {
                    title: kpi_label(metric),
                    description: format!("{} indicator", kpi_label(category)),
                    target: ViewName::Kpis,
                });
            }
        }

        for (title, target) in SECTION_HEADINGS {
            entries.push(SearchEntry {
                title: (*title).to_owned(),
                description: "Dashboard section".to_owned(),
                target: *target,
            });
        }

        for (term, description) in GLOSSARY {
            entries.push(SearchEntry {
                title: (*term).to_owned(),
                description: (*description).to_owned(),
                target: ViewName::TechnicalDevelopments,
            });
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[SearchEntry] {
        &self.entries
    }

    /// Case-insensitive lookup. Results sort by match strength; ties keep
    /// index order, so metrics outrank glossary entries at equal rank.
    pub fn query(&self, raw: &str) -> QueryOutcome {
        let query = raw.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return QueryOutcome::TooShort;
        }

        let needle = query.to_lowercase();
        let mut matches = Vec::new();
        for entry in &self.entries {
            let (title, title_offsets) = fold_for_search(&entry.title);
            if title == needle {
                matches.push(SearchMatch {
                    entry: entry.clone(),
                    rank: MatchRank::ExactTitle,
                    highlight: 0..entry.title.len(),
                });
            } else if let Some(position) = title.find(&needle) {
                matches.push(SearchMatch {
                    entry: entry.clone(),
                    rank: MatchRank::TitleSubstring,
                    highlight: title_offsets[position]..title_offsets[position + needle.len()],
                });
            } else {
                let (description, description_offsets) = fold_for_search(&entry.description);
                if let Some(position) = description.find(&needle) {
                    matches.push(SearchMatch {
                        entry: entry.clone(),
                        rank: MatchRank::DescriptionSubstring,
                        highlight: description_offsets[position]
                            ..description_offsets[position + needle.len()],
                    });
                }
            }
        }

        matches.sort_by_key(|found| found.rank);
        QueryOutcome::Matches(matches)
    }
}

/// Lowercase `original` for matching, keeping a map from every byte of
/// the folded string (plus its end) back to a character boundary in the
/// original. Case folding can change byte lengths, so positions found in
/// the folded text must be translated before they index the original.
fn fold_for_search(original: &str) -> (String, Vec<usize>) {
    let mut folded = String::with_capacity(original.len());
    let mut offsets = Vec::with_capacity(original.len() + 1);
    for (index, ch) in original.char_indices() {
        for low in ch.to_lowercase() {
            folded.push(low);
        }
        offsets.resize(folded.len(), index);
    }
    offsets.push(original.len());
    (folded, offsets)
}

const SECTION_HEADINGS: &[(&str, ViewName)] = &[
    ("Director's Message", ViewName::DirectorMessage),
    ("Monthly Highlights", ViewName::Highlights),
    ("Activity Calendar", ViewName::Calendar),
    ("Growth Trends", ViewName::Trends),
    ("Technical Developments", ViewName::TechnicalDevelopments),
    ("Key Performance Indicators", ViewName::Kpis),
    ("Top Performing States", ViewName::TopStates),
];

const GLOSSARY: &[(&str, &str)] = &[
    (
        "APAAR",
        "Automated Permanent Academic Account Registry, the lifelong student ID",
    ),
    (
        "VSK",
        "Vidya Samiksha Kendra, the state education data command centre",
    ),
    (
        "NEP 2020",
        "National Education Policy 2020, the reform framework behind the dashboard",
    ),
    (
        "UDISE+",
        "Unified District Information System for Education, the school census",
    ),
];
