// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    English,
    Hindi,
}

impl Language {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Hindi => "hi",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "en" => Some(Self::English),
            "hi" => Some(Self::Hindi),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Hindi => "Hindi",
        }
    }
}

/// Quarter filter over the reporting window. The dataset runs on the Indian
/// fiscal year, so Q1 starts in April and Q4 holds the January tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodFilter {
    All,
    Q1,
    Q2,
    Q3,
    Q4,
}

impl PeriodFilter {
    pub const ALL: [Self; 5] = [Self::All, Self::Q1, Self::Q2, Self::Q3, Self::Q4];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Q1 => "q1",
            Self::Q2 => "q2",
            Self::Q3 => "q3",
            Self::Q4 => "q4",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "all" => Some(Self::All),
            "q1" => Some(Self::Q1),
            "q2" => Some(Self::Q2),
            "q3" => Some(Self::Q3),
            "q4" => Some(Self::Q4),
            _ => None,
        }
    }

    /// Index range into a chronological `months` sequence of `total`
    /// entries, clamped so a short dataset yields an empty or partial range.
    pub fn month_indexes(self, total: usize) -> Range<usize> {
        let (start, end) = match self {
            Self::All => (0, total),
            Self::Q1 => (0, 3),
            Self::Q2 => (3, 6),
            Self::Q3 => (6, 9),
            Self::Q4 => (9, total.max(9)),
        };
        start.min(total)..end.min(total)
    }
}

/// State slices a view can depend on. Navigation mutations report which
/// slices changed so the render layer re-renders only dependent views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateSlice {
    Data,
    MonthIndex,
    Language,
    Period,
}

/// Which time period and language the dashboard is showing. Single writer;
/// every mutation synchronously returns the changed slices so the caller
/// drives re-rendering in the same tick, before control returns to input
/// handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    month_index: usize,
    month_count: usize,
    language: Language,
    period: PeriodFilter,
}

impl NavigationState {
    /// Starts on the latest month. `month_count` must reflect a loaded
    /// snapshot (>= 1).
    pub fn new(month_count: usize, language: Language) -> Self {
        Self {
            month_index: month_count.saturating_sub(1),
            month_count,
            language,
            period: PeriodFilter::All,
        }
    }

    pub fn month_index(&self) -> usize {
        self.month_index
    }

    pub fn month_count(&self) -> usize {
        self.month_count
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn period(&self) -> PeriodFilter {
        self.period
    }

    /// Clamps into `[0, month_count - 1]`; selecting the already-current
    /// month reports no change.
    pub fn select_month(&mut self, index: usize) -> Vec<StateSlice> {
        let clamped = index.min(self.month_count.saturating_sub(1));
        if clamped == self.month_index {
            return Vec::new();
        }
        self.month_index = clamped;
        vec![StateSlice::MonthIndex]
    }

    /// No-op at the newest month; never wraps.
    pub fn next_month(&mut self) -> Vec<StateSlice> {
        if self.month_index + 1 >= self.month_count {
            return Vec::new();
        }
        self.month_index += 1;
        vec![StateSlice::MonthIndex]
    }

    /// No-op at the oldest month; never wraps.
    pub fn prev_month(&mut self) -> Vec<StateSlice> {
        if self.month_index == 0 {
            return Vec::new();
        }
        self.month_index -= 1;
        vec![StateSlice::MonthIndex]
    }

    pub fn set_language(&mut self, language: Language) -> Vec<StateSlice> {
        if language == self.language {
            return Vec::new();
        }
        self.language = language;
        vec![StateSlice::Language]
    }

    /// Applies the quarter filter and snaps the selected month into the
    /// filtered range when it falls outside it.
    pub fn set_period(&mut self, period: PeriodFilter) -> Vec<StateSlice> {
        if period == self.period {
            return Vec::new();
        }
        self.period = period;
        let mut changed = vec![StateSlice::Period];
        let range = period.month_indexes(self.month_count);
        if !range.is_empty() && !range.contains(&self.month_index) {
            self.month_index = range.end - 1;
            changed.push(StateSlice::MonthIndex);
        }
        changed
    }

    /// Called when a fresh snapshot is installed; re-clamps onto the latest
    /// month of the new dataset.
    pub fn reset_months(&mut self, month_count: usize) -> Vec<StateSlice> {
        self.month_count = month_count;
        self.month_index = month_count.saturating_sub(1);
        vec![StateSlice::Data, StateSlice::MonthIndex]
    }
}
