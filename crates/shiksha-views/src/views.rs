// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use shiksha_model::{
    DashboardSnapshot, Language, MonthRecord, NavigationState, format_compact, format_count,
    format_delta, format_millions, format_percent, kpi_label,
};

const SPARK_LEVELS: [char; 8] = ['\u{2581}', '\u{2582}', '\u{2583}', '\u{2584}', '\u{2585}', '\u{2586}', '\u{2587}', '\u{2588}'];

pub fn render_director_message(
    snapshot: &DashboardSnapshot,
    nav: &NavigationState,
) -> Result<String> {
    let director = &snapshot.director_message;
    let heading = match nav.language() {
        Language::English => "Director's Message",
        Language::Hindi => "\u{0928}\u{093f}\u{0926}\u{0947}\u{0936}\u{0915} \u{0915}\u{093e} \u{0938}\u{0902}\u{0926}\u{0947}\u{0936}",
    };
    Ok(format!(
        "{heading}\n\n{}\n\n  {}\n  {}\n",
        director.message, director.name, director.position,
    ))
}

pub fn render_highlights(snapshot: &DashboardSnapshot, nav: &NavigationState) -> Result<String> {
    let month = selected_month(snapshot, nav)?;
    let previous = nav
        .month_index()
        .checked_sub(1)
        .and_then(|index| snapshot.months.get(index));

    let heading = match nav.language() {
        Language::English => format!("Key Metrics -- As of {}", month.month),
        Language::Hindi => format!(
            "\u{092e}\u{0941}\u{0916}\u{094d}\u{092f} \u{0906}\u{0901}\u{0915}\u{0921}\u{093c}\u{0947} -- {}",
            month.month
        ),
    };

    let mut out = format!("{heading}\n\n");
    push_metric(
        &mut out,
        "Total Schools",
        &format_count(month.schools),
        previous.map(|p| format_delta(month.schools, p.schools)),
    );
    push_metric(
        &mut out,
        "Teachers",
        &format_millions(month.teachers, 2),
        previous.map(|p| format_delta(month.teachers, p.teachers)),
    );
    push_metric(
        &mut out,
        "Students",
        &format_millions(month.students, 1),
        previous.map(|p| format_delta(month.students, p.students)),
    );
    push_metric(
        &mut out,
        "APAAR IDs Generated",
        &format_millions(month.apaar_ids, 0),
        previous.map(|p| format_delta(month.apaar_ids, p.apaar_ids)),
    );
    push_metric(
        &mut out,
        "Attendance Rate",
        &format_percent(month.attendance_rate),
        None,
    );

    if !month.highlights.is_empty() {
        out.push('\n');
        for highlight in &month.highlights {
            out.push_str(&format!("  * {highlight}\n"));
        }
    }
    Ok(out)
}

pub fn render_calendar(snapshot: &DashboardSnapshot, nav: &NavigationState) -> Result<String> {
    let month = selected_month(snapshot, nav)?;

    let mut out = format!("{}\n{}\n\n", month.month, "=".repeat(month.month.len()));
    out.push_str(&format!(
        "Schools {}  Teachers {}  Students {}  APAAR {}  Attendance {}\n",
        format_count(month.schools),
        format_millions(month.teachers, 2),
        format_millions(month.students, 1),
        format_millions(month.apaar_ids, 0),
        format_percent(month.attendance_rate),
    ));

    if !month.activities.is_empty() {
        out.push_str("\nActivities\n");
        for activity in &month.activities {
            out.push_str(&format!("  * {activity}\n"));
        }
    }

    if !month.events.is_empty() {
        out.push_str("\nEvents\n");
        for event in &month.events {
            out.push_str(&format!("  * {} ({})\n    {}\n", event.name, event.date, event.description));
            if event.participants > 0 {
                out.push_str(&format!(
                    "    {} participants\n",
                    format_count(event.participants)
                ));
            }
        }
    }

    if !month.states.is_empty() {
        out.push_str("\nState Breakdown\n");
        let rows: Vec<[String; 4]> = month
            .states
            .iter()
            .map(|(name, state)| {
                [
                    name.clone(),
                    format_percent(state.attendance),
                    format_percent(state.apaar_coverage),
                    format_count(state.schools),
                ]
            })
            .collect();
        out.push_str(&text_table(
            ["State", "Attendance", "APAAR Coverage", "Schools"],
            &rows,
        ));
    }
    Ok(out)
}

pub fn render_trends(snapshot: &DashboardSnapshot, nav: &NavigationState) -> Result<String> {
    let range = nav.period().month_indexes(snapshot.months.len());
    let months = &snapshot.months[range];
    let (Some(first), Some(last)) = (months.first(), months.last()) else {
        bail!("no months fall inside the selected period");
    };

    let mut out = format!("Growth Trends -- {} to {}\n\n", first.month, last.month);
    push_trend(
        &mut out,
        "Schools",
        &months.iter().map(|m| m.schools as f64).collect::<Vec<_>>(),
        &format_count(last.schools),
    );
    push_trend(
        &mut out,
        "Teachers",
        &months.iter().map(|m| m.teachers as f64).collect::<Vec<_>>(),
        &format_millions(last.teachers, 2),
    );
    push_trend(
        &mut out,
        "Students",
        &months.iter().map(|m| m.students as f64).collect::<Vec<_>>(),
        &format_millions(last.students, 1),
    );
    push_trend(
        &mut out,
        "APAAR IDs",
        &months
            .iter()
            .map(|m| m.apaar_ids as f64)
            .collect::<Vec<_>>(),
        &format_millions(last.apaar_ids, 0),
    );
    push_trend(
        &mut out,
        "Attendance",
        &months.iter().map(|m| m.attendance_rate).collect::<Vec<_>>(),
        &format_percent(last.attendance_rate),
    );
    Ok(out)
}

pub fn render_technical_developments(
    snapshot: &DashboardSnapshot,
    _nav: &NavigationState,
) -> Result<String> {
    let tech = &snapshot.technical_developments;
    let mut out = String::from("Technical Developments\n\n");

    if !tech.apaar_milestones.is_empty() {
        out.push_str("APAAR Registration Milestones\n");
        for milestone in &tech.apaar_milestones {
            out.push_str(&format!(
                "  {:<15} {}\n",
                milestone.month,
                format_compact(milestone.registrations)
            ));
        }
        out.push('\n');
    }

    if !tech.dashboard_features.is_empty() {
        out.push_str("Dashboard Features\n");
        for feature in &tech.dashboard_features {
            out.push_str(&format!("  * {feature}\n"));
        }
        out.push('\n');
    }

    if !tech.infrastructure_upgrades.is_empty() {
        out.push_str("Infrastructure Upgrades\n");
        for upgrade in &tech.infrastructure_upgrades {
            out.push_str(&format!("  * {upgrade}\n"));
        }
    }
    Ok(out)
}

pub fn render_kpis(snapshot: &DashboardSnapshot, _nav: &NavigationState) -> Result<String> {
    let mut out = String::from("Key Performance Indicators\n\n");
    for (category, metrics) in &snapshot.key_performance_indicators {
        out.push_str(&format!("{}\n", kpi_label(category)));
        for (metric, value) in metrics {
            out.push_str(&format!("  {:<24} {}\n", kpi_label(metric), value));
        }
        out.push('\n');
    }
    Ok(out)
}

pub fn render_top_states(snapshot: &DashboardSnapshot, _nav: &NavigationState) -> Result<String> {
    let states = &snapshot.state_engagement.top_performing_states;
    if states.is_empty() {
        return Ok("Top Performing States\n\n  (no state data reported)\n".to_owned());
    }

    let rows: Vec<[String; 4]> = states
        .iter()
        .map(|state| {
            [
                state.name.clone(),
                format_percent(state.apaar_coverage),
                format_percent(state.attendance),
                format_percent(state.digital_readiness),
            ]
        })
        .collect();

    Ok(format!(
        "Top Performing States\n\n{}",
        text_table(
            ["State", "APAAR Coverage", "Attendance", "Digital Readiness"],
            &rows,
        )
    ))
}

fn selected_month<'a>(
    snapshot: &'a DashboardSnapshot,
    nav: &NavigationState,
) -> Result<&'a MonthRecord> {
    match snapshot.months.get(nav.month_index()) {
        Some(month) => Ok(month),
        None => bail!(
            "month index {} out of range for {} months",
            nav.month_index(),
            snapshot.months.len()
        ),
    }
}

fn push_metric(out: &mut String, label: &str, value: &str, delta: Option<String>) {
    match delta {
        Some(delta) => out.push_str(&format!("  {label:<22} {value:>10}  ({delta})\n")),
        None => out.push_str(&format!("  {label:<22} {value:>10}\n")),
    }
}

fn push_trend(out: &mut String, label: &str, values: &[f64], latest: &str) {
    out.push_str(&format!(
        "  {label:<12} {} {latest}\n",
        sparkline(values)
    ));
}

/// Scale a series onto eight block glyphs. A flat series renders at the
/// middle level.
fn sparkline(values: &[f64]) -> String {
    let Some(min) = values.iter().copied().reduce(f64::min) else {
        return String::new();
    };
    let max = values.iter().copied().fold(min, f64::max);
    let span = max - min;

    values
        .iter()
        .map(|value| {
            if span == 0.0 {
                SPARK_LEVELS[SPARK_LEVELS.len() / 2]
            } else {
                let scaled = ((value - min) / span * (SPARK_LEVELS.len() - 1) as f64).round();
                SPARK_LEVELS[scaled as usize]
            }
        })
        .collect()
}

fn text_table<const N: usize>(headers: [&str; N], rows: &[[String; N]]) -> String {
    let mut widths: [usize; N] = [0; N];
    for (index, header) in headers.iter().enumerate() {
        widths[index] = header.chars().count();
    }
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            widths[index] = widths[index].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for (index, header) in headers.iter().enumerate() {
        out.push_str(&format!("  {:<width$}", header, width = widths[index] + 2));
    }
    out.push('\n');
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            out.push_str(&format!("  {:<width$}", cell, width = widths[index] + 2));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{
        render_calendar, render_highlights, render_top_states, render_trends, sparkline,
    };
    use shiksha_model::{Language, NavigationState, PeriodFilter};

    #[test]
    fn highlights_show_latest_figures_with_deltas() {
        let snapshot = shiksha_testkit::sample_snapshot();
        let nav = NavigationState::new(snapshot.months.len(), Language::English);

        let body = render_highlights(&snapshot, &nav).expect("render");
        assert!(body.contains("As of January 2026"), "got: {body}");
        assert!(body.contains("948,000"), "got: {body}");
        assert!(body.contains("+3,000"), "got: {body}");
        assert!(body.contains("4.37M"), "got: {body}");
        assert!(body.contains("96.8%"), "got: {body}");
    }

    #[test]
    fn oldest_month_has_no_deltas() {
        let snapshot = shiksha_testkit::sample_snapshot();
        let mut nav = NavigationState::new(snapshot.months.len(), Language::English);
        nav.select_month(0);

        let body = render_highlights(&snapshot, &nav).expect("render");
        assert!(body.contains("As of April 2025"), "got: {body}");
        assert!(!body.contains('('), "got: {body}");
    }

    #[test]
    fn calendar_includes_state_breakdown() {
        let snapshot = shiksha_testkit::sample_snapshot();
        let nav = NavigationState::new(snapshot.months.len(), Language::English);

        let body = render_calendar(&snapshot, &nav).expect("render");
        assert!(body.contains("January 2026"), "got: {body}");
        assert!(body.contains("Kerala"), "got: {body}");
        assert!(body.contains("State Breakdown"), "got: {body}");
    }

    #[test]
    fn trends_honor_the_period_filter() {
        let snapshot = shiksha_testkit::sample_snapshot();
        let mut nav = NavigationState::new(snapshot.months.len(), Language::English);
        nav.set_period(PeriodFilter::Q1);

        let body = render_trends(&snapshot, &nav).expect("render");
        assert!(body.contains("April 2025 to June 2025"), "got: {body}");
    }

    #[test]
    fn trends_fail_when_period_is_empty() {
        let mut snapshot = shiksha_testkit::sample_snapshot();
        snapshot.months.truncate(3);
        let mut nav = NavigationState::new(snapshot.months.len(), Language::English);
        nav.set_period(PeriodFilter::Q3);

        let error = render_trends(&snapshot, &nav).expect_err("empty period should fail");
        assert!(error.to_string().contains("period"));
    }

    #[test]
    fn top_states_table_lists_every_state() {
        let snapshot = shiksha_testkit::sample_snapshot();
        let nav = NavigationState::new(snapshot.months.len(), Language::English);

        let body = render_top_states(&snapshot, &nav).expect("render");
        for state in &snapshot.state_engagement.top_performing_states {
            assert!(body.contains(&state.name), "missing {}", state.name);
        }
    }

    #[test]
    fn sparkline_spans_min_to_max() {
        let line = sparkline(&[1.0, 2.0, 3.0, 8.0]);
        let chars: Vec<char> = line.chars().collect();
        assert_eq!(chars.len(), 4);
        assert_eq!(chars[0], '\u{2581}');
        assert_eq!(chars[3], '\u{2588}');
    }

    #[test]
    fn flat_sparkline_sits_mid_scale() {
        let line = sparkline(&[5.0, 5.0, 5.0]);
        assert_eq!(line, "\u{2585}\u{2585}\u{2585}");
    }
}
