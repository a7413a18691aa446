// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::MonthRecord;

/// Monthly figures as CSV, one row per month. Header matches the exports
/// the dashboard has always produced.
pub fn months_to_csv(months: &[MonthRecord]) -> String {
    let mut out = String::from("Month,Schools,Teachers,Students,APAAR IDs,Attendance Rate\n");
    for month in months {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            month.month,
            month.schools,
            month.teachers,
            month.students,
            month.apaar_ids,
            month.attendance_rate,
        ));
    }
    out
}
