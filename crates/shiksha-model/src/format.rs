// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

/// Grouped thousands: 948000 -> "948,000".
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Millions with a fixed decimal count: 4_370_000 @ 2 -> "4.37M".
pub fn format_millions(value: u64, decimals: usize) -> String {
    format!("{:.*}M", decimals, value as f64 / 1_000_000.0)
}

/// Percent with one decimal, trimming a trailing ".0": 96.8 -> "96.8%",
/// 96.0 -> "96%".
pub fn format_percent(value: f64) -> String {
    let rendered = format!("{value:.1}");
    let trimmed = rendered.strip_suffix(".0").unwrap_or(&rendered);
    format!("{trimmed}%")
}

/// Signed month-over-month change: (948000, 915000) -> "+33,000".
pub fn format_delta(current: u64, previous: u64) -> String {
    if current >= previous {
        format!("+{}", format_count(current - previous))
    } else {
        format!("-{}", format_count(previous - current))
    }
}

/// Compact magnitude used on cards: 235_000_000 -> "235.0M",
/// 16_240 -> "16.2K", 950 -> "950".
pub fn format_compact(value: u64) -> String {
    if value >= 1_000_000 {
        format!("{:.1}M", value as f64 / 1_000_000.0)
    } else if value >= 1_000 {
        format!("{:.1}K", value as f64 / 1_000.0)
    } else {
        value.to_string()
    }
}

/// snake_case metric keys into display labels: "apaar_adoption" ->
/// "Apaar Adoption".
pub fn kpi_label(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
