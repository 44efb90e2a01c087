pub fn format_iso8601_date(iso_date: &str) -> String {
    if let Ok(datetime) = iso_date.parse::<chrono::DateTime<chrono::Utc>>() {
        datetime.format("%Y-%m-%d").to_string()
    } else {
        iso_date.to_string()
    }
}

/// `MM:SS`, or `HH:MM:SS` once the value reaches an hour.
pub fn format_duration(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let remaining_seconds = seconds % 60;
    if hours != 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, remaining_seconds)
    } else {
        format!("{:02}:{:02}", minutes, remaining_seconds)
    }
}

pub fn format_clip_count(count: usize) -> String {
    match count {
        1 => "1 clip".to_string(),
        n => format!("{n} clips"),
    }
}
