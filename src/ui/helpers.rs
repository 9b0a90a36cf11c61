use chrono::{DateTime, Local, Utc};

/// Truncate a label to `width` characters with a `..` tail.
pub fn clamp_name(value: &str, width: usize) -> String {
    let value_len = value.chars().count();
    if value_len <= width {
        return value.to_string();
    }
    let trimmed = value
        .chars()
        .take(width.saturating_sub(2))
        .collect::<String>();
    format!("{trimmed}..")
}

/// Target times render in the user's local clock.
pub fn format_due(target: DateTime<Utc>) -> String {
    target
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_long_names_with_ellipsis() {
        assert_eq!(clamp_name("tea", 10), "tea");
        assert_eq!(clamp_name("a very long timer label", 10), "a very l..");
        assert_eq!(clamp_name("a very long timer label", 10).chars().count(), 10);
    }
}
