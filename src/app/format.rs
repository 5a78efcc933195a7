use chrono::{DateTime, Local};

use crate::models::MAX_USER_RATING;

pub(crate) fn truncate(s: &str, max: usize) -> String {
    let mut out = s.to_string();
    if out.chars().count() > max {
        out = out.chars().take(max.saturating_sub(3)).collect::<String>() + "...";
    }
    out
}

pub(crate) fn format_rating(rating: Option<f64>) -> String {
    rating
        .map(|value| format!("{value:.1}"))
        .unwrap_or_else(|| "N/A".to_string())
}

pub(crate) fn format_runtime(minutes: Option<u32>) -> String {
    minutes
        .map(|value| format!("{value} min"))
        .unwrap_or_else(|| "N/A".to_string())
}

pub(crate) fn star_bar(rating: u8) -> String {
    let filled = usize::from(rating.min(MAX_USER_RATING));
    let empty = usize::from(MAX_USER_RATING) - filled;
    format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
}

/// Digit keys rate 1-9; `0` stands for 10.
pub(crate) fn rating_from_digit(ch: char) -> Option<u8> {
    let digit = ch.to_digit(10)?;
    let rating = if digit == 0 { 10 } else { digit };
    u8::try_from(rating).ok()
}

pub(crate) fn format_updated_at(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_appends_ellipsis_only_when_needed() {
        assert_eq!(truncate("Heat", 10), "Heat");
        assert_eq!(truncate("The Good, the Bad and the Ugly", 12), "The Good,...");
    }

    #[test]
    fn numeric_fields_fall_back_to_na() {
        assert_eq!(format_rating(Some(8.0)), "8.0");
        assert_eq!(format_rating(None), "N/A");
        assert_eq!(format_runtime(Some(98)), "98 min");
        assert_eq!(format_runtime(None), "N/A");
    }

    #[test]
    fn zero_key_means_ten_stars() {
        assert_eq!(rating_from_digit('0'), Some(10));
        assert_eq!(rating_from_digit('7'), Some(7));
        assert_eq!(rating_from_digit('x'), None);
        assert_eq!(star_bar(3), "★★★☆☆☆☆☆☆☆");
    }

    #[test]
    fn updated_at_keeps_raw_text_when_invalid() {
        assert_eq!(format_updated_at("yesterday"), "yesterday");
    }
}
