//! Label, badge, and text helpers shared by every surface that renders reviews.
//!
//! # Design
//! - Labels are the product's Russian copy; unknown values share one fallback.
//! - Badge classes are Tailwind utility pairs (text + background).
//! - Time formatting takes `now` explicitly so callers and tests control the clock.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};

use crate::reviews::{Priority, Sentiment};

/// Label shown when a review has not been classified yet.
pub const UNKNOWN_LABEL: &str = "Не определён";

/// Badge classes for unclassified reviews.
pub const UNKNOWN_BADGE: &str = "text-gray-400 bg-gray-50";

const MONTHS_SHORT: [&str; 12] = [
    "янв.", "февр.", "мар.", "апр.", "мая", "июн.", "июл.", "авг.", "сент.", "окт.", "нояб.",
    "дек.",
];

impl Sentiment {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Positive => "Позитивный",
            Self::Negative => "Негативный",
            Self::Neutral => "Нейтральный",
            Self::Mixed => "Смешанный",
        }
    }

    /// Badge colour classes.
    #[must_use]
    pub const fn badge_classes(self) -> &'static str {
        match self {
            Self::Positive => "text-green-600 bg-green-100",
            Self::Negative => "text-red-600 bg-red-100",
            Self::Neutral => "text-gray-600 bg-gray-100",
            Self::Mixed => "text-yellow-600 bg-yellow-100",
        }
    }
}

impl Priority {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "Критический",
            Self::High => "Высокий",
            Self::Medium => "Средний",
            Self::Low => "Низкий",
        }
    }

    /// Badge colour classes.
    #[must_use]
    pub const fn badge_classes(self) -> &'static str {
        match self {
            Self::Critical => "text-red-700 bg-red-200",
            Self::High => "text-orange-600 bg-orange-100",
            Self::Medium => "text-yellow-600 bg-yellow-100",
            Self::Low => "text-green-600 bg-green-100",
        }
    }
}

/// Label for an optional sentiment.
#[must_use]
pub fn sentiment_label(sentiment: Option<Sentiment>) -> &'static str {
    sentiment.map_or(UNKNOWN_LABEL, Sentiment::label)
}

/// Badge classes for an optional sentiment.
#[must_use]
pub fn sentiment_badge(sentiment: Option<Sentiment>) -> &'static str {
    sentiment.map_or(UNKNOWN_BADGE, Sentiment::badge_classes)
}

/// Label for an optional priority.
#[must_use]
pub fn priority_label(priority: Option<Priority>) -> &'static str {
    priority.map_or(UNKNOWN_LABEL, Priority::label)
}

/// Badge classes for an optional priority.
#[must_use]
pub fn priority_badge(priority: Option<Priority>) -> &'static str {
    priority.map_or(UNKNOWN_BADGE, Priority::badge_classes)
}

/// Cut `text` to at most `max_chars` characters, appending `...` when shortened.
#[must_use]
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", text[..cut].trim()),
    }
}

/// Day, short month, and year, e.g. `5 янв. 2024 г.`.
#[must_use]
pub fn format_date<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    format!(
        "{} {} {} г.",
        at.day(),
        MONTHS_SHORT[at.month0() as usize],
        at.year()
    )
}

/// [`format_date`] followed by the wall-clock time, e.g. `5 янв. 2024 г., 14:05`.
#[must_use]
pub fn format_date_time<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    format!(
        "{}, {:02}:{:02}",
        format_date(at),
        at.hour(),
        at.minute()
    )
}

/// Coarse "time ago" string; falls back to [`format_date`] after a week.
#[must_use]
pub fn format_relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(at);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "только что".to_string()
    } else if minutes < 60 {
        format!("{minutes} мин. назад")
    } else if hours < 24 {
        format!("{hours} ч. назад")
    } else if days < 7 {
        format!("{days} дн. назад")
    } else {
        format_date(&at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn sentiment_labels_and_badges() {
        assert_eq!(sentiment_label(Some(Sentiment::Positive)), "Позитивный");
        assert_eq!(sentiment_label(Some(Sentiment::Negative)), "Негативный");
        assert_eq!(sentiment_label(Some(Sentiment::Neutral)), "Нейтральный");
        assert_eq!(sentiment_label(None), UNKNOWN_LABEL);
        assert!(sentiment_badge(Some(Sentiment::Positive)).contains("green"));
        assert!(sentiment_badge(Some(Sentiment::Negative)).contains("red"));
        assert!(sentiment_badge(None).contains("gray"));
    }

    #[test]
    fn priority_labels_and_badges() {
        assert_eq!(priority_label(Some(Priority::Critical)), "Критический");
        assert_eq!(priority_label(Some(Priority::High)), "Высокий");
        assert_eq!(priority_label(None), UNKNOWN_LABEL);
        assert!(priority_badge(Some(Priority::Critical)).contains("red"));
        assert!(priority_badge(None).contains("gray"));
    }

    #[test]
    fn truncate_keeps_short_text_and_marks_cuts() {
        assert_eq!(truncate_text("hello", 10), "hello");
        assert_eq!(truncate_text("hello", 5), "hello");
        assert_eq!(truncate_text("hello world", 6), "hello...");
        assert_eq!(truncate_text("привет мир", 3), "при...");
    }

    #[test]
    fn relative_time_buckets() {
        let now = at(2024, 6, 15, 12, 0);
        assert_eq!(format_relative_time(now, now), "только что");
        assert_eq!(
            format_relative_time(now - Duration::minutes(5), now),
            "5 мин. назад"
        );
        assert_eq!(
            format_relative_time(now - Duration::hours(3), now),
            "3 ч. назад"
        );
        assert_eq!(
            format_relative_time(now - Duration::days(2), now),
            "2 дн. назад"
        );
        assert_eq!(
            format_relative_time(at(2024, 1, 5, 9, 30), now),
            "5 янв. 2024 г."
        );
    }

    #[test]
    fn date_time_appends_clock() {
        assert_eq!(
            format_date_time(&at(2023, 11, 28, 7, 4)),
            "28 нояб. 2023 г., 07:04"
        );
    }
}
