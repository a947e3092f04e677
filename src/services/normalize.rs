//! Mapping of user-facing duration, language and voice labels onto the
//! canonical values the video vendor expects.

use serde_json::Value;

/// Duration choices offered by the page picker UI, in minutes.
const DURATION_LABELS: &[(&str, f64)] = &[
    ("30 sec", 0.5),
    ("1 min", 1.0),
    ("2 min", 2.0),
    ("3 min", 3.0),
    ("4 min", 4.0),
    ("5 min", 5.0),
];

/// (canonical keyword, two-letter code)
const LANGUAGES: &[(&str, &str)] = &[
    ("english", "en"),
    ("spanish", "es"),
    ("french", "fr"),
    ("german", "de"),
    ("italian", "it"),
    ("portuguese", "pt"),
    ("dutch", "nl"),
    ("russian", "ru"),
    ("chinese", "zh"),
    ("japanese", "ja"),
    ("korean", "ko"),
    ("arabic", "ar"),
    ("hindi", "hi"),
    ("bengali", "bn"),
    ("turkish", "tr"),
    ("polish", "pl"),
    ("swedish", "sv"),
    ("norwegian", "no"),
    ("danish", "da"),
    ("finnish", "fi"),
    ("greek", "el"),
    ("hebrew", "he"),
    ("czech", "cs"),
    ("hungarian", "hu"),
    ("romanian", "ro"),
    ("ukrainian", "uk"),
    ("vietnamese", "vi"),
    ("thai", "th"),
    ("indonesian", "id"),
    ("malay", "ms"),
    ("filipino", "tl"),
    ("tamil", "ta"),
    ("urdu", "ur"),
    ("persian", "fa"),
    ("swahili", "sw"),
];

pub const DEFAULT_LANGUAGE: &str = "english";

/// Parse a duration given as a JSON number or string into minutes.
pub fn parse_duration_to_minutes(input: &Value) -> Option<f64> {
    match input {
        Value::Number(n) => n.as_f64().and_then(positive_finite),
        Value::String(s) => parse_duration_str(s),
        _ => None,
    }
}

/// Longest duration accepted from user input, in minutes.
pub const MAX_DURATION_MINUTES: f64 = 120.0;

/// Accepts `"2"`, `"2.5"`, the picker labels, and free text such as
/// `"about 3 minutes"` or `"90 seconds"`.
pub fn parse_duration_str(input: &str) -> Option<f64> {
    let text = input.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }

    if let Some((_, minutes)) = DURATION_LABELS.iter().find(|(label, _)| *label == text) {
        return Some(*minutes);
    }

    if let Ok(minutes) = text.parse::<f64>() {
        return positive_finite(minutes);
    }

    parse_free_text(&text)
}

/// First `<number> <unit>` pair anywhere in the text wins.
fn parse_free_text(text: &str) -> Option<f64> {
    let mut rest = text;

    while let Some(start) = rest.find(|c: char| c.is_ascii_digit()) {
        let candidate = &rest[start..];
        let number_len = candidate
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(candidate.len());
        let (number, tail) = candidate.split_at(number_len);

        let unit_text = tail.trim_start();
        let unit_len = unit_text
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(unit_text.len());

        if let Ok(amount) = number.parse::<f64>() {
            match &unit_text[..unit_len] {
                "min" | "mins" | "minute" | "minutes" => return positive_finite(amount),
                "sec" | "secs" | "second" | "seconds" => return positive_finite(amount / 60.0),
                _ => {}
            }
        }

        rest = tail;
    }

    None
}

fn positive_finite(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0 && value <= MAX_DURATION_MINUTES).then_some(value)
}

/// Map `"English"`, `"english"` or `"en"` to `"english"`. Unknown labels are
/// lower-cased and passed through.
pub fn normalize_language(label: &str) -> String {
    let text = label.trim().to_lowercase();
    if text.is_empty() {
        return DEFAULT_LANGUAGE.to_string();
    }

    LANGUAGES
        .iter()
        .find(|(name, code)| *name == text || *code == text)
        .map(|(name, _)| name.to_string())
        .unwrap_or(text)
}

/// `"Warm Female"` → `"warm-female"`
pub fn normalize_voice(label: &str, default_voice: &str) -> String {
    let voice = label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();

    if voice.is_empty() {
        default_voice.to_string()
    } else {
        voice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fixed_labels() {
        assert_eq!(parse_duration_str("30 sec"), Some(0.5));
        assert_eq!(parse_duration_str("1 min"), Some(1.0));
        assert_eq!(parse_duration_str("2 min"), Some(2.0));
        assert_eq!(parse_duration_str("3 min"), Some(3.0));
        assert_eq!(parse_duration_str("4 min"), Some(4.0));
        assert_eq!(parse_duration_str("5 min"), Some(5.0));
        assert_eq!(parse_duration_str("5 MIN"), Some(5.0));
    }

    #[test]
    fn test_numbers_and_numeric_strings() {
        assert_eq!(parse_duration_to_minutes(&json!(3)), Some(3.0));
        assert_eq!(parse_duration_to_minutes(&json!(2.5)), Some(2.5));
        assert_eq!(parse_duration_to_minutes(&json!("4")), Some(4.0));
        assert_eq!(parse_duration_to_minutes(&json!(" 1.5 ")), Some(1.5));
    }

    #[test]
    fn test_free_text() {
        assert_eq!(parse_duration_str("3 minutes"), Some(3.0));
        assert_eq!(parse_duration_str("1 minute"), Some(1.0));
        assert_eq!(parse_duration_str("90 seconds"), Some(1.5));
        assert_eq!(parse_duration_str("45sec"), Some(0.75));
        assert_eq!(parse_duration_str("2mins"), Some(2.0));
        assert_eq!(parse_duration_str("about 3 minutes"), Some(3.0));
        assert_eq!(parse_duration_str("3 min video"), Some(3.0));
        assert_eq!(parse_duration_str("v2, roughly 90 seconds long"), Some(1.5));
    }

    #[test]
    fn test_out_of_range_durations() {
        assert_eq!(parse_duration_str("1e308"), None);
        assert_eq!(parse_duration_str("500 minutes"), None);
        assert_eq!(parse_duration_to_minutes(&json!(1e308)), None);
        assert_eq!(parse_duration_str("120"), Some(MAX_DURATION_MINUTES));
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(parse_duration_str(""), None);
        assert_eq!(parse_duration_str("auto"), None);
        assert_eq!(parse_duration_str("3 hours"), None);
        assert_eq!(parse_duration_str("min"), None);
        assert_eq!(parse_duration_str("0"), None);
        assert_eq!(parse_duration_str("-2"), None);
        assert_eq!(parse_duration_str("NaN"), None);
        assert_eq!(parse_duration_to_minutes(&json!(null)), None);
        assert_eq!(parse_duration_to_minutes(&json!({"minutes": 2})), None);
    }

    #[test]
    fn test_language_aliases() {
        assert_eq!(normalize_language("en"), "english");
        assert_eq!(normalize_language("English"), "english");
        assert_eq!(normalize_language("english"), "english");
        assert_eq!(normalize_language("ES"), "spanish");
        assert_eq!(normalize_language(" Japanese "), "japanese");
    }

    #[test]
    fn test_language_fallbacks() {
        assert_eq!(normalize_language("xx"), "xx");
        assert_eq!(normalize_language("Klingon"), "klingon");
        assert_eq!(normalize_language(""), "english");
        assert_eq!(normalize_language("   "), "english");
    }

    #[test]
    fn test_language_vocabulary_size() {
        assert_eq!(LANGUAGES.len(), 35);
    }

    #[test]
    fn test_voice() {
        assert_eq!(normalize_voice("Warm Female", "alloy"), "warm-female");
        assert_eq!(normalize_voice("  Deep   Male ", "alloy"), "deep-male");
        assert_eq!(normalize_voice("", "alloy"), "alloy");
    }
}
