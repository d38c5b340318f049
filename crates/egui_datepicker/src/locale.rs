//! Month and weekday names for the calendar, looked up from the POSIX locale tables.

use chrono::{Datelike as _, NaiveDate, Weekday};
use pure_rust_locales::{Locale, locale_match};

/// The locale used when a tag can not be resolved.
pub const FALLBACK_LOCALE: Locale = Locale::en_US;

/// Resolve a locale tag such as `en`, `de-DE` or `fr_FR`.
///
/// A bare language (`de`) is expanded to its main region (`de_DE`), except for
/// `en` which maps to `en_US`.
pub fn resolve_locale(tag: &str) -> Option<Locale> {
    let tag = tag.trim().replace('-', "_");
    if tag.is_empty() {
        return None;
    }

    if let Ok(locale) = Locale::try_from(tag.as_str()) {
        return Some(locale);
    }

    if tag.contains('_') {
        let (language, region) = tag.split_once('_')?;
        let normalized = format!("{}_{}", language.to_lowercase(), region.to_uppercase());
        return Locale::try_from(normalized.as_str()).ok();
    }

    let language = tag.to_lowercase();
    let expanded = if language == "en" {
        "en_US".to_owned()
    } else {
        format!("{language}_{}", language.to_uppercase())
    };
    Locale::try_from(expanded.as_str()).ok()
}

/// Full month name, `month` is 1-based.
pub fn month_name(locale: Locale, month: u32) -> &'static str {
    let names: &'static [&'static str] = locale_match!(locale => LC_TIME::MON);
    names
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or_default()
}

/// Abbreviated weekday name, e.g. `Mon`.
pub fn weekday_short(locale: Locale, weekday: Weekday) -> &'static str {
    let names: &'static [&'static str] = locale_match!(locale => LC_TIME::ABDAY);
    names
        .get(weekday.num_days_from_sunday() as usize)
        .copied()
        .unwrap_or_default()
}

/// `(day, month name, year)` of a date, as used by the label templates.
pub fn date_parts(locale: Locale, date: NaiveDate) -> (String, &'static str, String) {
    (
        format!("{:02}", date.day()),
        month_name(locale, date.month()),
        date.year().to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_short_and_long_tags() {
        assert_eq!(resolve_locale("en"), Some(Locale::en_US));
        assert_eq!(resolve_locale("de"), Some(Locale::de_DE));
        assert_eq!(resolve_locale("fr-FR"), Some(Locale::fr_FR));
        assert_eq!(resolve_locale("nl_nl"), Some(Locale::nl_NL));
        assert_eq!(resolve_locale(""), None);
        assert_eq!(resolve_locale("xx-nowhere"), None);
    }

    #[test]
    fn english_names() {
        assert_eq!(month_name(Locale::en_US, 3), "March");
        assert_eq!(month_name(Locale::en_US, 12), "December");
        assert_eq!(month_name(Locale::en_US, 13), "");
        assert_eq!(weekday_short(Locale::en_US, Weekday::Sun), "Sun");
        assert_eq!(weekday_short(Locale::en_US, Weekday::Mon), "Mon");
    }

    #[test]
    fn german_names() {
        assert_eq!(month_name(Locale::de_DE, 3), "März");
        assert_eq!(weekday_short(Locale::de_DE, Weekday::Mon), "Mo");
    }
}
