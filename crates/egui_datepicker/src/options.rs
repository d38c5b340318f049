//! Picker configuration, resolved from layers.
//!
//! Options come from three layers, later ones winning:
//!
//! 1. the defaults of [`DatepickerOptions`],
//! 2. attributes attached to the input (see [`OptionOverrides::from_attributes`]),
//! 3. overrides given by the caller.
//!
//! [`DatepickerOptions::resolve`] merges and validates them once.

use std::fmt::Write as _;

use chrono::NaiveDate;
use egui::Align;
use pure_rust_locales::Locale;
use serde::Deserialize;

use crate::{
    locale::{FALLBACK_LOCALE, resolve_locale},
    placement::{Position, Side},
    template::{LabelRenderer, Templates},
    time::TimeFormat,
};

/// Something wrong with the picker configuration.
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("minute interval must be a positive divisor of 60, got {0}")]
    MinuteInterval(u32),

    #[error("invalid date format {0:?}")]
    Format(String),

    #[error("invalid value {value:?} for option {key:?}")]
    Attribute { key: String, value: String },

    #[error("failed to parse options: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("invalid label template: {0}")]
    Template(#[from] handlebars::TemplateError),
}

/// One layer of optional settings.
///
/// Every field left at `None` falls through to the layer below.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptionOverrides {
    /// A [`chrono::format::strftime`] pattern.
    pub format: Option<String>,

    /// A locale tag such as `en`, `de-DE` or `fr_FR`.
    pub locale: Option<String>,

    /// First day of the week, 0 is Sunday.
    #[serde(alias = "weekstart")]
    pub week_start: Option<u32>,

    /// Show the time view after picking a day.
    pub time: Option<bool>,

    /// 12-hour clock.
    pub meridiem: Option<bool>,

    #[serde(alias = "minuteInterval")]
    pub minute_interval: Option<u32>,

    #[serde(alias = "vOffset")]
    pub v_offset: Option<f32>,

    #[serde(alias = "hOffset")]
    pub h_offset: Option<f32>,

    #[serde(alias = "closeOnClick")]
    pub close_on_click: Option<bool>,

    #[serde(alias = "closeOnSelect")]
    pub close_on_select: Option<bool>,

    /// Preferred side of the input to open the panel on.
    pub position: Option<Side>,

    /// How the panel lines up with the input along that side.
    pub alignment: Option<Align>,

    #[serde(alias = "panelWidth")]
    pub panel_width: Option<f32>,

    pub templates: Option<Templates>,
}

fn parse_bool(key: &str, value: &str) -> Result<bool, OptionsError> {
    match value.trim().to_lowercase().as_str() {
        // A bare attribute is a set flag.
        "" | "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(attribute_error(key, value)),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, OptionsError> {
    value
        .trim()
        .parse()
        .map_err(|_err| attribute_error(key, value))
}

fn parse_side(key: &str, value: &str) -> Result<Side, OptionsError> {
    match value.trim().to_lowercase().as_str() {
        "top" => Ok(Side::Top),
        "bottom" => Ok(Side::Bottom),
        "left" => Ok(Side::Left),
        "right" => Ok(Side::Right),
        _ => Err(attribute_error(key, value)),
    }
}

fn parse_align(key: &str, value: &str) -> Result<Align, OptionsError> {
    match value.trim().to_lowercase().as_str() {
        "min" | "start" | "left" | "top" => Ok(Align::Min),
        "center" => Ok(Align::Center),
        "max" | "end" | "right" | "bottom" => Ok(Align::Max),
        _ => Err(attribute_error(key, value)),
    }
}

fn attribute_error(key: &str, value: &str) -> OptionsError {
    OptionsError::Attribute {
        key: key.to_owned(),
        value: value.to_owned(),
    }
}

impl OptionOverrides {
    /// Read `data-*` style attributes, such as `data-weekstart="1"`.
    ///
    /// The `data-` prefix is optional, and kebab-case, `snake_case` and camelCase
    /// spellings are accepted. Unknown attributes are ignored.
    ///
    /// # Errors
    /// If a known attribute has a value of the wrong type.
    pub fn from_attributes<'a>(
        attributes: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, OptionsError> {
        let mut layer = Self::default();

        for (key, value) in attributes {
            let name: String = key
                .strip_prefix("data-")
                .unwrap_or(key)
                .chars()
                .filter(|c| *c != '-' && *c != '_')
                .flat_map(char::to_lowercase)
                .collect();

            match name.as_str() {
                "format" => layer.format = Some(value.to_owned()),
                "locale" => layer.locale = Some(value.to_owned()),
                "weekstart" => layer.week_start = Some(parse_number(key, value)?),
                "time" => layer.time = Some(parse_bool(key, value)?),
                "meridiem" => layer.meridiem = Some(parse_bool(key, value)?),
                "minuteinterval" => layer.minute_interval = Some(parse_number(key, value)?),
                "voffset" => layer.v_offset = Some(parse_number(key, value)?),
                "hoffset" => layer.h_offset = Some(parse_number(key, value)?),
                "closeonclick" => layer.close_on_click = Some(parse_bool(key, value)?),
                "closeonselect" => layer.close_on_select = Some(parse_bool(key, value)?),
                "position" => layer.position = Some(parse_side(key, value)?),
                "alignment" => layer.alignment = Some(parse_align(key, value)?),
                "panelwidth" => layer.panel_width = Some(parse_number(key, value)?),
                _ => log::debug!("Ignoring unknown date picker attribute {key:?}"),
            }
        }

        Ok(layer)
    }

    /// Parse a layer from RON, e.g. `(weekstart: 1, time: true)`.
    ///
    /// Values don't need to be wrapped in `Some(…)`.
    ///
    /// # Errors
    /// If the text is not valid RON for this struct.
    pub fn from_ron(text: &str) -> Result<Self, OptionsError> {
        let options =
            ron::Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME);
        Ok(options.from_str(text)?)
    }

    /// `upper` put on top of `self`.
    pub fn layered(self, upper: &Self) -> Self {
        let upper = upper.clone();
        Self {
            format: upper.format.or(self.format),
            locale: upper.locale.or(self.locale),
            week_start: upper.week_start.or(self.week_start),
            time: upper.time.or(self.time),
            meridiem: upper.meridiem.or(self.meridiem),
            minute_interval: upper.minute_interval.or(self.minute_interval),
            v_offset: upper.v_offset.or(self.v_offset),
            h_offset: upper.h_offset.or(self.h_offset),
            close_on_click: upper.close_on_click.or(self.close_on_click),
            close_on_select: upper.close_on_select.or(self.close_on_select),
            position: upper.position.or(self.position),
            alignment: upper.alignment.or(self.alignment),
            panel_width: upper.panel_width.or(self.panel_width),
            templates: upper.templates.or(self.templates),
        }
    }
}

/// Validated picker configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct DatepickerOptions {
    format: String,
    locale_tag: String,
    locale: Locale,
    week_start: u32,
    time: bool,
    meridiem: bool,
    minute_interval: u32,
    v_offset: f32,
    h_offset: f32,
    close_on_click: bool,
    close_on_select: bool,
    position: Position,
    panel_width: f32,
    labels: LabelRenderer,
}

impl Default for DatepickerOptions {
    fn default() -> Self {
        Self {
            format: "%Y-%m-%d".to_owned(),
            locale_tag: "en".to_owned(),
            locale: FALLBACK_LOCALE,
            week_start: 0,
            time: false,
            meridiem: false,
            minute_interval: 15,
            v_offset: 0.0,
            h_offset: 0.0,
            close_on_click: true,
            close_on_select: true,
            position: Position::default(),
            panel_width: 250.0,
            labels: LabelRenderer::default(),
        }
    }
}

impl DatepickerOptions {
    /// Defaults, then `attributes`, then `overrides`.
    ///
    /// An unknown locale falls back to `en_US` with a warning.
    ///
    /// # Errors
    /// If the minute interval does not divide 60, the format can not print a
    /// date and time, or a label template does not compile.
    pub fn resolve(
        attributes: &OptionOverrides,
        overrides: &OptionOverrides,
    ) -> Result<Self, OptionsError> {
        let layer = attributes.clone().layered(overrides);
        let defaults = Self::default();

        let minute_interval = layer.minute_interval.unwrap_or(defaults.minute_interval);
        if minute_interval == 0 || 60 % minute_interval != 0 {
            return Err(OptionsError::MinuteInterval(minute_interval));
        }

        let format = layer.format.unwrap_or(defaults.format);
        check_format(&format)?;

        let locale_tag = layer.locale.unwrap_or(defaults.locale_tag);
        let locale = resolve_locale(&locale_tag).unwrap_or_else(|| {
            log::warn!("Unknown locale {locale_tag:?}, falling back to {FALLBACK_LOCALE:?}");
            FALLBACK_LOCALE
        });

        Ok(Self {
            format,
            locale_tag,
            locale,
            week_start: layer.week_start.unwrap_or(defaults.week_start) % 7,
            time: layer.time.unwrap_or(defaults.time),
            meridiem: layer.meridiem.unwrap_or(defaults.meridiem),
            minute_interval,
            v_offset: layer.v_offset.unwrap_or(defaults.v_offset),
            h_offset: layer.h_offset.unwrap_or(defaults.h_offset),
            close_on_click: layer.close_on_click.unwrap_or(defaults.close_on_click),
            close_on_select: layer.close_on_select.unwrap_or(defaults.close_on_select),
            position: Position {
                side: layer.position.unwrap_or(defaults.position.side),
                align: layer.alignment.unwrap_or(defaults.position.align),
            },
            panel_width: layer.panel_width.unwrap_or(defaults.panel_width).max(0.0),
            labels: match layer.templates {
                Some(templates) => LabelRenderer::new(templates)?,
                None => defaults.labels,
            },
        })
    }

    /// Defaults with only the caller's overrides.
    ///
    /// # Errors
    /// See [`Self::resolve`].
    pub fn from_overrides(overrides: &OptionOverrides) -> Result<Self, OptionsError> {
        Self::resolve(&OptionOverrides::default(), overrides)
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// The locale tag as given.
    pub fn locale_tag(&self) -> &str {
        &self.locale_tag
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// First day of the week, 0 is Sunday.
    pub fn week_start(&self) -> u32 {
        self.week_start
    }

    pub fn time(&self) -> bool {
        self.time
    }

    pub fn meridiem(&self) -> bool {
        self.meridiem
    }

    pub fn minute_interval(&self) -> u32 {
        self.minute_interval
    }

    pub fn v_offset(&self) -> f32 {
        self.v_offset
    }

    pub fn h_offset(&self) -> f32 {
        self.h_offset
    }

    pub fn close_on_click(&self) -> bool {
        self.close_on_click
    }

    pub fn close_on_select(&self) -> bool {
        self.close_on_select
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn panel_width(&self) -> f32 {
        self.panel_width
    }

    pub fn templates(&self) -> &Templates {
        self.labels.templates()
    }

    /// The compiled [`Self::templates`].
    pub fn labels(&self) -> &LabelRenderer {
        &self.labels
    }

    pub fn time_format(&self) -> TimeFormat {
        TimeFormat {
            meridiem: self.meridiem,
            minute_interval: self.minute_interval,
        }
    }
}

/// The format must be able to print a date with a time of day.
fn check_format(format: &str) -> Result<(), OptionsError> {
    let sample = NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    let mut out = String::new();
    if format.is_empty() || write!(out, "{}", sample.format(format)).is_err() {
        return Err(OptionsError::Format(format.to_owned()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = DatepickerOptions::from_overrides(&OptionOverrides::default()).unwrap();
        assert_eq!(options, DatepickerOptions::default());
        assert_eq!(options.format(), "%Y-%m-%d");
        assert_eq!(options.minute_interval(), 15);
        assert!(options.close_on_click());
        assert!(options.close_on_select());
        assert!(!options.time());
    }

    #[test]
    fn overrides_beat_attributes() {
        let attributes = OptionOverrides::from_attributes([
            ("data-weekstart", "1"),
            ("data-time", "true"),
            ("data-minute-interval", "5"),
            ("data-something-else", "whatever"),
        ])
        .unwrap();
        let overrides = OptionOverrides {
            minute_interval: Some(10),
            ..Default::default()
        };

        let options = DatepickerOptions::resolve(&attributes, &overrides).unwrap();
        assert_eq!(options.week_start(), 1);
        assert!(options.time());
        assert_eq!(options.minute_interval(), 10);
        assert!(!options.meridiem());
    }

    #[test]
    fn attribute_spellings() {
        let layer = OptionOverrides::from_attributes([
            ("closeOnClick", "false"),
            ("close_on_select", "0"),
            ("data-meridiem", ""),
            ("v-offset", "4.5"),
            ("position", "Top"),
            ("alignment", "center"),
        ])
        .unwrap();
        assert_eq!(layer.close_on_click, Some(false));
        assert_eq!(layer.close_on_select, Some(false));
        assert_eq!(layer.meridiem, Some(true));
        assert_eq!(layer.v_offset, Some(4.5));
        assert_eq!(layer.position, Some(Side::Top));
        assert_eq!(layer.alignment, Some(Align::Center));
    }

    #[test]
    fn bad_attribute_values() {
        let err = OptionOverrides::from_attributes([("data-weekstart", "monday")]).unwrap_err();
        assert!(matches!(err, OptionsError::Attribute { .. }));
        assert!(OptionOverrides::from_attributes([("time", "maybe")]).is_err());
    }

    #[test]
    fn week_start_wraps() {
        let overrides = OptionOverrides {
            week_start: Some(8),
            ..Default::default()
        };
        let options = DatepickerOptions::from_overrides(&overrides).unwrap();
        assert_eq!(options.week_start(), 1);
    }

    #[test]
    fn invalid_minute_interval() {
        for interval in [0, 7, 45, 61] {
            let overrides = OptionOverrides {
                minute_interval: Some(interval),
                ..Default::default()
            };
            assert!(matches!(
                DatepickerOptions::from_overrides(&overrides),
                Err(OptionsError::MinuteInterval(i)) if i == interval
            ));
        }
    }

    #[test]
    fn invalid_format() {
        for format in ["", "%Y-%m-%Q", "%Y %z"] {
            let overrides = OptionOverrides {
                format: Some(format.to_owned()),
                ..Default::default()
            };
            assert!(
                matches!(
                    DatepickerOptions::from_overrides(&overrides),
                    Err(OptionsError::Format(_))
                ),
                "{format:?}"
            );
        }
    }

    #[test]
    fn invalid_template() {
        let overrides = OptionOverrides::from_ron(r#"(templates: (day: "{{#each}}"))"#).unwrap();
        assert!(matches!(
            DatepickerOptions::from_overrides(&overrides),
            Err(OptionsError::Template(_))
        ));

        let overrides =
            OptionOverrides::from_ron(r#"(templates: (calendar_title: "{{year}}-{{month}}"))"#)
                .unwrap();
        let options = DatepickerOptions::from_overrides(&overrides).unwrap();
        assert_eq!(options.templates().calendar_title, "{{year}}-{{month}}");
        assert_eq!(options.templates().confirm, "Ok");
    }

    #[test]
    fn unknown_locale_falls_back() {
        let overrides = OptionOverrides {
            locale: Some("tlh".to_owned()),
            ..Default::default()
        };
        let options = DatepickerOptions::from_overrides(&overrides).unwrap();
        assert_eq!(options.locale(), FALLBACK_LOCALE);
        assert_eq!(options.locale_tag(), "tlh");
    }

    #[test]
    fn from_ron() {
        let layer = OptionOverrides::from_ron(
            r#"(weekstart: 1, time: true, meridiem: true, position: Top, templates: (confirm: "Done"))"#,
        )
        .unwrap();
        assert_eq!(layer.week_start, Some(1));
        assert_eq!(layer.time, Some(true));
        assert_eq!(layer.position, Some(Side::Top));
        assert_eq!(layer.templates.map(|t| t.confirm), Some("Done".to_owned()));

        assert!(OptionOverrides::from_ron("(no_such_option: 1)").is_err());
    }
}
