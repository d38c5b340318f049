//! Label templates with `{{name}}` placeholders, rendered with handlebars.

use std::collections::BTreeMap;

use handlebars::{Handlebars, RenderError, TemplateError};
use serde::{Deserialize, Serialize};

/// The text shown in the picker panel.
///
/// Each template may use the placeholders listed on its field.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Templates {
    /// Title above the calendar grid: `{{month}}`, `{{year}}`.
    pub calendar_title: String,

    /// Weekday header label: `{{day}}`.
    pub weekday: String,

    /// Day cell label: `{{day}}`.
    pub day: String,

    /// Header of the time view, linking back to the calendar: `{{day}}`, `{{month}}`, `{{year}}`.
    pub time_title: String,

    /// One option in a time part column: `{{option}}`, `{{timepart}}`.
    pub time_option: String,

    /// The button closing the time view.
    pub confirm: String,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            calendar_title: "{{month}} {{year}}".to_owned(),
            weekday: "{{day}}".to_owned(),
            day: "{{day}}".to_owned(),
            time_title: "{{day}} {{month}} {{year}}".to_owned(),
            time_option: "{{option}}".to_owned(),
            confirm: "Ok".to_owned(),
        }
    }
}

/// Which of the [`Templates`] to render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Label {
    CalendarTitle,
    Weekday,
    Day,
    TimeTitle,
    TimeOption,
    Confirm,
}

impl Label {
    pub const ALL: [Self; 6] = [
        Self::CalendarTitle,
        Self::Weekday,
        Self::Day,
        Self::TimeTitle,
        Self::TimeOption,
        Self::Confirm,
    ];

    /// The name the template is registered under.
    pub fn name(self) -> &'static str {
        match self {
            Self::CalendarTitle => "calendar_title",
            Self::Weekday => "weekday",
            Self::Day => "day",
            Self::TimeTitle => "time_title",
            Self::TimeOption => "time_option",
            Self::Confirm => "confirm",
        }
    }

    fn source(self, templates: &Templates) -> &str {
        match self {
            Self::CalendarTitle => &templates.calendar_title,
            Self::Weekday => &templates.weekday,
            Self::Day => &templates.day,
            Self::TimeTitle => &templates.time_title,
            Self::TimeOption => &templates.time_option,
            Self::Confirm => &templates.confirm,
        }
    }
}

fn registry() -> Handlebars<'static> {
    let mut registry = Handlebars::new();
    // Labels are plain text, not HTML.
    registry.register_escape_fn(handlebars::no_escape);
    registry
}

fn model_data<'a>(model: &[(&'a str, &'a str)]) -> BTreeMap<&'a str, &'a str> {
    model.iter().copied().collect()
}

/// [`Templates`] compiled once, ready to render labels.
#[derive(Clone, Debug)]
pub struct LabelRenderer {
    templates: Templates,
    registry: Handlebars<'static>,
}

impl LabelRenderer {
    /// Compile every template.
    ///
    /// # Errors
    /// If a template is not valid handlebars syntax.
    pub fn new(templates: Templates) -> Result<Self, TemplateError> {
        let mut registry = registry();
        for label in Label::ALL {
            registry.register_template_string(label.name(), label.source(&templates))?;
        }
        Ok(Self {
            templates,
            registry,
        })
    }

    pub fn templates(&self) -> &Templates {
        &self.templates
    }

    /// Render one label. Placeholders missing from `model` render as nothing.
    pub fn render(&self, label: Label, model: &[(&str, &str)]) -> String {
        self.registry
            .render(label.name(), &model_data(model))
            .unwrap_or_else(|err| {
                log::warn!("Failed to render the {} label: {err}", label.name());
                label.source(&self.templates).to_owned()
            })
    }
}

impl Default for LabelRenderer {
    fn default() -> Self {
        let templates = Templates::default();
        Self::new(templates.clone()).unwrap_or_else(|err| {
            log::error!("Default date picker templates do not compile: {err}");
            Self {
                templates,
                registry: registry(),
            }
        })
    }
}

impl PartialEq for LabelRenderer {
    fn eq(&self, other: &Self) -> bool {
        self.templates == other.templates
    }
}

/// Render a one-off template.
///
/// # Errors
/// If the template does not parse or fails to render.
pub fn render(template: &str, model: &[(&str, &str)]) -> Result<String, RenderError> {
    registry().render_template(template, &model_data(model))
}
