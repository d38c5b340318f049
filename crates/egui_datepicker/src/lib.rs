//! A date and time picker for [`egui`](https://github.com/emilk/egui) text inputs.
//!
//! [`DatePickerInput`] wraps a `String` in a text field. Clicking it (or its calendar
//! button, or pressing enter) opens a panel with a month calendar and, optionally,
//! hour/minute/meridiem columns. The picked value is written back into the string,
//! formatted with a [`chrono`] format string.
//!
//! The picker logic lives in [`Datepicker`] and does not need a [`egui::Ui`], so it can be
//! driven and tested directly.
//!
//! ```
//! # egui::__run_test_ui(|ui| {
//! # let mut text = String::from("2024-03-15");
//! let overrides = egui_datepicker::OptionOverrides {
//!     time: Some(true),
//!     format: Some("%Y-%m-%d %H:%M".to_owned()),
//!     ..Default::default()
//! };
//! ui.add(
//!     egui_datepicker::DatePickerInput::new(&mut text)
//!         .configure(&Default::default(), &overrides),
//! );
//! # });
//! ```

#![allow(clippy::float_cmp)]
#![forbid(unsafe_code)]

pub mod calendar;
pub mod keyboard;
pub mod locale;
mod options;
mod picker;
pub mod placement;
pub mod registry;
pub mod template;
pub mod time;
mod widget;

pub use chrono;

pub use crate::calendar::{DayCell, DayKind, build_grid, weekday_header};
pub use crate::keyboard::{Action, KeyTarget};
pub use crate::options::{DatepickerOptions, OptionOverrides, OptionsError};
pub use crate::picker::{Datepicker, PickerState, View, parse_input};
pub use crate::placement::{Placement, PlacementRequest, PlacementState, Position, Side, place};
pub use crate::registry::PopoverRegistry;
pub use crate::template::{Label, LabelRenderer, Templates, render};
pub use crate::time::{Step, Stepper, TimeFormat, TimePart};
pub use crate::widget::{DEFAULT_ID_SALT, DatePickerInput, DatePickerOutput};
