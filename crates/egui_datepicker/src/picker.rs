use chrono::{Months, NaiveDate, NaiveDateTime, NaiveTime};
use egui::{Rect, Vec2, vec2};
use serde::{Deserialize, Serialize};

use crate::{
    DatepickerOptions,
    calendar::{self, DayCell},
    keyboard::{Action, KeyTarget},
    locale,
    placement::{Placement, PlacementRequest, PlacementState},
    template::Label,
    time::{Step, Stepper, TimePart, TimeSteppers},
};

/// Panel height assumed before the panel has been measured.
const DEFAULT_PANEL_HEIGHT: f32 = 240.0;

/// What the picker panel shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum View {
    #[default]
    Closed,
    Calendar,

    /// Only reachable when the time view is enabled.
    Time,
}

/// The part of a [`Datepicker`] that lives from frame to frame.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PickerState {
    view: View,
    selected: NaiveDateTime,
    view_month: NaiveDate,
    steppers: TimeSteppers,
    placement: PlacementState,
    panel_size: Option<Vec2>,
}

/// Parse the input text, trying a date and time first and then a plain date.
pub fn parse_input(text: &str, format: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(text, format).ok().or_else(|| {
        NaiveDate::parse_from_str(text, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    })
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default())
}

/// A date picker bound to the text of an input.
///
/// This holds no UI. [`crate::DatePickerInput`] draws it and feeds it clicks and key
/// presses; everything it does is also available here directly.
#[derive(Clone, Debug)]
pub struct Datepicker {
    options: DatepickerOptions,
    state: PickerState,
    input: String,
    today: NaiveDate,
}

impl Datepicker {
    /// Bind a closed picker to an input.
    ///
    /// Empty or malformed input text selects `today`.
    pub fn bind(input: impl Into<String>, options: DatepickerOptions, today: NaiveDate) -> Self {
        let input = input.into();
        let selected = Self::read(&input, &options, today);
        Self {
            state: PickerState {
                view: View::Closed,
                selected,
                view_month: calendar::first_of_month(selected.date()),
                steppers: TimeSteppers::for_time(&options.time_format(), selected.time()),
                placement: PlacementState::default(),
                panel_size: None,
            },
            options,
            input,
            today,
        }
    }

    /// Pick up a picker from its stored state.
    pub fn restore(
        state: PickerState,
        input: impl Into<String>,
        options: DatepickerOptions,
        today: NaiveDate,
    ) -> Self {
        let mut picker = Self {
            options,
            state,
            input: input.into(),
            today,
        };
        if picker.state.view == View::Time && !picker.options.time() {
            picker.state.view = View::Calendar;
        }
        picker
    }

    /// The state to store until next frame, and the input text.
    pub fn into_parts(self) -> (PickerState, String) {
        (self.state, self.input)
    }

    fn read(input: &str, options: &DatepickerOptions, today: NaiveDate) -> NaiveDateTime {
        parse_input(input, options.format()).unwrap_or_else(|| {
            if !input.trim().is_empty() {
                log::debug!(
                    "Could not parse {input:?} with format {:?}, using today",
                    options.format()
                );
            }
            midnight(today)
        })
    }

    fn write_input(&mut self) {
        self.input = self
            .state
            .selected
            .format(self.options.format())
            .to_string();
    }

    pub fn options(&self) -> &DatepickerOptions {
        &self.options
    }

    pub fn state(&self) -> &PickerState {
        &self.state
    }

    /// The text of the bound input.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The user edited the input. It is read again when the picker opens.
    pub fn set_input(&mut self, text: &str) {
        if self.input != text {
            self.input = text.to_owned();
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn view(&self) -> View {
        self.state.view
    }

    pub fn is_open(&self) -> bool {
        self.state.view != View::Closed
    }

    pub fn selected(&self) -> NaiveDateTime {
        self.state.selected
    }

    /// First day of the month shown in the calendar.
    pub fn view_month(&self) -> NaiveDate {
        self.state.view_month
    }

    pub fn open(&mut self) {
        if self.is_open() {
            return;
        }
        self.state.selected = Self::read(&self.input, &self.options, self.today);
        self.state.view_month = calendar::first_of_month(self.state.selected.date());
        self.state.placement.reset();
        self.state.view = View::Calendar;
    }

    pub fn close(&mut self) {
        self.state.view = View::Closed;
        self.state.placement.reset();
    }

    pub fn toggle(&mut self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    /// Pick a day, keeping the time of day.
    ///
    /// An open picker goes on to the time view when it is enabled, otherwise it
    /// closes if `close_on_select` is set.
    pub fn select_date(&mut self, date: NaiveDate) {
        let time_format = self.options.time_format();
        let time = if self.options.time() {
            time_format.snap(self.state.selected.time())
        } else {
            self.state.selected.time()
        };

        self.state.selected = date.and_time(time);
        self.state.view_month = calendar::first_of_month(date);
        self.write_input();

        self.state.steppers = TimeSteppers::for_time(&time_format, time);

        if !self.is_open() {
            return;
        }
        if self.options.time() {
            self.state.view = View::Time;
        } else if self.options.close_on_select() {
            self.close();
        }
    }

    /// Back from the time view to the calendar.
    pub fn show_calendar(&mut self) {
        if self.state.view == View::Time {
            self.state.view = View::Calendar;
        }
    }

    /// Show a month `delta` months away. Stays put at the ends of the calendar.
    pub fn navigate_month(&mut self, delta: i32) {
        let month = self.state.view_month;
        let moved = if delta >= 0 {
            month.checked_add_months(Months::new(delta.unsigned_abs()))
        } else {
            month.checked_sub_months(Months::new(delta.unsigned_abs()))
        };
        if let Some(moved) = moved {
            self.state.view_month = moved;
        }
    }

    /// Move one part of the selected time and write the result to the input.
    ///
    /// The step carries over, so moving past midnight changes the date.
    ///
    /// Returns `false` for the meridiem part on a 24-hour clock.
    pub fn adjust_time(&mut self, part: TimePart, step: Step) -> bool {
        let time_format = self.options.time_format();
        if !time_format.parts().contains(&part) {
            return false;
        }

        let selected = time_format.adjust(self.state.selected, part, step);
        self.state.selected = selected;
        self.state.view_month = calendar::first_of_month(selected.date());
        self.state
            .steppers
            .after_step(&time_format, part, step, selected.time());
        self.write_input();
        true
    }

    /// React to a key press. Returns `true` if it changed anything.
    ///
    /// [`Action::Open`] only works from the input.
    pub fn handle_action(&mut self, action: Action, target: KeyTarget) -> bool {
        match action {
            Action::Open => {
                if target == KeyTarget::Input && !self.is_open() {
                    self.open();
                    true
                } else {
                    false
                }
            }
            Action::Close | Action::TabForward | Action::TabBackward => {
                let was_open = self.is_open();
                self.close();
                was_open
            }
        }
    }

    /// The cells of the calendar grid.
    pub fn grid(&self) -> Vec<DayCell> {
        calendar::build_grid(
            self.state.view_month,
            self.options.week_start(),
            self.state.selected.date(),
            self.today,
        )
    }

    pub fn weekday_header(&self) -> [String; 7] {
        let labels = self.options.labels();
        calendar::weekday_header(self.options.week_start(), self.options.locale())
            .map(|day| labels.render(Label::Weekday, &[("day", day)]))
    }

    /// The title above the calendar, e.g. `March 2024`.
    pub fn calendar_title(&self) -> String {
        let (_, month, year) = locale::date_parts(self.options.locale(), self.state.view_month);
        self.options.labels().render(
            Label::CalendarTitle,
            &[("month", month), ("year", year.as_str())],
        )
    }

    /// The label of a day cell.
    pub fn day_label(&self, date: NaiveDate) -> String {
        use chrono::Datelike as _;
        let day = date.day().to_string();
        self.options
            .labels()
            .render(Label::Day, &[("day", day.as_str())])
    }

    /// The header of the time view, e.g. `15 March 2024`.
    pub fn time_title(&self) -> String {
        let (day, month, year) = locale::date_parts(self.options.locale(), self.state.selected.date());
        self.options.labels().render(
            Label::TimeTitle,
            &[("day", day.as_str()), ("month", month), ("year", year.as_str())],
        )
    }

    pub fn time_parts(&self) -> &'static [TimePart] {
        self.options.time_format().parts()
    }

    pub fn time_options(&self, part: TimePart) -> Vec<String> {
        self.options.time_format().options(part)
    }

    /// The option of `part` matching the selected time.
    pub fn time_value(&self, part: TimePart) -> String {
        self.options
            .time_format()
            .display(part, self.state.selected.time())
    }

    pub fn time_option_label(&self, part: TimePart, option: &str) -> String {
        self.options.labels().render(
            Label::TimeOption,
            &[("option", option), ("timepart", part.name())],
        )
    }

    /// The text of the button closing the time view.
    pub fn confirm_label(&self) -> String {
        self.options.labels().render(Label::Confirm, &[])
    }

    pub fn stepper(&self, part: TimePart) -> Stepper {
        self.state.steppers.get(part)
    }

    /// Record the panel size measured this frame.
    pub fn set_panel_size(&mut self, size: Vec2) {
        self.state.panel_size = Some(size);
    }

    /// Where to show the panel for an input at `anchor`.
    pub fn place(&mut self, anchor: Rect, viewport: Rect, obstacles: &[Rect]) -> Placement {
        let height = self
            .state
            .panel_size
            .map_or(DEFAULT_PANEL_HEIGHT, |size| size.y);
        let request = PlacementRequest {
            anchor,
            panel_size: vec2(self.options.panel_width(), height),
            viewport,
            obstacles,
            preferred: self.options.position(),
            v_offset: self.options.v_offset(),
            h_offset: self.options.h_offset(),
        };
        self.state.placement.place(&request)
    }
}
