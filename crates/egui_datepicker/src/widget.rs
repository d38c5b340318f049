use std::hash::Hash;

use chrono::NaiveDate;
use egui::{
    Area, Button, Frame, Id, LayerId, Order, Rect, Response, RichText, ScrollArea, TextEdit, Ui,
    UiKind, Widget, vec2,
};

use crate::{
    DatepickerOptions, OptionOverrides, OptionsError,
    calendar::{self, DayCell, DayKind},
    keyboard::{self, Action, KeyTarget},
    picker::{Datepicker, PickerState, View},
    registry::PopoverRegistry,
    time::{Step, TimePart},
};

/// Id salt used when none is given with [`DatePickerInput::id_salt`].
pub const DEFAULT_ID_SALT: &str = "egui_datepicker";

/// Max height of the option lists in the time view.
const TIME_OPTIONS_HEIGHT: f32 = 120.0;

/// A text input that opens a date picker panel.
///
/// The picked date (and time, if enabled) is written into the string as text,
/// formatted with the configured format.
///
/// ```
/// # egui::__run_test_ui(|ui| {
/// # let mut text = String::new();
/// ui.add(egui_datepicker::DatePickerInput::new(&mut text).id_salt("birthday"));
/// # });
/// ```
pub struct DatePickerInput<'a> {
    text: &'a mut String,
    id_salt: Id,
    options: Result<DatepickerOptions, OptionsError>,
    today: Option<NaiveDate>,
    obstacles: Vec<Rect>,
    show_icon: bool,
}

impl<'a> DatePickerInput<'a> {
    pub fn new(text: &'a mut String) -> Self {
        Self {
            text,
            id_salt: Id::new(DEFAULT_ID_SALT),
            options: Ok(DatepickerOptions::default()),
            today: None,
            obstacles: Vec::new(),
            show_icon: true,
        }
    }

    /// Must be set if multiple date pickers are in the same Ui.
    #[inline]
    pub fn id_salt(mut self, id_salt: impl Hash) -> Self {
        self.id_salt = Id::new(id_salt);
        self
    }

    /// Use already resolved options.
    #[inline]
    pub fn options(mut self, options: DatepickerOptions) -> Self {
        self.options = Ok(options);
        self
    }

    /// Resolve options from attributes and caller overrides.
    ///
    /// If they are invalid, a warning is logged and only a plain text input is shown.
    #[inline]
    pub fn configure(mut self, attributes: &OptionOverrides, overrides: &OptionOverrides) -> Self {
        self.options = DatepickerOptions::resolve(attributes, overrides);
        self
    }

    /// The date marked as today. (Default: the local date)
    #[inline]
    pub fn today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Keep the panel from covering this rectangle.
    #[inline]
    pub fn avoid(mut self, rect: Rect) -> Self {
        self.obstacles.push(rect);
        self
    }

    /// Show a calendar button next to the input. (Default: true)
    #[inline]
    pub fn show_icon(mut self, show_icon: bool) -> Self {
        self.show_icon = show_icon;
        self
    }

    /// Forget a picker: its stored state and its claim on the active popover slot.
    ///
    /// Call it with the [`Ui`] the picker was added to, since its id is derived from it.
    pub fn destroy(ui: &Ui, id_salt: impl Hash) {
        let id = ui.make_persistent_id(Id::new(id_salt));
        ui.data_mut(|data| {
            data.remove::<PickerState>(id);
            data.remove::<bool>(warned_id(id));
            data.remove::<bool>(owned_focus_id(id));
        });
        PopoverRegistry::update(ui.ctx(), |registry| registry.release(id));
    }
}

fn warned_id(id: Id) -> Id {
    id.with("options_warning")
}

fn owned_focus_id(id: Id) -> Id {
    id.with("owned_focus")
}

fn warn_once(ui: &Ui, id: Id, err: &OptionsError) {
    let warned_id = warned_id(id);
    if !ui.data(|data| data.get_temp::<bool>(warned_id)).unwrap_or(false) {
        log::warn!("Date picker disabled, the input is left as a plain text field: {err}");
        ui.data_mut(|data| data.insert_temp(warned_id, true));
    }
}

/// The result of [`DatePickerInput::show`].
pub struct DatePickerOutput {
    /// The response of the text input.
    pub response: Response,

    /// The panel opened this frame.
    pub opened: bool,

    /// The panel closed this frame.
    pub closed: bool,

    /// The panel is open after this frame.
    pub is_open: bool,
}

/// Whether the focused widget is part of this picker: its icon or its panel.
fn owns_focus(ui: &Ui, focused: Option<Id>, icon: Option<Id>, panel_layer: LayerId) -> bool {
    let Some(focused) = focused else {
        return false;
    };
    Some(focused) == icon
        || ui
            .ctx()
            .read_response(focused)
            .is_some_and(|response| response.layer_id == panel_layer)
}

impl DatePickerInput<'_> {
    /// Show the input, and the panel if open.
    ///
    /// Unlike [`Widget::ui`] this also tells if the panel opened or closed.
    pub fn show(self, ui: &mut Ui) -> DatePickerOutput {
        let Self {
            text,
            id_salt,
            options,
            today,
            obstacles,
            show_icon,
        } = self;
        let id = ui.make_persistent_id(id_salt);

        let options = match options {
            Ok(options) => options,
            Err(err) => {
                warn_once(ui, id, &err);
                return DatePickerOutput {
                    response: ui.add(TextEdit::singleline(text)),
                    opened: false,
                    closed: false,
                    is_open: false,
                };
            }
        };
        let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());

        let mut picker = match ui.data_mut(|data| data.get_persisted::<PickerState>(id)) {
            Some(state) => Datepicker::restore(state, text.as_str(), options, today),
            None => Datepicker::bind(text.as_str(), options, today),
        };
        let was_open = picker.is_open();

        if picker.is_open() && !PopoverRegistry::load(ui.ctx()).is_active(id) {
            log::debug!("Closing date picker {id:?}, another popover took over");
            picker.close();
        }

        let row = ui.horizontal(|ui| {
            let input = ui.add(TextEdit::singleline(&mut *text).id(id.with("input")));
            let icon = show_icon.then(|| ui.button("📆").on_hover_text("Open calendar"));
            (input, icon)
        });
        // The panel is placed around the input and its icon.
        let anchor = row.response.rect;
        let (mut response, icon) = row.inner;
        picker.set_input(text);

        let toggled = response.clicked() || icon.as_ref().is_some_and(Response::clicked);
        if toggled {
            picker.toggle();
        }

        let panel_id = id.with("panel");
        let panel_layer = LayerId::new(Order::Foreground, panel_id);
        let focus_memory_id = owned_focus_id(id);

        let input_focused = response.has_focus() || response.lost_focus();
        let focused = ui.memory(|mem| mem.focused());
        let owned_focus = owns_focus(ui, focused, icon.as_ref().map(|icon| icon.id), panel_layer);
        let owned_focus_before = ui
            .data(|data| data.get_temp::<bool>(focus_memory_id))
            .unwrap_or(false);

        // Keys pressed in some other widget are not ours.
        let target = if input_focused {
            Some(KeyTarget::Input)
        } else if picker.is_open() && (focused.is_none() || owned_focus) {
            Some(KeyTarget::Panel)
        } else {
            None
        };
        if let Some(target) = target {
            let restore_focus = input_focused || owned_focus || owned_focus_before;
            for action in ui.input(keyboard::actions_in) {
                if picker.handle_action(action, target) && action == Action::Close && restore_focus
                {
                    response.request_focus();
                }
            }
        }

        if picker.is_open() {
            let placement = picker.place(anchor, ui.clip_rect(), &obstacles);
            let frame = Frame::popup(ui.style());
            let content_width = (placement.rect.width() - frame.inner_margin.sum().x).max(0.0);

            let area_response = Area::new(panel_id)
                .kind(UiKind::Picker)
                .order(Order::Foreground)
                .fixed_pos(placement.rect.min)
                .show(ui.ctx(), |ui| {
                    frame.show(ui, |ui| {
                        ui.set_min_width(content_width);
                        ui.set_max_width(content_width);
                        match picker.view() {
                            View::Calendar => calendar_ui(ui, &mut picker, id),
                            View::Time => time_ui(ui, &mut picker, id),
                            View::Closed => {}
                        }
                    });
                })
                .response;
            picker.set_panel_size(area_response.rect.size());

            if picker.options().close_on_click()
                && !toggled
                && area_response.clicked_elsewhere()
                && PopoverRegistry::load(ui.ctx()).is_active(id)
            {
                picker.close();
            }
        }

        ui.data_mut(|data| data.insert_temp(focus_memory_id, owned_focus));

        PopoverRegistry::update(ui.ctx(), |registry| {
            if picker.is_open() {
                if let Some(previous) = registry.claim(id) {
                    log::debug!("Date picker {id:?} replaces popover {previous:?}");
                }
            } else {
                registry.release(id);
            }
        });

        if picker.input() != text.as_str() {
            *text = picker.input().to_owned();
            response.mark_changed();
        }

        let is_open = picker.is_open();
        let (state, _) = picker.into_parts();
        ui.data_mut(|data| data.insert_persisted(id, state));

        DatePickerOutput {
            response,
            opened: !was_open && is_open,
            closed: was_open && !is_open,
            is_open,
        }
    }
}

impl Widget for DatePickerInput<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        self.show(ui).response
    }
}

fn calendar_ui(ui: &mut Ui, picker: &mut Datepicker, id: Id) {
    ui.horizontal(|ui| {
        if ui.button("<").on_hover_text("Previous month").clicked() {
            picker.navigate_month(-1);
        }
        if ui.button(">").on_hover_text("Next month").clicked() {
            picker.navigate_month(1);
        }
        ui.label(RichText::new(picker.calendar_title()).strong());
    });

    let cells = picker.grid();
    let header = picker.weekday_header();
    let mut picked = None;

    egui::Grid::new(id.with("days"))
        .num_columns(7)
        .spacing(vec2(2.0, 2.0))
        .show(ui, |ui| {
            for name in header {
                ui.label(RichText::new(name).strong());
            }
            ui.end_row();

            for week in calendar::weeks(&cells) {
                for cell in week {
                    if day_button(ui, picker.day_label(cell.date), cell).clicked() {
                        picked = Some(cell.date);
                    }
                }
                ui.end_row();
            }
        });

    if let Some(date) = picked {
        picker.select_date(date);
    }
}

fn day_button(ui: &mut Ui, label: String, cell: &DayCell) -> Response {
    let mut text = RichText::new(label);
    if cell.kind == DayKind::OtherMonth {
        let color = ui.visuals().widgets.inactive.text_color();
        text = text.color(color.linear_multiply(0.5));
    }
    let today_stroke = ui.visuals().widgets.inactive.fg_stroke;

    let response = ui.add(
        Button::new(text)
            .selected(cell.kind == DayKind::Current)
            .min_size(vec2(24.0, 20.0)),
    );

    if cell.kind == DayKind::SameMonthToday {
        // Encircle today's date
        ui.painter()
            .circle_stroke(response.rect.center(), 8.0, today_stroke);
    }

    response
}

fn time_ui(ui: &mut Ui, picker: &mut Datepicker, id: Id) {
    if ui
        .link(picker.time_title())
        .on_hover_text("Back to the calendar")
        .clicked()
    {
        picker.show_calendar();
        return;
    }

    let parts = picker.time_parts();
    let mut steps = Vec::new();
    ui.columns(parts.len(), |columns| {
        for (ui, part) in columns.iter_mut().zip(parts) {
            if let Some(step) = time_part_ui(ui, picker, *part, id) {
                steps.push((*part, step));
            }
        }
    });
    for (part, step) in steps {
        picker.adjust_time(part, step);
    }

    let confirm = picker.confirm_label();
    ui.vertical_centered_justified(|ui| {
        if ui.button(confirm).clicked() {
            picker.close();
        }
    });
}

fn time_part_ui(ui: &mut Ui, picker: &Datepicker, part: TimePart, id: Id) -> Option<Step> {
    let stepper = picker.stepper(part);
    let current = picker.time_value(part);
    let mut step = None;

    ui.vertical_centered_justified(|ui| {
        if ui
            .add_enabled(stepper.increment_enabled, Button::new("⏶"))
            .on_hover_text(format!("Next {}", part.name()))
            .clicked()
        {
            step = Some(Step::Increment);
        }

        ScrollArea::vertical()
            .id_salt(id.with(part))
            .max_height(TIME_OPTIONS_HEIGHT)
            .show(ui, |ui| {
                for option in picker.time_options(part) {
                    let selected = option == current;
                    let response =
                        ui.selectable_label(selected, picker.time_option_label(part, &option));
                    if selected {
                        response.scroll_to_me(Some(egui::Align::Center));
                    }
                }
            });

        if ui
            .add_enabled(stepper.decrement_enabled, Button::new("⏷"))
            .on_hover_text(format!("Previous {}", part.name()))
            .clicked()
        {
            step = Some(Step::Decrement);
        }
    });

    step
}
