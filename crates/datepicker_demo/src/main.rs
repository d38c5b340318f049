#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release
#![expect(rustdoc::missing_crate_level_docs)] // it's an example

use eframe::egui;
use egui_datepicker::{DatePickerInput, OptionOverrides};

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([480.0, 520.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Date picker demo",
        options,
        Box::new(|_cc| Ok(Box::<DemoApp>::default())),
    )
}

/// Attributes as they would be attached to an input.
const MEETING_ATTRIBUTES: [(&str, &str); 5] = [
    ("data-time", "true"),
    ("data-meridiem", "true"),
    ("data-minute-interval", "5"),
    ("data-position", "right"),
    ("data-format", "%Y-%m-%d %I:%M %p"),
];

struct DemoApp {
    birthday: String,
    departure: String,
    meeting: String,
    meeting_overrides: String,
}

impl Default for DemoApp {
    fn default() -> Self {
        Self {
            birthday: String::new(),
            departure: "2024-03-15 18:30".to_owned(),
            meeting: String::new(),
            meeting_overrides: "(weekstart: 1, locale: \"de\")".to_owned(),
        }
    }
}

impl DemoApp {
    fn meeting_options(&self) -> Result<(OptionOverrides, OptionOverrides), String> {
        let attributes =
            OptionOverrides::from_attributes(MEETING_ATTRIBUTES).map_err(|err| err.to_string())?;
        let overrides =
            OptionOverrides::from_ron(&self.meeting_overrides).map_err(|err| err.to_string())?;
        Ok((attributes, overrides))
    }
}

impl eframe::App for DemoApp {
    fn ui(&mut self, ui: &mut egui::Ui, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show_inside(ui, |ui| {
            ui.heading("Date picker");

            egui::Grid::new("pickers")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Birthday");
                    let response =
                        ui.add(DatePickerInput::new(&mut self.birthday).id_salt("birthday"));
                    if response.changed() {
                        log::info!("Birthday set to {}", self.birthday);
                    }
                    ui.end_row();

                    ui.label("Departure");
                    let departure = OptionOverrides {
                        time: Some(true),
                        format: Some("%Y-%m-%d %H:%M".to_owned()),
                        minute_interval: Some(15),
                        position: Some(egui_datepicker::Side::Top),
                        ..Default::default()
                    };
                    let output = DatePickerInput::new(&mut self.departure)
                        .id_salt("departure")
                        .configure(&OptionOverrides::default(), &departure)
                        .show(ui);
                    if output.closed {
                        log::info!("Departure picker closed at {}", self.departure);
                    }
                    ui.end_row();

                    ui.label("Meeting");
                    match self.meeting_options() {
                        Ok((attributes, overrides)) => {
                            ui.add(
                                DatePickerInput::new(&mut self.meeting)
                                    .id_salt("meeting")
                                    .configure(&attributes, &overrides),
                            );
                        }
                        Err(err) => {
                            ui.colored_label(ui.visuals().error_fg_color, err);
                        }
                    }
                    ui.end_row();

                    ui.label("");
                    // Same Ui as the picker, so the ids match.
                    if ui.button("Reset meeting picker").clicked() {
                        DatePickerInput::destroy(ui, "meeting");
                        self.meeting.clear();
                    }
                    ui.end_row();
                });

            ui.separator();

            ui.label("Overrides for the meeting picker (RON):");
            ui.text_edit_singleline(&mut self.meeting_overrides);
        });
    }
}
