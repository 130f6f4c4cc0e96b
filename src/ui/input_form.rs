use std::{collections::HashMap, time::Instant};

use egui::{Align, Button, Color32, CornerRadius, Key, Layout, RichText, TextEdit, Ui};
use log::{error, warn};
use motorecap::stats::{
    self, FIELD_ACCIDENTS, FIELD_CHALLAN_COUNT, FIELD_CHALLAN_FINE, FIELD_TOP_SPEED_KH,
    FIELD_TOTAL_DISTANCE_KM, FIELD_TOTAL_TRIPS, FIELD_USER_NAME,
};

use super::{
    DEFAULT_BUTTON_CORNER_RADIUS, ExportStatus, PALETTE_BLACK, PALETTE_GREEN, PALETTE_GREY,
    PALETTE_RED, RecapApp,
};

const FORM_MAX_WIDTH: f32 = 350.;

/// What the rider typed, kept as text until submission.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RiderForm {
    pub(crate) user_name: String,
    pub(crate) total_distance_km: String,
    pub(crate) total_trips: String,
    pub(crate) top_speed_kh: String,
    pub(crate) challan_count: String,
    pub(crate) challan_fine: String,
    pub(crate) accidents: String,
}

impl Default for RiderForm {
    fn default() -> Self {
        Self {
            user_name: String::new(),
            total_distance_km: String::new(),
            total_trips: String::new(),
            top_speed_kh: String::new(),
            challan_count: "0".to_string(),
            challan_fine: "0".to_string(),
            accidents: "0".to_string(),
        }
    }
}

impl RiderForm {
    pub(crate) fn fields(&self) -> HashMap<String, String> {
        [
            (FIELD_USER_NAME, &self.user_name),
            (FIELD_TOTAL_DISTANCE_KM, &self.total_distance_km),
            (FIELD_TOTAL_TRIPS, &self.total_trips),
            (FIELD_TOP_SPEED_KH, &self.top_speed_kh),
            (FIELD_CHALLAN_COUNT, &self.challan_count),
            (FIELD_CHALLAN_FINE, &self.challan_fine),
            (FIELD_ACCIDENTS, &self.accidents),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
    }
}

fn form_field(ui: &mut Ui, label: &str, hint: &str, value: &mut String) {
    ui.label(RichText::new(label).size(12.).color(PALETTE_GREY));
    ui.add(
        TextEdit::singleline(value)
            .hint_text(hint)
            .desired_width(f32::INFINITY),
    );
    ui.add_space(10.);
}

impl RecapApp {
    pub(crate) fn input_form_view(&mut self, ctx: &egui::Context, now: Instant) {
        let mut submitted = ctx.input(|is| is.key_pressed(Key::Enter));

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.with_layout(Layout::top_down(Align::Center), |ui| {
                ui.set_max_width(FORM_MAX_WIDTH);
                ui.add_space(30.);
                ui.label(RichText::new("🏍").size(48.).color(PALETTE_GREEN));
                ui.label(
                    RichText::new("RIDE STATS")
                        .size(32.)
                        .strong()
                        .color(PALETTE_GREEN),
                );
                ui.label(
                    RichText::new("Enter your 2024 details manually.").color(PALETTE_GREY),
                );
                ui.add_space(20.);

                ui.with_layout(Layout::top_down(Align::Min), |ui| {
                    let form = &mut self.form;
                    form_field(ui, "Rider Name / ID", "e.g. GhostRider", &mut form.user_name);
                    ui.columns(2, |columns| {
                        form_field(
                            &mut columns[0],
                            "Distance (KM)",
                            "0",
                            &mut form.total_distance_km,
                        );
                        form_field(&mut columns[1], "Total Trips", "0", &mut form.total_trips);
                    });
                    form_field(ui, "Top Speed Reached (KM/H)", "0", &mut form.top_speed_kh);
                    ui.columns(2, |columns| {
                        form_field(
                            &mut columns[0],
                            "Challans Count",
                            "0",
                            &mut form.challan_count,
                        );
                        form_field(
                            &mut columns[1],
                            "Total Fine (₹)",
                            "0",
                            &mut form.challan_fine,
                        );
                    });
                    form_field(ui, "Accidents (Be Honest)", "0", &mut form.accidents);
                });

                ui.add_space(20.);
                let generate = Button::new(
                    RichText::new("Generate Wrapped ➡")
                        .size(18.)
                        .strong()
                        .color(PALETTE_BLACK),
                )
                .fill(PALETTE_GREEN)
                .corner_radius(CornerRadius::same(DEFAULT_BUTTON_CORNER_RADIUS))
                .min_size(egui::vec2(FORM_MAX_WIDTH, 44.));
                if ui.add(generate).clicked() {
                    submitted = true;
                }

                if let Some(message) = &self.form_error {
                    ui.add_space(10.);
                    ui.label(RichText::new(message).color(PALETTE_RED));
                }
                ui.add_space(10.);
                ui.label(
                    RichText::new("Nothing you enter leaves this window.")
                        .size(10.)
                        .color(Color32::DARK_GRAY),
                );
            });
        });

        if submitted {
            self.submit_form(now);
        }
    }

    fn submit_form(&mut self, now: Instant) {
        match stats::submit(&self.form.fields()) {
            Ok(ride_stats) => {
                self.form_error = None;
                self.export_status = ExportStatus::Idle;
                if let Err(e) = self.engine.start(ride_stats, now) {
                    error!("Could not start recap: {}", e);
                }
            }
            Err(e) => {
                warn!("Rider form rejected: {}", e);
                self.form_error = Some(e.to_string());
            }
        }
    }
}
