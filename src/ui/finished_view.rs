use std::time::Instant;

use egui::{Align, Button, CornerRadius, Layout, RichText, vec2};

use super::{
    DEFAULT_BUTTON_CORNER_RADIUS, ExportStatus, PALETTE_BLACK, PALETTE_GRAPHITE, PALETTE_GREEN,
    PALETTE_GREY, RecapApp, input_form::RiderForm,
};

impl RecapApp {
    pub(crate) fn finished_view(&mut self, ctx: &egui::Context, now: Instant) {
        let mut replay = false;
        let mut new_rider = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.with_layout(Layout::top_down(Align::Center), |ui| {
                ui.add_space(ui.available_height() / 3.);
                ui.label(
                    RichText::new("RIDE COMPLETE")
                        .size(32.)
                        .strong()
                        .color(PALETTE_GREEN),
                );
                if let Some(stats) = self.engine.stats() {
                    ui.label(
                        RichText::new(format!("See you on the road, {}.", stats.user_name))
                            .color(PALETTE_GREY),
                    );
                }
                ui.add_space(30.);

                let replay_button = Button::new(
                    RichText::new("Replay Wrapper")
                        .size(16.)
                        .strong()
                        .color(PALETTE_BLACK),
                )
                .fill(PALETTE_GREEN)
                .corner_radius(CornerRadius::same(DEFAULT_BUTTON_CORNER_RADIUS))
                .min_size(vec2(220., 40.));
                replay = ui.add(replay_button).clicked();

                ui.add_space(10.);
                let new_rider_button = Button::new(RichText::new("New Rider").size(16.))
                    .fill(PALETTE_GRAPHITE)
                    .corner_radius(CornerRadius::same(DEFAULT_BUTTON_CORNER_RADIUS))
                    .min_size(vec2(220., 40.));
                new_rider = ui.add(new_rider_button).clicked();
            });
        });

        if replay {
            self.engine.restart(now);
            self.export_status = ExportStatus::Idle;
        } else if new_rider {
            self.engine.reset();
            self.form = RiderForm::default();
            self.form_error = None;
            self.export_status = ExportStatus::Idle;
        }
        if replay || new_rider {
            ctx.request_repaint();
        }
    }
}
