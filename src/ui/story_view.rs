use std::time::Instant;

use egui::{
    Align, Button, Color32, CornerRadius, Frame, Key, Layout, Margin, Pos2, Rect, RichText, Sense,
    Stroke, Ui, vec2,
};
use motorecap::slides::{SlideContent, SummaryCard, format_card_date};

use super::{
    DEFAULT_BUTTON_CORNER_RADIUS, ExportStatus, PALETTE_BLACK, PALETTE_CARD, PALETTE_GRAPHITE,
    PALETTE_GREEN, PALETTE_GREY, PALETTE_RED, RecapApp, rgb, slide_background,
};

const PROGRESS_BAR_HEIGHT: f32 = 3.;
const PROGRESS_BAR_GAP: f32 = 4.;
const CARD_CORNER_RADIUS: u8 = 20;

/// Navigation requested during one pass of the story view.
#[derive(Clone, Copy, Debug, PartialEq)]
enum StoryInput {
    Prev,
    Next,
    Tap { x: f32, width: f32 },
}

fn paint_progress(ui: &mut Ui, progress: &[f32]) {
    let (bar_area, _) = ui.allocate_exact_size(
        vec2(ui.available_width(), PROGRESS_BAR_HEIGHT),
        Sense::hover(),
    );
    let count = progress.len().max(1) as f32;
    let bar_width = (bar_area.width() - PROGRESS_BAR_GAP * (count - 1.)) / count;
    let painter = ui.painter();
    for (i, fill) in progress.iter().enumerate() {
        let left = bar_area.left() + i as f32 * (bar_width + PROGRESS_BAR_GAP);
        let track = Rect::from_min_size(
            egui::pos2(left, bar_area.top()),
            vec2(bar_width, PROGRESS_BAR_HEIGHT),
        );
        painter.rect_filled(track, 2., Color32::from_white_alpha(70));
        if *fill > 0. {
            let done = Rect::from_min_size(
                track.min,
                vec2(bar_width * fill.clamp(0., 1.), PROGRESS_BAR_HEIGHT),
            );
            painter.rect_filled(done, 2., Color32::WHITE);
        }
    }
}

fn slide_body(ui: &mut Ui, content: &SlideContent) -> Option<Rect> {
    let accent = rgb(content.tone.rgb());

    if let Some(card) = &content.card {
        return Some(summary_card(ui, card));
    }

    ui.label(
        RichText::new(&content.heading)
            .size(28.)
            .strong()
            .color(accent),
    );
    if let Some(figure) = &content.figure {
        ui.add_space(10.);
        ui.label(RichText::new(figure).size(72.).strong().color(Color32::WHITE));
        if let Some(unit) = content.unit {
            ui.label(RichText::new(unit).size(16.).color(PALETTE_GREY));
        }
    }
    ui.add_space(16.);
    for line in &content.lines {
        ui.label(RichText::new(line).size(18.).color(Color32::LIGHT_GRAY));
    }
    None
}

/// Draws the shareable card and returns the screen area it covers.
fn summary_card(ui: &mut Ui, card: &SummaryCard) -> Rect {
    let rank_color = rgb(card.rank.accent_rgb());
    Frame::new()
        .fill(PALETTE_CARD)
        .stroke(Stroke::new(1., PALETTE_GRAPHITE))
        .corner_radius(CornerRadius::same(CARD_CORNER_RADIUS))
        .inner_margin(Margin::same(20))
        .show(ui, |ui| {
            ui.label(
                RichText::new(&card.header)
                    .size(11.)
                    .monospace()
                    .color(PALETTE_GREY),
            );
            ui.add_space(8.);
            ui.label(
                RichText::new(card.user_name.to_uppercase())
                    .size(30.)
                    .strong()
                    .color(Color32::WHITE),
            );
            ui.label(
                RichText::new(card.rank.title())
                    .size(14.)
                    .strong()
                    .color(rank_color),
            );
            ui.add_space(16.);

            egui::Grid::new("summary-card-cells")
                .num_columns(2)
                .spacing(vec2(24., 14.))
                .show(ui, |ui| {
                    for (i, cell) in card.cells.iter().enumerate() {
                        ui.vertical(|ui| {
                            ui.label(RichText::new(cell.label).size(10.).color(PALETTE_GREY));
                            ui.horizontal(|ui| {
                                ui.label(
                                    RichText::new(&cell.value)
                                        .size(22.)
                                        .strong()
                                        .color(rgb(cell.tone.rgb())),
                                );
                                if !cell.unit.is_empty() {
                                    ui.label(
                                        RichText::new(cell.unit).size(11.).color(PALETTE_GREY),
                                    );
                                }
                            });
                        });
                        if i % 2 == 1 {
                            ui.end_row();
                        }
                    }
                });

            ui.add_space(16.);
            ui.label(RichText::new("GENERATED ON").size(9.).color(PALETTE_GRAPHITE));
            ui.label(
                RichText::new(format_card_date(card.generated_on))
                    .size(12.)
                    .color(PALETTE_GREY),
            );
        })
        .response
        .rect
}

/// Where a click released this pass landed, if it was a primary click.
fn primary_click(ctx: &egui::Context) -> Option<Pos2> {
    ctx.input(|is| {
        if is.pointer.primary_clicked() {
            is.pointer.interact_pos()
        } else {
            None
        }
    })
}

impl RecapApp {
    pub(crate) fn story_view(&mut self, ctx: &egui::Context, now: Instant) {
        let Some(slide) = self.engine.active_slide() else {
            return;
        };
        let content = SlideContent::for_active(&slide);
        let progress = self.engine.progress();
        let can_export = self.engine.can_export();

        let mut save_button = None;
        let mut save_requested = None;
        let panel = egui::CentralPanel::default()
            .frame(
                Frame::new()
                    .fill(slide_background(content.id))
                    .inner_margin(Margin::same(16)),
            )
            .show(ctx, |ui| {
                paint_progress(ui, &progress);
                ui.add_space(40.);

                ui.with_layout(Layout::top_down(Align::Center), |ui| {
                    let card_rect = slide_body(ui, &content);
                    if can_export && let Some(card_rect) = card_rect {
                        ui.add_space(24.);
                        let save = Button::new(
                            RichText::new("SAVE IMAGE")
                                .size(16.)
                                .strong()
                                .color(PALETTE_BLACK),
                        )
                        .fill(PALETTE_GREEN)
                        .corner_radius(CornerRadius::same(DEFAULT_BUTTON_CORNER_RADIUS))
                        .min_size(vec2(card_rect.width(), 40.));
                        let capturing = self.export_status == ExportStatus::Capturing;
                        let response = ui.add_enabled(!capturing, save);
                        save_button = Some(response.rect);
                        if response.clicked() {
                            save_requested = Some(card_rect);
                        }
                        self.export_status_label(ui);
                    }
                });
            });

        if let Some(card_rect) = save_requested {
            self.request_capture(ctx, card_rect);
            return;
        }

        let surface = panel.response.rect;
        let input = ctx.input(|is| {
            if is.key_pressed(Key::ArrowLeft) {
                Some(StoryInput::Prev)
            } else if is.key_pressed(Key::ArrowRight) || is.key_pressed(Key::Space) {
                Some(StoryInput::Next)
            } else {
                None
            }
        });
        let input = input.or_else(|| {
            primary_click(ctx)
                .filter(|pos| surface.contains(*pos))
                .filter(|pos| !save_button.is_some_and(|rect| rect.contains(*pos)))
                .map(|pos| StoryInput::Tap {
                    x: pos.x - surface.left(),
                    width: surface.width(),
                })
        });

        match input {
            Some(StoryInput::Prev) => self.engine.prev(now),
            Some(StoryInput::Next) => self.engine.next(now),
            Some(StoryInput::Tap { x, width }) => {
                self.engine.tap(x, width, now);
            }
            None => return,
        }
        ctx.request_repaint();
    }

    fn export_status_label(&self, ui: &mut Ui) {
        let (text, color) = match &self.export_status {
            ExportStatus::Idle => return,
            ExportStatus::Capturing => ("Saving...".to_string(), PALETTE_GREY),
            ExportStatus::Saved(path) => (format!("Saved to {}", path.display()), PALETTE_GREEN),
            ExportStatus::Failed(reason) => (format!("Could not save: {}", reason), PALETTE_RED),
        };
        ui.add_space(6.);
        ui.label(RichText::new(text).size(11.).color(color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Event, Modifiers, PointerButton, RawInput, pos2};
    use motorecap::{
        PlaybackState,
        config::AppConfig,
        stats::{Challans, RideStats},
    };

    fn ghost() -> RideStats {
        RideStats {
            user_name: "Ghost".to_string(),
            total_distance_km: 12_450,
            total_trips: 842,
            top_speed_kh: 145,
            challans: Challans::default(),
            accidents: 0,
            safety_score: 98,
        }
    }

    fn app_on_slide(index: usize, now: Instant) -> RecapApp {
        let mut app = RecapApp::with_config(AppConfig::default());
        app.engine.start(ghost(), now).unwrap();
        for _ in 0..index {
            app.engine.next(now);
        }
        app
    }

    fn run_frame(ctx: &egui::Context, app: &mut RecapApp, now: Instant, events: Vec<Event>) {
        let input = RawInput {
            screen_rect: Some(Rect::from_min_size(Pos2::ZERO, vec2(420., 760.))),
            events,
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| app.story_view(ctx, now));
    }

    fn button(pos: Pos2, pressed: bool) -> Event {
        Event::PointerButton {
            pos,
            button: PointerButton::Primary,
            pressed,
            modifiers: Modifiers::default(),
        }
    }

    fn tap(ctx: &egui::Context, app: &mut RecapApp, now: Instant, pos: Pos2) {
        run_frame(ctx, app, now, vec![Event::PointerMoved(pos), button(pos, true)]);
        run_frame(ctx, app, now, vec![button(pos, false)]);
        run_frame(ctx, app, now, vec![]);
    }

    fn key(key: Key) -> Event {
        Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers: Modifiers::default(),
        }
    }

    #[test]
    fn test_taps_on_slide_text_navigate() {
        let ctx = egui::Context::default();
        let now = Instant::now();
        let mut app = app_on_slide(2, now);
        run_frame(&ctx, &mut app, now, vec![]);

        // heading, figure and unit of the speed slide
        tap(&ctx, &mut app, now, pos2(210., 80.));
        assert_eq!(app.engine.state().current_index(), Some(3));
        tap(&ctx, &mut app, now, pos2(210., 160.));
        assert_eq!(app.engine.state().current_index(), Some(4));
        tap(&ctx, &mut app, now, pos2(60., 240.));
        assert_eq!(app.engine.state().current_index(), Some(3));
        // one third of the width is already forward
        tap(&ctx, &mut app, now, pos2(140., 500.));
        assert_eq!(app.engine.state().current_index(), Some(4));
    }

    #[test]
    fn test_tap_on_summary_card_finishes() {
        let ctx = egui::Context::default();
        let now = Instant::now();
        let mut app = app_on_slide(5, now);
        run_frame(&ctx, &mut app, now, vec![]);
        run_frame(&ctx, &mut app, now, vec![]);

        tap(&ctx, &mut app, now, pos2(330., 200.));
        assert_eq!(app.engine.state(), PlaybackState::Finished);
    }

    #[test]
    fn test_keys_move_one_slide_per_press() {
        let ctx = egui::Context::default();
        let now = Instant::now();
        let mut app = app_on_slide(4, now);
        run_frame(&ctx, &mut app, now, vec![]);

        run_frame(&ctx, &mut app, now, vec![key(Key::ArrowRight)]);
        run_frame(&ctx, &mut app, now, vec![]);
        assert_eq!(app.engine.state().current_index(), Some(5));

        run_frame(&ctx, &mut app, now, vec![key(Key::ArrowLeft)]);
        run_frame(&ctx, &mut app, now, vec![]);
        assert_eq!(app.engine.state().current_index(), Some(4));

        run_frame(&ctx, &mut app, now, vec![key(Key::Space)]);
        run_frame(&ctx, &mut app, now, vec![]);
        assert_eq!(app.engine.state().current_index(), Some(5));
    }

    #[test]
    fn test_taps_ignored_while_finished() {
        let ctx = egui::Context::default();
        let now = Instant::now();
        let mut app = app_on_slide(6, now);
        assert!(app.engine.state().is_finished());
        tap(&ctx, &mut app, now, pos2(330., 200.));
        assert!(app.engine.state().is_finished());
    }
}
