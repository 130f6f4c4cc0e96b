mod card_capture;
mod finished_view;
mod input_form;
mod story_view;

use std::{path::PathBuf, time::Instant};

use egui::{Color32, Visuals, style::Widgets};
use log::error;
use motorecap::{
    PlaybackEngine, PlaybackState, SlideId, config::AppConfig, playback::next_poll,
};

use input_form::RiderForm;

pub(crate) const PALETTE_BLACK: Color32 = Color32::from_rgb(0, 0, 0);
pub(crate) const PALETTE_CHARCOAL: Color32 = Color32::from_rgb(17, 17, 17);
pub(crate) const PALETTE_CARD: Color32 = Color32::from_rgb(25, 25, 25);
pub(crate) const PALETTE_GRAPHITE: Color32 = Color32::from_rgb(51, 51, 51);
pub(crate) const PALETTE_GREY: Color32 = Color32::from_rgb(102, 102, 102);
pub(crate) const PALETTE_GREEN: Color32 = Color32::from_rgb(0, 255, 157);
pub(crate) const PALETTE_RED: Color32 = Color32::from_rgb(255, 51, 51);

const DEFAULT_BUTTON_CORNER_RADIUS: u8 = 6;

pub(crate) fn rgb(color: [u8; 3]) -> Color32 {
    Color32::from_rgb(color[0], color[1], color[2])
}

pub(crate) fn slide_background(slide: SlideId) -> Color32 {
    match slide {
        SlideId::Intro => Color32::from_rgb(26, 26, 26),
        SlideId::Distance => Color32::from_rgb(0, 26, 26),
        SlideId::Speed => Color32::from_rgb(45, 0, 54),
        SlideId::Challan => Color32::from_rgb(26, 0, 0),
        SlideId::Safety => PALETTE_BLACK,
        SlideId::Summary => PALETTE_CHARCOAL,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ExportStatus {
    Idle,
    Capturing,
    Saved(PathBuf),
    Failed(String),
}

/// `RecapApp` is the desktop window: the rider form, the story slides and the end screen.
///
/// The egui frame loop doubles as the playback clock: every frame ticks the engine and asks for
/// another repaint one tick period later while a slide is playing.
pub struct RecapApp {
    engine: PlaybackEngine,
    form: RiderForm,
    form_error: Option<String>,
    app_config: AppConfig,
    export_status: ExportStatus,
    pending_capture: Option<egui::Rect>,
}

impl RecapApp {
    pub fn new(app_config: AppConfig, cc: &eframe::CreationContext<'_>) -> Self {
        let default_visuals = Visuals {
            dark_mode: true,
            hyperlink_color: PALETTE_GREEN,
            faint_bg_color: PALETTE_CHARCOAL,
            extreme_bg_color: PALETTE_CARD,
            panel_fill: PALETTE_BLACK,
            button_frame: true,
            window_fill: PALETTE_CHARCOAL,
            widgets: Widgets::dark(),
            striped: false,
            ..Default::default()
        };
        cc.egui_ctx.set_visuals(default_visuals);

        Self::with_config(app_config)
    }

    pub(crate) fn with_config(app_config: AppConfig) -> Self {
        Self {
            engine: PlaybackEngine::default(),
            form: RiderForm::default(),
            form_error: None,
            app_config,
            export_status: ExportStatus::Idle,
            pending_capture: None,
        }
    }
}

impl eframe::App for RecapApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(e) = self.app_config.save() {
            error!("Error while saving config file: {}", e);
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.engine.tick(now);

        if let Some(outer_rect) = ctx.input(|is| is.viewport().outer_rect) {
            self.app_config.window_position = outer_rect.min.into();
        }
        self.collect_capture(ctx);

        match self.engine.state() {
            PlaybackState::Idle => self.input_form_view(ctx, now),
            PlaybackState::Playing { .. } => self.story_view(ctx, now),
            PlaybackState::Finished => self.finished_view(ctx, now),
        }

        if self.engine.state().is_playing() || self.pending_capture.is_some() {
            let wait = next_poll(&self.engine, self.app_config.tick_period(), now);
            ctx.request_repaint_after(wait);
        }
    }
}
