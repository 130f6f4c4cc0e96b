use std::path::PathBuf;

use egui::{ColorImage, Event, Rect, UserData, ViewportCommand};
use log::{error, info};
use motorecap::{
    RecapError,
    export::{CapturedRegion, PngExporter, SummaryExporter},
};

use super::{ExportStatus, RecapApp};

/// Converts egui's screenshot pixels into an exportable region.
pub(crate) fn captured_region(image: &ColorImage) -> Result<CapturedRegion, RecapError> {
    let [width, height] = image.size;
    let rgba = image
        .pixels
        .iter()
        .flat_map(|pixel| pixel.to_srgba_unmultiplied())
        .collect();
    CapturedRegion::new(width as u32, height as u32, rgba)
}

fn export_status(result: Result<PathBuf, RecapError>) -> ExportStatus {
    match result {
        Ok(path) => ExportStatus::Saved(path),
        Err(RecapError::ExportCancelled) => ExportStatus::Idle,
        Err(e) => {
            error!("Summary card export failed: {}", e);
            ExportStatus::Failed(e.to_string())
        }
    }
}

impl RecapApp {
    /// Asks the backend for a screenshot; the card is cropped out of it once it arrives.
    pub(crate) fn request_capture(&mut self, ctx: &egui::Context, card_rect: Rect) {
        info!("Capturing summary card");
        self.pending_capture = Some(card_rect);
        self.export_status = ExportStatus::Capturing;
        ctx.send_viewport_cmd(ViewportCommand::Screenshot(UserData::default()));
    }

    pub(crate) fn collect_capture(&mut self, ctx: &egui::Context) {
        let Some(card_rect) = self.pending_capture else {
            return;
        };
        let screenshot = ctx.input(|is| {
            is.raw.events.iter().find_map(|event| match event {
                Event::Screenshot { image, .. } => Some(image.clone()),
                _ => None,
            })
        });
        let Some(screenshot) = screenshot else {
            return;
        };
        self.pending_capture = None;

        let card = screenshot.region(&card_rect, Some(ctx.pixels_per_point()));
        match captured_region(&card).and_then(|region| Ok((self.exporter()?, region))) {
            Ok((exporter, region)) => self.save_card(&exporter, &region),
            Err(e) => self.export_status = export_status(Err(e)),
        }
    }

    /// Writes the captured card and records the outcome. Only the export status changes, the
    /// rider stays on the summary slide and can retry.
    pub(crate) fn save_card(&mut self, exporter: &impl SummaryExporter, region: &CapturedRegion) {
        self.export_status = export_status(exporter.export(region));
    }

    fn exporter(&self) -> Result<PngExporter, RecapError> {
        let file_name = self.app_config.export_file_name.clone();
        if self.app_config.ask_export_location {
            let mut dialog = rfd::FileDialog::new()
                .set_file_name(file_name.as_str())
                .add_filter("PNG image", &["png"]);
            if let Some(dir) = &self.app_config.export_dir {
                dialog = dialog.set_directory(dir);
            }
            let path = dialog.save_file().ok_or(RecapError::ExportCancelled)?;
            let dir = path
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_default();
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(file_name);
            return Ok(PngExporter::new(dir, name));
        }

        Ok(match &self.app_config.export_dir {
            Some(dir) => PngExporter::new(dir.clone(), file_name),
            None => PngExporter::in_default_dir(file_name),
        })
    }
}
