mod ui;

use std::collections::HashMap;

use clap::{Parser, Subcommand};
use log::{info, warn};
use motorecap::{
    PlaybackEngine, RecapError,
    config::AppConfig,
    playback::{ActiveSlide, PlaybackObserver, autoplay},
    slides::SlideContent,
    stats::{
        self, FIELD_ACCIDENTS, FIELD_CHALLAN_COUNT, FIELD_CHALLAN_FINE, FIELD_TOP_SPEED_KH,
        FIELD_TOTAL_DISTANCE_KM, FIELD_TOTAL_TRIPS, FIELD_USER_NAME,
    },
};
use ui::RecapApp;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the recap window
    Ui {
        #[arg(long)]
        tick_ms: Option<u64>,
    },
    /// Play a recap in the terminal
    Play {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        distance: String,

        #[arg(long, default_value = "0")]
        trips: String,

        #[arg(long, default_value = "0")]
        top_speed: String,

        #[arg(long, default_value = "0")]
        challans: String,

        #[arg(long, default_value = "0")]
        fine: String,

        #[arg(long, default_value = "0")]
        accidents: String,

        #[arg(long)]
        tick_ms: Option<u64>,

        /// Print the submitted stats as JSON before playing
        #[arg(long)]
        json: bool,
    },
}

fn load_config(tick_ms: Option<u64>) -> AppConfig {
    let mut app_config = match AppConfig::from_local_file() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            warn!("Could not load config file, using defaults: {}", e);
            AppConfig::default()
        }
    };
    if let Some(tick_ms) = tick_ms {
        app_config.tick_period_ms = tick_ms;
    }
    app_config
}

/// Prints every slide to stdout as it comes up.
struct SlidePrinter {
    slide_count: usize,
}

impl PlaybackObserver for SlidePrinter {
    fn slide_entered(&mut self, slide: &ActiveSlide<'_>) {
        // counters are shown at their final value
        let content = SlideContent::build(slide.id(), slide.stats, slide.spec.duration);
        println!("[{}/{}] {}", slide.index + 1, self.slide_count, content);
    }

    fn finished(&mut self) {
        println!("RIDE COMPLETE");
    }
}

fn run_ui(app_config: AppConfig) -> Result<(), eframe::Error> {
    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = native_options
        .viewport
        .with_inner_size(app_config.window_size)
        .with_position(app_config.window_position)
        .with_title("MotoRecap");

    eframe::run_native(
        "MotoRecap",
        native_options,
        Box::new(|cc| Ok(Box::new(RecapApp::new(app_config, cc)))),
    )
}

fn play(
    fields: HashMap<String, String>,
    app_config: &AppConfig,
    json: bool,
) -> Result<(), RecapError> {
    let ride_stats = stats::submit(&fields)?;
    if json {
        let serialized = serde_json::to_string_pretty(&ride_stats)
            .map_err(|e| RecapError::StatsSerializeError { source: e })?;
        println!("{}", serialized);
    }

    let mut engine = PlaybackEngine::default();
    engine.start(ride_stats, std::time::Instant::now())?;
    let mut printer = SlidePrinter {
        slide_count: engine.deck().len(),
    };
    let shown = autoplay(&mut engine, app_config.tick_period(), &mut printer);
    info!("Played {} slides", shown);
    Ok(())
}

fn main() {
    #[cfg(debug_assertions)]
    colog::init();

    let cli = Args::parse();
    ctrlc::set_handler(move || {
        println!("Exiting...");
        std::process::exit(0);
    })
    .expect("Could not set Ctrl-C handler");

    match cli.command {
        None => {
            run_ui(load_config(None)).expect("could not start app");
        }
        Some(Commands::Ui { tick_ms }) => {
            run_ui(load_config(tick_ms)).expect("could not start app");
        }
        Some(Commands::Play {
            name,
            distance,
            trips,
            top_speed,
            challans,
            fine,
            accidents,
            tick_ms,
            json,
        }) => {
            let fields = [
                (FIELD_USER_NAME, name),
                (FIELD_TOTAL_DISTANCE_KM, distance),
                (FIELD_TOTAL_TRIPS, trips),
                (FIELD_TOP_SPEED_KH, top_speed),
                (FIELD_CHALLAN_COUNT, challans),
                (FIELD_CHALLAN_FINE, fine),
                (FIELD_ACCIDENTS, accidents),
            ]
            .into_iter()
            .map(|(field, value)| (field.to_string(), value))
            .collect();

            if let Err(e) = play(fields, &load_config(tick_ms), json) {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
    };
}
