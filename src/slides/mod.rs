// Copy and figures shown on each story slide, derived from the rider's stats

use std::{fmt, time::Duration};

use itertools::Itertools;
use time::{Date, OffsetDateTime};

use crate::{
    playback::{ActiveSlide, SlideId},
    stats::{RideStats, RiderRank},
};

pub const RECAP_YEAR: u32 = 2024;

const COUNTER_STEP_MS: u128 = 50;
const COUNTER_STEPS: u64 = 40;
const HIGH_SPEED_KH: u64 = 100;

/// Accent colour family of a slide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Green,
    Purple,
    Red,
    Blue,
    Neutral,
}

impl Tone {
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            Tone::Green => [0x00, 0xff, 0x9d],
            Tone::Purple => [0xbd, 0x00, 0xff],
            Tone::Red => [0xff, 0x33, 0x33],
            Tone::Blue => [0x00, 0xbf, 0xff],
            Tone::Neutral => [0xff, 0xff, 0xff],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardCell {
    pub label: &'static str,
    pub value: String,
    pub unit: &'static str,
    pub tone: Tone,
}

/// The shareable card at the end of the recap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryCard {
    pub header: String,
    pub user_name: String,
    pub rank: RiderRank,
    pub cells: Vec<CardCell>,
    pub generated_on: Date,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlideContent {
    pub id: SlideId,
    pub heading: String,
    pub figure: Option<String>,
    pub unit: Option<&'static str>,
    pub lines: Vec<String>,
    pub tone: Tone,
    pub card: Option<SummaryCard>,
}

impl SlideContent {
    /// Builds the content of slide `id` for `stats`, `elapsed` into the slide (drives the
    /// count-up figures).
    pub fn build(id: SlideId, stats: &RideStats, elapsed: Duration) -> Self {
        let base = SlideContent {
            id,
            heading: String::new(),
            figure: None,
            unit: None,
            lines: Vec::new(),
            tone: Tone::Green,
            card: None,
        };

        match id {
            SlideId::Intro => SlideContent {
                heading: format!("RIDE REWIND {}", RECAP_YEAR),
                lines: vec![format!("Hey, {}.", stats.user_name)],
                ..base
            },
            SlideId::Distance => SlideContent {
                heading: "Total Distance".to_string(),
                figure: Some(group_thousands(count_up(stats.total_distance_km, elapsed))),
                unit: Some("KILOMETERS"),
                ..base
            },
            SlideId::Speed => SlideContent {
                heading: "Top Speed".to_string(),
                figure: Some(stats.top_speed_kh.to_string()),
                unit: Some("KM/H"),
                lines: vec![speed_tagline(stats.top_speed_kh).to_string()],
                tone: Tone::Purple,
                ..base
            },
            SlideId::Challan => SlideContent {
                heading: "Law Breaker?".to_string(),
                figure: Some(stats.challans.count.to_string()),
                unit: Some("VIOLATIONS"),
                lines: vec![
                    format!("Paid ₹{} in fines.", stats.challans.total_fine),
                    "(That's a lot of petrol money gone.)".to_string(),
                ],
                tone: Tone::Red,
                ..base
            },
            SlideId::Safety => {
                let (heading, lines, tone) = if stats.is_accident_free() {
                    (
                        "Unstoppable.",
                        vec!["Zero Accidents.".to_string()],
                        Tone::Blue,
                    )
                } else {
                    (
                        "Ouch.",
                        vec![
                            format!("{} Accident(s)", stats.accidents),
                            "Heal up. Ride safer.".to_string(),
                        ],
                        Tone::Red,
                    )
                };
                SlideContent {
                    heading: heading.to_string(),
                    figure: Some(stats.safety_score.to_string()),
                    unit: Some("SAFETY SCORE"),
                    lines,
                    tone,
                    ..base
                }
            }
            SlideId::Summary => {
                let card = SummaryCard::for_stats(stats);
                SlideContent {
                    heading: card.header.clone(),
                    tone: Tone::Neutral,
                    card: Some(card),
                    ..base
                }
            }
        }
    }

    pub fn for_active(slide: &ActiveSlide<'_>) -> Self {
        Self::build(slide.id(), slide.stats, slide.elapsed)
    }
}

/// Today's date in the local time zone, UTC when the local offset cannot be determined.
pub fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

/// Formats `date` as `dd/mm/yyyy`.
pub fn format_card_date(date: Date) -> String {
    format!(
        "{:02}/{:02}/{}",
        date.day(),
        u8::from(date.month()),
        date.year()
    )
}

impl SummaryCard {
    pub fn for_stats(stats: &RideStats) -> Self {
        Self::for_stats_on(stats, today())
    }

    pub fn for_stats_on(stats: &RideStats, generated_on: Date) -> Self {
        let rank = stats.rank();
        let rating_tone = match rank {
            RiderRank::ApexPredator => Tone::Purple,
            _ => Tone::Green,
        };
        SummaryCard {
            header: format!("RIDER IDENTITY // {}", RECAP_YEAR),
            user_name: stats.user_name.clone(),
            rank,
            generated_on,
            cells: vec![
                CardCell {
                    label: "DISTANCE COVERED",
                    value: group_thousands(stats.total_distance_km),
                    unit: "KM",
                    tone: Tone::Neutral,
                },
                CardCell {
                    label: "TOP VELOCITY",
                    value: stats.top_speed_kh.to_string(),
                    unit: "KM/H",
                    tone: Tone::Neutral,
                },
                CardCell {
                    label: "TOTAL SORTIES",
                    value: stats.total_trips.to_string(),
                    unit: "",
                    tone: Tone::Neutral,
                },
                CardCell {
                    label: "SAFETY RATING",
                    value: format!("{}/100", stats.safety_score),
                    unit: "",
                    tone: rating_tone,
                },
            ],
        }
    }
}

impl fmt::Display for SlideContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.heading)?;
        if let Some(figure) = &self.figure {
            match self.unit {
                Some(unit) => writeln!(f, "  {} {}", figure, unit)?,
                None => writeln!(f, "  {}", figure)?,
            }
        }
        for line in &self.lines {
            writeln!(f, "  {}", line)?;
        }
        if let Some(card) = &self.card {
            writeln!(f, "  {} [{}]", card.user_name, card.rank.title())?;
            let cells = card
                .cells
                .iter()
                .map(|cell| format!("{}: {}{}", cell.label, cell.value, cell.unit))
                .join(" | ");
            writeln!(f, "  {}", cells)?;
            writeln!(f, "  GENERATED ON {}", format_card_date(card.generated_on))?;
        }
        Ok(())
    }
}

pub fn speed_tagline(top_speed_kh: u64) -> &'static str {
    if top_speed_kh > HIGH_SPEED_KH {
        "FLYING LOW?"
    } else {
        "CRUISING ALTITUDE"
    }
}

/// Value shown by a counting-up figure `elapsed` after it appeared: it grows by a fortieth of
/// the target (rounded up) every 50 ms and stops at the target.
pub fn count_up(target: u64, elapsed: Duration) -> u64 {
    if target == 0 {
        return 0;
    }
    let step = target.div_ceil(COUNTER_STEPS);
    let steps_taken = (elapsed.as_millis() / COUNTER_STEP_MS).min(u64::MAX as u128) as u64;
    steps_taken.saturating_mul(step).min(target)
}

/// Formats `value` with a comma between each group of three digits.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let bytes = digits.as_bytes();
    let first = bytes.len() % 3;
    let mut groups = Vec::new();
    if first > 0 {
        groups.push(&digits[..first]);
    }
    groups.extend(
        (first..bytes.len())
            .step_by(3)
            .map(|start| &digits[start..start + 3]),
    );
    groups.join(",")
}
