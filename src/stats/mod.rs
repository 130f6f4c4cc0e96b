// Rider statistics and the lenient coercion of raw form fields into them

pub mod rank;

use std::collections::HashMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::RecapError;

pub use rank::RiderRank;

pub const FIELD_USER_NAME: &str = "userName";
pub const FIELD_TOTAL_DISTANCE_KM: &str = "totalDistanceKm";
pub const FIELD_TOTAL_TRIPS: &str = "totalTrips";
pub const FIELD_TOP_SPEED_KH: &str = "topSpeedKh";
pub const FIELD_CHALLAN_COUNT: &str = "challanCount";
pub const FIELD_CHALLAN_FINE: &str = "challanFine";
pub const FIELD_ACCIDENTS: &str = "accidents";
pub const FIELD_SAFETY_SCORE: &str = "safetyScore";

/// Safety score reported for riders with no accidents.
pub const ACCIDENT_FREE_SAFETY_SCORE: u8 = 98;
const SAFETY_PENALTY_PER_ACCIDENT: u64 = 20;
const MAX_SAFETY_SCORE: u64 = 100;

/// Violation reasons attached to every submission. The form never asks for them, they are kept
/// so the record shape stays stable until real reasons can be collected.
pub const PLACEHOLDER_CHALLAN_REASONS: [&str; 3] =
    ["Speeding", "Signal Jump", "Visible number plate missing?"];

/// Traffic violations (challans) issued to the rider during the year.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Challans {
    pub count: u64,
    pub total_fine: u64,
    pub reasons: Vec<String>,
}

/// The yearly statistics of one rider. Built once by [`submit`] and never changed afterwards.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RideStats {
    pub user_name: String,
    pub total_distance_km: u64,
    pub total_trips: u64,
    pub top_speed_kh: u64,
    pub challans: Challans,
    pub accidents: u64,
    /// Always within `0..=100`
    pub safety_score: u8,
}

impl RideStats {
    pub fn rank(&self) -> RiderRank {
        RiderRank::for_stats(self)
    }

    pub fn is_accident_free(&self) -> bool {
        self.accidents == 0
    }
}

/// Safety score derived from the number of accidents: 98 when accident free, otherwise 100
/// minus 20 points per accident, never below 0.
pub fn derive_safety_score(accidents: u64) -> u8 {
    if accidents == 0 {
        return ACCIDENT_FREE_SAFETY_SCORE;
    }
    let penalty = accidents.saturating_mul(SAFETY_PENALTY_PER_ACCIDENT);
    MAX_SAFETY_SCORE.saturating_sub(penalty) as u8
}

/// Parses a non-negative whole number the way a browser form would: surrounding whitespace is
/// ignored and a fractional part is truncated. Anything else is `None`.
pub fn parse_count(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(value) = raw.parse::<u64>() {
        return Some(value);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0. && value < u64::MAX as f64 => {
            Some(value.trunc() as u64)
        }
        _ => None,
    }
}

/// Optional numeric fields fall back to 0 when missing or not a number.
fn lenient_count(fields: &HashMap<String, String>, field: &str) -> u64 {
    match fields.get(field) {
        Some(raw) => parse_count(raw).unwrap_or_else(|| {
            if !raw.trim().is_empty() {
                debug!("Field {} has non numeric value {:?}, using 0", field, raw);
            }
            0
        }),
        None => 0,
    }
}

/// Turns the raw string fields of the rider form into a [`RideStats`].
///
/// `userName` must be non-blank and `totalDistanceKm` must hold a non-negative number, otherwise
/// the submission is rejected as a whole. Every other numeric field is lenient and becomes 0 when
/// it is missing or cannot be parsed. The safety score is taken from `safetyScore` when that field
/// holds a number (clamped to 100), and derived from the accident count otherwise.
pub fn submit(fields: &HashMap<String, String>) -> Result<RideStats, RecapError> {
    let user_name = fields
        .get(FIELD_USER_NAME)
        .map(|name| name.trim())
        .unwrap_or_default();
    if user_name.is_empty() {
        warn!("Rejecting rider submission without a name");
        return Err(RecapError::InvalidRiderInput {
            field: FIELD_USER_NAME.to_string(),
            reason: "a rider name is required".to_string(),
        });
    }

    let total_distance_km = fields
        .get(FIELD_TOTAL_DISTANCE_KM)
        .and_then(|raw| parse_count(raw))
        .ok_or_else(|| {
            warn!("Rejecting rider submission without a usable distance");
            RecapError::InvalidRiderInput {
                field: FIELD_TOTAL_DISTANCE_KM.to_string(),
                reason: "total distance must be a non-negative number".to_string(),
            }
        })?;

    let accidents = lenient_count(fields, FIELD_ACCIDENTS);
    let safety_score = match fields.get(FIELD_SAFETY_SCORE).and_then(|raw| parse_count(raw)) {
        Some(score) => score.min(MAX_SAFETY_SCORE) as u8,
        None => derive_safety_score(accidents),
    };

    let stats = RideStats {
        user_name: user_name.to_string(),
        total_distance_km,
        total_trips: lenient_count(fields, FIELD_TOTAL_TRIPS),
        top_speed_kh: lenient_count(fields, FIELD_TOP_SPEED_KH),
        challans: Challans {
            count: lenient_count(fields, FIELD_CHALLAN_COUNT),
            total_fine: lenient_count(fields, FIELD_CHALLAN_FINE),
            reasons: PLACEHOLDER_CHALLAN_REASONS
                .iter()
                .map(|reason| reason.to_string())
                .collect(),
        },
        accidents,
        safety_score,
    };
    debug!("Accepted rider submission: {:?}", stats);
    Ok(stats)
}
