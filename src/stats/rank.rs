use serde::{Deserialize, Serialize};

use super::RideStats;

const APEX_MIN_DISTANCE_KM: u64 = 10_000;
const APEX_MIN_TOP_SPEED_KH: u64 = 150;
const VETERAN_MIN_DISTANCE_KM: u64 = 5_000;
const WARRIOR_MIN_DISTANCE_KM: u64 = 2_000;

/// Badge printed on the summary card. All thresholds are exclusive.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RiderRank {
    ApexPredator,
    TarmacVeteran,
    WeekendWarrior,
    RookieRider,
}

impl RiderRank {
    pub fn for_stats(stats: &RideStats) -> Self {
        Self::from_figures(stats.total_distance_km, stats.top_speed_kh)
    }

    pub fn from_figures(distance_km: u64, top_speed_kh: u64) -> Self {
        if distance_km > APEX_MIN_DISTANCE_KM && top_speed_kh > APEX_MIN_TOP_SPEED_KH {
            RiderRank::ApexPredator
        } else if distance_km > VETERAN_MIN_DISTANCE_KM {
            RiderRank::TarmacVeteran
        } else if distance_km > WARRIOR_MIN_DISTANCE_KM {
            RiderRank::WeekendWarrior
        } else {
            RiderRank::RookieRider
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            RiderRank::ApexPredator => "APEX PREDATOR",
            RiderRank::TarmacVeteran => "TARMAC VETERAN",
            RiderRank::WeekendWarrior => "WEEKEND WARRIOR",
            RiderRank::RookieRider => "ROOKIE RIDER",
        }
    }

    /// Accent colour as RGB
    pub fn accent_rgb(&self) -> [u8; 3] {
        match self {
            RiderRank::ApexPredator => [0xbd, 0x00, 0xff],
            RiderRank::TarmacVeteran => [0x00, 0xff, 0x9d],
            RiderRank::WeekendWarrior => [0xff, 0x9d, 0x00],
            RiderRank::RookieRider => [0xaa, 0xaa, 0xaa],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_thresholds() {
        assert_eq!(RiderRank::from_figures(12_450, 151), RiderRank::ApexPredator);
        // apex needs both figures
        assert_eq!(RiderRank::from_figures(12_450, 150), RiderRank::TarmacVeteran);
        assert_eq!(RiderRank::from_figures(10_000, 200), RiderRank::TarmacVeteran);
        assert_eq!(RiderRank::from_figures(5_001, 0), RiderRank::TarmacVeteran);
        assert_eq!(RiderRank::from_figures(5_000, 0), RiderRank::WeekendWarrior);
        assert_eq!(RiderRank::from_figures(2_001, 0), RiderRank::WeekendWarrior);
        assert_eq!(RiderRank::from_figures(2_000, 300), RiderRank::RookieRider);
        assert_eq!(RiderRank::from_figures(0, 0), RiderRank::RookieRider);
    }

    #[test]
    fn test_titles_and_colours() {
        assert_eq!(RiderRank::ApexPredator.title(), "APEX PREDATOR");
        assert_eq!(RiderRank::RookieRider.title(), "ROOKIE RIDER");
        assert_eq!(RiderRank::TarmacVeteran.accent_rgb(), [0, 255, 157]);
    }
}
