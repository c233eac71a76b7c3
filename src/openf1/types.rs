//! Entity types for openF1 records.
//!
//! Each upstream response is parsed into these fixed shapes immediately on
//! receipt; unknown upstream fields are ignored, missing expected fields fail
//! the whole response as malformed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One discrete event within a race weekend (practice, qualifying, or race).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub meeting_key: i64,
    pub session_key: i64,
    pub location: String,
    pub date_start: String,
    pub date_end: String,
    pub session_type: String,
    pub session_name: String,
    pub country_key: i64,
    pub country_code: String,
    pub country_name: String,
    pub circuit_key: i64,
    pub circuit_short_name: String,
    pub gmt_offset: String,
    pub year: i32,
}

impl Session {
    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.date_start)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn ends_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.date_end)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

impl std::fmt::Display for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {} ({}) - {}",
            self.session_name, self.location, self.session_type, self.date_start
        )
    }
}

/// A driver entry, scoped to one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub meeting_key: i64,
    pub session_key: i64,
    pub driver_number: u32,
    pub broadcast_name: String,
    pub full_name: String,
    pub name_acronym: String,
    pub team_name: String,
    pub team_colour: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub headshot_url: Option<String>,
    pub country_code: Option<String>,
}

impl Driver {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Team colour as a hex color code, when the upstream provides one.
    pub fn team_colour_hex(&self) -> Option<String> {
        self.team_colour.as_ref().map(|c| format!("#{}", c))
    }
}

impl std::fmt::Display for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {} ({}) - {}",
            self.driver_number, self.full_name, self.name_acronym, self.team_name
        )
    }
}

/// One lap by one driver within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lap {
    pub meeting_key: i64,
    pub session_key: i64,
    pub driver_number: u32,
    pub lap_number: u32,
    pub date_start: Option<String>,
    pub duration_sector_1: Option<f64>,
    pub duration_sector_2: Option<f64>,
    pub duration_sector_3: Option<f64>,
    pub i1_speed: Option<u32>,
    pub i2_speed: Option<u32>,
    pub is_pit_out_lap: bool,
    pub lap_duration: Option<f64>,
    #[serde(default)]
    pub segments_sector_1: Vec<Option<u32>>,
    #[serde(default)]
    pub segments_sector_2: Vec<Option<u32>>,
    #[serde(default)]
    pub segments_sector_3: Vec<Option<u32>>,
    pub st_speed: Option<u32>,
}

impl Lap {
    pub fn sector_times(&self) -> (Option<f64>, Option<f64>, Option<f64>) {
        (
            self.duration_sector_1,
            self.duration_sector_2,
            self.duration_sector_3,
        )
    }

    /// Whether all three sector times were recorded.
    pub fn is_complete(&self) -> bool {
        self.duration_sector_1.is_some()
            && self.duration_sector_2.is_some()
            && self.duration_sector_3.is_some()
    }
}

impl std::fmt::Display for Lap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.lap_duration {
            Some(duration) => write!(
                f,
                "Lap #{} - Driver #{} - {:.3}s",
                self.lap_number, self.driver_number, duration
            ),
            None => write!(
                f,
                "Lap #{} - Driver #{} - N/A",
                self.lap_number, self.driver_number
            ),
        }
    }
}

/// Session type filter values accepted by the sessions lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionType {
    Practice,
    Qualifying,
    Race,
}

impl SessionType {
    pub const ALL: [SessionType; 3] = [
        SessionType::Practice,
        SessionType::Qualifying,
        SessionType::Race,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Practice => "Practice",
            SessionType::Qualifying => "Qualifying",
            SessionType::Race => "Race",
        }
    }
}

impl std::str::FromStr for SessionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "practice" => Ok(SessionType::Practice),
            "qualifying" => Ok(SessionType::Qualifying),
            "race" => Ok(SessionType::Race),
            other => Err(format!(
                "unknown session type '{}', expected one of: Practice, Qualifying, Race",
                other
            )),
        }
    }
}

/// Filters for the sessions endpoint. Omitted fields never narrow results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionFilters {
    pub year: Option<i32>,
    pub country_name: Option<String>,
    pub session_type: Option<SessionType>,
    pub session_name: Option<String>,
}

impl SessionFilters {
    /// Whether a session satisfies every supplied filter. Country and
    /// session name match case-insensitively; the upstream match is exact,
    /// so results are re-filtered locally with this predicate.
    pub fn matches(&self, session: &Session) -> bool {
        if let Some(year) = self.year {
            if session.year != year {
                return false;
            }
        }
        if let Some(country) = &self.country_name {
            if !session.country_name.eq_ignore_ascii_case(country) {
                return false;
            }
        }
        if let Some(session_type) = self.session_type {
            if session.session_type != session_type.as_str() {
                return false;
            }
        }
        if let Some(name) = &self.session_name {
            if !session.session_name.eq_ignore_ascii_case(name) {
                return false;
            }
        }
        true
    }
}

/// Whether a lap satisfies the supplied driver and lap-number filters.
pub fn lap_matches(lap: &Lap, driver_number: Option<u32>, lap_number: Option<u32>) -> bool {
    if let Some(driver) = driver_number {
        if lap.driver_number != driver {
            return false;
        }
    }
    if let Some(number) = lap_number {
        if lap.lap_number != number {
            return false;
        }
    }
    true
}
