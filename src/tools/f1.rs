//! The three F1 data-retrieval tools.
//!
//! Each tool is a thin adapter over [`F1Data`]: parse the model's arguments,
//! issue one fetch, and render the records as a count-prefixed JSON summary
//! the model can reason over. Result rows are projected down to the fields
//! a question can actually turn on; full records would mostly waste context.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::openf1::{F1Data, SessionFilters, SessionType};

use super::{Tool, ToolRegistry};

/// Build the registry holding the three F1 tools.
pub fn f1_registry(data: Arc<dyn F1Data>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(GetSessions { data: data.clone() }));
    registry.register(Box::new(GetDrivers { data: data.clone() }));
    registry.register(Box::new(GetLaps { data }));
    registry
}

/// Look up sessions by year, type, name, or country.
pub struct GetSessions {
    pub data: Arc<dyn F1Data>,
}

#[async_trait]
impl Tool for GetSessions {
    fn name(&self) -> &str {
        "get_sessions"
    }

    fn description(&self) -> &str {
        "Get F1 sessions for a specific year, session type, session name, or country. Use this to find session keys for specific races or events."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "year": {
                    "type": "integer",
                    "description": "The year to fetch sessions for (e.g., 2024, 2025)"
                },
                "session_type": {
                    "type": "string",
                    "enum": ["Practice", "Qualifying", "Race"],
                    "description": "Type of session. Note that Sprint sessions fall under the Race type."
                },
                "session_name": {
                    "type": "string",
                    "description": "Name of session (e.g., 'Race', 'Qualifying', 'Practice 1', 'Sprint', 'Sprint Qualifying')"
                },
                "country_name": {
                    "type": "string",
                    "description": "Country name for the race (e.g., 'Bahrain', 'Saudi Arabia', 'Australia')"
                }
            },
            "required": []
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let session_type = match optional_str(&args, "session_type")? {
            Some(raw) => Some(SessionType::from_str(&raw).map_err(|e| anyhow::anyhow!(e))?),
            None => None,
        };

        let filters = SessionFilters {
            year: optional_int(&args, "year")?.map(|y| y as i32),
            country_name: optional_str(&args, "country_name")?,
            session_type,
            session_name: optional_str(&args, "session_name")?,
        };

        let sessions = self.data.sessions(&filters).await?;

        let rows: Vec<Value> = sessions
            .iter()
            .map(|s| {
                json!({
                    "session_key": s.session_key,
                    "session_name": s.session_name,
                    "location": s.location,
                    "country_name": s.country_name,
                    "session_type": s.session_type,
                    "date_start": s.date_start,
                })
            })
            .collect();

        Ok(format!(
            "Found {} sessions: {}",
            rows.len(),
            serde_json::to_string_pretty(&rows)?
        ))
    }
}

/// List the drivers of one session, for mapping names to car numbers.
pub struct GetDrivers {
    pub data: Arc<dyn F1Data>,
}

#[async_trait]
impl Tool for GetDrivers {
    fn name(&self) -> &str {
        "get_drivers"
    }

    fn description(&self) -> &str {
        "Get F1 drivers for a specific session. Use this to find driver numbers and names for a particular race or session."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "session_key": {
                    "type": "string",
                    "description": "The session key from get_sessions. Use 'latest' for the most recent session."
                }
            },
            "required": ["session_key"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let session_key = session_key_arg(&args)?;
        let drivers = self.data.drivers(&session_key).await?;

        let rows: Vec<Value> = drivers
            .iter()
            .map(|d| {
                json!({
                    "driver_number": d.driver_number,
                    "full_name": d.full_name,
                    "name_acronym": d.name_acronym,
                    "team_name": d.team_name,
                    "first_name": d.first_name,
                    "last_name": d.last_name,
                })
            })
            .collect();

        Ok(format!(
            "Found {} drivers: {}",
            rows.len(),
            serde_json::to_string_pretty(&rows)?
        ))
    }
}

/// Fetch lap data for a session, optionally narrowed to a driver and lap.
pub struct GetLaps {
    pub data: Arc<dyn F1Data>,
}

#[async_trait]
impl Tool for GetLaps {
    fn name(&self) -> &str {
        "get_laps"
    }

    fn description(&self) -> &str {
        "Get F1 lap data for a specific session and optionally a specific driver or lap number. Use this to get lap times, sector times, and other lap data."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "session_key": {
                    "type": "string",
                    "description": "The session key from get_sessions. Use 'latest' for the most recent session."
                },
                "driver_number": {
                    "type": "integer",
                    "description": "Optional driver number to filter laps for a specific driver. Get this from get_drivers."
                },
                "lap_number": {
                    "type": "integer",
                    "description": "Optional lap number to fetch a single lap."
                }
            },
            "required": ["session_key"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let session_key = session_key_arg(&args)?;
        let driver_number = optional_int(&args, "driver_number")?.map(|n| n as u32);
        let lap_number = optional_int(&args, "lap_number")?.map(|n| n as u32);

        let laps = self
            .data
            .laps(&session_key, driver_number, lap_number)
            .await?;

        let rows: Vec<Value> = laps
            .iter()
            .map(|lap| {
                json!({
                    "lap_number": lap.lap_number,
                    "driver_number": lap.driver_number,
                    "lap_duration": lap.lap_duration,
                    "duration_sector_1": lap.duration_sector_1,
                    "duration_sector_2": lap.duration_sector_2,
                    "duration_sector_3": lap.duration_sector_3,
                    "is_pit_out_lap": lap.is_pit_out_lap,
                })
            })
            .collect();

        Ok(format!(
            "Found {} laps: {}",
            rows.len(),
            serde_json::to_string_pretty(&rows)?
        ))
    }
}

/// Required session key; models send it as a string or a bare number.
fn session_key_arg(args: &Value) -> anyhow::Result<String> {
    match &args["session_key"] {
        Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Err(anyhow::anyhow!("Missing 'session_key' argument")),
        other => Err(anyhow::anyhow!(
            "Invalid 'session_key' argument: {}",
            other
        )),
    }
}

fn optional_int(args: &Value, key: &str) -> anyhow::Result<Option<i64>> {
    match &args[key] {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| anyhow::anyhow!("Invalid '{}' argument: {}", key, n)),
        // Be lenient with models that quote their numbers.
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("Invalid '{}' argument: {}", key, s)),
        other => Err(anyhow::anyhow!("Invalid '{}' argument: {}", key, other)),
    }
}

fn optional_str(args: &Value, key: &str) -> anyhow::Result<Option<String>> {
    match &args[key] {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.trim().to_string())),
        other => Err(anyhow::anyhow!("Invalid '{}' argument: {}", key, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_key_arg_accepts_string_and_number() {
        assert_eq!(
            session_key_arg(&json!({"session_key": "latest"})).unwrap(),
            "latest"
        );
        assert_eq!(
            session_key_arg(&json!({"session_key": 9158})).unwrap(),
            "9158"
        );
        assert!(session_key_arg(&json!({})).is_err());
    }

    #[test]
    fn test_optional_int_lenient_parsing() {
        assert_eq!(optional_int(&json!({"year": 2024}), "year").unwrap(), Some(2024));
        assert_eq!(optional_int(&json!({"year": "2024"}), "year").unwrap(), Some(2024));
        assert_eq!(optional_int(&json!({}), "year").unwrap(), None);
        assert!(optional_int(&json!({"year": "soon"}), "year").is_err());
    }
}
