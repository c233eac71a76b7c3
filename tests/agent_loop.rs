//! Conversation loop tests against scripted model behavior and canned data.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::Arc;

use async_trait::async_trait;
use pitwall::agent::{Agent, ChatSession};
use pitwall::error::{Error, Result};
use pitwall::llm::{ChatMessage, FunctionCall, LlmClient, Role, ToolCall, ToolDefinition};
use pitwall::openf1::{lap_matches, Driver, F1Data, Lap, Session, SessionFilters};
use pitwall::tools::f1::f1_registry;
use pitwall::Config;

// ── Scripted LLM ────────────────────────────────────────────────────────────

/// Plays back a fixed sequence of assistant messages; panics if the loop
/// asks for more than the script contains.
struct ScriptedLlm {
    responses: Mutex<VecDeque<ChatMessage>>,
    calls: Mutex<usize>,
}

impl ScriptedLlm {
    fn new(responses: Vec<ChatMessage>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(0),
        }
    }

    fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn chat_completion(
        &self,
        _model: &str,
        _messages: &[ChatMessage],
        _tools: Option<&[ToolDefinition]>,
    ) -> Result<ChatMessage> {
        *self.calls.lock().unwrap() += 1;
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("script exhausted: loop asked for more responses than scripted"))
    }
}

/// Requests the same tool call forever, so the loop can never finish.
struct LoopingLlm {
    calls: Mutex<usize>,
}

#[async_trait]
impl LlmClient for LoopingLlm {
    async fn chat_completion(
        &self,
        _model: &str,
        _messages: &[ChatMessage],
        _tools: Option<&[ToolDefinition]>,
    ) -> Result<ChatMessage> {
        *self.calls.lock().unwrap() += 1;
        Ok(tool_call_message("call_loop", "get_sessions", "{}"))
    }
}

fn tool_call_message(id: &str, name: &str, arguments: &str) -> ChatMessage {
    ChatMessage {
        role: Role::Assistant,
        content: None,
        tool_calls: Some(vec![ToolCall {
            id: id.to_string(),
            kind: "function".to_string(),
            function: FunctionCall {
                name: name.to_string(),
                arguments: arguments.to_string(),
            },
        }]),
        tool_call_id: None,
    }
}

// ── Canned data source ──────────────────────────────────────────────────────

struct FakeF1 {
    calls: Mutex<Vec<String>>,
    sessions: Vec<Session>,
    drivers: Vec<Driver>,
    laps: Vec<Lap>,
}

impl FakeF1 {
    fn bahrain_2024() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            sessions: vec![bahrain_race()],
            drivers: vec![driver(63, "George", "Russell", "RUS", "Mercedes")],
            laps: vec![lap(63, 7, 94.102), lap(63, 8, 93.421), lap(63, 9, 93.877)],
        }
    }

    fn empty() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            sessions: Vec::new(),
            drivers: Vec::new(),
            laps: Vec::new(),
        }
    }

    fn call_log(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl F1Data for FakeF1 {
    async fn sessions(&self, filters: &SessionFilters) -> Result<Vec<Session>> {
        self.calls.lock().unwrap().push("sessions".to_string());
        Ok(self
            .sessions
            .iter()
            .filter(|s| filters.matches(s))
            .cloned()
            .collect())
    }

    async fn drivers(&self, session_key: &str) -> Result<Vec<Driver>> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("drivers:{}", session_key));
        Ok(self
            .drivers
            .iter()
            .filter(|d| session_key == "latest" || d.session_key.to_string() == session_key)
            .cloned()
            .collect())
    }

    async fn laps(
        &self,
        session_key: &str,
        driver_number: Option<u32>,
        lap_number: Option<u32>,
    ) -> Result<Vec<Lap>> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("laps:{}", session_key));
        Ok(self
            .laps
            .iter()
            .filter(|l| l.session_key.to_string() == session_key)
            .filter(|l| lap_matches(l, driver_number, lap_number))
            .cloned()
            .collect())
    }
}

fn bahrain_race() -> Session {
    Session {
        meeting_key: 1229,
        session_key: 9158,
        location: "Sakhir".to_string(),
        date_start: "2024-03-02T15:00:00+00:00".to_string(),
        date_end: "2024-03-02T17:00:00+00:00".to_string(),
        session_type: "Race".to_string(),
        session_name: "Race".to_string(),
        country_key: 36,
        country_code: "BRN".to_string(),
        country_name: "Bahrain".to_string(),
        circuit_key: 63,
        circuit_short_name: "Sakhir".to_string(),
        gmt_offset: "03:00:00".to_string(),
        year: 2024,
    }
}

fn driver(number: u32, first: &str, last: &str, acronym: &str, team: &str) -> Driver {
    Driver {
        meeting_key: 1229,
        session_key: 9158,
        driver_number: number,
        broadcast_name: format!("{} {}", &first[..1], last.to_uppercase()),
        full_name: format!("{} {}", first.to_uppercase(), last.to_uppercase()),
        name_acronym: acronym.to_string(),
        team_name: team.to_string(),
        team_colour: Some("6CD3BF".to_string()),
        first_name: first.to_string(),
        last_name: last.to_string(),
        headshot_url: None,
        country_code: Some("GBR".to_string()),
    }
}

fn lap(driver_number: u32, lap_number: u32, duration: f64) -> Lap {
    Lap {
        meeting_key: 1229,
        session_key: 9158,
        driver_number,
        lap_number,
        date_start: None,
        duration_sector_1: Some(duration / 3.0),
        duration_sector_2: Some(duration / 3.0),
        duration_sector_3: Some(duration / 3.0),
        i1_speed: Some(301),
        i2_speed: Some(279),
        is_pit_out_lap: false,
        lap_duration: Some(duration),
        segments_sector_1: vec![Some(2049)],
        segments_sector_2: vec![Some(2051)],
        segments_sector_3: vec![Some(2049)],
        st_speed: Some(294),
    }
}

/// The George Russell / Bahrain / lap 8 script from the example query.
fn russell_script() -> Vec<ChatMessage> {
    vec![
        tool_call_message(
            "call_1",
            "get_sessions",
            r#"{"year": 2024, "country_name": "bahrain", "session_name": "Race"}"#,
        ),
        tool_call_message("call_2", "get_drivers", r#"{"session_key": "9158"}"#),
        tool_call_message(
            "call_3",
            "get_laps",
            r#"{"session_key": "9158", "driver_number": 63, "lap_number": 8}"#,
        ),
        ChatMessage::assistant(
            "George Russell's lap 8 in the 2024 Bahrain Grand Prix took 93.421 seconds.",
        ),
    ]
}

async fn run_russell_turn() -> (String, Vec<String>, ChatSession) {
    let config = Config::new("test-key".to_string(), "test-model".to_string());
    let data = Arc::new(FakeF1::bahrain_2024());
    let agent = Agent::new(
        &config,
        Arc::new(ScriptedLlm::new(russell_script())),
        f1_registry(data.clone()),
    );

    let mut session = ChatSession::new();
    let answer = agent
        .run_turn(&mut session, "What was George Russell's lap time on lap 8 of Bahrain?")
        .await
        .expect("turn should succeed");

    (answer, data.call_log(), session)
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_multi_step_lookup_resolves_lap_time() {
    let (answer, calls, session) = run_russell_turn().await;

    assert!(answer.contains("93.421"), "answer should carry the lap duration: {}", answer);
    assert_eq!(calls, vec!["sessions", "drivers:9158", "laps:9158"]);

    // system, user, then three (assistant, tool) pairs, then the answer
    let roles: Vec<Role> = session.messages.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![
            Role::System,
            Role::User,
            Role::Assistant,
            Role::Tool,
            Role::Assistant,
            Role::Tool,
            Role::Assistant,
            Role::Tool,
            Role::Assistant,
        ]
    );

    // Tool results stay correlated to the calls that produced them.
    let tool_ids: Vec<&str> = session
        .messages
        .iter()
        .filter_map(|m| m.tool_call_id.as_deref())
        .collect();
    assert_eq!(tool_ids, vec!["call_1", "call_2", "call_3"]);

    // The sessions lookup found Bahrain despite the lowercase country name.
    let first_result = session.messages[3].content.as_deref().unwrap();
    assert!(first_result.contains("Found 1 sessions"));
    assert!(first_result.contains("9158"));
}

#[tokio::test]
async fn test_identical_scripts_produce_identical_runs() {
    let (answer_a, calls_a, _) = run_russell_turn().await;
    let (answer_b, calls_b, _) = run_russell_turn().await;

    assert_eq!(answer_a, answer_b);
    assert_eq!(calls_a, calls_b);
}

#[tokio::test]
async fn test_loop_fails_closed_exactly_at_the_cap() {
    let config = Config::new("test-key".to_string(), "test-model".to_string());
    let llm = Arc::new(LoopingLlm {
        calls: Mutex::new(0),
    });
    let agent = Agent::new(
        &config,
        llm.clone(),
        f1_registry(Arc::new(FakeF1::bahrain_2024())),
    );

    let mut session = ChatSession::new();
    let result = agent.run_turn(&mut session, "never finishes").await;

    match result {
        Err(Error::BoundExceeded { limit }) => assert_eq!(limit, 5),
        other => panic!("expected BoundExceeded, got {:?}", other.map(|_| ())),
    }
    assert_eq!(*llm.calls.lock().unwrap(), 5);
}

#[tokio::test]
async fn test_empty_driver_list_is_data_not_an_error() {
    let config = Config::new("test-key".to_string(), "test-model".to_string());
    let script = vec![
        tool_call_message("call_1", "get_drivers", r#"{"session_key": "999999"}"#),
        ChatMessage::assistant("I found no data for that session."),
    ];
    let agent = Agent::new(
        &config,
        Arc::new(ScriptedLlm::new(script)),
        f1_registry(Arc::new(FakeF1::empty())),
    );

    let mut session = ChatSession::new();
    let answer = agent
        .run_turn(&mut session, "Who drove in session 999999?")
        .await
        .expect("an invalid session key must not fail the turn");

    assert_eq!(answer, "I found no data for that session.");
    let tool_result = session.messages[3].content.as_deref().unwrap();
    assert!(tool_result.contains("Found 0 drivers"));
}

#[tokio::test]
async fn test_tool_failures_feed_back_instead_of_aborting() {
    let config = Config::new("test-key".to_string(), "test-model".to_string());
    let script = vec![
        tool_call_message("call_1", "get_weather", r#"{"city": "Sakhir"}"#),
        tool_call_message("call_2", "get_laps", "not json"),
        ChatMessage::assistant("I can only look up F1 session data."),
    ];
    let agent = Agent::new(
        &config,
        Arc::new(ScriptedLlm::new(script)),
        f1_registry(Arc::new(FakeF1::bahrain_2024())),
    );

    let mut session = ChatSession::new();
    let answer = agent.run_turn(&mut session, "What's the weather?").await.unwrap();

    assert_eq!(answer, "I can only look up F1 session data.");

    let payloads: Vec<&str> = session
        .messages
        .iter()
        .filter(|m| m.role == Role::Tool)
        .map(|m| m.content.as_deref().unwrap())
        .collect();
    assert_eq!(payloads.len(), 2);
    assert!(payloads[0].starts_with("Error: Unknown tool: get_weather"));
    assert!(payloads[1].starts_with("Error: invalid tool arguments"));
}

#[tokio::test]
async fn test_script_count_matches_llm_round_trips() {
    let config = Config::new("test-key".to_string(), "test-model".to_string());
    let llm = Arc::new(ScriptedLlm::new(russell_script()));
    let agent = Agent::new(
        &config,
        llm.clone(),
        f1_registry(Arc::new(FakeF1::bahrain_2024())),
    );

    let mut session = ChatSession::new();
    agent
        .run_turn(&mut session, "What was George Russell's lap time on lap 8 of Bahrain?")
        .await
        .unwrap();

    // Three tool rounds plus the final answer.
    assert_eq!(llm.call_count(), 4);
}
