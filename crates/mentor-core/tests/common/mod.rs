//! Shared helpers for mentor-core integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Value, json};

use mentor_core::drafting::{
    DraftingClient, GenerateRequest, GenerativeService, RetryPolicy, ServiceError,
};
use mentor_core::store::MemoryStore;
use mentor_test_utils::{sample_profile, sample_syllabus};

/// A [`GenerativeService`] that replays a script of responses.
///
/// When the script runs out, `fallback` (if any) is returned for every
/// further call.
pub struct ScriptedService {
    script: Mutex<VecDeque<Result<Value, ServiceError>>>,
    fallback: Option<Result<Value, ServiceError>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedService {
    pub fn new(script: Vec<Result<Value, ServiceError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            fallback: None,
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Answer every call with the same result.
    pub fn always(result: Result<Value, ServiceError>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Some(result),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.prompt.clone())
            .collect()
    }
}

#[async_trait]
impl GenerativeService for ScriptedService {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<Value, ServiceError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(next) = self.script.lock().unwrap().pop_front() {
            return next;
        }
        match &self.fallback {
            Some(result) => result.clone(),
            None => panic!("scripted service called more times than scripted"),
        }
    }
}

pub fn rate_limited() -> ServiceError {
    ServiceError::RateLimited {
        service: "scripted".to_string(),
        retry_after_ms: None,
    }
}

/// Draft JSON with the given `(topic_id, hours)` items.
pub fn draft(items: &[(&str, f64)]) -> Value {
    let items: Vec<Value> = items
        .iter()
        .map(|(id, hours)| json!({ "topic_id": id, "allocated_time": hours, "reason": "scripted" }))
        .collect();
    json!({
        "mentor_message": "Scripted message.",
        "reasoning": "Scripted reasoning.",
        "items": items,
    })
}

/// Drafting client with the production retry policy.
pub fn drafter(service: Arc<ScriptedService>) -> DraftingClient {
    DraftingClient::new(service)
}

/// Drafting client whose backoff is short enough for real-time tests.
pub fn quick_drafter(service: Arc<ScriptedService>) -> DraftingClient {
    DraftingClient::new(service).with_retry_policy(RetryPolicy::new(3, Duration::from_millis(1)))
}

/// In-memory store seeded with the sample profile and syllabus.
pub fn seeded_store() -> MemoryStore {
    let (subjects, topics) = sample_syllabus();
    MemoryStore::with_state(sample_profile(), subjects, topics)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
