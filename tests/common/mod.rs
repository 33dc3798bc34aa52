#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;

use meeting_digest::{Generator, ToolSpec};

/// One request seen by the scripted generator
#[derive(Debug, Clone)]
pub struct Call {
    pub system: Vec<String>,
    pub user: String,
    pub tool: Option<String>,
}

/// Generator answering from queued responses, in order
#[derive(Default)]
pub struct ScriptedGenerator {
    structured: Mutex<VecDeque<Result<Value, String>>>,
    text: Mutex<VecDeque<Result<String, String>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn structured(self, payload: Value) -> Self {
        self.structured.lock().unwrap().push_back(Ok(payload));
        self
    }

    pub fn structured_error(self, message: &str) -> Self {
        self.structured
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn text(self, completion: &str) -> Self {
        self.text
            .lock()
            .unwrap()
            .push_back(Ok(completion.to_string()));
        self
    }

    pub fn text_error(self, message: &str) -> Self {
        self.text.lock().unwrap().push_back(Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, system: &[String], user: &str, tool: Option<&ToolSpec>) {
        self.calls.lock().unwrap().push(Call {
            system: system.to_vec(),
            user: user.to_string(),
            tool: tool.map(|t| t.name.clone()),
        });
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate_structured(
        &self,
        system: &[String],
        user: &str,
        tool: &ToolSpec,
    ) -> Result<Value> {
        self.record(system, user, Some(tool));
        let next = self.structured.lock().unwrap().pop_front();
        match next {
            Some(Ok(payload)) => Ok(payload),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("no structured response scripted")),
        }
    }

    async fn generate_text(&self, system: &[String], user: &str) -> Result<String> {
        self.record(system, user, None);
        let next = self.text.lock().unwrap().pop_front();
        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("no text response scripted")),
        }
    }
}
