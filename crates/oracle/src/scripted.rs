use crate::error::{OracleError, Result};
use crate::oracle::{Oracle, OracleRequest};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Mutex;

type Responder = Box<dyn Fn(&OracleRequest) -> std::result::Result<String, String> + Send + Sync>;

/// Deterministic oracle double.
///
/// Either replays queued responses in order, or answers through a closure
/// that sees each request. Every request is recorded.
pub struct ScriptedOracle {
    queue: Mutex<VecDeque<std::result::Result<String, String>>>,
    responder: Option<Responder>,
    requests: Mutex<Vec<OracleRequest>>,
}

impl Default for ScriptedOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            responder: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer every request through `responder`; `Err` becomes an oracle failure
    pub fn responding<F>(responder: F) -> Self
    where
        F: Fn(&OracleRequest) -> std::result::Result<String, String> + Send + Sync + 'static,
    {
        Self {
            responder: Some(Box::new(responder)),
            ..Self::new()
        }
    }

    pub fn push_raw(&self, content: impl Into<String>) {
        self.lock_queue().push_back(Ok(content.into()));
    }

    pub fn push_json<T: Serialize>(&self, value: &T) {
        let content = serde_json::to_string(value).unwrap_or_default();
        self.push_raw(content);
    }

    pub fn push_error(&self, message: impl Into<String>) {
        self.lock_queue().push_back(Err(message.into()));
    }

    /// Requests seen so far, in call order
    pub fn requests(&self) -> Vec<OracleRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn lock_queue(&self) -> std::sync::MutexGuard<'_, VecDeque<std::result::Result<String, String>>> {
        self.queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn complete(&self, request: &OracleRequest) -> Result<String> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        let answer = match &self.responder {
            Some(responder) => responder(request),
            None => self
                .lock_queue()
                .pop_front()
                .unwrap_or_else(|| Err("no scripted response left".to_string())),
        };
        answer.map_err(OracleError::Scripted)
    }
}
