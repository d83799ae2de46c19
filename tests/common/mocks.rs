//! Mock implementations for testing.
//!
//! [`ScriptedJobApi`] answers each call from a queue of scripted replies.
//! A reply can be held back behind a [`Notify`] gate so tests control the
//! order in which overlapping operations resolve.

use async_trait::async_trait;
use jobboard::auth::Token;
use jobboard::types::{AppError, Job, JobId, JobPatch, Result};
use jobboard::JobApi;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Notify;

struct Reply<T> {
    gate: Option<Arc<Notify>>,
    result: Result<T>,
}

/// Which endpoint a recorded call went to.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List,
    Update(JobId),
    Delete(JobId),
}

#[derive(Default)]
pub struct ScriptedJobApi {
    list: Mutex<VecDeque<Reply<Vec<Job>>>>,
    update: Mutex<VecDeque<Reply<Job>>>,
    delete: Mutex<VecDeque<Reply<()>>>,
    calls: Mutex<Vec<(Call, Option<Token>)>>,
}

impl ScriptedJobApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on_list(&self, result: Result<Vec<Job>>) {
        self.list.lock().push_back(Reply { gate: None, result });
    }

    /// Queue a list reply that is held until the returned gate is notified.
    pub fn on_list_gated(&self, result: Result<Vec<Job>>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.list.lock().push_back(Reply {
            gate: Some(gate.clone()),
            result,
        });
        gate
    }

    pub fn on_update(&self, result: Result<Job>) {
        self.update.lock().push_back(Reply { gate: None, result });
    }

    pub fn on_update_gated(&self, result: Result<Job>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.update.lock().push_back(Reply {
            gate: Some(gate.clone()),
            result,
        });
        gate
    }

    pub fn on_delete(&self, result: Result<()>) {
        self.delete.lock().push_back(Reply { gate: None, result });
    }

    /// Calls received so far with the token each one carried.
    pub fn calls(&self) -> Vec<(Call, Option<Token>)> {
        self.calls.lock().clone()
    }

    pub fn tokens(&self) -> Vec<Option<String>> {
        self.calls
            .lock()
            .iter()
            .map(|(_, token)| token.as_ref().map(|t| t.as_str().to_string()))
            .collect()
    }

    async fn answer<T>(queue: &Mutex<VecDeque<Reply<T>>>, name: &str) -> Result<T> {
        let reply = queue.lock().pop_front();
        match reply {
            Some(Reply { gate, result }) => {
                if let Some(gate) = gate {
                    gate.notified().await;
                }
                result
            }
            None => Err(AppError::Transport(format!("unscripted {} call", name))),
        }
    }
}

#[async_trait]
impl JobApi for ScriptedJobApi {
    async fn list_jobs(&self, token: Option<Token>) -> Result<Vec<Job>> {
        self.calls.lock().push((Call::List, token));
        Self::answer(&self.list, "list").await
    }

    async fn update_job(&self, token: Option<Token>, id: &JobId, _patch: &JobPatch) -> Result<Job> {
        self.calls.lock().push((Call::Update(id.clone()), token));
        Self::answer(&self.update, "update").await
    }

    async fn delete_job(&self, token: Option<Token>, id: &JobId) -> Result<()> {
        self.calls.lock().push((Call::Delete(id.clone()), token));
        Self::answer(&self.delete, "delete").await
    }
}

/// Job with a title, the shape most tests need.
pub fn job(id: i64, title: &str) -> Job {
    Job::new(id).with_field("Title", title)
}
