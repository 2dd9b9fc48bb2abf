//! Where result cycles come from.
//!
//! Fetching a result is the only asynchronous step; everything after it runs
//! to completion synchronously inside [`crate::Session::process`].

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::model::TaskId;
use crate::response::BackendResponse;
use crate::{Error, Result};

/// The backend collaborator, seen from the core.
///
/// Timeouts, retries and cancellation belong to implementations of this
/// trait, never to the pipeline behind it.
#[async_trait]
pub trait ResultSource: Send + Sync {
    async fn fetch(&self, task: TaskId) -> Result<BackendResponse>;
}

/// Replays recorded raw JSON responses in order, regardless of task.
#[derive(Debug, Default)]
pub struct ReplaySource {
    queue: Mutex<VecDeque<String>>,
}

impl ReplaySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_recordings<I, S>(recordings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { queue: Mutex::new(recordings.into_iter().map(Into::into).collect()) }
    }

    pub fn push(&self, raw: impl Into<String>) {
        self.queue.lock().push_back(raw.into());
    }

    pub fn remaining(&self) -> usize {
        self.queue.lock().len()
    }
}

#[async_trait]
impl ResultSource for ReplaySource {
    async fn fetch(&self, task: TaskId) -> Result<BackendResponse> {
        let raw = self.queue.lock().pop_front();
        let raw = raw.ok_or_else(|| Error::Source(format!("no recorded {task} response left")))?;
        BackendResponse::from_json(&raw)
    }
}
