//! Scripted in-memory graph client shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use graphport_core::{Edge, Episode, GraphClient, ZepError, ZepResult};
use graphport_import::{ImportOptions, Importer, MemoryRecord, Session};
use tokio::time::Instant;

/// Canned outcome of one remote call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reply {
    Ok,
    Status(u16),
    /// 400 with a 34-byte body, as the upstream proxy sends it.
    ProxyEmptyBody,
}

impl Reply {
    fn into_result(self) -> ZepResult<()> {
        match self {
            Reply::Ok => Ok(()),
            Reply::Status(status) => Err(ZepError::from_http_status(status, format!("status {}", status), None)),
            Reply::ProxyEmptyBody => Err(ZepError::from_http_status(400, "", Some(34))),
        }
    }
}

/// A recorded call, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    AddEpisode { user_id: String, data: String },
    AddUser(String),
    DeleteUser(String),
}

#[derive(Default)]
struct Script {
    add_episode: VecDeque<Reply>,
    add_episode_fallback: Option<Reply>,
    add_user: VecDeque<Reply>,
    delete_user: VecDeque<Reply>,
}

/// Records every call and answers from per-operation scripts.
///
/// An exhausted script answers `Ok` unless a fallback is set.
#[derive(Default)]
pub struct ScriptedClient {
    script: Mutex<Script>,
    calls: Mutex<Vec<Call>>,
    add_times: Mutex<Vec<Instant>>,
}

impl ScriptedClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script_add(&self, replies: impl IntoIterator<Item = Reply>) {
        self.script.lock().unwrap().add_episode.extend(replies);
    }

    pub fn always_add(&self, reply: Reply) {
        self.script.lock().unwrap().add_episode_fallback = Some(reply);
    }

    pub fn script_add_user(&self, replies: impl IntoIterator<Item = Reply>) {
        self.script.lock().unwrap().add_user.extend(replies);
    }

    pub fn script_delete_user(&self, replies: impl IntoIterator<Item = Reply>) {
        self.script.lock().unwrap().delete_user.extend(replies);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Contents passed to `add_episode`, in call order.
    pub fn added(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::AddEpisode { data, .. } => Some(data),
                _ => None,
            })
            .collect()
    }

    /// Seconds between consecutive `add_episode` calls.
    pub fn add_gaps(&self) -> Vec<u64> {
        let times = self.add_times.lock().unwrap();
        times
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).as_secs())
            .collect()
    }

    fn record(&self, call: Call) -> usize {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call);
        calls.len()
    }
}

#[async_trait]
impl GraphClient for ScriptedClient {
    async fn add_episode(&self, user_id: &str, data: &str) -> ZepResult<Episode> {
        let n = self.record(Call::AddEpisode {
            user_id: user_id.to_string(),
            data: data.to_string(),
        });
        self.add_times.lock().unwrap().push(Instant::now());

        let reply = {
            let mut script = self.script.lock().unwrap();
            let fallback = script.add_episode_fallback.unwrap_or(Reply::Ok);
            script.add_episode.pop_front().unwrap_or(fallback)
        };
        reply.into_result()?;
        Ok(Episode::new(format!("ep-{}", n), data))
    }

    async fn search_edges(&self, _user_id: &str, _query: &str, _limit: usize) -> ZepResult<Vec<Edge>> {
        Ok(Vec::new())
    }

    async fn episodes_by_user(&self, _user_id: &str, _lastn: usize) -> ZepResult<Vec<Episode>> {
        Ok(Vec::new())
    }

    async fn add_user(&self, user_id: &str) -> ZepResult<()> {
        self.record(Call::AddUser(user_id.to_string()));
        let reply = self.script.lock().unwrap().add_user.pop_front().unwrap_or(Reply::Ok);
        reply.into_result()
    }

    async fn delete_user(&self, user_id: &str) -> ZepResult<()> {
        self.record(Call::DeleteUser(user_id.to_string()));
        let reply = self.script.lock().unwrap().delete_user.pop_front().unwrap_or(Reply::Ok);
        reply.into_result()
    }
}

pub fn records(contents: &[&str]) -> Vec<MemoryRecord> {
    contents.iter().map(|c| MemoryRecord::new(*c)).collect()
}

/// Importer for user `tester` with no pacing delay.
pub fn importer(client: &Arc<ScriptedClient>, options: ImportOptions) -> Importer {
    let client: Arc<dyn GraphClient> = client.clone();
    Importer::new(Session::new(client, "tester"), options)
}

pub fn no_delay() -> ImportOptions {
    ImportOptions::default().with_delay(std::time::Duration::ZERO)
}
