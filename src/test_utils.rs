//! Test utilities for Promptcast
//!
//! Provides an in-memory [`SessionDirectory`] that counts calls, so tests can
//! assert exactly how many sessions a resolver created.

use crate::client::{
    MessageEnvelope, MessageInfo, Part, PromptRequest, PromptResponse, Session, SessionDirectory,
};
use crate::client::types::SessionTime;
use crate::error::{RemoteResult, TransportFailure};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Builds a session with the given update time
pub fn session(id: &str, updated: i64) -> Session {
    Session {
        id: id.to_string(),
        title: format!("Session {}", id),
        time: SessionTime {
            created: updated,
            updated,
        },
    }
}

/// In-memory session directory with call counters
#[derive(Default)]
pub struct FakeDirectory {
    sessions: Mutex<Vec<Session>>,
    messages: Mutex<Vec<(String, MessageEnvelope)>>,
    prompts: Mutex<Vec<(String, PromptRequest)>>,
    reply: Mutex<Vec<Part>>,
    next_id: AtomicUsize,
    list_calls: AtomicUsize,
    get_calls: AtomicUsize,
    create_calls: AtomicUsize,
    blank_ids: bool,
    failing_gets: bool,
    unreachable: bool,
}

impl FakeDirectory {
    /// Empty directory replying with a single text part
    pub fn new() -> Self {
        let directory = Self::default();
        *directory.reply.lock().unwrap() = vec![Part::text("ok")];
        directory
    }

    /// Seeds existing sessions
    pub fn with_sessions(self, sessions: Vec<Session>) -> Self {
        *self.sessions.lock().unwrap() = sessions;
        self
    }

    /// Sets the parts returned for every prompt
    pub fn with_reply(self, parts: Vec<Part>) -> Self {
        *self.reply.lock().unwrap() = parts;
        self
    }

    /// Seeds a stored message for `session_id`
    pub fn with_message(self, session_id: &str, role: &str, text: &str) -> Self {
        let envelope = MessageEnvelope {
            info: MessageInfo {
                id: format!("msg_{}", self.messages.lock().unwrap().len()),
                role: role.to_string(),
            },
            parts: vec![Part::text(text)],
        };
        self.messages
            .lock()
            .unwrap()
            .push((session_id.to_string(), envelope));
        self
    }

    /// Created sessions come back without an id
    pub fn with_blank_ids(mut self) -> Self {
        self.blank_ids = true;
        self
    }

    /// Every `get_session` fails with a server error
    pub fn failing_gets(mut self) -> Self {
        self.failing_gets = true;
        self
    }

    /// Every call fails as if nothing listened on the port
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    /// Number of `list_sessions` calls
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of `get_session` calls
    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    /// Number of `create_session` calls
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Whether a session with `id` exists
    pub fn contains(&self, id: &str) -> bool {
        self.sessions.lock().unwrap().iter().any(|s| s.id == id)
    }

    /// Title of the session with `id`
    pub fn title_of(&self, id: &str) -> Option<String> {
        self.sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.title.clone())
    }

    /// Prompts received so far, with their session ids
    pub fn prompts(&self) -> Vec<(String, PromptRequest)> {
        self.prompts.lock().unwrap().clone()
    }

    fn refused<T>() -> RemoteResult<T> {
        RemoteResult::TransportError(TransportFailure::ConnectionRefused(
            "127.0.0.1:4096".to_string(),
        ))
    }
}

#[async_trait]
impl SessionDirectory for FakeDirectory {
    async fn list_sessions(&self) -> RemoteResult<Vec<Session>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Self::refused();
        }
        RemoteResult::Ok(self.sessions.lock().unwrap().clone())
    }

    async fn get_session(&self, id: &str) -> RemoteResult<Session> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Self::refused();
        }
        if self.failing_gets {
            return RemoteResult::TransportError(TransportFailure::Status {
                status: 500,
                body: "internal error".to_string(),
            });
        }
        match self.sessions.lock().unwrap().iter().find(|s| s.id == id) {
            Some(session) => RemoteResult::Ok(session.clone()),
            None => RemoteResult::NotFound,
        }
    }

    async fn create_session(&self, title: Option<&str>) -> RemoteResult<Session> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Self::refused();
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let id = if self.blank_ids {
            String::new()
        } else {
            format!("ses_new{}", n)
        };
        let mut created = session(&id, 1_000 + n as i64);
        if let Some(title) = title {
            created.title = title.to_string();
        }
        self.sessions.lock().unwrap().push(created.clone());
        RemoteResult::Ok(created)
    }

    async fn delete_session(&self, id: &str) -> RemoteResult<bool> {
        if self.unreachable {
            return Self::refused();
        }
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| s.id != id);
        if sessions.len() == before {
            RemoteResult::NotFound
        } else {
            RemoteResult::Ok(true)
        }
    }

    async fn rename_session(&self, id: &str, title: &str) -> RemoteResult<Session> {
        if self.unreachable {
            return Self::refused();
        }
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.iter_mut().find(|s| s.id == id) {
            Some(session) => {
                session.title = title.to_string();
                RemoteResult::Ok(session.clone())
            }
            None => RemoteResult::NotFound,
        }
    }

    async fn list_messages(&self, id: &str) -> RemoteResult<Vec<MessageEnvelope>> {
        if self.unreachable {
            return Self::refused();
        }
        if !self.contains(id) {
            return RemoteResult::NotFound;
        }
        RemoteResult::Ok(
            self.messages
                .lock()
                .unwrap()
                .iter()
                .filter(|(session_id, _)| session_id == id)
                .map(|(_, envelope)| envelope.clone())
                .collect(),
        )
    }

    async fn send_prompt(&self, id: &str, request: &PromptRequest) -> RemoteResult<PromptResponse> {
        if self.unreachable {
            return Self::refused();
        }
        if !self.contains(id) {
            return RemoteResult::NotFound;
        }
        self.prompts
            .lock()
            .unwrap()
            .push((id.to_string(), request.clone()));
        RemoteResult::Ok(PromptResponse {
            info: Some(MessageInfo {
                id: "msg_reply".to_string(),
                role: "assistant".to_string(),
            }),
            parts: self.reply.lock().unwrap().clone(),
        })
    }
}
