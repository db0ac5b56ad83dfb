//! In-memory stand-ins for the network and the filesystem.
//!
//! [`MockTransport`] answers requests from a script and records everything it was asked to send,
//! so tests can assert on exact requests (or on the absence of any). [`MemoryFiles`] serves
//! uploads from memory.

use crate::error::TransportError;
use crate::files::{FileBytes, FileFuture, FileSource, display_name};
use crate::transport::{HttpRequest, HttpResponse, Transport, TransportFuture};
use bytes::Bytes;
use http::StatusCode;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug)]
enum Scripted {
    Respond(StatusCode, Bytes),
    Fail(String),
}

#[derive(Debug, Default)]
struct State {
    script: VecDeque<Scripted>,
    requests: Vec<HttpRequest>,
}

/// A [`Transport`] that replays scripted responses in order.
///
/// Clones share the same script and request log.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<State>>,
    hang: bool,
    cancellations: Arc<AtomicUsize>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose requests never complete.
    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::default()
        }
    }

    /// Queues a response with a raw body.
    pub fn respond(&self, status: u16, body: impl Into<Bytes>) -> &Self {
        let status = StatusCode::from_u16(status).expect("valid status code");
        self.state()
            .script
            .push_back(Scripted::Respond(status, body.into()));
        self
    }

    /// Queues a response with a JSON body.
    pub fn respond_json(&self, status: u16, body: serde_json::Value) -> &Self {
        self.respond(status, body.to_string())
    }

    /// Queues a transport-level failure.
    pub fn fail(&self, message: impl Into<String>) -> &Self {
        self.state()
            .script
            .push_back(Scripted::Fail(message.into()));
        self
    }

    /// Every request handed to [`Transport::send`], oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state().requests.clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.state().requests.last().cloned()
    }

    /// How many requests were dispatched.
    pub fn dispatched(&self) -> usize {
        self.state().requests.len()
    }

    /// How many in-flight requests were dropped before they completed.
    pub fn cancellations(&self) -> usize {
        self.cancellations.load(Ordering::SeqCst)
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("mock transport state poisoned")
    }
}

/// Counts a cancellation if dropped while still armed.
struct InFlight {
    cancellations: Arc<AtomicUsize>,
    armed: bool,
}

impl InFlight {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.armed {
            self.cancellations.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl Transport for MockTransport {
    fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
        let scripted = {
            let mut state = self.state();
            state.requests.push(request);
            if self.hang {
                None
            } else {
                Some(state.script.pop_front())
            }
        };
        let in_flight = InFlight {
            cancellations: Arc::clone(&self.cancellations),
            armed: true,
        };

        Box::pin(async move {
            let mut in_flight = in_flight;
            let outcome = match scripted {
                None => std::future::pending().await,
                Some(Some(Scripted::Respond(status, body))) => Ok(HttpResponse { status, body }),
                Some(Some(Scripted::Fail(message))) => Err(TransportError::new(message)),
                Some(None) => Err(TransportError::new("no scripted response left")),
            };
            in_flight.disarm();
            outcome
        })
    }
}

/// A [`FileSource`] serving files from memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryFiles {
    files: Arc<Mutex<HashMap<PathBuf, Bytes>>>,
    reads: Arc<AtomicUsize>,
}

impl MemoryFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, bytes: impl Into<Bytes>) -> &Self {
        self.files
            .lock()
            .expect("memory files poisoned")
            .insert(path.into(), bytes.into());
        self
    }

    /// How many times a file was requested, found or not.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl FileSource for MemoryFiles {
    fn read<'a>(&'a self, path: &'a Path) -> FileFuture<'a> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let found = self
            .files
            .lock()
            .expect("memory files poisoned")
            .get(path)
            .cloned();
        Box::pin(async move {
            let bytes = found.ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
            Ok(FileBytes {
                bytes,
                filename: display_name(path),
            })
        })
    }
}
