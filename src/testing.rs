//! Test doubles shared by unit tests
//!
//! [`ScriptedTransport`] parks every request until the test answers it, so
//! tests decide the order in which responses arrive.

use crate::auth::events::SessionObserver;
use crate::auth::storage::{Credential, UserIdentity};
use crate::core::error::{Error, Result};
use crate::http::transport::{ApiRequest, ApiResponse, Transport};
use futures::future::BoxFuture;
use parking_lot::Mutex;
use tokio::sync::oneshot;

pub fn credential(username: &str, role: &str) -> Credential {
    Credential {
        token: format!("token-{}", username),
        user: UserIdentity {
            id: Some(1),
            username: username.to_string(),
            email: Some(format!("{}@example.com", username)),
            role: Some(role.to_string()),
        },
    }
}

pub fn json_reply(status: u16, value: serde_json::Value) -> Result<ApiResponse> {
    Ok(ApiResponse::json_body(status, &value))
}

struct Pending {
    request: ApiRequest,
    reply: oneshot::Sender<Result<ApiResponse>>,
}

#[derive(Default)]
pub struct ScriptedTransport {
    pending: Mutex<Vec<Pending>>,
    log: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    /// Yield until at least `count` requests are waiting for an answer
    pub async fn wait_for(&self, count: usize) {
        for _ in 0..10_000 {
            if self.pending.lock().len() >= count {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!(
            "expected {} pending requests, have {:?}",
            count,
            self.pending_paths()
        );
    }

    pub fn pending_paths(&self) -> Vec<String> {
        self.pending
            .lock()
            .iter()
            .map(|p| p.request.path.clone())
            .collect()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    /// Answer the oldest pending request accepted by `matcher`
    pub fn respond<F>(&self, matcher: F, reply: Result<ApiResponse>)
    where
        F: Fn(&ApiRequest) -> bool,
    {
        let pending = {
            let mut pending = self.pending.lock();
            let Some(index) = pending.iter().position(|p| matcher(&p.request)) else {
                let paths: Vec<_> = pending.iter().map(|p| p.request.path.clone()).collect();
                panic!("no pending request matched; pending: {:?}", paths);
            };
            pending.remove(index)
        };
        let _ = pending.reply.send(reply);
    }

    /// Every request seen so far, in issue order
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.log.lock().clone()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: ApiRequest) -> BoxFuture<'_, Result<ApiResponse>> {
        let (tx, rx) = oneshot::channel();
        self.log.lock().push(request.clone());
        self.pending.lock().push(Pending { request, reply: tx });
        Box::pin(async move {
            rx.await.unwrap_or_else(|_| {
                Err(Error::Transport {
                    message: "scripted reply dropped".to_string(),
                })
            })
        })
    }
}

#[derive(Default)]
pub struct RecordingObserver {
    navigations: Mutex<Vec<String>>,
    sign_ins: Mutex<Vec<String>>,
    sign_outs: Mutex<usize>,
}

impl RecordingObserver {
    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().clone()
    }

    pub fn sign_ins(&self) -> Vec<String> {
        self.sign_ins.lock().clone()
    }

    pub fn sign_outs(&self) -> usize {
        *self.sign_outs.lock()
    }
}

impl SessionObserver for RecordingObserver {
    fn navigate(&self, route: &str) {
        self.navigations.lock().push(route.to_string());
    }

    fn signed_in(&self, username: &str) {
        self.sign_ins.lock().push(username.to_string());
    }

    fn signed_out(&self) {
        *self.sign_outs.lock() += 1;
    }
}
