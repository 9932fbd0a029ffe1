// Workspace transaction state machine.
//
// Every mutating change on CVP goes through a workspace: the change is
// staged inside it, a build is requested and must complete, and only
// then may the workspace be submitted to take effect. This module
// drives that sequence as inherent methods on `CvpClient`, mirroring
// the endpoint-module layout of the rest of the crate.
//
// Ordering is strict: create → stage → build → await_build → submit.
// Build and submit each carry a fresh correlation id even though the
// workspace id is reused throughout. A failed POST moves the machine
// into the absorbing `Failed` state; the abandoned workspace is left to
// the controller (no rollback).

use std::time::Duration;

use serde_json::{Value, json};
use tokio::time::{Instant, sleep};
use tracing::{debug, info};
use uuid::Uuid;

use crate::client::{CvpClient, paths};
use crate::error::Error;
use crate::tag::TagMutation;
use crate::transport::AcceptPayload;

/// Lifecycle of a workspace transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceState {
    /// Ids generated, nothing sent to the controller yet.
    New,
    /// Workspace exists on the controller; mutations may be staged.
    Unsubmitted,
    /// Build requested; awaiting readiness.
    Building,
    /// Submitted; staged changes are durable and visible.
    Submitted,
    /// A step failed; no further transitions are possible.
    Failed,
}

/// Bounds for the build-readiness poll.
///
/// The build must finish before submit is allowed, so the transaction
/// polls the workspace resource until the controller reports a build
/// outcome, up to `max_wait`.
#[derive(Debug, Clone)]
pub struct BuildWait {
    pub interval: Duration,
    pub max_wait: Duration,
}

impl Default for BuildWait {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_wait: Duration::from_secs(30),
        }
    }
}

/// A single workspace transaction against the controller.
///
/// Owns a freshly generated workspace id; workspaces are never reused
/// across transactions and no concurrent mutation of one workspace is
/// supported.
pub struct WorkspaceTransaction<'a> {
    client: &'a CvpClient,
    workspace_id: String,
    display_name: String,
    description: String,
    state: WorkspaceState,
}

impl<'a> WorkspaceTransaction<'a> {
    /// Start a new transaction with a fresh random workspace id.
    pub fn new(client: &'a CvpClient) -> Self {
        let workspace_id = Uuid::new_v4().to_string();
        let short = workspace_id.get(..8).unwrap_or(&workspace_id);
        Self {
            display_name: format!("{short} cvpctl"),
            description: "created by cvpctl".to_owned(),
            client,
            workspace_id,
            state: WorkspaceState::New,
        }
    }

    /// The generated workspace id.
    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    /// Current state of the transaction.
    pub fn state(&self) -> WorkspaceState {
        self.state
    }

    fn expect_state(&self, want: WorkspaceState, op: &'static str) -> Result<(), Error> {
        if self.state == want {
            Ok(())
        } else {
            Err(Error::InvalidTransition {
                from: self.state,
                op,
            })
        }
    }

    /// POST to the workspace config endpoint, absorbing into `Failed`
    /// on any error.
    async fn post_workspace(&mut self, body: &Value) -> Result<Value, Error> {
        match self.client.post_json(paths::WORKSPACE_CONFIG, body).await {
            Ok(resp) => Ok(resp),
            Err(e) => {
                self.state = WorkspaceState::Failed;
                Err(e)
            }
        }
    }

    // ── Wire bodies ──────────────────────────────────────────────────

    fn workspace_body(&self) -> Value {
        json!({
            "key": { "workspaceId": self.workspace_id },
            "displayName": self.display_name,
            "description": self.description,
        })
    }

    /// Workspace body plus a request verb and a fresh correlation id.
    fn request_body(&self, request: &str) -> Value {
        let mut body = self.workspace_body();
        body["request"] = json!(request);
        body["requestParams"] = json!({ "requestId": Uuid::new_v4().to_string() });
        body
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Announce the workspace's existence to the controller.
    pub async fn create(&mut self) -> Result<Value, Error> {
        self.expect_state(WorkspaceState::New, "create")?;
        let resp = self.post_workspace(&self.workspace_body()).await?;
        debug!("workspace {} created", self.workspace_id);
        self.state = WorkspaceState::Unsubmitted;
        Ok(resp)
    }

    /// Stage a tag mutation inside the workspace.
    ///
    /// Does not change workspace state; only valid while `Unsubmitted`.
    pub async fn stage(&mut self, tag: &TagMutation) -> Result<Value, Error> {
        self.expect_state(WorkspaceState::Unsubmitted, "stage")?;
        let payload = tag.payload(&self.workspace_id);
        match self.client.post_json(paths::TAG_CONFIG, &payload).await {
            Ok(resp) => {
                debug!(
                    "staged tag {}={} in workspace {}",
                    tag.label, tag.value, self.workspace_id
                );
                Ok(resp)
            }
            Err(e) => {
                self.state = WorkspaceState::Failed;
                Err(e)
            }
        }
    }

    /// Request a build of the staged changes.
    pub async fn build(&mut self) -> Result<Value, Error> {
        self.expect_state(WorkspaceState::Unsubmitted, "build")?;
        let body = self.request_body("REQUEST_START_BUILD");
        let resp = self.post_workspace(&body).await?;
        debug!("workspace {} build requested", self.workspace_id);
        self.state = WorkspaceState::Building;
        Ok(resp)
    }

    /// Poll the workspace resource until the build reports an outcome.
    ///
    /// Bounded: exceeding `wait.max_wait` yields `Error::BuildTimeout`;
    /// a controller-reported build failure yields `Error::BuildFailed`.
    /// Transport failures while polling are terminal, per the write
    /// path's strict policy.
    pub async fn await_build(&mut self, wait: &BuildWait) -> Result<(), Error> {
        self.expect_state(WorkspaceState::Building, "await_build")?;

        let path = format!(
            "{}?key.workspaceId={}",
            paths::WORKSPACE,
            self.workspace_id
        );
        let started = Instant::now();

        loop {
            let body = match self.client.get_raw(&path, AcceptPayload::Json).await {
                Ok(body) => body,
                Err(e) => {
                    self.state = WorkspaceState::Failed;
                    return Err(e);
                }
            };

            match build_outcome(&crate::ndjson::decode(&body)) {
                Some(Ok(())) => {
                    debug!("workspace {} build ready", self.workspace_id);
                    return Ok(());
                }
                Some(Err(detail)) => {
                    self.state = WorkspaceState::Failed;
                    return Err(Error::BuildFailed {
                        workspace_id: self.workspace_id.clone(),
                        detail,
                    });
                }
                None => {}
            }

            if started.elapsed() >= wait.max_wait {
                self.state = WorkspaceState::Failed;
                return Err(Error::BuildTimeout {
                    workspace_id: self.workspace_id.clone(),
                    waited_secs: wait.max_wait.as_secs(),
                });
            }

            sleep(wait.interval).await;
        }
    }

    /// Submit the workspace, making staged changes durable.
    ///
    /// Returns the decoded submit response, the transaction's result.
    pub async fn submit(&mut self) -> Result<Value, Error> {
        self.expect_state(WorkspaceState::Building, "submit")?;
        let body = self.request_body("REQUEST_SUBMIT");
        let resp = self.post_workspace(&body).await?;
        info!("workspace {} submitted", self.workspace_id);
        self.state = WorkspaceState::Submitted;
        Ok(resp)
    }
}

/// Classify the polled workspace resource into a build outcome.
///
/// The controller reports build progress through `state` /
/// `buildStatus` / `lastBuildStage`-style fields, possibly wrapped in
/// the `{"result":{"value":…}}` streaming envelope. A `*_SUCCESS`
/// marker means ready, a `*_FAIL*` marker means the build failed, and
/// anything else means keep polling.
fn build_outcome(values: &[Value]) -> Option<Result<(), String>> {
    for value in values {
        let obj = value
            .pointer("/result/value")
            .unwrap_or(value);

        for field in ["buildStatus", "lastBuildStage", "state"] {
            let Some(marker) = obj.get(field).and_then(Value::as_str) else {
                continue;
            };
            if marker.contains("SUCCESS") {
                return Some(Ok(()));
            }
            if marker.contains("FAIL") {
                return Some(Err(format!("{field}={marker}")));
            }
        }
    }
    None
}

// ── Orchestration ────────────────────────────────────────────────────

impl CvpClient {
    /// Create a tag through a full workspace transaction.
    ///
    /// Runs create → stage → build → await_build → submit, strictly
    /// sequential, and returns the decoded submit response. Exactly
    /// four POSTs are issued (plus build-status polling GETs); any
    /// failure aborts the remainder of the sequence.
    pub async fn create_tag(&self, tag: &TagMutation, wait: &BuildWait) -> Result<Value, Error> {
        let mut tx = WorkspaceTransaction::new(self);
        info!(
            "creating tag {}={} via workspace {}",
            tag.label,
            tag.value,
            tx.workspace_id()
        );

        tx.create().await?;
        tx.stage(tag).await?;
        tx.build().await?;
        tx.await_build(wait).await?;
        tx.submit().await
    }
}
