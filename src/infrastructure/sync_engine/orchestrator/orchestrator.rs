//! Sync Orchestrator Implementation
//!

use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, trace, warn};
use tokio::sync::{mpsc, watch};

use crate::{
    domain::synchronization::{
        authenticator::Authenticator,
        download_stage::DownloadStages,
        notifier::{Notification, SyncNotifier},
        sync_plan::{PlannedStage, StagePlan},
        value_objects::{
            category::SyncCategory,
            stage_outcome::{StageOutcome, StageStatus},
            sync_config::OrchestratorConfig,
            sync_event::{SyncEvent, SyncReport},
            sync_request::SyncRequest,
        },
    },
    infrastructure::{
        mq::progress_publisher::ProgressPublisher,
        sync_engine::{orchestrator_proxy::SyncHandle, sync_time_tracker::SyncTimeTracker},
    },
};

use super::commands::{OrchestratorState, SyncCommand};

pub struct SyncOrchestrator {
    config: OrchestratorConfig,
    authenticator: Arc<dyn Authenticator>,
    stages: DownloadStages,
    tracker: SyncTimeTracker,
    publisher: ProgressPublisher,
    notifier: Arc<dyn SyncNotifier>,
    cmd_rx: mpsc::Receiver<SyncCommand>,
    state_tx: watch::Sender<OrchestratorState>,
}

impl SyncOrchestrator {
    pub fn new(
        config: OrchestratorConfig,
        authenticator: Arc<dyn Authenticator>,
        stages: DownloadStages,
        tracker: SyncTimeTracker,
        notifier: Arc<dyn SyncNotifier>,
    ) -> (Self, SyncHandle) {
        let (cmd_tx, cmd_rx) = mpsc::channel::<SyncCommand>(config.request_queue_size());
        let (state_tx, state_rx) = watch::channel(OrchestratorState::Idle);
        let publisher = ProgressPublisher::new(config.event_channel_size());

        let handle = SyncHandle::new(cmd_tx, publisher.clone(), state_rx, tracker.clone());
        let orchestrator = Self {
            config,
            authenticator,
            stages,
            tracker,
            publisher,
            notifier,
            cmd_rx,
            state_tx,
        };

        (orchestrator, handle)
    }

    pub async fn run(mut self) {
        info!("Sync orchestrator started");

        while let Some(command) = self.cmd_rx.recv().await {
            match command {
                SyncCommand::Sync { request, reply_tx } => {
                    let report = self.handle_request(request).await;
                    self.set_state(OrchestratorState::Idle);
                    if let Some(reply_tx) = reply_tx {
                        if reply_tx.send(report).is_err() {
                            debug!("Sync caller went away before the report was ready");
                        }
                    }
                }
                SyncCommand::Shutdown { reply_tx } => {
                    info!("Shutdown command received!");
                    self.cmd_rx.close();
                    while let Ok(dropped) = self.cmd_rx.try_recv() {
                        if let SyncCommand::Sync { request, .. } = dropped {
                            warn!(
                                "Dropping {} sync request {} queued behind shutdown",
                                request.category(),
                                request.id()
                            );
                        }
                    }
                    self.set_state(OrchestratorState::Stopped);
                    if reply_tx.send(()).is_err() {
                        debug!("Shutdown caller went away before the orchestrator stopped");
                    }
                    break;
                }
            }
        }

        self.set_state(OrchestratorState::Stopped);
        info!("Sync orchestrator is down.");
    }

    async fn handle_request(&self, request: SyncRequest) -> SyncReport {
        let request_id = *request.id();
        let category = request.category();
        info!("Handling {} sync request {}", category, request_id);
        self.notifier
            .notify(Notification::running(&request.target().start_message()));

        self.set_state(OrchestratorState::Authenticating);
        let auth_status = self.authenticator.authenticate(request.credentials()).await;
        if !auth_status.is_success() {
            warn!(
                "Authentication for request {} failed: {}",
                request_id, auth_status
            );
            self.set_state(OrchestratorState::AuthFailed);
            let event = SyncEvent::authentication_failed(request_id, category, auth_status);
            let events = vec![self.publish(event)];
            return self.finish(SyncReport::new(request_id, category, events));
        }

        let plan = StagePlan::for_target(request.target(), self.config.patient_chain_policy());
        let mut events = Vec::with_capacity(plan.len());
        // previous planned stage, with its status if it ran
        let mut previous: Option<(SyncCategory, Option<StageStatus>)> = None;

        for planned in plan.stages() {
            let predecessor = previous.and_then(|(c, status)| status.map(|s| (c, s)));
            let event = if planned.gate().is_open(predecessor) {
                let outcome = self.run_stage(planned).await;
                previous = Some((planned.category(), Some(outcome.status())));
                SyncEvent::stage_completed(request_id, planned.category(), &outcome)
            } else {
                let blocked_by = previous.map(|(c, _)| c).unwrap_or(category);
                info!(
                    "Skipping {} for request {}, blocked by {}",
                    planned.category(),
                    request_id,
                    blocked_by
                );
                previous = Some((planned.category(), None));
                SyncEvent::stage_skipped(request_id, planned.category(), blocked_by)
            };

            if event.primary_count().is_some() {
                self.notifier.notify(Notification::running(event.message()));
            }
            events.push(self.publish(event));
        }

        self.set_state(OrchestratorState::Done);
        self.finish(SyncReport::new(request_id, category, events))
    }

    async fn run_stage(&self, planned: &PlannedStage) -> StageOutcome {
        let category = planned.category();
        self.set_state(OrchestratorState::StageRunning(category));

        let outcome = self.stages.get(category).run(planned.params()).await;
        match outcome.status() {
            StageStatus::Success => info!(
                "{} stage downloaded {} entities",
                category,
                outcome.success_count()
            ),
            StageStatus::PartialFailure => warn!(
                "{} stage downloaded {} of {} entities",
                category,
                outcome.success_count(),
                outcome.total_count()
            ),
            status => warn!("{} stage failed: {}", category, status),
        }

        if planned.records_sync_time() {
            self.tracker
                .record_success(category, outcome.status(), Utc::now());
        }
        outcome
    }

    fn publish(&self, event: SyncEvent) -> SyncEvent {
        let n_subscribers = self.publisher.publish(event.clone());
        trace!(
            "{} event for request {} reached {} subscribers",
            event.category(),
            event.request_id(),
            n_subscribers
        );
        event
    }

    fn finish(&self, report: SyncReport) -> SyncReport {
        if let Some(message) = report.last_message() {
            self.notifier.notify(Notification::finished(message));
        }
        info!(
            "Finished {} sync request {} with {} events",
            report.category(),
            report.request_id(),
            report.events().len()
        );
        report
    }

    fn set_state(&self, state: OrchestratorState) {
        trace!("Orchestrator state -> {:?}", state);
        self.state_tx.send_replace(state);
    }
}
