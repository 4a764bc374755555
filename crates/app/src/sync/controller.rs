use std::{future, sync::Arc};

use serde_json::Value;
use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
    time::{Instant, sleep_until, timeout},
};
use tracing::{debug, warn};

use crate::{
    domain::{
        drafts::{
            DraftsService, DraftsServiceError,
            models::{Draft, DraftUuid, NewDraft},
        },
        history::{DraftHistoryService, models::NewDraftHistoryEntry},
        users::UserUuid,
    },
    sync::{
        errors::SyncError,
        mirror::LocalMirror,
        settings::SyncSettings,
        status::{SyncState, SyncStatus},
    },
};

/// Result of a save attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// The config was written.
    Saved(Draft),

    /// The config matched the last saved one; nothing was written.
    Unchanged,

    /// There were no edits to save.
    NothingPending,
}

/// Where a restored configuration came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Restored {
    /// The owner's server-side draft.
    Server(Draft),

    /// The local mirror, used only when the server has no draft.
    Mirror(Value),

    /// Nothing to restore.
    Empty,
}

#[derive(Debug)]
enum Command {
    Edit(Value),
    Flush(oneshot::Sender<Result<SaveOutcome, SyncError>>),
    Restore(oneshot::Sender<Result<Restored, SyncError>>),
}

/// Handle to a draft sync session.
///
/// Dropping the handle (or calling [`DraftSync::close`]) stops the session
/// after saving any pending edit.
#[derive(Debug)]
pub struct DraftSync {
    commands: mpsc::Sender<Command>,
    status: watch::Receiver<SyncStatus>,
    task: JoinHandle<()>,
}

impl DraftSync {
    /// Start a session for `owner`.
    pub fn spawn(
        owner: UserUuid,
        drafts: Arc<dyn DraftsService>,
        history: Arc<dyn DraftHistoryService>,
        mirror: Arc<dyn LocalMirror>,
        settings: SyncSettings,
    ) -> Self {
        let (commands, receiver) = mpsc::channel(settings.command_buffer.max(1));
        let (status_sender, status) = watch::channel(SyncStatus::default());

        let actor = SyncActor {
            owner,
            drafts,
            history,
            mirror,
            settings,
            commands: receiver,
            status: status_sender,
            pending: None,
            deadline: None,
            last_saved: None,
            draft: None,
        };

        let task = tokio::spawn(actor.run());

        Self {
            commands,
            status,
            task,
        }
    }

    /// Record an edit; the save is scheduled after the debounce period.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Closed`] if the session has stopped.
    pub async fn edit(&self, config: Value) -> Result<(), SyncError> {
        self.commands
            .send(Command::Edit(config))
            .await
            .map_err(|_closed| SyncError::Closed)
    }

    /// Save any pending edit now.
    ///
    /// # Errors
    ///
    /// Returns the save failure, or [`SyncError::Closed`] if the session has
    /// stopped.
    pub async fn flush(&self) -> Result<SaveOutcome, SyncError> {
        self.request(Command::Flush).await?
    }

    /// Load the owner's draft from the server, falling back to the local
    /// mirror only when the server has none.
    ///
    /// # Errors
    ///
    /// Returns the lookup failure, or [`SyncError::Closed`] if the session
    /// has stopped.
    pub async fn restore(&self) -> Result<Restored, SyncError> {
        self.request(Command::Restore).await?
    }

    /// Current status.
    pub fn status(&self) -> SyncStatus {
        self.status.borrow().clone()
    }

    /// Watch status changes.
    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.status.clone()
    }

    /// Stop the session, saving any pending edit first.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Closed`] if the session task panicked.
    pub async fn close(self) -> Result<(), SyncError> {
        drop(self.commands);

        self.task.await.map_err(|_join_error| SyncError::Closed)
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, SyncError> {
        let (reply, response) = oneshot::channel();

        self.commands
            .send(command(reply))
            .await
            .map_err(|_closed| SyncError::Closed)?;

        response.await.map_err(|_closed| SyncError::Closed)
    }
}

struct SyncActor {
    owner: UserUuid,
    drafts: Arc<dyn DraftsService>,
    history: Arc<dyn DraftHistoryService>,
    mirror: Arc<dyn LocalMirror>,
    settings: SyncSettings,
    commands: mpsc::Receiver<Command>,
    status: watch::Sender<SyncStatus>,

    /// Latest unsaved config.
    pending: Option<Value>,
    deadline: Option<Instant>,

    /// Serialization of the last config the server accepted.
    last_saved: Option<String>,
    draft: Option<DraftUuid>,
}

impl SyncActor {
    async fn run(mut self) {
        loop {
            let deadline = self.deadline;

            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Edit(config)) => self.edit(config),
                    Some(Command::Flush(reply)) => {
                        let outcome = self.save().await;

                        if reply.send(outcome).is_err() {
                            debug!(owner = %self.owner, "flush caller went away");
                        }
                    }
                    Some(Command::Restore(reply)) => {
                        let restored = self.restore().await;

                        if reply.send(restored).is_err() {
                            debug!(owner = %self.owner, "restore caller went away");
                        }
                    }
                    None => {
                        if let Err(error) = self.save().await {
                            warn!(owner = %self.owner, %error, "final draft save failed");
                        }

                        break;
                    }
                },
                () = wait_until(deadline) => {
                    if let Err(error) = self.save().await {
                        warn!(owner = %self.owner, %error, "draft autosave failed");
                    }
                }
            }
        }

        debug!(owner = %self.owner, "draft sync session stopped");
    }

    fn edit(&mut self, config: Value) {
        if let Err(error) = self.mirror.store(self.owner, &config) {
            warn!(owner = %self.owner, %error, "failed to mirror draft locally");
        }

        self.pending = Some(config);
        self.deadline = Some(Instant::now() + self.settings.debounce);

        self.publish(|status| status.state = SyncState::PendingSave);
    }

    async fn save(&mut self) -> Result<SaveOutcome, SyncError> {
        self.deadline = None;

        let Some(config) = self.pending.take() else {
            return Ok(SaveOutcome::NothingPending);
        };

        let encoded = config.to_string();

        if self.last_saved.as_deref() == Some(encoded.as_str()) {
            debug!(owner = %self.owner, "draft unchanged, skipping save");

            self.clear_mirror();
            self.publish(|status| status.state = SyncState::Idle);

            return Ok(SaveOutcome::Unchanged);
        }

        self.publish(|status| status.state = SyncState::Saving);

        let existing = self.draft;
        let request = NewDraft {
            owner: self.owner,
            config: config.clone(),
            draft: existing,
        };

        let error = match timeout(self.settings.save_timeout, self.drafts.upsert_draft(request)).await
        {
            Ok(Ok(draft)) => {
                self.last_saved = Some(encoded);
                self.draft = Some(draft.uuid);

                // An owner upsert can land on a draft saved from another session.
                if existing.is_some() || draft.created_at < draft.updated_at {
                    self.record_history(&draft);
                }

                self.clear_mirror();

                let (uuid, saved_at) = (draft.uuid, draft.updated_at);

                self.publish(|status| {
                    status.state = SyncState::Idle;
                    status.draft = Some(uuid);
                    status.last_saved_at = Some(saved_at);
                    status.last_error = None;
                });

                debug!(owner = %self.owner, draft = %uuid, "draft saved");

                return Ok(SaveOutcome::Saved(draft));
            }
            Ok(Err(DraftsServiceError::NotFound)) if existing.is_some() => {
                // The draft vanished or changed hands; the next save finds or
                // creates the owner's draft instead.
                self.draft = None;

                SyncError::Storage(DraftsServiceError::NotFound)
            }
            Ok(Err(error)) => SyncError::Storage(error),
            Err(_elapsed) => SyncError::Timeout(self.settings.save_timeout),
        };

        warn!(owner = %self.owner, %error, "draft save failed");

        // Kept for the next flush or edit; not retried automatically.
        self.pending = Some(config);

        let message = error.to_string();

        self.publish(|status| {
            status.state = SyncState::Idle;
            status.last_error = Some(message);
        });

        Err(error)
    }

    async fn restore(&mut self) -> Result<Restored, SyncError> {
        let lookup = timeout(
            self.settings.save_timeout,
            self.drafts.get_latest_draft_for_user(self.owner),
        )
        .await
        .map_err(|_elapsed| SyncError::Timeout(self.settings.save_timeout))??;

        if let Some(draft) = lookup {
            self.draft = Some(draft.uuid);
            self.last_saved = Some(draft.config.to_string());

            let (uuid, saved_at) = (draft.uuid, draft.updated_at);

            self.publish(|status| {
                status.draft = Some(uuid);
                status.last_saved_at = Some(saved_at);
            });

            return Ok(Restored::Server(draft));
        }

        match self.mirror.load(self.owner) {
            Ok(Some(config)) => Ok(Restored::Mirror(config)),
            Ok(None) => Ok(Restored::Empty),
            Err(error) => {
                warn!(owner = %self.owner, %error, "failed to read local draft mirror");

                Ok(Restored::Empty)
            }
        }
    }

    /// The server holds the config now.
    fn clear_mirror(&self) {
        if let Err(error) = self.mirror.clear(self.owner) {
            warn!(owner = %self.owner, %error, "failed to clear local draft mirror");
        }
    }

    fn record_history(&self, draft: &Draft) {
        let history = Arc::clone(&self.history);
        let entry = NewDraftHistoryEntry {
            draft: draft.uuid,
            author: self.owner,
            config: draft.config.clone(),
        };

        tokio::spawn(async move {
            let draft = entry.draft;

            if let Err(error) = history.record(entry).await {
                warn!(%draft, %error, "failed to record draft history");
            }
        });
    }

    fn publish(&self, update: impl FnOnce(&mut SyncStatus)) {
        self.status.send_modify(update);
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use async_trait::async_trait;
    use serde_json::json;
    use testresult::TestResult;
    use tokio::time::sleep;

    use super::*;
    use crate::{
        domain::{
            drafts::MemoryDraftsService,
            history::{DraftHistoryService, MemoryDraftHistoryService},
        },
        sync::mirror::MemoryMirror,
    };

    /// Counts writes on top of the in-memory store.
    #[derive(Default)]
    struct CountingDrafts {
        inner: MemoryDraftsService,
        writes: AtomicUsize,
    }

    impl CountingDrafts {
        fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DraftsService for CountingDrafts {
        async fn get_draft(&self, draft: DraftUuid) -> Result<Draft, DraftsServiceError> {
            self.inner.get_draft(draft).await
        }

        async fn get_latest_draft_for_user(
            &self,
            owner: UserUuid,
        ) -> Result<Option<Draft>, DraftsServiceError> {
            self.inner.get_latest_draft_for_user(owner).await
        }

        async fn upsert_draft(&self, draft: NewDraft) -> Result<Draft, DraftsServiceError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.upsert_draft(draft).await
        }
    }

    /// Never answers.
    struct HangingDrafts;

    #[async_trait]
    impl DraftsService for HangingDrafts {
        async fn get_draft(&self, _draft: DraftUuid) -> Result<Draft, DraftsServiceError> {
            future::pending().await
        }

        async fn get_latest_draft_for_user(
            &self,
            _owner: UserUuid,
        ) -> Result<Option<Draft>, DraftsServiceError> {
            future::pending().await
        }

        async fn upsert_draft(&self, _draft: NewDraft) -> Result<Draft, DraftsServiceError> {
            future::pending().await
        }
    }

    struct Session {
        sync: DraftSync,
        drafts: Arc<CountingDrafts>,
        history: Arc<MemoryDraftHistoryService>,
        mirror: Arc<MemoryMirror>,
        owner: UserUuid,
    }

    fn session() -> Session {
        let drafts = Arc::new(CountingDrafts::default());
        let history = Arc::new(MemoryDraftHistoryService::new());
        let mirror = Arc::new(MemoryMirror::default());
        let owner = UserUuid::new();

        let sync = DraftSync::spawn(
            owner,
            drafts.clone(),
            history.clone(),
            mirror.clone(),
            SyncSettings::default(),
        );

        Session {
            sync,
            drafts,
            history,
            mirror,
            owner,
        }
    }

    fn config(weight: u32) -> Value {
        json!({ "productType": "cake", "weightKg": weight })
    }

    #[tokio::test(start_paused = true)]
    async fn edits_within_the_debounce_window_save_once() -> TestResult {
        let s = session();

        s.sync.edit(config(1)).await?;
        sleep(Duration::from_secs(10)).await;
        s.sync.edit(config(2)).await?;
        sleep(Duration::from_secs(25)).await;

        assert_eq!(s.drafts.writes(), 0, "debounce restarted by the second edit");
        assert_eq!(s.sync.status().state, SyncState::PendingSave, "still pending");

        sleep(Duration::from_secs(10)).await;

        assert_eq!(s.drafts.writes(), 1, "one write for both edits");

        let saved = s.drafts.get_latest_draft_for_user(s.owner).await?;

        assert_eq!(saved.map(|d| d.config), Some(config(2)), "latest edit saved");
        assert_eq!(s.sync.status().state, SyncState::Idle, "back to idle");

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn unchanged_config_is_not_written_again() -> TestResult {
        let s = session();

        s.sync.edit(config(1)).await?;
        sleep(Duration::from_secs(31)).await;
        s.sync.edit(config(1)).await?;

        assert_eq!(s.sync.flush().await?, SaveOutcome::Unchanged, "no-op flush");
        assert_eq!(s.drafts.writes(), 1, "single write");

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn flush_saves_immediately() -> TestResult {
        let s = session();

        s.sync.edit(config(3)).await?;

        let outcome = s.sync.flush().await?;

        assert!(
            matches!(&outcome, SaveOutcome::Saved(draft) if draft.config == config(3)),
            "expected saved draft, got {outcome:?}"
        );
        assert_eq!(s.sync.flush().await?, SaveOutcome::NothingPending, "nothing left");

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn history_is_recorded_for_updates_only() -> TestResult {
        let s = session();

        s.sync.edit(config(1)).await?;

        s.sync.flush().await?;

        let created = s
            .drafts
            .get_latest_draft_for_user(s.owner)
            .await?
            .ok_or(DraftsServiceError::NotFound)?;

        s.sync.edit(config(2)).await?;
        s.sync.flush().await?;

        let mut entries = Vec::new();

        for _ in 0..10 {
            entries = s.history.list_for_draft(created.uuid).await?;

            if !entries.is_empty() {
                break;
            }

            sleep(Duration::from_millis(1)).await;
        }

        assert_eq!(entries.len(), 1, "one entry, for the update");
        assert_eq!(entries.first().map(|e| &e.config), Some(&config(2)), "snapshot of update");

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn overwriting_another_sessions_draft_is_recorded() -> TestResult {
        let s = session();

        let elsewhere = s
            .drafts
            .upsert_draft(NewDraft {
                owner: s.owner,
                config: config(1),
                draft: None,
            })
            .await?;

        // Keep the overwrite's timestamp strictly after creation.
        std::thread::sleep(Duration::from_millis(2));

        s.sync.edit(config(6)).await?;

        let outcome = s.sync.flush().await?;

        assert!(
            matches!(&outcome, SaveOutcome::Saved(draft) if draft.uuid == elsewhere.uuid),
            "expected the existing draft to be updated, got {outcome:?}"
        );

        let mut entries = Vec::new();

        for _ in 0..10 {
            entries = s.history.list_for_draft(elsewhere.uuid).await?;

            if !entries.is_empty() {
                break;
            }

            sleep(Duration::from_millis(1)).await;
        }

        assert_eq!(entries.len(), 1, "overwrite recorded");
        assert_eq!(entries.first().map(|e| &e.config), Some(&config(6)), "snapshot of overwrite");

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn successful_save_clears_the_mirror() -> TestResult {
        let s = session();

        s.sync.edit(config(2)).await?;

        assert_eq!(s.mirror.load(s.owner)?, Some(config(2)), "mirrored while pending");

        s.sync.flush().await?;

        assert_eq!(s.mirror.load(s.owner)?, None, "cleared once saved");

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn hung_save_times_out_and_keeps_the_mirror() -> TestResult {
        let mirror = Arc::new(MemoryMirror::default());
        let owner = UserUuid::new();

        let sync = DraftSync::spawn(
            owner,
            Arc::new(HangingDrafts),
            Arc::new(MemoryDraftHistoryService::new()),
            mirror.clone(),
            SyncSettings::default(),
        );

        sync.edit(config(7)).await?;

        let result = sync.flush().await;

        assert!(
            matches!(result, Err(SyncError::Timeout(timeout)) if timeout == Duration::from_secs(10)),
            "expected timeout, got {result:?}"
        );

        let status = sync.status();

        assert_eq!(status.state, SyncState::Idle, "idle after failure");
        assert!(status.last_error.is_some(), "error surfaced");
        assert_eq!(mirror.load(owner)?, Some(config(7)), "edit kept locally");

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn restore_prefers_server_then_mirror() -> TestResult {
        let s = session();

        assert_eq!(s.sync.restore().await?, Restored::Empty, "nothing anywhere");

        s.mirror.store(s.owner, &config(4))?;

        assert_eq!(s.sync.restore().await?, Restored::Mirror(config(4)), "mirror fallback");

        s.drafts
            .upsert_draft(NewDraft {
                owner: s.owner,
                config: config(5),
                draft: None,
            })
            .await?;

        let restored = s.sync.restore().await?;

        assert!(
            matches!(&restored, Restored::Server(draft) if draft.config == config(5)),
            "expected server draft, got {restored:?}"
        );

        // The restored config counts as saved.
        s.sync.edit(config(5)).await?;

        assert_eq!(s.sync.flush().await?, SaveOutcome::Unchanged, "restored config not rewritten");

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn close_saves_pending_edit() -> TestResult {
        let s = session();

        s.sync.edit(config(8)).await?;
        s.sync.close().await?;

        assert_eq!(s.drafts.writes(), 1, "pending edit saved on close");

        Ok(())
    }
}
