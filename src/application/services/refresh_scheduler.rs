//! Refresh scheduling for the unread badge.
//!
//! A scheduler owns every reason to recompute the count: activation, a
//! polling timer, lifecycle and focus events, and explicit requests. It runs
//! at most one ordinary pass at a time and tags each pass with a sequence
//! number so late results can be told apart from current ones.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::unread_service::UnreadService;
use crate::domain::entities::UnreadCount;
use crate::domain::refresh::{LifecycleEvent, RefreshTrigger, SchedulerState};

/// Default polling interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Scheduler tuning.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Time between timer-driven passes.
    pub poll_interval: Duration,
    /// Refresh when the application returns to the foreground.
    pub refresh_on_foreground: bool,
    /// Refresh when the hosting screen regains focus.
    pub refresh_on_focus: bool,
    /// Skip timer ticks while the application is in the background.
    pub pause_in_background: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            refresh_on_foreground: true,
            refresh_on_focus: true,
            pause_in_background: true,
        }
    }
}

/// What happened to a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// A pass with this sequence number was started.
    Started(u64),
    /// A pass was already in flight; the trigger was dropped.
    Coalesced,
    /// The scheduler is stopped.
    Ignored,
}

#[derive(Debug, Default)]
struct Ledger {
    state: SchedulerState,
    /// Last sequence number handed out.
    issued: u64,
    /// Sequence number of the last result written to the count.
    accepted: u64,
    /// Results below this sequence number are void.
    floor: u64,
}

impl Ledger {
    fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }
}

struct Shared {
    service: Arc<UnreadService>,
    ledger: Mutex<Ledger>,
    count_tx: watch::Sender<UnreadCount>,
    cancel: CancellationToken,
}

impl Shared {
    fn trigger(self: &Arc<Self>, trigger: RefreshTrigger) -> TriggerOutcome {
        let seq = {
            let mut ledger = self.ledger.lock();
            match ledger.state {
                SchedulerState::Stopped => return TriggerOutcome::Ignored,
                SchedulerState::Refreshing => {
                    debug!(%trigger, in_flight = ledger.issued, "Refresh in flight, coalescing");
                    return TriggerOutcome::Coalesced;
                }
                SchedulerState::Idle => {
                    ledger.state = SchedulerState::Refreshing;
                    ledger.issue()
                }
            }
        };

        self.spawn_pass(seq, trigger);
        TriggerOutcome::Started(seq)
    }

    fn force(self: &Arc<Self>, trigger: RefreshTrigger) -> TriggerOutcome {
        let seq = {
            let mut ledger = self.ledger.lock();
            if ledger.state == SchedulerState::Stopped {
                return TriggerOutcome::Ignored;
            }
            ledger.state = SchedulerState::Refreshing;
            let seq = ledger.issue();
            ledger.floor = seq;
            seq
        };

        self.spawn_pass(seq, trigger);
        TriggerOutcome::Started(seq)
    }

    fn publish_local(&self, count: UnreadCount) -> bool {
        let mut ledger = self.ledger.lock();
        if ledger.state == SchedulerState::Stopped {
            return false;
        }

        let seq = ledger.issue();
        ledger.floor = seq;
        ledger.accepted = seq;
        ledger.state = SchedulerState::Idle;
        self.publish(count);
        debug!(seq, %count, "Accepted local count");
        true
    }

    fn spawn_pass(self: &Arc<Self>, seq: u64, trigger: RefreshTrigger) {
        let shared = Arc::clone(self);
        trace!(seq, %trigger, "Starting reconciliation pass");

        tokio::spawn(async move {
            let previous = *shared.count_tx.borrow();
            let result = tokio::select! {
                biased;
                () = shared.cancel.cancelled() => {
                    trace!(seq, "Pass abandoned on teardown");
                    return;
                }
                result = shared.service.refresh(previous) => result,
            };

            let mut ledger = shared.ledger.lock();
            if ledger.state == SchedulerState::Stopped {
                debug!(seq, "Discarding pass result after stop");
                return;
            }
            if ledger.issued == seq {
                ledger.state = SchedulerState::Idle;
            }
            if seq < ledger.floor || seq <= ledger.accepted {
                debug!(
                    seq,
                    accepted = ledger.accepted,
                    floor = ledger.floor,
                    "Discarding stale pass result"
                );
                return;
            }

            ledger.accepted = seq;
            shared.publish(result.count);
            debug!(seq, count = %result.count, source = ?result.source, "Accepted pass result");
        });
    }

    fn publish(&self, count: UnreadCount) {
        self.count_tx.send_if_modified(|current| {
            if *current == count {
                false
            } else {
                *current = count;
                true
            }
        });
    }

    async fn drive(
        self: Arc<Self>,
        config: SchedulerConfig,
        mut lifecycle: broadcast::Receiver<LifecycleEvent>,
    ) {
        let period = config.poll_interval;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut foreground = true;
        let mut events_open = true;

        loop {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                _ = ticker.tick() => {
                    if foreground || !config.pause_in_background {
                        self.trigger(RefreshTrigger::Timer);
                    } else {
                        trace!("Skipping timer tick in background");
                    }
                }
                event = lifecycle.recv(), if events_open => match event {
                    Ok(LifecycleEvent::Foreground) => {
                        foreground = true;
                        if config.refresh_on_foreground {
                            self.trigger(RefreshTrigger::Foreground);
                        }
                    }
                    Ok(LifecycleEvent::Background) => foreground = false,
                    Ok(LifecycleEvent::FocusGained) => {
                        if config.refresh_on_focus {
                            self.trigger(RefreshTrigger::FocusGained);
                        }
                    }
                    Ok(LifecycleEvent::FocusLost) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "Lifecycle events lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!("Lifecycle channel closed");
                        events_open = false;
                    }
                },
            }
        }

        debug!("Refresh driver stopped");
    }
}

/// Drives reconciliation passes and owns the displayed count.
pub struct RefreshScheduler {
    shared: Arc<Shared>,
    config: SchedulerConfig,
    driver: Mutex<Option<JoinHandle<()>>>,
}

impl RefreshScheduler {
    /// Creates an idle scheduler. Nothing runs until [`Self::start`] or a
    /// trigger.
    #[must_use]
    pub fn new(service: Arc<UnreadService>, config: SchedulerConfig) -> Self {
        let (count_tx, _) = watch::channel(UnreadCount::ZERO);

        Self {
            shared: Arc::new(Shared {
                service,
                ledger: Mutex::new(Ledger::default()),
                count_tx,
                cancel: CancellationToken::new(),
            }),
            config,
            driver: Mutex::new(None),
        }
    }

    /// Runs the activation pass and starts the timer and lifecycle driver.
    ///
    /// Calling this twice, or after [`Self::stop`], does nothing.
    pub fn start(&self, lifecycle: broadcast::Receiver<LifecycleEvent>) {
        let mut driver = self.driver.lock();
        if driver.is_some() || self.state() == SchedulerState::Stopped {
            return;
        }

        self.shared.trigger(RefreshTrigger::Activation);
        let shared = Arc::clone(&self.shared);
        *driver = Some(tokio::spawn(shared.drive(self.config.clone(), lifecycle)));
        debug!(interval = ?self.config.poll_interval, "Refresh scheduler started");
    }

    /// Requests a pass. Coalesced while another pass is in flight.
    pub fn trigger(&self, trigger: RefreshTrigger) -> TriggerOutcome {
        self.shared.trigger(trigger)
    }

    /// Starts a pass that supersedes any pass already in flight.
    ///
    /// Use after a local mutation of the read set: results of passes that
    /// began before the mutation are discarded.
    pub fn force_refresh(&self) -> TriggerOutcome {
        self.shared.force(RefreshTrigger::UserAction)
    }

    /// Publishes a locally known count and voids every in-flight pass.
    ///
    /// Returns `false` once stopped.
    pub fn publish_local(&self, count: UnreadCount) -> bool {
        self.shared.publish_local(count)
    }

    /// Cancels the timer, unsubscribes from lifecycle events and voids any
    /// in-flight pass. Terminal.
    pub fn stop(&self) {
        {
            let mut ledger = self.shared.ledger.lock();
            if ledger.state == SchedulerState::Stopped {
                return;
            }
            ledger.state = SchedulerState::Stopped;
        }

        self.shared.cancel.cancel();
        if let Some(handle) = self.driver.lock().take() {
            handle.abort();
        }
        debug!("Refresh scheduler stopped");
    }

    /// Current scheduler state.
    #[must_use]
    pub fn state(&self) -> SchedulerState {
        self.shared.ledger.lock().state
    }

    /// Currently displayed unread count.
    #[must_use]
    pub fn unread_count(&self) -> UnreadCount {
        *self.shared.count_tx.borrow()
    }

    /// Subscribes to count changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<UnreadCount> {
        self.shared.count_tx.subscribe()
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::AnnouncementRepository;
    use crate::domain::entities::{Announcement, UserIdentity};
    use crate::domain::ports::mocks::{FixedIdentity, MockKeyValueStore, ScriptedAnnouncementSource};
    use crate::domain::refresh::SyncMode;

    const IDENTITY: &str = "1024";

    async fn settle() {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }

    fn remote_scheduler(
        mode: SyncMode,
    ) -> (Arc<ScriptedAnnouncementSource>, RefreshScheduler) {
        let remote = Arc::new(ScriptedAnnouncementSource::new());
        let service = UnreadService::new(
            Arc::new(FixedIdentity::signed_in(IDENTITY)),
            AnnouncementRepository::new(Arc::new(MockKeyValueStore::new())),
            Some(remote.clone()),
            mode,
        );
        let scheduler = RefreshScheduler::new(Arc::new(service), SchedulerConfig::default());
        (remote, scheduler)
    }

    struct LocalFixture {
        repository: AnnouncementRepository,
        identity: UserIdentity,
        scheduler: RefreshScheduler,
    }

    impl LocalFixture {
        fn new(config: SchedulerConfig) -> Self {
            let repository = AnnouncementRepository::new(Arc::new(MockKeyValueStore::new()));
            let service = UnreadService::new(
                Arc::new(FixedIdentity::signed_in(IDENTITY)),
                repository.clone(),
                None,
                SyncMode::Local,
            );
            Self {
                repository,
                identity: UserIdentity::new(IDENTITY).unwrap(),
                scheduler: RefreshScheduler::new(Arc::new(service), config),
            }
        }

        async fn announce(&self, ids: &[&str]) {
            let announcements: Vec<Announcement> =
                ids.iter().map(|id| Announcement::new(*id)).collect();
            self.repository
                .save_announcements(&self.identity, &announcements)
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_start_runs_activation_pass() {
        let fx = LocalFixture::new(SchedulerConfig::default());
        fx.announce(&["a1", "a2", "a3"]).await;
        let (_tx, rx) = broadcast::channel(4);

        assert_eq!(fx.scheduler.state(), SchedulerState::Idle);
        fx.scheduler.start(rx);
        settle().await;

        assert_eq!(fx.scheduler.unread_count().get(), 3);
        assert_eq!(fx.scheduler.state(), SchedulerState::Idle);
    }

    #[tokio::test]
    async fn test_triggers_coalesce_while_refreshing() {
        let (remote, scheduler) = remote_scheduler(SyncMode::Count);
        let release = remote.push_count_gated(Ok(4));

        assert_eq!(
            scheduler.trigger(RefreshTrigger::UserAction),
            TriggerOutcome::Started(1)
        );
        settle().await;
        assert_eq!(scheduler.state(), SchedulerState::Refreshing);

        assert_eq!(
            scheduler.trigger(RefreshTrigger::Timer),
            TriggerOutcome::Coalesced
        );
        assert_eq!(
            scheduler.trigger(RefreshTrigger::FocusGained),
            TriggerOutcome::Coalesced
        );
        settle().await;
        assert_eq!(remote.calls(), 1);

        release.send(()).unwrap();
        settle().await;

        assert_eq!(scheduler.unread_count().get(), 4);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(remote.calls(), 1);
    }

    #[tokio::test]
    async fn test_superseded_pass_result_is_discarded() {
        let (remote, scheduler) = remote_scheduler(SyncMode::Count);
        let release_first = remote.push_count_gated(Ok(7));
        remote.push_count(Ok(2));

        assert_eq!(
            scheduler.trigger(RefreshTrigger::Timer),
            TriggerOutcome::Started(1)
        );
        settle().await;
        assert_eq!(scheduler.force_refresh(), TriggerOutcome::Started(2));
        settle().await;
        assert_eq!(scheduler.unread_count().get(), 2);

        release_first.send(()).unwrap();
        settle().await;

        assert_eq!(scheduler.unread_count().get(), 2);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[tokio::test]
    async fn test_stop_discards_in_flight_result() {
        let (remote, scheduler) = remote_scheduler(SyncMode::Count);
        let release = remote.push_count_gated(Ok(5));
        let mut rx = scheduler.subscribe();

        scheduler.trigger(RefreshTrigger::Activation);
        settle().await;
        scheduler.stop();
        let _ = release.send(());
        settle().await;

        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        assert!(scheduler.unread_count().is_zero());
        assert!(!rx.has_changed().unwrap());
        assert_eq!(
            scheduler.trigger(RefreshTrigger::Timer),
            TriggerOutcome::Ignored
        );
        assert_eq!(scheduler.force_refresh(), TriggerOutcome::Ignored);
        assert!(!scheduler.publish_local(UnreadCount::new(1)));
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_displayed_count() {
        let (remote, scheduler) = remote_scheduler(SyncMode::Count);
        remote.push_count(Ok(3));
        remote.push_count(Err(crate::domain::errors::RemoteError::network("offline")));

        scheduler.trigger(RefreshTrigger::Activation);
        settle().await;
        assert_eq!(scheduler.unread_count().get(), 3);

        scheduler.trigger(RefreshTrigger::Timer);
        settle().await;
        assert_eq!(scheduler.unread_count().get(), 3);
    }

    #[tokio::test]
    async fn test_publish_local_voids_in_flight_pass() {
        let (remote, scheduler) = remote_scheduler(SyncMode::Count);
        let release = remote.push_count_gated(Ok(6));

        scheduler.trigger(RefreshTrigger::Timer);
        settle().await;
        assert!(scheduler.publish_local(UnreadCount::ZERO));
        assert_eq!(scheduler.state(), SchedulerState::Idle);

        release.send(()).unwrap();
        settle().await;

        assert!(scheduler.unread_count().is_zero());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_drives_passes() {
        let config = SchedulerConfig {
            poll_interval: Duration::from_secs(10),
            ..SchedulerConfig::default()
        };
        let fx = LocalFixture::new(config);
        fx.announce(&["a1"]).await;
        let (_tx, rx) = broadcast::channel(4);

        fx.scheduler.start(rx);
        settle().await;
        assert_eq!(fx.scheduler.unread_count().get(), 1);

        fx.announce(&["a1", "a2"]).await;
        tokio::time::advance(Duration::from_secs(5)).await;
        settle().await;
        assert_eq!(fx.scheduler.unread_count().get(), 1);

        tokio::time::advance(Duration::from_secs(5)).await;
        settle().await;
        assert_eq!(fx.scheduler.unread_count().get(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_pauses_timer_and_foreground_refreshes() {
        let config = SchedulerConfig {
            poll_interval: Duration::from_secs(10),
            ..SchedulerConfig::default()
        };
        let fx = LocalFixture::new(config);
        let (tx, rx) = broadcast::channel(4);

        fx.scheduler.start(rx);
        settle().await;
        tx.send(LifecycleEvent::Background).unwrap();
        settle().await;

        fx.announce(&["a1", "a2"]).await;
        tokio::time::advance(Duration::from_secs(25)).await;
        settle().await;
        assert!(fx.scheduler.unread_count().is_zero());

        tx.send(LifecycleEvent::Foreground).unwrap();
        settle().await;
        assert_eq!(fx.scheduler.unread_count().get(), 2);
    }

    #[tokio::test]
    async fn test_focus_gained_refreshes() {
        let fx = LocalFixture::new(SchedulerConfig {
            poll_interval: Duration::from_secs(3600),
            ..SchedulerConfig::default()
        });
        let (tx, rx) = broadcast::channel(4);

        fx.scheduler.start(rx);
        settle().await;
        fx.announce(&["a1"]).await;

        tx.send(LifecycleEvent::FocusLost).unwrap();
        settle().await;
        assert!(fx.scheduler.unread_count().is_zero());

        tx.send(LifecycleEvent::FocusGained).unwrap();
        settle().await;
        assert_eq!(fx.scheduler.unread_count().get(), 1);
    }

    #[tokio::test]
    async fn test_stop_unsubscribes_from_lifecycle() {
        let fx = LocalFixture::new(SchedulerConfig::default());
        let (tx, rx) = broadcast::channel(4);

        fx.scheduler.start(rx);
        settle().await;
        assert_eq!(tx.receiver_count(), 1);

        fx.scheduler.stop();
        settle().await;

        assert_eq!(tx.receiver_count(), 0);
    }

    #[tokio::test]
    async fn test_anonymous_scheduler_reports_zero_without_io() {
        let store = Arc::new(MockKeyValueStore::new());
        let remote = Arc::new(ScriptedAnnouncementSource::new());
        let service = UnreadService::new(
            Arc::new(FixedIdentity::anonymous()),
            AnnouncementRepository::new(store.clone()),
            Some(remote.clone()),
            SyncMode::List,
        );
        let scheduler = RefreshScheduler::new(Arc::new(service), SchedulerConfig::default());
        let (_tx, rx) = broadcast::channel(4);

        scheduler.start(rx);
        settle().await;

        assert!(scheduler.unread_count().is_zero());
        assert_eq!(store.accesses(), 0);
        assert_eq!(remote.calls(), 0);
    }
}
