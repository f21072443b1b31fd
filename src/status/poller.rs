// src/status/poller.rs
use std::sync::atomic::{ AtomicBool, Ordering };
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use log::{ debug, error, info };
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use crate::models::cycle::{ EndpointOutcome, PollCycle };
use crate::models::endpoint::Endpoint;
use crate::models::status::ServerStatus;
use crate::status::check::StatusCheck;
use crate::view::ViewSink;

/// The single "poll in progress" flag and the recurring schedule, if any.
#[derive(Debug, Default)]
pub struct PollerState {
    polling: AtomicBool,
    schedule: Mutex<Option<JoinHandle<()>>>,
}

impl PollerState {
    /// Claims the flag. False if a cycle already holds it.
    pub fn try_begin_cycle(&self) -> bool {
        self.polling
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn end_cycle(&self) {
        self.polling.store(false, Ordering::Release);
    }

    pub fn is_polling(&self) -> bool {
        self.polling.load(Ordering::Acquire)
    }

    pub fn is_scheduled(&self) -> bool {
        self.schedule.lock().as_ref().is_some_and(|handle| !handle.is_finished())
    }

    fn set_schedule(&self, handle: JoinHandle<()>) {
        if let Some(previous) = self.schedule.lock().replace(handle) {
            previous.abort();
        }
    }

    /// Cancels the recurring schedule. A cycle already running finishes.
    pub fn stop_schedule(&self) {
        if let Some(handle) = self.schedule.lock().take() {
            handle.abort();
        }
    }
}

struct CycleGuard<'a>(&'a PollerState);

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.0.end_cycle();
    }
}

pub struct StatusPoller<C, V> {
    endpoints: Vec<Endpoint>,
    check: Arc<C>,
    view: Arc<V>,
    state: PollerState,
}

impl<C, V> StatusPoller<C, V>
where
    C: StatusCheck + 'static,
    V: ViewSink + 'static,
{
    pub fn new(endpoints: Vec<Endpoint>, check: Arc<C>, view: Arc<V>) -> Self {
        Self {
            endpoints,
            check,
            view,
            state: PollerState::default(),
        }
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn state(&self) -> &PollerState {
        &self.state
    }

    /// Runs one cycle over every endpoint. Returns `None` without doing
    /// anything if another cycle is still in flight.
    pub async fn poll_all(&self) -> Option<PollCycle> {
        if !self.state.try_begin_cycle() {
            debug!("Poll cycle already in progress, skipping");
            return None;
        }
        Some(self.run_cycle().await)
    }

    /// Manual refresh. Starts a cycle in the background and reports whether
    /// one was actually started.
    pub fn request_refresh(self: &Arc<Self>) -> bool {
        if !self.state.try_begin_cycle() {
            debug!("Refresh requested while polling, ignored");
            return false;
        }
        let poller = Arc::clone(self);
        tokio::spawn(async move {
            poller.run_cycle().await;
        });
        true
    }

    /// Polls immediately, then on every `every` tick while no cycle is
    /// running. The handle is kept in the poller state, replacing any
    /// earlier schedule, until `stop_schedule`.
    pub fn spawn_schedule(self: Arc<Self>, every: Duration) {
        let poller = Arc::clone(&self);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if poller.state.is_polling() {
                    debug!("Scheduled poll skipped, previous cycle still running");
                    continue;
                }
                poller.poll_all().await;
            }
        });
        self.state.set_schedule(handle);
    }

    /// Caller must hold the in-progress flag.
    async fn run_cycle(&self) -> PollCycle {
        let _guard = CycleGuard(&self.state);
        let id = Uuid::new_v4();
        info!("Poll cycle {} started for {} endpoints", id, self.endpoints.len());

        for endpoint in &self.endpoints {
            self.view.render_loading(&endpoint.id);
        }

        // Each check is its own task so a panic in one cannot take down
        // its siblings.
        let handles = self.endpoints.iter().cloned().map(|endpoint| {
            let check = Arc::clone(&self.check);
            tokio::spawn(async move { check.check(&endpoint).await })
        });
        let settled = join_all(handles).await;

        let results = self.endpoints
            .iter()
            .zip(settled)
            .map(|(endpoint, joined)| {
                let outcome = match joined {
                    Ok(status) => EndpointOutcome::Checked(status),
                    Err(e) => {
                        error!("Status check task for {} died: {}", endpoint.id, e);
                        EndpointOutcome::Failed
                    }
                };
                (endpoint.id.clone(), outcome)
            })
            .collect();
        let cycle = PollCycle::new(id, results);

        for (endpoint, (_, outcome)) in self.endpoints.iter().zip(&cycle.results) {
            match outcome {
                EndpointOutcome::Checked(status) => self.view.render_endpoint(&endpoint.id, status),
                EndpointOutcome::Failed => {
                    let offline = ServerStatus::offline(endpoint.default_max_players);
                    self.view.render_endpoint(&endpoint.id, &offline);
                }
            }
        }
        self.view.render_summary(&cycle.summary);

        info!(
            "Poll cycle {} finished: {}/{} online, {} players, {}% uptime",
            id,
            cycle.summary.online_count,
            cycle.summary.total_endpoints,
            cycle.summary.total_players,
            cycle.summary.uptime_percent
        );
        cycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cycle::PollSummary;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Semaphore;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Loading(String),
        Endpoint(String, ServerStatus),
        Summary(PollSummary),
    }

    #[derive(Default)]
    struct RecordingView {
        events: Mutex<Vec<Event>>,
    }

    impl ViewSink for RecordingView {
        fn render_loading(&self, endpoint_id: &str) {
            self.events.lock().push(Event::Loading(endpoint_id.to_string()));
        }

        fn render_endpoint(&self, endpoint_id: &str, status: &ServerStatus) {
            self.events.lock().push(Event::Endpoint(endpoint_id.to_string(), status.clone()));
        }

        fn render_summary(&self, summary: &PollSummary) {
            self.events.lock().push(Event::Summary(*summary));
        }
    }

    impl RecordingView {
        fn summaries(&self) -> usize {
            self.events.lock().iter().filter(|e| matches!(e, Event::Summary(_))).count()
        }
    }

    /// Canned statuses per endpoint id; `None` panics inside the check.
    struct CannedCheck {
        statuses: HashMap<String, Option<ServerStatus>>,
        gate: Semaphore,
        calls: AtomicUsize,
    }

    impl CannedCheck {
        fn new(statuses: Vec<(&str, Option<ServerStatus>)>, open: bool) -> Self {
            Self {
                statuses: statuses.into_iter().map(|(id, s)| (id.to_string(), s)).collect(),
                gate: Semaphore::new(if open { 1_000 } else { 0 }),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl StatusCheck for CannedCheck {
        async fn check(&self, endpoint: &Endpoint) -> ServerStatus {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let _permit = self.gate.acquire().await.unwrap();
            match self.statuses.get(&endpoint.id).cloned().flatten() {
                Some(status) => status,
                None => panic!("check for {} blew up", endpoint.id),
            }
        }
    }

    fn endpoints() -> Vec<Endpoint> {
        vec![
            Endpoint::new("lab", "vip.hb.frp.one:25575", "Lab", 50),
            Endpoint::new("bj", "vip.bj-2.frp.one:35565", "Beijing", 100),
            Endpoint::new("wh", "wh.example:25568", "Wuhan", 80),
        ]
    }

    fn poller(check: CannedCheck) -> (Arc<StatusPoller<CannedCheck, RecordingView>>, Arc<RecordingView>) {
        let view = Arc::new(RecordingView::default());
        let poller = Arc::new(StatusPoller::new(endpoints(), Arc::new(check), Arc::clone(&view)));
        (poller, view)
    }

    #[tokio::test]
    async fn cycle_aggregates_and_renders() {
        let (poller, view) = poller(CannedCheck::new(
            vec![
                ("lab", Some(ServerStatus::online(5, 20, None, None, None))),
                ("bj", Some(ServerStatus::offline(100))),
                ("wh", Some(ServerStatus::online(7, 80, None, None, None))),
            ],
            true,
        ));

        let cycle = poller.poll_all().await.unwrap();
        assert_eq!(cycle.summary.online_count, 2);
        assert_eq!(cycle.summary.total_players, 12);
        assert_eq!(cycle.summary.total_capacity, 100);
        assert_eq!(cycle.summary.uptime_percent, 67);

        for (_, outcome) in &cycle.results {
            let status = outcome.status().unwrap();
            if !status.is_online() {
                assert_eq!(status.players(), 0);
            }
        }

        let events = view.events.lock().clone();
        assert_eq!(&events[..3], &[
            Event::Loading("lab".into()),
            Event::Loading("bj".into()),
            Event::Loading("wh".into()),
        ]);
        assert_eq!(events.last(), Some(&Event::Summary(cycle.summary)));
        assert!(!poller.state().is_polling());
    }

    #[tokio::test]
    async fn panicking_check_is_isolated() {
        let (poller, view) = poller(CannedCheck::new(
            vec![
                ("lab", Some(ServerStatus::online(3, 50, None, None, None))),
                ("bj", None),
                ("wh", Some(ServerStatus::online(1, 80, None, None, None))),
            ],
            true,
        ));

        let cycle = poller.poll_all().await.unwrap();
        assert_eq!(cycle.outcome("bj"), Some(&EndpointOutcome::Failed));
        assert!(cycle.outcome("lab").unwrap().status().unwrap().is_online());
        assert_eq!(cycle.summary.online_count, 2);

        let events = view.events.lock().clone();
        assert!(events.contains(&Event::Endpoint("bj".into(), ServerStatus::offline(100))));
    }

    #[tokio::test]
    async fn second_poll_while_running_is_a_no_op() {
        let check = CannedCheck::new(
            vec![
                ("lab", Some(ServerStatus::offline(50))),
                ("bj", Some(ServerStatus::offline(100))),
                ("wh", Some(ServerStatus::offline(80))),
            ],
            false,
        );
        let (poller, view) = poller(check);

        let running = tokio::spawn({
            let poller = Arc::clone(&poller);
            async move { poller.poll_all().await }
        });
        while !poller.state().is_polling() {
            tokio::task::yield_now().await;
        }

        assert!(poller.poll_all().await.is_none());
        assert!(!poller.request_refresh());

        poller.check.gate.add_permits(1_000);
        assert!(running.await.unwrap().is_some());
        assert!(!poller.state().is_polling());
        assert_eq!(view.summaries(), 1);

        // Flag released, a fresh cycle starts.
        assert!(poller.poll_all().await.is_some());
        assert_eq!(view.summaries(), 2);
    }

    #[tokio::test]
    async fn request_refresh_runs_in_background() {
        let (poller, view) = poller(CannedCheck::new(
            vec![
                ("lab", Some(ServerStatus::offline(50))),
                ("bj", Some(ServerStatus::offline(100))),
                ("wh", Some(ServerStatus::offline(80))),
            ],
            true,
        ));

        assert!(poller.request_refresh());
        while view.summaries() == 0 {
            tokio::task::yield_now().await;
        }
        while poller.state().is_polling() {
            tokio::task::yield_now().await;
        }
        assert_eq!(poller.check.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn schedule_polls_on_interval() {
        let (poller, view) = poller(CannedCheck::new(
            vec![
                ("lab", Some(ServerStatus::online(1, 50, None, None, None))),
                ("bj", Some(ServerStatus::online(2, 100, None, None, None))),
                ("wh", Some(ServerStatus::online(3, 80, None, None, None))),
            ],
            true,
        ));

        Arc::clone(&poller).spawn_schedule(Duration::from_secs(300));
        assert!(poller.state().is_scheduled());
        tokio::time::sleep(Duration::from_secs(601)).await;
        poller.state().stop_schedule();

        // Ticks at 0s, 300s and 600s.
        assert_eq!(view.summaries(), 3);
        assert_eq!(poller.check.calls.load(Ordering::SeqCst), 9);

        tokio::time::sleep(Duration::from_secs(900)).await;
        assert!(!poller.state().is_scheduled());
        assert_eq!(view.summaries(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn respawning_schedule_replaces_the_old_one() {
        let (poller, view) = poller(CannedCheck::new(
            vec![
                ("lab", Some(ServerStatus::offline(50))),
                ("bj", Some(ServerStatus::offline(100))),
                ("wh", Some(ServerStatus::offline(80))),
            ],
            true,
        ));

        Arc::clone(&poller).spawn_schedule(Duration::from_secs(300));
        tokio::time::sleep(Duration::from_secs(1)).await;
        Arc::clone(&poller).spawn_schedule(Duration::from_secs(300));
        tokio::time::sleep(Duration::from_secs(400)).await;
        poller.state().stop_schedule();

        // First schedule: tick at 0s. Second: ticks at 1s and 301s.
        assert_eq!(view.summaries(), 3);
    }

    /// Every check takes one second of (paused) time.
    struct SlowCheck;

    #[async_trait]
    impl StatusCheck for SlowCheck {
        async fn check(&self, endpoint: &Endpoint) -> ServerStatus {
            tokio::time::sleep(Duration::from_secs(1)).await;
            ServerStatus::online(1, endpoint.default_max_players, None, None, None)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn checks_run_concurrently() {
        let view = Arc::new(RecordingView::default());
        let poller = StatusPoller::new(
            endpoints()[..2].to_vec(),
            Arc::new(SlowCheck),
            Arc::clone(&view),
        );

        let started = tokio::time::Instant::now();
        let cycle = poller.poll_all().await.unwrap();
        let elapsed = started.elapsed();

        assert_eq!(cycle.summary.online_count, 2);
        assert!(elapsed >= Duration::from_secs(1), "took {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(1500), "took {:?}", elapsed);
    }
}
