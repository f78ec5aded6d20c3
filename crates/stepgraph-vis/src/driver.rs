//! Timer-driven playback on top of a shared [`Session`].
//!
//! At most one ticker task exists. It sleeps for the current speed, then
//! applies one tick under the generation it was started with. Any action
//! that interrupts playback aborts the task and, through the session, bumps
//! the generation, so a tick already waiting on the lock lands as stale.

use std::sync::Arc;

use stepgraph_core::{Algorithm, Graph};
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::error::{EditError, RunError};
use crate::playback::TickOutcome;
use crate::session::{validate_graph, RunRequest, Session, SessionStatus};

/// Shared session plus the task that advances it.
pub struct PlaybackDriver {
    session: Arc<RwLock<Session>>,
    ticker: Mutex<Option<JoinHandle<()>>>,
    updates: Arc<watch::Sender<SessionStatus>>,
}

impl PlaybackDriver {
    pub fn new(session: Session) -> Self {
        let (updates, _) = watch::channel(session.status());
        Self {
            session: Arc::new(RwLock::new(session)),
            ticker: Mutex::new(None),
            updates: Arc::new(updates),
        }
    }

    pub fn session(&self) -> &Arc<RwLock<Session>> {
        &self.session
    }

    /// Receive the status after every change, including automatic ticks.
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.updates.subscribe()
    }

    pub async fn status(&self) -> SessionStatus {
        self.session.read().await.status()
    }

    /// Start automatic playback if the session allows it.
    pub async fn play(&self) -> SessionStatus {
        let mut ticker = self.ticker.lock().await;
        let mut session = self.session.write().await;
        if session.play() {
            if let Some(previous) = ticker.take() {
                previous.abort();
            }
            let generation = session.playback().generation();
            *ticker = Some(tokio::spawn(run_ticker(
                Arc::clone(&self.session),
                Arc::clone(&self.updates),
                generation,
            )));
        }
        let status = session.status();
        drop(session);
        self.publish(status)
    }

    pub async fn pause(&self) -> SessionStatus {
        self.interrupt(Session::pause).await.1
    }

    pub async fn reset(&self) -> SessionStatus {
        self.interrupt(Session::reset).await.1
    }

    /// Change the speed. A sleep already in progress keeps its duration.
    pub async fn set_speed(&self, ms: u64) -> SessionStatus {
        self.update(|session| session.set_speed(ms)).await.1
    }

    pub async fn step_forward(&self) -> SessionStatus {
        self.interrupt(|session| {
            session.step_forward();
        })
        .await
        .1
    }

    pub async fn step_backward(&self) -> SessionStatus {
        self.interrupt(|session| {
            session.step_backward();
        })
        .await
        .1
    }

    pub async fn seek(&self, index: Option<usize>) -> SessionStatus {
        self.interrupt(|session| {
            session.seek(index);
        })
        .await
        .1
    }

    /// Replace the graph. A refused graph leaves playback running.
    pub async fn load_graph(&self, graph: Graph) -> Result<SessionStatus, EditError> {
        let valid = validate_graph(&graph).is_ok();
        let (outcome, status) = self
            .interrupt_if(move |_| valid, |session| session.load_graph(graph))
            .await;
        outcome.map(|_| status)
    }

    /// Run a request. A rejected request leaves playback running.
    pub async fn run(&self, request: RunRequest) -> Result<SessionStatus, RunError> {
        let valid = request.validate().is_ok();
        let (outcome, status) = self
            .interrupt_if(move |_| valid, |session| session.run(request))
            .await;
        outcome.map(|_| status)
    }

    /// Run the session's current selection.
    pub async fn run_selected(&self) -> Result<SessionStatus, RunError> {
        let (outcome, status) = self
            .interrupt_if(
                |session| session.selection().validate().is_ok(),
                Session::run_selected,
            )
            .await;
        outcome.map(|_| status)
    }

    /// Choose the algorithm, dropping the current trace.
    pub async fn select_algorithm(&self, algorithm: Option<Algorithm>) -> SessionStatus {
        self.interrupt(|session| session.select_algorithm(algorithm))
            .await
            .1
    }

    pub async fn set_start(&self, id: Option<String>) -> SessionStatus {
        self.update(|session| session.set_start(id)).await.1
    }

    pub async fn set_end(&self, id: Option<String>) -> SessionStatus {
        self.update(|session| session.set_end(id)).await.1
    }

    pub async fn clear(&self) -> SessionStatus {
        self.interrupt(Session::clear).await.1
    }

    /// Apply an action that leaves playback running.
    pub async fn update<R>(&self, action: impl FnOnce(&mut Session) -> R) -> (R, SessionStatus) {
        let mut session = self.session.write().await;
        let result = action(&mut *session);
        let status = session.status();
        drop(session);
        (result, self.publish(status))
    }

    /// Stop the ticker, then apply an action.
    pub async fn interrupt<R>(&self, action: impl FnOnce(&mut Session) -> R) -> (R, SessionStatus) {
        self.interrupt_if(|_| true, action).await
    }

    /// Apply an action, stopping the ticker first only if `stop` agrees.
    ///
    /// `stop` sees the session under the same lock the action runs under.
    async fn interrupt_if<R>(
        &self,
        stop: impl FnOnce(&Session) -> bool,
        action: impl FnOnce(&mut Session) -> R,
    ) -> (R, SessionStatus) {
        let mut ticker = self.ticker.lock().await;
        let mut session = self.session.write().await;
        if stop(&*session) {
            if let Some(handle) = ticker.take() {
                handle.abort();
            }
        }
        let result = action(&mut *session);
        let status = session.status();
        drop(session);
        drop(ticker);
        (result, self.publish(status))
    }

    fn publish(&self, status: SessionStatus) -> SessionStatus {
        self.updates.send_replace(status.clone());
        status
    }
}

impl Drop for PlaybackDriver {
    fn drop(&mut self) {
        if let Some(handle) = self.ticker.get_mut().take() {
            handle.abort();
        }
    }
}

async fn run_ticker(
    session: Arc<RwLock<Session>>,
    updates: Arc<watch::Sender<SessionStatus>>,
    generation: u64,
) {
    loop {
        let delay = {
            let current = session.read().await;
            if current.playback().generation() != generation {
                return;
            }
            current.playback().speed()
        };
        tokio::time::sleep(delay).await;

        let mut current = session.write().await;
        match current.tick(generation) {
            TickOutcome::Advanced(_) => {
                updates.send_replace(current.status());
            }
            TickOutcome::Finished => {
                updates.send_replace(current.status());
                return;
            }
            TickOutcome::Stale | TickOutcome::NotPlaying => return,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::PlaybackState;
    use std::time::Duration;
    use stepgraph_core::{Algorithm, Edge, Node};
    use tokio::time::sleep;

    fn chain(len: usize) -> Graph {
        let nodes = (0..len).map(|i| Node::new(format!("n{i}"), format!("N{i}"))).collect();
        let edges = (1..len)
            .map(|i| Edge::new(format!("e{i}"), format!("n{}", i - 1), format!("n{i}"), 1))
            .collect();
        Graph::from_parts(nodes, edges)
    }

    async fn ready_driver() -> PlaybackDriver {
        let driver = PlaybackDriver::new(Session::with_graph(chain(4)));
        driver
            .run(RunRequest {
                algorithm: Some(Algorithm::Bfs),
                start: Some("n0".into()),
                end: Some("n3".into()),
            })
            .await
            .unwrap();
        driver
    }

    async fn cursor(driver: &PlaybackDriver) -> Option<usize> {
        driver.status().await.playback.current_step_index
    }

    #[tokio::test(start_paused = true)]
    async fn advances_once_per_interval() {
        let driver = ready_driver().await;
        let status = driver.play().await;
        assert_eq!(status.playback.state, PlaybackState::Playing);

        sleep(Duration::from_millis(250)).await;
        assert_eq!(cursor(&driver).await, None);

        sleep(Duration::from_millis(1000)).await;
        assert_eq!(cursor(&driver).await, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn pause_stops_pending_tick() {
        let driver = ready_driver().await;
        driver.play().await;
        sleep(Duration::from_millis(750)).await;
        let paused = driver.pause().await;
        assert_eq!(paused.playback.current_step_index, Some(0));

        sleep(Duration::from_secs(10)).await;
        assert_eq!(cursor(&driver).await, Some(0));
        assert_eq!(driver.status().await.message, "Paused");
    }

    #[tokio::test(start_paused = true)]
    async fn plays_to_the_end_and_stops() {
        let driver = ready_driver().await;
        let total = driver.status().await.playback.total_steps;
        driver.set_speed(100).await;
        driver.play().await;

        sleep(Duration::from_millis(100 * (total as u64 + 5))).await;
        let status = driver.status().await;
        assert_eq!(status.playback.state, PlaybackState::Finished);
        assert_eq!(status.playback.current_step_index, Some(total - 1));
        assert_eq!(status.goal_reached, Some(true));
    }

    #[tokio::test(start_paused = true)]
    async fn speed_change_applies_from_next_interval() {
        let driver = ready_driver().await;
        driver.play().await;
        sleep(Duration::from_millis(250)).await;
        driver.set_speed(2000).await;

        // the pending 500ms sleep is unaffected
        sleep(Duration::from_millis(350)).await;
        assert_eq!(cursor(&driver).await, Some(0));

        sleep(Duration::from_millis(1800)).await;
        assert_eq!(cursor(&driver).await, Some(0));

        sleep(Duration::from_millis(200)).await;
        assert_eq!(cursor(&driver).await, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn seek_during_playback_stops_it() {
        let driver = ready_driver().await;
        driver.play().await;
        sleep(Duration::from_millis(600)).await;
        let status = driver.seek(Some(3)).await;
        assert_eq!(status.playback.state, PlaybackState::Stepping);

        sleep(Duration::from_secs(5)).await;
        assert_eq!(cursor(&driver).await, Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn replay_after_pause_starts_one_ticker() {
        let driver = ready_driver().await;
        driver.play().await;
        driver.pause().await;
        driver.play().await;
        driver.play().await;

        sleep(Duration::from_millis(750)).await;
        assert_eq!(cursor(&driver).await, Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_ticks() {
        let driver = ready_driver().await;
        let mut updates = driver.subscribe();
        driver.play().await;
        let _ = updates.borrow_and_update();

        updates.changed().await.unwrap();
        assert_eq!(updates.borrow().playback.current_step_index, Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_run_keeps_playback_going() {
        let driver = ready_driver().await;
        driver.play().await;
        sleep(Duration::from_millis(600)).await;
        assert_eq!(cursor(&driver).await, Some(0));

        let err = driver
            .run(RunRequest {
                algorithm: Some(Algorithm::AStar),
                start: Some("n0".into()),
                end: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RunError::MissingEndNode { .. }));

        sleep(Duration::from_millis(500)).await;
        let status = driver.status().await;
        assert_eq!(status.playback.current_step_index, Some(1));
        assert_eq!(status.playback.state, PlaybackState::Playing);
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_graph_keeps_playback_going() {
        let driver = ready_driver().await;
        driver.play().await;
        sleep(Duration::from_millis(600)).await;

        let mut graph = chain(3);
        graph.edges[0].weight = 0;
        assert!(driver.load_graph(graph).await.is_err());

        sleep(Duration::from_millis(500)).await;
        assert_eq!(cursor(&driver).await, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn accepted_run_replaces_playback() {
        let driver = ready_driver().await;
        driver.play().await;
        sleep(Duration::from_millis(600)).await;

        let status = driver
            .run(RunRequest {
                algorithm: Some(Algorithm::Dfs),
                start: Some("n0".into()),
                end: None,
            })
            .await
            .unwrap();
        assert_eq!(status.playback.state, PlaybackState::Ready);

        sleep(Duration::from_secs(5)).await;
        assert_eq!(cursor(&driver).await, None);
    }

    #[tokio::test]
    async fn selection_then_run_selected() {
        let driver = PlaybackDriver::new(Session::with_graph(chain(3)));
        driver.select_algorithm(Some(Algorithm::Dijkstra)).await;
        driver.set_start(Some("n0".into())).await;
        let status = driver.set_end(Some("n2".into())).await;
        assert_eq!(status.message, "End node: N2");

        let status = driver.run_selected().await.unwrap();
        assert_eq!(status.algorithm, Some(Algorithm::Dijkstra));
        assert_eq!(status.playback.state, PlaybackState::Ready);
    }

    #[tokio::test]
    async fn failed_run_reports_message() {
        let driver = PlaybackDriver::new(Session::with_graph(chain(2)));
        let err = driver.run(RunRequest::default()).await.unwrap_err();
        assert_eq!(err, RunError::NoAlgorithm);
        assert_eq!(driver.status().await.message, "Please select an algorithm");
    }
}
