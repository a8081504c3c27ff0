//! Navigation session task.
//!
//! One task owns the session. The provider call and inbound commands are
//! raced in a single `select!` loop, so every mutation is serialized and a
//! cancel that lands first drops the in-flight provider future.

use std::time::Duration;

use clearpath_core::{
    Guidance, NavError, NavigationConfig, NavigationSession, Obstacle, Point, PositionFix,
    RouteOverlay, RouteProvider, RouteRequest, RouteSource, RouteUnavailable, SessionState,
};
use thiserror::Error;
use tokio::sync::mpsc;

const DEFAULT_ROUTE_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub navigation: NavigationConfig,
    /// Upper bound on the provider call; expiry falls back to the
    /// synthesized route.
    pub route_timeout: Duration,
    pub channel_capacity: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            navigation: NavigationConfig::default(),
            route_timeout: Duration::from_millis(DEFAULT_ROUTE_TIMEOUT_MS),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SessionCommand {
    BeginNavigating,
    PushFix(PositionFix),
    Cancel,
}

/// Output of a running session, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum GuidanceEvent {
    RouteReady {
        source: RouteSource,
        overlay: RouteOverlay,
    },
    Guidance(Guidance),
    /// Final guidance; the session has stopped.
    Arrived(Guidance),
    FixRejected {
        reason: NavError,
    },
    Cancelled,
}

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("navigation session has ended")]
    SessionClosed,
}

/// Command side of a running session. Cheap to clone.
#[derive(Debug, Clone)]
pub struct NavigationHandle {
    commands: mpsc::Sender<SessionCommand>,
}

impl NavigationHandle {
    /// Start live guidance. Sent before the route is ready, it takes effect
    /// as soon as the route arrives.
    pub async fn begin_navigating(&self) -> Result<(), SdkError> {
        self.send(SessionCommand::BeginNavigating).await
    }

    pub async fn push_fix(&self, fix: PositionFix) -> Result<(), SdkError> {
        self.send(SessionCommand::PushFix(fix)).await
    }

    pub async fn cancel(&self) -> Result<(), SdkError> {
        self.send(SessionCommand::Cancel).await
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    async fn send(&self, command: SessionCommand) -> Result<(), SdkError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SdkError::SessionClosed)
    }
}

/// Validate the trip, request a route and spawn the session task.
///
/// The task stops after arrival or cancellation, or once every handle has
/// been dropped.
pub fn spawn_navigation<P>(
    provider: P,
    config: RunnerConfig,
    origin: Point,
    destination: Point,
    obstacles: Vec<Obstacle>,
) -> Result<(NavigationHandle, mpsc::Receiver<GuidanceEvent>), NavError>
where
    P: RouteProvider + Send + Sync + 'static,
{
    let capacity = config.channel_capacity.max(1);
    let mut session = NavigationSession::new(config.navigation);
    let request = session.start(origin, destination, &obstacles)?;

    let (command_tx, command_rx) = mpsc::channel(capacity);
    let (event_tx, event_rx) = mpsc::channel(capacity);

    tokio::spawn(run_session(
        provider,
        session,
        request,
        config.route_timeout,
        command_rx,
        event_tx,
    ));

    Ok((NavigationHandle { commands: command_tx }, event_rx))
}

async fn run_session<P>(
    provider: P,
    mut session: NavigationSession,
    request: RouteRequest,
    route_timeout: Duration,
    mut commands: mpsc::Receiver<SessionCommand>,
    events: mpsc::Sender<GuidanceEvent>,
) where
    P: RouteProvider + Send + Sync,
{
    let fetch = tokio::time::timeout(
        route_timeout,
        provider.fetch_walking_route(request.origin, request.destination),
    );
    tokio::pin!(fetch);

    let mut awaiting_route = true;
    let mut begin_queued = false;

    loop {
        tokio::select! {
            result = &mut fetch, if awaiting_route => {
                awaiting_route = false;
                let result = result.unwrap_or_else(|_| {
                    Err(RouteUnavailable::Timeout(route_timeout.as_millis() as u64))
                });
                if !session.complete_route(&request, result) {
                    continue;
                }
                let (Some(source), Some(overlay)) = (session.route_source(), session.overlay()) else {
                    continue;
                };
                if !emit(&events, GuidanceEvent::RouteReady { source, overlay }).await {
                    break;
                }
                if begin_queued && !begin(&mut session, &events).await {
                    break;
                }
            }
            command = commands.recv() => {
                let Some(command) = command else {
                    tracing::debug!("All navigation handles dropped, stopping session");
                    session.cancel();
                    break;
                };
                match command {
                    SessionCommand::Cancel => {
                        if session.cancel() {
                            let _ = emit(&events, GuidanceEvent::Cancelled).await;
                        }
                        break;
                    }
                    SessionCommand::BeginNavigating => {
                        if session.state() == SessionState::RouteRequested {
                            begin_queued = true;
                        } else if !begin(&mut session, &events).await {
                            break;
                        }
                    }
                    SessionCommand::PushFix(fix) => {
                        let event = match session.on_position_fix(fix) {
                            Ok(Some(guidance)) if guidance.arrived => GuidanceEvent::Arrived(guidance),
                            Ok(Some(guidance)) => GuidanceEvent::Guidance(guidance),
                            Ok(None) => continue,
                            Err(reason) => GuidanceEvent::FixRejected { reason },
                        };
                        if !emit(&events, event).await {
                            break;
                        }
                    }
                }
            }
        }

        if session.state().is_terminal() {
            break;
        }
    }

    tracing::debug!("Navigation task finished in state {:?}", session.state());
}

async fn begin(session: &mut NavigationSession, events: &mpsc::Sender<GuidanceEvent>) -> bool {
    match session.begin_navigating() {
        Ok(guidance) => emit(events, GuidanceEvent::Guidance(guidance)).await,
        Err(e) => {
            tracing::warn!("Ignoring begin_navigating: {}", e);
            true
        }
    }
}

/// Returns `false` once nobody is listening.
async fn emit(events: &mpsc::Sender<GuidanceEvent>, event: GuidanceEvent) -> bool {
    events.send(event).await.is_ok()
}
