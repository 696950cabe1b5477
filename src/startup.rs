//! Application Startup
//!
//! Application building and server initialization.

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;

use crate::application::services::{
    FeedbackServiceImpl, ParticipationServiceImpl, SessionServiceImpl, UserServiceImpl,
};
use crate::config::Settings;
use crate::domain::BalanceThresholds;
use crate::infrastructure::cache::TrackerCache;
use crate::infrastructure::repositories::{
    InMemoryFeedbackRepository, InMemoryMessageRepository, InMemorySessionRepository,
    InMemoryUserRepository,
};
use crate::infrastructure::scheduler::SessionScheduler;
use crate::presentation::http::routes;
use crate::presentation::middleware::{cors, logging};
use crate::shared::clock::{Clock, SystemClock};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<InMemoryUserRepository>,
    pub sessions: Arc<InMemorySessionRepository>,
    pub messages: Arc<InMemoryMessageRepository>,
    pub feedback: Arc<InMemoryFeedbackRepository>,
    pub trackers: Arc<TrackerCache>,
    pub scheduler: Arc<SessionScheduler>,
    pub clock: Arc<dyn Clock>,
    pub thresholds: BalanceThresholds,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Fresh in-memory state. Fails if the settings do not validate.
    pub fn new(settings: Settings, clock: Arc<dyn Clock>) -> Result<Self> {
        settings.validate()?;
        let thresholds = settings.balance.thresholds()?;
        let scheduler = Arc::new(SessionScheduler::new(
            clock.clone(),
            settings.timer.tick_interval(),
        ));

        Ok(Self {
            users: Arc::new(InMemoryUserRepository::new()),
            sessions: Arc::new(InMemorySessionRepository::new()),
            messages: Arc::new(InMemoryMessageRepository::new()),
            feedback: Arc::new(InMemoryFeedbackRepository::new()),
            trackers: Arc::new(TrackerCache::new()),
            scheduler,
            clock,
            thresholds,
            settings: Arc::new(settings),
        })
    }

    pub fn user_service(&self) -> UserServiceImpl<InMemoryUserRepository> {
        UserServiceImpl::new(self.users.clone(), self.clock.clone())
    }

    pub fn session_service(
        &self,
    ) -> SessionServiceImpl<InMemorySessionRepository, InMemoryUserRepository> {
        SessionServiceImpl::new(
            self.sessions.clone(),
            self.users.clone(),
            self.trackers.clone(),
            self.scheduler.clone(),
            self.clock.clone(),
            self.settings.participation.clone(),
            self.thresholds,
        )
    }

    pub fn participation_service(
        &self,
    ) -> ParticipationServiceImpl<
        InMemorySessionRepository,
        InMemoryUserRepository,
        InMemoryMessageRepository,
    > {
        ParticipationServiceImpl::new(
            self.sessions.clone(),
            self.users.clone(),
            self.messages.clone(),
            self.trackers.clone(),
            self.clock.clone(),
            self.thresholds,
            self.settings.participation.message_bonus_seconds,
        )
    }

    pub fn feedback_service(
        &self,
    ) -> FeedbackServiceImpl<InMemorySessionRepository, InMemoryFeedbackRepository> {
        FeedbackServiceImpl::new(self.sessions.clone(), self.feedback.clone(), self.clock.clone())
    }
}

/// Router with the full middleware stack.
pub fn build_router(state: AppState) -> Router {
    let cors = cors::create_cors_layer(&state.settings.cors);
    routes::create_router(state).layer(
        ServiceBuilder::new()
            .layer(logging::create_trace_layer())
            .layer(cors),
    )
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
    state: AppState,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        let addr = settings.server_addr();
        let state = AppState::new(settings, Arc::new(SystemClock))?;
        let router = build_router(state.clone());

        // Bind to address
        let listener = TcpListener::bind(&addr).await?;
        tracing::info!("Listening on {}", listener.local_addr()?);

        Ok(Self {
            listener,
            router,
            state,
        })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        self.state.scheduler.shutdown();
        tracing::info!("Server stopped");
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
