//! Lifecycle of a departure board instance.
//!
//! An [`Engine`] owns the board state, turns inbound notifications into
//! render output, and keeps the departure poll running on a tokio task.

mod poller;

use mvg_core::{
    BoardConfig, BoardState, Effect, Notification, NotificationError, OutboundRequest,
    RenderContext, RenderOutput,
};
use tokio::sync::{mpsc, watch};

use crate::poller::Poller;

pub struct Engine {
    state: BoardState,
    outbound: mpsc::UnboundedSender<OutboundRequest>,
    poller: Option<Poller>,
    board: watch::Sender<RenderOutput>,
}

impl Engine {
    /// Create a board and send its initial requests.
    ///
    /// Returns the engine together with the queue of requests meant for the
    /// data-fetching collaborator.
    pub fn initialize(config: BoardConfig) -> (Self, mpsc::UnboundedReceiver<OutboundRequest>) {
        let (outbound, outbound_receiver) = mpsc::unbounded_channel();
        let state = BoardState::new(config);
        let (board, _) = watch::channel(state.render_output());
        let mut engine = Engine {
            state,
            outbound,
            poller: None,
            board,
        };

        let effects = engine.state.start();
        engine.apply(effects);
        (engine, outbound_receiver)
    }

    pub fn instance(&self) -> uuid::Uuid {
        self.state.instance()
    }

    pub fn get_config(&self) -> &BoardConfig {
        self.state.get_config()
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(Poller::is_running)
    }

    /// Receiver of every refreshed render output.
    pub fn subscribe(&self) -> watch::Receiver<RenderOutput> {
        self.board.subscribe()
    }

    pub fn render_output(&self) -> RenderOutput {
        self.state.render_output()
    }

    /// Handle a notification, formatting times against the local clock.
    pub fn on_message(&mut self, notification: Notification) -> RenderOutput {
        self.on_message_at(notification, &RenderContext::local_now())
    }

    pub fn on_message_at(
        &mut self,
        notification: Notification,
        ctx: &RenderContext,
    ) -> RenderOutput {
        let effects = self.state.handle(notification, ctx);
        self.apply(effects);
        self.state.render_output()
    }

    /// Decode and handle a raw notification.
    ///
    /// Unknown or malformed messages are logged and leave the board untouched.
    pub fn on_raw_message(
        &mut self,
        value: serde_json::Value,
    ) -> Result<RenderOutput, NotificationError> {
        match Notification::from_value(value) {
            Ok(notification) => Ok(self.on_message(notification)),
            Err(e) => {
                tracing::error!("Board {} ignored notification: {}", self.instance(), e);
                Err(e)
            }
        }
    }

    /// Stop polling and close the outbound queue.
    pub fn teardown(mut self) {
        tracing::info!("Tearing down departure board {}", self.instance());
        self.poller.take();
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Request(request) => {
                    if self.outbound.send(request).is_err() {
                        tracing::warn!("Outbound request queue closed, request dropped");
                    }
                }
                Effect::StartPolling => {
                    let config = self.state.get_config();
                    tracing::info!(
                        "Polling departures for '{}' every {:?}",
                        config.station,
                        config.update_interval()
                    );
                    // replacing the poller aborts the previous one
                    self.poller = Poller::spawn(
                        self.state.departures_request(),
                        config.update_interval(),
                        self.outbound.clone(),
                    );
                }
                Effect::Refresh => {
                    self.board.send_replace(self.state.render_output());
                }
            }
        }
    }
}
