//! A calculator session shared between threads.
//!
//! One worker thread owns the [`CalculatorState`]; everything else talks to
//! it through a [`SessionHandle`]. Requests are processed strictly in order,
//! so previews never interleave with edits. The worker also runs the
//! long-press timer for `clear`.

mod long_press;

pub use long_press::{LongPress, Release};

use std::thread::{self, JoinHandle};
use std::time::Instant;

use flume::{Receiver, RecvTimeoutError, Sender};

use crate::calculator::{Action, CalculatorState, Display, StateSnapshot};
use crate::config::Config;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("calculator session has shut down")]
    Closed,
    #[error("failed to spawn session worker: {0}")]
    Spawn(#[from] std::io::Error),
}

enum Request {
    Apply(Action, Sender<Display>),
    SetExpr(String, Sender<Display>),
    Snapshot(Sender<StateSnapshot>),
    PressClear,
    ReleaseClear(Sender<Display>),
    CancelClear,
    Shutdown,
}

pub struct Session;

impl Session {
    /// Start a worker thread owning a fresh calculator.
    pub fn spawn(config: &Config) -> Result<SessionHandle, SessionError> {
        let (request_tx, request_rx) = flume::unbounded();
        let (update_tx, update_rx) = flume::unbounded();

        let state = CalculatorState::with_options(config.display_options());
        let long_press = LongPress::new(config.long_press());

        let worker = thread::Builder::new()
            .name("tapcalc-session".to_string())
            .spawn(move || run(state, long_press, request_rx, update_tx))?;

        tracing::info!("calculator session started");

        Ok(SessionHandle {
            requests: request_tx,
            updates: update_rx,
            worker: Some(worker),
        })
    }
}

/// Handle to a running session. Dropping it stops the worker.
pub struct SessionHandle {
    requests: Sender<Request>,
    updates: Receiver<Display>,
    worker: Option<JoinHandle<()>>,
}

impl SessionHandle {
    fn call<T>(&self, make: impl FnOnce(Sender<T>) -> Request) -> Result<T, SessionError> {
        let (reply_tx, reply_rx) = flume::bounded(1);
        self.requests
            .send(make(reply_tx))
            .map_err(|_| SessionError::Closed)?;
        reply_rx.recv().map_err(|_| SessionError::Closed)
    }

    fn send(&self, request: Request) -> Result<(), SessionError> {
        self.requests.send(request).map_err(|_| SessionError::Closed)
    }

    /// Apply one action and wait for the resulting display.
    pub fn apply(&self, action: Action) -> Result<Display, SessionError> {
        self.call(|reply| Request::Apply(action, reply))
    }

    /// Force the buffer.
    pub fn set_expr(&self, expr: impl Into<String>) -> Result<Display, SessionError> {
        let expr = expr.into();
        self.call(|reply| Request::SetExpr(expr, reply))
    }

    pub fn snapshot(&self) -> Result<StateSnapshot, SessionError> {
        self.call(Request::Snapshot)
    }

    /// The `clear` key went down. If it is still held after the long-press
    /// delay, the session clears itself and publishes the display on
    /// [`SessionHandle::updates`].
    pub fn press_clear(&self) -> Result<(), SessionError> {
        self.send(Request::PressClear)
    }

    /// The `clear` key came up. A release before the long press fired acts
    /// as an ordinary `clear`.
    pub fn release_clear(&self) -> Result<Display, SessionError> {
        self.call(Request::ReleaseClear)
    }

    /// The press gesture was aborted; nothing happens.
    pub fn cancel_clear(&self) -> Result<(), SessionError> {
        self.send(Request::CancelClear)
    }

    /// Displays produced without a request, i.e. by a fired long press.
    pub fn updates(&self) -> &Receiver<Display> {
        &self.updates
    }

    /// Stop the worker and wait for it to exit.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = self.requests.send(Request::Shutdown);
            if worker.join().is_err() {
                tracing::warn!("calculator session worker panicked");
            }
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run(
    mut state: CalculatorState,
    mut long_press: LongPress,
    requests: Receiver<Request>,
    updates: Sender<Display>,
) {
    loop {
        let received = match long_press.deadline() {
            Some(deadline) => requests.recv_deadline(deadline),
            None => requests.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        let request = match received {
            Ok(request) => request,
            Err(RecvTimeoutError::Timeout) => {
                if long_press.poll(Instant::now()) {
                    tracing::debug!("long press on clear");
                    let display = state.apply(Action::Clear);
                    let _ = updates.send(display);
                }
                continue;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        };

        match request {
            Request::Apply(action, reply) => {
                let _ = reply.send(state.apply(action));
            }
            Request::SetExpr(expr, reply) => {
                let _ = reply.send(state.set_expr(expr));
            }
            Request::Snapshot(reply) => {
                let _ = reply.send(state.snapshot());
            }
            Request::PressClear => long_press.press(Instant::now()),
            Request::ReleaseClear(reply) => {
                let display = match long_press.release() {
                    Release::Tap => state.apply(Action::Clear),
                    Release::AfterLongPress | Release::Spurious => state.display(),
                };
                let _ = reply.send(display);
            }
            Request::CancelClear => long_press.cancel(),
            Request::Shutdown => break,
        }
    }

    tracing::info!("calculator session stopped");
}
