//! Protected profile screen lifecycle.
//!
//! `ProfileScreen` is what an embedder mounts for the profile page. It
//! subscribes to the session channel before reconciling, so a change made by
//! another tab while the first load is in flight is never missed, and
//! re-evaluates the stored session whenever one arrives.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use crate::context::SessionEvent;
use crate::editor::ProfileEditor;
use crate::notice::Notice;
use crate::reconcile::{MountGuard, Outcome, ProfileView, Reconciler};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenState {
    Loading,
    Ready(ProfileView),
    RedirectToLogin,
}

pub struct ProfileScreen {
    reconciler: Reconciler,
    guard: MountGuard,
    events: broadcast::Receiver<SessionEvent>,
    state: ScreenState,
    notices: Vec<Notice>,
    loaded: bool,
}

impl ProfileScreen {
    #[must_use]
    pub fn mount(reconciler: Reconciler) -> Self {
        let events = reconciler.context().subscribe();
        Self {
            reconciler,
            guard: MountGuard::mounted(),
            events,
            state: ScreenState::Loading,
            notices: Vec::new(),
            loaded: false,
        }
    }

    #[must_use]
    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Handle that outstanding work can check after it resumes.
    #[must_use]
    pub fn guard(&self) -> MountGuard {
        self.guard.clone()
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.guard.is_mounted()
    }

    /// Run the reconciler. Only the first call per mount does any work.
    pub async fn load(&mut self) -> &ScreenState {
        if !self.loaded {
            self.loaded = true;
            let outcome = self.reconciler.run(&self.guard).await;
            self.apply(outcome);
        }
        &self.state
    }

    /// Wait for the next session change and re-evaluate from the store.
    ///
    /// `None` once the screen is unmounted or the channel is gone.
    pub async fn next_change(&mut self) -> Option<&ScreenState> {
        if !self.is_mounted() {
            return None;
        }
        match self.events.recv().await {
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "session events lagged; re-reading store");
            }
            Err(RecvError::Closed) => return None,
        }
        self.reevaluate();
        Some(&self.state)
    }

    /// Drain pending session events without waiting. Returns whether any
    /// arrived (and the state was re-evaluated).
    pub fn try_sync(&mut self) -> bool {
        if !self.is_mounted() {
            return false;
        }
        let mut changed = false;
        loop {
            match self.events.try_recv() {
                Ok(_) | Err(TryRecvError::Lagged(_)) => changed = true,
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        if changed {
            self.reevaluate();
        }
        changed
    }

    /// Tear down. Outstanding work resolves to `Outcome::Discarded`.
    pub fn unmount(&self) {
        self.guard.unmount();
    }

    /// Editor for the rendered profile, if the account type has one.
    #[must_use]
    pub fn editor(&self) -> Option<ProfileEditor> {
        match &self.state {
            ScreenState::Ready(view) => ProfileEditor::for_view(view),
            ScreenState::Loading | ScreenState::RedirectToLogin => None,
        }
    }

    fn reevaluate(&mut self) {
        let outcome = self.reconciler.evaluate_store();
        self.apply(outcome);
    }

    fn apply(&mut self, outcome: Outcome) {
        if !self.is_mounted() {
            return;
        }
        match outcome {
            Outcome::Profile { view, notice } => {
                self.state = ScreenState::Ready(view);
                self.notices.extend(notice);
            }
            Outcome::Login { notice } => {
                if self.state != ScreenState::RedirectToLogin {
                    self.notices.extend(notice);
                }
                self.state = ScreenState::RedirectToLogin;
            }
            Outcome::Discarded => {}
        }
    }
}

#[cfg(test)]
#[path = "screen_test.rs"]
mod tests;
