// src/session.rs

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::{Mutex, MutexGuard};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::form::{FormController, SubmitTicket};

/// Request header htmx sends with the id of the page's form.
pub const FORM_HEADER: &str = "x-builder-form";
const MAX_SESSIONS: u64 = 10_000;

/// One page load's builder form.
#[derive(Clone)]
pub struct FormSession {
    pub id: Uuid,
    controller: Arc<Mutex<FormController>>,
}

impl FormSession {
    fn fresh(id: Uuid) -> Self {
        Self {
            id,
            controller: Arc::new(Mutex::new(FormController::new())),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, FormController> {
        self.controller.lock().await
    }

    /// Restores the submit button after `after` unless the ticket's reset token
    /// is cancelled first.
    pub fn arm_submit_reset(&self, ticket: &SubmitTicket, after: Duration) -> JoinHandle<()> {
        let controller = Arc::clone(&self.controller);
        let token = ticket.reset.clone();
        let attempt = ticket.attempt;
        let session_id = self.id;

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!("Submit reset for session {} attempt {} cancelled", session_id, attempt);
                }
                _ = tokio::time::sleep(after) => {
                    let mut form = controller.lock().await;
                    if form.submit_timed_out(attempt) {
                        tracing::info!(
                            "Submit button of session {} restored after {:?} without completion",
                            session_id,
                            after
                        );
                    }
                }
            }
        })
    }
}

#[derive(Clone)]
pub struct FormSessions {
    cache: Cache<Uuid, FormSession>,
}

impl FormSessions {
    pub fn new(idle: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(MAX_SESSIONS)
                .time_to_idle(idle)
                .build(),
        }
    }

    /// Starts a fresh form under a new id.
    pub async fn start(&self) -> FormSession {
        let session = FormSession::fresh(Uuid::new_v4());
        self.cache.insert(session.id, session.clone()).await;
        tracing::debug!("Builder session {} initialised", session.id);
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<FormSession> {
        self.cache.get(&id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{Event, FormSnapshot, Outcome};

    fn valid_snapshot() -> FormSnapshot {
        FormSnapshot {
            business_name: "Acme".into(),
            product_names: vec!["Widget".into()],
        }
    }

    #[tokio::test]
    async fn each_page_load_keeps_its_own_blocks() {
        let sessions = FormSessions::new(Duration::from_secs(60));
        let first = sessions.start().await;
        first.lock().await.dispatch(Event::AddProduct);

        let second = sessions.start().await;
        assert_ne!(second.id, first.id);
        assert_eq!(second.lock().await.products().len(), 1);

        let first = sessions.get(first.id).await.unwrap();
        let outcome = first.lock().await.dispatch(Event::AddProduct);
        assert!(matches!(outcome, Outcome::ProductAdded(3)));
        assert_eq!(first.lock().await.products().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn submit_button_resets_after_ceiling() {
        let sessions = FormSessions::new(Duration::from_secs(3600));
        let session = sessions.start().await;
        let Outcome::SubmitAccepted(ticket) = session.lock().await.dispatch(Event::Submit(valid_snapshot())) else {
            panic!("expected the submission to be accepted");
        };

        let timer = session.arm_submit_reset(&ticket, Duration::from_secs(10));
        tokio::time::sleep(Duration::from_secs(9)).await;
        assert!(session.lock().await.submit_button().is_disabled());

        timer.await.unwrap();
        assert!(!session.lock().await.submit_button().is_disabled());
    }

    #[tokio::test(start_paused = true)]
    async fn finishing_cancels_the_pending_reset() {
        let sessions = FormSessions::new(Duration::from_secs(3600));
        let session = sessions.start().await;
        let Outcome::SubmitAccepted(ticket) = session.lock().await.dispatch(Event::Submit(valid_snapshot())) else {
            panic!("expected the submission to be accepted");
        };
        let timer = session.arm_submit_reset(&ticket, Duration::from_secs(10));

        assert!(session.lock().await.submit_finished(ticket.attempt));
        timer.await.unwrap();
        assert!(ticket.reset.is_cancelled());

        // A new attempt is not disturbed by the old timer.
        let Outcome::SubmitAccepted(_) = session.lock().await.dispatch(Event::Submit(valid_snapshot())) else {
            panic!("expected the second submission to be accepted");
        };
        tokio::time::sleep(Duration::from_secs(11)).await;
        assert!(session.lock().await.submit_button().is_disabled());
    }
}
