use std::sync::Arc;

use category_game::{AdvisoryTicket, FeedbackRequest, SessionEvent, StageSession};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::advisor::Advisor;

/// Consultant text for one decision, tagged with the ticket it answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryReply {
    pub ticket: AdvisoryTicket,
    pub text: String,
}

/// Runs advisory requests off the session's thread. Each request gets its own
/// task; replies arrive on the channel returned by [`AdvisoryDispatcher::new`]
/// in completion order, so the session's ticket check decides which one wins.
#[derive(Clone)]
pub struct AdvisoryDispatcher {
    advisor: Arc<dyn Advisor>,
    replies: mpsc::UnboundedSender<AdvisoryReply>,
}

impl AdvisoryDispatcher {
    #[must_use]
    pub fn new(advisor: Arc<dyn Advisor>) -> (Self, mpsc::UnboundedReceiver<AdvisoryReply>) {
        let (replies, receiver) = mpsc::unbounded_channel();
        (Self { advisor, replies }, receiver)
    }

    #[must_use]
    pub fn advisor_id(&self) -> &str {
        self.advisor.id()
    }

    /// Spawn a task answering `request`. Must be called inside a tokio
    /// runtime.
    pub fn dispatch(&self, request: FeedbackRequest) -> JoinHandle<()> {
        let advisor = Arc::clone(&self.advisor);
        let replies = self.replies.clone();
        tokio::spawn(async move {
            let text = advisor.request_feedback(&request).await;
            let reply = AdvisoryReply {
                ticket: request.ticket,
                text,
            };
            if replies.send(reply).is_err() {
                log::debug!(
                    "advisory reply for sequence {} dropped: receiver closed",
                    request.ticket.sequence
                );
            }
        })
    }

    /// Dispatch every feedback request among `events`.
    pub fn dispatch_events(&self, events: &[SessionEvent]) -> Vec<JoinHandle<()>> {
        events
            .iter()
            .filter_map(SessionEvent::feedback_request)
            .map(|request| self.dispatch(request.clone()))
            .collect()
    }
}

/// Hand every reply already waiting on `receiver` to `session`. Returns how
/// many were accepted; stale ones are dropped by the session.
pub fn deliver_pending(
    session: &mut StageSession,
    receiver: &mut mpsc::UnboundedReceiver<AdvisoryReply>,
) -> usize {
    let mut accepted = 0;
    while let Ok(reply) = receiver.try_recv() {
        if session.deliver_feedback(reply.ticket, reply.text) {
            accepted += 1;
        }
    }
    accepted
}
