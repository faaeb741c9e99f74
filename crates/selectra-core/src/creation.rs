use async_trait::async_trait;

use crate::error::CreationError;

/// External operation that turns unmatched search text into a new option.
///
/// Returns the value of the created option when the handler knows it; the
/// widget then treats that value as selected. Extending the candidate set is
/// the handler's job, never the widget's.
#[async_trait]
pub trait CreateHandler: Send + Sync {
    async fn create_option(&self, text: &str) -> Result<Option<String>, CreationError>;
}

/// Ticket for one in-flight create call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    pub id: u64,
    pub text: String,
}

/// Guards against concurrent create calls on one widget.
#[derive(Debug, Default)]
pub(crate) struct CreationGuard {
    next_id: u64,
    pending: Option<u64>,
}

impl CreationGuard {
    pub(crate) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Issue a ticket unless one is already out.
    pub(crate) fn begin(&mut self, text: &str) -> Option<CreateRequest> {
        if self.pending.is_some() {
            return None;
        }
        self.next_id += 1;
        self.pending = Some(self.next_id);
        Some(CreateRequest {
            id: self.next_id,
            text: text.to_string(),
        })
    }

    /// Settle the ticket. False for a ticket that is not the pending one.
    pub(crate) fn settle(&mut self, id: u64) -> bool {
        if self.pending == Some(id) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn abandon(&mut self) {
        self.pending = None;
    }
}
