use std::sync::Arc;

use selectra_core::{CreateHandler, CreateRequest, CreationError};
use tokio::sync::mpsc::UnboundedSender;

use crate::event::AppEvent;

/// Run a create call in the background and report back on `tx`.
///
/// A panicking or cancelled handler is reported as `CreationError::Aborted`.
pub fn spawn_create(
    tx: UnboundedSender<AppEvent>,
    handler: Arc<dyn CreateHandler>,
    request: CreateRequest,
) {
    tokio::spawn(async move {
        let CreateRequest { id, text } = request;
        let call = {
            let text = text.clone();
            tokio::spawn(async move { handler.create_option(&text).await })
        };

        let result = match call.await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("create task for {text:?} failed: {e}");
                Err(CreationError::Aborted(text))
            }
        };

        let _ = tx.send(AppEvent::CreationFinished { id, result });
    });
}
