use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use pokedex_core::CatalogSource;

use crate::tui_event::{BackendCommand, BackendEvent};

/// Listen for commands and run each fetch on its own task.
///
/// Fetches are never awaited inline so a slow page cannot block a newer
/// request; the controllers discard superseded completions.
pub async fn run(
    source: Arc<dyn CatalogSource>,
    mut cmd_rx: mpsc::UnboundedReceiver<BackendCommand>,
    event_tx: mpsc::UnboundedSender<BackendEvent>,
    cancel: CancellationToken,
) {
    loop {
        let cmd = tokio::select! {
            _ = cancel.cancelled() => break,
            cmd = cmd_rx.recv() => match cmd {
                Some(cmd) => cmd,
                None => break,
            },
        };

        let source = Arc::clone(&source);
        let tx = event_tx.clone();
        tokio::spawn(async move {
            let event = match cmd {
                BackendCommand::LoadPage(request) => {
                    let result = source.fetch_page(&request.cursor).await;
                    BackendEvent::PageLoaded { request, result }
                }
                BackendCommand::LoadDetail(request) => {
                    let result = source.fetch_detail(&request.identifier).await;
                    BackendEvent::DetailLoaded { request, result }
                }
            };
            // TUI gone: nothing left to report to.
            let _ = tx.send(event);
        });
    }
    tracing::debug!(source = source.name(), "backend stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokedex_core::source::mock::{MockSource, fixture_detail, fixture_page};
    use pokedex_core::{DetailRequest, PageCursor, PageDirection, PageRequest};

    #[tokio::test]
    async fn forwards_results_for_each_command() {
        let source = Arc::new(
            MockSource::new()
                .with_page(PageCursor::First, fixture_page(&["bulbasaur"], 1, None, None))
                .with_detail(fixture_detail("bulbasaur", 1, 2)),
        );
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(source.clone(), cmd_rx, event_tx, cancel.clone()));

        cmd_tx
            .send(BackendCommand::LoadPage(PageRequest {
                generation: 1,
                cursor: PageCursor::First,
                direction: PageDirection::Initial,
            }))
            .unwrap();
        match event_rx.recv().await.unwrap() {
            BackendEvent::PageLoaded { request, result } => {
                assert_eq!(request.generation, 1);
                assert_eq!(result.unwrap().entries[0].name, "bulbasaur");
            }
            other => panic!("unexpected event: {other:?}"),
        }

        cmd_tx
            .send(BackendCommand::LoadDetail(DetailRequest {
                generation: 1,
                identifier: "nobody".into(),
            }))
            .unwrap();
        match event_rx.recv().await.unwrap() {
            BackendEvent::DetailLoaded { result, .. } => {
                assert!(result.unwrap_err().is_not_found());
            }
            other => panic!("unexpected event: {other:?}"),
        }

        cancel.cancel();
        handle.await.unwrap();
        assert_eq!(source.call_count(), 2);
    }
}
