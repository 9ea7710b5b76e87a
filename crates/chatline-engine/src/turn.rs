//! Turn driver: pumps one turn's reply stream into the session's event channel.
//!
//! Every turn produces `Connected`, then any number of `Chunk`s, then exactly
//! one terminal event (`Finished`, `Failed` or `Cancelled`). The terminal
//! event is sent on every path, which is what releases the busy gate.

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{trace, warn};

use crate::session::{TurnEvent, TurnEventKind, TurnId, TurnTicket};
use crate::transport::{ChatRequest, ChatTransport, TransportError};

/// Channel end the driver reports into.
pub type TurnEventSender = mpsc::UnboundedSender<TurnEvent>;

/// Run one turn to completion, failure or cancellation.
pub async fn run_turn<T>(transport: &T, ticket: TurnTicket, sink: &TurnEventSender)
where
    T: ChatTransport + ?Sized,
{
    let TurnTicket {
        id,
        request,
        cancel,
    } = ticket;

    let terminal = tokio::select! {
        biased;
        () = cancel.cancelled() => TurnEventKind::Cancelled,
        result = pump(transport, id, &request, sink) => match result {
            Ok(()) => TurnEventKind::Finished,
            Err(err) => {
                warn!(turn = %id, error = %err, "Chat transport failed");
                TurnEventKind::Failed(err.to_string())
            }
        },
    };

    // Receiver gone means the UI is shutting down.
    let _ = sink.send(TurnEvent::new(id, terminal));
}

/// Spawn [`run_turn`] on the tokio runtime.
pub fn spawn_turn(
    transport: Arc<dyn ChatTransport>,
    ticket: TurnTicket,
    sink: TurnEventSender,
) -> JoinHandle<()> {
    tokio::spawn(async move { run_turn(transport.as_ref(), ticket, &sink).await })
}

async fn pump<T>(
    transport: &T,
    id: TurnId,
    request: &ChatRequest,
    sink: &TurnEventSender,
) -> Result<(), TransportError>
where
    T: ChatTransport + ?Sized,
{
    let mut stream = transport.submit(request).await?;
    let _ = sink.send(TurnEvent::new(id, TurnEventKind::Connected));

    while let Some(fragment) = stream.next().await {
        let text = fragment?;
        trace!(turn = %id, len = text.len(), "Fragment received");
        let _ = sink.send(TurnEvent::new(id, TurnEventKind::Chunk(text)));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{ChatSession, ERROR_REPLY};
    use crate::transport::TextStream;
    use async_trait::async_trait;
    use futures::stream;
    use reqwest::StatusCode;
    use std::sync::Mutex;

    /// Transport that replays a fixed script.
    enum Script {
        Reply(Vec<&'static str>),
        ReplyThenHang(Vec<&'static str>),
        Status(StatusCode),
    }

    struct ScriptedTransport {
        script: Script,
        seen: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedTransport {
        fn new(script: Script) -> Self {
            Self {
                script,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatTransport for ScriptedTransport {
        async fn submit(&self, request: &ChatRequest) -> Result<TextStream, TransportError> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.script {
                Script::Reply(chunks) => {
                    let items: Vec<Result<String, TransportError>> =
                        chunks.iter().map(|c| Ok((*c).to_string())).collect();
                    Ok(stream::iter(items).boxed())
                }
                Script::ReplyThenHang(chunks) => {
                    let items: Vec<Result<String, TransportError>> =
                        chunks.iter().map(|c| Ok((*c).to_string())).collect();
                    Ok(stream::iter(items).chain(stream::pending()).boxed())
                }
                Script::Status(status) => Err(TransportError::Status(*status)),
            }
        }
    }

    async fn drain(rx: &mut mpsc::UnboundedReceiver<TurnEvent>) -> Vec<TurnEventKind> {
        let mut kinds = Vec::new();
        while let Some(event) = rx.recv().await {
            let terminal = event.is_terminal();
            kinds.push(event.kind);
            if terminal {
                break;
            }
        }
        kinds
    }

    #[tokio::test]
    async fn test_streams_chunks_then_finishes() {
        let transport = ScriptedTransport::new(Script::Reply(vec!["He", "llo"]));
        let mut session = ChatSession::new();
        let ticket = session.submit("hi").unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();

        run_turn(&transport, ticket, &tx).await;
        let kinds = drain(&mut rx).await;

        assert_eq!(
            kinds,
            vec![
                TurnEventKind::Connected,
                TurnEventKind::Chunk("He".into()),
                TurnEventKind::Chunk("llo".into()),
                TurnEventKind::Finished,
            ]
        );
        assert_eq!(transport.seen.lock().unwrap()[0].message, "hi");
    }

    #[tokio::test]
    async fn test_status_failure_reports_failed() {
        let transport = ScriptedTransport::new(Script::Status(StatusCode::INTERNAL_SERVER_ERROR));
        let mut session = ChatSession::new();
        let ticket = session.submit("hi").unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();

        run_turn(&transport, ticket, &tx).await;
        while let Ok(event) = rx.try_recv() {
            session.apply(event);
        }

        assert!(!session.is_busy());
        assert_eq!(session.conversation().last().unwrap().content, ERROR_REPLY);
    }

    #[tokio::test]
    async fn test_cancellation_ends_hung_stream() {
        let transport: Arc<dyn ChatTransport> =
            Arc::new(ScriptedTransport::new(Script::ReplyThenHang(vec!["partial"])));
        let mut session = ChatSession::new();
        let ticket = session.submit("hi").unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = spawn_turn(transport, ticket, tx);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.kind, TurnEventKind::Connected);
        session.apply(first);
        let second = rx.recv().await.unwrap();
        session.apply(second);

        session.cancel();
        handle.await.unwrap();

        let last = rx.recv().await.unwrap();
        assert_eq!(last.kind, TurnEventKind::Cancelled);
        assert!(!session.apply(last));
        assert_eq!(session.conversation().last().unwrap().content, "partial");
    }

    #[tokio::test]
    async fn test_closed_receiver_does_not_panic() {
        let transport = ScriptedTransport::new(Script::Reply(vec!["x"]));
        let mut session = ChatSession::new();
        let ticket = session.submit("hi").unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        run_turn(&transport, ticket, &tx).await;
    }
}
