use futures_util::StreamExt;
use tracing::{debug, info};

use crate::session::{ChatSession, ChatState};
use crate::transport::{ChatTransport, ChunkStream};

/// Drives a [`ChatSession`] against a transport, one request at a time.
pub struct Assembler<T> {
    transport: T,
    session: ChatSession,
}

impl<T: ChatTransport> Assembler<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            session: ChatSession::new(),
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ChatSession {
        &mut self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_session(self) -> ChatSession {
        self.session
    }

    /// Submit `text` and read the whole response. Returns `false` if the
    /// submission was rejected (blank input).
    pub async fn submit(&mut self, text: &str) -> bool {
        self.submit_with(text, |_| {}).await
    }

    /// Like [`Assembler::submit`], calling `on_update` after every change to
    /// the conversation so callers can render partial text.
    pub async fn submit_with<F>(&mut self, text: &str, mut on_update: F) -> bool
    where
        F: FnMut(&ChatSession),
    {
        let request = match self.session.submit_text(text) {
            Ok(request) => request,
            Err(e) => {
                debug!("submission ignored: {e}");
                return false;
            }
        };
        on_update(&self.session);

        match self.transport.open(&request).await {
            Ok(stream) => {
                // Sending -> Streaming cannot fail right after a submit.
                if self.session.begin_response().is_ok() {
                    on_update(&self.session);
                    self.pump(stream, &mut on_update).await;
                }
            }
            Err(failure) => {
                let _ = self.session.fail(&failure);
                on_update(&self.session);
            }
        }
        info!(
            messages = self.session.conversation().len(),
            failed = self.session.last_failure().is_some(),
            "chat response complete"
        );
        true
    }

    async fn pump<F>(&mut self, mut stream: ChunkStream, on_update: &mut F)
    where
        F: FnMut(&ChatSession),
    {
        while self.session.state() == ChatState::Streaming {
            match stream.next().await {
                Some(Ok(chunk)) => {
                    let _ = self.session.apply_chunk(&chunk);
                }
                Some(Err(failure)) => {
                    let _ = self.session.fail(&failure);
                }
                None => {
                    let _ = self.session.finish();
                }
            }
            on_update(&self.session);
        }
        // Dropping the stream here releases the connection.
    }
}
