use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use enhancer_core::{Fragment, FragmentScope, RequestId};
use enhancer_logging::{enhancer_debug, enhancer_warn};

use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::{decode_body, import_fragment, EngineEvent, FetchError};

enum EngineCommand {
    Fetch {
        request_id: RequestId,
        url: String,
        scope: FragmentScope,
    },
}

/// Runs fetches on a background tokio runtime and hands completions back over a channel.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: FetchSettings) -> std::io::Result<Self> {
        Self::with_fetcher(Arc::new(ReqwestFetcher::new(settings)))
    }

    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::Builder::new()
            .name("enhancer-engine".into())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let fetcher = fetcher.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(fetcher.as_ref(), command, event_tx).await;
                    });
                }
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn fetch(&self, request_id: RequestId, url: impl Into<String>, scope: FragmentScope) {
        let command = EngineCommand::Fetch {
            request_id,
            url: url.into(),
            scope,
        };
        if self.cmd_tx.send(command).is_err() {
            enhancer_warn!("engine thread is gone; dropping request {:?}", request_id);
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    fetcher: &dyn Fetcher,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Fetch {
            request_id,
            url,
            scope,
        } => {
            let result = load(fetcher, &url, &scope).await;
            if let Err(err) = &result {
                enhancer_debug!("request {:?} for {} failed: {}", request_id, url, err);
            }
            let _ = event_tx.send(EngineEvent::FetchCompleted { request_id, result });
        }
    }
}

async fn load(
    fetcher: &dyn Fetcher,
    url: &str,
    scope: &FragmentScope,
) -> Result<Fragment, FetchError> {
    let output = fetcher.fetch(url).await?;
    let decoded = decode_body(&output.bytes, output.metadata.content_type.as_deref());
    Ok(import_fragment(&decoded.text, scope))
}
