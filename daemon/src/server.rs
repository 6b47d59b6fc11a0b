use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::fs;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::time::{timeout, Duration};
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::protocol::{
    DaemonRequest, DaemonResponse, ErrorCode, ErrorResponse, RequestBody, ResponseBody,
};
use crate::research::ResearchRouter;

pub struct ResearchServer {
    config: ServerConfig,
    router: Arc<ResearchRouter>,
}

impl ResearchServer {
    pub fn new(config: ServerConfig, router: ResearchRouter) -> Self {
        Self {
            config,
            router: Arc::new(router),
        }
    }

    pub async fn run(&self) -> Result<()> {
        self.prepare_socket_path().await?;
        if self.config.socket_path.exists() {
            fs::remove_file(&self.config.socket_path)
                .await
                .with_context(|| {
                    format!(
                        "failed to cleanup stale socket {}",
                        self.config.socket_path.display()
                    )
                })?;
        }

        let listener = UnixListener::bind(&self.config.socket_path).with_context(|| {
            format!(
                "failed to bind unix socket at {}",
                self.config.socket_path.display()
            )
        })?;
        info!(
            "keyscout daemon listening on {}",
            self.config.socket_path.display()
        );

        loop {
            let (stream, _) = listener.accept().await?;
            let router = self.router.clone();
            let timeout_ms = self.config.request_timeout_ms;
            tokio::spawn(async move {
                if let Err(error) = handle_connection(stream, router, timeout_ms).await {
                    warn!("connection closed with error: {error:#}");
                }
            });
        }
    }

    async fn prepare_socket_path(&self) -> Result<()> {
        if let Some(parent) = Path::new(&self.config.socket_path).parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("failed to create socket directory {}", parent.display())
            })?;
        }
        Ok(())
    }
}

async fn handle_connection(
    stream: UnixStream,
    router: Arc<ResearchRouter>,
    timeout_ms: u64,
) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = process_line(line, router.clone(), timeout_ms).await;
        let payload = serde_json::to_string(&response)?;
        writer.write_all(payload.as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }
    Ok(())
}

async fn process_line(
    line: String,
    router: Arc<ResearchRouter>,
    timeout_ms: u64,
) -> DaemonResponse {
    match serde_json::from_str::<DaemonRequest>(&line) {
        Ok(request) => handle_request(request, router, timeout_ms).await,
        Err(error) => {
            error!("invalid request JSON: {error}");
            DaemonResponse {
                id: String::new(),
                body: ResponseBody::Error(ErrorResponse {
                    code: ErrorCode::InvalidRequest,
                    message: format!("invalid JSON payload: {error}"),
                }),
            }
        }
    }
}

async fn handle_request(
    request: DaemonRequest,
    router: Arc<ResearchRouter>,
    timeout_ms: u64,
) -> DaemonResponse {
    let id = request.id;
    match request.body {
        RequestBody::Ping => DaemonResponse {
            id,
            body: ResponseBody::Pong,
        },
        RequestBody::Search(search_request) => {
            if search_request.query.trim().is_empty() {
                return DaemonResponse {
                    id,
                    body: ResponseBody::Error(ErrorResponse {
                        code: ErrorCode::InvalidRequest,
                        message: "query must not be empty".to_string(),
                    }),
                };
            }
            // A timed-out search drops its in-flight upstream fetches with
            // the future and degrades to an error response.
            match timeout(
                Duration::from_millis(timeout_ms.max(1)),
                router.search(search_request),
            )
            .await
            {
                Ok(response) => DaemonResponse {
                    id,
                    body: ResponseBody::Search(response),
                },
                Err(_) => DaemonResponse {
                    id,
                    body: ResponseBody::Error(ErrorResponse {
                        code: ErrorCode::Timeout,
                        message: format!("search exceeded {}ms", timeout_ms.max(1)),
                    }),
                },
            }
        }
        RequestBody::Like(like_request) => match router.like(&like_request) {
            Ok(Some(likes)) => DaemonResponse {
                id,
                body: ResponseBody::Like(crate::protocol::LikeResponse { likes }),
            },
            Ok(None) => DaemonResponse {
                id,
                body: ResponseBody::Error(ErrorResponse {
                    code: ErrorCode::InvalidRequest,
                    message: format!("no stored record for query {:?}", like_request.query),
                }),
            },
            Err(error) => {
                error!("like request failed: {error:#}");
                DaemonResponse {
                    id,
                    body: ResponseBody::Error(ErrorResponse {
                        code: ErrorCode::Internal,
                        message: "failed to record like".to_string(),
                    }),
                }
            }
        },
    }
}
