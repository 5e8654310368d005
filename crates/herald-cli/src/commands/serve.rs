//! `herald serve`: a `tiny_http` listener feeding the webhook handler.
//!
//! `tiny_http` blocks on accept, so the accept loop runs under
//! `spawn_blocking` and hands each request to a tokio task. Body reads and
//! response writes are blocking too and go back through `spawn_blocking`.

use std::io::Read;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, anyhow};
use herald_config::{HeraldConfig, ServerConfig};
use herald_engine::Router;
use herald_sink::{DeliverySink, DiscordWebhook};
use tiny_http::{Header, Method, Request, Response, Server};

use crate::cli::ServeArgs;
use crate::handler::{Reply, handle_webhook};

/// How often the accept loop rechecks the stop flag.
const ACCEPT_POLL: Duration = Duration::from_millis(500);

/// Handle `herald serve`. Runs until ctrl-c.
pub async fn handle(args: &ServeArgs, config: HeraldConfig) -> anyhow::Result<()> {
    let sink = DiscordWebhook::from_config(config.discord.require()?)
        .context("failed to build Discord sink")?;
    let mut server_config = config.server;
    if let Some(bind) = &args.bind {
        server_config.bind.clone_from(bind);
    }

    let listener = Listener::bind(&server_config, Router::new(config.classifier), sink)?;
    tracing::info!(
        addr = ?listener.local_addr(),
        path = %server_config.path,
        "listening for webhooks"
    );

    let shutdown = listener.shutdown_handle();
    let serving = tokio::spawn(listener.run());

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    tracing::info!("shutting down");
    shutdown.trigger();

    serving.await.context("listener task failed")?
}

struct State<S> {
    router: Router,
    sink: S,
    path: String,
    max_body_bytes: usize,
}

/// A bound webhook listener.
pub struct Listener<S> {
    server: Arc<Server>,
    state: Arc<State<S>>,
    stopping: Arc<AtomicBool>,
}

/// Stops a running [`Listener`] from another task.
#[derive(Clone)]
pub struct ShutdownHandle {
    server: Arc<Server>,
    stopping: Arc<AtomicBool>,
}

impl ShutdownHandle {
    pub fn trigger(&self) {
        self.stopping.store(true, Ordering::SeqCst);
        self.server.unblock();
    }
}

impl<S: DeliverySink + 'static> Listener<S> {
    /// # Errors
    ///
    /// Fails when `config.bind` cannot be bound.
    pub fn bind(config: &ServerConfig, router: Router, sink: S) -> anyhow::Result<Self> {
        let server = Server::http(&config.bind)
            .map_err(|error| anyhow!("failed to bind {}: {error}", config.bind))?;
        Ok(Self {
            server: Arc::new(server),
            state: Arc::new(State {
                router,
                sink,
                path: config.path.clone(),
                max_body_bytes: config.max_body_bytes,
            }),
            stopping: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            server: Arc::clone(&self.server),
            stopping: Arc::clone(&self.stopping),
        }
    }

    /// Accept requests until the shutdown handle fires.
    ///
    /// # Errors
    ///
    /// Fails only if the accept loop panics.
    pub async fn run(self) -> anyhow::Result<()> {
        let runtime = tokio::runtime::Handle::current();
        tokio::task::spawn_blocking(move || self.accept_loop(&runtime))
            .await
            .context("accept loop panicked")
    }

    fn accept_loop(&self, runtime: &tokio::runtime::Handle) {
        while !self.stopping.load(Ordering::SeqCst) {
            match self.server.recv_timeout(ACCEPT_POLL) {
                Ok(Some(request)) => {
                    runtime.spawn(serve_request(request, Arc::clone(&self.state)));
                }
                Ok(None) => {}
                Err(_) if self.stopping.load(Ordering::SeqCst) => break,
                Err(error) => tracing::warn!(%error, "failed to accept request"),
            }
        }
        tracing::debug!("accept loop stopped");
    }
}

async fn serve_request<S: DeliverySink + 'static>(request: Request, state: Arc<State<S>>) {
    let reader = Arc::clone(&state);
    let read = tokio::task::spawn_blocking(move || {
        let mut request = request;
        let body = read_body(&mut request, &reader.path, reader.max_body_bytes);
        (request, body)
    })
    .await;
    let Ok((request, body)) = read else {
        tracing::error!("request reader panicked");
        return;
    };

    let reply = match body {
        Ok(body) => handle_webhook(&state.router, &state.sink, &body).await,
        Err(reply) => {
            tracing::debug!(status = reply.status, message = %reply.ack.message, "request rejected");
            reply
        }
    };

    if tokio::task::spawn_blocking(move || respond(request, &reply))
        .await
        .is_err()
    {
        tracing::error!("response writer panicked");
    }
}

/// Route, method, and size checks, then the body itself.
fn read_body(request: &mut Request, path: &str, limit: usize) -> Result<String, Reply> {
    let url = request.url();
    let request_path = url.split_once('?').map_or(url, |(path, _)| path);
    if request_path != path {
        return Err(Reply::failed(404, "Not found"));
    }
    if *request.method() != Method::Post {
        return Err(Reply::failed(405, "Method not allowed"));
    }
    if request.body_length().is_some_and(|length| length > limit) {
        return Err(Reply::failed(413, "Payload too large"));
    }

    let mut body = String::new();
    let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
    match request.as_reader().take(cap).read_to_string(&mut body) {
        Ok(read) if read > limit => Err(Reply::failed(413, "Payload too large")),
        Ok(_) => Ok(body),
        Err(error) => Err(Reply::failed(400, format!("Unreadable body: {error}"))),
    }
}

fn respond(request: Request, reply: &Reply) {
    let body = serde_json::to_string(&reply.ack).unwrap_or_default();
    let mut response = Response::from_string(body).with_status_code(reply.status);
    if let Ok(header) = Header::from_bytes("Content-Type", "application/json") {
        response.add_header(header);
    }
    if let Err(error) = request.respond(response) {
        tracing::warn!(%error, "failed to write response");
    }
}
