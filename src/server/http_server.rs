//! HTTP server implementation.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::io::AsyncWrite;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use log::{debug, error, info, warn};

use crate::parser::{Error as ParserError, Request};
use crate::server::config::ServerConfig;
use crate::server::error::Error;
use crate::server::handler::{self, ConnectionWriter, HandlerFn};
use crate::server::response::{default_headers, ResponseWriter, StatusCode};

/// A running HTTP server.
///
/// Each accepted connection is served by its own task: one request is read,
/// handed to the handler together with a [`ResponseWriter`], and the
/// connection is closed once the handler finishes.
pub struct Server {
    local_addr: SocketAddr,
    closed: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    accept_loop: Mutex<Option<JoinHandle<()>>>,
}

impl Server {
    /// Bind on every interface at `port` and start accepting connections.
    pub async fn serve<F, Fut>(port: u16, handler: F) -> Result<Self, Error>
    where
        F: Fn(ConnectionWriter, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::serve_with_config(ServerConfig::with_port(port), handler).await
    }

    /// Bind according to `config` and start accepting connections.
    ///
    /// Returns as soon as the listener is bound; accepting happens on a
    /// background task.
    pub async fn serve_with_config<F, Fut>(config: ServerConfig, handler: F) -> Result<Self, Error>
    where
        F: Fn(ConnectionWriter, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(config.addr)
            .await
            .map_err(|source| Error::Bind { addr: config.addr, source })?;
        let local_addr = listener.local_addr()?;
        info!("Server listening on http://{local_addr}");

        let closed = Arc::new(AtomicBool::new(false));
        let shutdown = Arc::new(Notify::new());
        let accept_loop = tokio::spawn(Self::listen(
            listener,
            handler::boxed(handler),
            closed.clone(),
            shutdown.clone(),
            config.read_buffer_size,
        ));

        Ok(Self {
            local_addr,
            closed,
            shutdown,
            accept_loop: Mutex::new(Some(accept_loop)),
        })
    }

    /// The address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Stop accepting connections and release the listener.
    ///
    /// Connections already being served run to completion. Calling this
    /// again, or concurrently, does nothing and returns `Ok(())`.
    pub async fn close(&self) -> Result<(), Error> {
        if self
            .closed
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Ok(());
        }
        self.shutdown.notify_one();

        let accept_loop = self
            .accept_loop
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(accept_loop) = accept_loop {
            if let Err(e) = accept_loop.await {
                error!("Accept loop failed: {e}");
            }
        }

        info!("Server on {addr} closed", addr = self.local_addr);
        Ok(())
    }

    async fn listen(
        listener: TcpListener,
        handler: HandlerFn,
        closed: Arc<AtomicBool>,
        shutdown: Arc<Notify>,
        read_buffer_size: usize,
    ) {
        loop {
            tokio::select! {
                biased;

                _ = shutdown.notified() => break,

                accept_result = listener.accept() => match accept_result {
                    Ok((socket, addr)) => {
                        debug!("Accepted connection from {addr}");
                        let handler = handler.clone();
                        tokio::spawn(async move {
                            Self::handle_connection(socket, addr, handler, read_buffer_size).await;
                        });
                    }
                    Err(e) => {
                        if Self::stop_after_accept_error(&closed, &e) {
                            break;
                        }
                    }
                }
            }
        }
        debug!("Accept loop stopped");
    }

    /// An accept error ends the loop only once the server has been closed;
    /// anything else is logged and accepting continues.
    pub(crate) fn stop_after_accept_error(closed: &AtomicBool, err: &std::io::Error) -> bool {
        if closed.load(Ordering::SeqCst) {
            return true;
        }
        warn!("Error accepting connection: {err}");
        false
    }

    /// Serve a single connection: read one request, run the handler, close.
    async fn handle_connection(
        socket: TcpStream,
        addr: SocketAddr,
        handler: HandlerFn,
        read_buffer_size: usize,
    ) {
        let (mut reader, writer) = socket.into_split();
        let mut writer = ResponseWriter::new(writer);

        let request = match Request::from_reader_with_capacity(&mut reader, read_buffer_size).await {
            Ok(request) => request,
            Err(e) => {
                warn!("Error reading request from {addr}: {e}");
                if let Err(e) = Self::write_bad_request(&mut writer, &e).await {
                    error!("Error writing 400 response to {addr}: {e}");
                }
                return;
            }
        };

        debug!(
            "{method} {target} from {addr}",
            method = request.request_line.method,
            target = request.request_line.target
        );
        handler(writer, request).await;
    }

    /// Best-effort `400 Bad Request` carrying the parse error as its body.
    pub(crate) async fn write_bad_request<W>(
        writer: &mut ResponseWriter<W>,
        err: &ParserError,
    ) -> Result<(), Error>
    where
        W: AsyncWrite + Unpin,
    {
        let body = err.to_string();
        writer.write_status_line(StatusCode::BAD_REQUEST).await?;
        writer.write_headers(&default_headers(body.len())).await?;
        writer.write_body(body.as_bytes()).await?;
        writer.flush().await
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.shutdown.notify_one();
        }
    }
}
