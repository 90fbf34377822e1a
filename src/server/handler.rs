//! Request handler callback types.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::tcp::OwnedWriteHalf;

use crate::parser::Request;
use crate::server::response::ResponseWriter;

/// The writer handed to a handler, bound to the connection's write half.
pub type ConnectionWriter = ResponseWriter<OwnedWriteHalf>;

/// Type alias for a boxed future that completes when the handler is done.
pub type HandlerFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Type alias for a handler function that takes the connection's writer and
/// the parsed request.
pub type HandlerFn = Arc<dyn Fn(ConnectionWriter, Request) -> HandlerFuture + Send + Sync>;

/// Box a handler closure into a [`HandlerFn`].
pub(crate) fn boxed<F, Fut>(handler: F) -> HandlerFn
where
    F: Fn(ConnectionWriter, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move |writer: ConnectionWriter, request: Request| -> HandlerFuture {
        Box::pin(handler(writer, request))
    })
}
