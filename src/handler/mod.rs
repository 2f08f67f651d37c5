//! Base for all request handlers.
use std::error;
use std::fmt;
use std::io;

use crate::codec::CodecError;
use crate::context::Context;
use crate::filter::{Conditional, Named};
use crate::pipe::Pipe;

pub mod fallback;

pub use fallback::DefaultErrorHandler;

/// What the enclosing pipe should do after a handler returns successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Run the next handler.
    Continue,
    /// The request is fully handled, skip every remaining handler.
    Stop,
}

pub type Res = std::result::Result<Flow, HandlerError>;

/// A Handler processes (or partially processes) a request. Handlers are
/// shared between requests; anything that belongs to a single request lives
/// in the [`Context`](crate::context::Context).
///
/// Plain functions with the right signature are handlers:
/// ```
/// use webpipe::prelude::*;
///
/// fn hello(ctx: &mut Context) -> Res {
///     ctx.response().write_all(b"Hello!")?;
///     Ok(Flow::Stop)
/// }
///
/// let pipe = Pipe::new().append_handler(hello);
/// # assert_eq!(pipe.len(), 1);
/// ```
pub trait Handler: Send + Sync {
    fn handle(&self, context: &mut Context<'_>) -> Res;

    /// Checked by the enclosing pipe before `handle`; return false to skip
    /// this handler for the current request. Never consulted for pipes or
    /// for the error handler.
    fn will_handle(&self, _context: &Context<'_>) -> bool {
        true
    }

    /// Label used in handler dumps.
    fn name(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }

    /// Pipes return themselves here so traversal and dumps can recurse.
    fn as_pipe(&self) -> Option<&Pipe> {
        None
    }

    /// Only run this handler when `predicate` holds for the request.
    ///
    /// A gated pipe is a leaf: it is checked like any other handler and
    /// dumps as a single line.
    fn when<P>(self, predicate: P) -> Conditional<Self, P>
    where
        P: Fn(&Context<'_>) -> bool + Send + Sync,
        Self: Sized,
    {
        Conditional::new(predicate, self)
    }

    /// Give this handler a readable label for dumps.
    ///
    /// A named pipe dumps as that one label, not as a nested `Pipe <n>:` block.
    fn named(self, name: &str) -> Named<Self>
    where
        Self: Sized,
    {
        Named::new(name, self)
    }
}

pub type HandlerFunc = Box<dyn Fn(&mut Context<'_>) -> Res + Send + Sync>;

/// Boxed closure handler with a name.
///
/// Prefer this over passing a closure directly: the `Fn` bound on `new`
/// lets the compiler infer the closure's argument type.
/// ```
/// use webpipe::prelude::*;
///
/// let handler = FnHandler::new("teapot", |ctx| {
///     ctx.response().set_status(418);
///     Ok(Flow::Stop)
/// });
/// # assert_eq!(handler.name(), "teapot");
/// ```
pub struct FnHandler {
    name: String,
    f: HandlerFunc,
}

impl FnHandler {
    pub fn new<F>(name: &str, f: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> Res + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            f: Box::new(f),
        }
    }
}

impl Handler for FnHandler {
    fn handle(&self, context: &mut Context<'_>) -> Res {
        (self.f)(context)
    }
    fn name(&self) -> String {
        self.name.clone()
    }
}

impl<F> Handler for F
where
    F: Fn(&mut Context<'_>) -> Res + Send + Sync,
{
    fn handle(&self, context: &mut Context<'_>) -> Res {
        (self)(context)
    }
}

/// Failure returned by a handler. Carries an optional HTTP status code for
/// error handlers that want one.
#[derive(Debug)]
pub struct HandlerError {
    reason: String,
    status_code: Option<u16>,
    source: Option<Box<dyn error::Error + Send + Sync + 'static>>,
}

impl HandlerError {
    pub fn new(reason: &str) -> Self {
        Self {
            reason: reason.to_string(),
            status_code: None,
            source: None,
        }
    }
    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }
    pub fn reason(&self) -> &str {
        &self.reason
    }
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", &self.reason)
    }
}

impl error::Error for HandlerError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn error::Error + 'static))
    }
}

impl From<io::Error> for HandlerError {
    fn from(err: io::Error) -> Self {
        HandlerError::new(&format!("IOError({})", err)).with_source(err)
    }
}

impl From<CodecError> for HandlerError {
    fn from(err: CodecError) -> Self {
        HandlerError::new(&err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::new(&err.to_string()).with_source(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_display_is_reason() {
        let err = HandlerError::new("boom").with_status(503);
        assert_eq!(err.to_string(), "boom");
        assert_eq!(err.status_code(), Some(503));
        assert!(err.source().is_none());
    }

    #[test]
    fn test_error_from_io_keeps_source() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed");
        let err = HandlerError::from(io_err);
        assert_eq!(err.to_string(), "IOError(pipe closed)");
        assert_eq!(err.status_code(), None);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_fn_handler_name() {
        let handler = FnHandler::new("noop", |_ctx| Ok(Flow::Continue));
        assert_eq!(handler.name(), "noop");
        assert!(handler.as_pipe().is_none());
    }
}
