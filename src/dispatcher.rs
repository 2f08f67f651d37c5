//! Entry point tying the pre, process and post pipes to the transport.
use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use log::*;

use crate::codec::CodecService;
use crate::context::Context;
use crate::handler::{DefaultErrorHandler, Flow, Handler};
use crate::pipe::Pipe;
use crate::request::Request;
use crate::response::ResponseWriter;

const PRE: usize = 0;
const PROCESS: usize = 1;
const POST: usize = 2;

/// How a request's trip through the pipes ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every stage ran.
    Completed,
    /// A handler returned [`Flow::Stop`].
    Stopped,
    /// A handler failed and the error handler was called.
    Failed,
}

/// Runs every request through three pipes, in order: pre-processing,
/// processing and post-processing. If any handler fails, the remaining
/// handlers are skipped, the error is stored in the context's data under
/// [`ERROR_KEY`](crate::context::ERROR_KEY) and the error handler is called.
///
/// Handlers are registered through `&mut self` and requests are served
/// through `&self`, so all registration is done by the time a dispatcher is
/// shared between threads.
///
/// # Example
/// ```
/// use webpipe::prelude::*;
///
/// fn hello(ctx: &mut Context) -> Res {
///     ctx.response().write_all(b"Hello!")?;
///     Ok(Flow::Continue)
/// }
///
/// fn powered_by(ctx: &mut Context) -> Res {
///     ctx.response().set_header("X-Powered-By", "webpipe");
///     Ok(Flow::Continue)
/// }
///
/// let mut dispatcher = Dispatcher::new(JsonCodecService::new());
/// dispatcher
///     .append_handler(hello.named("hello"))
///     .append_post_handler(powered_by.named("powered_by"));
///
/// let mut response = Response::default();
/// let outcome = dispatcher.serve(Request::new(Method::GET, "/"), &mut response);
///
/// assert_eq!(outcome, Outcome::Completed);
/// assert_eq!(response.body(), b"Hello!");
/// assert_eq!(response.header("x-powered-by"), Some("webpipe"));
/// assert_eq!(
///     dispatcher.to_string(),
///     "Pipe 0:\nPipe 1:\n  hello\nPipe 2:\n  powered_by"
/// );
/// ```
pub struct Dispatcher {
    codec_service: Arc<dyn CodecService>,
    stages: [Pipe; 3],
    handlers: Pipe,
    error_handler: OnceLock<Arc<dyn Handler>>,
}

impl Dispatcher {
    pub fn new<C>(codec_service: C) -> Self
    where
        C: 'static + CodecService,
    {
        Self::with_shared_codec(Arc::new(codec_service))
    }

    /// Create a dispatcher using a codec service shared with other code.
    pub fn with_shared_codec(codec_service: Arc<dyn CodecService>) -> Self {
        let stages = [Pipe::new(), Pipe::new(), Pipe::new()];
        Self {
            codec_service,
            handlers: nest(&stages),
            stages,
            error_handler: OnceLock::new(),
        }
    }

    pub fn codec_service(&self) -> &Arc<dyn CodecService> {
        &self.codec_service
    }

    /// Serve one request: build its context and run it through the pipes.
    pub fn serve(&self, request: Request, response: &mut dyn ResponseWriter) -> Outcome {
        let mut context = Context::new(request, response, self.codec_service.clone());
        self.dispatch(&mut context)
    }

    /// Run an already built context through the pipes, calling the error
    /// handler if a handler fails.
    pub fn dispatch(&self, context: &mut Context<'_>) -> Outcome {
        let start = Instant::now();
        debug!(
            "dispatching {} {}",
            context.request().method,
            context.request().path
        );
        let outcome = match self.handlers.handle(context) {
            Ok(Flow::Continue) => Outcome::Completed,
            Ok(Flow::Stop) => Outcome::Stopped,
            Err(err) => {
                warn!("handler error: {}", err);
                context.data_mut().set_error(err);
                // The error handler's own result goes nowhere.
                if let Err(err) = self.error_handler().handle(context) {
                    debug!("error handler failed: {}", err);
                }
                Outcome::Failed
            }
        };
        let status_code = context.response().status_code();
        info!(
            "{:?} - {}ms - {} {} -> {:?} {}",
            std::thread::current().id(),
            start.elapsed().as_millis(),
            context.request().method,
            context.request().path,
            outcome,
            status_code,
        );
        outcome
    }

    /// The error handler. Falls back to a [`DefaultErrorHandler`], created on
    /// first use and kept, when none was set.
    pub fn error_handler(&self) -> Arc<dyn Handler> {
        self.error_handler
            .get_or_init(|| Arc::new(DefaultErrorHandler))
            .clone()
    }

    /// Replace the error handler.
    ///
    /// The error handler is called like any other handler with the error in
    /// the context's data, except that its `will_handle` is never called and
    /// whatever it returns (stop or error) is ignored. Log errors from inside
    /// the error handler if you need them.
    pub fn set_error_handler<H>(&mut self, handler: H) -> &mut Self
    where
        H: 'static + Handler,
    {
        let handler: Arc<dyn Handler> = Arc::new(handler);
        self.error_handler = OnceLock::from(handler);
        self
    }

    /// The outer pipe holding the pre, process and post pipes.
    pub fn handlers(&self) -> &Pipe {
        &self.handlers
    }

    /// Handlers executed before processing begins.
    pub fn pre_handlers_pipe(&self) -> &Pipe {
        &self.stages[PRE]
    }

    /// Handlers doing the processing.
    pub fn handlers_pipe(&self) -> &Pipe {
        &self.stages[PROCESS]
    }

    /// Handlers executed after processing completes.
    pub fn post_handlers_pipe(&self) -> &Pipe {
        &self.stages[POST]
    }

    /// Append a handler to the processing pipe.
    pub fn append_handler<H: 'static + Handler>(&mut self, handler: H) -> &mut Self {
        let pipe = self.stages[PROCESS].append_handler(handler);
        self.set_stage(PROCESS, pipe)
    }

    /// Prepend a handler to the processing pipe.
    pub fn prepend_handler<H: 'static + Handler>(&mut self, handler: H) -> &mut Self {
        let pipe = self.stages[PROCESS].prepend_handler(handler);
        self.set_stage(PROCESS, pipe)
    }

    /// Append a handler to be executed before processing begins.
    pub fn append_pre_handler<H: 'static + Handler>(&mut self, handler: H) -> &mut Self {
        let pipe = self.stages[PRE].append_handler(handler);
        self.set_stage(PRE, pipe)
    }

    /// Prepend a handler to be executed before processing begins.
    pub fn prepend_pre_handler<H: 'static + Handler>(&mut self, handler: H) -> &mut Self {
        let pipe = self.stages[PRE].prepend_handler(handler);
        self.set_stage(PRE, pipe)
    }

    /// Append a handler to be executed after processing completes.
    pub fn append_post_handler<H: 'static + Handler>(&mut self, handler: H) -> &mut Self {
        let pipe = self.stages[POST].append_handler(handler);
        self.set_stage(POST, pipe)
    }

    /// Prepend a handler to be executed after processing completes.
    pub fn prepend_post_handler<H: 'static + Handler>(&mut self, handler: H) -> &mut Self {
        let pipe = self.stages[POST].prepend_handler(handler);
        self.set_stage(POST, pipe)
    }

    fn set_stage(&mut self, index: usize, pipe: Pipe) -> &mut Self {
        self.stages[index] = pipe;
        self.handlers = nest(&self.stages);
        self
    }
}

fn nest(stages: &[Pipe; 3]) -> Pipe {
    stages
        .iter()
        .fold(Pipe::new(), |outer, stage| outer.append_handler(stage.clone()))
}

/// Lists the registered handlers, see [`Pipe`]'s `Display`.
impl fmt::Display for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.handlers)
    }
}
