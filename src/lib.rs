//! A small framework for handling HTTP requests with pipes of handlers.
//! * Composable [handlers](crate::handler::Handler) and nestable [pipes](crate::pipe::Pipe)
//! * Pre-processing, processing and post-processing stages in a [dispatcher](crate::dispatcher::Dispatcher)
//! * A per-request [context](crate::context::Context) with scratch data shared by the handlers
//! * A configurable error handler, with a [plain text default](crate::handler::DefaultErrorHandler)
//! * [JSON bodies](crate::codec::json) with [`serde_json`](serde_json)
//!
//! Routing, content negotiation and networking are left to other crates:
//! the dispatcher takes a [`Request`](crate::request::Request) and writes to
//! any [`ResponseWriter`](crate::response::ResponseWriter).
//!
//! # Example
//! ```
//! use webpipe::prelude::*;
//! use serde_json::json;
//!
//! fn request_id(ctx: &mut Context) -> Res {
//!     ctx.data_mut().set("request_id", 42)?;
//!     Ok(Flow::Continue)
//! }
//!
//! fn person(ctx: &mut Context) -> Res {
//!     let id = ctx.data().get("request_id").cloned();
//!     ctx.write_value(200, &json!({"name": "Bob", "request_id": id}))?;
//!     Ok(Flow::Continue)
//! }
//!
//! fn not_found(_ctx: &mut Context) -> Res {
//!     Err(HandlerError::new("no such person").with_status(404))
//! }
//!
//! let mut dispatcher = Dispatcher::new(JsonCodecService::new());
//! dispatcher
//!     .append_pre_handler(request_id)
//!     .append_handler(person.when(|ctx| ctx.request().path == "/person/bob"))
//!     .append_handler(not_found.when(|ctx| ctx.request().path != "/person/bob"));
//!
//! let mut response = Response::default();
//! dispatcher.serve(Request::new(Method::GET, "/person/bob"), &mut response);
//! assert_eq!(response.body(), br#"{"name":"Bob","request_id":42}"#);
//!
//! let mut response = Response::default();
//! dispatcher.serve(Request::new(Method::GET, "/person/alice"), &mut response);
//! assert_eq!(response.status_code, 404);
//! assert_eq!(response.body(), b"no such person");
//! ```
pub mod codec;
pub mod context;
pub mod dispatcher;
pub mod filter;
pub mod handler;
pub mod pipe;
pub mod prelude;
pub mod request;
pub mod response;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub use crate::codec::{CodecService, JsonCodecService};
pub use crate::context::{Context, Data, ERROR_KEY};
pub use crate::dispatcher::{Dispatcher, Outcome};
pub use crate::handler::{DefaultErrorHandler, Flow, Handler, HandlerError, Res};
pub use crate::pipe::Pipe;
pub use crate::request::{Header, Method, Request};
pub use crate::response::{Response, ResponseWriter};
