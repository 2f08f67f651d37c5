pub use crate::codec::{CodecService, JsonCodecService};
pub use crate::context::{Context, Data, ERROR_KEY};
pub use crate::dispatcher::{Dispatcher, Outcome};
pub use crate::handler::{DefaultErrorHandler, FnHandler, Flow, Handler, HandlerError, Res};
pub use crate::pipe::Pipe;
pub use crate::request::{Header, Method, Request};
pub use crate::response::{Response, ResponseWriter};
pub use std::io::Write;
