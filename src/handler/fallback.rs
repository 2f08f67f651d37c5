//! Plain text error handler used when none is configured.

use log::debug;

use crate::context::Context;
use crate::handler::{Flow, Handler, Res};
use crate::response::ResponseWriter;

/// Writes the request's error as plain text. The status code comes from the
/// error if it carries one, 500 otherwise.
///
/// If you are building an API you probably want your own error handler, see
/// [`Dispatcher::set_error_handler`](crate::dispatcher::Dispatcher::set_error_handler).
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultErrorHandler;

impl Handler for DefaultErrorHandler {
    fn handle(&self, context: &mut Context<'_>) -> Res {
        let (status_code, message) = match context.data().error() {
            Some(err) => (err.status_code().unwrap_or(500), err.to_string()),
            None => {
                debug!("error handler called without an error");
                return Ok(Flow::Continue);
            }
        };
        let response = context.response();
        response.set_status(status_code);
        response.set_header("Content-Type", "text/plain");
        response.write_all(message.as_bytes())?;
        Ok(Flow::Stop)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::codec::json::JsonCodecService;
    use crate::handler::HandlerError;
    use crate::request::Request;
    use crate::response::Response;
    use std::sync::Arc;

    #[test]
    fn test_writes_error_as_text() {
        let mut response = Response::default();
        let mut context = Context::new(
            Request::default(),
            &mut response,
            Arc::new(JsonCodecService::new()),
        );
        context
            .data_mut()
            .set_error(HandlerError::new("not here").with_status(404));

        let flow = DefaultErrorHandler.handle(&mut context).unwrap();

        assert_eq!(flow, Flow::Stop);
        assert_eq!(response.status_code(), 404);
        assert_eq!(response.header("content-type"), Some("text/plain"));
        assert_eq!(response.body(), b"not here");
    }

    #[test]
    fn test_without_error_writes_nothing() {
        let mut response = Response::default();
        let mut context = Context::new(
            Request::default(),
            &mut response,
            Arc::new(JsonCodecService::new()),
        );

        let flow = DefaultErrorHandler.handle(&mut context).unwrap();

        assert_eq!(flow, Flow::Continue);
        assert_eq!(response.status_code(), 200);
        assert!(response.body().is_empty());
    }
}
