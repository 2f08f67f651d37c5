//! Handler wrappers that change how a handler is gated or labelled.
use crate::context::Context;
use crate::handler::{Handler, Res};

/// Gates a handler behind a predicate on the request context.
///
/// # Example
/// ```
/// use webpipe::prelude::*;
///
/// fn delete_everything(_ctx: &mut Context) -> Res {
///     Ok(Flow::Stop)
/// }
///
/// let handler = delete_everything.when(|ctx| ctx.request().method == Method::DELETE);
/// # let _ = handler;
/// ```
pub struct Conditional<H, P> {
    predicate: P,
    handler: H,
}

impl<H, P> Conditional<H, P> {
    pub fn new(predicate: P, handler: H) -> Self {
        Self { predicate, handler }
    }
}

impl<H, P> Handler for Conditional<H, P>
where
    H: Handler,
    P: Fn(&Context<'_>) -> bool + Send + Sync,
{
    fn handle(&self, context: &mut Context<'_>) -> Res {
        self.handler.handle(context)
    }
    fn will_handle(&self, context: &Context<'_>) -> bool {
        (self.predicate)(context) && self.handler.will_handle(context)
    }
    fn name(&self) -> String {
        self.handler.name()
    }
}

/// Overrides the label a handler shows in dumps.
pub struct Named<H> {
    name: String,
    handler: H,
}

impl<H> Named<H> {
    pub fn new(name: &str, handler: H) -> Self {
        Self {
            name: name.to_string(),
            handler,
        }
    }
}

impl<H: Handler> Handler for Named<H> {
    fn handle(&self, context: &mut Context<'_>) -> Res {
        self.handler.handle(context)
    }
    fn will_handle(&self, context: &Context<'_>) -> bool {
        self.handler.will_handle(context)
    }
    fn name(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::codec::json::JsonCodecService;
    use crate::handler::{FnHandler, Flow};
    use crate::request::{Method, Request};
    use crate::response::Response;
    use std::sync::Arc;

    fn noop() -> FnHandler {
        FnHandler::new("noop", |_ctx| Ok(Flow::Continue))
    }

    #[test]
    fn test_conditional_uses_predicate() {
        let handler = noop().when(|ctx| ctx.request().method == Method::POST);
        let mut response = Response::default();
        let codec = Arc::new(JsonCodecService::new());

        let get = Context::new(Request::new(Method::GET, "/"), &mut response, codec.clone());
        assert!(!handler.will_handle(&get));
        drop(get);

        let post = Context::new(Request::new(Method::POST, "/"), &mut response, codec);
        assert!(handler.will_handle(&post));
    }

    #[test]
    fn test_conditional_respects_inner_gate() {
        let inner = noop().when(|_ctx| false);
        let handler = inner.when(|_ctx| true);
        let mut response = Response::default();
        let context = Context::new(
            Request::default(),
            &mut response,
            Arc::new(JsonCodecService::new()),
        );
        assert!(!handler.will_handle(&context));
        assert_eq!(handler.name(), "noop");
    }

    #[test]
    fn test_named() {
        assert_eq!(noop().named("audit").name(), "audit");
    }
}
