//! Ordered, nestable sequences of handlers.
use std::fmt;
use std::sync::Arc;

use log::{debug, trace};

use crate::context::Context;
use crate::handler::{Flow, Handler, Res};

/// A Pipe runs its handlers in insertion order and is itself a [`Handler`],
/// so pipes nest.
///
/// Pipes are immutable values: [`append_handler`](Pipe::append_handler) and
/// [`prepend_handler`](Pipe::prepend_handler) return a new pipe and leave the
/// original untouched, which also makes it impossible for a pipe to contain
/// itself.
///
/// # Traversal
/// * nested pipes are always entered;
/// * other handlers run only if their `will_handle` returns true;
/// * the first handler returning [`Flow::Stop`] or an error ends the
///   traversal, and that result is returned to the caller.
///
/// # Example
/// ```
/// use webpipe::prelude::*;
///
/// fn first(_ctx: &mut Context) -> Res {
///     Ok(Flow::Continue)
/// }
///
/// fn second(_ctx: &mut Context) -> Res {
///     Ok(Flow::Continue)
/// }
///
/// let inner = Pipe::new().append_handler(first.named("first"));
/// let pipe = Pipe::new()
///     .append_handler(second.named("second"))
///     .prepend_handler(inner);
///
/// assert_eq!(format!("{}", pipe), "Pipe 0:\n  first\nsecond");
/// ```
#[derive(Clone, Default)]
pub struct Pipe {
    handlers: Arc<Vec<Arc<dyn Handler>>>,
}

impl Pipe {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(vec![]),
        }
    }

    /// New pipe with `handler` added at the end.
    pub fn append_handler<H>(&self, handler: H) -> Self
    where
        H: 'static + Handler,
    {
        self.append_shared(Arc::new(handler))
    }

    /// New pipe with `handler` added at the front.
    pub fn prepend_handler<H>(&self, handler: H) -> Self
    where
        H: 'static + Handler,
    {
        self.prepend_shared(Arc::new(handler))
    }

    /// Like `append_handler`, for a handler already shared elsewhere.
    pub fn append_shared(&self, handler: Arc<dyn Handler>) -> Self {
        let mut handlers = Vec::with_capacity(self.handlers.len() + 1);
        handlers.extend(self.handlers.iter().cloned());
        handlers.push(handler);
        Self {
            handlers: Arc::new(handlers),
        }
    }

    /// Like `prepend_handler`, for a handler already shared elsewhere.
    pub fn prepend_shared(&self, handler: Arc<dyn Handler>) -> Self {
        let mut handlers = Vec::with_capacity(self.handlers.len() + 1);
        handlers.push(handler);
        handlers.extend(self.handlers.iter().cloned());
        Self {
            handlers: Arc::new(handlers),
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<dyn Handler>> {
        self.handlers.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<dyn Handler>> {
        self.handlers.iter()
    }

    fn lines(&self, level: usize, lines: &mut Vec<String>) {
        let indent = "  ".repeat(level);
        for (index, handler) in self.handlers.iter().enumerate() {
            match handler.as_pipe() {
                Some(pipe) => {
                    lines.push(format!("{}Pipe {}:", indent, index));
                    pipe.lines(level + 1, lines);
                }
                None => lines.push(format!("{}{}", indent, handler.name())),
            }
        }
    }
}

impl Handler for Pipe {
    fn handle(&self, context: &mut Context<'_>) -> Res {
        for handler in self.handlers.iter() {
            if handler.as_pipe().is_none() && !handler.will_handle(context) {
                trace!("skipping {}", handler.name());
                continue;
            }
            trace!("running {}", handler.name());
            if handler.handle(context)? == Flow::Stop {
                debug!("{} stopped the pipe", handler.name());
                return Ok(Flow::Stop);
            }
        }
        Ok(Flow::Continue)
    }

    fn name(&self) -> String {
        format!("Pipe({})", self.len())
    }

    fn as_pipe(&self) -> Option<&Pipe> {
        Some(self)
    }
}

/// Indented dump of the handlers, one per line; nested pipes show up as
/// `Pipe <index>:` followed by their handlers one level deeper.
impl fmt::Display for Pipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = vec![];
        self.lines(0, &mut lines);
        write!(f, "{}", lines.join("\n"))
    }
}

impl fmt::Debug for Pipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.handlers.iter().map(|h| h.name()))
            .finish()
    }
}
