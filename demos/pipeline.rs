use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use log::*;
use serde_json::json;
use structopt::StructOpt;

use webpipe::prelude::*;

static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, StructOpt)]
#[structopt(name = "pipeline", about = "Runs one request through an example pipeline.")]
struct Opt {
    #[structopt(short, long, default_value = "GET")]
    method: String,
    #[structopt(short, long, default_value = "/hello")]
    path: String,
    /// Make the processing handler fail.
    #[structopt(long)]
    fail: bool,
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: usize,
}

fn assign_request_id(ctx: &mut Context) -> Res {
    let request_id = REQUEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    debug!("request id {}", request_id);
    ctx.data_mut().set("request_id", request_id)?;
    Ok(Flow::Continue)
}

fn reject_unknown_paths(ctx: &mut Context) -> Res {
    if ctx.request().path.starts_with("/hello") {
        Ok(Flow::Continue)
    } else {
        ctx.response().set_status(404);
        Ok(Flow::Stop)
    }
}

fn hello(ctx: &mut Context) -> Res {
    let name = ctx
        .request()
        .path
        .trim_start_matches("/hello")
        .trim_start_matches('/')
        .to_string();
    let name = if name.is_empty() { "world".to_string() } else { name };
    let request_id = ctx.data().get("request_id").cloned();
    ctx.write_value(200, &json!({ "hello": name, "request_id": request_id }))?;
    Ok(Flow::Continue)
}

fn add_request_id(ctx: &mut Context) -> Res {
    if let Some(request_id) = ctx.data().get("request_id").cloned() {
        ctx.response()
            .set_header("X-Request-Id", &request_id.to_string());
    }
    Ok(Flow::Continue)
}

fn setup_logging(verbosity: usize) {
    stderrlog::new()
        .module(module_path!())
        .module("webpipe")
        .verbosity(verbosity)
        .timestamp(stderrlog::Timestamp::Millisecond)
        .init()
        .unwrap();
}

fn main() {
    let opt = Opt::from_args();
    setup_logging(opt.verbose);

    let method = match Method::from_str(&opt.method) {
        Ok(method) => method,
        Err(e) => {
            error!("{}", e);
            std::process::exit(2);
        }
    };

    let fail = opt.fail;
    let mut dispatcher = Dispatcher::new(JsonCodecService::pretty());
    dispatcher
        .append_pre_handler(assign_request_id.named("assign_request_id"))
        .append_pre_handler(reject_unknown_paths.named("reject_unknown_paths"))
        .append_handler(
            FnHandler::new("fail", |_ctx| {
                Err(HandlerError::new("failing on purpose").with_status(503))
            })
            .when(move |_ctx| fail),
        )
        .append_handler(hello.named("hello").when(|ctx| ctx.request().method == Method::GET))
        .append_post_handler(add_request_id.named("add_request_id"));

    println!("Handlers:\n{}\n", dispatcher);

    let mut response = Response::default();
    let outcome = dispatcher.serve(Request::new(method, &opt.path), &mut response);
    info!("outcome: {:?}", outcome);
    println!("{}", String::from_utf8_lossy(&response.into_bytes()));
}
