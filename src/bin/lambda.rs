//! AWS Lambda entry point
//!
//! Wraps the JSON dispatcher behind API Gateway / function URL events.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use smart_tools::{ApiRequest, Dispatcher, ServiceConfig};

async fn handle(dispatcher: &Dispatcher, event: Request) -> Result<Response<Body>, Error> {
    let request = ApiRequest {
        method: event.method().as_str().to_string(),
        path: event.uri().path().to_string(),
        body: String::from_utf8_lossy(event.body()).into_owned(),
    };

    // CORS preflight
    if request.method.eq_ignore_ascii_case("OPTIONS") {
        return Ok(Response::builder()
            .status(200)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .body(Body::Empty)?);
    }

    let response = dispatcher.dispatch(&request).await;
    log::info!("{} {} -> {}", request.method, request.path, response.status);

    Ok(Response::builder()
        .status(response.status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Body::from(response.body.to_string()))?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let config = ServiceConfig::from_env()?;
    let dispatcher = Dispatcher::from_config(config)?;
    let dispatcher = &dispatcher;

    run(service_fn(move |event: Request| async move { handle(dispatcher, event).await })).await
}
