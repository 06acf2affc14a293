use sage_lsp::SageLanguageServer;
use tokio::io::{stdin, stdout};
use tower_lsp::{LspService, Server};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter};

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, reload_handle) = reload::Layer::new(filter);
    // stdout carries the protocol; logs must go to stderr.
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let (service, socket) =
        LspService::build(move |client| SageLanguageServer::new(client, Some(reload_handle)))
            .custom_method("sagemath/logLevel", SageLanguageServer::set_log_level)
            .finish();
    Server::new(stdin(), stdout(), socket).serve(service).await;
}
