use std::error::Error;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::error;
use tracing_subscriber::EnvFilter;

use jma_server::cli::{self, EXIT_ERROR, Invocation};
use jma_server::config::AppConfig;
use jma_server::dispatch::QueryDispatcher;
use jma_server::jma::JmaClient;
use jma_server::mcp;

#[tokio::main]
async fn main() -> ExitCode {
    let invocation = cli::parse(std::env::args_os());

    // Server mode is chatty by default; CLI mode keeps stderr quiet.
    let serving = matches!(invocation, Ok(Invocation::Serve { .. }));
    init_logging(if serving { "info" } else { "warn" });

    let invocation = match invocation {
        Ok(invocation) => invocation,
        Err(err) => return exit_code(cli::report_parse_error(&err, &mut io::stdout())),
    };

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => return startup_failure(serving, &e),
    };
    let dispatcher = match build_dispatcher(&config).await {
        Ok(dispatcher) => dispatcher,
        Err(e) => return startup_failure(serving, e.as_ref()),
    };

    match invocation {
        Invocation::Query(request) => {
            exit_code(cli::run_query(&dispatcher, request, &mut io::stdout()).await)
        }
        Invocation::Serve { http: None } => server_exit(mcp::serve_stdio(dispatcher).await),
        Invocation::Serve { http: Some(addr) } => {
            let addr = addr.unwrap_or(config.http_bind);
            server_exit(serve_http(&addr, dispatcher).await)
        }
    }
}

fn init_logging(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();
}

async fn build_dispatcher(config: &AppConfig) -> Result<QueryDispatcher, Box<dyn Error>> {
    let client = JmaClient::new(config.jma.clone())?;
    let directory = config.load_directory(&client).await?;
    Ok(QueryDispatcher::new(Arc::new(directory), Arc::new(client)))
}

async fn serve_http(addr: &str, dispatcher: QueryDispatcher) -> Result<(), Box<dyn Error>> {
    let listener = TcpListener::bind(addr).await?;
    mcp::serve_http(listener, dispatcher, mcp::ctrl_c()).await?;
    Ok(())
}

fn startup_failure(serving: bool, err: &dyn Error) -> ExitCode {
    error!(error = %err, "startup failed");
    if serving {
        ExitCode::FAILURE
    } else {
        exit_code(cli::report_error(&mut io::stdout(), &err.to_string()))
    }
}

fn server_exit(result: Result<(), Box<dyn Error>>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "server failed");
            ExitCode::FAILURE
        }
    }
}

fn exit_code(result: io::Result<u8>) -> ExitCode {
    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!(error = %e, "failed to write output");
            ExitCode::from(EXIT_ERROR)
        }
    }
}
