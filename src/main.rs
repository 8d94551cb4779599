use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use clap::{Parser, Subcommand, ValueEnum};
use lambda_runtime::{Error, LambdaEvent, service_fn};
use noise_responder::event::{GatewayRequest, GatewayResponse};
use noise_responder::imaging::RustCodec;
use noise_responder::responder::Responder;
use noise_responder::{config, echo, logging, output};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "noise-responder")]
#[command(about = "Serverless image responder: noise, overlays and format negotiation")]
#[command(long_about = "\
Serverless image responder: noise, overlays and format negotiation

Runs as an AWS Lambda behind an API Gateway HTTP API. Each request returns
an image encoded in the first format the Accept header names:

  GET      greyscale noise, w x h pixels, values in [min, max)
  POST     uploaded image (or rendered text) with noise overlaid
  OPTIONS  1x1 placeholder

Supported formats: image/jpeg (also */*), image/png, image/apng, image/gif,
image/bmp. Anything else is a 400.

With no subcommand the Lambda runtime loop starts ('serve'). Use 'invoke'
to run a saved gateway event locally, and 'gen-config' to print a
documented config.toml.")]
#[command(version)]
struct Cli {
    /// Config file (optional; stock defaults apply when absent)
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the Lambda runtime loop
    Serve {
        #[arg(long, value_enum, default_value_t = HandlerKind::Image)]
        handler: HandlerKind,
    },
    /// Run one gateway event from a JSON file and print the response
    Invoke {
        /// Path to an API Gateway event document
        #[arg(long)]
        event: PathBuf,
        #[arg(long, value_enum, default_value_t = HandlerKind::Image)]
        handler: HandlerKind,
        /// Write the decoded response body here
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[derive(Clone, Copy, ValueEnum)]
enum HandlerKind {
    /// Noise image responder
    Image,
    /// Return the request as the response
    Echo,
}

fn handle(
    kind: HandlerKind,
    responder: &Responder<RustCodec>,
    request: &GatewayRequest,
) -> GatewayResponse {
    match kind {
        HandlerKind::Image => responder.respond(request),
        HandlerKind::Echo => echo::echo(request),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve {
        handler: HandlerKind::Image,
    }) {
        Command::Serve { handler } => serve(&cli.config, handler).await?,
        Command::Invoke {
            event,
            handler,
            output,
        } => invoke(&cli.config, &event, handler, output.as_deref())?,
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

async fn serve(config_path: &Path, kind: HandlerKind) -> Result<(), Error> {
    logging::init_logging();
    let config = config::load_config(config_path)?;
    info!(config = %config_path.display(), "starting lambda runtime");

    let responder = Arc::new(Responder::new(config, RustCodec::new()));
    lambda_runtime::run(service_fn(move |event: LambdaEvent<GatewayRequest>| {
        let responder = Arc::clone(&responder);
        async move {
            let span = tracing::info_span!("invocation", request_id = %event.context.request_id);
            Ok::<_, Error>(span.in_scope(|| handle(kind, &responder, &event.payload)))
        }
    }))
    .await
}

fn invoke(
    config_path: &Path,
    event_path: &Path,
    kind: HandlerKind,
    output_path: Option<&Path>,
) -> Result<(), Error> {
    logging::init_logging();
    let config = config::load_config(config_path)?;
    let content = std::fs::read_to_string(event_path)?;
    let request: GatewayRequest = serde_json::from_str(&content)?;

    let responder = Responder::new(config, RustCodec::new());
    let response = handle(kind, &responder, &request);
    output::print_invoke_summary(&response);

    if let Some(path) = output_path {
        let bytes = if response.is_base64_encoded {
            STANDARD.decode(&response.body)?
        } else {
            response.body.into_bytes()
        };
        std::fs::write(path, &bytes)?;
        println!("Wrote {} bytes to {}", bytes.len(), path.display());
    }
    Ok(())
}
