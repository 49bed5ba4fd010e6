//! gateway-infer — send one chat request through the encrypted gateway
//! protocol and print the decrypted reply.
//!
//! Usage:
//!   infer --class <size-class> --message <text> [--ticket-file <path>]
//!
//! Configuration is read from the environment; see `gateway_client::Config`.

use std::process::ExitCode;
use std::sync::Arc;

use gateway_client::{chat, Config, DummyTicketSource, FileTicketPool, GatewayClient, HttpTransport};
use gateway_envelope::{SizeClass, TicketSource};

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return ExitCode::SUCCESS;
    }

    match run(&args[1..]).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    eprintln!(
        r#"gateway-infer — send one encrypted chat request

USAGE:
    infer --class <size-class> --message <text>

OPTIONS:
    -c, --class <class>     Size class: c256, c512, c1024, c2048, c4096 (default: c512)
    -m, --message <text>    User message text (default: "hello")
    -h, --help              Print help
"#
    );
}

async fn run(args: &[String]) -> Result<(), String> {
    let config = Config::from_env()?;
    gateway_client::init_logging(config.log_format);

    let mut class = SizeClass::C512;
    let mut message = "hello".to_string();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--class" | "-c" => {
                i += 1;
                let text = args.get(i).ok_or("missing --class value")?;
                class = SizeClass::parse(text).map_err(|e| e.to_string())?;
            }
            "--message" | "-m" => {
                i += 1;
                message = args.get(i).ok_or("missing --message value")?.clone();
            }
            other => return Err(format!("unknown option: {other}")),
        }
        i += 1;
    }

    let ticket_source: Arc<dyn TicketSource> = match &config.ticket_file {
        Some(path) => Arc::new(FileTicketPool::load(path).await.map_err(|e| e.to_string())?),
        None => Arc::new(DummyTicketSource),
    };

    let transport = HttpTransport::new(&config.gateway_url, &config.infer_path, config.timeout, None)
        .map_err(|e| e.to_string())?;

    let client = GatewayClient::new(config.gateway_public_key, ticket_source, transport, config.timeout, config.model.clone());

    let messages = vec![chat::message("user", &message)];
    let response = chat::chat(&client, &config.model, messages, class).await.map_err(|e| e.to_string())?;

    println!("{}", serde_json::to_string_pretty(&response).map_err(|e| e.to_string())?);
    Ok(())
}
