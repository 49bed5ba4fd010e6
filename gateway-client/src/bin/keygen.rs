//! gateway-keygen — generate an X25519 keypair for a gateway deployment.
//!
//! Usage:
//!   keygen --output <dir>

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use base64::Engine;
use rand_core::OsRng;
use x25519_dalek::{PublicKey, StaticSecret};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let result = match args.get(1).map(String::as_str) {
        Some("--help") | Some("-h") => {
            print_usage();
            Ok(())
        }
        _ => cmd_keygen(&args[1..]),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    eprintln!(
        r#"gateway-keygen — generate an X25519 keypair

USAGE:
    keygen --output <dir>

OPTIONS:
    -o, --output <dir>   Directory to write public.key / secret.key into (default: .)
    -h, --help           Print help
"#
    );
}

fn cmd_keygen(args: &[String]) -> Result<(), String> {
    let mut output_dir = PathBuf::from(".");

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--output" | "-o" => {
                i += 1;
                output_dir = PathBuf::from(args.get(i).ok_or("missing output path")?);
            }
            other => return Err(format!("unknown option: {other}")),
        }
        i += 1;
    }

    fs::create_dir_all(&output_dir).map_err(|e| e.to_string())?;

    let secret = StaticSecret::random_from_rng(OsRng);
    let public = PublicKey::from(&secret);

    let secret_path = output_dir.join("secret.key");
    let public_path = output_dir.join("public.key");

    fs::write(&secret_path, secret.to_bytes()).map_err(|e| e.to_string())?;
    fs::write(&public_path, public.as_bytes()).map_err(|e| e.to_string())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&secret_path).map_err(|e| e.to_string())?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&secret_path, perms).map_err(|e| e.to_string())?;
    }

    eprintln!("Generated gateway keypair:");
    eprintln!("  Public key:  {}", public_path.display());
    eprintln!("  Secret key:  {} (mode 600)", secret_path.display());
    eprintln!();
    eprintln!("GATEWAY_PUBLIC_KEY_B64={}", base64::engine::general_purpose::STANDARD.encode(public.as_bytes()));

    Ok(())
}
