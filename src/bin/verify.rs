//! Verifies a signature.
//!
//! Exits with status 0 and "Verification OK" on stderr upon success, or
//! prints "Verification failed" to stderr and exits with status 1 on
//! failure.

use std::fs;
use std::io::Read;
use std::process::exit;

use clap::Parser;
use log::info;
use rsa1v15::keyio;
use rsa1v15::pkcs1;

#[derive(Parser)]
#[command(about = "Verifies a signature")]
struct Args {
    /// Path to the PEM/DER-encoded public key.
    public_key: String,

    /// Path to the signature file.
    signature_file: String,

    /// Name of the file whose signature is being checked. Reads from stdin
    /// if not specified.
    #[arg(short, long)]
    input: Option<String>,

    /// Key format of the public key.
    #[arg(long, default_value = "PEM")]
    keyform: String,
}

fn read_input(path: &Option<String>) -> std::io::Result<Vec<u8>> {
    match path {
        Some(p) => fs::read(p),
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let key_bytes = match fs::read(&args.public_key) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("failed to read public key file: {e}");
            exit(1);
        }
    };

    let parsed = if args.keyform == "DER" {
        keyio::public_key_from_der(&key_bytes)
    } else {
        keyio::public_key_from_pem(&String::from_utf8_lossy(&key_bytes))
    };
    let pub_key = match parsed {
        Ok(k) => k,
        Err(e) => {
            eprintln!("failed to parse public key: {e}");
            exit(1);
        }
    };

    let signature = match fs::read(&args.signature_file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("failed to read signature file: {e}");
            exit(1);
        }
    };
    let indata = match read_input(&args.input) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("failed to read input: {e}");
            exit(1);
        }
    };

    info!("Verifying");
    match pkcs1::verify(&indata, &signature, &pub_key) {
        Ok(_) => eprintln!("Verification OK"),
        Err(_) => {
            eprintln!("Verification failed");
            exit(1);
        }
    }
}
