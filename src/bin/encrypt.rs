//! Encrypts a file with a public key.

use std::fs;
use std::io::{Read, Write};
use std::process::exit;

use clap::Parser;
use log::info;
use rand::rngs::OsRng;
use rsa1v15::keyio;
use rsa1v15::pkcs1;

#[derive(Parser)]
#[command(about = "Encrypts a file. The file must be shorter than the key length.")]
struct Args {
    /// Path to the PEM/DER-encoded public key.
    public_key: String,

    /// Name of the file to encrypt. Reads from stdin if not specified.
    #[arg(short, long)]
    input: Option<String>,

    /// Name of the file to write the encrypted data to. Written to stdout
    /// if this option is not present.
    #[arg(short, long)]
    output: Option<String>,

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

fn write_output(path: &Option<String>, data: &[u8]) -> std::io::Result<()> {
    match path {
        Some(p) => fs::write(p, data),
        None => std::io::stdout().write_all(data),
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

    let indata = match read_input(&args.input) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("failed to read input: {e}");
            exit(1);
        }
    };

    info!("Encrypting");
    let outdata = match pkcs1::encrypt(&mut OsRng, &indata, &pub_key) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("encryption failed: {e}");
            exit(1);
        }
    };

    if let Err(e) = write_output(&args.output, &outdata) {
        eprintln!("failed to write output: {e}");
        exit(1);
    }
}
