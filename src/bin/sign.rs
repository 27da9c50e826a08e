//! Signs a file with a private key, outputs the signature.

use std::fs;
use std::io::Write;
use std::process::exit;

use clap::Parser;
use log::info;
use rand::rngs::OsRng;
use rsa1v15::digest_algo::HashAlgorithm;
use rsa1v15::keyio;
use rsa1v15::pkcs1;

#[derive(Parser)]
#[command(about = "Signs a file, outputs the signature")]
struct Args {
    /// Path to the PEM/DER-encoded private key.
    private_key: String,

    /// Hash method, e.g. "SHA-256".
    hash_method: String,

    /// Name of the file to sign. Reads from stdin if not specified.
    #[arg(short, long)]
    input: Option<String>,

    /// Name of the file to write the signature to. Written to stdout if
    /// this option is not present.
    #[arg(short, long)]
    output: Option<String>,

    /// Key format of the private key.
    #[arg(long, default_value = "PEM")]
    keyform: String,
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

    let key_bytes = match fs::read(&args.private_key) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("failed to read private key file: {e}");
            exit(1);
        }
    };

    let parsed = if args.keyform == "DER" {
        keyio::private_key_from_der(&key_bytes)
    } else {
        keyio::private_key_from_pem(&String::from_utf8_lossy(&key_bytes))
    };
    let priv_key = match parsed {
        Ok(k) => k,
        Err(e) => {
            eprintln!("failed to parse private key: {e}");
            exit(1);
        }
    };

    let hash_method = match HashAlgorithm::from_name(&args.hash_method) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("unknown hash method: {e}");
            exit(1);
        }
    };

    info!("Signing");
    let signature = match &args.input {
        Some(path) => match fs::File::open(path) {
            Ok(f) => pkcs1::sign_reader(&mut OsRng, f, &priv_key, hash_method),
            Err(e) => {
                eprintln!("failed to open input file: {e}");
                exit(1);
            }
        },
        None => pkcs1::sign_reader(&mut OsRng, std::io::stdin(), &priv_key, hash_method),
    };
    let signature = match signature {
        Ok(s) => s,
        Err(e) => {
            eprintln!("signing failed: {e}");
            exit(1);
        }
    };

    if let Err(e) = write_output(&args.output, &signature) {
        eprintln!("failed to write output: {e}");
        exit(1);
    }
}
