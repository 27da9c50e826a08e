//! Generates a new RSA key pair.

use std::fs;
use std::io::Write;
use std::process::exit;

use clap::Parser;
use log::info;
use rand::rngs::OsRng;
use rsa1v15::key::PrivateKey;
use rsa1v15::keyio;

#[derive(Parser)]
#[command(about = "Generates a new RSA key pair")]
struct Args {
    /// Output filename for the public key. Not saved if omitted, unless
    /// --out is given, in which case it defaults to "<out>_pub.pem".
    #[arg(long)]
    pubout: Option<String>,

    /// Output filename for the private key. Written to stdout if omitted.
    #[arg(long)]
    out: Option<String>,

    /// Key encoding for both keys: PEM or DER.
    #[arg(long, default_value = "PEM")]
    form: String,

    /// Number of bits in the modulus.
    #[arg(long, default_value_t = 2048)]
    nbits: u64,
}

fn encode(args: &Args, priv_key: &PrivateKey) -> (Vec<u8>, Vec<u8>) {
    if args.form == "DER" {
        (keyio::private_key_to_der(priv_key), keyio::public_key_to_der(priv_key.public_key()))
    } else {
        (
            keyio::private_key_to_pem(priv_key).into_bytes(),
            keyio::public_key_to_pem(priv_key.public_key()).into_bytes(),
        )
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    info!("Generating {}-bit key", args.nbits);
    let priv_key = match PrivateKey::generate(args.nbits, &mut OsRng) {
        Ok(k) => k,
        Err(e) => {
            eprintln!("key generation failed: {e}");
            exit(1);
        }
    };

    let (priv_bytes, pub_bytes) = encode(&args, &priv_key);

    match &args.out {
        Some(path) => {
            if let Err(e) = fs::write(path, &priv_bytes) {
                eprintln!("failed to write private key: {e}");
                exit(1);
            }
            eprintln!("Private key saved to {}", path);
        }
        None => {
            if let Err(e) = std::io::stdout().write_all(&priv_bytes) {
                eprintln!("failed to write to stdout: {e}");
                exit(1);
            }
        }
    }

    match (&args.pubout, &args.out) {
        (Some(path), _) => {
            if let Err(e) = fs::write(path, &pub_bytes) {
                eprintln!("failed to write public key: {e}");
                exit(1);
            }
            eprintln!("Public key saved to {}", path);
        }
        (None, Some(out_path)) => {
            let stem = out_path.rsplit_once('.').map(|(s, _)| s).unwrap_or(out_path);
            let public_fn = format!("{}_pub.pem", stem);
            if let Err(e) = fs::write(&public_fn, &pub_bytes) {
                eprintln!("failed to write public key: {e}");
                exit(1);
            }
            eprintln!("Public key saved to {}", public_fn);
        }
        (None, None) => {}
    }
}
