//! Derives a public key from a private key file.

use std::fs;
use std::process::exit;

use clap::Parser;
use rsa1v15::keyio;

#[derive(Parser)]
#[command(about = "Extracts the public key from a private key")]
struct Args {
    /// Path to the PEM/DER-encoded private key.
    #[arg(long = "private")]
    private: String,

    /// Path to write the derived public key to.
    #[arg(long = "public")]
    public: String,

    /// Key format of the input private key.
    #[arg(long, default_value = "PEM")]
    keyform: String,

    /// Key format of the output public key.
    #[arg(long, default_value = "PEM")]
    form: String,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let key_bytes = match fs::read(&args.private) {
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

    let pub_bytes = if args.form == "DER" {
        keyio::public_key_to_der(priv_key.public_key())
    } else {
        keyio::public_key_to_pem(priv_key.public_key()).into_bytes()
    };

    if let Err(e) = fs::write(&args.public, &pub_bytes) {
        eprintln!("failed to write public key: {e}");
        exit(1);
    }
}
