//! Example: Verify an attestation over a blob
//!
//! This example demonstrates how to verify a DSSE attestation against a blob
//! using either a public key or a certificate chain.
//!
//! # Usage
//!
//! Verify with a public key:
//! ```sh
//! cargo run -p attest-verify --example verify_blob_attestation -- \
//!     --key cosign.pub --type slsaprovenance \
//!     blob.txt blob.att.json
//! ```
//!
//! Verify with a certificate chain and identity requirements:
//! ```sh
//! cargo run -p attest-verify --example verify_blob_attestation -- \
//!     --certificate leaf.pem --certificate-chain chain.pem \
//!     --certificate-identity signer@example.com \
//!     --certificate-oidc-issuer https://issuer.example.com \
//!     blob.txt blob.att.json
//! ```
//!
//! Verify using a digest instead of a file:
//! ```sh
//! cargo run -p attest-verify --example verify_blob_attestation -- \
//!     --key cosign.pub sha256:abc123... blob.att.json
//! ```
//!
//! No transparency log or timestamp service is wired in here, so those
//! checks are skipped.

use attest_verify::{
    verify_blob_attestation, Artifact, ChainRootPolicy, Sha256Hash, TrustAnchor,
    VerificationOptions,
};

use std::env;
use std::fs;
use std::path::Path;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut key: Option<String> = None;
    let mut certificate: Option<String> = None;
    let mut certificate_chain: Option<String> = None;
    let mut options = VerificationOptions::default().skip_tlog().skip_sct();
    let mut positional: Vec<String> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--key" => key = Some(value(&args, &mut i, flag)),
            "--certificate" => certificate = Some(value(&args, &mut i, flag)),
            "--certificate-chain" => certificate_chain = Some(value(&args, &mut i, flag)),
            "--certificate-identity" => {
                options = options.require_identity(value(&args, &mut i, flag));
            }
            "--certificate-identity-regexp" => {
                options = options.require_identity_regex(value(&args, &mut i, flag));
            }
            "--certificate-oidc-issuer" => {
                options = options.require_issuer(value(&args, &mut i, flag));
            }
            "--certificate-oidc-issuer-regexp" => {
                options = options.require_issuer_regex(value(&args, &mut i, flag));
            }
            "--type" => options = options.require_predicate_type(value(&args, &mut i, flag)),
            "--check-claims=false" => options = options.skip_claims(),
            "--strict-root" => options = options.with_root_policy(ChainRootPolicy::RequireSelfSigned),
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            arg if !arg.starts_with('-') => positional.push(arg.to_string()),
            unknown => {
                eprintln!("Error: Unknown option: {}", unknown);
                print_usage(&args[0]);
                process::exit(1);
            }
        }
        i += 1;
    }

    if positional.len() != 2 {
        eprintln!("Error: Expected exactly 2 positional arguments (blob/digest and attestation)");
        print_usage(&args[0]);
        process::exit(1);
    }

    let blob_or_digest = &positional[0];
    let attestation_path = &positional[1];

    let envelope = match fs::read(attestation_path) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error reading attestation '{}': {}", attestation_path, e);
            process::exit(1);
        }
    };

    let anchor = match (&key, &certificate, &certificate_chain) {
        (Some(key_path), None, None) => {
            TrustAnchor::from_public_key_pem(&read_text(key_path, "key"))
        }
        (None, Some(cert_path), Some(chain_path)) => TrustAnchor::from_certificate_pem(
            &read_text(cert_path, "certificate"),
            &read_text(chain_path, "certificate chain"),
        ),
        _ => {
            eprintln!("Error: Pass either --key, or --certificate with --certificate-chain");
            print_usage(&args[0]);
            process::exit(1);
        }
    };
    let anchor = match anchor {
        Ok(anchor) => anchor,
        Err(e) => {
            eprintln!("Error loading trust anchor: {}", e);
            process::exit(1);
        }
    };

    let digest = match blob_or_digest.strip_prefix("sha256:") {
        Some(hex_digest) => match Sha256Hash::from_hex(hex_digest) {
            Ok(d) => Some(d),
            Err(e) => {
                eprintln!("Error parsing digest: {}", e);
                process::exit(1);
            }
        },
        None => None,
    };
    let artifact = match digest {
        Some(d) => Artifact::Digest(d),
        None => Artifact::Path(Path::new(blob_or_digest)),
    };

    println!("Verifying attestation...");
    println!("  Blob: {}", blob_or_digest);
    println!("  Attestation: {}", attestation_path);
    if let Some(predicate_type) = &options.predicate_type {
        println!("  Required Predicate Type: {}", predicate_type);
    }
    if let Some(identity) = &options.identity {
        println!("  Required Identity: {}", identity);
    }
    if let Some(issuer) = &options.issuer {
        println!("  Required Issuer: {}", issuer);
    }

    match verify_blob_attestation(&envelope, &anchor, artifact, &options) {
        Ok(verified) => {
            println!("\nVerification: SUCCESS");
            println!("  Predicate Type: {}", verified.statement.predicate_type);
            if let Some(identity) = &verified.identity {
                println!("  Identity: {}", identity);
            }
            if let Some(issuer) = &verified.issuer {
                println!("  Issuer: {}", issuer);
            }
            println!("  Signature: #{}", verified.signature_index);
        }
        Err(e) => {
            eprintln!("\nVerification: FAILED ({})", e.reason());
            eprintln!("  {}", e);
            process::exit(1);
        }
    }
}

fn value(args: &[String], i: &mut usize, flag: &str) -> String {
    *i += 1;
    if *i >= args.len() {
        eprintln!("Error: {} requires a value", flag);
        process::exit(1);
    }
    args[*i].clone()
}

fn read_text(path: &str, what: &str) -> String {
    match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading {} '{}': {}", what, path, e);
            process::exit(1);
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [OPTIONS] <BLOB|DIGEST> <ATTESTATION>", program);
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <BLOB|DIGEST>   Blob file, or its digest as sha256:<hex>");
    eprintln!("  <ATTESTATION>   DSSE envelope (JSON)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --key <FILE>                            PEM public key");
    eprintln!("  --certificate <FILE>                    PEM leaf certificate");
    eprintln!("  --certificate-chain <FILE>              PEM chain, root last");
    eprintln!("  --certificate-identity <ID>             Expected signer identity");
    eprintln!("  --certificate-identity-regexp <REGEX>   Signer identity pattern");
    eprintln!("  --certificate-oidc-issuer <URL>         Expected OIDC issuer");
    eprintln!("  --certificate-oidc-issuer-regexp <RE>   OIDC issuer pattern");
    eprintln!("  --type <TYPE>                           Expected predicate type or short name");
    eprintln!("  --check-claims=false                    Skip blob and predicate checks");
    eprintln!("  --strict-root                           Require a self-signed last chain entry");
    eprintln!("  -h, --help                              Print help");
}
