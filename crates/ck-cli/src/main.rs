//! ck - hashing, HMAC, key derivation and OpenSSL-compatible envelope encryption.

use anyhow::{Context, Result};
use ck_cli::commands::{self, EnvelopeOptions, Secret};
use ck_cli::exit_codes::ExitHandler;
use ck_cli::project_config::ProjectConfig;
use ck_crypto::cipher::CipherConfig;
use ck_crypto::encoding::Encoding;
use ck_crypto::hash::HashAlgorithm;
use ck_crypto::kdf::Pbkdf2Config;
use ck_crypto::word_array::WordArray;
use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;

/// cipherkit CLI
#[derive(Parser)]
#[command(name = "ck")]
#[command(about = "Hashing, HMAC, key derivation and OpenSSL-compatible encryption", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose output (repeat for more)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Use this config file instead of discovering .ck.yaml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Where command input comes from
#[derive(Args)]
struct InputArgs {
    /// Inline input text (defaults to stdin)
    text: Option<String>,
    /// Read input from a file
    #[arg(long, short = 'i', conflicts_with = "text")]
    input: Option<PathBuf>,
}

/// Cipher selection shared by encrypt and decrypt
#[derive(Args)]
struct CipherArgs {
    /// Cipher (aes, des, triple-des, rc4, rc4-drop)
    #[arg(long, short = 'c')]
    cipher: Option<String>,
    /// Chaining mode (cbc, cfb, ofb, ctr, ctr-gladman, ecb)
    #[arg(long, short = 'm')]
    mode: Option<String>,
    /// Padding (pkcs7, ansi-x923, iso10126, iso97971, zero, none)
    #[arg(long)]
    padding: Option<String>,
    /// Envelope format (openssl, json)
    #[arg(long, short = 'f')]
    format: Option<String>,
    /// Password KDF (openssl, pbkdf2)
    #[arg(long)]
    kdf: Option<String>,
    /// Digest for the KDF
    #[arg(long)]
    md: Option<String>,
    /// PBKDF2 iteration count
    #[arg(long)]
    iter: Option<u32>,
    /// Password for key derivation
    #[arg(long, short = 'p', conflicts_with = "key", required_unless_present = "key")]
    password: Option<String>,
    /// Raw key as hex
    #[arg(long, short = 'k')]
    key: Option<String>,
    /// Raw IV as hex (with --key)
    #[arg(long, requires = "key")]
    iv: Option<String>,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Compute a message digest
    Hash {
        /// Digest (md5, sha1, sha224, sha256, sha384, sha512)
        #[arg(long, short = 'a')]
        algorithm: Option<String>,
        /// Output encoding (hex, base64, base64url)
        #[arg(long, short = 'e', default_value = "hex")]
        encoding: String,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Compute an HMAC tag
    Hmac {
        /// Digest (md5, sha1, sha224, sha256, sha384, sha512)
        #[arg(long, short = 'a')]
        algorithm: Option<String>,
        /// Secret key (UTF-8)
        #[arg(long, short = 'k')]
        key: String,
        /// Output encoding (hex, base64, base64url)
        #[arg(long, short = 'e', default_value = "hex")]
        encoding: String,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Derive a key with PBKDF2
    Pbkdf2 {
        /// Password
        #[arg(long, short = 'p')]
        password: String,
        /// Salt as hex
        #[arg(long, short = 's')]
        salt: String,
        /// HMAC digest
        #[arg(long, short = 'a')]
        algorithm: Option<String>,
        /// Iteration count
        #[arg(long)]
        iter: Option<u32>,
        /// Output length in 32-bit words
        #[arg(long, default_value_t = 8)]
        key_size: usize,
    },
    /// Encrypt into an OpenSSL or JSON envelope
    Encrypt {
        #[command(flatten)]
        cipher: CipherArgs,
        /// Fixed 8-byte salt as hex (password mode)
        #[arg(long, short = 's')]
        salt: Option<String>,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Decrypt an OpenSSL or JSON envelope
    Decrypt {
        #[command(flatten)]
        cipher: CipherArgs,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Write a sample .ck.yaml to the current directory
    Init {
        /// Replace an existing .ck.yaml
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "error",
        1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_ansi(!cli.no_color)
        .with_writer(io::stderr)
        .init();

    let handler = ExitHandler::new(cli.verbose > 0);
    handler.handle_result(run(&cli));
}

fn run(cli: &Cli) -> Result<()> {
    if let Commands::Init { force } = &cli.command {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        let path = commands::init_command(&cwd, *force)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let project = match &cli.config {
        Some(path) => ProjectConfig::load_from_file(path)?,
        None => ProjectConfig::discover()?,
    };
    if project.is_empty() {
        tracing::debug!("No project config found, using built-in defaults");
    }

    match &cli.command {
        Commands::Hash {
            algorithm,
            encoding,
            input,
        } => {
            let config = project.with_overrides(&ProjectConfig {
                hasher: algorithm.clone(),
                ..ProjectConfig::default()
            });
            let data = read(input)?;
            let encoding: Encoding = encoding.parse()?;
            println!("{}", commands::hash_command(config.hasher()?, &data, encoding)?);
        }
        Commands::Hmac {
            algorithm,
            key,
            encoding,
            input,
        } => {
            let config = project.with_overrides(&ProjectConfig {
                hasher: algorithm.clone(),
                ..ProjectConfig::default()
            });
            let data = read(input)?;
            let encoding: Encoding = encoding.parse()?;
            let tag = commands::hmac_command(config.hasher()?, key.as_bytes(), &data, encoding)?;
            println!("{}", tag);
        }
        Commands::Pbkdf2 {
            password,
            salt,
            algorithm,
            iter,
            key_size,
        } => {
            let config = project.with_overrides(&ProjectConfig {
                hasher: algorithm.clone(),
                iterations: *iter,
                ..ProjectConfig::default()
            });
            let pbkdf2 = Pbkdf2Config {
                key_size_words: *key_size,
                iterations: config.iterations.unwrap_or(Pbkdf2Config::default().iterations),
                hasher: config.hasher()?,
            };
            let salt = hex(salt).context("Invalid --salt")?;
            println!("{}", commands::pbkdf2_command(password, &salt, &pbkdf2)?);
        }
        Commands::Encrypt {
            cipher,
            salt,
            input,
        } => {
            let mut options = envelope_options(&project, cipher)?;
            options.salt = salt
                .as_deref()
                .map(commands::parse_salt)
                .transpose()
                .context("Invalid --salt")?;
            let data = read(input)?;
            println!(
                "{}",
                commands::encrypt_command(&data, &secret(cipher)?, &options)?
            );
        }
        Commands::Decrypt { cipher, input } => {
            let options = envelope_options(&project, cipher)?;
            let data = read(input)?;
            let envelope = String::from_utf8(data).context("Envelope is not valid UTF-8")?;
            let plaintext = commands::decrypt_command(&envelope, &secret(cipher)?, &options)?;
            io::stdout()
                .write_all(&plaintext)
                .context("Failed to write plaintext")?;
        }
        // Handled before config discovery
        Commands::Init { .. } => {}
    }

    Ok(())
}

fn read(input: &InputArgs) -> Result<Vec<u8>> {
    commands::read_input(input.text.as_deref(), input.input.as_deref())
}

fn hex(text: &str) -> Result<WordArray> {
    Ok(Encoding::Hex.parse(text)?)
}

fn envelope_options(project: &ProjectConfig, args: &CipherArgs) -> Result<EnvelopeOptions> {
    let config = project.with_overrides(&ProjectConfig {
        cipher: args.cipher.clone(),
        mode: args.mode.clone(),
        padding: args.padding.clone(),
        format: args.format.clone(),
        kdf: args.kdf.clone(),
        hasher: args.md.clone(),
        iterations: args.iter,
    });
    config.validate()?;

    Ok(EnvelopeOptions {
        algorithm: config.cipher()?,
        cipher: CipherConfig {
            mode: config.mode()?,
            padding: config.padding()?,
            ..CipherConfig::default()
        },
        format: config.format()?,
        kdf: config.kdf()?,
        salt: None,
        hasher: args
            .md
            .as_deref()
            .map(str::parse::<HashAlgorithm>)
            .transpose()?,
    })
}

fn secret(args: &CipherArgs) -> Result<Secret> {
    match (&args.password, &args.key) {
        (Some(password), _) => Ok(Secret::Password(password.clone())),
        (None, Some(key)) => Ok(Secret::Key {
            key: hex(key).context("Invalid --key")?,
            iv: args
                .iv
                .as_deref()
                .map(hex)
                .transpose()
                .context("Invalid --iv")?,
        }),
        (None, None) => anyhow::bail!("Either --password or --key is required"),
    }
}
