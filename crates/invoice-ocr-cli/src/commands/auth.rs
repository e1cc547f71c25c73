//! Auth command - check credentials against the configured admin account.

use clap::{Args, Subcommand};
use console::style;

use invoice_ocr_core::auth::{AccessGate, AuthCookie, Credentials};
use invoice_ocr_core::models::AppConfig;

/// Arguments for the auth command.
#[derive(Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    command: AuthCommand,
}

#[derive(Subcommand)]
enum AuthCommand {
    /// Verify a username and password
    Verify(CredentialArgs),

    /// Verify credentials and print the matching `auth` cookie value
    EncodeCookie(CredentialArgs),

    /// Verify an `auth` cookie value
    CheckCookie {
        /// Cookie value (base64 of "username:password")
        value: String,
    },

    /// Verify an Authorization header value ("Basic ...")
    CheckHeader {
        /// Header value
        value: String,
    },
}

#[derive(Args)]
struct CredentialArgs {
    /// Username
    username: String,

    /// Password
    #[arg(short, long)]
    password: String,
}

impl CredentialArgs {
    fn credentials(&self) -> Credentials {
        Credentials::new(&self.username, &self.password)
    }
}

pub async fn run(args: AuthArgs, config: &AppConfig) -> anyhow::Result<()> {
    let gate = AccessGate::from_config(&config.auth);

    match args.command {
        AuthCommand::Verify(creds) => {
            let username = gate.verify(&creds.credentials())?;
            print_authenticated(&username);
        }
        AuthCommand::EncodeCookie(creds) => {
            let value = gate.login(&creds.credentials())?;
            println!("{}={}", AuthCookie::NAME, value);
        }
        AuthCommand::CheckCookie { value } => {
            let value = value
                .strip_prefix(&format!("{}=", AuthCookie::NAME))
                .unwrap_or(&value);
            let username = gate.verify_cookie(Some(value))?;
            print_authenticated(&username);
        }
        AuthCommand::CheckHeader { value } => {
            let username = gate.verify_header(Some(&value))?;
            print_authenticated(&username);
        }
    }

    Ok(())
}

fn print_authenticated(username: &str) {
    println!("{} Authenticated as {}", style("✓").green(), username);
}
