//! Command implementations

use crate::app::App;
use crate::config;
use anyhow::{Context, Result, bail};
use banquet_core::{Role, Settings};
use banquet_http::client::{ClientError, ResourceKind, Upload};
use banquet_http::types::{Credentials, ListQuery, Page, RegisterRequest};
use banquet_session::{GuardDecision, SessionError};
use clap::Subcommand;
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "BANQUET_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in as it
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "BANQUET_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        role: Option<Role>,
    },
    /// Sign out and forget the stored token
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Generate or print configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Show what the route guard decides for a path
    Guard {
        path: String,
        /// Roles allowed on the route; any signed-in user when omitted
        #[arg(long = "role")]
        roles: Vec<Role>,
    },
    /// Contact form submissions
    Contacts {
        #[command(subcommand)]
        action: ResourceAction,
    },
    /// Catering quote requests
    Quotes {
        #[command(subcommand)]
        action: ResourceAction,
    },
    Testimonials {
        #[command(subcommand)]
        action: ResourceAction,
    },
    Blog {
        #[command(subcommand)]
        action: ResourceAction,
    },
    Gallery {
        #[command(subcommand)]
        action: ResourceAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init {
        #[arg(default_value = "banquet.toml")]
        output: PathBuf,
    },
    /// Print the effective configuration
    Show,
}

#[derive(Subcommand, Debug)]
pub enum ResourceAction {
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    Get {
        id: String,
    },
    /// Create a record from a JSON document (inline or @file)
    Create {
        data: String,
    },
    Update {
        id: String,
        data: String,
    },
    /// Move a record to a new workflow status
    Status {
        id: String,
        status: String,
    },
    Delete {
        id: String,
    },
    /// Upload an image with optional form fields
    Upload {
        file: PathBuf,
        #[arg(long = "field", value_parser = parse_key_val)]
        fields: Vec<(String, String)>,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got {s:?}"))
}

/// Parse an inline JSON document, or read one from `@path`
fn parse_document(data: &str) -> Result<Value> {
    let raw = match data.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?,
        None => data.to_string(),
    };
    serde_json::from_str(&raw).context("Document is not valid JSON")
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn session_failure(error: SessionError) -> anyhow::Error {
    anyhow::anyhow!(error.user_message())
}

fn request_failure(error: ClientError) -> anyhow::Error {
    let mut message = error.user_message();
    for field in error.field_errors() {
        message.push_str(&format!("\n  {}: {}", field.field, field.message));
    }
    anyhow::anyhow!(message)
}

/// Configuration commands; these need no session
pub fn run_config(action: ConfigAction, settings: &Settings) -> Result<()> {
    match action {
        ConfigAction::Init { output } => {
            config::generate_default_config(&output)?;
            println!("Wrote {}", output.display());
        }
        ConfigAction::Show => print!("{}", config::render_settings(settings)?),
    }
    Ok(())
}

pub async fn run(app: &App, command: Command) -> Result<()> {
    match command {
        Command::Config { action } => run_config(action, &app.settings)?,
        Command::Login { email, password } => {
            let user = app
                .session
                .login(&Credentials::new(email, password))
                .await
                .map_err(session_failure)?;
            println!("Signed in as {} ({})", user.full_name(), user.role);
        }
        Command::Register {
            first_name,
            last_name,
            email,
            password,
            role,
        } => {
            let request = RegisterRequest {
                first_name,
                last_name,
                email,
                password,
                role,
            };
            let user = app
                .session
                .register(&request)
                .await
                .map_err(session_failure)?;
            println!("Registered and signed in as {} ({})", user.full_name(), user.role);
        }
        Command::Logout => {
            app.session.logout().await;
            println!("Signed out");
        }
        Command::Whoami => match app.session.user() {
            Some(user) => print_json(&user)?,
            None => println!("Not signed in"),
        },
        Command::Guard { path, roles } => {
            let decision = app.guard().allow(roles).evaluate(&app.session.state(), &path);
            match decision {
                GuardDecision::Loading => println!("loading"),
                GuardDecision::Render => println!("render {path}"),
                GuardDecision::Redirect { to, from: Some(from) } => {
                    println!("redirect {to} (return to {from})");
                }
                GuardDecision::Redirect { to, from: None } => println!("redirect {to}"),
            }
        }
        Command::Contacts { action } => run_resource(app, ResourceKind::Contacts, action).await?,
        Command::Quotes { action } => run_resource(app, ResourceKind::Quotes, action).await?,
        Command::Testimonials { action } => {
            run_resource(app, ResourceKind::Testimonials, action).await?;
        }
        Command::Blog { action } => run_resource(app, ResourceKind::Blog, action).await?,
        Command::Gallery { action } => run_resource(app, ResourceKind::Gallery, action).await?,
    }
    Ok(())
}

async fn run_resource(app: &App, kind: ResourceKind, action: ResourceAction) -> Result<()> {
    if let GuardDecision::Redirect { .. } = app.guard().evaluate(&app.session.state(), kind.path()) {
        bail!("Not signed in. Run `banquet login` first.");
    }

    let client = app.resource(kind)?;
    match action {
        ResourceAction::List {
            page,
            limit,
            search,
            status,
        } => {
            let query = ListQuery {
                page,
                limit,
                search,
                status,
            };
            let page: Page<Value> = client.list(&query).await.map_err(request_failure)?;
            print_json(&page)?;
        }
        ResourceAction::Get { id } => {
            let record: Value = client.get(&id).await.map_err(request_failure)?;
            print_json(&record)?;
        }
        ResourceAction::Create { data } => {
            let body = parse_document(&data)?;
            let record: Value = client.create(&body).await.map_err(request_failure)?;
            print_json(&record)?;
        }
        ResourceAction::Update { id, data } => {
            let body = parse_document(&data)?;
            let record: Value = client.update(&id, &body).await.map_err(request_failure)?;
            print_json(&record)?;
        }
        ResourceAction::Status { id, status } => {
            let record: Value = client
                .set_status(&id, status)
                .await
                .map_err(request_failure)?;
            print_json(&record)?;
        }
        ResourceAction::Delete { id } => {
            let message = client.delete(&id).await.map_err(request_failure)?;
            println!("{}", message.unwrap_or_else(|| format!("Deleted {kind} {id}")));
        }
        ResourceAction::Upload { file, fields } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let file_name = file
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("upload")
                .to_string();
            let upload = Upload {
                file_name,
                mime: mime_for(&file).to_string(),
                bytes,
                fields,
            };
            let record: Value = client.upload(upload).await.map_err(request_failure)?;
            print_json(&record)?;
        }
    }
    Ok(())
}
