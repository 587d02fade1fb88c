// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mediagate - media request broker for Overseerr, Radarr and Sonarr.
//!
//! This is the binary entry point: the `serve` daemon plus administrator
//! subcommands operating on the same database.

mod app;
mod check;
mod messenger;
mod policy;
mod requests;
mod serve;
mod services;
mod shutdown;

use clap::{Args, Parser, Subcommand};
use mediagate_config::model::MediagateConfig;
use mediagate_core::{ApprovalMode, MediaType, MediagateError, RequestStatus, ServiceKind};

use crate::app::App;

/// Mediagate - media request broker for Overseerr, Radarr and Sonarr.
#[derive(Parser, Debug)]
#[command(name = "mediagate", version, about, long_about = None)]
struct Cli {
    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the broker and the availability monitor until interrupted.
    Serve,
    /// Run one availability reconciliation cycle now.
    Check {
        /// Print the cycle report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Submit a media request on behalf of a contact.
    Request(RequestArgs),
    /// Review stored requests.
    Requests {
        #[command(subcommand)]
        action: RequestsAction,
    },
    /// Manage Overseerr, Radarr and Sonarr bindings.
    Services {
        #[command(subcommand)]
        action: ServicesAction,
    },
    /// Show or change the approval policy.
    Policy {
        #[command(subcommand)]
        action: PolicyAction,
    },
}

#[derive(Args, Debug)]
struct RequestArgs {
    /// Contact address notifications are delivered to.
    #[arg(long)]
    contact: String,
    #[arg(long)]
    title: String,
    #[command(flatten)]
    kind: MediaKindArgs,
    #[arg(long)]
    year: Option<i32>,
    #[arg(long = "tmdb")]
    tmdb_id: Option<i64>,
    #[arg(long = "tvdb")]
    tvdb_id: Option<i64>,
    /// Season to request; repeat for several. Omit for every season.
    #[arg(long = "season")]
    seasons: Vec<u32>,
    /// Service binding id; defaults to the best enabled binding.
    #[arg(long)]
    service: Option<i64>,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct MediaKindArgs {
    #[arg(long)]
    movie: bool,
    #[arg(long)]
    series: bool,
}

impl MediaKindArgs {
    fn media_type(&self) -> MediaType {
        if self.series {
            MediaType::Series
        } else {
            MediaType::Movie
        }
    }
}

#[derive(Subcommand, Debug)]
enum RequestsAction {
    /// List requests, newest first.
    List {
        #[arg(long)]
        status: Option<RequestStatus>,
        #[arg(long)]
        json: bool,
    },
    /// Approve a pending request or retry a failed one.
    Approve {
        id: i64,
        /// Submit through this service binding instead.
        #[arg(long)]
        service: Option<i64>,
    },
    /// Reject a pending or failed request.
    Reject {
        id: i64,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum ServicesAction {
    /// Register a backend. Prompts for the API key when not given.
    Add {
        #[arg(long)]
        kind: ServiceKind,
        #[arg(long)]
        name: String,
        #[arg(long)]
        url: String,
        #[arg(long)]
        api_key: Option<String>,
        /// Lower numbers are preferred.
        #[arg(long, default_value_t = 0)]
        priority: i32,
        #[arg(long)]
        quality_profile: Option<i64>,
        #[arg(long)]
        root_folder: Option<String>,
        #[arg(long)]
        language_profile: Option<i64>,
        /// Register without enabling it.
        #[arg(long)]
        disabled: bool,
    },
    List,
    Enable {
        id: i64,
    },
    Disable {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
enum PolicyAction {
    Show,
    Set {
        /// auto_approve, manual or auto_deny.
        #[arg(long)]
        mode: Option<ApprovalMode>,
        /// Turn per-contact exceptions on or off.
        #[arg(long, value_parser = clap::builder::BoolishValueParser::new())]
        exceptions: Option<bool>,
        #[arg(long = "add-exception")]
        add_exceptions: Vec<String>,
        #[arg(long = "remove-exception")]
        remove_exceptions: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match mediagate_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            mediagate_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    serve::init_tracing(&config.service.log_level);

    if let Err(e) = run(cli, config).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: MediagateConfig) -> Result<(), MediagateError> {
    let plain = cli.plain;
    match cli.command {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Check { json } => {
            let app = App::open(&config).await?;
            let result = check::run_check(&app, json, plain).await;
            app.close().await?;
            result
        }
        Commands::Request(args) => {
            let app = App::open(&config).await?;
            let submit = requests::SubmitArgs {
                contact: args.contact,
                title: args.title,
                media_type: args.kind.media_type(),
                year: args.year,
                tmdb_id: args.tmdb_id,
                tvdb_id: args.tvdb_id,
                seasons: args.seasons,
                service: args.service,
            };
            let result = requests::run_submit(&app, &submit, args.json).await;
            app.close().await?;
            result
        }
        Commands::Requests { action } => {
            let app = App::open(&config).await?;
            let result = match action {
                RequestsAction::List { status, json } => {
                    requests::run_list(&app, status, json, plain).await
                }
                RequestsAction::Approve { id, service } => {
                    requests::run_approve(&app, id, service, plain).await
                }
                RequestsAction::Reject { id, notes } => {
                    requests::run_reject(&app, id, notes, plain).await
                }
            };
            app.close().await?;
            result
        }
        Commands::Services { action } => match action {
            ServicesAction::Add {
                kind,
                name,
                url,
                api_key,
                priority,
                quality_profile,
                root_folder,
                language_profile,
                disabled,
            } => {
                let app = App::open(&config).await?;
                let args = services::AddArgs {
                    kind,
                    name,
                    url,
                    api_key,
                    priority,
                    quality_profile,
                    root_folder,
                    language_profile,
                    disabled,
                };
                let result = services::run_add(&app, args).await;
                app.close().await?;
                result
            }
            ServicesAction::List => {
                let storage = app::open_storage(&config).await?;
                services::run_list(&storage, plain).await
            }
            ServicesAction::Enable { id } => {
                let storage = app::open_storage(&config).await?;
                services::run_set_enabled(&storage, id, true).await
            }
            ServicesAction::Disable { id } => {
                let storage = app::open_storage(&config).await?;
                services::run_set_enabled(&storage, id, false).await
            }
        },
        Commands::Policy { action } => {
            let storage = app::open_storage(&config).await?;
            match action {
                PolicyAction::Show => policy::run_show(&storage).await,
                PolicyAction::Set {
                    mode,
                    exceptions,
                    add_exceptions,
                    remove_exceptions,
                } => {
                    let edit = policy::PolicyEdit {
                        mode,
                        exceptions_enabled: exceptions,
                        add_exceptions,
                        remove_exceptions,
                    };
                    policy::run_set(&storage, &edit).await
                }
            }
        }
    }
}
