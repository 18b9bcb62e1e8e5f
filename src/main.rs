use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use tracing::{debug, warn};

use catalog_admin::api::{ListParams, Resource};
use catalog_admin::auth::AuthBackend;
use catalog_admin::config::{load_config, schema_json};
use catalog_admin::models::{Credentials, Registration};
use catalog_admin::router::{RouteName, ROUTES};
use catalog_admin::startup::build_app;
use catalog_admin::state::AppState;
use catalog_admin::utils::logger::init_logging;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Command-line admin client for the product catalog backend.
#[derive(Parser, Debug)]
#[command(name = "catalog-admin", version, about)]
struct Cli {
    /// YAML configuration file (defaults to ./catalog-admin.yaml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the JSON schema of the configuration file.
    Schema,
    /// Print the route table.
    Routes,
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: String,
    },
    /// End the session locally; the backend is told on a best-effort basis.
    Logout,
    /// Show the profile of the signed-in user.
    Whoami,
    /// Exchange the refresh token for a new access token.
    Refresh,
    /// Navigate to a path and report where the guard lets you land.
    Open { path: String },
    List {
        resource: Resource,
        #[command(flatten)]
        params: ListArgs,
    },
    Get {
        resource: Resource,
        id: i64,
    },
    Create {
        resource: Resource,
        /// JSON object with the new record.
        #[arg(long)]
        data: String,
    },
    Update {
        resource: Resource,
        id: i64,
        #[arg(long)]
        data: String,
    },
    Delete {
        resource: Resource,
        id: i64,
    },
}

#[derive(Args, Debug)]
struct ListArgs {
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    size: Option<u32>,
    /// Free-text search.
    #[arg(long)]
    q: Option<String>,
    #[arg(long)]
    categoria_id: Option<i64>,
    #[arg(long)]
    presentacion_id: Option<i64>,
}

impl From<ListArgs> for ListParams {
    fn from(args: ListArgs) -> Self {
        ListParams {
            page: args.page,
            size: args.size,
            q: args.q,
            categoria_id: args.categoria_id,
            presentacion_id: args.presentacion_id,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_json(value: &Value) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Runs one command; `Ok(false)` means the command ran but did not succeed.
async fn run(cli: Cli) -> CliResult<bool> {
    if let Command::Schema = cli.command {
        println!("{}", schema_json()?);
        return Ok(true);
    }
    if let Command::Routes = cli.command {
        print_json(&serde_json::to_value(&ROUTES)?)?;
        return Ok(true);
    }

    let config = load_config(cli.config.as_deref())?;
    init_logging(&config.logging)?;
    let app = build_app(Arc::new(config))?;

    match cli.command {
        Command::Schema | Command::Routes => Ok(true),
        Command::Login { email, password } => {
            if !enter(&app, RouteName::Login)? {
                println!("Already signed in.");
                return Ok(true);
            }
            let outcome = app.auth.login(&Credentials::new(email, password)).await;
            print_json(&json!({ "success": outcome.success, "message": outcome.message }))?;
            Ok(outcome.success)
        }
        Command::Register {
            email,
            password,
            name,
        } => {
            if !enter(&app, RouteName::Login)? {
                println!("Already signed in.");
                return Ok(true);
            }
            let registration = Registration {
                email,
                password,
                name,
            };
            let outcome = app.auth.register(&registration).await;
            print_json(&json!({ "success": outcome.success, "message": outcome.message }))?;
            Ok(outcome.success)
        }
        Command::Logout => {
            if app.auth.is_authenticated() {
                if let Err(e) = app.auth_api.logout().await {
                    warn!("Backend logout failed: {}", e);
                }
            }
            app.auth.logout();
            println!("Signed out.");
            Ok(true)
        }
        Command::Whoami => {
            // the guard's own initialization is a no-op once this has run
            let background = app.auth.initialize_auth();
            app.router.navigate("/")?;
            if !app.auth.is_authenticated() {
                println!("Not signed in.");
                return Ok(false);
            }
            let user = app.auth.resolve_user(background).await;
            print_json(&serde_json::to_value(&user)?)?;
            Ok(user.is_some())
        }
        Command::Refresh => {
            // no background profile load: with an expired access token it
            // would 401 and race the refresh for the credential file
            app.auth.restore_session();
            let refreshed = app.auth.refresh_access_token().await;
            print_json(&json!({ "refreshed": refreshed }))?;
            Ok(refreshed)
        }
        Command::Open { path } => {
            let nav = app.router.navigate(&path)?;
            print_json(&json!({
                "requested": nav.requested,
                "redirected": nav.redirected,
                "route": nav.route,
                "title": app.router.title(),
            }))?;
            Ok(true)
        }
        Command::List { resource, params } => {
            require(&app, resource)?;
            let body = app.resource(resource).get_all(&params.into()).await?;
            print_json(&body)?;
            Ok(true)
        }
        Command::Get { resource, id } => {
            require(&app, resource)?;
            print_json(&app.resource(resource).get_by_id(id).await?)?;
            Ok(true)
        }
        Command::Create { resource, data } => {
            let data: Value = serde_json::from_str(&data)?;
            require(&app, resource)?;
            print_json(&app.resource(resource).create(&data).await?)?;
            Ok(true)
        }
        Command::Update { resource, id, data } => {
            let data: Value = serde_json::from_str(&data)?;
            require(&app, resource)?;
            print_json(&app.resource(resource).update(id, &data).await?)?;
            Ok(true)
        }
        Command::Delete { resource, id } => {
            require(&app, resource)?;
            print_json(&app.resource(resource).delete(id).await?)?;
            Ok(true)
        }
    }
}

/// Navigates to `name`; false when the guard sent us somewhere else.
fn enter(app: &AppState, name: RouteName) -> CliResult<bool> {
    let nav = app.router.push(name)?;
    debug!("Landed on {} ({})", nav.route.path, nav.route.view);
    Ok(nav.route.name == name)
}

/// Opens the admin screen for `resource`, failing when the guard refuses.
fn require(app: &AppState, resource: Resource) -> CliResult<()> {
    if enter(app, resource.route_name())? {
        Ok(())
    } else {
        Err(format!(
            "'{}' requires a signed-in user; run `catalog-admin login` first",
            resource
        )
        .into())
    }
}
