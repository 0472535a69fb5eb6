use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use client::{
    ApiConfig, ApiError, FileRedirect, FileStore, HttpProfileService, IdentityError, ProfileScreen, ProfileService,
    ProfileView, ProviderIdentity, Reconciler, SUPPORT_MESSAGE, SaveError, SaveOutcome, ScreenState, SessionContext,
    StoreError,
};
use profiles::{ProfileField, UserProfile, ValidationErrors};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("not signed in; run `profile-cli signin` first")]
    NotSignedIn,
    #[error("this account type has no profile editor")]
    NoEditor,
    #[error(transparent)]
    Edit(#[from] client::EditError),
    #[error("{0}")]
    Save(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error("server rejected the request: {0}")]
    Rejected(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
enum AssignmentError {
    #[error("expected FIELD=VALUE, got `{0}`")]
    MissingEquals(String),
    #[error("unknown profile field `{0}`")]
    UnknownField(String),
}

#[derive(Parser, Debug)]
#[command(name = "profile-cli", about = "Profile session CLI")]
struct Cli {
    /// Overrides `PROFILE_API_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,

    #[arg(long, env = "PROFILE_SESSION_FILE", default_value = ".profile-session.json")]
    session_file: PathBuf,

    #[arg(long, env = "PROFILE_REDIRECT_FILE", default_value = ".profile-redirect.json")]
    redirect_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Complete a provider sign-in and show the resulting profile.
    Signin(SigninArgs),
    /// Show the signed-in profile.
    Profile,
    /// Change profile fields and submit them.
    Edit(EditArgs),
    /// Clear the stored session.
    Logout,
    /// Send one line to the service's front-end log.
    Log { entry: String },
}

#[derive(Args, Debug)]
struct SigninArgs {
    #[arg(long)]
    email: String,

    #[arg(long)]
    name: Option<String>,

    /// Provider user id. A random one is generated when omitted.
    #[arg(long)]
    provider_id: Option<String>,
}

#[derive(Args, Debug)]
struct EditArgs {
    /// `field=value`, using public field names (`phone`, `companyName`, ...).
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment, required = true)]
    set: Vec<(ProfileField, String)>,
}

/// One "tab": a file-backed session with its own context and service client.
struct Session {
    ctx: SessionContext,
    service: Arc<HttpProfileService>,
    redirect: FileRedirect,
}

impl Session {
    fn open(cli: &Cli) -> Result<Self, CliError> {
        let env = ApiConfig::from_env();
        let config = match &cli.base_url {
            Some(base_url) => ApiConfig { timeouts: env.timeouts, ..ApiConfig::new(base_url) },
            None => env,
        };
        let store = FileStore::new(&cli.session_file);
        tracing::debug!(base_url = %config.base_url, session = %store.path().display(), "opening session");
        Ok(Self {
            ctx: SessionContext::new(Arc::new(store)),
            service: Arc::new(HttpProfileService::new(config)?),
            redirect: FileRedirect::new(&cli.redirect_file),
        })
    }

    fn reconciler(&self) -> Reconciler {
        Reconciler::new(self.ctx.clone(), Arc::new(self.redirect.clone()), self.service.clone())
    }

    /// Mount a screen, reconcile, and print any notices.
    async fn load_screen(&self) -> ProfileScreen {
        let mut screen = ProfileScreen::mount(self.reconciler());
        screen.load().await;
        for notice in screen.take_notices() {
            if notice.is_error() {
                eprintln!("error: {notice}");
            } else {
                eprintln!("{notice}");
            }
        }
        screen
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    let session = Session::open(&cli)?;

    match cli.command {
        Command::Signin(args) => run_signin(&session, args).await,
        Command::Profile => run_profile(&session).await,
        Command::Edit(args) => run_edit(&session, args).await,
        Command::Logout => {
            session.ctx.clear_all()?;
            println!("signed out");
            Ok(())
        }
        Command::Log { entry } => run_log(&session, &entry).await,
    }
}

async fn run_signin(session: &Session, args: SigninArgs) -> Result<(), CliError> {
    let identity = ProviderIdentity {
        provider_id: args.provider_id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        email: Some(args.email),
        display_name: args.name,
    };
    session.redirect.put(&identity).await?;
    run_profile(session).await
}

async fn run_profile(session: &Session) -> Result<(), CliError> {
    let screen = session.load_screen().await;
    match screen.state() {
        ScreenState::Ready(view) => print_view(view),
        ScreenState::Loading | ScreenState::RedirectToLogin => Err(CliError::NotSignedIn),
    }
}

async fn run_edit(session: &Session, args: EditArgs) -> Result<(), CliError> {
    let screen = session.load_screen().await;
    if !matches!(screen.state(), ScreenState::Ready(_)) {
        return Err(CliError::NotSignedIn);
    }
    let mut editor = screen.editor().ok_or(CliError::NoEditor)?;
    let fields: Vec<ProfileField> = args.set.iter().map(|(field, _)| *field).collect();
    for (field, value) in args.set {
        editor.set(field, value)?;
    }

    match editor.save(&session.ctx, session.service.as_ref()).await {
        Ok(SaveOutcome::NothingToUpdate) => {
            println!("nothing to update");
            Ok(())
        }
        Ok(SaveOutcome::Saved { message, .. }) => {
            println!("{message}");
            print_profile(editor.baseline())
        }
        Err(SaveError::Invalid(errors)) => {
            for line in field_errors(&fields, &errors) {
                eprintln!("{line}");
            }
            Err(CliError::Save(errors.to_string()))
        }
        Err(e @ SaveError::Transport(_)) => {
            tracing::warn!(error = %e, "profile update failed");
            Err(CliError::Save(e.user_message()))
        }
        Err(e) => Err(CliError::Save(e.user_message())),
    }
}

async fn run_log(session: &Session, entry: &str) -> Result<(), CliError> {
    let response = session.service.send_log(entry).await?;
    if !response.success {
        return Err(CliError::Rejected(response.message));
    }
    println!("{}", response.message);
    Ok(())
}

fn print_view(view: &ProfileView) -> Result<(), CliError> {
    if let ProfileView::Unsupported(_) = view {
        eprintln!("{SUPPORT_MESSAGE}");
    }
    print_profile(view.profile())
}

fn print_profile(profile: &UserProfile) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(profile)?);
    Ok(())
}

/// One `  field: message` line per submitted field that failed validation.
fn field_errors(fields: &[ProfileField], errors: &ValidationErrors) -> Vec<String> {
    fields
        .iter()
        .filter_map(|field| errors.message_for(*field).map(|message| format!("  {field}: {message}")))
        .collect()
}

fn parse_assignment(raw: &str) -> Result<(ProfileField, String), AssignmentError> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| AssignmentError::MissingEquals(raw.to_owned()))?;
    let name = name.trim();
    let field = ProfileField::from_wire_name(name).ok_or_else(|| AssignmentError::UnknownField(name.to_owned()))?;
    Ok((field, value.to_owned()))
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
