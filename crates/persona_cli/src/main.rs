//! Terminal front-end for the persona records client.
//!
//! # Responsibility
//! - Map subcommands onto `PersonaApp` command handlers.
//! - Print the table, inline alerts and toasts the handlers produce.

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use persona_core::{
    default_log_level, init_logging, AlertLevel, ClientConfig, DeleteChain, DeleteResult,
    PersonaApp, PersonaForm, PersonaId, ReqwestTransport, Role, Sex, SubmitOutcome, TableView,
    Transport,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "persona")]
#[command(about = "Manage school persona records through the REST API")]
struct Cli {
    /// Collection endpoint; overrides PERSONA_API_URL.
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[arg(long, global = true, value_enum)]
    delete_mode: Option<DeleteModeCli>,
    /// Request timeout in seconds; 0 waits indefinitely.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Absolute directory for rolling log files; logging is off without it.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print all records.
    List,
    /// Register a new person.
    Create(FieldArgs),
    /// Edit an existing person; omitted fields keep their current value.
    Update {
        #[arg(long)]
        id: PersonaId,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a person after confirmation.
    Delete {
        #[arg(long)]
        id: PersonaId,
        /// Skip the confirmation prompt.
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
}

#[derive(Args)]
struct FieldArgs {
    #[arg(long)]
    nombre: Option<String>,
    #[arg(long)]
    apellido: Option<String>,
    /// M or F, any case.
    #[arg(long, value_parser = parse_sex)]
    sexo: Option<Sex>,
    /// 1/estudiante or 2/profesor.
    #[arg(long, value_parser = parse_role)]
    rol: Option<Role>,
    /// YYYY-MM-DD.
    #[arg(long)]
    fh_nac: Option<String>,
}

impl FieldArgs {
    fn apply(self, form: &mut PersonaForm) {
        if let Some(nombre) = self.nombre {
            form.nombre = nombre;
        }
        if let Some(apellido) = self.apellido {
            form.apellido = apellido;
        }
        if let Some(sexo) = self.sexo {
            form.sexo = Some(sexo);
        }
        if let Some(rol) = self.rol {
            form.rol = Some(rol);
        }
        if let Some(fh_nac) = self.fh_nac {
            form.fh_nac = fh_nac;
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DeleteModeCli {
    Full,
    Path,
}

fn parse_sex(value: &str) -> Result<Sex, String> {
    Sex::parse(value).ok_or_else(|| format!("expected M or F, got `{value}`"))
}

fn parse_role(value: &str) -> Result<Role, String> {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(Role::from_code)
        .or_else(|| Role::from_label(value))
        .ok_or_else(|| format!("expected 1/estudiante or 2/profesor, got `{value}`"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, &dir.to_string_lossy()) {
            eprintln!("logging disabled: {err}");
        }
    }

    let config = build_config(&cli);
    if let Err(err) = config.validate() {
        eprintln!("invalid configuration: {err}");
        return ExitCode::from(2);
    }
    let transport = match ReqwestTransport::new(config.request_timeout) {
        Ok(transport) => transport,
        Err(err) => {
            eprintln!("failed to build http client: {err}");
            return ExitCode::from(2);
        }
    };

    let mut app = PersonaApp::new(transport, &config);
    info!("event=cli_start module=cli status=ok");
    let ok = match cli.command {
        Commands::List => run_list(&mut app),
        Commands::Create(fields) => run_create(&mut app, fields),
        Commands::Update { id, fields } => run_update(&mut app, id, fields),
        Commands::Delete { id, yes } => run_delete(&mut app, id, yes, &mut io::stdin().lock()),
    };
    print_toasts(&mut app);

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn build_config(cli: &Cli) -> ClientConfig {
    let mut config = ClientConfig::from_env();
    if let Some(url) = &cli.base_url {
        config = config.with_base_url(url.as_str());
    }
    if let Some(mode) = cli.delete_mode {
        config.delete_chain = match mode {
            DeleteModeCli::Full => DeleteChain::full(),
            DeleteModeCli::Path => DeleteChain::path_only(),
        };
    }
    if let Some(secs) = cli.timeout_secs {
        config.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }
    config
}

fn run_list<T: Transport>(app: &mut PersonaApp<T>) -> bool {
    let loaded = app.load_table().is_ok();
    print_table(app);
    loaded
}

fn run_create<T: Transport>(app: &mut PersonaApp<T>, fields: FieldArgs) -> bool {
    app.handle_create_new();
    fields.apply(app.dialog_mut().form_mut());
    submit(app)
}

fn run_update<T: Transport>(app: &mut PersonaApp<T>, id: PersonaId, fields: FieldArgs) -> bool {
    if app.load_table().is_err() {
        print_table(app);
        return false;
    }
    if !app.handle_edit(id) {
        eprintln!("No se encontró la persona con id: {id}");
        return false;
    }
    fields.apply(app.dialog_mut().form_mut());
    submit(app)
}

fn run_delete<T: Transport>(
    app: &mut PersonaApp<T>,
    id: PersonaId,
    yes: bool,
    input: &mut impl BufRead,
) -> bool {
    // The name is only used in the prompt; an unknown id is still sent.
    if app.load_table().is_err() {
        print_table(app);
    }
    let display_name = app
        .store()
        .find(id)
        .map(|record| record.display_name())
        .unwrap_or_else(|| "(desconocido)".to_string());
    let prompt = app.request_delete(id, display_name).prompt();

    if !yes && !confirm(&prompt, input) {
        app.cancel_delete();
        println!("Borrado cancelado.");
        return true;
    }

    match app.confirm_delete() {
        DeleteResult::Deleted { .. } => {
            print_table(app);
            true
        }
        DeleteResult::Failed(_) | DeleteResult::NothingPending => false,
    }
}

fn submit<T: Transport>(app: &mut PersonaApp<T>) -> bool {
    match app.handle_submit() {
        SubmitOutcome::Created(_) | SubmitOutcome::Updated(_) => {
            print_table(app);
            true
        }
        SubmitOutcome::Invalid | SubmitOutcome::Failed(_) => {
            if let Some(alert) = app.dialog().alert() {
                eprintln!("[{}] {}", alert.level.as_str(), alert.message);
            }
            false
        }
        SubmitOutcome::NotOpen => false,
    }
}

fn confirm(prompt: &str, input: &mut impl BufRead) -> bool {
    print!("{prompt} [s/N] ");
    let _ = io::stdout().flush();
    let mut answer = String::new();
    if input.read_line(&mut answer).is_err() {
        return false;
    }
    matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "si" | "sí" | "y" | "yes"
    )
}

/// Prints the table view; the inline load error goes to stderr.
fn print_table<T: Transport>(app: &PersonaApp<T>) {
    let text = app.table().render_text();
    if text.is_empty() {
        return;
    }
    match app.table() {
        TableView::Error(_) => eprintln!("{}", text.trim_end()),
        _ => println!("{}", text.trim_end()),
    }
}

fn print_toasts<T: Transport>(app: &mut PersonaApp<T>) {
    for toast in app.toasts_mut().drain() {
        if toast.level == AlertLevel::Success {
            println!("{}", toast.render_text());
        } else {
            eprintln!("{}", toast.render_text());
        }
    }
}
