//! Purpose: `ossbind` CLI entry point: bind local payloads, fetch live entities, describe models.
//! Role: Binary crate root; parses args, runs commands, emits JSON on stdout.
//! Invariants: Commands emit JSON on stdout (pretty on a terminal, compact otherwise).
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
#![allow(clippy::result_large_err)]
use std::error::Error as StdError;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::{
    CommandFactory, Parser, Subcommand, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind,
};
use clap_complete::aot::Shell;
use ossbind::api::{ClientConfig, EntityKind, Error, ErrorKind, Mode, to_exit_code};
use serde_json::{Map, Value, json};
use tracing_subscriber::EnvFilter;

mod command_dispatch;

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, Error> {
    let cli = match Cli::try_parse_from(std::env::args_os()) {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Internal)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(clap_error_summary(&err))
                    .with_hint(clap_error_hint(&err)));
            }
        },
    };

    init_tracing();
    let settings = GlobalSettings {
        strict: cli.strict,
        lenient: cli.lenient,
        api_version: cli.api_version,
    };
    command_dispatch::dispatch_command(cli.command, &settings)
        .map_err(add_transport_hint)
        .map_err(add_internal_hint)
}

#[derive(Parser)]
#[command(
    name = "ossbind",
    version,
    about = "Bind osu! API v2 JSON onto typed models",
    help_template = r#"{about-with-newline}
{before-help}USAGE
  {usage}

COMMANDS
{subcommands}

OPTIONS
{options}

{after-help}
"#,
    long_about = None,
    before_help = r#"Payloads are checked against a static model catalogue.

Mental model:
  - `bind` checks a payload you already have (file or stdin)
  - `fetch` gets one entity from the API and binds it
  - `describe` shows what a model expects on the wire
"#,
    after_help = r#"EXAMPLES
  $ ossbind bind User user.json
  $ curl -s ... | ossbind --strict bind Score
  $ ossbind bind --report Beatmapset set.json
  $ OSSBIND_TOKEN=... ossbind fetch user 2
  $ ossbind describe Score

ENVIRONMENT
  OSSBIND_BASE_URL     API root (default https://osu.ppy.sh/api/v2)
  OSSBIND_TOKEN        OAuth bearer token for `fetch`
  OSSBIND_API_VERSION  x-api-version header and selector version (default 20220705)
  OSSBIND_STRICT       1/0; flags below take precedence
  RUST_LOG             diagnostics filter (default warn)"#,
    arg_required_else_help = true,
    disable_help_subcommand = false
)]
struct Cli {
    #[arg(
        long,
        global = true,
        conflicts_with = "lenient",
        help = "Reject unknown keys, missing required keys and unknown enum values"
    )]
    strict: bool,
    #[arg(long, global = true, help = "Tolerate provider drift (default)")]
    lenient: bool,
    #[arg(
        long,
        global = true,
        value_name = "YYYYMMDD",
        help = "API version for the x-api-version header and version-dependent models"
    )]
    api_version: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(
        about = "Bind a JSON payload onto a model",
        long_about = r#"Read one JSON value from FILE (or stdin) and bind it onto MODEL.

Prints the bound instance keyed by attribute names. Lenient binds tolerate
drift; `--report` lists every tolerated deviation with its JSON path."#,
        after_help = r#"EXAMPLES
  $ ossbind bind User user.json
  $ ossbind bind --wire Beatmap < beatmap.json
  $ ossbind --strict bind Score score.json"#
    )]
    Bind {
        #[arg(help = "Model name, e.g. User, Beatmapset, Score")]
        model: String,
        #[arg(
            help = "JSON file; reads stdin when omitted or `-`",
            value_hint = ValueHint::FilePath
        )]
        file: Option<PathBuf>,
        #[arg(long, help = "Also print the drift report")]
        report: bool,
        #[arg(long, help = "Key output by wire names instead of attribute names")]
        wire: bool,
    },
    #[command(
        about = "Fetch one entity from the API and bind it",
        after_help = r#"EXAMPLES
  $ OSSBIND_TOKEN=... ossbind fetch user 2
  $ ossbind fetch beatmapset 1 --base-url http://127.0.0.1:8080/api/v2"#
    )]
    Fetch {
        #[arg(value_enum, help = "Entity kind")]
        entity: EntityArg,
        #[arg(help = "Numeric id")]
        id: i64,
        #[arg(long, help = "API root (overrides OSSBIND_BASE_URL)")]
        base_url: Option<String>,
        #[arg(long, help = "Also print the drift report")]
        report: bool,
    },
    #[command(about = "Show field plans and relations for catalogue models")]
    Describe {
        #[arg(help = "Model name; all models when omitted")]
        model: Option<String>,
    },
    #[command(
        about = "Generate shell completion scripts",
        after_help = r#"EXAMPLES
  $ ossbind completion bash > ~/.local/share/bash-completion/completions/ossbind"#
    )]
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
    #[command(about = "Print version info")]
    Version,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum EntityArg {
    User,
    Beatmap,
    Beatmapset,
    Score,
}

impl EntityArg {
    fn collection(self) -> &'static str {
        match self {
            EntityArg::User => "users",
            EntityArg::Beatmap => "beatmaps",
            EntityArg::Beatmapset => "beatmapsets",
            EntityArg::Score => "scores",
        }
    }

    fn model(self) -> &'static str {
        match self {
            EntityArg::User => EntityKind::User.model(),
            EntityArg::Beatmap => EntityKind::Beatmap.model(),
            EntityArg::Beatmapset => EntityKind::Beatmapset.model(),
            EntityArg::Score => "Score",
        }
    }
}

/// Flags that apply to every command.
struct GlobalSettings {
    strict: bool,
    lenient: bool,
    api_version: Option<u32>,
}

impl GlobalSettings {
    /// Environment first, then flags on top.
    fn client_config(&self, base_url: Option<&str>) -> Result<ClientConfig, Error> {
        let mut config = ClientConfig::from_env()?;
        if let Some(base_url) = base_url {
            config = config.with_base_url(base_url)?;
        }
        if let Some(api_version) = self.api_version {
            config = config.with_api_version(api_version);
        }
        if self.strict {
            config = config.with_mode(Mode::Strict);
        } else if self.lenient {
            config = config.with_mode(Mode::Lenient);
        }
        Ok(config)
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn read_input(file: Option<&Path>) -> Result<(String, String), Error> {
    match file {
        Some(path) if path != Path::new("-") => {
            let text = std::fs::read_to_string(path).map_err(|err| {
                Error::new(ErrorKind::Usage)
                    .with_message(format!("failed to read {}", path.display()))
                    .with_hint("Pass a readable JSON file, or pipe the payload on stdin.")
                    .with_source(err)
            })?;
            Ok((text, path.display().to_string()))
        }
        _ => {
            if io::stdin().is_terminal() {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message("no payload: stdin is a terminal")
                    .with_hint(
                        "Pass a JSON file, or pipe one: `cat user.json | ossbind bind User`.",
                    ));
            }
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).map_err(|err| {
                Error::new(ErrorKind::Usage)
                    .with_message("failed to read stdin")
                    .with_source(err)
            })?;
            Ok((text, "stdin".to_string()))
        }
    }
}

fn emit_json(value: Value) {
    let json = if io::stdout().is_terminal() {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    }
    .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string());
    println!("{json}");
}

fn emit_version_output() {
    if io::stdout().is_terminal() {
        println!("ossbind {}", env!("CARGO_PKG_VERSION"));
    } else {
        emit_json(json!({
            "name": "ossbind",
            "version": env!("CARGO_PKG_VERSION"),
        }));
    }
}

fn add_transport_hint(err: Error) -> Error {
    if err.kind() != ErrorKind::Transport || err.hint().is_some() {
        return err;
    }
    err.with_hint("Check OSSBIND_BASE_URL and network access; RUST_LOG=debug shows each request.")
}

fn add_internal_hint(err: Error) -> Error {
    if err.kind() != ErrorKind::Internal || err.hint().is_some() {
        return err;
    }
    err.with_hint("Internal error. Re-run with RUST_LOG=debug and report the output.")
}

fn emit_error(err: &Error) {
    if io::stderr().is_terminal() {
        eprintln!("{}", error_text(err));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error",
        ErrorKind::Usage => "usage error",
        ErrorKind::Resolution => "type does not resolve",
        ErrorKind::TypeMismatch => "value has the wrong JSON type",
        ErrorKind::MissingField => "required field is missing",
        ErrorKind::UnknownField => "payload has an undeclared field",
        ErrorKind::UnknownVariant => "unrecognized variant",
        ErrorKind::UnknownEnumValue => "unknown enum value",
        ErrorKind::DateParse => "malformed date-time",
        ErrorKind::DetachedInstance => "instance has no owning client",
        ErrorKind::AttributeMissing => "attribute is absent",
        ErrorKind::Transport => "request failed",
        ErrorKind::Decode => "invalid JSON",
    }
    .to_string()
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(path) = err.path() {
        inner.insert("path".to_string(), json!(path));
    }
    if let Some(model) = err.model() {
        inner.insert("model".to_string(), json!(model));
    }
    if let Some(field) = err.field() {
        inner.insert("field".to_string(), json!(field));
    }
    if let Some(value) = err.value() {
        inner.insert("value".to_string(), json!(value));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error) -> String {
    let mut lines = vec![format!("error: {}", error_message(err))];
    if let Some(hint) = err.hint() {
        lines.push(format!("hint: {hint}"));
    }
    if let Some(path) = err.path() {
        lines.push(format!("path: {path}"));
    }
    if let Some(model) = err.model() {
        match err.field() {
            Some(field) => lines.push(format!("model: {model}.{field}")),
            None => lines.push(format!("model: {model}")),
        }
    }
    if let Some(cause) = error_causes(err).first() {
        lines.push(format!("caused by: {cause}"));
    }
    lines.join("\n")
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}

fn clap_error_hint(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let usage = rendered
        .lines()
        .find_map(|line| line.trim().strip_prefix("Usage: "))
        .map(str::trim);

    let Some(usage) = usage else {
        return "Try `ossbind --help`.".to_string();
    };

    let tokens: Vec<&str> = usage.split_whitespace().collect();
    let Some(pos) = tokens.iter().position(|t| *t == "ossbind") else {
        return "Try `ossbind --help`.".to_string();
    };

    let parts: Vec<&str> = tokens
        .iter()
        .skip(pos + 1)
        .take_while(|token| {
            !(token.starts_with('-') || token.starts_with('<') || token.starts_with('['))
        })
        .copied()
        .collect();

    if parts.is_empty() {
        return "Try `ossbind --help`.".to_string();
    }
    format!("Try `ossbind {} --help`.", parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, EntityArg, GlobalSettings, error_json};
    use clap::Parser;
    use ossbind::api::{Error, ErrorKind};

    #[test]
    fn strict_and_lenient_conflict() {
        assert!(Cli::try_parse_from(["ossbind", "--strict", "--lenient", "version"]).is_err());
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "ossbind",
            "bind",
            "User",
            "--strict",
            "--api-version",
            "20220101",
        ])
        .expect("parse");
        assert!(cli.strict);
        assert_eq!(cli.api_version, Some(20220101));
        assert!(matches!(cli.command, Command::Bind { .. }));
    }

    #[test]
    fn fetch_parses_entity_kinds() {
        let cli = Cli::try_parse_from(["ossbind", "fetch", "beatmapset", "41823"]).expect("parse");
        match cli.command {
            Command::Fetch { entity, id, .. } => {
                assert_eq!(entity, EntityArg::Beatmapset);
                assert_eq!(id, 41823);
            }
            _ => panic!("expected fetch"),
        }
    }

    #[test]
    fn flags_override_config() {
        let settings = GlobalSettings {
            strict: true,
            lenient: false,
            api_version: Some(20200101),
        };
        let config = settings
            .client_config(Some("http://127.0.0.1:1/api"))
            .expect("config");
        assert!(config.mode().is_strict());
        assert_eq!(config.api_version(), 20200101);
        assert_eq!(config.base_url().as_str(), "http://127.0.0.1:1/api/");
    }

    #[test]
    fn error_envelope_carries_location() {
        let err = Error::new(ErrorKind::MissingField)
            .with_model("User")
            .with_field("username")
            .with_path("$.friends[0]");
        let value = error_json(&err);
        assert_eq!(value["error"]["kind"], "MissingField");
        assert_eq!(value["error"]["message"], "required field is missing");
        assert_eq!(value["error"]["path"], "$.friends[0]");
        assert_eq!(value["error"]["field"], "username");
    }
}
