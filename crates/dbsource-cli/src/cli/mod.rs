//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "dbsource",
    bin_name = "dbsource",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Template sources served from a database",
    long_about = "dbsource resolves, loads and timestamps template sources \
                  through stored database calls, the way a templating engine \
                  would.",
    after_help = "EXAMPLES:\n\
        \x20 dbsource find greet\n\
        \x20 dbsource read greet --database-url postgres://app@localhost/templates\n\
        \x20 dbsource check greet --output-format json\n\
        \x20 dbsource exec -- psql -c 'select 1'",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve a template name to its locator.
    #[command(
        visible_alias = "f",
        about = "Resolve a template name to its locator",
        after_help = "EXAMPLES:\n\
            \x20 dbsource find greet\n\
            \x20 dbsource find mail/welcome --output-format json"
    )]
    Find(TemplateArgs),

    /// Print a template's source.
    #[command(
        visible_alias = "cat",
        about = "Print a template's source",
        after_help = "EXAMPLES:\n\
            \x20 dbsource read greet\n\
            \x20 dbsource read greet > greet.ftl"
    )]
    Read(TemplateArgs),

    /// Print a template's last-modified timestamp.
    #[command(
        about = "Print a template's last-modified timestamp",
        after_help = "EXAMPLES:\n\
            \x20 dbsource check greet\n\
            \x20 DBSOURCE_CALLS__CHECK='SELECT template_api.template_ts($1)' dbsource check greet"
    )]
    Check(TemplateArgs),

    /// Run an external command and print its output.
    #[command(
        about = "Run a command and print its output",
        after_help = "EXAMPLES:\n\
            \x20 dbsource exec echo hello\n\
            \x20 dbsource exec --encoding cp1252 -- cmd /c dir\n\
            \x20 dbsource exec --output-format json -- ls -la"
    )]
    Exec(ExecArgs),

    /// Initialise a configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 dbsource init           # default location\n\
            \x20 dbsource init --local   # .dbsource.toml in CWD\n\
            \x20 dbsource init --force   # overwrite"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 dbsource completions bash > ~/.local/share/bash-completion/completions/dbsource\n\
            \x20 dbsource completions zsh  > ~/.zfunc/_dbsource\n\
            \x20 dbsource completions fish > ~/.config/fish/completions/dbsource.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 dbsource config get calls.resolve\n\
            \x20 dbsource config list\n\
            \x20 dbsource config path"
    )]
    Config(ConfigCommands),
}

// ── find / read / check ───────────────────────────────────────────────────────

/// Arguments naming one template.
#[derive(Debug, Args)]
pub struct TemplateArgs {
    /// Template name as the engine would request it.
    #[arg(value_name = "NAME", help = "Template name")]
    pub name: String,
}

// ── exec ──────────────────────────────────────────────────────────────────────

/// Arguments for `dbsource exec`.
#[derive(Debug, Args)]
pub struct ExecArgs {
    /// Character encoding of the command's output.
    #[arg(
        long = "encoding",
        short = 'e',
        value_name = "LABEL",
        default_value = "utf-8",
        help = "Encoding of the command output (e.g. cp1252, latin1)"
    )]
    pub encoding: String,

    /// Program and arguments.  A single argument is split with shell word
    /// rules, so `dbsource exec "ls -la"` also works.
    #[arg(
        value_name = "COMMAND",
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        help = "Command to run"
    )]
    pub command: Vec<String>,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `dbsource init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.dbsource.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `dbsource completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `dbsource config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `calls.resolve`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
