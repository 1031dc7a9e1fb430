//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Command-line arguments for the yatube binary.
#[derive(Debug, Parser)]
#[command(name = "yatube", version, about = "Yatube blogging server")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "YATUBE_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Apply pending database migrations and exit.
    Migrate,
    /// Create a user and print its access token.
    #[command(name = "create-user")]
    CreateUser(CreateUserArgs),
    /// Create a group posts can be filed under.
    #[command(name = "create-group")]
    CreateGroup(CreateGroupArgs),
}

#[derive(Debug, Args, Clone)]
pub struct CreateUserArgs {
    /// Unique username.
    #[arg(long)]
    pub username: String,

    /// Display name.
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct CreateGroupArgs {
    /// Group title.
    #[arg(long)]
    pub title: String,

    /// URL slug, unique across groups.
    #[arg(long)]
    pub slug: String,

    #[arg(long, default_value = "")]
    pub description: String,
}
