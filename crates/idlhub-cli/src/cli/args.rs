use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "idl",
    version,
    about = "Stores and fetches versioned IDL bundles"
)]
pub struct Cli {
    /// The location of the idl configuration yaml file
    #[arg(long, global = true, default_value = "./idl.yaml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write a fresh configuration file
    Init(InitArgs),
    /// Package every declared provide and upload it as the given version
    Push(PushArgs),
    /// Download every declared dependency into the idl directory
    Pull,
    Version,
}

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Project name used when pushing
    pub name: String,
    /// Default repository base URL
    pub repository: String,
}

#[derive(clap::Args, Debug)]
pub struct PushArgs {
    /// The semantic version to publish
    pub version: String,
}
