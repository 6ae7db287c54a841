//! CLI layer: argument parsing ([`args`]), dispatch ([`commands`]), and
//! terminal rendering ([`render`]). Everything below this layer is the
//! UI-agnostic `kontorapp` library.

use clap::Parser;

pub mod args;
pub mod commands;
pub mod render;

pub fn run() -> kontorapp::Result<()> {
    let cli = args::Cli::parse();
    commands::run(cli)
}
