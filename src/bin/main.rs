use clap::Parser;
use tokio::io::{stdin, stdout};
use tower_lsp_server::{LspService, Server};

use ansible_ls::lsp::AnsibleLs;

/// A Language Server Protocol (LSP) server for Ansible playbooks and roles
#[derive(Parser)]
#[command(name = "ansible-ls")]
#[command(version)]
#[command(about = "A Language Server Protocol (LSP) server for Ansible playbooks and roles")]
struct Cli {
    /// Default log filter when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // stdout carries the protocol, so logs go to stderr
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level))
        .target(env_logger::Target::Stderr)
        .init();

    let (service, socket) = LspService::new(AnsibleLs::new);
    Server::new(stdin(), stdout(), socket).serve(service).await;
}
