//! navshell command-line tool
//!
//! Reads a page, extracts its navigation model and prints the bridge command
//! stream (`init`, then `update`) as JSON lines, as a host shell would receive it.

use anyhow::{Context, bail};
use clap::Parser;
use navshell::{BrowserSession, BuildOptions, DomTree, JsonGateway, LaunchOptions, NavShell};
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "navshell")]
#[command(version)]
#[command(about = "Extract native navigation menus from page markup", long_about = None)]
struct Cli {
    /// HTML file to read ("-" for stdin)
    #[arg(value_name = "FILE", conflicts_with = "url")]
    file: Option<PathBuf>,

    /// Load the page in Chrome instead of parsing a file
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H')]
    headed: bool,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    executable_path: Option<PathBuf>,

    /// Extract from the element with this id instead of the whole body
    #[arg(long, value_name = "ID")]
    root_id: Option<String>,

    /// Ask the host to drop previously installed items
    #[arg(long)]
    force: bool,

    /// Print the page tree to stderr after extraction
    #[arg(long)]
    dump_tree: bool,
}

fn read_html(path: &PathBuf) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut html = String::new();
        io::stdin().read_to_string(&mut html).context("Failed to read stdin")?;
        return Ok(html);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let (mut tree, session) = match (&cli.file, &cli.url) {
        (_, Some(url)) => {
            let mut options = LaunchOptions::new().headless(!cli.headed);
            if let Some(path) = &cli.executable_path {
                options = options.chrome_path(path);
            }

            let session = BrowserSession::launch(options)?;
            session.navigate(url)?;
            (session.extract_page()?, Some(session))
        }
        (Some(path), None) => (DomTree::from_html(&read_html(path)?)?, None),
        (None, None) => bail!("Provide an HTML file or --url"),
    };

    let root = match &cli.root_id {
        Some(id) => Some(
            tree.find_path_by_id(id)
                .with_context(|| format!("No element with id '{}'", id))?,
        ),
        None => None,
    };

    let options = BuildOptions::new()
        .force(cli.force)
        .on_error(|err| eprintln!("error: {}", err));

    let mut shell = NavShell::new(JsonGateway::new(io::stdout().lock())).with_options(options);
    shell.initialize();

    let report = shell.set_application_menus(&mut tree, root.as_deref())?;
    for diagnostic in &report.diagnostics {
        eprintln!("warning: {}", diagnostic);
    }

    if let Some(session) = &session {
        session.suppress(&report.suppressed)?;
    }

    if cli.dump_tree {
        eprintln!("{}", tree.to_json()?);
    }

    Ok(())
}
