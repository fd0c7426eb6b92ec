//! Contains Functionality of list container command
use std::fmt::Write as _;
use std::io;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use libstasis::container::Container;
use libstasis::statedir::StateDirRuntime;
use libstasis_cli::List;
use tabwriter::TabWriter;

/// lists all existing containers
pub fn list(args: List, root_path: PathBuf) -> Result<()> {
    let runtime = StateDirRuntime::new(root_path);
    let containers = runtime
        .load_all()
        .with_context(|| format!("failed to load containers from {:?}", runtime.root()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.quiet {
        for container in &containers {
            writeln!(out, "{}", container.id())?;
        }
        return Ok(());
    }

    let mut tab_writer = TabWriter::new(out);
    write!(&mut tab_writer, "{}", render_table(&containers))?;
    tab_writer.flush()?;

    Ok(())
}

fn render_table(containers: &[Container]) -> String {
    let mut content = String::from("ID\tNAME\tPID\tSTATUS\tBUNDLE\tCREATED\n");
    for container in containers {
        let pid = container
            .pid()
            .map(|pid| pid.to_string())
            .unwrap_or_default();

        let created = if let Some(utc) = container.created() {
            let local: DateTime<Local> = DateTime::from(utc);
            local.to_rfc3339_opts(chrono::SecondsFormat::Secs, false)
        } else {
            "".to_owned()
        };

        let _ = writeln!(
            content,
            "{}\t{}\t{}\t{}\t{}\t{}",
            container.id(),
            container.name().unwrap_or_default(),
            pid,
            container.status(),
            container.bundle().display(),
            created,
        );
    }
    content
}
