use std::fmt::Debug;
use std::path::PathBuf;

use clap::Parser;

mod list;
mod pause;
mod resume;

pub use list::List;
pub use pause::Pause;
pub use resume::Resume;

// Subcommands that act on the containers recorded in the state directory
#[derive(Parser, Debug)]
pub enum Command {
    Pause(Pause),
    Resume(Resume),
    List(List),
}

// Flags accepted by every subcommand
#[derive(Parser, Debug)]
pub struct GlobalOpts {
    /// set the log file to write stasis logs to (default is '/dev/stderr')
    #[clap(short, long, overrides_with("log"))]
    pub log: Option<PathBuf>,
    /// change log level to debug, but the `log-level` flag takes precedence
    #[clap(long)]
    pub debug: bool,
    /// set the log format ('text' (default), or 'json') (default: "text")
    #[clap(long)]
    pub log_format: Option<String>,
    /// root directory holding container state
    #[clap(short, long)]
    pub root: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Parser, Debug)]
    struct TestOpts {
        #[clap(flatten)]
        global: GlobalOpts,
        #[clap(subcommand)]
        cmd: Command,
    }

    #[test]
    fn test_pause_many() {
        let opts = TestOpts::parse_from(["stasis", "--root", "/tmp/s", "pause", "abc", "web"]);
        assert_eq!(opts.global.root, Some(PathBuf::from("/tmp/s")));
        match opts.cmd {
            Command::Pause(pause) => {
                assert_eq!(pause.container_ids, vec!["abc", "web"]);
                assert_eq!(pause.timeout, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_resume_with_timeout() {
        let opts = TestOpts::parse_from(["stasis", "resume", "--timeout", "5", "abc"]);
        match opts.cmd {
            Command::Resume(resume) => {
                assert_eq!(resume.container_ids, vec!["abc"]);
                assert_eq!(resume.timeout, Some(5));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_pause_requires_reference() {
        assert!(TestOpts::try_parse_from(["stasis", "pause"]).is_err());
    }

    #[test]
    fn test_list_quiet() {
        let opts = TestOpts::parse_from(["stasis", "list", "-q"]);
        assert!(matches!(opts.cmd, Command::List(List { quiet: true })));
    }
}
