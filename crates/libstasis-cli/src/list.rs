use clap::Parser;

/// List containers in the state directory
#[derive(Parser, Debug)]
pub struct List {
    /// Only display container IDs
    #[clap(long, short)]
    pub quiet: bool,
}
