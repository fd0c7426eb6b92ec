use clap::Parser;

/// Resume the processes within one or more paused containers
#[derive(Parser, Debug)]
pub struct Resume {
    /// Container IDs, unique ID prefixes, or names
    #[clap(required = true, num_args = 1..)]
    pub container_ids: Vec<String>,
    /// Give up on references not processed within this many seconds
    #[clap(long)]
    pub timeout: Option<u64>,
}
