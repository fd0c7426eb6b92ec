use std::fs;
use std::path::Path;

use anyhow::Result;
use libstasis::batch::{self, BatchOptions};
use libstasis::container::{Container, ContainerStatus};
use libstasis::statedir::StateDirRuntime;

fn write_file(dir: &Path, name: &str, content: &str) -> Result<()> {
    fs::write(dir.join(name), content)?;
    Ok(())
}

fn add_running(root: &Path, id: &str, name: Option<&str>, cgroup: &Path) -> Result<()> {
    let dir = root.join(id);
    fs::create_dir(&dir)?;
    let mut container = Container::new(
        id,
        ContainerStatus::Running,
        Some(std::process::id() as i32),
        Path::new("/bundle"),
        &dir,
    )?;
    if let Some(name) = name {
        container.set_name(name);
    }
    container.set_cgroup_path(cgroup.to_path_buf());
    container.save()?;
    Ok(())
}

fn status(root: &Path, id: &str) -> Result<ContainerStatus> {
    Ok(Container::load(root.join(id))?.status())
}

#[test]
fn pause_and_resume_from_state_dir() -> Result<()> {
    let root = tempfile::tempdir()?;
    // unified hierarchy cgroup that reports frozen right away
    let web_cgroup = tempfile::tempdir()?;
    write_file(web_cgroup.path(), "cgroup.freeze", "")?;
    write_file(web_cgroup.path(), "cgroup.events", "populated 1\nfrozen 1\n")?;
    // v1 freezer cgroup
    let cache_cgroup = tempfile::tempdir()?;
    write_file(cache_cgroup.path(), "freezer.state", "")?;

    add_running(root.path(), "abc123full", None, web_cgroup.path())?;
    add_running(root.path(), "9f8e7d6c5b", Some("cache"), cache_cgroup.path())?;
    let runtime = StateDirRuntime::new(root.path());

    let mut stdout = Vec::new();
    let err = batch::pause(
        &runtime,
        &["abc123", "xyz999", "cache", "abc"],
        BatchOptions::new(&mut stdout),
    )
    .unwrap_err();

    assert_eq!(String::from_utf8(stdout)?, "abc123\ncache\n");
    // the second reference to the same container finds it already paused
    assert_eq!(
        err.to_string(),
        "no such container xyz999\ncontainer abc123full is already paused"
    );
    assert_eq!(status(root.path(), "abc123full")?, ContainerStatus::Paused);
    assert_eq!(status(root.path(), "9f8e7d6c5b")?, ContainerStatus::Paused);
    assert_eq!(
        fs::read_to_string(cache_cgroup.path().join("freezer.state"))?,
        "FROZEN"
    );

    let mut stdout = Vec::new();
    batch::resume(&runtime, &["abc", "cache"], BatchOptions::new(&mut stdout))?;

    assert_eq!(String::from_utf8(stdout)?, "abc\ncache\n");
    assert_eq!(status(root.path(), "abc123full")?, ContainerStatus::Running);
    assert_eq!(status(root.path(), "9f8e7d6c5b")?, ContainerStatus::Running);
    assert_eq!(
        fs::read_to_string(web_cgroup.path().join("cgroup.freeze"))?,
        "0"
    );
    Ok(())
}

#[test]
fn missing_state_root_fails_every_reference() {
    let runtime = StateDirRuntime::new("/does/not/exist/stasis");
    let mut stdout = Vec::new();

    let err = batch::pause(&runtime, &["a", "b"], BatchOptions::new(&mut stdout)).unwrap_err();

    assert!(stdout.is_empty());
    assert_eq!(err.failures().len(), 2);
    for line in err.to_string().lines() {
        assert!(line.starts_with("failed to look up container"), "{line}");
    }
}
