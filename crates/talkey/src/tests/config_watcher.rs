use crate::ConfigWatcher;

use std::{fs, path::PathBuf};

use uuid::Uuid;

fn scratch_file() -> PathBuf {
    std::env::temp_dir().join(format!("talkey-watch-{}.toml", Uuid::new_v4()))
}

/// WHAT: Unchanged contents are not reported as a change
/// WHY: Reapplying the same triggers would discard an active recording
#[test]
#[allow(clippy::unwrap_used)]
fn given_unchanged_file_when_polled_then_no_change() {
    // Given: A watcher that already saw the current contents
    let path = scratch_file();
    fs::write(&path, "[hotkeys]\ntap_threshold_ms = 150\n").unwrap();
    let mut watcher = ConfigWatcher::new(path.clone(), fs::read_to_string(&path).ok());

    // When: Polling twice
    // Then: Nothing to apply
    assert!(watcher.poll().unwrap().is_none());
    assert!(watcher.poll().unwrap().is_none());

    fs::remove_file(&path).unwrap();
}

/// WHAT: An edited file is parsed and reported exactly once
/// WHY: The event loop should reconfigure once per edit
#[test]
#[allow(clippy::unwrap_used)]
fn given_edited_file_when_polled_then_new_config_once() {
    // Given: A watched file
    let path = scratch_file();
    fs::write(&path, "[hotkeys]\ntap_threshold_ms = 150\n").unwrap();
    let mut watcher = ConfigWatcher::new(path.clone(), fs::read_to_string(&path).ok());

    // When: The threshold is edited
    fs::write(&path, "[hotkeys]\ntap_threshold_ms = 300\n").unwrap();

    // Then: The new config arrives on the next poll only
    let config = watcher.poll().unwrap().unwrap();
    assert_eq!(config.hotkeys.tap_threshold_ms, 300);
    assert!(watcher.poll().unwrap().is_none());

    fs::remove_file(&path).unwrap();
}

/// WHAT: A broken edit is reported once, then ignored until fixed
/// WHY: A half-saved file must not flood the log or clear the triggers
#[test]
#[allow(clippy::unwrap_used)]
fn given_invalid_edit_when_polled_then_error_once_and_recovers() {
    // Given: A watched file
    let path = scratch_file();
    fs::write(&path, "").unwrap();
    let mut watcher = ConfigWatcher::new(path.clone(), Some(String::new()));

    // When: An unparseable accelerator is saved
    fs::write(&path, "[hotkeys]\ntoggle = \"ctrl+NotAKey\"\n").unwrap();

    // Then: Error once, then quiet
    assert!(watcher.poll().is_err());
    assert!(watcher.poll().unwrap().is_none());

    // And: Fixing the file yields a config again
    fs::write(&path, "[hotkeys]\ntoggle = \"ctrl+KeyD\"\n").unwrap();
    let config = watcher.poll().unwrap().unwrap();
    assert_eq!(config.hotkeys.toggle, "ctrl+KeyD");

    fs::remove_file(&path).unwrap();
}

/// WHAT: A deleted file is not treated as a change
/// WHY: Editors that save by delete-and-rename briefly leave no file
#[test]
#[allow(clippy::unwrap_used)]
fn given_missing_file_when_polled_then_no_change() {
    let mut watcher = ConfigWatcher::new(scratch_file(), None);

    assert!(watcher.poll().unwrap().is_none());
}
