use super::load::{
    MAX_TICK_INTERVAL_MS, default_config_path, default_log_path, resolve_config_path,
};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_musicverse_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("MUSICVERSE_CONFIG_PATH", "/tmp/musicverse-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/musicverse-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("musicverse")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("musicverse")
            .join("config.toml")
    );
}

#[test]
fn default_log_path_uses_xdg_state_home_then_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_STATE_HOME", "/tmp/xdg-state");
    assert_eq!(
        default_log_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-state/musicverse/musicverse.log")
    );

    let _g2 = EnvGuard::remove("XDG_STATE_HOME");
    let _g3 = EnvGuard::set("HOME", "/tmp/home-dir");
    assert_eq!(
        default_log_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir/.local/state/musicverse/musicverse.log")
    );
}

#[test]
fn defaults_are_valid() {
    let s = Settings::default();
    assert!(s.validate().is_ok());
    assert_eq!(s.ui.tick_interval_ms, 1000);
    assert_eq!(s.ui.rotation_period_ms, 10_000);
    assert!(s.playback.auto_advance);
    assert_eq!(s.playback.arbitration, ArbitrationSetting::Exclusive);
}

#[test]
fn validate_rejects_zero_tick_and_bad_volume() {
    let mut s = Settings::default();
    s.ui.tick_interval_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.audio.volume = 1.5;
    assert!(s.validate().is_err());
}

#[test]
fn validate_rejects_huge_tick() {
    let mut s = Settings::default();
    s.ui.tick_interval_ms = u64::MAX;
    assert!(s.validate().is_err());

    s.ui.tick_interval_ms = MAX_TICK_INTERVAL_MS;
    assert!(s.validate().is_ok());

    let mut s = Settings::default();
    s.ui.rotation_period_ms = u64::MAX;
    assert!(s.validate().is_err());
}

#[test]
fn settings_load_from_config_file_and_parse_arbitration_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
auto_advance = false
arbitration = "both"

[audio]
volume = 0.5

[controls]
scrub_seconds = 9

[ui]
header_text = "hello"
tick_interval_ms = 250
rotation_period_ms = 4000

[library]
extensions = ["mp3"]
recursive = false
include_hidden = false
follow_links = false
alarm_dirs = ["wake"]
ringtone_dirs = ["rings"]
non_music_dirs = ["voice"]

[logging]
level = "debug"
file = "/tmp/musicverse-test.log"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("MUSICVERSE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("MUSICVERSE__UI__TICK_INTERVAL_MS");

    let s = Settings::load().unwrap();
    assert!(!s.playback.auto_advance);
    assert_eq!(s.playback.arbitration, ArbitrationSetting::Independent);
    assert_eq!(s.audio.volume, 0.5);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.ui.tick_interval_ms, 250);
    assert_eq!(s.ui.rotation_period_ms, 4000);
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(!s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.library.alarm_dirs, vec!["wake".to_string()]);
    assert_eq!(s.library.ringtone_dirs, vec!["rings".to_string()]);
    assert_eq!(s.library.non_music_dirs, vec!["voice".to_string()]);
    assert_eq!(s.logging.level, "debug");
    assert_eq!(
        s.logging.file.as_deref(),
        Some(std::path::Path::new("/tmp/musicverse-test.log"))
    );
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[ui]
tick_interval_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("MUSICVERSE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("MUSICVERSE__UI__TICK_INTERVAL_MS", "500");

    let s = Settings::load().unwrap();
    assert_eq!(s.ui.tick_interval_ms, 500);
}
