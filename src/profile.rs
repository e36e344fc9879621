//! TOML profile store under `~/.config/gesturectl`.
//!
//! A profile carries the engine thresholds, the enabled gesture classes,
//! and host preferences (reduced motion). The `active` pointer file names
//! the profile the run loop uses; a default profile is installed on first
//! run.

use anyhow::{Result, anyhow};
use directories::UserDirs;
use log::info;
use serde::Deserialize;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use gesturectl::{Config, GestureSet};

#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    pub name: Option<String>,
    #[serde(default)]
    pub reduced_motion: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thresholds {
    pub move_threshold_px: f32,
    pub swipe_velocity: f32,
    pub double_tap_ms: u64,
    pub long_press_ms: u64,
    pub long_press_tolerance_px: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub meta: Meta,
    #[serde(default)]
    pub gestures: GestureSet,
    pub thresholds: Thresholds,
}

impl Profile {
    pub fn engine_config(&self) -> Config {
        Config {
            gestures: self.gestures.clone(),
            move_threshold_px: self.thresholds.move_threshold_px,
            swipe_velocity: self.thresholds.swipe_velocity,
            double_tap_ms: self.thresholds.double_tap_ms,
            long_press_ms: self.thresholds.long_press_ms,
            long_press_tolerance_px: self.thresholds.long_press_tolerance_px,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProfileStore {
    pub active_name: String,
    pub profile: Profile,
    pub config_dir: PathBuf,
    pub profiles_dir: PathBuf,
    pub active_ptr: PathBuf,
}

fn config_dir() -> Result<PathBuf> {
    let dirs = UserDirs::new().ok_or_else(|| anyhow!("cannot resolve home directory"))?;
    Ok(dirs.home_dir().join(".config").join("gesturectl"))
}

fn default_profile_text() -> &'static str {
    include_str!("../profiles/default.toml")
}

impl ProfileStore {
    pub fn load_or_install_default() -> Result<Self> {
        let cfgdir = config_dir()?;
        let profdir = cfgdir.join("profiles");
        fs::create_dir_all(&profdir)?;

        let def_path = profdir.join("default.toml");
        if !def_path.exists() {
            fs::write(&def_path, default_profile_text())?;
            info!("installed default profile at {}", def_path.display());
        }

        let active_ptr = cfgdir.join("active");
        if !active_ptr.exists() {
            let mut f = fs::File::create(&active_ptr)?;
            f.write_all(b"default")?;
        }

        let active_name = fs::read_to_string(&active_ptr)?.trim().to_string();
        let profile = Self::load_profile(&profdir, &active_name)?;

        Ok(Self {
            active_name,
            profile,
            config_dir: cfgdir,
            profiles_dir: profdir,
            active_ptr,
        })
    }

    pub fn reload(&mut self) -> Result<()> {
        self.profile = Self::load_profile(&self.profiles_dir, &self.active_name)?;
        Ok(())
    }

    pub fn set_active(&mut self, name: &str) -> Result<()> {
        let p = self.profiles_dir.join(format!("{name}.toml"));
        if !p.exists() {
            return Err(anyhow!("profile not found: {}", p.display()));
        }
        fs::write(&self.active_ptr, name.as_bytes())?;
        self.active_name = name.to_string();
        self.reload()
    }

    pub fn list_profiles(&self) -> Vec<String> {
        let mut v = Vec::new();
        if let Ok(rd) = fs::read_dir(&self.profiles_dir) {
            for e in rd.flatten() {
                let path = e.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        v.push(stem.to_string());
                    }
                }
            }
        }
        v.sort();
        v
    }

    fn load_profile(profiles_dir: &Path, name: &str) -> Result<Profile> {
        let path = profiles_dir.join(format!("{name}.toml"));
        let txt = fs::read_to_string(&path)
            .map_err(|e| anyhow!("failed to read {}: {e}", path.display()))?;
        let profile: Profile =
            toml::from_str(&txt).map_err(|e| anyhow!("failed to parse {}: {e}", path.display()))?;
        profile
            .engine_config()
            .validate()
            .map_err(|e| anyhow!("invalid profile {}: {e}", path.display()))?;
        Ok(profile)
    }

    pub fn doctor_report(&self) -> serde_json::Value {
        let devices: Vec<serde_json::Value> = crate::input::discover_multitouch()
            .iter()
            .map(|d| {
                serde_json::json!({
                    "path": d.path,
                    "name": d.name,
                    "x_range": [d.x_range.0, d.x_range.1],
                    "y_range": [d.y_range.0, d.y_range.1],
                })
            })
            .collect();
        serde_json::json!({
            "input_group_member": check_in_input_group(),
            "profiles_dir": self.profiles_dir,
            "active_profile": self.active_name,
            "reduced_motion": self.profile.meta.reduced_motion,
            "devices": devices,
            "hints": {
                "add_user_to_input_group": "sudo usermod -aG input $USER && newgrp input"
            }
        })
    }
}

fn check_in_input_group() -> bool {
    if let Ok(s) = fs::read_to_string("/etc/group") {
        let user = whoami::username();
        for line in s.lines() {
            if line.starts_with("input:") {
                if line
                    .split(':')
                    .nth(3)
                    .unwrap_or("")
                    .split(',')
                    .any(|u| u == user)
                {
                    return true;
                }
            }
        }
    }
    false
}
