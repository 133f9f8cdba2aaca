use failure::Error;

use serde_derive::Deserialize;

use std::fs::File;
use std::io::Read;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Playback {
  pub rate: f64,
}

impl Default for Playback {
  fn default() -> Playback {
    Playback { rate: 1.0 }
  }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SyncTuning {
  pub sibling_wait_ms: u64,
  pub drift_check_interval_ms: u64,
  pub drift_tolerance: f64,
}

impl Default for SyncTuning {
  fn default() -> SyncTuning {
    SyncTuning {
      sibling_wait_ms: 40,
      drift_check_interval_ms: 100,
      drift_tolerance: 0.1,
    }
  }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Track {
  pub name: String,
  pub clips: Vec<String>,
  #[serde(default)]
  pub group: Option<String>,
  #[serde(default)]
  pub rate: Option<f64>,
  #[serde(default = "default_muted")]
  pub muted: bool,
}

fn default_muted() -> bool {
  true
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
  pub playback: Playback,
  pub sync: SyncTuning,
  pub tracks: Vec<Track>,
}

impl Default for Config {
  fn default() -> Config {
    Config {
      playback: Playback::default(),
      sync: SyncTuning::default(),
      tracks: Vec::new(),
    }
  }
}

impl Config {
  pub fn from_file<'a, T>(path: T) -> Result<Config, Error>
  where
    T: Into<&'a str>,
  {
    let mut content = String::new();
    let path_str = path.into();
    let mut file = File::open(path_str)?;
    file.read_to_string(&mut content)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
  }

  pub fn from_str<'a, T>(content: T) -> Result<Config, Error>
  where
    T: Into<&'a str>,
  {
    let config: Config = toml::from_str(content.into())?;
    Ok(config)
  }
}

#[cfg(test)]
mod test {
  use super::Config;

  #[test]
  pub fn config_defaults() {
    let config = Config::from_str("").unwrap();
    assert_eq!(config.playback.rate, 1.0);
    assert_eq!(config.sync.sibling_wait_ms, 40);
    assert_eq!(config.sync.drift_check_interval_ms, 100);
    assert_eq!(config.sync.drift_tolerance, 0.1);
    assert!(config.tracks.is_empty());
  }

  #[test]
  pub fn config_full() {
    let config = Config::from_str(
      r#"
      [playback]
      rate = 0.9

      [sync]
      sibling_wait_ms = 60
      drift_check_interval_ms = 250
      drift_tolerance = 0.05

      [[tracks]]
      name = "bass"
      clips = ["BassLoop1.mp4", "BassLoop1.mp4", "BassLoop2.mp4"]
      group = "hero"

      [[tracks]]
      name = "chest"
      clips = ["ChestLoop.mp4"]
      muted = false
      rate = 1.0
      "#,
    )
    .unwrap();

    assert_eq!(config.playback.rate, 0.9);
    assert_eq!(config.sync.sibling_wait_ms, 60);
    assert_eq!(config.sync.drift_check_interval_ms, 250);
    assert_eq!(config.sync.drift_tolerance, 0.05);
    assert_eq!(config.tracks.len(), 2);
    assert_eq!(config.tracks[0].name, "bass");
    assert_eq!(config.tracks[0].clips.len(), 3);
    assert_eq!(config.tracks[0].group, Some("hero".to_string()));
    assert_eq!(config.tracks[0].muted, true);
    assert_eq!(config.tracks[1].group, None);
    assert_eq!(config.tracks[1].muted, false);
    assert_eq!(config.tracks[1].rate, Some(1.0));
  }

  #[test]
  pub fn config_partial_track() {
    let config = Config::from_str(
      r#"
      [[tracks]]
      name = "flip"
      clips = ["FlipLoop1.mp4"]
      "#,
    )
    .unwrap();

    assert_eq!(config.tracks[0].muted, true);
    assert_eq!(config.tracks[0].rate, None);
    assert_eq!(config.tracks[0].group, None);
  }
}
