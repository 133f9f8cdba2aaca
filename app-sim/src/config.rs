use failure::Error;

use serde_derive::Deserialize;

use std::fs::File;
use std::io::Read;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Sim {
  pub frame_interval_ms: u64,
  pub clip_duration: f64,
  pub load_latency_ms: u64,
  pub run_secs: u64,
}

impl Default for Sim {
  fn default() -> Sim {
    Sim {
      frame_interval_ms: 16,
      clip_duration: 2.0,
      load_latency_ms: 120,
      run_secs: 20,
    }
  }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
  pub sim: Sim,
}

impl Default for Config {
  fn default() -> Config {
    Config {
      sim: Sim::default(),
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

  #[allow(dead_code)]
  pub fn from_str<'a, T>(content: T) -> Result<Config, Error>
  where
    T: Into<&'a str>,
  {
    let config: Config = toml::from_str(content.into())?;
    Ok(config)
  }
}
