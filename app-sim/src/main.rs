use std::time::Duration;

use log::{debug, info};

use failure::{Error, Fail};

use loopsync_core::config::Config;

mod config;
use crate::config::Config as SimConfig;

mod sim;
use crate::sim::Simulation;

const LOOPSYNC_CONFIG: &'static str = "LOOPSYNC_CONFIG";
const DEFAULT_LOOPSYNC_CONFIG: &'static str = "loopsync.toml";

const LOOPSYNC_SIM_CONFIG: &'static str = "LOOPSYNC_SIM_CONFIG";
const DEFAULT_LOOPSYNC_SIM_CONFIG: &'static str = "sim.toml";

const LOOPSYNC_LOG_CONFIG: &'static str = "LOOPSYNC_LOG_CONFIG";
const DEFAULT_LOOPSYNC_LOG_CONFIG: &'static str = "log4rs.yaml";

#[derive(Debug, Fail)]
enum MainError {
  #[fail(display = "Failed to init logging: {}", cause)]
  LoggingInit { cause: String },
}

fn main() -> Result<(), Error> {
  init_logging()?;

  let config = init_config()?;

  let sim_config = init_sim_config()?;

  let mut simulation = Simulation::new(&config, &sim_config.sim)?;

  run(&mut simulation, &sim_config)
}

fn init_logging() -> Result<(), Error> {
  let log_config_path = std::env::var(LOOPSYNC_LOG_CONFIG)
    .unwrap_or_else(|_| DEFAULT_LOOPSYNC_LOG_CONFIG.to_string());

  log4rs::init_file(log_config_path.as_str(), Default::default()).map_err(|err| {
    MainError::LoggingInit {
      cause: err.to_string(),
    }
  })?;

  Ok(())
}

fn init_config() -> Result<Config, Error> {
  let config_path =
    std::env::var(LOOPSYNC_CONFIG).unwrap_or_else(|_| DEFAULT_LOOPSYNC_CONFIG.to_string());

  info!("Loading track configuration from {} ...", config_path);
  let config = Config::from_file(config_path.as_str())?;
  debug!("{:#?}", config);

  Ok(config)
}

fn init_sim_config() -> Result<SimConfig, Error> {
  let config_path =
    std::env::var(LOOPSYNC_SIM_CONFIG).unwrap_or_else(|_| DEFAULT_LOOPSYNC_SIM_CONFIG.to_string());

  info!("Loading simulation configuration from {} ...", config_path);
  let config = SimConfig::from_file(config_path.as_str())?;
  debug!("{:#?}", config);

  Ok(config)
}

fn run(simulation: &mut Simulation, sim_config: &SimConfig) -> Result<(), Error> {
  let frame = Duration::from_millis(sim_config.sim.frame_interval_ms);
  let total_frames = sim_config.sim.run_secs * 1_000 / sim_config.sim.frame_interval_ms;

  info!(
    "Running {} frames at {:?} per frame ...",
    total_frames, frame
  );

  let ticker = crossbeam_channel::tick(frame);
  for _ in 0..total_frames {
    ticker.recv()?;
    simulation.step();
  }

  simulation.close();

  Ok(())
}
