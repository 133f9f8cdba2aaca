use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};

use failure::Error;

use loopsync_core::config::Config;
use loopsync_core::engine::LoopEngine;
use loopsync_core::surface::{PlaybackError, PlaybackSurface};
use loopsync_core::time::{ClockTime, Seconds};

use crate::config::Sim as SimConfig;

struct SurfaceState {
  clip: Option<String>,
  position: Seconds,
  rate: f64,
  muted: bool,
  playing: bool,
  loaded: bool,
  load_remaining: Seconds,
  became_ready: bool,
  ended: bool,
  clip_duration: Seconds,
  load_latency: Seconds,
}

impl SurfaceState {
  fn new(config: &SimConfig) -> SurfaceState {
    SurfaceState {
      clip: None,
      position: 0.0,
      rate: 1.0,
      muted: false,
      playing: false,
      loaded: false,
      load_remaining: 0.0,
      became_ready: false,
      ended: false,
      clip_duration: config.clip_duration,
      load_latency: config.load_latency_ms as f64 / 1_000.0,
    }
  }

  fn step(&mut self, elapsed: Seconds) {
    if !self.loaded && self.clip.is_some() {
      self.load_remaining -= elapsed;
      if self.load_remaining <= 0.0 {
        self.loaded = true;
        self.became_ready = true;
      }
    }

    if self.playing {
      self.position += elapsed * self.rate;
      if self.position >= self.clip_duration {
        self.position = self.clip_duration;
        self.playing = false;
        self.ended = true;
      }
    }
  }
}

type SurfaceHandle = Rc<RefCell<SurfaceState>>;

///! A simulated media element with a load latency and a fixed clip duration
pub struct SimSurface {
  state: SurfaceHandle,
}

impl SimSurface {
  fn new(config: &SimConfig) -> SimSurface {
    SimSurface {
      state: Rc::new(RefCell::new(SurfaceState::new(config))),
    }
  }

  fn handle(&self) -> SurfaceHandle {
    self.state.clone()
  }
}

impl PlaybackSurface for SimSurface {
  fn load(&mut self, clip: &str) {
    let mut state = self.state.borrow_mut();
    let latency = state.load_latency;
    state.clip = Some(clip.to_string());
    state.loaded = false;
    state.load_remaining = latency;
    state.position = 0.0;
    state.playing = false;
  }

  fn set_rate(&mut self, rate: f64) {
    self.state.borrow_mut().rate = rate;
  }

  fn set_muted(&mut self, muted: bool) {
    self.state.borrow_mut().muted = muted;
  }

  fn set_position(&mut self, position: Seconds) {
    self.state.borrow_mut().position = position;
  }

  fn get_position(&self) -> Seconds {
    self.state.borrow().position
  }

  fn play(&mut self) -> Result<(), PlaybackError> {
    let mut state = self.state.borrow_mut();
    if !state.loaded {
      return Err(PlaybackError::StartRejected {
        cause: "media not ready".to_string(),
      });
    }
    state.playing = true;
    Ok(())
  }

  fn pause(&mut self) {
    self.state.borrow_mut().playing = false;
  }

  fn is_playing(&self) -> bool {
    self.state.borrow().playing
  }

  fn has_current_data(&self) -> bool {
    self.state.borrow().loaded
  }
}

/// Drives the loop engine against simulated surfaces: advances the clock,
/// steps every surface and forwards ready/ended transitions into the engine.
pub struct Simulation {
  engine: LoopEngine<SimSurface>,
  handles: Vec<[SurfaceHandle; 2]>,
  clock: ClockTime,
  frame: ClockTime,
}

impl Simulation {
  pub fn new(config: &Config, sim_config: &SimConfig) -> Result<Simulation, Error> {
    let mut handles = Vec::with_capacity(config.tracks.len());
    let mut pairs = Vec::with_capacity(config.tracks.len());
    for _ in config.tracks.iter() {
      let first = SimSurface::new(sim_config);
      let second = SimSurface::new(sim_config);
      handles.push([first.handle(), second.handle()]);
      pairs.push((first, second));
    }

    let engine = LoopEngine::new(config, pairs)?;

    Ok(Simulation {
      engine,
      handles,
      clock: ClockTime::zero(),
      frame: ClockTime::from_millis(sim_config.frame_interval_ms),
    })
  }

  pub fn step(&mut self) {
    self.clock += self.frame;
    let elapsed = self.frame.to_seconds();

    self.engine.on_frame();

    for (track, pair) in self.handles.iter().enumerate() {
      for handle in pair.iter() {
        let (ready, ended) = {
          let mut state = handle.borrow_mut();
          state.step(elapsed);
          let ready = state.became_ready;
          state.became_ready = false;
          let ended = state.ended;
          state.ended = false;
          (ready, ended)
        };
        if ready {
          self.engine.on_surface_ready(track);
        }
        if ended {
          self.engine.on_clip_ended(track, self.clock);
        }
      }
    }

    self.engine.poll(self.clock);
  }

  pub fn close(&mut self) {
    for (index, track) in self.engine.tracks().iter().enumerate() {
      debug!(
        "Track {}: cursor={} active_surface={}",
        track.get_name(),
        self.engine.get_cursor_index(index),
        self.engine.get_active_surface_index(index)
      );
    }
    info!(
      "Simulation finished after {:.1}s",
      self.clock.to_seconds()
    );
    self.engine.close();
  }
}
