use crate::surface::{PlaybackSurface, SurfaceRole};

///! The two alternating playback sinks implementing gap-free looping.
///!
///! Exactly one surface is active at any time; the other is idle or
///! preloading the next clip. Roles flip on every clip transition.
pub struct BufferPair<S> {
  surfaces: [S; 2],
  active: usize,
}

impl<S: PlaybackSurface> BufferPair<S> {
  pub fn new(first: S, second: S) -> BufferPair<S> {
    BufferPair {
      surfaces: [first, second],
      active: 0,
    }
  }

  pub fn get_active_index(&self) -> usize {
    self.active
  }

  pub fn get_role(&self, index: usize) -> SurfaceRole {
    if index == self.active {
      SurfaceRole::Active
    } else {
      SurfaceRole::Standby
    }
  }

  pub fn active(&self) -> &S {
    &self.surfaces[self.active]
  }

  pub fn active_mut(&mut self) -> &mut S {
    &mut self.surfaces[self.active]
  }

  pub fn standby_mut(&mut self) -> &mut S {
    &mut self.surfaces[1 - self.active]
  }

  pub fn swap_roles(&mut self) {
    self.active = 1 - self.active;
  }

  pub fn each_mut(&mut self) -> impl Iterator<Item = &mut S> + '_ {
    self.surfaces.iter_mut()
  }
}

#[cfg(test)]
mod test {
  use super::BufferPair;
  use crate::surface::{PlaybackError, PlaybackSurface, SurfaceRole};
  use crate::time::Seconds;

  struct StubSurface {
    tag: u8,
  }

  impl PlaybackSurface for StubSurface {
    fn load(&mut self, _clip: &str) {}
    fn set_rate(&mut self, _rate: f64) {}
    fn set_muted(&mut self, _muted: bool) {}
    fn set_position(&mut self, _position: Seconds) {}
    fn get_position(&self) -> Seconds {
      0.0
    }
    fn play(&mut self) -> Result<(), PlaybackError> {
      Ok(())
    }
    fn pause(&mut self) {}
    fn is_playing(&self) -> bool {
      false
    }
    fn has_current_data(&self) -> bool {
      true
    }
  }

  fn new_pair() -> BufferPair<StubSurface> {
    BufferPair::new(StubSurface { tag: 0 }, StubSurface { tag: 1 })
  }

  #[test]
  pub fn exactly_one_active() {
    let pair = new_pair();
    let roles = [pair.get_role(0), pair.get_role(1)];
    let actives = roles
      .iter()
      .filter(|role| **role == SurfaceRole::Active)
      .count();
    assert_eq!(actives, 1);
  }

  #[test]
  pub fn swap_flips_roles() {
    let mut pair = new_pair();
    assert_eq!(pair.get_active_index(), 0);
    assert_eq!(pair.active().tag, 0);

    pair.swap_roles();
    assert_eq!(pair.get_active_index(), 1);
    assert_eq!(pair.active().tag, 1);
    assert_eq!(pair.get_role(0), SurfaceRole::Standby);
    assert_eq!(pair.get_role(1), SurfaceRole::Active);

    pair.swap_roles();
    assert_eq!(pair.get_active_index(), 0);
  }

  #[test]
  pub fn standby_is_the_other_surface() {
    let mut pair = new_pair();
    assert_eq!(pair.standby_mut().tag, 1);
    pair.swap_roles();
    assert_eq!(pair.standby_mut().tag, 0);
  }
}
