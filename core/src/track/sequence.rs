use crate::surface::ClipId;

///! Ordered cyclic sequence of clips. Repeats are allowed.
pub struct ClipSequence {
  clips: Vec<ClipId>,
}

impl ClipSequence {
  pub fn new(clips: Vec<ClipId>) -> ClipSequence {
    assert!(!clips.is_empty());
    ClipSequence { clips }
  }

  pub fn len(&self) -> usize {
    self.clips.len()
  }

  pub fn get_clip(&self, index: usize) -> &str {
    self.clips[index % self.clips.len()].as_str()
  }
}

///! Position into a track's clip sequence, wrapping modulo its length
#[derive(Debug, Clone, Copy)]
pub struct SequenceCursor {
  index: usize,
  length: usize,
}

impl SequenceCursor {
  pub fn new(length: usize) -> SequenceCursor {
    assert!(length >= 1);
    SequenceCursor { index: 0, length }
  }

  pub fn get_index(&self) -> usize {
    self.index
  }

  pub fn next_index(&self) -> usize {
    (self.index + 1) % self.length
  }

  pub fn advance(&mut self) -> usize {
    self.index = self.next_index();
    self.index
  }
}
