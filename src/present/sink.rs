use std::io::Write;

use crate::{
    foundation::error::{GuideError, GuideResult},
    present::compile::DisplayList,
};

/// Boundary that applies compiled display lists to a surface.
pub trait Presenter {
    fn present(&mut self, list: &DisplayList) -> GuideResult<()>;
}

/// Keeps every presented list in memory.
#[derive(Debug, Default)]
pub struct Recorder {
    lists: Vec<DisplayList>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lists(&self) -> &[DisplayList] {
        &self.lists
    }

    pub fn last(&self) -> Option<&DisplayList> {
        self.lists.last()
    }
}

impl Presenter for Recorder {
    fn present(&mut self, list: &DisplayList) -> GuideResult<()> {
        self.lists.push(list.clone());
        Ok(())
    }
}

/// Writes one JSON object per line.
pub struct JsonLines<W: Write> {
    out: W,
    written: u64,
}

impl<W: Write> JsonLines<W> {
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for JsonLines<W> {
    fn present(&mut self, list: &DisplayList) -> GuideResult<()> {
        serde_json::to_writer(&mut self.out, list).map_err(|e| GuideError::serde(e.to_string()))?;
        self.out
            .write_all(b"\n")
            .map_err(|e| GuideError::Other(e.into()))?;
        self.written += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/present/sink.rs"]
mod tests;
