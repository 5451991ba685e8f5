//! Plain-text contact and area transcripts.
//!
//! `pair.txt` lists the contacts of every tick, grouped by round:
//!
//! ```text
//! Round:0: 
//! Seconds:0: 
//! [(0, 3), (1, 7)]
//! Seconds:1: 
//! []
//! ```
//!
//! `area.txt` lists each car's area, one `Car:{i}: {area}` line per agent.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use cdfl_contact::ContactEvent;
use cdfl_core::Round;
use cdfl_mobility::Car;

use crate::OutputResult;

pub struct TranscriptWriter {
    pairs:     BufWriter<File>,
    area_path: PathBuf,
    finished:  bool,
}

impl TranscriptWriter {
    /// Create `pair.txt` in `dir`.  `area.txt` is created by
    /// [`write_areas`][Self::write_areas].
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let pairs = BufWriter::new(File::create(dir.join("pair.txt"))?);
        Ok(Self { pairs, area_path: dir.join("area.txt"), finished: false })
    }

    pub fn begin_round(&mut self, round: Round) -> OutputResult<()> {
        writeln!(self.pairs, "Round:{}: ", round.0)?;
        Ok(())
    }

    /// Append the contacts of second `second` of the current round.
    pub fn write_tick(&mut self, second: u32, contacts: &[ContactEvent]) -> OutputResult<()> {
        writeln!(self.pairs, "Seconds:{second}: ")?;
        let joined: Vec<String> = contacts.iter().map(ToString::to_string).collect();
        writeln!(self.pairs, "[{}]", joined.join(", "))?;
        Ok(())
    }

    pub fn write_areas(&mut self, cars: &[Car]) -> OutputResult<()> {
        let mut out = BufWriter::new(File::create(&self.area_path)?);
        for car in cars {
            writeln!(out, "Car:{}: {}", car.id.0, car.area)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Idempotent.
    pub fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.pairs.flush()?;
        Ok(())
    }
}
