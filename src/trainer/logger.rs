use std::{
    fmt::Debug,
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

/// What happened during a single step of training.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochRecord {
    /// Number of completed steps, counting this one.
    pub epoch: usize,
    /// Average loss of the batch, measured before the step was applied.
    pub loss: f64,
    /// Sum of the absolute values of the gradient that was applied.
    pub gradient_magnitude: f64,
}

/// Receives a record after every step of training.
pub trait Logger: Debug {
    fn epoch(&mut self, record: &EpochRecord);
}

impl<L: Logger + ?Sized> Logger for &mut L {
    fn epoch(&mut self, record: &EpochRecord) {
        (**self).epoch(record)
    }
}

/// Forwards every record to the `log` facade at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn epoch(&mut self, record: &EpochRecord) {
        log::debug!(
            "Epoch {}: loss {}, gradient magnitude {}",
            record.epoch,
            record.loss,
            record.gradient_magnitude
        );
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MockLogger;

impl Logger for MockLogger {
    fn epoch(&mut self, _record: &EpochRecord) {}
}

/// Keeps every record in memory.
#[derive(Debug, Default, Clone)]
pub struct History {
    records: Vec<EpochRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[EpochRecord] {
        &self.records
    }

    pub fn losses(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.loss)
    }
}

impl Logger for History {
    fn epoch(&mut self, record: &EpochRecord) {
        self.records.push(*record);
    }
}

/// Writes records to a csv file as `epoch,loss,gradient_magnitude`.
#[derive(Debug)]
pub struct LogFile {
    file: PathBuf,
    writer: BufWriter<File>,
}

impl LogFile {
    pub fn new<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let mut writer = BufWriter::new(File::create(&path)?);
        writeln!(writer, "epoch,loss,gradient_magnitude")?;
        Ok(Self {
            file: path.as_ref().to_owned(),
            writer,
        })
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl Logger for LogFile {
    fn epoch(&mut self, record: &EpochRecord) {
        if let Err(e) = writeln!(
            self.writer,
            "{},{},{}",
            record.epoch, record.loss, record.gradient_magnitude
        ) {
            log::warn!(
                "Error while logging to file: {}\nError: {}",
                self.file.display(),
                e
            );
        }
    }
}
