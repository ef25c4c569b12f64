use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use time::OffsetDateTime;
use time::format_description;

use crate::sim::BatchEnv;

/// Text replay of a run: a header line, then one line per tick with the
/// actions taken, the rewards and the done flags of every world.
pub struct ReplayFile {
    path: PathBuf,
    file: BufWriter<File>,
}

impl ReplayFile {
    pub fn new(replays_folder: &str, layout: &str, seed: u64) -> io::Result<Self> {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        let format = format_description::parse("[year][month][day]-[hour][minute][second]")
            .map_err(io::Error::other)?;
        let date_time_str = now.format(&format).map_err(io::Error::other)?;

        let path = Path::new(replays_folder).join(format!("{} - {}.replay", layout, date_time_str));
        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        let mut replay_file = ReplayFile {
            file: BufWriter::new(File::create(&path)?),
            path,
        };
        writeln!(replay_file.file, "layout={} seed={}", layout, seed)?;
        Ok(replay_file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&mut self, tick: u64, actions: &[i32], batch: &BatchEnv) -> io::Result<()> {
        let join = |values: Vec<String>| values.join(",");
        writeln!(
            self.file,
            "{} actions={} rewards={} done={}",
            tick,
            join(actions.iter().map(i32::to_string).collect()),
            join(batch.rewards().iter().map(f32::to_string).collect()),
            join(batch.dones().iter().map(|&d| u8::from(d).to_string()).collect()),
        )
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}
