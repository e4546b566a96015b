extern crate log;
use crate::utils::atomic;
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, OnceLock},
};

const HISTORY_LEN: usize = 1000;

pub struct Logger {
    pub enabled: atomic::Bool,
    level: log::LevelFilter,
    pub data: Arc<Mutex<VecDeque<(String, log::Level)>>>,
}
impl Logger {
    pub fn new(level: log::LevelFilter) -> Self {
        let data = Arc::new(Mutex::new(VecDeque::new()));

        Self {
            enabled: atomic::Bool::new(true),
            level,
            data,
        }
    }
    /// Maps the command line log level (1:trace 2:debug 3:info 4:warn 5:error 6:off).
    pub fn level_from_arg(level: u8) -> log::LevelFilter {
        match level {
            0 | 1 => log::LevelFilter::Trace,
            2 => log::LevelFilter::Debug,
            3 => log::LevelFilter::Info,
            4 => log::LevelFilter::Warn,
            5 => log::LevelFilter::Error,
            _ => log::LevelFilter::Off,
        }
    }
    /// Most recent records first.
    pub fn recent(&self, n: usize) -> Vec<(String, log::Level)> {
        match self.data.lock() {
            Ok(txt) => txt.iter().take(n).cloned().collect(),
            Err(_) => vec![],
        }
    }
    fn format(record: &log::Record) -> String {
        format!(
            "{}:{} -- {}",
            record.level(),
            record.target(),
            record.args()
        )
    }
}
impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.enabled.load() && metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let t = Self::format(record);
        eprintln!("{}", t);
        // never block the audio thread on the history
        if let Ok(mut txt) = self.data.try_lock() {
            txt.push_front((t, record.level()));
            txt.truncate(HISTORY_LEN);
        }
    }

    fn flush(&self) {
        if let Ok(mut txt) = self.data.try_lock() {
            txt.clear();
        }
    }
}
pub(crate) static GLOBAL_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Installs the global logger. Only the first call sets the level.
pub fn init(level: u8) -> Result<&'static Logger, log::SetLoggerError> {
    let filter = Logger::level_from_arg(level);
    let logger = GLOBAL_LOGGER.get_or_init(|| Logger::new(filter));
    log::set_logger(logger)?;
    log::set_max_level(logger.level);
    Ok(logger)
}
