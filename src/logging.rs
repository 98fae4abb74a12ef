//! Console logging and the program banner

use log::{info, LevelFilter};
use std::io::Write;

/// Prefix of every log line
pub const LOG_TAG: &str = "FC2001";

/// Level selected by the `--silent` / `--debug` flags
///
/// Silent wins over debug: only errors are shown.
pub fn level_filter(silent: bool, debug: bool) -> LevelFilter {
    if silent {
        LevelFilter::Error
    } else if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Install the stdout logger
///
/// Lines look like `FC2001 INFO [2026-10-14T04:30:00Z] | message`. Calling
/// this twice keeps the first logger.
pub fn init(silent: bool, debug: bool) {
    let _ = env_logger::Builder::new()
        .filter_level(level_filter(silent, debug))
        .target(env_logger::Target::Stdout)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {} [{}] | {}",
                LOG_TAG,
                record.level(),
                buf.timestamp(),
                record.args()
            )
        })
        .try_init();
}

/// Log the course banner followed by the program name
pub fn print_welcome(name: &str) {
    info!("-----------------------------------------------");
    info!(" ___   ___    ___     __      __      _   ");
    info!("| __| / __|  |_  )   /  \\    /  \\    / |  ");
    info!("| _| | (__    / /   | () |  | () |   | |  ");
    info!("|_|   \\___|  /___|   \\__/    \\__/    |_|  ");
    info!("");
    info!("---------------- FC1002 team -----------------");
    info!("");
    info!(" ==============================================");
    info!(" {}", name);
    info!(" Authors: Luis Torres, Pablo Galaviz           ");
    info!(" ==============================================");
    info!("");
}
