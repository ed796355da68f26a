use crate::error::VexResult;
use log;
use std::{fmt::Display, sync::Once};

pub type Result<T> = VexResult<T>;

#[allow(unused)]
static INIT_LOG: Once = Once::new();

#[allow(unused)]
pub fn init_logger() {
    INIT_LOG.call_once(|| {
        env_logger::builder()
            .filter_level(log::LevelFilter::Trace)
            .is_test(true)
            .init();
    });
}

pub fn handle_error_and_exit(err: impl Display) -> ! {
    log::error!("{err}");
    std::process::exit(1);
}

pub fn log_warning<T>(err: impl Display, default: T) -> T {
    log::warn!("{err}");
    default
}
