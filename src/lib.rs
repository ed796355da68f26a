pub mod cli;
pub mod commands;
pub mod error;

pub mod core {
    pub mod allele;
    pub mod csq;
    pub mod frequency;
    pub mod info;
    pub mod processor;
}

pub mod io {
    pub mod readers;
    pub mod table_writer;
}

pub mod utils {
    pub mod util;
}

pub mod constants;

pub use constants::*;
