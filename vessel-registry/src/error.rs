use snafu::{Location, Snafu};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum Error {
    #[snafu(display("Failed to load settings"))]
    Config {
        #[snafu(implicit)]
        location: Location,
        source: config::ConfigError,
    },
}
