use snafu::{Location, Snafu};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum Error {
    #[snafu(display("Invalid mmsi '{value}'"))]
    InvalidMmsi {
        #[snafu(implicit)]
        location: Location,
        value: i64,
    },
}
