use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeoVisError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error("Output error: {0}")]
    Output(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
