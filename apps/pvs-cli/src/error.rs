use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Invalid argument: {0}")]
    InvalidArg(String),
}

pub type CliResult<T> = Result<T, CliError>;

impl From<pvs_project::ProjectError> for CliError {
    fn from(err: pvs_project::ProjectError) -> Self {
        CliError::Project(err.to_string())
    }
}

impl From<pvs_sim::SimError> for CliError {
    fn from(err: pvs_sim::SimError) -> Self {
        CliError::Simulation(err.to_string())
    }
}
