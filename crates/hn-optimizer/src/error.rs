use thiserror::Error;

#[derive(Error, Debug)]
pub enum OptimizerError {
    #[error("Commercial diameter catalog is empty")]
    EmptyCatalog,

    #[error("Population size must leave room for elitism ({elitism} >= {population_size})")]
    ElitismTooLarge {
        elitism: usize,
        population_size: usize,
    },
}

pub type OptimizerResult<T> = Result<T, OptimizerError>;
