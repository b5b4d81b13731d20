pub mod evaluator_client;

pub use evaluator_client::{EvaluatorClient, HealthStatus};
