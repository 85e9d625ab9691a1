pub mod hypergeometric;
pub mod rng;
pub mod simulation;
pub mod table;

#[cfg(test)]
mod integration_tests;
