// Brochure generation pipeline.
// Every generator call goes through generator::generate_brochure; the optimizer and
// the measurement reconciler only decide which context and temperature to send.

pub mod context;
pub mod generator;
pub mod handlers;
pub mod optimizer;
pub mod prompts;
pub mod reconcile;

#[cfg(test)]
pub mod testing;
