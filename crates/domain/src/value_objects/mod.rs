//! Value objects - validated configuration carried through the engine

mod generation_parameters;
mod poll_policy;

pub use generation_parameters::GenerationParameters;
pub use poll_policy::PollPolicy;
