// ABOUTME: Command module aggregator for the promoter CLI.
// ABOUTME: Re-exports the deploy command handler.

mod deploy;

pub use deploy::deploy;
