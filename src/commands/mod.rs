// ABOUTME: Command module aggregator for the tagslot CLI.
// ABOUTME: Wires the configured engine adapters into the promotion controller.

mod engine;
mod promote;

pub use promote::promote;
