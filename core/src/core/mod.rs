pub mod context_data;
pub mod flow;
pub mod step;

// Re-export key types for easier access from other modules (and lib.rs)
pub use context_data::ContextData;
pub use flow::Flow;
pub use step::Step;
