// Pipeline - Runs every stage from templates to a humanized performance
// Records what each stage did as a structured trace

pub mod runner;
pub mod trace;

pub use runner::{Pipeline, PipelineError, PipelineOutput};
pub use trace::{read_trace_file, Stage, Trace, TraceEntry, TraceError, TraceWriter};
