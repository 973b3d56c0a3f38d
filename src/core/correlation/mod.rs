//! Error correlation and failure logging

mod correlator;
mod sink;


pub use correlator::{
    CorrelationReport, ErrorCorrelator, LOAD_STATUS_MESSAGE, PUSH_STATUS_MESSAGE,
};
pub use sink::{
    ApiFailure, AttributedFailure, FailureReport, FanoutLogSink, LogSink, MemoryLogSink,
    TracingLogSink,
};
