mod analyser;
mod source_pipe;

pub use analyser::{AnalyserError, FrequencyAnalyser, MAX_FFT_SIZE, MIN_FFT_SIZE};
pub use source_pipe::SourcePipe;
