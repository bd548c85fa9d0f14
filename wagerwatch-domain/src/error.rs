use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelineError {
    #[error("{sequence} are out of time order at position {position}")]
    Unsorted {
        sequence: &'static str,
        position: usize,
    },
}
