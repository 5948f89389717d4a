#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("worker count must be at least 1")]
    ZeroWorkers,
    #[error("segment size must be at least 1")]
    ZeroSegmentSize,
    #[error("worker count {workers} exceeds the limit of {max}")]
    TooManyWorkers { workers: usize, max: usize },
    #[error("segment size {size} exceeds the limit of {max}")]
    SegmentSizeTooLarge { size: usize, max: usize },
    #[error("bound {bound} exceeds the largest supported bound {max}")]
    BoundTooLarge { bound: u64, max: u64 },
}

pub type Result<T> = std::result::Result<T, Error>;
