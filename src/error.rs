use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    // 哲学者の数は 1 以上
    #[error("invalid number of philosophers: {0}")]
    InvalidArgument(i64),

    #[error("initialization failed: {0}")]
    InitializationFailure(String),

    #[error("invalid pace: minimum duration exceeds maximum")]
    InvalidPace,

    // まだ join されていない哲学者がテーブルを握っている
    #[error("table is still shared by {0} other handle(s)")]
    StillShared(usize),

    #[error("philosopher {0} panicked")]
    ActorPanicked(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
