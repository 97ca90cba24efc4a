use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("no bisection session found; run `mrbisect start` first")]
    NoSession,
    #[error("no current candidate to resolve")]
    NoCurrent,
    #[error("could not find commit hash between last good and first bad index")]
    OutsideInterval,
}
