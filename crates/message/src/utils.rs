//! Internal helper macros.

/// Returns early with an error if a condition is not met.
///
/// Works like `assert!`, but returns `Err($error)` instead of panicking.
///
/// # Example
///
/// ```ignore
/// ensure!(self.writable, StreamError::NotWritable);
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
