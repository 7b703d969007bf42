//! Replacing the running program with another executable.

/// Whether [`exec_archive`] can ever succeed.
pub const EXEC_SUPPORTED: bool = false;

/// Replaces the current program with the one at `path`.
///
/// There is no loader on the board, so callers are expected to check [`EXEC_SUPPORTED`]
/// and never get here.
///
/// # Panics
///
/// Always.
pub fn exec_archive(path: &str, _args: &[&str], _env: &[&str]) -> ! {
    panic!("exec {}: should never arrive here", path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "should never arrive here")]
    fn exec_is_fatal() {
        assert!(!EXEC_SUPPORTED);
        exec_archive("/bin/true", &[], &[]);
    }
}
