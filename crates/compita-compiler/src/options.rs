//! Compilation options.

/// Where global storage and function address slots live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlobalBase {
    /// Addressed relative to `EHM`, counting down.
    #[default]
    HighMemory,
    /// Absolute addresses counting down from the given top address.
    ///
    /// The top must equal the machine's `EHM` for the generated program to
    /// agree with its own stack.
    Absolute(i64),
}

/// Options for one compilation.
///
/// # Example
///
/// ```
/// use compita_compiler::{CompileOptions, GlobalBase};
///
/// let options = CompileOptions::new()
///     .reject_recursion(false)
///     .global_base(GlobalBase::Absolute(1023));
/// assert!(!options.rejects_recursion());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    reject_recursion: bool,
    global_base: GlobalBase,
}

impl CompileOptions {
    pub fn new() -> Self {
        Self {
            reject_recursion: true,
            global_base: GlobalBase::HighMemory,
        }
    }

    /// Enable or disable the recursive-call check.
    pub fn reject_recursion(mut self, reject: bool) -> Self {
        self.reject_recursion = reject;
        self
    }

    /// Choose how globals and function slots are addressed.
    pub fn global_base(mut self, base: GlobalBase) -> Self {
        self.global_base = base;
        self
    }

    pub fn rejects_recursion(&self) -> bool {
        self.reject_recursion
    }

    pub fn base(&self) -> GlobalBase {
        self.global_base
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self::new()
    }
}
