use crate::error::Result;

/// Interactive selection over a list of rendered rows.
///
/// Implementations surface a user abort as [`Error::Cancelled`] and a
/// missing picker binary as [`Error::ToolMissing`]; both are ordinary
/// failures, never panics.
///
/// [`Error::Cancelled`]: crate::error::Error::Cancelled
/// [`Error::ToolMissing`]: crate::error::Error::ToolMissing
pub trait Picker {
    /// Present `items` under `prompt` and return the index of the chosen
    /// row.
    fn pick(&self, prompt: &str, items: &[String]) -> Result<usize>;
}
