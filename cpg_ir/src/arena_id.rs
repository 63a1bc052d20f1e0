//! Small helpers shared by every newtype-index arena in this crate.

/// Panic helper for capacity overflow (cold path, never inlined).
#[cold]
#[inline(never)]
fn panic_capacity_exceeded(value: usize, context: &str) -> ! {
    panic!("arena capacity exceeded: {context} has {value} elements, max is {}", u32::MAX)
}

/// Convert `usize` to `u32`, panicking with a clear message on overflow.
///
/// A graph or registry holding more than `u32::MAX` entries indicates a
/// degenerate input, not a recoverable condition worth threading a `Result`
/// through every push site for.
#[inline]
pub(crate) fn to_u32(value: usize, context: &str) -> u32 {
    u32::try_from(value).unwrap_or_else(|_| panic_capacity_exceeded(value, context))
}
