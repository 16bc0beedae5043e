use core::fmt;

/// Reasons a gateway read could not produce a usable value.
///
/// Never surfaced to the host: every caller substitutes a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadError {
    /// The host returned nothing, or only whitespace.
    Missing,
    /// The value was present but is not a decimal integer.
    Unparseable,
    /// The value parsed but does not fit the target type.
    OutOfRange,
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReadError::Missing => write!(f, "parameter missing"),
            ReadError::Unparseable => write!(f, "parameter is not an integer"),
            ReadError::OutOfRange => write!(f, "parameter out of range"),
        }
    }
}
