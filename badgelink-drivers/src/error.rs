//! Driver errors

/// Failure of a link transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError<E> {
    /// The SPI bus reported an error
    Bus(E),
}

/// Failure of a storage or crypto operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NvmError<E> {
    /// The SPI bus reported an error
    Bus(E),
    /// No reply arrived within the receive budget
    Timeout,
    /// The coprocessor answered with the error status
    Failed {
        /// Header byte of the reply
        status: u8,
    },
    /// Block cipher lengths must be a multiple of 4 and at most 12 bytes
    InvalidLength,
    /// At most three navigation hashes fit in one request
    TooManyHashes,
}

impl<E> From<LinkError<E>> for NvmError<E> {
    fn from(err: LinkError<E>) -> Self {
        match err {
            LinkError::Bus(e) => NvmError::Bus(e),
        }
    }
}
