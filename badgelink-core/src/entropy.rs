//! Seed folding for the application's random number generator

/// Fold one 16-bit analog reading into a running seed
pub fn fold(seed: u32, value: u16) -> u32 {
    (seed << 8) ^ (seed >> 24) ^ value as u32
}

/// Fold a sequence of readings, starting from zero
pub fn fold_all<I: IntoIterator<Item = u16>>(values: I) -> u32 {
    values.into_iter().fold(0, fold)
}
