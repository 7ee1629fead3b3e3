/// Repetition and definition level for a single value slot.
///
/// Columns that aren't nested always have a repetition level of 0, and
/// required columns always have a definition level of 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Levels {
    pub repetition: u16,
    pub definition: u16,
}

impl Levels {
    pub const fn new(repetition: u16, definition: u16) -> Self {
        Levels {
            repetition,
            definition,
        }
    }
}
