/// Result of applying a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Inserted byte ranges, in post-edit offsets
    pub changed: Vec<std::ops::Range<usize>>,
    pub new_selection: std::ops::Range<usize>,
    pub version: u64,
    /// False when the command left the text untouched
    pub text_changed: bool,
}
