/// Vertex and fragment source text split out of one `.shader` file.
///
/// Both strings are newline-terminated line by line, in file order. A section
/// that never appeared in the file is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSourcePair {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSourcePair {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self { vertex: vertex.into(), fragment: fragment.into() }
    }

    /// True when both sections contain text.
    pub fn is_complete(&self) -> bool {
        !self.vertex.is_empty() && !self.fragment.is_empty()
    }
}
