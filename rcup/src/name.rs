//! Accumulates dotted names (`java.util.List`, `calc.parser`) one segment at a time.

/// Builds a qualified name from the segments the reader sees, in order.
///
/// Whoever consumes the name must call `take_and_reset` exactly once, after the last segment.
/// Anything left behind would be glued onto the next name.
#[derive(Clone, Debug, Default)]
pub struct MultipartName {
    value: String,
}

impl MultipartName {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, segment: &str) {
        if !self.value.is_empty() {
            self.value.push('.');
        }
        self.value.push_str(segment);
    }

    /// Appends `*`, as in `import java.util.*;`.
    pub fn append_wildcard(&mut self) {
        self.append("*");
    }

    pub fn take_and_reset(&mut self) -> String {
        core::mem::take(&mut self.value)
    }

    pub fn reset(&mut self) {
        self.value.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// True if more than one segment has been appended.
    pub fn is_qualified(&self) -> bool {
        self.value.contains('.')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_and_wildcard() {
        let mut name = MultipartName::new();
        for s in &["alpha", "beta", "Gamma"] {
            name.append(s);
        }
        assert!(name.is_qualified());
        name.append_wildcard();
        assert_eq!(name.take_and_reset(), "alpha.beta.Gamma.*");
        assert!(name.is_empty());
        assert_eq!(name.take_and_reset(), "");
    }

    #[test]
    fn no_leading_separator() {
        let mut name = MultipartName::new();
        name.append("Integer");
        assert!(!name.is_qualified());
        assert_eq!(name.as_str(), "Integer");
        name.reset();
        name.append("String");
        assert_eq!(name.take_and_reset(), "String");
    }
}
