//! Shared fixtures for the micro-message benchmarks.

#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    file: TestFile,
}

impl TestCase {
    pub const fn new(name: &'static str, file: TestFile) -> Self {
        Self { name, file }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn file(&self) -> &TestFile {
        &self.file
    }

    pub fn len(&self) -> u64 {
        self.file.content().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.file.content().is_empty()
    }
}

/// A resource file embedded with `include_str!`.
#[derive(Debug, Copy, Clone)]
pub struct TestFile {
    file_name: &'static str,
    content: &'static str,
}

impl TestFile {
    pub const fn new(file_name: &'static str, content: &'static str) -> Self {
        Self { file_name, content }
    }

    /// The file content without its trailing line break.
    pub fn content(&self) -> &'static str {
        self.content.trim_end_matches(['\r', '\n'])
    }

    /// `name: value` pairs, one per line. Lines without a colon are skipped.
    pub fn header_lines(&self) -> impl Iterator<Item = (&'static str, &'static str)> {
        self.content().lines().filter_map(|line| line.split_once(':')).map(|(name, value)| (name, value.trim()))
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }
}
