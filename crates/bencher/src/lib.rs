//! Shared fixtures for the parser benchmarks.

pub static GET_SMALL: TestFile = TestFile::new("get_small.txt", include_str!("../resources/request/get_small.txt"));
pub static GET_LARGE: TestFile = TestFile::new("get_large.txt", include_str!("../resources/request/get_large.txt"));
pub static POST_LENGTH: TestFile = TestFile::new("post_length.txt", include_str!("../resources/request/post_length.txt"));
pub static POST_CHUNKED: TestFile =
    TestFile::new("post_chunked.txt", include_str!("../resources/request/post_chunked.txt"));

/// Every request fixture, each holding exactly one complete message.
pub fn request_cases() -> Vec<TestCase> {
    vec![
        TestCase::small("get_small", GET_SMALL),
        TestCase::normal("get_large", GET_LARGE),
        TestCase::large("post_length", POST_LENGTH),
        TestCase::large("post_chunked", POST_CHUNKED),
    ]
}

#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    file: TestFile,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, file: TestFile) -> Self {
        Self { name, group, file }
    }

    pub fn small(name: &'static str, file: TestFile) -> Self {
        Self::new(name, TestGroup::Small, file)
    }

    pub fn normal(name: &'static str, file: TestFile) -> Self {
        Self::new(name, TestGroup::Normal, file)
    }

    pub fn large(name: &'static str, file: TestFile) -> Self {
        Self::new(name, TestGroup::Large, file)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn file(&self) -> &TestFile {
        &self.file
    }

    pub fn bytes(&self) -> &'static [u8] {
        self.file.content.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.file.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file.content.is_empty()
    }
}

#[derive(Debug, Copy, Clone)]
pub struct TestFile {
    file_name: &'static str,
    content: &'static str,
}

impl TestFile {
    pub const fn new(file_name: &'static str, content: &'static str) -> Self {
        Self { file_name, content }
    }

    pub fn content(&self) -> &'static str {
        self.content
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }
}

/// Rough size class of a fixture, used to pick sample counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TestGroup {
    Small,
    Normal,
    Large,
}

impl TestGroup {
    pub fn sample_size(self) -> usize {
        match self {
            TestGroup::Small | TestGroup::Normal => 100,
            TestGroup::Large => 50,
        }
    }
}
