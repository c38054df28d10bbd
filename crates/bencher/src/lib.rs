#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    content_type: &'static str,
    file: TestFile,
}

impl TestCase {
    pub fn new(name: &'static str, content_type: &'static str, file: TestFile) -> Self {
        Self { name, content_type, file }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    pub fn file(&self) -> &TestFile {
        &self.file
    }

    pub fn file_name(&self) -> &'static str {
        self.file().file_name
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

/// Builds a `multipart/form-data` body: `fields` text parts, one file of `file_size`
/// bytes, then `fields` more text parts the parser never reaches.
pub fn multipart_body(boundary: &str, fields: usize, file_size: usize) -> Vec<u8> {
    let mut body = Vec::new();
    let field = |body: &mut Vec<u8>, i: usize| {
        body.extend_from_slice(format!("--{boundary}\r\nContent-Disposition: form-data; name=\"field{i}\"\r\n\r\nvalue {i}\r\n").as_bytes());
    };

    for i in 0..fields {
        field(&mut body, i);
    }
    body.extend_from_slice(
        format!("--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"blob.bin\"\r\nContent-Type: application/octet-stream\r\n\r\n").as_bytes(),
    );
    body.extend((0..file_size).map(|i| (i % 251) as u8));
    body.extend_from_slice(b"\r\n");
    for i in fields..fields * 2 {
        field(&mut body, i);
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}
