use bytes::Bytes;

/// The single file upload a request may carry.
///
/// Only the first file field of a `multipart/form-data` body is captured; the parser
/// stops reading the body once this handle is complete.
#[derive(Debug, Clone)]
pub struct FileHandle {
    field_name: String,
    file_name: String,
    content_type: Option<String>,
    data: Bytes,
}

impl FileHandle {
    pub fn new(field_name: String, file_name: String, content_type: Option<String>, data: Bytes) -> Self {
        Self { field_name, file_name, content_type, data }
    }

    /// Name of the form field the file was posted under
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Client supplied file name, possibly empty
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_data(self) -> Bytes {
        self.data
    }
}
