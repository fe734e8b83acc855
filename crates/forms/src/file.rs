//! File selections awaiting upload.

use uuid::Uuid;

/// Raw file picked by the user.
#[derive(Clone, PartialEq, Eq)]
pub struct FileSelection {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FileSelection {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

impl core::fmt::Debug for FileSelection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FileSelection")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Transient display resource for a selected file.
///
/// Created as soon as a file is picked, independent of the upload. Once
/// revoked the renderer must stop using its URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewHandle {
    id: Uuid,
}

impl PreviewHandle {
    pub(crate) fn new() -> Self {
        Self { id: Uuid::now_v7() }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn url(&self) -> String {
        format!("blob:lms-preview/{}", self.id)
    }
}

/// A selection held by the form until the upload collaborator stores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub field: String,
    pub selection: FileSelection,
}
