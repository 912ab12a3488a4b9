//! The set of OSS operations understood by the router and the provider.

/// All supported OSS operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OssOperation {
    /// The PutBucket operation.
    CreateBucket,
    /// The DeleteBucket operation.
    DeleteBucket,
    /// The ListBuckets (GetService) operation.
    ListBuckets,
    /// The GetBucketLocation operation.
    GetBucketLocation,
    /// The PutBucketLogging operation.
    PutBucketLogging,
    /// The GetBucketLogging operation.
    GetBucketLogging,
    /// The DeleteBucketLogging operation.
    DeleteBucketLogging,
    /// The PutBucketWebsite operation.
    PutBucketWebsite,
    /// The GetBucketWebsite operation.
    GetBucketWebsite,
    /// The DeleteBucketWebsite operation.
    DeleteBucketWebsite,
    /// The PutObject operation.
    PutObject,
    /// The GetObject operation.
    GetObject,
    /// The HeadObject operation.
    HeadObject,
    /// The DeleteObject operation.
    DeleteObject,
    /// The DeleteMultipleObjects operation.
    DeleteObjects,
    /// The ListObjects (GetBucket) operation.
    ListObjects,
    /// The InitiateMultipartUpload operation.
    InitiateMultipartUpload,
    /// The UploadPart operation.
    UploadPart,
    /// The CompleteMultipartUpload operation.
    CompleteMultipartUpload,
    /// The AbortMultipartUpload operation.
    AbortMultipartUpload,
    /// The ListMultipartUploads operation.
    ListMultipartUploads,
}

impl OssOperation {
    /// Every operation, in declaration order.
    pub const ALL: [Self; 21] = [
        Self::CreateBucket,
        Self::DeleteBucket,
        Self::ListBuckets,
        Self::GetBucketLocation,
        Self::PutBucketLogging,
        Self::GetBucketLogging,
        Self::DeleteBucketLogging,
        Self::PutBucketWebsite,
        Self::GetBucketWebsite,
        Self::DeleteBucketWebsite,
        Self::PutObject,
        Self::GetObject,
        Self::HeadObject,
        Self::DeleteObject,
        Self::DeleteObjects,
        Self::ListObjects,
        Self::InitiateMultipartUpload,
        Self::UploadPart,
        Self::CompleteMultipartUpload,
        Self::AbortMultipartUpload,
        Self::ListMultipartUploads,
    ];

    /// Returns the operation name string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateBucket => "CreateBucket",
            Self::DeleteBucket => "DeleteBucket",
            Self::ListBuckets => "ListBuckets",
            Self::GetBucketLocation => "GetBucketLocation",
            Self::PutBucketLogging => "PutBucketLogging",
            Self::GetBucketLogging => "GetBucketLogging",
            Self::DeleteBucketLogging => "DeleteBucketLogging",
            Self::PutBucketWebsite => "PutBucketWebsite",
            Self::GetBucketWebsite => "GetBucketWebsite",
            Self::DeleteBucketWebsite => "DeleteBucketWebsite",
            Self::PutObject => "PutObject",
            Self::GetObject => "GetObject",
            Self::HeadObject => "HeadObject",
            Self::DeleteObject => "DeleteObject",
            Self::DeleteObjects => "DeleteObjects",
            Self::ListObjects => "ListObjects",
            Self::InitiateMultipartUpload => "InitiateMultipartUpload",
            Self::UploadPart => "UploadPart",
            Self::CompleteMultipartUpload => "CompleteMultipartUpload",
            Self::AbortMultipartUpload => "AbortMultipartUpload",
            Self::ListMultipartUploads => "ListMultipartUploads",
        }
    }

    /// Parse an operation name string into an OssOperation.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == name)
    }

    /// Whether the operation mutates service state.
    #[must_use]
    pub fn is_write(&self) -> bool {
        !matches!(
            self,
            Self::ListBuckets
                | Self::GetBucketLocation
                | Self::GetBucketLogging
                | Self::GetBucketWebsite
                | Self::GetObject
                | Self::HeadObject
                | Self::ListObjects
                | Self::ListMultipartUploads
        )
    }
}

impl std::fmt::Display for OssOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_resolve_every_operation_by_name() {
        for op in OssOperation::ALL {
            assert_eq!(OssOperation::from_name(op.as_str()), Some(op));
        }
        assert_eq!(OssOperation::from_name("CopyObject"), None);
    }

    #[test]
    fn test_should_classify_reads_and_writes() {
        assert!(OssOperation::PutBucketLogging.is_write());
        assert!(OssOperation::DeleteBucketWebsite.is_write());
        assert!(!OssOperation::GetObject.is_write());
        assert!(!OssOperation::ListMultipartUploads.is_write());
    }
}
