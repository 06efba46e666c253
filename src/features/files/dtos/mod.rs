pub mod file_dto;

pub use file_dto::{
    DeleteFileResponseDto, FileSummaryDto, UploadFileDto, DEFAULT_MIME_TYPE, MULTIPART_OVERHEAD,
};
