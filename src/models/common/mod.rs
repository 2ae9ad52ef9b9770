pub mod pagination;
pub mod response;

pub use pagination::PaginationInfo;
pub use response::ApiResponse;
