//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&SqlitePool` as the first argument. Queries use numbered
//! `?N` parameters so a value can be referenced more than once.

pub mod asset_repo;
pub mod attendance_repo;
pub mod department_repo;
pub mod report_repo;

pub use asset_repo::AssetRepo;
pub use attendance_repo::AttendanceRepo;
pub use department_repo::DepartmentRepo;
pub use report_repo::ReportRepo;
