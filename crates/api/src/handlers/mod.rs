pub mod assets;
pub mod attendance;
pub mod auth;
pub mod departments;
pub mod reports;

use helpdesk_core::department;
use helpdesk_db::repositories::DepartmentRepo;
use helpdesk_db::DbPool;

use crate::error::AppResult;

/// Reject department codes that are not active directory entries.
pub(crate) async fn ensure_department(pool: &DbPool, code: &str) -> AppResult<()> {
    if DepartmentRepo::is_active_code(pool, code).await? {
        Ok(())
    } else {
        Err(department::unknown_code(code).into())
    }
}
