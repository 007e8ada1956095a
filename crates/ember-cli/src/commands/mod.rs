mod add;
mod auth_cmd;
mod common;
mod delete;
mod edit;
mod list;
mod profile;
mod sync;

pub use add::run_add;
pub use auth_cmd::{run_login, run_logout};
pub use common::AppContext;
pub use delete::run_delete;
pub use edit::run_edit;
pub use list::run_list;
pub use profile::{run_profile_set, run_profile_show};
pub use sync::run_sync;
