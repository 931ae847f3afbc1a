//! Package-manager tools and the registry that exposes them.

mod arguments;
mod check_licenses;
mod install;
mod list;
mod new_project;
mod profiles;
mod registry;
mod search;

pub use check_licenses::CheckLicensesTool;
pub use install::InstallPackagesTool;
pub use list::ListPackagesTool;
pub use new_project::NewProjectTool;
pub use profiles::{GetProfileTool, ListProfilesTool};
pub use registry::ToolRegistry;
pub use search::SearchPackagesTool;
