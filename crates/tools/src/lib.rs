//! Built-in tool implementations for Cogwork.
//!
//! Tools give the agent the ability to interact with the world: read and
//! write files, list directories, search and fetch the web, run shell
//! commands, and make raw HTTP requests.

pub mod http_request;
pub mod list_directory;
pub mod read_file;
pub mod shell_command;
pub mod web_fetch;
pub mod web_search;
pub mod write_file;

pub use http_request::HttpRequestTool;
pub use list_directory::ListDirectoryTool;
pub use read_file::ReadFileTool;
pub use shell_command::ShellCommandTool;
pub use web_fetch::WebFetchTool;
pub use web_search::WebSearchTool;
pub use write_file::WriteFileTool;

use cogwork_core::tool::ToolCatalog;

/// Create a catalog with all built-in tools registered.
pub fn default_catalog() -> ToolCatalog {
    let mut catalog = ToolCatalog::new();
    catalog.register(Box::new(ReadFileTool));
    catalog.register(Box::new(WriteFileTool));
    catalog.register(Box::new(ListDirectoryTool));
    catalog.register(Box::new(WebSearchTool));
    catalog.register(Box::new(WebFetchTool::new()));
    catalog.register(Box::new(ShellCommandTool));
    catalog.register(Box::new(HttpRequestTool::new()));
    catalog
}
