pub mod driver;
pub mod workbench;

pub use driver::{SurfaceEvent, WorkbenchDriver};
pub use workbench::Workbench;
