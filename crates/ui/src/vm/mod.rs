mod dashboard_vm;
mod roadmap_vm;
mod stream_vm;

pub use dashboard_vm::{DashboardCardVm, DashboardVm, map_dashboard};
pub use roadmap_vm::{ResourceVm, RoadmapStepVm, RoadmapVm, map_roadmap};
pub use stream_vm::{StreamOptionVm, map_stream_options};
