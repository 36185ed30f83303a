pub mod dashboard;
pub mod lifecycle;
pub mod reporting;
pub mod scheduling;

pub use dashboard::DashboardNotifier;
pub use lifecycle::AppointmentLifecycleService;
pub use reporting::{summarize, AppointmentReportService};
pub use scheduling::AppointmentService;
