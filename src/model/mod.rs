pub mod attendance;
pub mod bonus;
pub mod employee;
pub mod leave;
pub mod payslip;

pub use attendance::{AttendanceRecord, AttendanceStatus};
pub use bonus::Bonus;
pub use employee::Employee;
pub use leave::{LeaveApplication, LeaveStatus};
pub use payslip::Payslip;
