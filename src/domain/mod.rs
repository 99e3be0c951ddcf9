pub mod allocation;
pub mod assignment;
pub mod booking;
pub mod event;
pub mod money;
pub mod payment_method;
pub mod ports;
pub mod recurrence;
