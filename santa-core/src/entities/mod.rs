pub mod eligible_student;
pub mod event;
pub mod participant;
