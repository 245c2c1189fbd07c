pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod expiry_sweeper;
pub mod repositories;
