pub mod projection;
pub mod report;
pub mod settings;
pub mod velocity;
pub mod work_item;
