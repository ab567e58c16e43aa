pub mod health;
pub mod image_file;
pub mod image_history;
pub mod image_process;
