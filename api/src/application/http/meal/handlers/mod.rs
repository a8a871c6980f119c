pub mod get_history;
pub mod get_summary;
pub mod list_images;
pub mod upload_meal;
