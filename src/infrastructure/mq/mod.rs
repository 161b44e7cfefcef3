pub mod progress_publisher;
