pub mod thumb_handler;
