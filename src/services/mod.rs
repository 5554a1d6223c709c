//! 服务层模块

pub mod formatter;
mod prompt_service;
mod tutor_service;

pub use tutor_service::TutorService;
