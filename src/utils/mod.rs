//! 工具模块

pub mod request_logger;
