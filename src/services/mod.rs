pub mod eval_service;
pub mod gateway_service;
pub mod question_service;
pub mod report_service;
