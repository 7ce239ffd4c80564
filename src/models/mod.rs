pub mod evaluation;
pub mod question;
pub mod response;
