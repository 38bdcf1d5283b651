pub mod get_user_dto;
pub mod user_dto;
