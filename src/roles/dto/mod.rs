pub mod get_role_dto;
pub mod role_dto;
