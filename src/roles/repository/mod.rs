pub mod role_repository;
