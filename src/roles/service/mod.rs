pub mod role_service;
