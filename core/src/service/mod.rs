pub mod dispatch_service;
pub mod dto;
