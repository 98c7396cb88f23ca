pub mod biz_service;
pub mod entitys;
pub mod manager;
pub mod repository;
