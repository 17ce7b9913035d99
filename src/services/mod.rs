pub mod chat_model;
pub mod llm_service;
pub mod settings;
