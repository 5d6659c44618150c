pub mod api; // Inbound HTTP boundary
pub mod config;
pub mod document; // Document-access collaborator: staging + PDF text extraction
pub mod llm; // Reasoning-service collaborator
pub mod pipeline; // Two-stage verify-then-analyze pipeline
