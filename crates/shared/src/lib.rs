//! Veo Director Protocol - Shared types for the orchestration endpoint
//!
//! This crate contains the types exchanged between the engine and any remote
//! caller (the presentation layer, scripts, the CLI):
//! - Request bodies
//! - Response envelopes, including the error envelope and error codes
//! - Helpers for carrying operation ids in URL path segments
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde, serde_json, urlencoding, and thiserror
//! 2. **No business logic** - Pure data types and serialization
//! 3. **camelCase on the wire** - matches what browser callers expect

pub mod operation_id;
pub mod requests;
pub mod responses;

pub use operation_id::{decode_operation_id, encode_operation_id, OperationIdError};
pub use requests::{ComposePromptRequest, GenerateVideoRequest};
pub use responses::{
    ComposePromptResponse, ErrorCode, ErrorResponse, GenerateVideoResponse, HealthResponse,
    OperationStatusResponse, ProviderFailure, VideoFormat, VideoResponse, VideoResultResponse,
};
