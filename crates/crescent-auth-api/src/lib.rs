//! Typed client for the remote authentication API.
//!
//! This crate provides:
//! - The wire types for `/api/auth/{login,register,verify-otp,logout}`
//! - [`AuthApi`], the trait the session manager depends on
//! - [`HttpAuthApi`], the reqwest-backed implementation with a bounded
//!   request timeout and error-message extraction from API responses

mod client;
mod error;
mod types;

pub use client::{AuthApi, HttpAuthApi, REQUEST_TIMEOUT};
pub use error::{ApiError, ApiResult};
pub use types::{
    LoginRequest, LogoutRequest, RegisterRequest, RegisterResponse, TokenGrant, UserProfile,
    VerifyOtpRequest,
};
