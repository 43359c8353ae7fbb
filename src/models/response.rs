// src/models/response.rs
// DOCUMENTATION: Standard success envelope
// PURPOSE: Every successful endpoint answers {code, message, data}

use serde::Serialize;

/// Result codes carried in the success envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    PlaceSearch,
    PlaceDetail,
    NewPlaces,
    PlaceDeleted,
}

impl ResponseCode {
    pub fn code(&self) -> u32 {
        match self {
            ResponseCode::PlaceSearch => 2000,
            ResponseCode::PlaceDetail => 2001,
            ResponseCode::NewPlaces => 2002,
            ResponseCode::PlaceDeleted => 2003,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ResponseCode::PlaceSearch => "Place search completed",
            ResponseCode::PlaceDetail => "Place detail retrieved",
            ResponseCode::NewPlaces => "Newly registered places retrieved",
            ResponseCode::PlaceDeleted => "Place deleted",
        }
    }
}

/// Success envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: u32,
    pub message: &'static str,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(code: ResponseCode, data: T) -> Self {
        ApiResponse {
            code: code.code(),
            message: code.message(),
            data,
        }
    }
}
