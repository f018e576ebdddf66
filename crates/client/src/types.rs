//! Wire types for the Pledge REST API

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Login request body
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Credential pair issued by the login endpoint
///
/// `access` is short-lived and rotated on renewal; `refresh` outlives it
/// and is only replaced by a fresh login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Renewal request body
#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Renewal response body
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// Registration request body
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

/// Registration response body
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
}

/// A crowdfunding campaign as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: i64,
    pub owner: i64,
    pub title: String,
    pub description: String,
    pub target_amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Sum of donations received so far; omitted by some list endpoints
    #[serde(default)]
    pub total_donations: Option<f64>,
}

/// Body for creating or fully updating a campaign
#[derive(Debug, Clone, Serialize)]
pub struct NewCampaign {
    pub title: String,
    pub description: String,
    pub target_amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Donation request body
#[derive(Debug, Clone, Serialize)]
pub struct NewDonation {
    /// Campaign id the donation goes to
    pub campaign: i64,
    pub amount: f64,
}

/// A recorded donation
#[derive(Debug, Clone, Deserialize)]
pub struct Donation {
    pub id: i64,
    pub user: i64,
    pub campaign: i64,
    pub amount: f64,
}
