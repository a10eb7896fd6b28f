//! GymDesk backend: subscription checkout and payment-webhook
//! reconciliation for gym owner accounts.
//!
//! The mobile client talks to `/api/payments/create` to obtain a gateway
//! payment URL; the gateway calls back into `/webhooks/payment` once the
//! payment settles, and the reconciler activates the subscription and
//! approves the owner account.

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod gateway;
pub mod health;
pub mod logging;
pub mod services;
