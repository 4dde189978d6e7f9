// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod generator;
pub mod payments;
pub mod subscription;

pub use generator::FlashcardGenerator;
pub use payments::PaymentsService;
