// Copyright (c) 2019-2024 The Umbra Foundation

//! Transaction validation.

mod error;
mod validate;

pub use self::{
    error::{TransactionValidationError, TransactionValidationResult},
    validate::{
        validate, validate_extra_size, validate_input_types, validate_inputs_overflow,
        validate_key_images_are_unique, validate_money_overflow, validate_multisig_inputs_diff,
        validate_number_of_inputs, validate_number_of_outputs, validate_outs_overflow,
        validate_outs_valid, validate_ring_members_are_sorted, validate_signatures,
    },
};
