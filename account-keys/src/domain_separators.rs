// Copyright (c) 2019-2024 The Umbra Foundation

/// Tag for deriving the view private key from account entropy.
pub const VIEW_KEY_DOMAIN_SEPARATOR: &str = "umb_view_key_from_entropy";

/// Tag for deriving the spend private key from account entropy.
pub const SPEND_KEY_DOMAIN_SEPARATOR: &str = "umb_spend_key_from_entropy";
