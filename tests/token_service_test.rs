mod common;

use std::time::{Duration, SystemTime};

use gatekeeper::{decode_unverified, issue_token, verify_token, SecurityConfig, TokenError};
use proptest::prelude::*;

proptest! {
    // Round-trip: any payload issued before its expiry verifies back to
    // the same payload under the same secret.
    #[test]
    fn prop_issue_verify_roundtrip(
        sub in 0i64..1_000_000_000,
        email in "[a-z]{1,12}@example\\.com",
        role in "[a-z]{1,8}",
    ) {
        let security = SecurityConfig::new("prop_test_secret".as_bytes());
        let token = issue_token(sub, &email, &role, SystemTime::now(), None, &security).unwrap();
        let claims = verify_token(&token, &security).unwrap();

        prop_assert_eq!(claims.sub, sub);
        prop_assert_eq!(claims.email, email);
        prop_assert_eq!(claims.role, role);
        prop_assert_eq!(claims.exp, claims.iat + 15 * 60);
    }
}

#[test]
fn test_rotated_secret_takes_effect_per_call() {
    // The secret lives in the config handed to each call, so swapping
    // configs models a rotation: old tokens stop verifying.
    let old = SecurityConfig::new("old_secret".as_bytes());
    let token = issue_token(1, "a@example.com", "user", SystemTime::now(), None, &old).unwrap();

    let rotated = SecurityConfig::new("new_secret".as_bytes());
    assert_eq!(verify_token(&token, &rotated), Err(TokenError::Invalid));

    let reissued =
        issue_token(1, "a@example.com", "user", SystemTime::now(), None, &rotated).unwrap();
    assert!(verify_token(&reissued, &rotated).is_ok());
}

#[test]
fn test_expired_token_reports_expired_not_invalid() {
    let security = SecurityConfig::new("secret".as_bytes());
    let issued_at = SystemTime::now() - Duration::from_secs(7200);
    let token = issue_token(
        5,
        "late@example.com",
        "user",
        issued_at,
        Some(Duration::from_secs(60)),
        &security,
    )
    .unwrap();

    assert_eq!(verify_token(&token, &security), Err(TokenError::Expired));

    // Diagnostics can still see inside the expired token.
    let claims = decode_unverified(&token).unwrap();
    assert_eq!(claims.sub, 5);
}
