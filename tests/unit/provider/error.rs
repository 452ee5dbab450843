use super::*;

#[test]
fn status_codes_classify_first() {
    assert_eq!(ProviderError::classify(Some(401), ""), ProviderError::InvalidCredential);
    assert_eq!(ProviderError::classify(Some(403), "whatever"), ProviderError::InvalidCredential);
    assert_eq!(ProviderError::classify(Some(429), "slow down"), ProviderError::RateLimited);
    assert_eq!(
        ProviderError::classify(Some(429), "Quota exhausted for project"),
        ProviderError::QuotaExceeded
    );
}

#[test]
fn messages_classify_without_status() {
    assert_eq!(
        ProviderError::classify(None, "Invalid Cartesia API key"),
        ProviderError::InvalidCredential
    );
    assert_eq!(
        ProviderError::classify(Some(500), "Cartesia rate limit exceeded"),
        ProviderError::RateLimited
    );
    assert_eq!(
        ProviderError::classify(None, "RESOURCE_EXHAUSTED: quota"),
        ProviderError::QuotaExceeded
    );
    assert_eq!(
        ProviderError::classify(None, " socket hang up "),
        ProviderError::Failed("socket hang up".to_owned())
    );
}

#[test]
fn every_kind_has_a_distinct_user_message() {
    let kinds = [
        ProviderError::InvalidCredential,
        ProviderError::RateLimited,
        ProviderError::QuotaExceeded,
        ProviderError::Failed("x".to_owned()),
    ];
    let mut msgs: Vec<&str> = kinds.iter().map(ProviderError::user_message).collect();
    msgs.sort_unstable();
    msgs.dedup();
    assert_eq!(msgs.len(), kinds.len());
    assert!(msgs.iter().all(|m| *m != "failed"));
}

#[test]
fn http_status_mapping() {
    assert_eq!(ProviderError::InvalidCredential.http_status(), 403);
    assert_eq!(ProviderError::QuotaExceeded.http_status(), 429);
    assert_eq!(ProviderError::Failed(String::new()).http_status(), 500);
}
