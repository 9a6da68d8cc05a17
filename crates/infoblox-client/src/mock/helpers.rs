//! Helper functions for the mock object manager

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::models::ObjectRef;

/// Lock a mock store; a panicking test must not poison the others
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Build a WAPI-shaped reference: `<type>/<base64 internal id>:<suffix>`
pub(crate) fn make_ref(object_type: &str, internal_id: &str, suffix: &str) -> ObjectRef {
    ObjectRef::new(format!(
        "{}/{}:{}",
        object_type,
        URL_SAFE_NO_PAD.encode(internal_id),
        suffix
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_ref_shape() {
        let r = make_ref("network", "dns.network$10.10.0.0/24/0", "10.10.0.0/24/default");
        assert_eq!(r.object_type(), "network");
        assert!(r.as_str().ends_with(":10.10.0.0/24/default"));
        assert_eq!(
            r.as_str(),
            "network/ZG5zLm5ldHdvcmskMTAuMTAuMC4wLzI0LzA:10.10.0.0/24/default"
        );
    }
}
