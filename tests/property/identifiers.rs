// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Identifier Encoding
//!
//! IDs end up in URL path segments and redirect URLs, so the encoding has
//! to be reversible and path-safe for every string, and origin detection
//! must recover the repository base URL from any endpoint href.

use mnestix_aas_search::domain::{
    aas_repository_origin, decode_id, encode_id, submodel_repository_origin, Redirect,
};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Repository base URLs, optionally with a path prefix
fn base_url_strategy() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("http"), Just("https")],
        "[a-z][a-z0-9-]{0,15}(\\.[a-z]{2,6})?",
        proptest::option::of(1024u16..65535),
        proptest::option::of("/[a-z]{1,8}(/[a-z]{1,8})?"),
    )
        .prop_map(|(scheme, host, port, prefix)| {
            let port = port.map(|p| format!(":{}", p)).unwrap_or_default();
            format!("{}://{}{}{}", scheme, host, port, prefix.unwrap_or_default())
        })
        .prop_filter("prefix must not look like a repository path", |url| {
            !url.contains("/shells") && !url.contains("/submodels")
        })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Property: any string survives the path encoding
    #[test]
    fn prop_encoding_is_reversible(id in any::<String>()) {
        prop_assert_eq!(decode_id(&encode_id(&id)).unwrap(), id);
    }

    /// Property: encoded IDs never need escaping in a path segment
    #[test]
    fn prop_encoding_is_path_safe(id in any::<String>()) {
        let encoded = encode_id(&id);
        prop_assert!(encoded
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    /// Property: the viewer redirect always carries the encoded ID
    #[test]
    fn prop_viewer_redirect_embeds_encoded_id(id in any::<String>()) {
        let url = Redirect::Viewer { aas_id: id.clone() }.url();
        prop_assert_eq!(url, format!("/viewer/{}", encode_id(&id)));
    }

    /// Property: the AAS repository origin is everything before `/shells`
    #[test]
    fn prop_shell_origin_recovers_base(base in base_url_strategy(), id in any::<String>()) {
        let href = format!("{}/shells/{}", base, encode_id(&id));
        prop_assert_eq!(aas_repository_origin(&href), Some(base));
    }

    /// Property: the submodel repository origin is everything before `/submodels`
    #[test]
    fn prop_submodel_origin_recovers_base(base in base_url_strategy(), id in any::<String>()) {
        let href = format!("{}/submodels/{}/$value", base, encode_id(&id));
        prop_assert_eq!(submodel_repository_origin(&href), Some(base));
    }
}
