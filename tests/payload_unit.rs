use stars_shop::payload::{deep_link, parse_start_param, InvoicePayload};

#[test]
fn invoice_payload_survives_underscored_ids() {
    let payload = InvoicePayload::new("special_character", "42");
    let decoded = InvoicePayload::decode(&payload.encode());
    assert_eq!(decoded, Some(payload));
}

#[test]
fn invoice_payload_rejects_underscore_joined_strings() {
    // The old delimiter format is no longer a valid payload.
    assert_eq!(InvoicePayload::decode("coins_100_42"), None);
    assert_eq!(InvoicePayload::decode(""), None);
    assert_eq!(InvoicePayload::decode("{\"item_id\": \"coins_100\"}"), None);
}

#[test]
fn start_param_splits_at_the_last_underscore() {
    assert_eq!(
        parse_start_param("pay_coins_100_42"),
        Some(("coins_100".to_string(), "42".to_string()))
    );
    assert_eq!(
        parse_start_param("pay_special_character_987654321"),
        Some(("special_character".to_string(), "987654321".to_string()))
    );
}

#[test]
fn start_param_rejects_non_payment_links() {
    assert_eq!(parse_start_param(""), None);
    assert_eq!(parse_start_param("pay_"), None);
    assert_eq!(parse_start_param("pay_coins100"), None);
    assert_eq!(parse_start_param("pay__42"), None);
    assert_eq!(parse_start_param("pay_coins_100_"), None);
    assert_eq!(parse_start_param("ref_coins_100_42"), None);
}

#[test]
fn deep_link_matches_the_external_format() {
    assert_eq!(
        deep_link("TestShopBot", "coins_100", "42"),
        "https://t.me/TestShopBot?start=pay_coins_100_42"
    );
}

#[test]
fn deep_link_round_trips_through_start_param() {
    let link = deep_link("TestShopBot", "special_character", "42");
    let param = link.split("?start=").nth(1).unwrap();
    assert_eq!(
        parse_start_param(param),
        Some(("special_character".to_string(), "42".to_string()))
    );
}
